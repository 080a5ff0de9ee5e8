// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Error types for strategy resolution, store access and Ingress adoption.
//!
//! This module provides:
//! - [`StrategyError`] - annotation values that cannot form a valid [`Strategy`](crate::crd::Strategy)
//! - [`StoreError`] - failures of list, get and create calls against the object store
//! - [`AdoptionError`] - why an Ingress could not be adopted into a `Gslb`
//!
//! Absence of an object is not an error anywhere in this crate: getters return
//! `Ok(None)`. A create that loses to a concurrent create is reported as
//! [`StoreError::AlreadyExists`] and callers recover from it locally.

use crate::constants::{HTTP_CONFLICT, HTTP_TOO_MANY_REQUESTS};
use thiserror::Error;

/// Errors produced while turning Ingress annotations into a strategy.
///
/// Both variants are permanent: the annotations will not change by themselves,
/// so retrying the same input can only fail again.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StrategyError {
    /// An integer annotation does not hold a base-10 unsigned integer.
    #[error("can't parse annotation value '{value}' to int for key {key}")]
    InvalidInteger {
        /// Annotation key
        key: String,
        /// Offending value, verbatim
        value: String,
    },

    /// The strategy type requires an annotation that is absent or empty.
    #[error("{strategy} strategy requires annotation {annotation}")]
    MissingAnnotation {
        /// Strategy type that carries the requirement
        strategy: String,
        /// Annotation key that must be set
        annotation: String,
    },
}

/// Errors returned by the object store seams.
#[derive(Error, Debug, Clone)]
pub enum StoreError {
    /// Create was rejected because an object with the same name exists.
    #[error("{kind} '{namespace}/{name}' already exists")]
    AlreadyExists {
        /// Kind of the object
        kind: String,
        /// Namespace of the object
        namespace: String,
        /// Name of the object
        name: String,
    },

    /// The API server answered with an error.
    #[error("{operation} {kind} in namespace '{namespace}' failed (HTTP {code}): {reason}")]
    Api {
        /// Operation that failed (`list`, `get`, `create`)
        operation: String,
        /// Kind of the object
        kind: String,
        /// Namespace the call was scoped to
        namespace: String,
        /// HTTP status code
        code: u16,
        /// Message from the API server
        reason: String,
    },

    /// The API server could not be reached or the response could not be read.
    #[error("{operation} {kind} in namespace '{namespace}' failed: {reason}")]
    Connection {
        /// Operation that failed (`list`, `get`, `create`)
        operation: String,
        /// Kind of the object
        kind: String,
        /// Namespace the call was scoped to
        namespace: String,
        /// Underlying error
        reason: String,
    },
}

impl StoreError {
    /// Convert a `kube::Error` returned by `operation` on `kind/namespace/name`.
    ///
    /// HTTP 409 becomes [`StoreError::AlreadyExists`]; other API errors keep their
    /// status code; everything else is a connection failure.
    #[must_use]
    pub fn from_kube(
        err: kube::Error,
        operation: &str,
        kind: &str,
        namespace: &str,
        name: &str,
    ) -> Self {
        match err {
            kube::Error::Api(ae) if ae.code == HTTP_CONFLICT => Self::AlreadyExists {
                kind: kind.to_string(),
                namespace: namespace.to_string(),
                name: name.to_string(),
            },
            kube::Error::Api(ae) => Self::Api {
                operation: operation.to_string(),
                kind: kind.to_string(),
                namespace: namespace.to_string(),
                code: ae.code,
                reason: ae.message,
            },
            other => Self::Connection {
                operation: operation.to_string(),
                kind: kind.to_string(),
                namespace: namespace.to_string(),
                reason: other.to_string(),
            },
        }
    }

    /// Returns true if the same call may succeed when repeated later.
    ///
    /// Rate limiting, 5xx answers and connection failures are transient.
    /// Client errors and conflicts are not.
    #[must_use]
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Api { code, .. } => *code == HTTP_TOO_MANY_REQUESTS || (500..600).contains(code),
            Self::Connection { .. } => true,
            Self::AlreadyExists { .. } => false,
        }
    }
}

/// Errors that abort the adoption of an Ingress.
#[derive(Error, Debug, Clone)]
pub enum AdoptionError {
    /// The strategy annotations are invalid. Terminal until the Ingress is edited.
    #[error("invalid strategy annotations: {0}")]
    InvalidStrategy(#[from] StrategyError),

    /// A store call failed.
    #[error(transparent)]
    Store(#[from] StoreError),

    /// The owner reference from the Ingress to the Gslb could not be built.
    #[error("cannot set {owner} as the owner of the Gslb: {reason}")]
    OwnerReference {
        /// `namespace/name` of the would-be owner
        owner: String,
        /// Why the reference could not be built
        reason: String,
    },
}

impl AdoptionError {
    /// Returns the reason code used in logs and metric labels.
    #[must_use]
    pub fn status_reason(&self) -> &'static str {
        match self {
            Self::InvalidStrategy(StrategyError::InvalidInteger { .. }) => "InvalidInteger",
            Self::InvalidStrategy(StrategyError::MissingAnnotation { .. }) => "MissingAnnotation",
            Self::Store(StoreError::AlreadyExists { .. }) => "AlreadyExists",
            Self::Store(StoreError::Api { .. }) => "ApiError",
            Self::Store(StoreError::Connection { .. }) => "ConnectionError",
            Self::OwnerReference { .. } => "OwnerReferenceFailed",
        }
    }

    /// Returns true if a later attempt with the same input may succeed.
    #[must_use]
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Store(err) => err.is_transient(),
            Self::InvalidStrategy(_) | Self::OwnerReference { .. } => false,
        }
    }
}
