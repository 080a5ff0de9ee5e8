// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Custom Resource Definitions (CRDs) for global server load balancing.
//!
//! # Resource Types
//!
//! - [`Gslb`] - Traffic-steering resource for the hosts of one `Ingress`
//!
//! A `Gslb` embeds a copy of the `Ingress` rules it steers traffic for and a
//! [`Strategy`] telling the DNS engine how to answer for those hosts. A `Gslb`
//! is either written by a user or adopted from an `Ingress` that carries the
//! `k8gb.io/strategy` annotation.
//!
//! # Example: Creating a Gslb
//!
//! ```rust,no_run
//! use gslb::crd::{GslbSpec, Strategy};
//! use k8s_openapi::api::networking::v1::IngressSpec;
//!
//! let spec = GslbSpec {
//!     ingress: IngressSpec::default(),
//!     strategy: Strategy {
//!         r#type: "failover".to_string(),
//!         primary_geo_tag: "eu".to_string(),
//!         dns_ttl_seconds: 30,
//!         split_brain_threshold_seconds: 300,
//!     },
//! };
//! ```

use crate::constants::{FAILOVER_STRATEGY, KNOWN_STRATEGIES};
use crate::errors::StrategyError;
use crate::labels::PRIMARY_GEO_TAG_ANNOTATION;
use k8s_openapi::api::networking::v1::IngressSpec;
use kube::CustomResource;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Traffic-steering strategy of a `Gslb`.
///
/// `r#type` is the discriminant. Integer fields default to 0, meaning "unset";
/// the DNS engine substitutes its own defaults for them.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Strategy {
    /// Load balancing strategy type: `roundRobin`, `failover` or `geoip`.
    pub r#type: String,

    /// Geo tag of the cluster that receives traffic while healthy.
    ///
    /// Required when `type` is `failover`.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub primary_geo_tag: String,

    /// TTL of the DNS answers in seconds.
    #[serde(default)]
    pub dns_ttl_seconds: u32,

    /// Time in seconds after which a silent peer cluster is considered gone.
    #[serde(default)]
    pub split_brain_threshold_seconds: u32,
}

impl Strategy {
    /// Returns true if this is the `failover` strategy.
    #[must_use]
    pub fn is_failover(&self) -> bool {
        self.r#type == FAILOVER_STRATEGY
    }

    /// Returns true if the DNS engine has an implementation for this strategy type.
    #[must_use]
    pub fn is_known(&self) -> bool {
        KNOWN_STRATEGIES.contains(&self.r#type.as_str())
    }

    /// Check the field requirements that depend on the strategy type.
    ///
    /// # Errors
    ///
    /// Returns [`StrategyError::MissingAnnotation`] when a `failover` strategy has
    /// no primary geo tag.
    pub fn validate(&self) -> Result<(), StrategyError> {
        if self.is_failover() && self.primary_geo_tag.is_empty() {
            return Err(StrategyError::MissingAnnotation {
                strategy: self.r#type.clone(),
                annotation: PRIMARY_GEO_TAG_ANNOTATION.to_string(),
            });
        }
        Ok(())
    }
}

/// `Gslb` steers DNS traffic for the hosts of an ingress across clusters.
#[derive(CustomResource, Clone, Debug, Serialize, Deserialize, JsonSchema)]
#[kube(
    group = "k8gb.absa.oss",
    version = "v1beta1",
    kind = "Gslb",
    namespaced,
    shortname = "gslb",
    doc = "Gslb resolves the hosts of an embedded ingress specification to the healthy clusters selected by its strategy."
)]
#[kube(status = "GslbStatus")]
#[kube(printcolumn = r#"{"name":"Strategy","type":"string","jsonPath":".spec.strategy.type"}"#)]
#[kube(printcolumn = r#"{"name":"GeoTag","type":"string","jsonPath":".status.geoTag"}"#)]
#[serde(rename_all = "camelCase")]
pub struct GslbSpec {
    /// Ingress rules whose hosts are load balanced.
    pub ingress: IngressSpec,

    /// How DNS answers are chosen for those hosts.
    pub strategy: Strategy,
}

/// Observed state of a `Gslb`, written by the DNS engine.
#[derive(Clone, Debug, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct GslbStatus {
    /// Health of each backend service, keyed by host.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub service_health: BTreeMap<String, String>,

    /// Healthy addresses currently published, keyed by host.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub healthy_records: BTreeMap<String, Vec<String>>,

    /// Geo tag of the cluster that wrote this status.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub geo_tag: Option<String>,

    /// Comma separated list of hosts served.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hosts: Option<String>,
}

impl Gslb {
    /// Hostnames of the embedded ingress rules, in rule order.
    #[must_use]
    pub fn hosts(&self) -> Vec<&str> {
        self.spec
            .ingress
            .rules
            .iter()
            .flatten()
            .filter_map(|rule| rule.host.as_deref())
            .collect()
    }

    /// Returns true if any path of the embedded ingress rules routes to `service`.
    #[must_use]
    pub fn references_service(&self, service: &str) -> bool {
        self.backend_services().any(|name| name == service)
    }

    /// Names of all backend services referenced by the embedded ingress rules.
    pub fn backend_services(&self) -> impl Iterator<Item = &str> {
        self.spec
            .ingress
            .rules
            .iter()
            .flatten()
            .filter_map(|rule| rule.http.as_ref())
            .flat_map(|http| http.paths.iter())
            .filter_map(|path| path.backend.service.as_ref())
            .map(|service| service.name.as_str())
    }
}
