// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Adoption of annotated `Ingress` objects into `Gslb` resources.
//!
//! An `Ingress` carrying the `k8gb.io/strategy` annotation is turned into a
//! `Gslb` of the same name, with a copy of the ingress rules, the strategy
//! resolved from the annotations and the `Ingress` as controller owner (so the
//! `Gslb` is garbage collected with it).
//!
//! # Flow
//!
//! 1. The ingress watch mapper emits an [`AdoptionCommand`]
//! 2. [`run_adoption_executor`] spawns one task per command
//! 3. [`adopt_from_ingress`] re-reads the `Ingress`, checks for an existing
//!    `Gslb`, resolves the strategy and creates the `Gslb`
//!
//! # Concurrency
//!
//! Commands are delivered at least once and may run concurrently for the same
//! `Ingress`. The existence check is only an optimization; the API server's
//! name uniqueness decides which create wins, and the losers report
//! [`AdoptionOutcome::LostRace`].

use crate::crd::{Gslb, GslbSpec, Strategy};
use crate::errors::{AdoptionError, StoreError};
use crate::labels::{K8S_MANAGED_BY, MANAGED_BY_GSLB_CONTROLLER, STRATEGY_ANNOTATION};
use crate::store::AdoptionStore;
use crate::strategy::resolve_strategy;
use k8s_openapi::api::networking::v1::Ingress;
use k8s_openapi::apimachinery::pkg::apis::meta::v1::OwnerReference;
use kube::{Resource, ResourceExt};
use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::sync::mpsc::UnboundedReceiver;
use tracing::{debug, error, info, warn};

/// Request to adopt one `Ingress`, emitted by the ingress watch mapper.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AdoptionCommand {
    /// Namespace of the `Ingress`
    pub namespace: String,
    /// Name of the `Ingress`, and of the `Gslb` to create
    pub name: String,
    /// Strategy type taken from the `k8gb.io/strategy` annotation
    pub strategy: String,
}

/// How an adoption attempt ended when it did not fail.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AdoptionOutcome {
    /// A new `Gslb` was created.
    Created,
    /// The `Ingress` was deleted before the command ran.
    IngressGone,
    /// A `Gslb` with the same name already existed.
    AlreadyAdopted,
    /// Another adoption created the `Gslb` between our check and our create.
    LostRace,
}

impl AdoptionOutcome {
    /// Metric label for this outcome.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Created => "created",
            Self::IngressGone => "ingress_gone",
            Self::AlreadyAdopted => "already_adopted",
            Self::LostRace => "lost_race",
        }
    }
}

/// Adopt the `Ingress` named by `command` into a `Gslb`.
///
/// Issues at most one create. The `Ingress` itself is never modified.
///
/// # Returns
///
/// - [`AdoptionOutcome::IngressGone`] if the `Ingress` no longer exists
/// - [`AdoptionOutcome::AlreadyAdopted`] if a `Gslb` with the same name exists
/// - [`AdoptionOutcome::LostRace`] if the create reported `AlreadyExists`
/// - [`AdoptionOutcome::Created`] otherwise
///
/// # Errors
///
/// - [`AdoptionError::InvalidStrategy`] if the annotations do not resolve; no `Gslb` is created
/// - [`AdoptionError::Store`] if a get or the create fails for another reason
pub async fn adopt_from_ingress<S>(
    store: &S,
    command: &AdoptionCommand,
) -> Result<AdoptionOutcome, AdoptionError>
where
    S: AdoptionStore + ?Sized,
{
    let namespace = command.namespace.as_str();
    let name = command.name.as_str();

    info!(
        annotation = %format!("({STRATEGY_ANNOTATION}:{})", command.strategy),
        namespace = %namespace,
        ingress = %name,
        "Detected strategy annotation on ingress"
    );

    let Some(ingress) = store.get_ingress(namespace, name).await? else {
        info!(
            namespace = %namespace,
            ingress = %name,
            "Ingress does not exist anymore. Skipping Gslb creation"
        );
        return Ok(AdoptionOutcome::IngressGone);
    };

    if store.get_gslb(namespace, name).await?.is_some() {
        debug!(
            namespace = %namespace,
            gslb = %name,
            "Gslb already exists. Skipping Gslb creation"
        );
        return Ok(AdoptionOutcome::AlreadyAdopted);
    }

    let strategy = resolve_strategy(ingress.annotations(), &command.strategy)?;

    let mut gslb = build_gslb(&ingress, strategy);

    if let Err(e) = set_controller_reference(&ingress, &mut gslb) {
        warn!(
            namespace = %namespace,
            ingress = %name,
            error = %e,
            "Cannot set the Ingress as the owner of the Gslb, creating it without owner"
        );
    }

    info!(
        namespace = %namespace,
        gslb = %name,
        strategy = %gslb.spec.strategy.r#type,
        "Creating a new Gslb out of Ingress with '{STRATEGY_ANNOTATION}' annotation"
    );

    match store.create_gslb(&gslb).await {
        Ok(_) => Ok(AdoptionOutcome::Created),
        Err(StoreError::AlreadyExists { .. }) => {
            debug!(
                namespace = %namespace,
                gslb = %name,
                "Gslb was created concurrently, treating as adopted"
            );
            Ok(AdoptionOutcome::LostRace)
        }
        Err(e) => Err(e.into()),
    }
}

/// Build the `Gslb` for `ingress` with the given strategy.
///
/// Name, namespace and annotations are copied from the `Ingress`; an `Ingress`
/// without a spec yields an empty ingress spec.
#[must_use]
pub fn build_gslb(ingress: &Ingress, strategy: Strategy) -> Gslb {
    let mut gslb = Gslb::new(
        &ingress.name_any(),
        GslbSpec {
            ingress: ingress.spec.clone().unwrap_or_default(),
            strategy,
        },
    );

    gslb.metadata.namespace = ingress.metadata.namespace.clone();
    gslb.metadata.annotations = ingress.metadata.annotations.clone();
    gslb.metadata.labels = Some(BTreeMap::from([(
        K8S_MANAGED_BY.to_string(),
        MANAGED_BY_GSLB_CONTROLLER.to_string(),
    )]));

    gslb
}

/// Make `owner` the controller of `dependent`.
///
/// An existing reference to the same owner is replaced.
///
/// # Errors
///
/// Returns [`AdoptionError::OwnerReference`] if the owner has no uid, lives in a
/// different namespace, or `dependent` is already controlled by another object.
pub fn set_controller_reference(
    owner: &Ingress,
    dependent: &mut Gslb,
) -> Result<(), AdoptionError> {
    let owner_key = format!(
        "{}/{}",
        owner.namespace().unwrap_or_default(),
        owner.name_any()
    );
    let fail = |reason: String| AdoptionError::OwnerReference {
        owner: owner_key.clone(),
        reason,
    };

    let uid = owner
        .metadata
        .uid
        .clone()
        .ok_or_else(|| fail("owner has no uid".to_string()))?;

    if owner.namespace() != dependent.namespace() {
        return Err(fail(format!(
            "cross-namespace owner references are not allowed (dependent namespace {:?})",
            dependent.namespace()
        )));
    }

    let owner_refs = dependent
        .meta_mut()
        .owner_references
        .get_or_insert_with(Vec::new);

    if let Some(existing) = owner_refs
        .iter()
        .find(|r| r.controller == Some(true) && r.uid != uid)
    {
        return Err(fail(format!(
            "already controlled by {} {}",
            existing.kind, existing.name
        )));
    }

    owner_refs.retain(|r| r.uid != uid);
    owner_refs.push(OwnerReference {
        api_version: Ingress::api_version(&()).to_string(),
        kind: Ingress::kind(&()).to_string(),
        name: owner.name_any(),
        uid,
        controller: Some(true),
        block_owner_deletion: Some(true),
    });

    Ok(())
}

/// Run one adoption command and report its result through logs and metrics.
///
/// Nothing is returned: adoption is a side effect of a watch event, and no
/// caller waits for it.
pub async fn handle_adoption_command<S>(store: &S, command: &AdoptionCommand)
where
    S: AdoptionStore + ?Sized,
{
    match adopt_from_ingress(store, command).await {
        Ok(outcome) => {
            if outcome == AdoptionOutcome::Created {
                info!(
                    namespace = %command.namespace,
                    gslb = %command.name,
                    "Gslb created from Ingress"
                );
            } else {
                debug!(
                    namespace = %command.namespace,
                    ingress = %command.name,
                    outcome = outcome.as_str(),
                    "Ingress adoption finished without creating a Gslb"
                );
            }
            crate::metrics::record_adoption(outcome.as_str());
        }
        Err(e @ AdoptionError::InvalidStrategy(_)) => {
            // Terminal until the annotations are edited, which re-triggers adoption
            error!(
                namespace = %command.namespace,
                ingress = %command.name,
                reason = e.status_reason(),
                error = %e,
                "can't parse Gslb strategy"
            );
            crate::metrics::record_adoption(e.status_reason());
        }
        Err(e) => {
            warn!(
                namespace = %command.namespace,
                ingress = %command.name,
                reason = e.status_reason(),
                transient = e.is_transient(),
                error = %e,
                "Gslb creation failed"
            );
            crate::metrics::record_adoption(e.status_reason());
        }
    }
}

/// Consume adoption commands until the channel closes.
///
/// Each command runs in its own task; no ordering is kept between commands.
pub async fn run_adoption_executor<S>(
    store: Arc<S>,
    mut commands: UnboundedReceiver<AdoptionCommand>,
) where
    S: AdoptionStore + 'static,
{
    info!("Starting Ingress adoption executor");

    while let Some(command) = commands.recv().await {
        let store = store.clone();
        tokio::spawn(async move {
            handle_adoption_command(store.as_ref(), &command).await;
        });
    }

    info!("Adoption command channel closed, executor stopping");
}

#[cfg(test)]
#[path = "adoption_tests.rs"]
mod adoption_tests;
