// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Gslb controller wiring.
//!
//! The controller reconciles `Gslb` resources and is triggered by:
//!
//! - changes to the `Gslb` itself
//! - changes to `Endpoints` of a service referenced by a `Gslb`
//!   ([`map_endpoints`](crate::reconcilers::mappers::map_endpoints))
//! - changes to any `Ingress`, which may emit an adoption command
//!   ([`IngressAnnotationMapper`](crate::reconcilers::mappers::IngressAnnotationMapper))

use crate::constants::ERROR_REQUEUE_DURATION_SECS;
use crate::constants::KIND_GSLB;
use crate::context::Context;
use crate::crd::Gslb;
use crate::reconcilers::adoption::AdoptionCommand;
use crate::reconcilers::gslb::reconcile_gslb;
use crate::reconcilers::mappers::{map_endpoints, IngressAnnotationMapper};
use anyhow::Result;
use futures::StreamExt;
use k8s_openapi::api::core::v1::Endpoints;
use k8s_openapi::api::networking::v1::Ingress;
use kube::runtime::controller::Action;
use kube::runtime::watcher::Config as WatcherConfig;
use kube::runtime::Controller;
use kube::{Api, Client, ResourceExt};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc::UnboundedSender;
use tracing::{debug, error, info, warn};

/// Reconciliation error wrapper
#[derive(Debug, thiserror::Error)]
#[error(transparent)]
pub struct ReconcileError(#[from] anyhow::Error);

/// Error policy for the Gslb controller.
///
/// Returns an action to requeue the resource after a delay when reconciliation fails.
#[allow(clippy::needless_pass_by_value)] // Signature required by kube::runtime::Controller
pub fn error_policy(gslb: Arc<Gslb>, err: &ReconcileError, _ctx: Arc<Context>) -> Action {
    error!(
        error = %err,
        namespace = ?gslb.namespace(),
        gslb = %gslb.name_any(),
        "Reconciliation error - will retry in {}s",
        ERROR_REQUEUE_DURATION_SECS
    );
    crate::metrics::record_reconciliation_error(KIND_GSLB, Duration::ZERO);
    Action::requeue(Duration::from_secs(ERROR_REQUEUE_DURATION_SECS))
}

/// Run the Gslb controller until its watch streams end.
///
/// Adoption commands from the ingress mapper are sent to `adoptions`; the
/// caller runs the executor that consumes them.
///
/// # Errors
///
/// Returns an error if the controller fails to start.
pub async fn run_gslb_controller(
    client: Client,
    context: Arc<Context>,
    adoptions: UnboundedSender<AdoptionCommand>,
) -> Result<()> {
    info!("Starting Gslb controller");

    let gslb_api = Api::<Gslb>::all(client.clone());
    // Adopted Gslbs are owned by their Ingress, never the reverse, so Ingress
    // events only reach the adoption mapper
    let ingress_api = Api::<Ingress>::all(client.clone());
    let endpoints_api = Api::<Endpoints>::all(client);

    let watcher_config = WatcherConfig::default();

    let controller = Controller::new(gslb_api, watcher_config.clone());
    // Reflector cache of all Gslbs, shared with the endpoints mapper
    let gslbs = controller.store();
    let ingress_mapper = IngressAnnotationMapper::new(adoptions);

    controller
        .watches(endpoints_api, watcher_config.clone(), move |endpoints| {
            map_endpoints(&gslbs, &endpoints)
        })
        .watches(ingress_api, watcher_config, move |ingress| {
            ingress_mapper.map(&ingress)
        })
        .shutdown_on_signal()
        .run(reconcile_gslb, error_policy, context)
        .for_each(|result| {
            match result {
                Ok((gslb_ref, _action)) => {
                    debug!(gslb = %gslb_ref, "Reconciled Gslb");
                }
                Err(e) => {
                    warn!(error = %e, "Gslb controller reported an error");
                }
            }
            futures::future::ready(())
        })
        .await;

    info!("Gslb controller stopped");

    Ok(())
}
