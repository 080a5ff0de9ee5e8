// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Reconciliation entry point for `Gslb` resources.
//!
//! The work of publishing DNS answers belongs to the DNS engine, reached
//! through the [`GslbSync`] trait. This reconciler only guards the engine
//! against specs it cannot act on and records the outcome.

use crate::constants::KIND_GSLB;
use crate::context::Context;
use crate::crd::Gslb;
use crate::gslb_controller::ReconcileError;
use async_trait::async_trait;
use kube::runtime::controller::Action;
use kube::ResourceExt;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, warn};

/// DNS engine boundary: publish the answers a `Gslb` asks for.
#[async_trait]
pub trait GslbSync: Send + Sync {
    /// Bring the DNS state of `gslb` up to date.
    ///
    /// # Errors
    ///
    /// Returns an error if the DNS state could not be updated. The controller
    /// requeues the `Gslb`.
    async fn sync(&self, gslb: &Gslb) -> anyhow::Result<()>;
}

/// [`GslbSync`] that only logs the desired state.
///
/// Used when the controller runs without a DNS engine attached.
#[derive(Clone, Copy, Debug, Default)]
pub struct LoggingSync;

#[async_trait]
impl GslbSync for LoggingSync {
    async fn sync(&self, gslb: &Gslb) -> anyhow::Result<()> {
        info!(
            namespace = ?gslb.namespace(),
            gslb = %gslb.name_any(),
            hosts = ?gslb.hosts(),
            strategy = %gslb.spec.strategy.r#type,
            primary_geo_tag = %gslb.spec.strategy.primary_geo_tag,
            dns_ttl_seconds = gslb.spec.strategy.dns_ttl_seconds,
            "Gslb desired state"
        );
        Ok(())
    }
}

/// Reconcile a `Gslb`.
///
/// A `Gslb` whose strategy is invalid is not handed to the DNS engine and is
/// not requeued: only an edit can fix it, and the edit triggers a new
/// reconciliation.
///
/// # Errors
///
/// Returns an error if the DNS engine fails.
pub async fn reconcile_gslb(gslb: Arc<Gslb>, ctx: Arc<Context>) -> Result<Action, ReconcileError> {
    let start = Instant::now();
    let name = gslb.name_any();
    let namespace = gslb.namespace().unwrap_or_default();

    debug!(namespace = %namespace, gslb = %name, "Reconciling Gslb");

    if let Err(e) = gslb.spec.strategy.validate() {
        warn!(
            namespace = %namespace,
            gslb = %name,
            error = %e,
            "Gslb has an invalid strategy, waiting for a change"
        );
        crate::metrics::record_reconciliation_invalid(KIND_GSLB);
        return Ok(Action::await_change());
    }

    if !gslb.spec.strategy.is_known() {
        warn!(
            namespace = %namespace,
            gslb = %name,
            strategy = %gslb.spec.strategy.r#type,
            "Unknown strategy type, passing it to the DNS engine as is"
        );
    }

    match ctx.sync.sync(&gslb).await {
        Ok(()) => {
            crate::metrics::record_reconciliation_success(KIND_GSLB, start.elapsed());
            debug!(
                namespace = %namespace,
                gslb = %name,
                "Gslb reconciled, requeueing in {}s",
                ctx.reconcile_requeue.as_secs()
            );
            Ok(Action::requeue(ctx.reconcile_requeue))
        }
        Err(e) => {
            crate::metrics::record_reconciliation_error(KIND_GSLB, start.elapsed());
            let e = e.context(format!("failed to sync Gslb {namespace}/{name}"));
            Err(ReconcileError::from(e))
        }
    }
}

#[cfg(test)]
#[path = "gslb_tests.rs"]
mod gslb_tests;
