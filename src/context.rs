// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Shared context for the Gslb controller.
//!
//! The controller receives an `Arc<Context>` on every reconciliation. The
//! watch mappers do not use it: they capture the controller's reflector store
//! and the adoption command sender directly, because the kube runtime calls
//! them without a context.

use crate::constants::DEFAULT_RECONCILE_REQUEUE_SECS;
use crate::reconcilers::gslb::GslbSync;
use std::sync::Arc;
use std::time::Duration;

/// Shared context passed to `Gslb` reconciliations.
#[derive(Clone)]
pub struct Context {
    /// DNS engine that turns a `Gslb` into published records
    pub sync: Arc<dyn GslbSync>,

    /// Requeue interval after a successful reconciliation
    pub reconcile_requeue: Duration,
}

impl Context {
    /// Create a context with the default requeue interval.
    #[must_use]
    pub fn new(sync: Arc<dyn GslbSync>) -> Self {
        Self {
            sync,
            reconcile_requeue: Duration::from_secs(DEFAULT_RECONCILE_REQUEUE_SECS),
        }
    }

    /// Override the requeue interval after a successful reconciliation.
    #[must_use]
    pub fn with_reconcile_requeue(mut self, requeue: Duration) -> Self {
        self.reconcile_requeue = requeue;
        self
    }
}
