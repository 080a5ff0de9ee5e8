// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Watch mappers that turn `Endpoints` and `Ingress` events into Gslb work.
//!
//! Mappers run synchronously inside the kube runtime for every watch event, so
//! neither of them touches the network:
//!
//! - [`map_endpoints`] reads the reflector cache of `Gslb`s to find the one
//!   whose ingress rules route to the changed service.
//! - [`IngressAnnotationMapper`] never requests a reconcile. It emits an
//!   [`AdoptionCommand`] for annotated ingresses; creating the `Gslb` triggers
//!   its own watch event later.
//!
//! # Example
//!
//! ```rust,no_run
//! use gslb::crd::Gslb;
//! use gslb::reconcilers::mappers::map_endpoints;
//! use k8s_openapi::api::core::v1::Endpoints;
//! use kube::runtime::reflector::Store;
//!
//! # fn example(store: Store<Gslb>, endpoints: Endpoints) {
//! for gslb_ref in map_endpoints(&store, &endpoints) {
//!     println!("Gslb {} routes to this service", gslb_ref.name);
//! }
//! # }
//! ```

use crate::crd::Gslb;
use crate::labels::STRATEGY_ANNOTATION;
use crate::reconcilers::adoption::AdoptionCommand;
use crate::store::GslbLookup;
use k8s_openapi::api::core::v1::Endpoints;
use k8s_openapi::api::networking::v1::Ingress;
use kube::runtime::reflector::ObjectRef;
use kube::ResourceExt;
use tokio::sync::mpsc::UnboundedSender;
use tracing::{debug, warn};

/// Find the `Gslb` whose ingress rules route to the service behind `endpoints`.
///
/// Scans every `Gslb` in the namespace of `endpoints`. When several of them
/// reference the service, the last one in scan order is returned; the scan
/// order of the cache is not stable, so no caller may rely on which one wins.
///
/// # Returns
///
/// Zero or one `ObjectRef<Gslb>`. A failing lookup is logged and yields none:
/// the next change of the endpoints re-triggers the mapping.
pub fn map_endpoints<L>(lookup: &L, endpoints: &Endpoints) -> Vec<ObjectRef<Gslb>>
where
    L: GslbLookup + ?Sized,
{
    let namespace = endpoints.namespace();
    let service = endpoints.metadata.name.as_deref();
    let (Some(namespace), Some(service)) = (namespace, service) else {
        return vec![];
    };

    let gslbs = match lookup.gslbs_in_namespace(&namespace) {
        Ok(gslbs) => gslbs,
        Err(e) => {
            warn!(
                namespace = %namespace,
                service = %service,
                error = %e,
                "Can't fetch Gslb objects, skipping endpoints change"
            );
            crate::metrics::record_endpoint_mapping("lookup_error");
            return vec![];
        }
    };

    let matching: Vec<_> = gslbs
        .iter()
        .filter(|gslb| gslb.references_service(service))
        .collect();

    if matching.len() > 1 {
        debug!(
            namespace = %namespace,
            service = %service,
            gslbs = ?matching.iter().map(|g| g.name_any()).collect::<Vec<_>>(),
            "Several Gslbs route to the same service, picking the last one"
        );
    }

    match matching.last() {
        Some(gslb) => {
            crate::metrics::record_endpoint_mapping("matched");
            vec![ObjectRef::new(&gslb.name_any()).within(&namespace)]
        }
        None => {
            crate::metrics::record_endpoint_mapping("unmatched");
            vec![]
        }
    }
}

/// Build the adoption command for `ingress` if it opts in.
///
/// The strategy annotation value is passed through verbatim; it is validated
/// when the command runs.
#[must_use]
pub fn map_ingress(ingress: &Ingress) -> Option<AdoptionCommand> {
    let strategy = ingress.annotations().get(STRATEGY_ANNOTATION)?;
    let namespace = ingress.namespace()?;
    let name = ingress.metadata.name.clone()?;

    Some(AdoptionCommand {
        namespace,
        name,
        strategy: strategy.clone(),
    })
}

/// Ingress watch mapper that hands adoption work to the adoption executor.
#[derive(Clone)]
pub struct IngressAnnotationMapper {
    commands: UnboundedSender<AdoptionCommand>,
}

impl IngressAnnotationMapper {
    /// Create a mapper that sends commands to `commands`.
    #[must_use]
    pub fn new(commands: UnboundedSender<AdoptionCommand>) -> Self {
        Self { commands }
    }

    /// Emit an adoption command for `ingress` when it carries the strategy annotation.
    ///
    /// Always returns an empty list: the created `Gslb` is reconciled through
    /// its own watch event.
    pub fn map(&self, ingress: &Ingress) -> Vec<ObjectRef<Gslb>> {
        if let Some(command) = map_ingress(ingress) {
            debug!(
                namespace = %command.namespace,
                ingress = %command.name,
                strategy = %command.strategy,
                "Queueing Gslb adoption for annotated ingress"
            );
            crate::metrics::record_adoption_command(&command.strategy);

            if let Err(e) = self.commands.send(command) {
                warn!(
                    namespace = %e.0.namespace,
                    ingress = %e.0.name,
                    "Adoption executor is gone, dropping adoption command"
                );
            }
        }

        vec![]
    }
}

#[cfg(test)]
#[path = "mappers_tests.rs"]
mod mappers_tests;
