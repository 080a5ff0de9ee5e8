// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Seams between the controller logic and the Kubernetes object store.
//!
//! Two traits split store access by calling context:
//!
//! - [`GslbLookup`] is synchronous. Watch mappers run inside the kube runtime
//!   and must not block on the network, so they read the reflector cache of
//!   the `Gslb` controller. A maintained index can implement it without
//!   changing callers.
//! - [`AdoptionStore`] is async and talks to the API server. Adoption needs
//!   fresh reads and a create that the API server arbitrates.
//!
//! [`KubeStore`] implements [`AdoptionStore`] over a `kube::Client`;
//! [`MockStore`] is an in-memory implementation used by tests.

pub mod mock;

pub use mock::MockStore;

use crate::constants::{FIELD_MANAGER, KIND_GSLB, KIND_INGRESS};
use crate::crd::Gslb;
use crate::errors::StoreError;
use async_trait::async_trait;
use k8s_openapi::api::networking::v1::Ingress;
use kube::api::PostParams;
use kube::runtime::reflector::Store;
use kube::{Api, Client, ResourceExt};
use std::sync::Arc;

/// List access to the `Gslb` resources of a namespace.
pub trait GslbLookup {
    /// All `Gslb`s in `namespace`.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing list operation fails.
    fn gslbs_in_namespace(&self, namespace: &str) -> Result<Vec<Arc<Gslb>>, StoreError>;
}

impl GslbLookup for Store<Gslb> {
    fn gslbs_in_namespace(&self, namespace: &str) -> Result<Vec<Arc<Gslb>>, StoreError> {
        Ok(self
            .state()
            .into_iter()
            .filter(|gslb| gslb.namespace().as_deref() == Some(namespace))
            .collect())
    }
}

/// Reads and writes needed to adopt an `Ingress` into a `Gslb`.
///
/// Not-found is `Ok(None)`. None of the calls are atomic with respect to each
/// other.
#[async_trait]
pub trait AdoptionStore: Send + Sync {
    /// Fetch an `Ingress` by namespace and name.
    async fn get_ingress(&self, namespace: &str, name: &str) -> Result<Option<Ingress>, StoreError>;

    /// Fetch a `Gslb` by namespace and name.
    async fn get_gslb(&self, namespace: &str, name: &str) -> Result<Option<Gslb>, StoreError>;

    /// Create a `Gslb`. A name collision is [`StoreError::AlreadyExists`].
    async fn create_gslb(&self, gslb: &Gslb) -> Result<Gslb, StoreError>;
}

/// [`AdoptionStore`] backed by the Kubernetes API server.
#[derive(Clone)]
pub struct KubeStore {
    client: Client,
}

impl KubeStore {
    /// Create a store that issues calls with `client`.
    #[must_use]
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl AdoptionStore for KubeStore {
    async fn get_ingress(
        &self,
        namespace: &str,
        name: &str,
    ) -> Result<Option<Ingress>, StoreError> {
        let api: Api<Ingress> = Api::namespaced(self.client.clone(), namespace);
        api.get_opt(name)
            .await
            .map_err(|e| StoreError::from_kube(e, "get", KIND_INGRESS, namespace, name))
    }

    async fn get_gslb(&self, namespace: &str, name: &str) -> Result<Option<Gslb>, StoreError> {
        let api: Api<Gslb> = Api::namespaced(self.client.clone(), namespace);
        api.get_opt(name)
            .await
            .map_err(|e| StoreError::from_kube(e, "get", KIND_GSLB, namespace, name))
    }

    async fn create_gslb(&self, gslb: &Gslb) -> Result<Gslb, StoreError> {
        let namespace = gslb.namespace().unwrap_or_default();
        let name = gslb.name_any();
        let api: Api<Gslb> = Api::namespaced(self.client.clone(), &namespace);
        let params = PostParams {
            field_manager: Some(FIELD_MANAGER.to_string()),
            ..Default::default()
        };

        api.create(&params, gslb)
            .await
            .map_err(|e| StoreError::from_kube(e, "create", KIND_GSLB, &namespace, &name))
    }
}
