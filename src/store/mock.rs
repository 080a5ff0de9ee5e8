// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! In-memory [`AdoptionStore`](super::AdoptionStore) for tests.
//!
//! `Gslb` names are unique per namespace, as on the API server: a second create
//! for the same name fails with [`StoreError::AlreadyExists`]. The lock is held
//! for a single call only, so concurrent callers interleave the way they would
//! against a real API server.

use super::AdoptionStore;
use crate::constants::KIND_GSLB;
use crate::crd::Gslb;
use crate::errors::StoreError;
use async_trait::async_trait;
use k8s_openapi::api::networking::v1::Ingress;
use kube::ResourceExt;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::{Barrier, RwLock};
use tracing::debug;

type Key = (String, String);

/// In-memory object store
#[derive(Default)]
pub struct MockStore {
    ingresses: RwLock<BTreeMap<Key, Ingress>>,
    gslbs: RwLock<BTreeMap<Key, Gslb>>,
    create_calls: AtomicUsize,
    get_error: RwLock<Option<StoreError>>,
    gslb_get_error: RwLock<Option<StoreError>>,
    check_barrier: Option<Arc<Barrier>>,
}

impl MockStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Hold every `get_gslb` caller after its read until `callers` of them have read.
    ///
    /// Forces concurrent adoptions to all pass the existence check before any
    /// of them creates.
    #[must_use]
    pub fn with_check_barrier(mut self, callers: usize) -> Self {
        self.check_barrier = Some(Arc::new(Barrier::new(callers)));
        self
    }

    /// Make every subsequent get call fail with `err`.
    pub async fn fail_gets(&self, err: StoreError) {
        *self.get_error.write().await = Some(err);
    }

    /// Make every subsequent `get_gslb` call fail with `err`; `get_ingress` is unaffected.
    pub async fn fail_gslb_gets(&self, err: StoreError) {
        *self.gslb_get_error.write().await = Some(err);
    }

    pub async fn insert_ingress(&self, ingress: Ingress) {
        let key = (ingress.namespace().unwrap_or_default(), ingress.name_any());
        self.ingresses.write().await.insert(key, ingress);
    }

    pub async fn remove_ingress(&self, namespace: &str, name: &str) {
        self.ingresses
            .write()
            .await
            .remove(&(namespace.to_string(), name.to_string()));
    }

    /// Number of `Gslb`s stored in `namespace`.
    pub async fn gslb_count(&self, namespace: &str) -> usize {
        self.gslbs
            .read()
            .await
            .keys()
            .filter(|(ns, _)| ns == namespace)
            .count()
    }

    /// Number of create calls received, successful or not.
    pub fn create_calls(&self) -> usize {
        self.create_calls.load(Ordering::SeqCst)
    }

    async fn injected_error(&self) -> Result<(), StoreError> {
        match self.get_error.read().await.as_ref() {
            Some(err) => Err(err.clone()),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl AdoptionStore for MockStore {
    async fn get_ingress(
        &self,
        namespace: &str,
        name: &str,
    ) -> Result<Option<Ingress>, StoreError> {
        self.injected_error().await?;
        Ok(self
            .ingresses
            .read()
            .await
            .get(&(namespace.to_string(), name.to_string()))
            .cloned())
    }

    async fn get_gslb(&self, namespace: &str, name: &str) -> Result<Option<Gslb>, StoreError> {
        self.injected_error().await?;
        if let Some(err) = self.gslb_get_error.read().await.as_ref() {
            return Err(err.clone());
        }
        let found = self
            .gslbs
            .read()
            .await
            .get(&(namespace.to_string(), name.to_string()))
            .cloned();

        if let Some(barrier) = &self.check_barrier {
            barrier.wait().await;
        }

        Ok(found)
    }

    async fn create_gslb(&self, gslb: &Gslb) -> Result<Gslb, StoreError> {
        self.create_calls.fetch_add(1, Ordering::SeqCst);
        let namespace = gslb.namespace().unwrap_or_default();
        let name = gslb.name_any();

        let mut gslbs = self.gslbs.write().await;
        if gslbs.contains_key(&(namespace.clone(), name.clone())) {
            return Err(StoreError::AlreadyExists {
                kind: KIND_GSLB.to_string(),
                namespace,
                name,
            });
        }

        let mut created = gslb.clone();
        created.metadata.uid = Some(format!("gslb-{namespace}-{name}"));
        created.metadata.resource_version = Some("1".to_string());
        gslbs.insert((namespace, name), created.clone());
        debug!("Mock: gslb created: {}", created.name_any());
        Ok(created)
    }
}
