// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Integration tests for Ingress adoption against a live cluster.
//!
//! The `Gslb` CRD must be installed (`cargo run --bin crdgen` then
//! `kubectl apply -f deploy/crds/`).
//!
//! Run with: cargo test --test adoption_integration -- --ignored

mod common;

use common::{
    cleanup_test_namespace, create_annotated_ingress, create_test_namespace,
    get_kube_client_or_skip, wait_for_ready,
};
use gslb::crd::Gslb;
use gslb::reconcilers::{adopt_from_ingress, AdoptionCommand, AdoptionOutcome};
use gslb::store::KubeStore;
use kube::api::Api;
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;

const TEST_NAMESPACE: &str = "gslb-adoption-test";

#[tokio::test]
#[ignore = "requires a Kubernetes cluster with the Gslb CRD installed"]
async fn test_adopt_annotated_ingress() {
    let Some(client) = get_kube_client_or_skip().await else {
        return;
    };

    create_test_namespace(&client, TEST_NAMESPACE)
        .await
        .expect("Failed to create test namespace");

    let ingress = create_annotated_ingress(
        &client,
        TEST_NAMESPACE,
        "frontend",
        "frontend.cloud.example.com",
        "frontend-svc",
        json!({
            "k8gb.io/strategy": "failover",
            "k8gb.io/primary-geotag": "eu",
            "k8gb.io/dns-ttl-seconds": "30"
        }),
    )
    .await
    .expect("Failed to create Ingress");

    let store = KubeStore::new(client.clone());
    let command = AdoptionCommand {
        namespace: TEST_NAMESPACE.to_string(),
        name: "frontend".to_string(),
        strategy: "failover".to_string(),
    };

    let first = adopt_from_ingress(&store, &command)
        .await
        .expect("First adoption should succeed");
    let second = adopt_from_ingress(&store, &command)
        .await
        .expect("Second adoption should succeed");

    assert_eq!(first, AdoptionOutcome::Created);
    assert_eq!(second, AdoptionOutcome::AlreadyAdopted);

    let gslbs: Api<Gslb> = Api::namespaced(client.clone(), TEST_NAMESPACE);
    let gslb = gslbs.get("frontend").await.expect("Gslb should exist");

    assert_eq!(gslb.spec.strategy.primary_geo_tag, "eu");
    assert_eq!(gslb.spec.strategy.dns_ttl_seconds, 30);
    assert!(gslb.references_service("frontend-svc"));

    let owner = gslb
        .metadata
        .owner_references
        .and_then(|refs| refs.into_iter().next())
        .expect("Gslb should be owned by the Ingress");
    assert_eq!(Some(owner.uid), ingress.metadata.uid);

    let _ = cleanup_test_namespace(&client, TEST_NAMESPACE).await;
}

#[tokio::test]
#[ignore = "requires a Kubernetes cluster with the Gslb CRD installed"]
async fn test_concurrent_adoptions_create_one_gslb() {
    const NAMESPACE: &str = "gslb-adoption-race-test";

    let Some(client) = get_kube_client_or_skip().await else {
        return;
    };

    create_test_namespace(&client, NAMESPACE)
        .await
        .expect("Failed to create test namespace");

    create_annotated_ingress(
        &client,
        NAMESPACE,
        "racy",
        "racy.cloud.example.com",
        "racy-svc",
        json!({ "k8gb.io/strategy": "roundRobin" }),
    )
    .await
    .expect("Failed to create Ingress");

    let store = Arc::new(KubeStore::new(client.clone()));
    let handles: Vec<_> = (0..5)
        .map(|_| {
            let store = store.clone();
            tokio::spawn(async move {
                let command = AdoptionCommand {
                    namespace: NAMESPACE.to_string(),
                    name: "racy".to_string(),
                    strategy: "roundRobin".to_string(),
                };
                adopt_from_ingress(store.as_ref(), &command).await
            })
        })
        .collect();

    let mut created = 0;
    for handle in handles {
        let outcome = handle
            .await
            .expect("task should not panic")
            .expect("adoption should not fail");
        if outcome == AdoptionOutcome::Created {
            created += 1;
        }
    }
    assert_eq!(created, 1, "Exactly one adoption may create the Gslb");

    wait_for_ready(Duration::from_secs(1)).await;

    let gslbs: Api<Gslb> = Api::namespaced(client.clone(), NAMESPACE);
    let list = gslbs
        .list(&kube::api::ListParams::default())
        .await
        .expect("Failed to list Gslbs");
    assert_eq!(list.items.len(), 1);

    let _ = cleanup_test_namespace(&client, NAMESPACE).await;
}
