// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Reconciliation triggers and reconcilers for `Gslb` resources.
//!
//! # Reconciliation Architecture
//!
//! 1. **Watch** - `Gslb`, `Ingress` and `Endpoints` changes arrive from the kube runtime
//! 2. **Map** - [`mappers`] turn `Endpoints` and `Ingress` events into `Gslb` work
//! 3. **Adopt** - [`adoption`] creates a `Gslb` for each annotated `Ingress`
//! 4. **Reconcile** - [`gslb`] hands valid `Gslb`s to the DNS engine
//!
//! # Available Reconcilers
//!
//! - [`reconcile_gslb`] - Validates a `Gslb` and syncs it through the DNS engine
//! - [`adopt_from_ingress`] - Creates a `Gslb` from an annotated `Ingress`
//!
//! # Example: Adopting an Ingress
//!
//! ```rust,no_run
//! use gslb::reconcilers::{adopt_from_ingress, AdoptionCommand};
//! use gslb::store::KubeStore;
//! use kube::Client;
//!
//! async fn adopt(client: Client) -> anyhow::Result<()> {
//!     let store = KubeStore::new(client);
//!     let command = AdoptionCommand {
//!         namespace: "shop".to_string(),
//!         name: "frontend".to_string(),
//!         strategy: "roundRobin".to_string(),
//!     };
//!
//!     let outcome = adopt_from_ingress(&store, &command).await?;
//!     println!("adoption finished: {}", outcome.as_str());
//!     Ok(())
//! }
//! ```

pub mod adoption;
pub mod gslb;
pub mod mappers;

pub use adoption::{adopt_from_ingress, AdoptionCommand, AdoptionOutcome};
pub use gslb::{reconcile_gslb, GslbSync, LoggingSync};
pub use mappers::{map_endpoints, map_ingress, IngressAnnotationMapper};
