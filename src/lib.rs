// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

#![allow(unexpected_cfgs)]

//! # Gslb - reconcile triggers and Ingress adoption
//!
//! This library is the event-routing half of a DNS-based global server load
//! balancer for Kubernetes. It decides when a [`Gslb`](crd::Gslb) must be
//! re-evaluated and creates `Gslb` resources for `Ingress` objects that opt in
//! through annotations.
//!
//! ## Overview
//!
//! - `Endpoints` changes are mapped back to the `Gslb` whose ingress rules
//!   route to the changed service
//! - `Ingress` objects annotated with `k8gb.io/strategy` are adopted into a
//!   `Gslb` of the same name, owned by the `Ingress`
//! - Strategy annotations are resolved into a typed [`Strategy`](crd::Strategy)
//!
//! ## Modules
//!
//! - [`crd`] - The `Gslb` Custom Resource Definition
//! - [`strategy`] - Annotation to strategy resolution
//! - [`reconcilers`] - Watch mappers, adoption and the `Gslb` reconciler
//! - [`store`] - Object store seams used by mappers and adoption
//! - [`gslb_controller`] - Controller wiring
//! - [`errors`] - Error types
//! - [`metrics`] - Prometheus metrics
//!
//! ## Example
//!
//! ```rust
//! use gslb::strategy::resolve_strategy;
//! use std::collections::BTreeMap;
//!
//! let annotations = BTreeMap::from([
//!     ("k8gb.io/strategy".to_string(), "roundRobin".to_string()),
//!     ("k8gb.io/dns-ttl-seconds".to_string(), "30".to_string()),
//! ]);
//!
//! let strategy = resolve_strategy(&annotations, "roundRobin").unwrap();
//! assert_eq!(strategy.dns_ttl_seconds, 30);
//! ```

pub mod constants;
pub mod context;
pub mod crd;
pub mod errors;
pub mod gslb_controller;
pub mod labels;
pub mod metrics;
pub mod reconcilers;
pub mod store;
pub mod strategy;
