// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Common label and annotation constants.
//!
//! Annotations on an `Ingress` drive adoption into a `Gslb`. Only the strategy
//! annotation is an opt-in trigger; the others tune the resolved strategy.

// ============================================================================
// Ingress Annotations
// ============================================================================

/// Opt-in trigger. The value names the strategy type (e.g. `roundRobin`, `failover`).
pub const STRATEGY_ANNOTATION: &str = "k8gb.io/strategy";

/// DNS TTL in seconds for the answers served for this Gslb (base-10 integer)
pub const DNS_TTL_SECONDS_ANNOTATION: &str = "k8gb.io/dns-ttl-seconds";

/// Split-brain detection threshold in seconds (base-10 integer)
pub const SPLIT_BRAIN_THRESHOLD_SECONDS_ANNOTATION: &str = "k8gb.io/splitbrain-threshold-seconds";

/// Primary geo tag. Required when the strategy is `failover`.
pub const PRIMARY_GEO_TAG_ANNOTATION: &str = "k8gb.io/primary-geotag";

// ============================================================================
// Kubernetes Standard Labels
// https://kubernetes.io/docs/concepts/overview/working-with-objects/common-labels/
// ============================================================================

/// Standard label for the tool being used to manage the operation of an application
pub const K8S_MANAGED_BY: &str = "app.kubernetes.io/managed-by";

/// Value for `app.kubernetes.io/managed-by` on Gslb resources adopted from an Ingress
pub const MANAGED_BY_GSLB_CONTROLLER: &str = "gslb-controller";
