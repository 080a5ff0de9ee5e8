// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Global constants for the Gslb controller.
//!
//! This module contains all numeric and string constants used throughout the codebase.
//! Constants are organized by category for easy maintenance.

// ============================================================================
// API Constants
// ============================================================================

/// API group of the `Gslb` CRD
pub const API_GROUP: &str = "k8gb.absa.oss";

/// API version of the `Gslb` CRD
pub const API_VERSION: &str = "v1beta1";

/// Kind name for `Gslb` resource
pub const KIND_GSLB: &str = "Gslb";

/// Kind name for networking.k8s.io `Ingress`
pub const KIND_INGRESS: &str = "Ingress";

/// Field manager used for writes issued by this controller
pub const FIELD_MANAGER: &str = "gslb-controller";

// ============================================================================
// Strategy Constants
// ============================================================================

/// Round-robin strategy: answer with all healthy clusters
pub const ROUND_ROBIN_STRATEGY: &str = "roundRobin";

/// Failover strategy: answer with the primary geo tag while it is healthy
pub const FAILOVER_STRATEGY: &str = "failover";

/// Geo-IP strategy: answer with the cluster closest to the resolver
pub const GEOIP_STRATEGY: &str = "geoip";

/// Strategy types the DNS engine understands
pub const KNOWN_STRATEGIES: [&str; 3] = [ROUND_ROBIN_STRATEGY, FAILOVER_STRATEGY, GEOIP_STRATEGY];

// ============================================================================
// Controller Timing Constants
// ============================================================================

/// Requeue interval after a successful reconciliation (5 minutes)
pub const DEFAULT_RECONCILE_REQUEUE_SECS: u64 = 300;

/// Requeue interval after a failed reconciliation (30 seconds)
pub const ERROR_REQUEUE_DURATION_SECS: u64 = 30;

// ============================================================================
// Runtime Constants
// ============================================================================

/// Number of tokio worker threads
pub const DEFAULT_WORKER_THREADS: usize = 4;

/// Name given to tokio worker threads
pub const WORKER_THREAD_NAME: &str = "gslb-controller";

/// Default bind address for the metrics and health endpoint
pub const DEFAULT_METRICS_ADDR: &str = "0.0.0.0:8080";

/// HTTP status code returned by the API server when a resource already exists
pub const HTTP_CONFLICT: u16 = 409;

/// HTTP status code for rate limiting
pub const HTTP_TOO_MANY_REQUESTS: u16 = 429;
