// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Prometheus metrics for the Gslb controller.
//!
//! All metrics carry the prefix `k8gb_absa_oss_` (prometheus-safe version of
//! "k8gb.absa.oss").
//!
//! # Metrics Categories
//!
//! - **Reconciliation Metrics** - Gslb reconciliations and their outcomes
//! - **Trigger Metrics** - What endpoint and ingress events turned into
//! - **Adoption Metrics** - Outcomes of Ingress adoption attempts
//!
//! # Example
//!
//! ```rust,no_run
//! use gslb::metrics::record_adoption;
//!
//! record_adoption("created");
//! ```

use prometheus::{CounterVec, Encoder, HistogramOpts, HistogramVec, Opts, Registry, TextEncoder};
use std::sync::LazyLock;
use std::time::Duration;

// ============================================================================
// Metric Name Constants
// ============================================================================

/// Namespace prefix for all metrics (prometheus-safe)
const METRICS_NAMESPACE: &str = "k8gb_absa_oss";

// ============================================================================
// Global Metrics Registry
// ============================================================================

/// Global Prometheus metrics registry
///
/// All metrics are registered in this registry and exposed via `/metrics` endpoint.
pub static METRICS_REGISTRY: LazyLock<Registry> = LazyLock::new(Registry::new);

// ============================================================================
// Reconciliation Metrics
// ============================================================================

/// Total number of reconciliations by resource type and status
///
/// Labels:
/// - `resource_type`: Kind of resource (`Gslb`)
/// - `status`: Outcome (`success`, `error`, `invalid`)
pub static RECONCILIATION_TOTAL: LazyLock<CounterVec> = LazyLock::new(|| {
    let opts = Opts::new(
        format!("{METRICS_NAMESPACE}_reconciliations_total"),
        "Total number of reconciliations by resource type and status",
    );
    let counter = CounterVec::new(opts, &["resource_type", "status"]).unwrap();
    METRICS_REGISTRY
        .register(Box::new(counter.clone()))
        .unwrap();
    counter
});

/// Duration of reconciliations in seconds
///
/// Labels:
/// - `resource_type`: Kind of resource
pub static RECONCILIATION_DURATION_SECONDS: LazyLock<HistogramVec> = LazyLock::new(|| {
    let opts = HistogramOpts::new(
        format!("{METRICS_NAMESPACE}_reconciliation_duration_seconds"),
        "Duration of reconciliations in seconds by resource type",
    )
    .buckets(vec![0.001, 0.01, 0.1, 0.5, 1.0, 2.0, 5.0, 10.0, 30.0, 60.0]);
    let histogram = HistogramVec::new(opts, &["resource_type"]).unwrap();
    METRICS_REGISTRY
        .register(Box::new(histogram.clone()))
        .unwrap();
    histogram
});

// ============================================================================
// Trigger Metrics
// ============================================================================

/// Endpoint change events by mapping result
///
/// Labels:
/// - `result`: `matched`, `unmatched`, `lookup_error`
pub static ENDPOINT_MAPPINGS_TOTAL: LazyLock<CounterVec> = LazyLock::new(|| {
    let opts = Opts::new(
        format!("{METRICS_NAMESPACE}_endpoint_mappings_total"),
        "Endpoint change events by mapping result",
    );
    let counter = CounterVec::new(opts, &["result"]).unwrap();
    METRICS_REGISTRY
        .register(Box::new(counter.clone()))
        .unwrap();
    counter
});

/// Adoption commands emitted for annotated ingresses
///
/// Labels:
/// - `strategy`: Strategy type named by the annotation
pub static ADOPTION_COMMANDS_TOTAL: LazyLock<CounterVec> = LazyLock::new(|| {
    let opts = Opts::new(
        format!("{METRICS_NAMESPACE}_adoption_commands_total"),
        "Adoption commands emitted for ingresses carrying the strategy annotation",
    );
    let counter = CounterVec::new(opts, &["strategy"]).unwrap();
    METRICS_REGISTRY
        .register(Box::new(counter.clone()))
        .unwrap();
    counter
});

// ============================================================================
// Adoption Metrics
// ============================================================================

/// Adoption attempts by outcome
///
/// Labels:
/// - `outcome`: `created`, `ingress_gone`, `already_adopted`, `lost_race`, or an error reason
pub static ADOPTIONS_TOTAL: LazyLock<CounterVec> = LazyLock::new(|| {
    let opts = Opts::new(
        format!("{METRICS_NAMESPACE}_adoptions_total"),
        "Ingress adoption attempts by outcome",
    );
    let counter = CounterVec::new(opts, &["outcome"]).unwrap();
    METRICS_REGISTRY
        .register(Box::new(counter.clone()))
        .unwrap();
    counter
});

// ============================================================================
// Helper Functions
// ============================================================================

/// Record a successful reconciliation
///
/// # Arguments
/// * `resource_type` - The kind of resource reconciled
/// * `duration` - Duration of the reconciliation
pub fn record_reconciliation_success(resource_type: &str, duration: Duration) {
    RECONCILIATION_TOTAL
        .with_label_values(&[resource_type, "success"])
        .inc();
    RECONCILIATION_DURATION_SECONDS
        .with_label_values(&[resource_type])
        .observe(duration.as_secs_f64());
}

/// Record a failed reconciliation
///
/// # Arguments
/// * `resource_type` - The kind of resource reconciled
/// * `duration` - Duration of the reconciliation before failure
pub fn record_reconciliation_error(resource_type: &str, duration: Duration) {
    RECONCILIATION_TOTAL
        .with_label_values(&[resource_type, "error"])
        .inc();
    RECONCILIATION_DURATION_SECONDS
        .with_label_values(&[resource_type])
        .observe(duration.as_secs_f64());
}

/// Record a reconciliation skipped because the stored spec is invalid
pub fn record_reconciliation_invalid(resource_type: &str) {
    RECONCILIATION_TOTAL
        .with_label_values(&[resource_type, "invalid"])
        .inc();
}

/// Record the result of mapping an endpoint change event
pub fn record_endpoint_mapping(result: &str) {
    ENDPOINT_MAPPINGS_TOTAL.with_label_values(&[result]).inc();
}

/// Record an adoption command emitted by the ingress mapper
pub fn record_adoption_command(strategy: &str) {
    ADOPTION_COMMANDS_TOTAL.with_label_values(&[strategy]).inc();
}

/// Record the outcome of an adoption attempt
pub fn record_adoption(outcome: &str) {
    ADOPTIONS_TOTAL.with_label_values(&[outcome]).inc();
}

/// Gather and encode all metrics in Prometheus text format
///
/// # Errors
/// Returns error if encoding fails
pub fn gather_metrics() -> Result<String, prometheus::Error> {
    let encoder = TextEncoder::new();
    let metric_families = METRICS_REGISTRY.gather();
    let mut buffer = Vec::new();
    encoder.encode(&metric_families, &mut buffer)?;
    String::from_utf8(buffer).map_err(|e| prometheus::Error::Msg(format!("UTF-8 error: {e}")))
}
