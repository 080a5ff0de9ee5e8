// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

use anyhow::Result;
use axum::{http::StatusCode, routing::get, Router};
use clap::{Parser, ValueEnum};
use gslb::{
    constants::{
        DEFAULT_METRICS_ADDR, DEFAULT_RECONCILE_REQUEUE_SECS, DEFAULT_WORKER_THREADS,
        WORKER_THREAD_NAME,
    },
    context::Context,
    gslb_controller::run_gslb_controller,
    metrics::gather_metrics,
    reconcilers::{adoption::run_adoption_executor, gslb::LoggingSync},
    store::KubeStore,
};
use kube::Client;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error, info};

/// Log output format
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum LogFormat {
    Text,
    Json,
}

/// Gslb controller: reconcile triggers and Ingress adoption
#[derive(Debug, Parser)]
#[command(name = "gslb-controller", version, about)]
struct Cli {
    /// Log output format. Falls back to RUST_LOG_FORMAT, then text.
    #[arg(long, value_enum)]
    log_format: Option<LogFormat>,

    /// Address serving /metrics and /healthz
    #[arg(long, default_value = DEFAULT_METRICS_ADDR)]
    metrics_addr: SocketAddr,

    /// Seconds between reconciliations of a healthy Gslb
    #[arg(long, default_value_t = DEFAULT_RECONCILE_REQUEUE_SECS)]
    reconcile_requeue_secs: u64,

    /// Number of tokio worker threads
    #[arg(long, default_value_t = DEFAULT_WORKER_THREADS)]
    worker_threads: usize,
}

impl Cli {
    fn resolved_log_format(&self) -> LogFormat {
        if let Some(format) = self.log_format {
            return format;
        }

        let log_format = std::env::var("RUST_LOG_FORMAT").unwrap_or_default();

        match log_format.to_lowercase().as_str() {
            "json" => LogFormat::Json,
            _ => LogFormat::Text,
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Build Tokio runtime with custom thread names
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(cli.worker_threads)
        .thread_name(WORKER_THREAD_NAME)
        .enable_all()
        .build()?;

    runtime.block_on(async_main(cli))
}

fn init_logging(format: LogFormat) {
    // Respects RUST_LOG if set, otherwise defaults to INFO level
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    match format {
        LogFormat::Json => {
            tracing_subscriber::fmt()
                .with_env_filter(env_filter)
                .with_file(true)
                .with_line_number(true)
                .with_thread_names(true)
                .with_target(false)
                .json()
                .init();
        }
        LogFormat::Text => {
            tracing_subscriber::fmt()
                .with_env_filter(env_filter)
                .with_file(true)
                .with_line_number(true)
                .with_thread_names(true)
                .with_target(false)
                .with_ansi(true)
                .compact()
                .init();
        }
    }
}

async fn async_main(cli: Cli) -> Result<()> {
    init_logging(cli.resolved_log_format());

    info!("Starting Gslb controller");
    debug!(?cli, "Logging initialized");

    debug!("Initializing Kubernetes client");
    let client = Client::try_default().await?;
    debug!("Kubernetes client initialized successfully");

    let context = Arc::new(
        Context::new(Arc::new(LoggingSync))
            .with_reconcile_requeue(Duration::from_secs(cli.reconcile_requeue_secs)),
    );
    let store = Arc::new(KubeStore::new(client.clone()));
    let (adoptions_tx, adoptions_rx) = tokio::sync::mpsc::unbounded_channel();

    // Each task is expected to run for the life of the process
    tokio::select! {
        result = run_gslb_controller(client, context, adoptions_tx) => {
            info!("Gslb controller exited: {:?}", result);
            result
        }
        () = run_adoption_executor(store, adoptions_rx) => {
            error!("CRITICAL: adoption executor exited unexpectedly");
            anyhow::bail!("adoption executor exited unexpectedly")
        }
        result = run_metrics_server(cli.metrics_addr) => {
            error!("CRITICAL: metrics server exited unexpectedly: {:?}", result);
            result?;
            anyhow::bail!("metrics server exited unexpectedly without error")
        }
    }
}

/// Serve Prometheus metrics and a liveness probe.
async fn run_metrics_server(addr: SocketAddr) -> Result<()> {
    let app = Router::new()
        .route("/metrics", get(metrics_handler))
        .route("/healthz", get(|| async { "ok" }));

    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(%addr, "Serving metrics");
    axum::serve(listener, app).await?;

    Ok(())
}

async fn metrics_handler() -> Result<String, (StatusCode, String)> {
    gather_metrics().map_err(|e| (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))
}
