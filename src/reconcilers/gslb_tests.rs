// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Unit tests for `gslb.rs`

#[cfg(test)]
mod tests {
    use super::super::*;
    use crate::constants::ERROR_REQUEUE_DURATION_SECS;
    use crate::context::Context;
    use crate::crd::{Gslb, GslbSpec, Strategy};
    use crate::gslb_controller::error_policy;
    use k8s_openapi::api::networking::v1::IngressSpec;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use std::time::Duration;

    /// Engine that counts calls and optionally fails.
    #[derive(Default)]
    struct CountingSync {
        calls: AtomicUsize,
        fail: bool,
    }

    #[async_trait]
    impl GslbSync for CountingSync {
        async fn sync(&self, _gslb: &Gslb) -> anyhow::Result<()> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                anyhow::bail!("dns engine unavailable");
            }
            Ok(())
        }
    }

    fn gslb(strategy: Strategy) -> Arc<Gslb> {
        let mut gslb = Gslb::new(
            "frontend",
            GslbSpec {
                ingress: IngressSpec::default(),
                strategy,
            },
        );
        gslb.metadata.namespace = Some("shop".to_string());
        Arc::new(gslb)
    }

    fn failover(geo_tag: &str) -> Strategy {
        Strategy {
            r#type: "failover".to_string(),
            primary_geo_tag: geo_tag.to_string(),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_reconcile_valid_gslb_requeues() {
        let sync = Arc::new(CountingSync::default());
        let requeue = Duration::from_secs(42);
        let ctx = Arc::new(Context::new(sync.clone()).with_reconcile_requeue(requeue));

        let action = reconcile_gslb(gslb(failover("eu")), ctx)
            .await
            .expect("reconcile should succeed");

        assert_eq!(action, Action::requeue(requeue));
        assert_eq!(sync.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_reconcile_invalid_strategy_skips_engine() {
        let sync = Arc::new(CountingSync::default());
        let ctx = Arc::new(Context::new(sync.clone()));

        let action = reconcile_gslb(gslb(failover("")), ctx)
            .await
            .expect("invalid strategy is not an error");

        assert_eq!(action, Action::await_change());
        assert_eq!(sync.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_reconcile_engine_failure_is_error() {
        let sync = Arc::new(CountingSync {
            fail: true,
            ..Default::default()
        });
        let ctx = Arc::new(Context::new(sync));

        let err = reconcile_gslb(gslb(failover("eu")), ctx)
            .await
            .expect_err("engine failure should surface");

        assert!(err.to_string().contains("shop/frontend"));
    }

    #[tokio::test]
    async fn test_logging_sync_accepts_any_gslb() {
        let ctx = Arc::new(Context::new(Arc::new(LoggingSync)));

        let round_robin = gslb(Strategy {
            r#type: "roundRobin".to_string(),
            ..Default::default()
        });

        let action = reconcile_gslb(round_robin, ctx.clone()).await.unwrap();

        assert_eq!(action, Action::requeue(ctx.reconcile_requeue));
    }

    #[test]
    fn test_error_policy_requeues() {
        let ctx = Arc::new(Context::new(Arc::new(LoggingSync)));
        let err = ReconcileError::from(anyhow::anyhow!("boom"));

        let action = error_policy(gslb(failover("eu")), &err, ctx);

        let expected = Duration::from_secs(ERROR_REQUEUE_DURATION_SECS);
        assert_eq!(action, Action::requeue(expected));
    }
}
