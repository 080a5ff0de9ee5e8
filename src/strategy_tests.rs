// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Unit tests for `strategy.rs`

#[cfg(test)]
mod tests {
    use super::super::resolve_strategy;
    use crate::crd::Strategy;
    use crate::errors::StrategyError;
    use crate::labels::{
        DNS_TTL_SECONDS_ANNOTATION, PRIMARY_GEO_TAG_ANNOTATION,
        SPLIT_BRAIN_THRESHOLD_SECONDS_ANNOTATION, STRATEGY_ANNOTATION,
    };
    use std::collections::BTreeMap;

    fn annotations(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect()
    }

    #[test]
    fn test_failover_with_geo_tag_only() {
        let result = resolve_strategy(
            &annotations(&[(PRIMARY_GEO_TAG_ANNOTATION, "eu")]),
            "failover",
        );

        assert_eq!(
            result,
            Ok(Strategy {
                r#type: "failover".to_string(),
                primary_geo_tag: "eu".to_string(),
                dns_ttl_seconds: 0,
                split_brain_threshold_seconds: 0,
            })
        );
    }

    #[test]
    fn test_failover_without_geo_tag_is_rejected() {
        let result = resolve_strategy(
            &annotations(&[(DNS_TTL_SECONDS_ANNOTATION, "30")]),
            "failover",
        );

        assert_eq!(
            result,
            Err(StrategyError::MissingAnnotation {
                strategy: "failover".to_string(),
                annotation: PRIMARY_GEO_TAG_ANNOTATION.to_string(),
            })
        );
    }

    #[test]
    fn test_failover_with_empty_geo_tag_is_rejected() {
        let result = resolve_strategy(
            &annotations(&[(PRIMARY_GEO_TAG_ANNOTATION, "")]),
            "failover",
        );

        assert!(matches!(
            result,
            Err(StrategyError::MissingAnnotation { .. })
        ));
    }

    #[test]
    fn test_malformed_ttl_names_key_and_value() {
        let result = resolve_strategy(
            &annotations(&[(DNS_TTL_SECONDS_ANNOTATION, "abc")]),
            "roundRobin",
        );

        let err = result.unwrap_err();
        assert_eq!(
            err,
            StrategyError::InvalidInteger {
                key: DNS_TTL_SECONDS_ANNOTATION.to_string(),
                value: "abc".to_string(),
            }
        );
        assert!(err.to_string().contains("abc"));
        assert!(err.to_string().contains(DNS_TTL_SECONDS_ANNOTATION));
    }

    #[test]
    fn test_malformed_split_brain_threshold_is_rejected() {
        let result = resolve_strategy(
            &annotations(&[
                (DNS_TTL_SECONDS_ANNOTATION, "30"),
                (SPLIT_BRAIN_THRESHOLD_SECONDS_ANNOTATION, "5m"),
            ]),
            "roundRobin",
        );

        assert_eq!(
            result,
            Err(StrategyError::InvalidInteger {
                key: SPLIT_BRAIN_THRESHOLD_SECONDS_ANNOTATION.to_string(),
                value: "5m".to_string(),
            })
        );
    }

    #[test]
    fn test_negative_ttl_is_rejected() {
        let result = resolve_strategy(
            &annotations(&[(DNS_TTL_SECONDS_ANNOTATION, "-1")]),
            "roundRobin",
        );

        assert!(matches!(result, Err(StrategyError::InvalidInteger { .. })));
    }

    #[test]
    fn test_malformed_integer_wins_over_missing_geo_tag() {
        // Parsing aborts before the failover requirement is checked
        let result = resolve_strategy(
            &annotations(&[(SPLIT_BRAIN_THRESHOLD_SECONDS_ANNOTATION, "x")]),
            "failover",
        );

        assert!(matches!(result, Err(StrategyError::InvalidInteger { .. })));
    }

    #[test]
    fn test_all_keys_are_resolved() {
        let result = resolve_strategy(
            &annotations(&[
                (STRATEGY_ANNOTATION, "failover"),
                (DNS_TTL_SECONDS_ANNOTATION, "60"),
                (SPLIT_BRAIN_THRESHOLD_SECONDS_ANNOTATION, "300"),
                (PRIMARY_GEO_TAG_ANNOTATION, "us-east"),
            ]),
            "failover",
        )
        .unwrap();

        assert_eq!(result.r#type, "failover");
        assert_eq!(result.dns_ttl_seconds, 60);
        assert_eq!(result.split_brain_threshold_seconds, 300);
        assert_eq!(result.primary_geo_tag, "us-east");
    }

    #[test]
    fn test_unrelated_annotations_are_ignored() {
        let result = resolve_strategy(
            &annotations(&[
                ("kubernetes.io/ingress.class", "nginx"),
                ("nginx.ingress.kubernetes.io/rewrite-target", "/"),
                ("k8gb.io/unknown-setting", "not-a-number"),
            ]),
            "roundRobin",
        )
        .unwrap();

        assert_eq!(
            result,
            Strategy {
                r#type: "roundRobin".to_string(),
                ..Default::default()
            }
        );
    }

    #[test]
    fn test_round_robin_does_not_require_geo_tag() {
        let result = resolve_strategy(&BTreeMap::new(), "roundRobin");
        assert!(result.is_ok());
    }

    #[test]
    fn test_geo_tag_is_copied_verbatim_for_any_strategy() {
        let result = resolve_strategy(
            &annotations(&[(PRIMARY_GEO_TAG_ANNOTATION, " Eu West/1 ")]),
            "geoip",
        )
        .unwrap();

        assert_eq!(result.primary_geo_tag, " Eu West/1 ");
    }

    #[test]
    fn test_unknown_strategy_type_passes_through() {
        let result = resolve_strategy(&BTreeMap::new(), "weighted").unwrap();
        assert_eq!(result.r#type, "weighted");
    }
}
