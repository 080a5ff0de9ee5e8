// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Resolution of Ingress annotations into a typed [`Strategy`].
//!
//! The annotation map is flat and untyped. [`resolve_strategy`] picks out the
//! keys it knows, parses them and checks the requirements of the chosen
//! strategy type. Keys it does not know are ignored, so the same map may carry
//! annotations for other controllers.
//!
//! # Example
//!
//! ```rust
//! use gslb::strategy::resolve_strategy;
//! use std::collections::BTreeMap;
//!
//! let annotations = BTreeMap::from([
//!     ("k8gb.io/primary-geotag".to_string(), "eu".to_string()),
//!     ("k8gb.io/dns-ttl-seconds".to_string(), "30".to_string()),
//! ]);
//!
//! let strategy = resolve_strategy(&annotations, "failover").unwrap();
//! assert_eq!(strategy.primary_geo_tag, "eu");
//! assert_eq!(strategy.dns_ttl_seconds, 30);
//! ```

use crate::crd::Strategy;
use crate::errors::StrategyError;
use crate::labels::{
    DNS_TTL_SECONDS_ANNOTATION, PRIMARY_GEO_TAG_ANNOTATION,
    SPLIT_BRAIN_THRESHOLD_SECONDS_ANNOTATION,
};
use std::collections::BTreeMap;

/// Build the strategy of type `strategy_type` from Ingress annotations.
///
/// Every recognized key sets its own field, so the result does not depend on
/// the order of the map. Integer keys are looked up before the geo tag and the
/// TTL before the split-brain threshold, which decides the key reported when
/// several values are malformed.
///
/// # Errors
///
/// - [`StrategyError::InvalidInteger`] as soon as an integer annotation does not parse.
///   Nothing is skipped: a malformed value is never silently replaced by a default.
/// - [`StrategyError::MissingAnnotation`] when `strategy_type` is `failover` and no
///   non-empty primary geo tag is given.
pub fn resolve_strategy(
    annotations: &BTreeMap<String, String>,
    strategy_type: &str,
) -> Result<Strategy, StrategyError> {
    let mut strategy = Strategy {
        r#type: strategy_type.to_string(),
        ..Default::default()
    };

    if let Some(value) = annotations.get(DNS_TTL_SECONDS_ANNOTATION) {
        strategy.dns_ttl_seconds = parse_seconds(DNS_TTL_SECONDS_ANNOTATION, value)?;
    }
    if let Some(value) = annotations.get(SPLIT_BRAIN_THRESHOLD_SECONDS_ANNOTATION) {
        strategy.split_brain_threshold_seconds =
            parse_seconds(SPLIT_BRAIN_THRESHOLD_SECONDS_ANNOTATION, value)?;
    }
    if let Some(value) = annotations.get(PRIMARY_GEO_TAG_ANNOTATION) {
        strategy.primary_geo_tag.clone_from(value);
    }

    strategy.validate()?;

    Ok(strategy)
}

/// Parse a base-10 seconds value. Negative numbers and surrounding whitespace are rejected.
fn parse_seconds(key: &str, value: &str) -> Result<u32, StrategyError> {
    value
        .parse::<u32>()
        .map_err(|_| StrategyError::InvalidInteger {
            key: key.to_string(),
            value: value.to_string(),
        })
}

#[cfg(test)]
#[path = "strategy_tests.rs"]
mod strategy_tests;
