//! Analytics configuration
//!
//! Tunables for the dashboard pipeline. Values come from defaults, a serde
//! document, or the process environment (after loading `.env`).

use crate::error::{RentalError, Result};
use serde::{Deserialize, Serialize};

pub const ENV_CATEGORY_PREFIX: &str = "RENTAL_CATEGORY_PREFIX";
pub const ENV_TOP_CUSTOMERS: &str = "RENTAL_TOP_CUSTOMERS";
pub const ENV_TOP_INVENTORY: &str = "RENTAL_TOP_INVENTORY";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalyticsConfig {
    /// Prefix of the film dimension's category flag columns
    pub category_prefix: String,

    /// Rows kept in the top customers table
    pub top_customers_limit: usize,

    /// Rows kept in the inventory utilization table
    pub top_inventory_limit: usize,
}

impl Default for AnalyticsConfig {
    fn default() -> Self {
        Self {
            category_prefix: "film_in_category_".to_string(),
            top_customers_limit: 10,
            top_inventory_limit: 25,
        }
    }
}

impl AnalyticsConfig {
    /// Build a config from the environment, falling back to defaults for
    /// anything unset.
    pub fn from_env() -> Result<Self> {
        dotenv::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`AnalyticsConfig::from_env`] with an injectable variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(prefix) = lookup(ENV_CATEGORY_PREFIX) {
            let prefix = prefix.trim();
            if prefix.is_empty() {
                return Err(RentalError::Config(format!("{} must not be empty", ENV_CATEGORY_PREFIX)));
            }
            config.category_prefix = prefix.to_string();
        }
        if let Some(raw) = lookup(ENV_TOP_CUSTOMERS) {
            config.top_customers_limit = parse_limit(ENV_TOP_CUSTOMERS, &raw)?;
        }
        if let Some(raw) = lookup(ENV_TOP_INVENTORY) {
            config.top_inventory_limit = parse_limit(ENV_TOP_INVENTORY, &raw)?;
        }

        Ok(config)
    }
}

fn parse_limit(key: &str, raw: &str) -> Result<usize> {
    match raw.trim().parse::<usize>() {
        Ok(0) => Err(RentalError::Config(format!("{} must be at least 1", key))),
        Ok(n) => Ok(n),
        Err(e) => Err(RentalError::Config(format!("{}='{}' is not a valid count: {}", key, raw, e))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn test_defaults_when_unset() {
        let config = AnalyticsConfig::from_lookup(lookup_from(&[])).unwrap();
        assert_eq!(config, AnalyticsConfig::default());
        assert_eq!(config.top_customers_limit, 10);
        assert_eq!(config.top_inventory_limit, 25);
    }

    #[test]
    fn test_overrides() {
        let config = AnalyticsConfig::from_lookup(lookup_from(&[
            (ENV_CATEGORY_PREFIX, "cat_"),
            (ENV_TOP_CUSTOMERS, " 5 "),
        ]))
        .unwrap();
        assert_eq!(config.category_prefix, "cat_");
        assert_eq!(config.top_customers_limit, 5);
        assert_eq!(config.top_inventory_limit, 25);
    }

    #[test]
    fn test_rejects_bad_limits() {
        let err = AnalyticsConfig::from_lookup(lookup_from(&[(ENV_TOP_INVENTORY, "lots")])).unwrap_err();
        assert!(matches!(err, RentalError::Config(_)));

        let err = AnalyticsConfig::from_lookup(lookup_from(&[(ENV_TOP_CUSTOMERS, "0")])).unwrap_err();
        assert!(matches!(err, RentalError::Config(_)));
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: AnalyticsConfig = serde_json::from_str(r#"{"top_inventory_limit": 3}"#).unwrap();
        assert_eq!(config.top_inventory_limit, 3);
        assert_eq!(config.category_prefix, "film_in_category_");
    }
}
