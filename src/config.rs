//! Configuration Module
//!
//! Handles loading cache configuration from environment variables.

use std::env;

use crate::error::{CacheError, Result};

/// Sizing and keying for a single cache instance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheConfig {
    /// Maximum number of distinct keys retained
    pub capacity: usize,
    /// Attribute names used to build keys, in order. `None` uses every attribute.
    pub key_attributes: Option<Vec<String>>,
}

impl CacheConfig {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            key_attributes: None,
        }
    }

    /// Restricts key derivation to the given attributes, in the given order.
    pub fn with_key_attributes<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.key_attributes = Some(names.into_iter().map(Into::into).collect());
        self
    }

    /// Rejects a zero capacity.
    pub fn validate(&self) -> Result<()> {
        if self.capacity == 0 {
            return Err(CacheError::InvalidCapacity(self.capacity));
        }
        Ok(())
    }
}

/// Factory configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Cache backing `get` lookups
    pub item_cache: CacheConfig,
    /// Cache backing `list` lookups
    pub list_cache: CacheConfig,
}

impl Config {
    // == From Env ==
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `ITEM_CACHE_CAPACITY` - Item cache capacity (default: 5)
    /// - `ITEM_CACHE_KEY_ATTRIBUTES` - Comma-separated key attributes (default: all)
    /// - `LIST_CACHE_CAPACITY` - List cache capacity (default: 1)
    /// - `LIST_CACHE_KEY_ATTRIBUTES` - Comma-separated key attributes (default: all)
    ///
    /// A capacity that is set but not a non-negative integer is an error.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    // == From Lookup ==
    /// Builds a Config reading each variable through `lookup`.
    ///
    /// Unset variables fall back to the defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        Ok(Self {
            item_cache: CacheConfig {
                capacity: parse_capacity(
                    "ITEM_CACHE_CAPACITY",
                    lookup("ITEM_CACHE_CAPACITY"),
                    defaults.item_cache.capacity,
                )?,
                key_attributes: lookup("ITEM_CACHE_KEY_ATTRIBUTES")
                    .and_then(|v| parse_attribute_list(&v)),
            },
            list_cache: CacheConfig {
                capacity: parse_capacity(
                    "LIST_CACHE_CAPACITY",
                    lookup("LIST_CACHE_CAPACITY"),
                    defaults.list_cache.capacity,
                )?,
                key_attributes: lookup("LIST_CACHE_KEY_ATTRIBUTES")
                    .and_then(|v| parse_attribute_list(&v)),
            },
        })
    }

    // == Validate ==
    /// Rejects a zero capacity on either cache.
    pub fn validate(&self) -> Result<()> {
        self.item_cache.validate()?;
        self.list_cache.validate()
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            item_cache: CacheConfig::new(5),
            list_cache: CacheConfig::new(1),
        }
    }
}

fn parse_capacity(name: &str, raw: Option<String>, default: usize) -> Result<usize> {
    match raw {
        None => Ok(default),
        Some(value) => value.trim().parse().map_err(|_| {
            CacheError::InvalidConfig(format!(
                "{} must be an unsigned integer, got {:?}",
                name, value
            ))
        }),
    }
}

/// Splits `"a, b,c"` into `["a", "b", "c"]`; blank input yields `None`.
fn parse_attribute_list(raw: &str) -> Option<Vec<String>> {
    let names: Vec<String> = raw
        .split(',')
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(String::from)
        .collect();
    if names.is_empty() {
        None
    } else {
        Some(names)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert_eq!(config.item_cache.capacity, 5);
        assert_eq!(config.list_cache.capacity, 1);
        assert!(config.item_cache.key_attributes.is_none());
        assert!(config.list_cache.key_attributes.is_none());
    }

    #[test]
    fn test_config_from_env_defaults() {
        // Clear any existing env vars to test defaults
        env::remove_var("ITEM_CACHE_CAPACITY");
        env::remove_var("ITEM_CACHE_KEY_ATTRIBUTES");
        env::remove_var("LIST_CACHE_CAPACITY");
        env::remove_var("LIST_CACHE_KEY_ATTRIBUTES");

        let config = Config::from_env().unwrap();
        assert_eq!(config, Config::default());
    }

    fn lookup_from(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| vars.get(name).cloned()
    }

    #[test]
    fn test_config_from_lookup_values() {
        let config = Config::from_lookup(lookup_from(&[
            ("ITEM_CACHE_CAPACITY", "10"),
            ("ITEM_CACHE_KEY_ATTRIBUTES", "cid"),
            ("LIST_CACHE_CAPACITY", " 3 "),
        ]))
        .unwrap();
        assert_eq!(config.item_cache.capacity, 10);
        assert_eq!(config.item_cache.key_attributes, Some(vec!["cid".to_string()]));
        assert_eq!(config.list_cache.capacity, 3);
        assert!(config.list_cache.key_attributes.is_none());
    }

    #[test]
    fn test_negative_capacity_is_rejected() {
        let result = Config::from_lookup(lookup_from(&[("ITEM_CACHE_CAPACITY", "-3")]));
        match result {
            Err(CacheError::InvalidConfig(msg)) => assert!(msg.contains("ITEM_CACHE_CAPACITY")),
            other => panic!("expected InvalidConfig, got {:?}", other),
        }
    }

    #[test]
    fn test_non_numeric_capacity_is_rejected() {
        let result = Config::from_lookup(lookup_from(&[("LIST_CACHE_CAPACITY", "ten")]));
        match result {
            Err(CacheError::InvalidConfig(msg)) => assert!(msg.contains("LIST_CACHE_CAPACITY")),
            other => panic!("expected InvalidConfig, got {:?}", other),
        }
    }

    #[test]
    fn test_zero_capacity_parses_but_fails_validation() {
        let config = Config::from_lookup(lookup_from(&[("ITEM_CACHE_CAPACITY", "0")])).unwrap();
        assert_eq!(config.validate(), Err(CacheError::InvalidCapacity(0)));
    }

    #[test]
    fn test_parse_attribute_list() {
        assert_eq!(
            parse_attribute_list("cid, name ,,id"),
            Some(vec!["cid".to_string(), "name".to_string(), "id".to_string()])
        );
        assert_eq!(parse_attribute_list(" , "), None);
    }

    #[test]
    fn test_validate_rejects_zero_capacity() {
        let config = Config {
            item_cache: CacheConfig::new(0),
            list_cache: CacheConfig::new(1),
        };
        assert_eq!(config.validate(), Err(CacheError::InvalidCapacity(0)));
    }

    #[test]
    fn test_with_key_attributes() {
        let config = CacheConfig::new(10).with_key_attributes(["any", "map"]);
        assert_eq!(
            config.key_attributes,
            Some(vec!["any".to_string(), "map".to_string()])
        );
        assert!(config.validate().is_ok());
    }
}
