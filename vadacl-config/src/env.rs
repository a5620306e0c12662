// Environment variable lookup

use crate::{ConfigError, Result};
use std::env;

/// Reads `PREFIX_KEY` style variables.
#[derive(Debug, Clone)]
pub struct EnvLoader {
    prefix: Option<String>,
}

impl EnvLoader {
    pub fn new(prefix: Option<String>) -> Self {
        Self { prefix }
    }

    /// Loader for the `VADACL_` namespace.
    pub fn vadacl() -> Self {
        Self::new(Some("VADACL".to_string()))
    }

    /// Full variable name for `key`, upper-cased and prefixed.
    pub fn var_name(&self, key: &str) -> String {
        match &self.prefix {
            Some(prefix) => format!("{}_{}", prefix, key.to_uppercase()),
            None => key.to_uppercase(),
        }
    }

    pub fn load_var(&self, key: &str) -> Result<String> {
        env::var(self.var_name(key)).map_err(ConfigError::EnvError)
    }

    pub fn load_var_or(&self, key: &str, default: &str) -> String {
        self.load_var(key).unwrap_or_else(|_| default.to_string())
    }

    /// Interpret a variable as a flag. `1`, `true`, `yes` and `on` are
    /// true; `0`, `false`, `no` and `off` are false; anything else,
    /// including absence, yields `default`.
    pub fn load_flag(&self, key: &str, default: bool) -> bool {
        match self.load_var(key) {
            Ok(raw) => parse_flag(&raw).unwrap_or(default),
            Err(_) => default,
        }
    }
}

impl Default for EnvLoader {
    fn default() -> Self {
        Self::vadacl()
    }
}

pub(crate) fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // std::env::set_var is unsafe under edition 2024, so these tests stick
    // to variables that are certainly absent.

    #[test]
    fn test_var_name_with_prefix() {
        let loader = EnvLoader::vadacl();
        assert_eq!(loader.var_name("messages"), "VADACL_MESSAGES");
    }

    #[test]
    fn test_var_name_without_prefix() {
        let loader = EnvLoader::new(None);
        assert_eq!(loader.var_name("path"), "PATH");
    }

    #[test]
    fn test_missing_var_falls_back() {
        let loader = EnvLoader::new(Some("VADACL_TEST_ABSENT".to_string()));
        assert!(loader.load_var("NOTHING_1234").is_err());
        assert_eq!(loader.load_var_or("NOTHING_1234", "fallback"), "fallback");
        assert!(loader.load_flag("NOTHING_1234", true));
        assert!(!loader.load_flag("NOTHING_1234", false));
    }

    #[test]
    fn test_parse_flag() {
        assert_eq!(parse_flag("TRUE"), Some(true));
        assert_eq!(parse_flag(" off "), Some(false));
        assert_eq!(parse_flag("maybe"), None);
    }
}
