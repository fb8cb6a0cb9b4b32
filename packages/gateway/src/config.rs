//! Store connection settings read from the environment.

use std::time::Duration;

use crate::GatewayError;

/// Default per-request timeout.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

const URL_VARS: &[&str] = &["SUPABASE_URL", "NEXT_PUBLIC_SUPABASE_URL"];
const KEY_VAR: &str = "SUPABASE_SERVICE_ROLE_KEY";
const TIMEOUT_VAR: &str = "GATEWAY_TIMEOUT_SECS";

/// Where the store lives and how to authenticate against it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GatewayConfig {
    /// Base URL of the store, without the `/rest/v1` suffix.
    pub url: String,
    /// Service key sent as `apikey` and bearer token.
    pub service_key: String,
    /// Per-request timeout.
    pub timeout: Duration,
}

impl GatewayConfig {
    #[must_use]
    pub fn new(url: impl Into<String>, service_key: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            service_key: service_key.into(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }

    /// Reads the configuration from the process environment.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::MissingEnv`] if the URL or service key is
    /// unset or blank.
    pub fn from_env() -> Result<Self, GatewayError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Same as [`Self::from_env`] with a custom variable source.
    ///
    /// All whitespace, including embedded newlines, is removed from the
    /// URL and key. An unparsable timeout falls back to the default.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::MissingEnv`] if the URL or service key is
    /// unset or blank.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, GatewayError> {
        let url = URL_VARS
            .iter()
            .filter_map(|name| lookup(name))
            .map(|value| strip_whitespace(&value))
            .find(|value| !value.is_empty())
            .ok_or_else(|| GatewayError::MissingEnv {
                name: URL_VARS[0].to_string(),
            })?;

        let service_key = lookup(KEY_VAR)
            .map(|value| strip_whitespace(&value))
            .filter(|value| !value.is_empty())
            .ok_or_else(|| GatewayError::MissingEnv {
                name: KEY_VAR.to_string(),
            })?;

        let timeout_secs = match lookup(TIMEOUT_VAR) {
            Some(raw) => raw.trim().parse().unwrap_or_else(|_| {
                log::warn!(
                    "Invalid {TIMEOUT_VAR} {raw:?}, using {DEFAULT_TIMEOUT_SECS}s"
                );
                DEFAULT_TIMEOUT_SECS
            }),
            None => DEFAULT_TIMEOUT_SECS,
        };

        Ok(Self {
            url,
            service_key,
            timeout: Duration::from_secs(timeout_secs),
        })
    }
}

fn strip_whitespace(value: &str) -> String {
    value.chars().filter(|c| !c.is_whitespace()).collect()
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::*;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: BTreeMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |name| vars.get(name).cloned()
    }

    #[test]
    fn strips_whitespace_and_newlines() {
        let config = GatewayConfig::from_lookup(lookup(&[
            ("SUPABASE_URL", " https://example.supabase.co\n"),
            ("SUPABASE_SERVICE_ROLE_KEY", "abc\ndef "),
        ]))
        .unwrap();
        assert_eq!(config.url, "https://example.supabase.co");
        assert_eq!(config.service_key, "abcdef");
        assert_eq!(config.timeout, Duration::from_secs(30));
    }

    #[test]
    fn falls_back_to_public_url() {
        let config = GatewayConfig::from_lookup(lookup(&[
            ("SUPABASE_URL", "  "),
            ("NEXT_PUBLIC_SUPABASE_URL", "https://public.supabase.co"),
            ("SUPABASE_SERVICE_ROLE_KEY", "key"),
        ]))
        .unwrap();
        assert_eq!(config.url, "https://public.supabase.co");
    }

    #[test]
    fn missing_values() {
        let err = GatewayConfig::from_lookup(lookup(&[("SUPABASE_SERVICE_ROLE_KEY", "key")]))
            .unwrap_err();
        assert!(matches!(err, GatewayError::MissingEnv { name } if name == "SUPABASE_URL"));

        let err = GatewayConfig::from_lookup(lookup(&[
            ("SUPABASE_URL", "https://example.supabase.co"),
            ("SUPABASE_SERVICE_ROLE_KEY", "\n"),
        ]))
        .unwrap_err();
        assert!(
            matches!(err, GatewayError::MissingEnv { name } if name == "SUPABASE_SERVICE_ROLE_KEY")
        );
    }

    #[test]
    fn timeout_override() {
        let vars = [
            ("SUPABASE_URL", "https://example.supabase.co"),
            ("SUPABASE_SERVICE_ROLE_KEY", "key"),
            ("GATEWAY_TIMEOUT_SECS", "5"),
        ];
        let config = GatewayConfig::from_lookup(lookup(&vars)).unwrap();
        assert_eq!(config.timeout, Duration::from_secs(5));

        let vars = [
            ("SUPABASE_URL", "https://example.supabase.co"),
            ("SUPABASE_SERVICE_ROLE_KEY", "key"),
            ("GATEWAY_TIMEOUT_SECS", "soon"),
        ];
        let config = GatewayConfig::from_lookup(lookup(&vars)).unwrap();
        assert_eq!(config.timeout, Duration::from_secs(30));
    }
}
