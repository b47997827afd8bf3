use anyhow::{Context, Result};
use dotenvy::dotenv;
use std::env;
use std::path::PathBuf;

/// Application configuration loaded from environment variables
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub supabase_url: String,
    pub supabase_anon_key: String,
    /// Where to persist the session; in-memory only when unset
    pub session_file: Option<PathBuf>,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        // Load .env file if present (development)
        let _ = dotenv();

        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build configuration from any key/value source
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |key: &str| {
            lookup(key)
                .filter(|v| !v.trim().is_empty())
                .with_context(|| format!("{} must be set", key))
        };

        Ok(Self {
            supabase_url: required("SUPABASE_URL")?,
            supabase_anon_key: required("SUPABASE_ANON_KEY")?,
            session_file: lookup("SESSION_FILE")
                .filter(|v| !v.trim().is_empty())
                .map(PathBuf::from),
        })
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
    fn test_loads_required_and_optional_values() {
        let config = Config::from_lookup(lookup_from(&[
            ("SUPABASE_URL", "https://abc.supabase.co"),
            ("SUPABASE_ANON_KEY", "anon"),
            ("SESSION_FILE", "/tmp/session.json"),
        ]))
        .unwrap();

        assert_eq!(config.supabase_url, "https://abc.supabase.co");
        assert_eq!(config.supabase_anon_key, "anon");
        assert_eq!(config.session_file, Some(PathBuf::from("/tmp/session.json")));
    }

    #[test]
    fn test_session_file_is_optional() {
        let config = Config::from_lookup(lookup_from(&[
            ("SUPABASE_URL", "https://abc.supabase.co"),
            ("SUPABASE_ANON_KEY", "anon"),
            ("SESSION_FILE", ""),
        ]))
        .unwrap();

        assert_eq!(config.session_file, None);
    }

    #[test]
    fn test_missing_anon_key_names_variable() {
        let err = Config::from_lookup(lookup_from(&[("SUPABASE_URL", "https://abc.supabase.co")]))
            .unwrap_err();

        assert!(err.to_string().contains("SUPABASE_ANON_KEY must be set"));
    }
}
