//! Runtime settings resolved once at startup.

use regex::Regex;
use std::path::PathBuf;
use std::sync::OnceLock;

use crate::error::PipelineError;

pub const DEFAULT_API_BASE_URL: &str = "https://yunwu.ai";
pub const DEFAULT_MODEL_ID: &str = "claude-sonnet-4-5-20250929";
pub const DEFAULT_TOP_N: usize = 10;

/// Credentials and endpoints for the two external services.
#[derive(Clone)]
pub struct Settings {
    pub api_key: String,
    pub api_base_url: String,
    pub topic_api_key: String,
    pub model: String,
    /// Automation output file (`GITHUB_OUTPUT`), when running under CI.
    pub github_output: Option<PathBuf>,
}

impl std::fmt::Debug for Settings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Settings")
            .field("api_key", &"<redacted>")
            .field("api_base_url", &self.api_base_url)
            .field("topic_api_key", &"<redacted>")
            .field("model", &self.model)
            .field("github_output", &self.github_output)
            .finish()
    }
}

impl Settings {
    pub fn from_env() -> Result<Self, PipelineError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Resolve settings from any key lookup. Empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, PipelineError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let api_key = get("YUNWU_API_KEY")
            .or_else(|| get("ANTHROPIC_API_KEY"))
            .ok_or_else(|| {
                PipelineError::Config(
                    "YUNWU_API_KEY or ANTHROPIC_API_KEY environment variable is required".into(),
                )
            })?;

        let topic_api_key = get("TIANAPI_KEY").ok_or_else(|| {
            PipelineError::Config("TIANAPI_KEY environment variable is required".into())
        })?;

        let api_base_url = get("API_BASE_URL")
            .map(|u| u.trim_end_matches('/').to_string())
            .unwrap_or_else(|| DEFAULT_API_BASE_URL.to_string());

        Ok(Self {
            api_key,
            api_base_url,
            topic_api_key,
            model: get("MODEL_ID").unwrap_or_else(|| DEFAULT_MODEL_ID.to_string()),
            github_output: get("GITHUB_OUTPUT").map(PathBuf::from),
        })
    }
}

/// Parse the `top<N>` selection argument.
/// Absent, non-matching or zero falls back to the default.
pub fn parse_top_n(arg: Option<&str>) -> usize {
    static TOP_RE: OnceLock<Regex> = OnceLock::new();
    let re = TOP_RE.get_or_init(|| Regex::new(r"(?i)top(\d+)").expect("valid regex"));

    arg.and_then(|a| re.captures(a))
        .and_then(|c| c[1].parse::<usize>().ok())
        .filter(|n| *n > 0)
        .unwrap_or(DEFAULT_TOP_N)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |k: &str| map.get(k).cloned()
    }

    #[test]
    fn test_defaults_applied() {
        let s = Settings::from_lookup(lookup(&[
            ("ANTHROPIC_API_KEY", "sk-a"),
            ("TIANAPI_KEY", "tk"),
        ]))
        .unwrap();
        assert_eq!(s.api_key, "sk-a");
        assert_eq!(s.api_base_url, DEFAULT_API_BASE_URL);
        assert_eq!(s.model, DEFAULT_MODEL_ID);
        assert!(s.github_output.is_none());
    }

    #[test]
    fn test_first_non_empty_key_wins() {
        let s = Settings::from_lookup(lookup(&[
            ("YUNWU_API_KEY", "sk-y"),
            ("ANTHROPIC_API_KEY", "sk-a"),
            ("TIANAPI_KEY", "tk"),
        ]))
        .unwrap();
        assert_eq!(s.api_key, "sk-y");

        let s = Settings::from_lookup(lookup(&[
            ("YUNWU_API_KEY", ""),
            ("ANTHROPIC_API_KEY", "sk-a"),
            ("TIANAPI_KEY", "tk"),
        ]))
        .unwrap();
        assert_eq!(s.api_key, "sk-a");
    }

    #[test]
    fn test_missing_credentials_are_config_errors() {
        let err = Settings::from_lookup(lookup(&[("TIANAPI_KEY", "tk")])).unwrap_err();
        assert!(matches!(err, PipelineError::Config(_)));

        let err = Settings::from_lookup(lookup(&[("YUNWU_API_KEY", "sk")])).unwrap_err();
        assert!(matches!(err, PipelineError::Config(m) if m.contains("TIANAPI_KEY")));
    }

    #[test]
    fn test_overrides() {
        let s = Settings::from_lookup(lookup(&[
            ("YUNWU_API_KEY", "sk"),
            ("TIANAPI_KEY", "tk"),
            ("API_BASE_URL", "https://proxy.example/"),
            ("MODEL_ID", "claude-x"),
            ("GITHUB_OUTPUT", "/tmp/gh_out"),
        ]))
        .unwrap();
        assert_eq!(s.api_base_url, "https://proxy.example");
        assert_eq!(s.model, "claude-x");
        assert_eq!(s.github_output, Some(PathBuf::from("/tmp/gh_out")));
    }

    #[test]
    fn test_debug_redacts_keys() {
        let s = Settings::from_lookup(lookup(&[
            ("YUNWU_API_KEY", "secret1"),
            ("TIANAPI_KEY", "secret2"),
        ]))
        .unwrap();
        let dbg = format!("{:?}", s);
        assert!(!dbg.contains("secret1"));
        assert!(!dbg.contains("secret2"));
    }

    #[test]
    fn test_parse_top_n() {
        assert_eq!(parse_top_n(None), 10);
        assert_eq!(parse_top_n(Some("top5")), 5);
        assert_eq!(parse_top_n(Some("TOP20")), 20);
        assert_eq!(parse_top_n(Some("hot")), 10);
        assert_eq!(parse_top_n(Some("top")), 10);
        assert_eq!(parse_top_n(Some("top0")), 10);
    }
}
