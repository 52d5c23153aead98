pub mod error;
pub mod gemini;
pub mod prompts;
pub mod provider;

pub use error::{InsightError, InsightResult};
pub use gemini::{GeminiClient, Generated};
pub use provider::{analysis_or_fallback, insights_or_fallback, InsightProvider};

use std::time::Duration;

pub const DEFAULT_MODEL: &str = "gemini-3-flash-preview";
pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";

/// Configuration for the generative insight service
#[derive(Debug, Clone)]
pub struct InsightConfig {
    /// `None` makes every call fail fast into the caller's fallback
    pub api_key: Option<String>,
    pub model: String,
    pub base_url: String,
    pub timeout: Duration,
}

impl Default for InsightConfig {
    fn default() -> Self {
        Self {
            api_key: resolve_api_key(
                std::env::var("GEMINI_API_KEY").ok(),
                std::env::var("API_KEY").ok(),
            ),
            model: std::env::var("GEMINI_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.to_string()),
            base_url: std::env::var("GEMINI_BASE_URL")
                .unwrap_or_else(|_| DEFAULT_BASE_URL.to_string()),
            timeout: Duration::from_secs(
                std::env::var("GEMINI_TIMEOUT_SECS")
                    .ok()
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(60),
            ),
        }
    }
}

/// First non-blank key wins, so a blank `GEMINI_API_KEY` still falls back to `API_KEY`
fn resolve_api_key(primary: Option<String>, secondary: Option<String>) -> Option<String> {
    let present = |key: &Option<String>| key.as_deref().is_some_and(|k| !k.trim().is_empty());
    if present(&primary) {
        primary
    } else if present(&secondary) {
        secondary
    } else {
        None
    }
}

impl InsightConfig {
    /// Load `.env` (if present) and read the environment
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();
        Self::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_primary_key_falls_back() {
        assert_eq!(
            resolve_api_key(Some("  ".into()), Some("secondary".into())),
            Some("secondary".to_string())
        );
        assert_eq!(
            resolve_api_key(Some("primary".into()), Some("secondary".into())),
            Some("primary".to_string())
        );
        assert_eq!(resolve_api_key(None, Some("secondary".into())), Some("secondary".to_string()));
        assert_eq!(resolve_api_key(Some(String::new()), Some(" ".into())), None);
        assert_eq!(resolve_api_key(None, None), None);
    }
}
