//! Settings read from the environment.
//!
//! | variable                 | values              | default  |
//! |--------------------------|---------------------|----------|
//! | `NEWSFEED_JSON_FALLBACK` | `strict`, `lenient` | `strict` |
//! | `NEWSFEED_JSON_SAFE`     | `true`, `false`     | `true`   |
//! | `LOG_FORMAT`             | `json`, `pretty`    | `json`   |

use anyhow::{Context, anyhow};

use newsfeed_observability::LogFormat;
use newsfeed_render::{Encoder, FallbackMode};

use crate::response::Renderer;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub json_fallback: FallbackMode,
    /// Require an object at the top level of JSON responses.
    pub json_safe: bool,
    pub log_format: LogFormat,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            json_fallback: FallbackMode::Strict,
            json_safe: true,
            log_format: LogFormat::Json,
        }
    }
}

impl Settings {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build settings from an arbitrary key lookup (used by tests).
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let defaults = Self::default();

        let json_fallback = match lookup("NEWSFEED_JSON_FALLBACK") {
            Some(raw) => raw
                .parse::<FallbackMode>()
                .map_err(|e| anyhow!(e))
                .context("invalid NEWSFEED_JSON_FALLBACK")?,
            None => defaults.json_fallback,
        };

        let json_safe = match lookup("NEWSFEED_JSON_SAFE") {
            Some(raw) => raw
                .trim()
                .parse::<bool>()
                .context("invalid NEWSFEED_JSON_SAFE")?,
            None => defaults.json_safe,
        };

        let log_format = match lookup("LOG_FORMAT") {
            Some(raw) => raw
                .parse::<LogFormat>()
                .map_err(|e| anyhow!(e))
                .context("invalid LOG_FORMAT")?,
            None => defaults.log_format,
        };

        Ok(Self {
            json_fallback,
            json_safe,
            log_format,
        })
    }

    /// Initialize logging with the configured format.
    pub fn init_logging(&self) {
        newsfeed_observability::tracing::init(self.log_format);
    }

    pub fn renderer(&self) -> Renderer {
        Renderer::new(Encoder::new(self.json_fallback), self.json_safe)
    }
}
