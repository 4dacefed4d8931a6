//! Service configuration
//!
//! Config is resolved in three layers:
//! 1. Embedded defaults (compiled into binary from `config/spendwise.toml`)
//! 2. Override file, either an explicit path or
//!    `~/.local/share/spendwise/config.toml`
//! 3. Environment variables (`CATEGORIZER_URL`, `CATEGORIZER_TIMEOUT_SECS`,
//!    `GEMINI_API_KEY`, `GEMINI_MODEL`, `GEMINI_API_BASE`)

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

use crate::ai::GenerationConfig;
use crate::error::{Error, Result};

/// Embedded default config (compiled into binary)
const DEFAULT_CONFIG: &str = include_str!("../../../config/spendwise.toml");

/// Categorization service settings
#[derive(Debug, Clone, PartialEq)]
pub struct CategorizerConfig {
    /// Base URL of the categorization service
    pub base_url: String,
    /// Per-request timeout
    pub timeout: Duration,
}

impl Default for CategorizerConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:5000".to_string(),
            timeout: Duration::from_secs(10),
        }
    }
}

/// Generative language API settings
#[derive(Debug, Clone, PartialEq)]
pub struct GeminiConfig {
    /// API credential; `None` means insights run in fallback-only mode
    pub api_key: Option<String>,
    pub model: String,
    pub base_url: String,
    pub timeout: Duration,
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: "gemini-1.5-flash".to_string(),
            base_url: "https://generativelanguage.googleapis.com/v1beta".to_string(),
            timeout: Duration::from_secs(30),
        }
    }
}

/// Complete service configuration
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Config {
    pub categorizer: CategorizerConfig,
    pub gemini: GeminiConfig,
    pub generation: GenerationConfig,
}

impl Config {
    /// Load from the default override location (or embedded defaults) plus environment
    pub fn load() -> Result<Self> {
        let mut config = load_file(default_config_path().as_deref())?;
        config.apply_env(|key| std::env::var(key).ok());
        Ok(config)
    }

    /// Load from an explicit override path plus environment
    pub fn load_from(path: &Path) -> Result<Self> {
        let mut config = load_file(Some(path))?;
        config.apply_env(|key| std::env::var(key).ok());
        Ok(config)
    }

    /// Parse config from TOML content (no environment overrides)
    pub fn from_toml(content: &str) -> Result<Self> {
        parse_config(content)
    }

    /// Apply environment overrides using the given lookup
    ///
    /// Empty values are ignored, so `GEMINI_API_KEY=""` leaves the credential unset.
    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        if let Some(url) = get("CATEGORIZER_URL") {
            self.categorizer.base_url = url;
        }
        if let Some(secs) = get("CATEGORIZER_TIMEOUT_SECS").and_then(|v| v.parse().ok()) {
            self.categorizer.timeout = Duration::from_secs(secs);
        }
        if let Some(key) = get("GEMINI_API_KEY") {
            self.gemini.api_key = Some(key);
        }
        if let Some(model) = get("GEMINI_MODEL") {
            self.gemini.model = model;
        }
        if let Some(base) = get("GEMINI_API_BASE") {
            self.gemini.base_url = base;
        }
    }

    /// Whether a generative API credential is configured
    pub fn has_ai_credential(&self) -> bool {
        self.gemini.api_key.is_some()
    }
}

/// Default config override path
pub fn default_config_path() -> Option<PathBuf> {
    dirs::data_local_dir().map(|d| d.join("spendwise").join("config.toml"))
}

/// Load configuration (override first, then embedded default)
fn load_file(override_path: Option<&Path>) -> Result<Config> {
    let content = match override_path {
        Some(path) if path.exists() => fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("Failed to read {}: {}", path.display(), e)))?,
        _ => DEFAULT_CONFIG.to_string(),
    };

    parse_config(&content)
}

/// Raw config structure for TOML parsing
#[derive(Debug, Deserialize)]
struct RawConfig {
    categorizer: Option<RawCategorizer>,
    gemini: Option<RawGemini>,
    generation: Option<RawGeneration>,
}

#[derive(Debug, Deserialize)]
struct RawCategorizer {
    base_url: Option<String>,
    timeout_secs: Option<u64>,
}

#[derive(Debug, Deserialize)]
struct RawGemini {
    api_key: Option<String>,
    model: Option<String>,
    base_url: Option<String>,
    timeout_secs: Option<u64>,
}

#[derive(Debug, Deserialize)]
struct RawGeneration {
    temperature: Option<f32>,
    top_k: Option<u32>,
    top_p: Option<f32>,
    max_output_tokens: Option<u32>,
}

/// Parse config from TOML content
fn parse_config(content: &str) -> Result<Config> {
    let raw: RawConfig =
        toml::from_str(content).map_err(|e| Error::Config(format!("Invalid config TOML: {}", e)))?;

    let mut config = Config::default();

    if let Some(categorizer) = raw.categorizer {
        if let Some(url) = categorizer.base_url {
            config.categorizer.base_url = url;
        }
        if let Some(secs) = categorizer.timeout_secs {
            config.categorizer.timeout = Duration::from_secs(secs);
        }
    }

    if let Some(gemini) = raw.gemini {
        config.gemini.api_key = gemini.api_key.filter(|k| !k.trim().is_empty());
        if let Some(model) = gemini.model {
            config.gemini.model = model;
        }
        if let Some(url) = gemini.base_url {
            config.gemini.base_url = url;
        }
        if let Some(secs) = gemini.timeout_secs {
            config.gemini.timeout = Duration::from_secs(secs);
        }
    }

    if let Some(generation) = raw.generation {
        if let Some(t) = generation.temperature {
            config.generation.temperature = t;
        }
        if let Some(k) = generation.top_k {
            config.generation.top_k = k;
        }
        if let Some(p) = generation.top_p {
            config.generation.top_p = p;
        }
        if let Some(m) = generation.max_output_tokens {
            config.generation.max_output_tokens = m;
        }
    }

    Ok(config)
}
