//! Configuration for the claimcheck server.
//!
//! Settings come from an optional JSON file (`claimcheck.json`) with
//! defaults for every field, plus two environment overrides that form the
//! documented configuration surface: `GENERATION_API_KEY` (the credential
//! enabling the external generation path) and `USE_MOCK_AI` (a
//! boolean-like flag forcing local synthesis regardless of credential
//! presence). The credential is only ever read from the environment,
//! never from the file.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{QuizError, Result};

/// The default config file name.
const CONFIG_FILE_NAME: &str = "claimcheck.json";

/// Environment variable holding the generation credential.
pub const ENV_GENERATION_API_KEY: &str = "GENERATION_API_KEY";

/// Environment variable forcing local synthesis.
pub const ENV_USE_MOCK_AI: &str = "USE_MOCK_AI";

/// Default HTTP port.
const fn default_port() -> u16 {
    3000
}

/// Default quiz retention in seconds (24 hours).
const fn default_quiz_ttl_secs() -> u64 {
    86_400
}

/// Default generation service base URL.
fn default_base_url() -> String {
    "https://api.openai.com".to_string()
}

/// Default generation model.
fn default_model() -> String {
    "gpt-4.1-mini".to_string()
}

/// Default generation request timeout in seconds.
const fn default_generation_timeout_secs() -> u64 {
    30
}

/// Which synthesis path quiz creation will take.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SynthesisMode {
    /// Rule-based local synthesis.
    Local,
    /// Remote generation via the external adapter.
    External,
}

/// Main configuration for the claimcheck server.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    /// Port for the HTTP API server.
    #[serde(default = "default_port")]
    pub port: u16,

    /// Force local synthesis even when a credential is configured.
    #[serde(default)]
    pub use_mock_ai: bool,

    /// Seconds a stored quiz stays retrievable before it reads as
    /// not-found.
    #[serde(default = "default_quiz_ttl_secs")]
    pub quiz_ttl_secs: u64,

    /// External generation settings.
    #[serde(default)]
    pub generation: GenerationSettings,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: default_port(),
            use_mock_ai: false,
            quiz_ttl_secs: default_quiz_ttl_secs(),
            generation: GenerationSettings::default(),
        }
    }
}

/// Settings for the external generation service.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationSettings {
    /// Base URL of the OpenAI-compatible service.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Model name sent with generation requests.
    #[serde(default = "default_model")]
    pub model: String,

    /// Request timeout in seconds for the generation call.
    #[serde(default = "default_generation_timeout_secs")]
    pub timeout_secs: u64,

    /// Generation credential. Environment-only; never serialized and
    /// never read from the config file.
    #[serde(skip)]
    pub api_key: Option<String>,
}

impl Default for GenerationSettings {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            model: default_model(),
            timeout_secs: default_generation_timeout_secs(),
            api_key: None,
        }
    }
}

impl Config {
    /// Loads configuration from the current working directory.
    ///
    /// Looks for `claimcheck.json` in the current directory. If not
    /// found, returns default configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but contains invalid JSON, or
    /// if the loaded values fail validation.
    pub fn load() -> Result<Self> {
        let current_dir = std::env::current_dir().map_err(|e| {
            QuizError::config_parse(
                "<current directory>",
                format!("cannot determine current directory: {e}"),
            )
        })?;
        Self::load_from_dir(&current_dir)
    }

    /// Loads configuration from a specific directory.
    ///
    /// # Errors
    ///
    /// Same as [`Config::load_from_file`].
    pub fn load_from_dir(dir: &Path) -> Result<Self> {
        let config_path = dir.join(CONFIG_FILE_NAME);
        Self::load_from_file(&config_path)
    }

    /// Loads configuration from a specific file path.
    ///
    /// If the file does not exist, returns default configuration.
    ///
    /// # Errors
    ///
    /// Returns `QuizError::ConfigParseError` if the file exists but
    /// contains invalid JSON, and `QuizError::ConfigValidationError` if
    /// the values are invalid.
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let contents = match std::fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                let config = Self::default();
                config.validate()?;
                return Ok(config);
            }
            Err(e) => {
                return Err(QuizError::config_parse(
                    path,
                    format!("failed to read file: {e}"),
                ));
            }
        };

        let config: Self = serde_json::from_str(&contents)
            .map_err(|e| QuizError::config_parse(path, e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Applies the environment overrides (`GENERATION_API_KEY` and
    /// `USE_MOCK_AI`).
    pub fn apply_env(&mut self) {
        self.apply_overrides(
            std::env::var(ENV_GENERATION_API_KEY).ok(),
            std::env::var(ENV_USE_MOCK_AI).ok(),
        );
    }

    /// Applies override values as they would come from the environment.
    /// Split out from [`Config::apply_env`] so tests need not mutate the
    /// process environment.
    pub fn apply_overrides(&mut self, api_key: Option<String>, use_mock_ai: Option<String>) {
        if let Some(key) = api_key {
            if !key.trim().is_empty() {
                self.generation.api_key = Some(key);
            }
        }
        if let Some(flag) = use_mock_ai {
            if parse_flag(&flag) {
                self.use_mock_ai = true;
            }
        }
    }

    /// Validates the configuration values.
    ///
    /// # Errors
    ///
    /// Returns `QuizError::ConfigValidationError` if any check fails.
    pub fn validate(&self) -> Result<()> {
        if self.quiz_ttl_secs == 0 {
            return Err(QuizError::config_validation(
                "quizTtlSecs must be greater than 0",
                "Set quizTtlSecs to at least 1 second in your claimcheck.json",
            ));
        }

        if self.generation.timeout_secs == 0 {
            return Err(QuizError::config_validation(
                "generation.timeoutSecs must be greater than 0",
                "Set generation.timeoutSecs to at least 1 second in your claimcheck.json",
            ));
        }

        if self.generation.base_url.trim().is_empty() {
            return Err(QuizError::config_validation(
                "generation.baseUrl must not be empty",
                "Provide the generation service URL in your claimcheck.json",
            ));
        }

        if self.generation.model.trim().is_empty() {
            return Err(QuizError::config_validation(
                "generation.model must not be empty",
                "Provide a model name in your claimcheck.json",
            ));
        }

        Ok(())
    }

    /// Selects the synthesis path.
    ///
    /// Local synthesis wins when the mock flag is set or when no
    /// credential is configured; the absence of a credential forces the
    /// local path regardless of the flag.
    #[must_use]
    pub fn synthesis_mode(&self) -> SynthesisMode {
        let has_credential = self
            .generation
            .api_key
            .as_deref()
            .is_some_and(|key| !key.trim().is_empty());

        if self.use_mock_ai || !has_credential {
            SynthesisMode::Local
        } else {
            SynthesisMode::External
        }
    }
}

/// Parses a boolean-like environment flag ("true" or "1", case-insensitive).
fn parse_flag(value: &str) -> bool {
    matches!(value.trim().to_lowercase().as_str(), "true" | "1")
}
