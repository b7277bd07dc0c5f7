//! Configuration management for the CLI.

use crate::error::{CliError, Result};
use segue_domain::TransitionOracle;
use segue_extractor::{ExtractorConfig, LlmOracle};
use segue_llm::ollama::{self, OllamaProvider};
use segue_llm::openai_compat::{self, OpenAiCompatProvider};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::debug;

/// Boxed oracle handed to the extractor.
pub type BoxedOracle = Box<dyn TransitionOracle + Send + Sync>;

/// CLI configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Extraction settings
    #[serde(default)]
    pub extractor: ExtractorConfig,

    /// Oracle backend settings
    #[serde(default)]
    pub oracle: OracleSettings,

    /// Global settings
    #[serde(default)]
    pub settings: Settings,
}

/// Which backend answers oracle prompts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    /// No backend; enabling the oracle then rejects every candidate
    #[default]
    None,
    /// Local Ollama server
    Ollama,
    /// OpenAI-compatible chat completions endpoint
    Openai,
}

/// Oracle backend settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OracleSettings {
    /// Backend kind
    #[serde(default)]
    pub provider: ProviderKind,

    /// Base URL; the provider's default when absent
    #[serde(skip_serializing_if = "Option::is_none")]
    pub endpoint: Option<String>,

    /// Model name
    #[serde(default = "default_model")]
    pub model: String,

    /// Environment variable holding the API key
    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,

    /// Request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

/// Global CLI settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Enable colored output
    #[serde(default = "default_true")]
    pub color: bool,

    /// Default output format
    #[serde(default = "default_format")]
    pub format: OutputFormat,
}

/// Output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Summary and preview
    Text,
    /// JSON format
    Json,
}

impl Config {
    /// Get the default configuration file path.
    pub fn default_path() -> Result<PathBuf> {
        let home = dirs::home_dir()
            .ok_or_else(|| CliError::Config("Could not find home directory".into()))?;
        Ok(home.join(".segue").join("config.toml"))
    }

    /// Load configuration from `path`, or defaults when it does not exist.
    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            debug!("Loading config from {}", path.display());
            let contents = fs::read_to_string(path)?;
            let config: Config = toml::from_str(&contents)?;
            config.extractor.validate()?;
            Ok(config)
        } else {
            Ok(Self::default())
        }
    }

    /// Save configuration to `path`.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        // Create parent directory if it doesn't exist
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        fs::write(path, self.to_toml()?)?;
        Ok(())
    }

    /// Serialize to TOML.
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self)
            .map_err(|e| CliError::Config(format!("Failed to serialize config: {}", e)))
    }
}

impl OracleSettings {
    /// Build the configured oracle, `None` when no provider is set.
    ///
    /// `model` overrides the configured model name.
    pub fn build_oracle(&self, model: Option<&str>) -> Result<Option<BoxedOracle>> {
        let model = model.unwrap_or(&self.model).to_string();
        let timeout = Duration::from_secs(self.timeout_secs);

        let oracle: BoxedOracle = match self.provider {
            ProviderKind::None => return Ok(None),
            ProviderKind::Ollama => {
                let endpoint = self.endpoint.as_deref().unwrap_or(ollama::DEFAULT_ENDPOINT);
                Box::new(LlmOracle::new(OllamaProvider::with_timeout(endpoint, model, timeout)?))
            }
            ProviderKind::Openai => {
                let endpoint = self
                    .endpoint
                    .as_deref()
                    .unwrap_or(openai_compat::DEFAULT_BASE_URL);
                Box::new(LlmOracle::new(OpenAiCompatProvider::from_env(
                    endpoint,
                    model,
                    &self.api_key_env,
                    timeout,
                )?))
            }
        };

        debug!("Oracle backend: {:?}", self.provider);
        Ok(Some(oracle))
    }
}

impl Default for OracleSettings {
    fn default() -> Self {
        Self {
            provider: ProviderKind::None,
            endpoint: None,
            model: default_model(),
            api_key_env: default_api_key_env(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            color: true,
            format: OutputFormat::Text,
        }
    }
}

fn default_model() -> String {
    "llama3".to_string()
}

fn default_api_key_env() -> String {
    openai_compat::DEFAULT_API_KEY_ENV.to_string()
}

fn default_timeout_secs() -> u64 {
    ollama::DEFAULT_TIMEOUT_SECS
}

fn default_true() -> bool {
    true
}

fn default_format() -> OutputFormat {
    OutputFormat::Text
}

#[cfg(test)]
mod tests {
    use super::*;
    use segue_extractor::DetectionVariant;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.oracle.provider, ProviderKind::None);
        assert_eq!(config.oracle.api_key_env, "OPENAI_API_KEY");
        assert!(config.settings.color);
        assert!(!config.extractor.use_oracle);
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let config: Config = toml::from_str(
            r#"
            [extractor]
            detection_variant = "shape-heuristic"
            usage_cap = 2

            [oracle]
            provider = "ollama"
            "#,
        )
        .unwrap();

        assert_eq!(config.extractor.detection_variant, DetectionVariant::ShapeHeuristic);
        assert_eq!(config.extractor.usage_cap, 2);
        assert_eq!(config.extractor.similarity_threshold, 0.8);
        assert_eq!(config.oracle.provider, ProviderKind::Ollama);
        assert_eq!(config.oracle.timeout_secs, 30);
        assert_eq!(config.settings.format, OutputFormat::Text);
    }

    #[test]
    fn test_save_and_load_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let mut config = Config::default();
        config.extractor.usage_cap = 5;
        config.oracle.provider = ProviderKind::Openai;
        config.save_to(&path).unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded.extractor.usage_cap, 5);
        assert_eq!(loaded.oracle.provider, ProviderKind::Openai);
    }

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load_from(&dir.path().join("absent.toml")).unwrap();
        assert_eq!(config.extractor.usage_cap, 3);
    }

    #[test]
    fn test_invalid_extractor_section_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "[extractor]\nusage_cap = 0\n").unwrap();
        assert!(Config::load_from(&path).is_err());
    }

    #[test]
    fn test_no_provider_builds_no_oracle() {
        let settings = OracleSettings::default();
        assert!(settings.build_oracle(None).unwrap().is_none());
    }

    #[test]
    fn test_openai_without_key_is_an_error() {
        let settings = OracleSettings {
            provider: ProviderKind::Openai,
            api_key_env: "SEGUE_TEST_KEY_THAT_IS_NOT_SET".to_string(),
            ..OracleSettings::default()
        };
        assert!(matches!(
            settings.build_oracle(Some("gpt-4o-mini")),
            Err(CliError::Llm(_))
        ));
    }
}
