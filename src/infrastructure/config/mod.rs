use std::path::PathBuf;

use figment::providers::{Env, Format, Serialized, Toml};
use figment::Figment;
use serde::{Deserialize, Serialize};

use crate::domain::analysis_config::AnalysisConfig;
use crate::domain::error::{AppError, Result};
use crate::domain::llm_config::LLMConfig;

pub const DEFAULT_CONFIG_FILE: &str = "tabsight.toml";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 3001,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct AppConfig {
    pub llm: LLMConfig,
    pub analysis: AnalysisConfig,
    pub server: ServerConfig,
}

/// Builds the process-wide configuration once at startup.
///
/// Sources, lowest precedence first: built-in defaults, the `[llm]`,
/// `[analysis]` and `[server]` tables of the TOML file, then environment
/// variables (`AZURE_OPENAI_*`, `TABSIGHT_ANALYSIS_*`, `TABSIGHT_SERVER_*`).
pub struct ConfigService {
    config_file: PathBuf,
}

impl ConfigService {
    pub fn new(config_file: impl Into<PathBuf>) -> Self {
        Self {
            config_file: config_file.into(),
        }
    }

    pub fn load(&self) -> Result<AppConfig> {
        let file = Figment::new().merge(Toml::file(&self.config_file));

        let llm: LLMConfig = Figment::from(Serialized::defaults(LLMConfig::default()))
            .merge(file.focus("llm"))
            .merge(Env::prefixed("AZURE_OPENAI_"))
            .extract()?;

        let analysis: AnalysisConfig =
            Figment::from(Serialized::defaults(AnalysisConfig::default()))
                .merge(file.focus("analysis"))
                .merge(Env::prefixed("TABSIGHT_ANALYSIS_"))
                .extract()?;

        analysis.validate().map_err(|e| {
            AppError::ConfigError(format!("Invalid analysis config: {}", e))
        })?;

        let server: ServerConfig = Figment::from(Serialized::defaults(ServerConfig::default()))
            .merge(file.focus("server"))
            .merge(Env::prefixed("TABSIGHT_SERVER_"))
            .extract()?;

        Ok(AppConfig {
            llm,
            analysis,
            server,
        })
    }
}

impl Default for ConfigService {
    fn default() -> Self {
        Self::new(DEFAULT_CONFIG_FILE)
    }
}
