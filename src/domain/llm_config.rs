use serde::{Deserialize, Serialize};

use crate::domain::error::{AppError, Result};

/// Connection settings for an Azure OpenAI chat deployment.
///
/// Every connection field is optional so the config can be built from a
/// partially populated environment; [`LLMConfig::credentials`] is where a
/// missing value becomes an error.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct LLMConfig {
    pub endpoint: Option<String>,
    pub api_token: Option<String>,
    pub deployment_name: Option<String>,
    pub api_version: Option<String>,
    pub max_tokens: Option<u32>,
    pub temperature: Option<f32>,
    pub timeout_secs: u64,
}

impl Default for LLMConfig {
    fn default() -> Self {
        Self {
            endpoint: None,
            api_token: None,
            deployment_name: None,
            api_version: None,
            max_tokens: Some(1024),
            temperature: Some(0.2),
            timeout_secs: 120,
        }
    }
}

/// Borrowed view of the four values a request cannot be sent without.
#[derive(Debug, Clone, Copy)]
pub struct AzureCredentials<'a> {
    pub endpoint: &'a str,
    pub api_token: &'a str,
    pub deployment_name: &'a str,
    pub api_version: &'a str,
}

impl LLMConfig {
    pub fn credentials(&self) -> Result<AzureCredentials<'_>> {
        Ok(AzureCredentials {
            endpoint: required(&self.endpoint, "AZURE_OPENAI_ENDPOINT")?,
            api_token: required(&self.api_token, "AZURE_OPENAI_API_TOKEN")?,
            deployment_name: required(&self.deployment_name, "AZURE_OPENAI_DEPLOYMENT_NAME")?,
            api_version: required(&self.api_version, "AZURE_OPENAI_API_VERSION")?,
        })
    }
}

fn required<'a>(value: &'a Option<String>, name: &str) -> Result<&'a str> {
    match value.as_deref().map(str::trim) {
        Some(v) if !v.is_empty() => Ok(v),
        _ => Err(AppError::ConfigError(format!("{} is not set", name))),
    }
}
