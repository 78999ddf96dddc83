use super::LLMClient;
use crate::domain::error::{AppError, Result};
use crate::domain::llm_config::{AzureCredentials, LLMConfig};
use async_trait::async_trait;
use serde_json::json;
use std::time::Duration;

/// Chat-completions client for an Azure OpenAI deployment
pub struct AzureOpenAIClient {
    client: reqwest::Client,
}

impl AzureOpenAIClient {
    /// Fails when any of the four connection values is missing.
    pub fn new(config: &LLMConfig) -> Result<Self> {
        config.credentials()?;

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| AppError::LLMError(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self { client })
    }

    pub fn completions_url(creds: &AzureCredentials<'_>) -> String {
        format!(
            "{}/openai/deployments/{}/chat/completions?api-version={}",
            creds.endpoint.trim_end_matches('/'),
            creds.deployment_name,
            creds.api_version
        )
    }
}

#[async_trait]
impl LLMClient for AzureOpenAIClient {
    async fn generate(&self, config: &LLMConfig, system: &str, user: &str) -> Result<String> {
        let creds = config.credentials()?;
        let url = Self::completions_url(&creds);

        let body = json!({
            "messages": [
                {
                    "role": "system",
                    "content": system
                },
                {
                    "role": "user",
                    "content": user
                }
            ],
            "max_tokens": config.max_tokens,
            "temperature": config.temperature,
        });

        let response = self
            .client
            .post(&url)
            .header("api-key", creds.api_token)
            .json(&body)
            .send()
            .await
            .map_err(|e| AppError::LLMError(format!("Request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            return Err(AppError::LLMError(format!(
                "API error ({}): {}",
                status, text
            )));
        }

        let json: serde_json::Value = response
            .json()
            .await
            .map_err(|e| AppError::LLMError(format!("Failed to parse JSON: {}", e)))?;

        extract_content(&json)
    }
}

/// A filtered or empty completion comes back with `content: null`; that is
/// an empty answer, not a malformed response.
fn extract_content(json: &serde_json::Value) -> Result<String> {
    let message = &json["choices"][0]["message"];
    if message.is_null() {
        return Err(AppError::LLMError("Invalid response format".to_string()));
    }
    Ok(message["content"].as_str().unwrap_or_default().to_string())
}
