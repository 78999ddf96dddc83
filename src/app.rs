use std::error::Error;
use std::sync::{Arc, Mutex};

use clap::Parser;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use crate::application::use_cases::analysis::AnalysisOrchestrator;
use crate::application::use_cases::table_summarizer::{LlmTableSummarizer, TableSummarizer};
use crate::domain::prompt::resolve_prompt;
use crate::infrastructure::config::{AppConfig, ConfigService};
use crate::infrastructure::llm_clients::AzureOpenAIClient;
use crate::infrastructure::storage::ensure_uploads_dir;
use crate::interfaces::cli::{Cli, Commands};
use crate::interfaces::http::{add_log, start_server, HttpState};

pub async fn run() -> Result<(), Box<dyn Error>> {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .try_init();

    if let Err(err) = dotenvy::dotenv() {
        if !err.not_found() {
            warn!(error = %err, "Failed to read .env file");
        }
    }

    let cli = Cli::parse();
    let config = ConfigService::new(&cli.config).load()?;
    let orchestrator = Arc::new(build_orchestrator(&config));

    match cli.command {
        Commands::Analyze { file, prompt } => {
            let result = orchestrator
                .analyze(&file, resolve_prompt(prompt.as_deref()))
                .await;
            println!("{}", result);
        }
        Commands::Serve { host, port } => {
            let host = host.unwrap_or(config.server.host);
            let port = port.unwrap_or(config.server.port);
            let uploads_dir = ensure_uploads_dir(&std::env::temp_dir())?;

            let logs = Arc::new(Mutex::new(Vec::new()));
            add_log(
                &logs,
                "INFO",
                "System",
                &format!("HTTP API listening on {}:{}", host, port),
            );
            info!(%host, port, uploads_dir = %uploads_dir.display(), "Starting HTTP server");

            let state = HttpState {
                orchestrator,
                logs,
                uploads_dir,
            };
            start_server(state, &host, port)?.await?;
        }
    }

    Ok(())
}

/// Wires the pipeline. A missing or invalid Azure OpenAI setup is not
/// fatal: the orchestrator then answers with the fallback summary only.
pub fn build_orchestrator(config: &AppConfig) -> AnalysisOrchestrator {
    let summarizer: Option<Arc<dyn TableSummarizer>> = match AzureOpenAIClient::new(&config.llm) {
        Ok(client) => {
            info!(
                deployment = config.llm.deployment_name.as_deref().unwrap_or_default(),
                "Azure OpenAI backend configured"
            );
            Some(Arc::new(LlmTableSummarizer::new(
                Arc::new(client),
                config.llm.clone(),
                config.analysis.llm_context_rows,
            )))
        }
        Err(err) => {
            warn!(error = %err, "No AI backend, summaries will use the fallback description");
            None
        }
    };

    AnalysisOrchestrator::new(&config.analysis, summarizer)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_credentials_disable_ai_backend() {
        let orchestrator = build_orchestrator(&AppConfig::default());
        assert!(!orchestrator.has_ai_backend());
    }
}
