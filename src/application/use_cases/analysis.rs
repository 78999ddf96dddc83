// ============================================================
// ANALYSIS ORCHESTRATOR
// ============================================================
// Sniff -> load -> AI attempts -> deterministic fallback

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::{error, info, warn};

use crate::application::use_cases::fallback_description::generate_description;
use crate::application::use_cases::format_sniffer::FormatSniffer;
use crate::application::use_cases::table_loader::TableLoader;
use crate::application::use_cases::table_summarizer::TableSummarizer;
use crate::domain::analysis_config::AnalysisConfig;
use crate::domain::error::{AppError, Result};
use crate::domain::sniff::{file_extension, FileFormat};
use crate::domain::table::Table;
use crate::infrastructure::response::is_no_answer;

/// Why one AI attempt did not produce a usable answer
#[derive(Debug)]
pub enum AttemptFailure {
    Error(AppError),
    Empty,
    Sentinel,
}

impl fmt::Display for AttemptFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AttemptFailure::Error(e) => write!(f, "{}", e),
            AttemptFailure::Empty => write!(f, "empty response"),
            AttemptFailure::Sentinel => write!(f, "backend could not answer"),
        }
    }
}

pub struct AnalysisOrchestrator {
    sniffer: FormatSniffer,
    loader: Arc<TableLoader>,
    summarizer: Option<Arc<dyn TableSummarizer>>,
    max_attempts: usize,
    sentinel: String,
}

impl AnalysisOrchestrator {
    pub fn new(config: &AnalysisConfig, summarizer: Option<Arc<dyn TableSummarizer>>) -> Self {
        Self {
            sniffer: FormatSniffer::new(config),
            loader: Arc::new(TableLoader::standard(config)),
            summarizer,
            max_attempts: config.max_attempts,
            sentinel: config.no_answer_sentinel.clone(),
        }
    }

    pub fn with_loader(mut self, loader: TableLoader) -> Self {
        self.loader = Arc::new(loader);
        self
    }

    pub fn has_ai_backend(&self) -> bool {
        self.summarizer.is_some()
    }

    /// Always yields one string: the AI answer, the fallback summary, or
    /// an `Error processing file:` message.
    pub async fn analyze(&self, path: &Path, prompt: &str) -> String {
        match self.run(path, prompt).await {
            Ok(text) => text,
            Err(e) => {
                error!(path = %path.display(), error = %e, "Analysis failed");
                format!("Error processing file: {}", e)
            }
        }
    }

    async fn run(&self, path: &Path, prompt: &str) -> Result<String> {
        info!(
            path = %path.display(),
            extension = %file_extension(path),
            "Analysis started"
        );
        let format = FileFormat::from_path(path)?;

        let (table, sheet_names) = self.read_table(path.to_path_buf(), format).await?;

        if let Some(answer) = self.ask_ai(&table, &sheet_names, prompt).await {
            return Ok(answer);
        }

        info!(path = %path.display(), "Using fallback description");
        Ok(generate_description(&table))
    }

    /// Sniff then load on the blocking pool. Also returns the workbook's
    /// sheet names when the sniffer found any.
    async fn read_table(&self, path: PathBuf, format: FileFormat) -> Result<(Table, Vec<String>)> {
        let sniffer = self.sniffer.clone();
        let loader = Arc::clone(&self.loader);

        let task = tokio::task::spawn_blocking(move || -> Result<(Table, Vec<String>)> {
            let preview = match sniffer.sniff(&path, format) {
                Ok(preview) => Some(preview),
                Err(e) => {
                    warn!(path = %path.display(), %format, error = %e, "Sniffing failed, loading without preview");
                    None
                }
            };
            let table = loader.load(&path, format, preview.as_ref())?;
            let sheet_names = preview.map(|p| p.sheet_names).unwrap_or_default();
            Ok((table, sheet_names))
        });

        task.await
            .map_err(|e| AppError::Internal(format!("file parsing task failed: {}", e)))?
    }

    /// Up to `max_attempts` calls; `None` when there is no backend or
    /// every attempt failed
    async fn ask_ai(&self, table: &Table, sheet_names: &[String], prompt: &str) -> Option<String> {
        let Some(summarizer) = self.summarizer.as_ref() else {
            info!("No AI backend configured");
            return None;
        };

        for attempt in 1..=self.max_attempts {
            info!(attempt, max_attempts = self.max_attempts, "AI attempt");
            match self
                .attempt(summarizer.as_ref(), table, sheet_names, prompt)
                .await
            {
                Ok(answer) => {
                    info!(attempt, "AI answer accepted");
                    return Some(answer);
                }
                Err(failure) => {
                    warn!(attempt, reason = %failure, "AI attempt failed");
                }
            }
        }

        warn!(max_attempts = self.max_attempts, "AI attempts exhausted");
        None
    }

    async fn attempt(
        &self,
        summarizer: &dyn TableSummarizer,
        table: &Table,
        sheet_names: &[String],
        prompt: &str,
    ) -> std::result::Result<String, AttemptFailure> {
        let answer = summarizer
            .summarize_workbook(table, sheet_names, prompt)
            .await
            .map_err(AttemptFailure::Error)?;

        let answer = answer.trim();
        if answer.is_empty() {
            return Err(AttemptFailure::Empty);
        }
        if is_no_answer(answer, &self.sentinel) {
            return Err(AttemptFailure::Sentinel);
        }
        Ok(answer.to_string())
    }
}
