use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::error::Result;
use crate::domain::llm_config::LLMConfig;
use crate::domain::table::{CellValue, Table};
use crate::infrastructure::llm_clients::LLMClient;
use crate::infrastructure::response::clean_llm_response;

/// Produces free-text analysis of a table for an analyst prompt.
///
/// May fail, return an empty string, or return the backend's
/// "no answer" message; the orchestrator handles all three.
#[async_trait]
pub trait TableSummarizer: Send + Sync {
    async fn summarize(&self, table: &Table, prompt: &str) -> Result<String>;

    /// [`summarize`](Self::summarize) with the workbook's sheet names as
    /// extra context. The default ignores them.
    async fn summarize_workbook(
        &self,
        table: &Table,
        sheet_names: &[String],
        prompt: &str,
    ) -> Result<String> {
        let _ = sheet_names;
        self.summarize(table, prompt).await
    }
}

const SYSTEM_PROMPT: &str = "You are a data analyst describing a dataset for a colleague who is \
deciding whether to load it. Answer only from the table excerpt provided. Reply in plain text \
without code, charts, or images.";

/// [`TableSummarizer`] backed by a chat-completions [`LLMClient`]
pub struct LlmTableSummarizer {
    llm_client: Arc<dyn LLMClient + Send + Sync>,
    config: LLMConfig,
    context_rows: usize,
}

impl LlmTableSummarizer {
    pub fn new(
        llm_client: Arc<dyn LLMClient + Send + Sync>,
        config: LLMConfig,
        context_rows: usize,
    ) -> Self {
        Self {
            llm_client,
            config,
            context_rows,
        }
    }
}

#[async_trait]
impl TableSummarizer for LlmTableSummarizer {
    async fn summarize(&self, table: &Table, prompt: &str) -> Result<String> {
        self.summarize_workbook(table, &[], prompt).await
    }

    async fn summarize_workbook(
        &self,
        table: &Table,
        sheet_names: &[String],
        prompt: &str,
    ) -> Result<String> {
        let user_prompt = format!(
            "{}\n\n{}",
            build_table_context(table, sheet_names, self.context_rows),
            prompt.trim()
        );

        let raw = self
            .llm_client
            .generate(&self.config, SYSTEM_PROMPT, &user_prompt)
            .await?;

        Ok(clean_llm_response(&raw))
    }
}

/// Sheet names, shape, column types, and the first rows as a pipe table
pub fn build_table_context(table: &Table, sheet_names: &[String], rows: usize) -> String {
    let (row_count, column_count) = table.shape();
    let mut out = String::new();
    if let Some(first) = sheet_names.first() {
        out.push_str(&format!(
            "Workbook sheets: {} (table below is from '{}').\n",
            sheet_names.join(", "),
            first
        ));
    }
    out.push_str(&format!(
        "Dataset: {} rows x {} columns.\nColumns:\n",
        row_count, column_count
    ));

    for column in table.columns() {
        out.push_str(&format!(
            "- {} ({}, {} missing)\n",
            column.name,
            column.dtype,
            column.null_count()
        ));
    }

    let shown = rows.min(row_count);
    if shown == 0 || column_count == 0 {
        return out;
    }

    out.push_str(&format!("\nFirst {} rows:\n", shown));
    out.push_str(&format!("| {} |\n", table.column_names().join(" | ")));
    out.push_str(&format!("|{}\n", "---|".repeat(column_count)));
    for index in 0..shown {
        if let Some(row) = table.row(index) {
            let cells: Vec<String> = row.iter().map(|(_, value)| render_cell(value)).collect();
            out.push_str(&format!("| {} |\n", cells.join(" | ")));
        }
    }

    out
}

fn render_cell(value: &CellValue) -> String {
    value.to_string().replace('|', "\\|").replace(['\n', '\r'], " ")
}
