use serde::{Deserialize, Serialize};

/// Prefix shared by the most common "could not answer" replies of the
/// dataframe chat backend.
pub const DEFAULT_NO_ANSWER_SENTINEL: &str = "Unfortunately, I was not able to";

/// Tuning knobs for sniffing, loading and the AI retry loop
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisConfig {
    /// Total LLM attempts before degrading to the deterministic summary (default: 3)
    pub max_attempts: usize,

    /// Data rows read into a sniffing preview (default: 5)
    pub preview_rows: usize,

    /// Leading bytes inspected by the delimiter heuristic (default: 1024)
    pub sniff_sample_bytes: usize,

    /// Responses starting with this text count as "no answer"
    pub no_answer_sentinel: String,

    /// Rows of the table rendered into the LLM prompt (default: 20)
    pub llm_context_rows: usize,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            preview_rows: 5,
            sniff_sample_bytes: 1024,
            no_answer_sentinel: DEFAULT_NO_ANSWER_SENTINEL.to_string(),
            llm_context_rows: 20,
        }
    }
}

impl AnalysisConfig {
    /// Validate configuration values
    pub fn validate(&self) -> Result<(), String> {
        if self.max_attempts == 0 {
            return Err("max_attempts must be > 0".to_string());
        }
        if self.preview_rows == 0 {
            return Err("preview_rows must be > 0".to_string());
        }
        if self.sniff_sample_bytes == 0 {
            return Err("sniff_sample_bytes must be > 0".to_string());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = AnalysisConfig::default();
        assert_eq!(config.max_attempts, 3);
        assert_eq!(config.preview_rows, 5);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_zero_attempts_rejected() {
        let config = AnalysisConfig {
            max_attempts: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }
}
