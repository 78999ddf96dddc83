pub mod analysis_config;
pub mod error;
pub mod llm_config;
pub mod prompt;
pub mod sniff;

// Tabular data model
pub mod table;
