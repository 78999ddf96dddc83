pub mod use_cases;

pub use use_cases::analysis::AnalysisOrchestrator;
pub use use_cases::table_loader::TableLoader;
