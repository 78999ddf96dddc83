mod app;
pub mod application;
pub mod domain;
pub mod infrastructure;
pub mod interfaces;

pub use app::{build_orchestrator, run};
pub use application::use_cases::analysis::AnalysisOrchestrator;
pub use application::use_cases::fallback_description::generate_description;
pub use domain::error::{AppError, Result};
pub use domain::table::Table;
