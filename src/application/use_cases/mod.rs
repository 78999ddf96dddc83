pub mod analysis;
pub mod fallback_description;
pub mod format_sniffer;
pub mod table_loader;
pub mod table_summarizer;
