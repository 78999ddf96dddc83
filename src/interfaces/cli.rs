use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::infrastructure::config::DEFAULT_CONFIG_FILE;

#[derive(Debug, Parser)]
#[command(
    name = "tabsight",
    about = "Metadata summaries for spreadsheets and delimited text files"
)]
pub struct Cli {
    /// TOML configuration file with [llm], [analysis] and [server] tables
    #[arg(long, global = true, env = "TABSIGHT_CONFIG", default_value = DEFAULT_CONFIG_FILE)]
    pub config: PathBuf,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Summarize one file and print the result
    Analyze {
        /// CSV, TSV, TXT, XLSX, XLSM, XLSB, XLS or ODS file
        file: PathBuf,

        /// Analyst prompt. Defaults to the metadata summary prompt.
        #[arg(short, long)]
        prompt: Option<String>,
    },
    /// Serve the HTTP API
    Serve {
        /// Overrides the configured bind address
        #[arg(long)]
        host: Option<String>,

        /// Overrides the configured port
        #[arg(long)]
        port: Option<u16>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_analyze() {
        let cli = Cli::parse_from(["tabsight", "analyze", "data.xlsx", "-p", "Which columns?"]);
        match cli.command {
            Commands::Analyze { file, prompt } => {
                assert_eq!(file, PathBuf::from("data.xlsx"));
                assert_eq!(prompt.as_deref(), Some("Which columns?"));
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn test_parse_serve_overrides() {
        let cli = Cli::parse_from(["tabsight", "serve", "--port", "8080"]);
        match cli.command {
            Commands::Serve { host, port } => {
                assert!(host.is_none());
                assert_eq!(port, Some(8080));
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn test_analyze_requires_file() {
        assert!(Cli::try_parse_from(["tabsight", "analyze"]).is_err());
    }
}
