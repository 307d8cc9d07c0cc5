use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::model::Severity;
use crate::report::ReportFormat;

#[derive(Parser)]
#[command(name = "reqsentry", version, about = "Requirements risk analyzer")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Analyze a requirements file or directory and render a report
    Analyze {
        /// Requirements file (.txt / .md) or directory
        input: PathBuf,
        /// External rule file replacing the built-in rule set
        #[arg(long, value_name = "FILE")]
        rules: Option<PathBuf>,
        #[arg(long, value_enum, default_value_t = ReportFormat::Md)]
        format: ReportFormat,
        /// Write the report here instead of the format's default file
        #[arg(long, short, value_name = "FILE")]
        output: Option<PathBuf>,
        /// Drop risks below this severity
        #[arg(long, value_enum)]
        min_severity: Option<Severity>,
        /// Restrict output to these categories (repeatable)
        #[arg(long, value_name = "CATEGORY")]
        category: Vec<String>,
        /// Keep exact-duplicate risks
        #[arg(long)]
        no_dedup: bool,
        /// Number of requirements in the ranking
        #[arg(long, value_name = "N")]
        top: Option<usize>,
        /// Suppress progress output
        #[arg(long, short)]
        quiet: bool,
    },
    /// List the active rule set
    Rules {
        /// External rule file replacing the built-in rule set
        #[arg(long, value_name = "FILE")]
        rules: Option<PathBuf>,
    },
}
