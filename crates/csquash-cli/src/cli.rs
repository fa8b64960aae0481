use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "csquash")]
#[command(about = "Stylesheet compactor")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Compact (or pretty-print) a stylesheet
    Build {
        /// Input stylesheet
        input: PathBuf,
        /// Output file; stdout when omitted
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Pretty-print instead of minifying
        #[arg(long)]
        pretty: bool,
        /// Overwrite the output file if it exists
        #[arg(long)]
        force: bool,
        /// Copyright line for the header comment
        #[arg(long)]
        copyright: Option<String>,
        /// Timestamp format for the header comment (chrono syntax)
        #[arg(long = "timestamp-format")]
        timestamp_format: Option<String>,
    },
}
