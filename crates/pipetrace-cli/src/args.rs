use crate::types::{LogLevel, OutputFormat, SourceFilter};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "pipetrace")]
#[command(about = "Inspect how far file-based code-generation pipelines have progressed", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Config file (defaults to PIPETRACE_CONFIG, then the system config dir)
    #[arg(long, global = true)]
    pub config: Option<String>,

    #[arg(long, default_value = "plain", global = true)]
    pub format: OutputFormat,

    /// Used when RUST_LOG is not set
    #[arg(long, default_value = "warn", global = true)]
    pub log_level: LogLevel,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List projects at or directly below ROOT
    Projects { root: Option<PathBuf> },

    /// Show the stage pipeline of one project
    Status { project: Option<PathBuf> },

    /// List issue, generated and verification reports, newest first
    Reports {
        project: Option<PathBuf>,

        #[arg(long)]
        source: Option<SourceFilter>,

        #[arg(long)]
        limit: Option<usize>,
    },

    /// Locate the generated database dump
    Dump { project: Option<PathBuf> },

    /// Snapshot every project under ROOT
    Scan { root: Option<PathBuf> },
}
