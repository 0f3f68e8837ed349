use super::args::{Cli, Commands};
use crate::logging;
use crate::types::OutputFormat;
use crate::views::{DumpView, ProjectListView, ReportListView, ScanView, StatusView, ViewOptions};
use anyhow::{Context, Result};
use chrono::Utc;
use is_terminal::IsTerminal;
use pipetrace_core::expand_tilde;
use pipetrace_engine::{Config, Engine, project_name};
use pipetrace_types::{Project, ReportSource};
use serde::Serialize;
use std::fmt::Display;
use std::path::PathBuf;

fn current_dir() -> Result<PathBuf> {
    std::env::current_dir().context("Could not determine current directory")
}

/// Search root priority: argument, configured `search_root`, current directory.
fn resolve_root(arg: Option<PathBuf>, config: &Config) -> Result<PathBuf> {
    if let Some(root) = arg {
        return Ok(root);
    }
    if let Some(root) = &config.search_root {
        return Ok(expand_tilde(&root.to_string_lossy()));
    }
    current_dir()
}

fn resolve_project(arg: Option<PathBuf>) -> Result<PathBuf> {
    match arg {
        Some(path) => Ok(path),
        None => current_dir(),
    }
}

fn emit<T: Serialize, V: Display>(format: OutputFormat, value: &T, view: V) -> Result<()> {
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(value)?),
        OutputFormat::Plain => print!("{}", view),
    }
    Ok(())
}

pub fn run(cli: Cli) -> Result<()> {
    logging::init(cli.log_level);

    let config = Config::load(cli.config.as_deref())?;
    let engine = Engine::new(config);
    let options = ViewOptions {
        enable_color: cli.format == OutputFormat::Plain && std::io::stdout().is_terminal(),
        now: Utc::now(),
    };

    match cli.command {
        Commands::Projects { root } => {
            let root = resolve_root(root, engine.config())?;
            let projects = engine.projects(&root)?;
            emit(
                cli.format,
                &projects,
                ProjectListView {
                    root: &root,
                    projects: &projects,
                    options: &options,
                },
            )
        }

        Commands::Status { project } => {
            let path = resolve_project(project)?;
            let project = Project {
                name: project_name(&path),
                stats: engine.stats(&path),
                path,
            };
            emit(
                cli.format,
                &project,
                StatusView {
                    project: &project,
                    options: &options,
                },
            )
        }

        Commands::Reports {
            project,
            source,
            limit,
        } => {
            let path = resolve_project(project)?;
            let mut reports = engine.reports(&path);
            if let Some(source) = source {
                let source = ReportSource::from(source);
                reports.retain(|r| r.source == source);
            }
            if let Some(limit) = limit {
                reports.truncate(limit);
            }
            emit(
                cli.format,
                &reports,
                ReportListView {
                    reports: &reports,
                    options: &options,
                },
            )
        }

        Commands::Dump { project } => {
            let path = resolve_project(project)?;
            let dump = engine.dump(&path);
            emit(
                cli.format,
                &dump,
                DumpView {
                    dump: &dump,
                    options: &options,
                },
            )
        }

        Commands::Scan { root } => {
            let root = resolve_root(root, engine.config())?;
            let snapshots = engine.scan(&root)?;
            emit(
                cli.format,
                &snapshots,
                ScanView {
                    snapshots: &snapshots,
                    options: &options,
                },
            )
        }
    }
}
