use chrono::{DateTime, Utc};
use owo_colors::OwoColorize;
use pipetrace_engine::ProjectSnapshot;
use pipetrace_types::{DumpInfo, DumpStatus, Project, ReportEntry, StageState};
use std::fmt;
use std::path::Path;
use std::time::Duration;

#[derive(Debug, Clone, Copy)]
pub struct ViewOptions {
    pub enable_color: bool,
    /// Reference point for relative ages
    pub now: DateTime<Utc>,
}

/// Format a timestamp as relative time ("2 min ago", "yesterday")
pub fn format_relative_time(ts: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let duration = now.signed_duration_since(ts);

    let seconds = duration.num_seconds();
    let minutes = duration.num_minutes();
    let hours = duration.num_hours();
    let days = duration.num_days();

    if seconds < 60 {
        "just now".to_string()
    } else if minutes < 60 {
        format!("{} min ago", minutes)
    } else if hours < 24 {
        format!("{} hours ago", hours)
    } else if days == 1 {
        "yesterday".to_string()
    } else if days < 7 {
        format!("{} days ago", days)
    } else if days < 30 {
        format!("{} weeks ago", days / 7)
    } else if days < 365 {
        format!("{} months ago", days / 30)
    } else {
        format!("{} years ago", days / 365)
    }
}

/// Compact elapsed time: "45s", "12m", "3h20m", "2d4h"
pub fn format_elapsed(duration: Duration) -> String {
    let secs = duration.as_secs();
    let (days, hours, minutes) = (secs / 86_400, (secs % 86_400) / 3_600, (secs % 3_600) / 60);

    if days > 0 {
        format!("{}d{}h", days, hours)
    } else if hours > 0 {
        format!("{}h{}m", hours, minutes)
    } else if minutes > 0 {
        format!("{}m", minutes)
    } else {
        format!("{}s", secs)
    }
}

pub fn format_size(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;
    if bytes >= MB {
        format!("{:.1} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.1} KB", bytes as f64 / KB as f64)
    } else {
        format!("{} B", bytes)
    }
}

fn format_age(ts: Option<DateTime<Utc>>, options: &ViewOptions) -> String {
    match ts {
        Some(ts) => format_relative_time(ts, options.now),
        None => "-".to_string(),
    }
}

fn stage_marker(state: StageState, enable_color: bool) -> String {
    let marker = match state {
        StageState::Done => "✓",
        StageState::Active => "▶",
        StageState::Pending => "·",
    };
    if !enable_color {
        return marker.to_string();
    }
    match state {
        StageState::Done => marker.green().to_string(),
        StageState::Active => marker.yellow().to_string(),
        StageState::Pending => marker.dimmed().to_string(),
    }
}

fn progress_label(project: &Project) -> String {
    let stats = &project.stats;
    if stats.is_complete() {
        return "complete".to_string();
    }
    match &stats.next_stage {
        Some(next) => format!("{}/{} next: {}", stats.stage_index, stats.stage_total, next),
        None => format!("{}/{}", stats.stage_index, stats.stage_total),
    }
}

fn ratio(done: u64, total: u64) -> String {
    if total == 0 {
        "-".to_string()
    } else {
        format!("{}/{}", done, total)
    }
}

// --------------------------------------------------------
// Project List View
// --------------------------------------------------------

pub struct ProjectListView<'a> {
    pub root: &'a Path,
    pub projects: &'a [Project],
    pub options: &'a ViewOptions,
}

impl fmt::Display for ProjectListView<'_> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if self.projects.is_empty() {
            writeln!(f, "No projects found under {}", self.root.display())?;
            return Ok(());
        }

        writeln!(
            f,
            "{:<24} {:<22} {:<8} {:<8} LAST RUN",
            "PROJECT", "PROGRESS", "TASKS", "VERIFY"
        )?;
        writeln!(f, "{}", "-".repeat(80))?;

        for project in self.projects {
            let name = if self.options.enable_color {
                format!("{:<24}", project.name).cyan().to_string()
            } else {
                format!("{:<24}", project.name)
            };
            writeln!(
                f,
                "{} {:<22} {:<8} {:<8} {}",
                name,
                progress_label(project),
                ratio(project.stats.tasks_done, project.stats.tasks_total),
                ratio(project.stats.verify_pass, project.stats.verify_total),
                format_age(project.stats.last_run, self.options)
            )?;
        }

        Ok(())
    }
}

// --------------------------------------------------------
// Status View
// --------------------------------------------------------

pub struct StatusView<'a> {
    pub project: &'a Project,
    pub options: &'a ViewOptions,
}

impl fmt::Display for StatusView<'_> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let project = self.project;
        let stats = &project.stats;

        if self.options.enable_color {
            writeln!(f, "{} {}", project.name.bold(), project.path.display().dimmed())?;
        } else {
            writeln!(f, "{} {}", project.name, project.path.display())?;
        }
        writeln!(
            f,
            "Stage: {} ({}/{})",
            stats.stage_label.as_deref().unwrap_or("-"),
            stats.stage_index,
            stats.stage_total
        )?;
        if let Some(next) = &stats.next_stage {
            writeln!(f, "Next:  {}", next)?;
        }
        writeln!(
            f,
            "Tasks: {}  Verify: {}",
            ratio(stats.tasks_done, stats.tasks_total),
            ratio(stats.verify_pass, stats.verify_total)
        )?;
        writeln!(f)?;

        for stage in &stats.pipeline {
            let elapsed = stage
                .duration
                .map(format_elapsed)
                .unwrap_or_default();
            writeln!(
                f,
                "{} {:<8} {:<8} {:<14} {}",
                stage_marker(stage.state, self.options.enable_color),
                stage.label,
                stage.state.as_str(),
                format_age(stage.last_updated, self.options),
                elapsed
            )?;
            for artifact in &stage.artifacts {
                writeln!(
                    f,
                    "    {} ({})",
                    artifact.relative_path,
                    format_size(artifact.size)
                )?;
            }
        }

        Ok(())
    }
}

// --------------------------------------------------------
// Report List View
// --------------------------------------------------------

pub struct ReportListView<'a> {
    pub reports: &'a [ReportEntry],
    pub options: &'a ViewOptions,
}

impl fmt::Display for ReportListView<'_> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if self.reports.is_empty() {
            writeln!(f, "No reports found.")?;
            return Ok(());
        }

        for report in self.reports {
            let source = format!("[{}]", report.source);
            let source = if self.options.enable_color {
                source.blue().to_string()
            } else {
                source
            };
            writeln!(
                f,
                "{:<9} {} ({}) {}",
                source,
                report.title,
                report.report_type,
                format_age(report.timestamp, self.options)
            )?;

            let mut meta = Vec::new();
            if !report.status.is_empty() {
                meta.push(format!("status: {}", report.status));
            }
            if !report.priority.is_empty() {
                meta.push(format!("priority: {}", report.priority));
            }
            if !report.reporter.is_empty() {
                meta.push(format!("by: {}", report.reporter));
            }
            meta.push(report.rel_path.clone());
            writeln!(f, "          {}", meta.join("  "))?;

            if !report.summary.is_empty() {
                writeln!(f, "          {}", report.summary)?;
            }
        }

        Ok(())
    }
}

// --------------------------------------------------------
// Dump View
// --------------------------------------------------------

pub struct DumpView<'a> {
    pub dump: &'a DumpInfo,
    pub options: &'a ViewOptions,
}

impl fmt::Display for DumpView<'_> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let directory = self.dump.directory.as_deref().unwrap_or(".");
        match self.dump.status() {
            DumpStatus::Missing => writeln!(f, "No dump directory found."),
            DumpStatus::EmptyDirectory => writeln!(
                f,
                "Dump directory {} is present but holds no dump files yet.",
                directory
            ),
            DumpStatus::Found => {
                if self.options.enable_color {
                    writeln!(f, "Dump found in {}", directory.green())?;
                } else {
                    writeln!(f, "Dump found in {}", directory)?;
                }
                for file in &self.dump.files {
                    writeln!(
                        f,
                        "  {:<7} {} ({}, {})",
                        file.kind.to_string(),
                        file.relative_path,
                        format_size(file.size),
                        format_relative_time(file.mod_time, self.options.now)
                    )?;
                }
                Ok(())
            }
        }
    }
}

// --------------------------------------------------------
// Scan View
// --------------------------------------------------------

pub struct ScanView<'a> {
    pub snapshots: &'a [ProjectSnapshot],
    pub options: &'a ViewOptions,
}

impl fmt::Display for ScanView<'_> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if self.snapshots.is_empty() {
            writeln!(f, "No projects found.")?;
            return Ok(());
        }

        for (i, snapshot) in self.snapshots.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(
                f,
                "{}",
                StatusView {
                    project: &snapshot.project,
                    options: self.options,
                }
            )?;
            write!(
                f,
                "{}",
                DumpView {
                    dump: &snapshot.dump,
                    options: self.options,
                }
            )?;
            writeln!(f, "Reports: {}", snapshot.reports.len())?;
        }

        Ok(())
    }
}
