use crate::config::Config;
use crate::dump::locate_dump;
use crate::locator::{locate_projects, project_name};
use crate::reports::aggregate_reports;
use crate::stages::{STAGES, project_stats};
use crate::Result;
use chrono::{DateTime, Utc};
use pipetrace_types::{DumpInfo, Project, ProjectStats, ReportEntry};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Source of "now" for stage durations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Clock {
    #[default]
    System,
    Fixed(DateTime<Utc>),
}

impl Clock {
    pub fn now(&self) -> DateTime<Utc> {
        match self {
            Clock::System => Utc::now(),
            Clock::Fixed(at) => *at,
        }
    }
}

/// Everything the presentation layer shows for one project.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectSnapshot {
    pub project: Project,
    pub dump: DumpInfo,
    pub reports: Vec<ReportEntry>,
}

/// Stateless facade over the extractors.
///
/// Each call re-reads the filesystem and returns a fresh value; nothing is
/// cached between calls.
#[derive(Debug, Clone, Default)]
pub struct Engine {
    config: Config,
    clock: Clock,
}

impl Engine {
    pub fn new(config: Config) -> Self {
        Self {
            config,
            clock: Clock::System,
        }
    }

    pub fn with_clock(mut self, clock: Clock) -> Self {
        self.clock = clock;
        self
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    fn stats_at(&self, path: &Path, now: DateTime<Utc>) -> ProjectStats {
        project_stats(path, STAGES, self.config.artifact_cap(), now)
    }

    fn project_at(&self, name: String, path: &Path, now: DateTime<Utc>) -> Project {
        Project {
            name,
            path: path.to_path_buf(),
            stats: self.stats_at(path, now),
        }
    }

    /// Projects at or directly below `root`, ordered by name.
    pub fn projects(&self, root: &Path) -> Result<Vec<Project>> {
        let now = self.clock.now();
        let projects = locate_projects(root)?
            .into_iter()
            .map(|location| self.project_at(location.name, &location.path, now))
            .collect();
        Ok(projects)
    }

    pub fn stats(&self, project: &Path) -> ProjectStats {
        self.stats_at(project, self.clock.now())
    }

    pub fn dump(&self, project: &Path) -> DumpInfo {
        locate_dump(project)
    }

    pub fn reports(&self, project: &Path) -> Vec<ReportEntry> {
        let mut reports = aggregate_reports(project);
        if let Some(limit) = self.config.report_limit {
            reports.truncate(limit);
        }
        reports
    }

    fn snapshot_at(&self, project: Project) -> ProjectSnapshot {
        let dump = self.dump(&project.path);
        let reports = self.reports(&project.path);
        ProjectSnapshot {
            project,
            dump,
            reports,
        }
    }

    /// Snapshot a single project directory, whether or not it carries a marker.
    pub fn snapshot(&self, project: &Path) -> ProjectSnapshot {
        let project = self.project_at(project_name(project), project, self.clock.now());
        self.snapshot_at(project)
    }

    /// Discover every project under `root` and snapshot each one.
    pub fn scan(&self, root: &Path) -> Result<Vec<ProjectSnapshot>> {
        tracing::debug!(root = %root.display(), "Scanning for projects");
        let snapshots = self
            .projects(root)?
            .into_iter()
            .map(|project| self.snapshot_at(project))
            .collect();
        Ok(snapshots)
    }
}
