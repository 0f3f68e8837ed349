use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

/// A recognized project root and the pipeline state inferred from it.
///
/// Identity is the filesystem path; records are rebuilt on every discovery.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    pub name: String,
    pub path: PathBuf,
    pub stats: ProjectStats,
}

/// Pipeline progress derived from a single filesystem snapshot.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectStats {
    /// Label of the last `done` stage, unset when nothing is done yet
    pub stage_label: Option<String>,
    /// Label of the first stage that is not `done`, unset when the pipeline is complete
    pub next_stage: Option<String>,
    pub stage_index: usize,
    pub stage_total: usize,
    pub pipeline: Vec<StageStatus>,
    pub tasks_done: u64,
    pub tasks_total: u64,
    pub verify_pass: u64,
    pub verify_total: u64,
    pub last_run: Option<DateTime<Utc>>,
}

impl ProjectStats {
    pub fn is_complete(&self) -> bool {
        self.stage_total > 0 && self.stage_index == self.stage_total
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StageState {
    Done,
    Active,
    Pending,
}

impl StageState {
    pub fn as_str(&self) -> &'static str {
        match self {
            StageState::Done => "done",
            StageState::Active => "active",
            StageState::Pending => "pending",
        }
    }
}

impl fmt::Display for StageState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StageStatus {
    pub label: String,
    pub state: StageState,
    /// Latest artifact timestamp, set whenever any candidate path exists
    pub last_updated: Option<DateTime<Utc>>,
    /// Time elapsed since `last_updated`; only reported for `done` stages
    pub duration: Option<Duration>,
    pub artifacts: Vec<Artifact>,
}

/// Read-only snapshot of one file or directory produced by a stage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Artifact {
    /// Path relative to the project root, `/`-separated
    pub relative_path: String,
    pub mod_time: DateTime<Utc>,
    pub size: u64,
}

impl Artifact {
    /// Most recent first, ties broken by path ascending.
    pub fn cmp_recent(&self, other: &Self) -> Ordering {
        other
            .mod_time
            .cmp(&self.mod_time)
            .then_with(|| self.relative_path.cmp(&other.relative_path))
    }
}
