use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DumpKind {
    Schema,
    Seed,
}

impl DumpKind {
    pub fn file_name(&self) -> &'static str {
        match self {
            DumpKind::Schema => "schema.sql",
            DumpKind::Seed => "seed.sql",
        }
    }

    /// Display order: schema before seed.
    pub fn all() -> [DumpKind; 2] {
        [DumpKind::Schema, DumpKind::Seed]
    }
}

impl fmt::Display for DumpKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DumpKind::Schema => write!(f, "schema"),
            DumpKind::Seed => write!(f, "seed"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DumpFile {
    pub kind: DumpKind,
    pub relative_path: String,
    pub mod_time: DateTime<Utc>,
    pub size: u64,
}

/// Result of locating the generated SQL dump for a project.
///
/// `found == false` with a `directory` means a dump directory exists but holds
/// no dump files yet; no directory at all means nothing was located.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DumpInfo {
    pub found: bool,
    pub directory: Option<String>,
    pub files: Vec<DumpFile>,
    pub latest: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DumpStatus {
    Found,
    EmptyDirectory,
    Missing,
}

impl DumpInfo {
    pub fn status(&self) -> DumpStatus {
        match (self.found, self.directory.is_some()) {
            (true, _) => DumpStatus::Found,
            (false, true) => DumpStatus::EmptyDirectory,
            (false, false) => DumpStatus::Missing,
        }
    }

    pub fn file(&self, kind: DumpKind) -> Option<&DumpFile> {
        self.files.iter().find(|f| f.kind == kind)
    }
}
