use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportSource {
    Issue,
    Report,
    Verify,
}

impl ReportSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReportSource::Issue => "issue",
            ReportSource::Report => "report",
            ReportSource::Verify => "verify",
        }
    }

    /// Build the unique entry key, `source:slug-or-relative-path`.
    pub fn key(&self, id: &str) -> String {
        format!("{}:{}", self.as_str(), id)
    }
}

impl fmt::Display for ReportSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ReportSource {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "issue" => Ok(ReportSource::Issue),
            "report" => Ok(ReportSource::Report),
            "verify" => Ok(ReportSource::Verify),
            _ => Err(format!("Unknown report source: {}", s)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportFormat {
    Yaml,
    Markdown,
    Html,
}

impl ReportFormat {
    /// Map a file extension (case-insensitive) onto an accepted report format.
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "yaml" | "yml" => Some(ReportFormat::Yaml),
            "md" | "markdown" => Some(ReportFormat::Markdown),
            "html" | "htm" => Some(ReportFormat::Html),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ReportFormat::Yaml => "yaml",
            ReportFormat::Markdown => "markdown",
            ReportFormat::Html => "html",
        }
    }
}

impl fmt::Display for ReportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One normalized report, regardless of which source produced it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportEntry {
    pub key: String,
    pub title: String,
    pub summary: String,
    #[serde(rename = "type")]
    pub report_type: String,
    pub priority: String,
    pub status: String,
    pub reporter: String,
    pub timestamp: Option<DateTime<Utc>>,
    pub rel_path: String,
    pub source: ReportSource,
    pub format: ReportFormat,
    pub popularity: u64,
    pub size: u64,
}

impl ReportEntry {
    /// Newest first; entries without a timestamp sort after all dated ones;
    /// ties broken by relative path ascending.
    pub fn cmp_recent(&self, other: &Self) -> Ordering {
        match (&self.timestamp, &other.timestamp) {
            (Some(a), Some(b)) => b.cmp(a),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        }
        .then_with(|| self.rel_path.cmp(&other.rel_path))
    }
}
