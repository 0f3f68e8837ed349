use super::ISSUES_DIR;
use chrono::{DateTime, Utc};
use pipetrace_core::fields::FieldLookup;
use pipetrace_core::scan::mod_time;
use pipetrace_core::{first_timestamp, relative_slash_path};
use pipetrace_types::{ReportEntry, ReportFormat, ReportSource};
use serde_json::{Map, Value};
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

const TOP_TIMESTAMP_KEYS: &[&str] = &["created_at", "timestamp", "date"];
const META_TIMESTAMP_KEYS: &[&str] = &["created_at", "timestamp", "reported_at"];
const TOP_REPORTER_KEYS: &[&str] = &["reporter", "author"];
const META_REPORTER_KEYS: &[&str] = &["reporter", "author", "user"];
const SUMMARY_KEYS: &[&str] = &["summary", "description"];
const TYPE_KEYS: &[&str] = &["type", "kind"];
const DEFAULT_ISSUE_TYPE: &str = "Issue";

fn is_issue_file(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .and_then(ReportFormat::from_extension)
        == Some(ReportFormat::Yaml)
}

fn timestamp_candidates<'a>(doc: &'a Value, meta: Option<&'a Map<String, Value>>) -> Vec<&'a str> {
    let mut candidates: Vec<&str> = TOP_TIMESTAMP_KEYS
        .iter()
        .filter_map(|key| doc.str_field(key))
        .collect();
    if let Some(meta) = meta {
        candidates.extend(META_TIMESTAMP_KEYS.iter().filter_map(|key| meta.str_field(key)));
    }
    candidates
}

/// Build an entry from one parsed issue document.
fn issue_entry(
    doc: &Value,
    slug: &str,
    rel_path: String,
    file_mtime: Option<DateTime<Utc>>,
    size: u64,
) -> ReportEntry {
    let meta = doc.object_field("metadata");

    let timestamp = first_timestamp(timestamp_candidates(doc, meta)).or(file_mtime);

    let reporter = doc
        .first_str(TOP_REPORTER_KEYS)
        .or_else(|| meta.and_then(|m| m.first_str(META_REPORTER_KEYS)))
        .unwrap_or_default()
        .to_string();

    let status = meta
        .and_then(|m| m.str_field("status"))
        .unwrap_or_default()
        .to_string();
    let likes = meta.and_then(|m| m.u64_field("likes")).unwrap_or(0);
    let comments = meta.and_then(|m| m.u64_field("comments")).unwrap_or(0);

    ReportEntry {
        key: ReportSource::Issue.key(slug),
        title: doc.str_field("title").unwrap_or(slug).to_string(),
        summary: doc.first_str(SUMMARY_KEYS).unwrap_or_default().to_string(),
        report_type: doc
            .first_str(TYPE_KEYS)
            .unwrap_or(DEFAULT_ISSUE_TYPE)
            .to_string(),
        priority: doc.text_field("priority").unwrap_or_default(),
        status,
        reporter,
        timestamp,
        rel_path,
        source: ReportSource::Issue,
        format: ReportFormat::Yaml,
        popularity: likes.saturating_add(comments),
        size,
    }
}

/// One entry per issue metadata file directly under `issues/`.
///
/// Files are visited in path order. When two files share a slug (`login.yaml`
/// and `login.yml`) the later one is keyed by its relative path instead.
pub fn collect_issues(project: &Path) -> Vec<ReportEntry> {
    let Ok(entries) = fs::read_dir(project.join(ISSUES_DIR)) else {
        return Vec::new();
    };

    let mut paths: Vec<PathBuf> = entries
        .flatten()
        .map(|entry| entry.path())
        .filter(|path| path.is_file() && is_issue_file(path))
        .collect();
    paths.sort();

    let mut seen_keys = HashSet::new();
    let mut issues = Vec::new();
    for path in paths {
        let Some(slug) = path.file_stem().map(|s| s.to_string_lossy().into_owned()) else {
            continue;
        };

        let content = match fs::read_to_string(&path) {
            Ok(content) => content,
            Err(err) => {
                tracing::debug!(path = %path.display(), error = %err, "Skipping unreadable issue");
                continue;
            }
        };
        let doc: Value = match serde_yaml::from_str(&content) {
            Ok(doc) => doc,
            Err(err) => {
                tracing::debug!(path = %path.display(), error = %err, "Skipping malformed issue");
                continue;
            }
        };
        if !doc.is_object() {
            tracing::debug!(path = %path.display(), "Skipping issue that is not a mapping");
            continue;
        }

        let meta = fs::metadata(&path).ok();
        let file_mtime = meta.as_ref().and_then(mod_time);
        let size = meta.as_ref().map(|m| m.len()).unwrap_or(0);

        let mut issue = issue_entry(
            &doc,
            &slug,
            relative_slash_path(project, &path),
            file_mtime,
            size,
        );
        if !seen_keys.insert(issue.key.clone()) {
            tracing::debug!(path = %path.display(), key = %issue.key, "Slug already taken, keying by path");
            issue.key = ReportSource::Issue.key(&issue.rel_path);
            seen_keys.insert(issue.key.clone());
        }
        issues.push(issue);
    }

    issues
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use filetime::{FileTime, set_file_mtime};
    use tempfile::TempDir;

    fn write_issue(root: &Path, name: &str, body: &str, mtime: i64) {
        let dir = root.join(ISSUES_DIR);
        fs::create_dir_all(&dir).unwrap();
        let path = dir.join(name);
        fs::write(&path, body).unwrap();
        set_file_mtime(&path, FileTime::from_unix_time(mtime, 0)).unwrap();
    }

    #[test]
    fn test_full_issue_document() {
        let temp = TempDir::new().unwrap();
        write_issue(
            temp.path(),
            "login-timeout.yaml",
            r#"
title: Login times out
description: Session expires after 30s
type: Bug
priority: 2
created_at: "2024-03-01T09:30:00Z"
metadata:
  reporter: dana
  status: open
  likes: 4
  comments: 3
"#,
            1_000,
        );

        let issues = collect_issues(temp.path());
        assert_eq!(issues.len(), 1);
        let issue = &issues[0];
        assert_eq!(issue.key, "issue:login-timeout");
        assert_eq!(issue.title, "Login times out");
        assert_eq!(issue.summary, "Session expires after 30s");
        assert_eq!(issue.report_type, "Bug");
        assert_eq!(issue.priority, "2");
        assert_eq!(issue.status, "open");
        assert_eq!(issue.reporter, "dana");
        assert_eq!(issue.popularity, 7);
        assert_eq!(issue.rel_path, "issues/login-timeout.yaml");
        assert_eq!(
            issue.timestamp,
            Some(Utc.with_ymd_and_hms(2024, 3, 1, 9, 30, 0).unwrap())
        );
    }

    #[test]
    fn test_metadata_timestamp_and_defaults() {
        let temp = TempDir::new().unwrap();
        write_issue(
            temp.path(),
            "cache.yml",
            "title: ''\ncreated_at: someday\nmetadata:\n  timestamp: 2024-01-05 08:00:00\n  user: lee\n",
            1_000,
        );

        let issue = &collect_issues(temp.path())[0];
        assert_eq!(issue.title, "cache");
        assert_eq!(issue.report_type, "Issue");
        assert_eq!(issue.reporter, "lee");
        assert_eq!(
            issue.timestamp,
            Some(Utc.with_ymd_and_hms(2024, 1, 5, 8, 0, 0).unwrap())
        );
    }

    #[test]
    fn test_status_and_counts_only_from_metadata() {
        let temp = TempDir::new().unwrap();
        write_issue(
            temp.path(),
            "top.yaml",
            "title: Top\nstatus: closed\nlikes: 9\n",
            1_000,
        );

        let issue = &collect_issues(temp.path())[0];
        assert_eq!(issue.status, "");
        assert_eq!(issue.popularity, 0);
    }

    #[test]
    fn test_unparsable_timestamp_falls_back_to_mtime() {
        let temp = TempDir::new().unwrap();
        write_issue(temp.path(), "x.yaml", "title: X\ndate: yesterday\n", 12_345);

        let issue = &collect_issues(temp.path())[0];
        assert_eq!(issue.timestamp.map(|t| t.timestamp()), Some(12_345));
    }

    #[test]
    fn test_malformed_issue_skipped_siblings_kept() {
        let temp = TempDir::new().unwrap();
        write_issue(temp.path(), "bad.yaml", "title: [unclosed\n", 1_000);
        write_issue(temp.path(), "scalar.yaml", "just a string\n", 1_000);
        write_issue(temp.path(), "good.yaml", "title: Good\n", 1_000);
        write_issue(temp.path(), "notes.md", "# not an issue\n", 1_000);

        let issues = collect_issues(temp.path());
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].key, "issue:good");
    }

    #[test]
    fn test_shared_slug_falls_back_to_path_key() {
        let temp = TempDir::new().unwrap();
        write_issue(temp.path(), "login.yml", "title: Login (old)\n", 1_000);
        write_issue(temp.path(), "login.yaml", "title: Login\n", 2_000);

        let issues = collect_issues(temp.path());
        let keys: Vec<_> = issues.iter().map(|i| i.key.as_str()).collect();
        assert_eq!(keys, vec!["issue:login", "issue:issues/login.yml"]);
        assert_eq!(issues[0].rel_path, "issues/login.yaml");
    }

    #[test]
    fn test_missing_directory_is_empty() {
        let temp = TempDir::new().unwrap();
        assert!(collect_issues(temp.path()).is_empty());
    }
}
