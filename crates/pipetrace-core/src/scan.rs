//! Artifact scanner: stats paths under a project root and ranks them by recency.
//!
//! Every read failure is treated as absence. A file that disappears between
//! listing and stat is simply not reported.

use chrono::{DateTime, Utc};
use pipetrace_types::Artifact;
use std::fs::{self, Metadata};
use std::path::Path;
use walkdir::{DirEntry, WalkDir};

/// Maximum number of artifacts kept per stage unless configured otherwise.
pub const DEFAULT_ARTIFACT_CAP: usize = 6;

pub fn mod_time(meta: &Metadata) -> Option<DateTime<Utc>> {
    meta.modified().ok().map(DateTime::<Utc>::from)
}

/// Join a `/`-separated relative directory and a child name.
pub fn join_rel(rel_dir: &str, name: &str) -> String {
    let rel_dir = rel_dir.trim_end_matches('/');
    if rel_dir.is_empty() || rel_dir == "." {
        name.to_string()
    } else {
        format!("{}/{}", rel_dir, name)
    }
}

/// Snapshot a single path (file or directory) relative to `root`.
pub fn stat_artifact(root: &Path, rel: &str) -> Option<Artifact> {
    let meta = fs::metadata(root.join(rel)).ok()?;
    Some(Artifact {
        relative_path: rel.to_string(),
        mod_time: mod_time(&meta)?,
        size: meta.len(),
    })
}

/// Unwrap one walk step, logging entries the walker could not read.
pub fn walk_entry(entry: walkdir::Result<DirEntry>) -> Option<DirEntry> {
    match entry {
        Ok(entry) => Some(entry),
        Err(err) => {
            tracing::debug!(path = ?err.path(), error = %err, "Skipping unreadable walk entry");
            None
        }
    }
}

/// Latest timestamp that represents `path`.
///
/// Files report their own mtime. Directories report the newest descendant
/// file, or their own mtime when empty or unreadable.
pub fn latest_mod_time(path: &Path) -> Option<DateTime<Utc>> {
    let meta = fs::metadata(path).ok()?;
    if !meta.is_dir() {
        return mod_time(&meta);
    }

    WalkDir::new(path)
        .min_depth(1)
        .into_iter()
        .filter_map(walk_entry)
        .filter(|e| e.file_type().is_file())
        .filter_map(|e| e.metadata().ok().and_then(|m| mod_time(&m)))
        .max()
        .or_else(|| mod_time(&meta))
}

/// Sort newest first (ties by path), drop duplicate paths and keep at most `cap`.
pub fn rank_recent(mut artifacts: Vec<Artifact>, cap: usize) -> Vec<Artifact> {
    artifacts.sort_by(Artifact::cmp_recent);
    artifacts.dedup_by(|a, b| a.relative_path == b.relative_path);
    artifacts.truncate(cap);
    artifacts
}

/// Immediate children of `rel_dir`, newest first, capped.
///
/// When no child can be stat'ed the directory itself is returned as the only
/// artifact so a present directory is never shown without evidence.
pub fn recent_children(root: &Path, rel_dir: &str, cap: usize) -> Vec<Artifact> {
    let mut children = Vec::new();

    match fs::read_dir(root.join(rel_dir)) {
        Ok(entries) => {
            for entry in entries.flatten() {
                let name = entry.file_name().to_string_lossy().into_owned();
                let rel = join_rel(rel_dir, &name);
                match fs::metadata(entry.path()) {
                    Ok(meta) => {
                        if let Some(mtime) = mod_time(&meta) {
                            children.push(Artifact {
                                relative_path: rel,
                                mod_time: mtime,
                                size: meta.len(),
                            });
                        }
                    }
                    Err(err) => {
                        tracing::debug!(path = %rel, error = %err, "Skipping unstatable entry");
                    }
                }
            }
        }
        Err(err) => {
            tracing::debug!(dir = %rel_dir, error = %err, "Directory not readable");
        }
    }

    if children.is_empty() {
        return stat_artifact(root, rel_dir).into_iter().collect();
    }

    rank_recent(children, cap)
}

/// Artifacts for a set of candidate paths, ranked globally across candidates.
pub fn collect_artifacts(root: &Path, candidates: &[&str], cap: usize) -> Vec<Artifact> {
    let mut all = Vec::new();

    for rel in candidates {
        let Ok(meta) = fs::metadata(root.join(rel)) else {
            continue;
        };

        if meta.is_dir() {
            all.extend(recent_children(root, rel, cap));
        } else if let Some(artifact) = stat_artifact(root, rel) {
            all.push(artifact);
        }
    }

    rank_recent(all, cap)
}
