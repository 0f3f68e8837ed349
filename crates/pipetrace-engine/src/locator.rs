use crate::{Error, Result};
use std::collections::HashSet;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// Hidden directory that marks a project root
pub const PROJECT_MARKER_DIR: &str = ".pipeline";

/// Hidden config file that marks a project root
pub const PROJECT_MARKER_FILE: &str = ".pipeline.toml";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectLocation {
    pub name: String,
    pub path: PathBuf,
}

pub fn is_project_root(path: &Path) -> bool {
    path.join(PROJECT_MARKER_DIR).is_dir() || path.join(PROJECT_MARKER_FILE).is_file()
}

/// Name shown for a project: its directory name, or the full path for `/`.
pub fn project_name(path: &Path) -> String {
    let canonical = path.canonicalize().unwrap_or_else(|_| path.to_path_buf());
    canonical
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| canonical.display().to_string())
}

/// Find projects at `root` itself or one level below it, ordered by name.
///
/// Only the root is validated; unreadable children are skipped.
pub fn locate_projects(root: &Path) -> Result<Vec<ProjectLocation>> {
    let meta = fs::metadata(root).map_err(|err| match err.kind() {
        ErrorKind::NotFound => Error::NotFound(root.to_path_buf()),
        _ => Error::Io(err),
    })?;
    if !meta.is_dir() {
        return Err(Error::NotADirectory(root.to_path_buf()));
    }

    let mut seen = HashSet::new();
    let mut projects = Vec::new();

    let mut consider = |path: PathBuf, name: String| {
        if !is_project_root(&path) {
            return;
        }
        let identity = path.canonicalize().unwrap_or_else(|_| path.clone());
        if seen.insert(identity) {
            projects.push(ProjectLocation { name, path });
        }
    };

    consider(root.to_path_buf(), project_name(root));

    match fs::read_dir(root) {
        Ok(entries) => {
            for entry in entries {
                let entry = match entry {
                    Ok(entry) => entry,
                    Err(err) => {
                        tracing::debug!(root = %root.display(), error = %err, "Skipping unreadable entry");
                        continue;
                    }
                };
                let path = entry.path();
                if !path.is_dir() {
                    continue;
                }
                let name = entry.file_name().to_string_lossy().into_owned();
                consider(path, name);
            }
        }
        Err(err) => {
            tracing::debug!(root = %root.display(), error = %err, "Search root not listable");
        }
    }

    projects.sort_by(|a, b| a.name.cmp(&b.name).then_with(|| a.path.cmp(&b.path)));
    Ok(projects)
}
