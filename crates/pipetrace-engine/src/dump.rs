use chrono::{DateTime, Utc};
use pipetrace_core::scan::{join_rel, mod_time};
use pipetrace_types::{DumpFile, DumpInfo, DumpKind};
use std::fs;
use std::path::Path;

/// Candidate dump directories in priority order: current location, two legacy
/// staging locations, the generated plan, and the project root as a fallback.
pub const DUMP_CANDIDATES: &[&str] = &[
    "db",
    ".pipeline/staging/db",
    "staging/db",
    ".pipeline/plan/db",
    ".",
];

fn dump_files(project: &Path, rel_dir: &str) -> Vec<DumpFile> {
    DumpKind::all()
        .into_iter()
        .filter_map(|kind| {
            let rel = join_rel(rel_dir, kind.file_name());
            let meta = fs::metadata(project.join(&rel)).ok()?;
            if !meta.is_file() {
                return None;
            }
            Some(DumpFile {
                kind,
                relative_path: rel,
                mod_time: mod_time(&meta)?,
                size: meta.len(),
            })
        })
        .collect()
}

/// Locate the freshest SQL dump among the candidate directories.
///
/// The candidate whose newest file is most recent wins; priority order only
/// breaks exact ties.
pub fn locate_dump(project: &Path) -> DumpInfo {
    locate_dump_in(project, DUMP_CANDIDATES)
}

pub fn locate_dump_in(project: &Path, candidates: &[&str]) -> DumpInfo {
    let mut best: Option<(&str, Vec<DumpFile>, DateTime<Utc>)> = None;

    for &rel_dir in candidates {
        let files = dump_files(project, rel_dir);
        let Some(latest) = files.iter().map(|f| f.mod_time).max() else {
            continue;
        };

        let fresher = best
            .as_ref()
            .is_none_or(|(_, _, best_latest)| latest > *best_latest);
        if fresher {
            best = Some((rel_dir, files, latest));
        }
    }

    if let Some((rel_dir, files, latest)) = best {
        tracing::trace!(dir = rel_dir, "Selected dump directory");
        return DumpInfo {
            found: true,
            directory: Some(rel_dir.to_string()),
            files,
            latest: Some(latest),
        };
    }

    let empty_dir = candidates
        .iter()
        .filter(|rel| **rel != ".")
        .find(|rel| project.join(rel).is_dir());

    DumpInfo {
        found: false,
        directory: empty_dir.map(|rel| rel.to_string()),
        files: Vec::new(),
        latest: None,
    }
}
