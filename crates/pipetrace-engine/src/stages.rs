//! Pipeline stage classifier.
//!
//! Stages are walked in order and the first absent stage becomes the single
//! progress cursor: everything before it is `done`, it is `active`, and every
//! later stage is `pending` even if stale output for it is on disk.

use crate::metrics;
use chrono::{DateTime, Utc};
use pipetrace_core::{collect_artifacts, latest_mod_time};
use pipetrace_types::{ProjectStats, StageState, StageStatus};
use std::path::Path;
use std::time::Duration;

/// One pipeline stage and the paths whose presence marks it complete.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StageSpec {
    pub label: &'static str,
    pub paths: &'static [&'static str],
}

pub const STAGES: &[StageSpec] = &[
    StageSpec {
        label: "Spec",
        paths: &["spec.md", "SPEC.md", "docs/spec"],
    },
    StageSpec {
        label: "Plan",
        paths: &[".pipeline/plan", "plan.md"],
    },
    StageSpec {
        label: "Tasks",
        paths: &[".pipeline/tasks", ".pipeline/tasks.json"],
    },
    StageSpec {
        label: "DB",
        paths: &["db", ".pipeline/staging/db"],
    },
    StageSpec {
        label: "Code",
        paths: &["src", "app"],
    },
    StageSpec {
        label: "Run",
        paths: &[".pipeline/runs", "run.log"],
    },
    StageSpec {
        label: "Verify",
        paths: &["verify", ".pipeline/verify.json"],
    },
];

impl StageSpec {
    pub fn is_present(&self, project: &Path) -> bool {
        self.paths.iter().any(|rel| project.join(rel).exists())
    }

    /// Newest timestamp across every existing candidate path.
    pub fn last_updated(&self, project: &Path) -> Option<DateTime<Utc>> {
        self.paths
            .iter()
            .filter_map(|rel| latest_mod_time(&project.join(rel)))
            .max()
    }
}

fn elapsed(since: DateTime<Utc>, now: DateTime<Utc>) -> Duration {
    now.signed_duration_since(since)
        .to_std()
        .unwrap_or(Duration::ZERO)
}

/// Classify every stage of `stages` against the project tree.
pub fn classify_stages(
    project: &Path,
    stages: &[StageSpec],
    artifact_cap: usize,
    now: DateTime<Utc>,
) -> Vec<StageStatus> {
    let mut gap_seen = false;

    stages
        .iter()
        .map(|spec| {
            let present = spec.is_present(project);
            let state = if gap_seen {
                StageState::Pending
            } else if present {
                StageState::Done
            } else {
                gap_seen = true;
                StageState::Active
            };

            let (last_updated, artifacts) = if present {
                (
                    spec.last_updated(project),
                    collect_artifacts(project, spec.paths, artifact_cap),
                )
            } else {
                (None, Vec::new())
            };

            let duration = match state {
                StageState::Done => last_updated.map(|ts| elapsed(ts, now)),
                _ => None,
            };

            tracing::trace!(stage = spec.label, present, state = %state, "Classified stage");

            StageStatus {
                label: spec.label.to_string(),
                state,
                last_updated,
                duration,
                artifacts,
            }
        })
        .collect()
}

/// Build the full stats record: stage cursor plus downstream metrics.
pub fn project_stats(
    project: &Path,
    stages: &[StageSpec],
    artifact_cap: usize,
    now: DateTime<Utc>,
) -> ProjectStats {
    let pipeline = classify_stages(project, stages, artifact_cap, now);

    let stage_index = pipeline
        .iter()
        .take_while(|stage| stage.state == StageState::Done)
        .count();
    let stage_label = stage_index
        .checked_sub(1)
        .map(|last| pipeline[last].label.clone());
    let next_stage = pipeline.get(stage_index).map(|stage| stage.label.clone());
    let last_run = pipeline.iter().filter_map(|stage| stage.last_updated).max();

    let tasks = metrics::task_progress(project);
    let verify = metrics::verification(project);

    ProjectStats {
        stage_label,
        next_stage,
        stage_index,
        stage_total: pipeline.len(),
        pipeline,
        tasks_done: tasks.done,
        tasks_total: tasks.total,
        verify_pass: verify.done,
        verify_total: verify.total,
        last_run,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use filetime::{FileTime, set_file_mtime};
    use std::fs;
    use tempfile::TempDir;

    const TABLE: &[StageSpec] = &[
        StageSpec {
            label: "One",
            paths: &["one.md"],
        },
        StageSpec {
            label: "Two",
            paths: &["two", "two.md"],
        },
        StageSpec {
            label: "Three",
            paths: &["three.md"],
        },
    ];

    fn now() -> DateTime<Utc> {
        Utc.timestamp_opt(10_000, 0).unwrap()
    }

    fn touch(root: &Path, rel: &str, secs: i64) {
        let path = root.join(rel);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(&path, "x").unwrap();
        set_file_mtime(&path, FileTime::from_unix_time(secs, 0)).unwrap();
    }

    fn states(pipeline: &[StageStatus]) -> Vec<StageState> {
        pipeline.iter().map(|s| s.state).collect()
    }

    #[test]
    fn test_empty_project_first_stage_active() {
        let temp = TempDir::new().unwrap();
        let stats = project_stats(temp.path(), TABLE, 6, now());

        assert_eq!(
            states(&stats.pipeline),
            vec![StageState::Active, StageState::Pending, StageState::Pending]
        );
        assert_eq!(stats.stage_index, 0);
        assert_eq!(stats.stage_label, None);
        assert_eq!(stats.next_stage.as_deref(), Some("One"));
        assert_eq!(stats.last_run, None);
    }

    #[test]
    fn test_out_of_order_stage_stays_pending() {
        let temp = TempDir::new().unwrap();
        touch(temp.path(), "one.md", 1_000);
        touch(temp.path(), "three.md", 2_000);

        let stats = project_stats(temp.path(), TABLE, 6, now());
        assert_eq!(
            states(&stats.pipeline),
            vec![StageState::Done, StageState::Active, StageState::Pending]
        );
        assert_eq!(stats.stage_index, 1);
        assert_eq!(stats.stage_label.as_deref(), Some("One"));
        assert_eq!(stats.next_stage.as_deref(), Some("Two"));

        let three = &stats.pipeline[2];
        assert_eq!(three.last_updated.map(|t| t.timestamp()), Some(2_000));
        assert_eq!(three.duration, None);
        assert_eq!(stats.last_run.map(|t| t.timestamp()), Some(2_000));
    }

    #[test]
    fn test_complete_pipeline_has_no_next_stage() {
        let temp = TempDir::new().unwrap();
        touch(temp.path(), "one.md", 1_000);
        touch(temp.path(), "two/a.txt", 1_500);
        touch(temp.path(), "three.md", 9_000);

        let stats = project_stats(temp.path(), TABLE, 6, now());
        assert!(stats.is_complete());
        assert_eq!(stats.next_stage, None);
        assert_eq!(stats.stage_label.as_deref(), Some("Three"));
        assert_eq!(stats.pipeline[2].duration, Some(Duration::from_secs(1_000)));
        assert_eq!(stats.pipeline[1].duration, Some(Duration::from_secs(8_500)));
    }

    #[test]
    fn test_future_mtime_clamps_duration_to_zero() {
        let temp = TempDir::new().unwrap();
        touch(temp.path(), "one.md", 50_000);

        let pipeline = classify_stages(temp.path(), TABLE, 6, now());
        assert_eq!(pipeline[0].duration, Some(Duration::ZERO));
    }

    #[test]
    fn test_directory_stage_uses_newest_descendant() {
        let temp = TempDir::new().unwrap();
        touch(temp.path(), "one.md", 1_000);
        touch(temp.path(), "two/deep/nested.txt", 7_000);
        touch(temp.path(), "two/top.txt", 3_000);

        let pipeline = classify_stages(temp.path(), TABLE, 6, now());
        assert_eq!(pipeline[1].last_updated.map(|t| t.timestamp()), Some(7_000));
    }

    #[test]
    fn test_artifacts_merge_candidates() {
        let temp = TempDir::new().unwrap();
        touch(temp.path(), "one.md", 1_000);
        touch(temp.path(), "two/a.txt", 100);
        touch(temp.path(), "two.md", 500);

        let pipeline = classify_stages(temp.path(), TABLE, 6, now());
        let paths: Vec<_> = pipeline[1]
            .artifacts
            .iter()
            .map(|a| a.relative_path.as_str())
            .collect();
        assert_eq!(paths, vec!["two.md", "two/a.txt"]);
    }

    #[test]
    fn test_default_table_labels() {
        let labels: Vec<_> = STAGES.iter().map(|s| s.label).collect();
        insta::assert_json_snapshot!(labels, @r###"
        [
          "Spec",
          "Plan",
          "Tasks",
          "DB",
          "Code",
          "Run",
          "Verify"
        ]
        "###);
    }
}
