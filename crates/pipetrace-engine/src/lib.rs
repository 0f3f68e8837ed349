// NOTE: pipetrace engine rationale
//
// Why re-read everything on every call?
// - Pipeline stages are driven by external tools that rewrite outputs at will
// - A cache would need invalidation we cannot observe without a watcher
// - Project trees are small; a full stat pass per refresh is cheap
//
// Why tolerate every read failure?
// - Producers write files non-atomically; a torn read is normal, not exceptional
// - Absent or malformed inputs have a defined default (zero, empty, skipped)
// - Only a bad search root is a usage mistake worth surfacing

pub mod config;
pub mod dump;
pub mod engine;
pub mod error;
pub mod locator;
pub mod metrics;
pub mod reports;
pub mod stages;

pub use config::Config;
pub use dump::{DUMP_CANDIDATES, locate_dump};
pub use engine::{Clock, Engine, ProjectSnapshot};
pub use error::{Error, Result};
pub use locator::{ProjectLocation, is_project_root, locate_projects, project_name};
pub use metrics::{Tally, task_progress, verification};
pub use reports::aggregate_reports;
pub use stages::{STAGES, StageSpec, classify_stages, project_stats};
