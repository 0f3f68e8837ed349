//! Leaf components shared by every pipetrace extractor.
//!
//! - `scan`: stats files and directories, ranks artifacts by recency, caps result sets
//! - `time`: timestamp parsing under the known layouts
//! - `fields`: typed optional lookups over semi-structured payloads
//! - `path`: path helpers (tilde expansion, config path resolution, relative display)

pub mod error;
pub mod fields;
pub mod path;
pub mod scan;
pub mod time;

pub use error::{Error, Result};
pub use fields::{FieldLookup, Strategy, resolve_first};
pub use path::{expand_tilde, relative_slash_path, resolve_config_path};
pub use scan::{
    DEFAULT_ARTIFACT_CAP, collect_artifacts, latest_mod_time, rank_recent, recent_children,
    stat_artifact,
};
pub use time::{first_timestamp, parse_timestamp};
