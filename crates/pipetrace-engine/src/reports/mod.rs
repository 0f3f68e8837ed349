//! Report aggregation across issue write-ups, generated reports and
//! verification reports.
//!
//! A missing source directory contributes nothing. Individual files that
//! cannot be read or parsed are skipped without affecting their siblings.

mod documents;
mod issues;
pub mod text;

pub use documents::collect_documents;
pub use issues::collect_issues;

use pipetrace_types::ReportEntry;
use std::path::Path;

pub const ISSUES_DIR: &str = "issues";
pub const REPORTS_DIR: &str = "reports";
pub const VERIFY_DIR: &str = "verify";

/// Label for generic reports placed directly under the report root
pub const DEFAULT_REPORT_TYPE: &str = "Report";

/// Label for verification reports when no path segment yields one
pub const DEFAULT_VERIFY_TYPE: &str = "Verification";

/// All reports for a project, newest first.
pub fn aggregate_reports(project: &Path) -> Vec<ReportEntry> {
    let mut entries = collect_issues(project);
    entries.extend(collect_documents(project, pipetrace_types::ReportSource::Report));
    entries.extend(collect_documents(project, pipetrace_types::ReportSource::Verify));

    entries.sort_by(ReportEntry::cmp_recent);
    entries
}
