use super::text::{first_line_title, first_paragraph_line, html_title, humanize};
use super::{DEFAULT_REPORT_TYPE, DEFAULT_VERIFY_TYPE, REPORTS_DIR, VERIFY_DIR};
use pipetrace_core::relative_slash_path;
use pipetrace_core::scan::{mod_time, walk_entry};
use pipetrace_types::{ReportEntry, ReportFormat, ReportSource};
use std::fs;
use std::path::Path;
use walkdir::WalkDir;

fn source_dir(source: ReportSource) -> Option<&'static str> {
    match source {
        ReportSource::Report => Some(REPORTS_DIR),
        ReportSource::Verify => Some(VERIFY_DIR),
        ReportSource::Issue => None,
    }
}

fn strip_extension(segment: &str) -> &str {
    match segment.rsplit_once('.') {
        Some((stem, _)) if !stem.is_empty() => stem,
        _ => segment,
    }
}

/// Type label for a document, from its path segments under the source root.
fn type_label(source: ReportSource, segments: &[&str]) -> String {
    match source {
        ReportSource::Verify => segments
            .iter()
            .map(|segment| humanize(strip_extension(segment)))
            .find(|label| !label.is_empty())
            .unwrap_or_else(|| DEFAULT_VERIFY_TYPE.to_string()),
        _ => match segments {
            [dir, _, ..] => {
                let label = humanize(dir);
                if label.is_empty() {
                    DEFAULT_REPORT_TYPE.to_string()
                } else {
                    label
                }
            }
            _ => DEFAULT_REPORT_TYPE.to_string(),
        },
    }
}

fn sniff_title(content: &str, format: ReportFormat) -> Option<String> {
    match format {
        ReportFormat::Html => html_title(content),
        ReportFormat::Markdown | ReportFormat::Yaml => first_line_title(content),
    }
}

fn sniff_summary(content: &str, format: ReportFormat) -> String {
    match format {
        ReportFormat::Html => String::new(),
        ReportFormat::Markdown | ReportFormat::Yaml => {
            first_paragraph_line(content).unwrap_or_default()
        }
    }
}

/// Every accepted document under the source root, at any depth.
///
/// These files carry no embedded timestamp; their mtime is used instead.
pub fn collect_documents(project: &Path, source: ReportSource) -> Vec<ReportEntry> {
    let Some(dir_name) = source_dir(source) else {
        return Vec::new();
    };
    let source_root = project.join(dir_name);
    if !source_root.is_dir() {
        return Vec::new();
    }

    let mut documents = Vec::new();
    for entry in WalkDir::new(&source_root)
        .min_depth(1)
        .into_iter()
        .filter_map(walk_entry)
    {
        if !entry.file_type().is_file() {
            continue;
        }
        let path = entry.path();
        let Some(format) = path
            .extension()
            .and_then(|ext| ext.to_str())
            .and_then(ReportFormat::from_extension)
        else {
            continue;
        };

        let bytes = match fs::read(path) {
            Ok(bytes) => bytes,
            Err(err) => {
                tracing::debug!(path = %path.display(), error = %err, "Skipping unreadable report");
                continue;
            }
        };
        let content = String::from_utf8_lossy(&bytes);

        let under_root = relative_slash_path(&source_root, path);
        let segments: Vec<&str> = under_root.split('/').filter(|s| !s.is_empty()).collect();
        let rel_path = relative_slash_path(project, path);

        let title = sniff_title(&content, format).unwrap_or_else(|| {
            path.file_stem()
                .map(|stem| humanize(&stem.to_string_lossy()))
                .unwrap_or_default()
        });

        let meta = entry.metadata().ok();

        documents.push(ReportEntry {
            key: source.key(&rel_path),
            title,
            summary: sniff_summary(&content, format),
            report_type: type_label(source, &segments),
            priority: String::new(),
            status: String::new(),
            reporter: String::new(),
            timestamp: meta.as_ref().and_then(mod_time),
            rel_path,
            source,
            format,
            popularity: 0,
            size: meta.as_ref().map(|m| m.len()).unwrap_or(bytes.len() as u64),
        });
    }

    documents
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write(root: &Path, rel: &str, body: &str) {
        let path = root.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, body).unwrap();
    }

    #[test]
    fn test_report_type_from_first_directory() {
        assert_eq!(
            type_label(ReportSource::Report, &["load-tests", "nightly", "run.md"]),
            "Load Tests"
        );
        assert_eq!(type_label(ReportSource::Report, &["summary.md"]), "Report");
    }

    #[test]
    fn test_verify_type_from_first_segment() {
        assert_eq!(type_label(ReportSource::Verify, &["api-smoke.md"]), "Api Smoke");
        assert_eq!(
            type_label(ReportSource::Verify, &["e2e_runs", "chrome.html"]),
            "E2e Runs"
        );
        assert_eq!(type_label(ReportSource::Verify, &["---.md"]), "Verification");
        assert_eq!(type_label(ReportSource::Verify, &[]), "Verification");
    }

    #[test]
    fn test_collects_nested_documents_with_accepted_extensions() {
        let temp = TempDir::new().unwrap();
        write(temp.path(), "reports/perf/deep/q1.md", "# Q1 perf\n\nLatency is fine.\n");
        write(temp.path(), "reports/index.html", "<title>Index</title>");
        write(temp.path(), "reports/raw.json", "{}");
        write(temp.path(), "reports/notes.txt", "ignored");

        let mut docs = collect_documents(temp.path(), ReportSource::Report);
        docs.sort_by(|a, b| a.rel_path.cmp(&b.rel_path));
        assert_eq!(docs.len(), 2);

        assert_eq!(docs[0].rel_path, "reports/index.html");
        assert_eq!(docs[0].title, "Index");
        assert_eq!(docs[0].report_type, "Report");
        assert_eq!(docs[0].format, ReportFormat::Html);
        assert_eq!(docs[0].summary, "");

        assert_eq!(docs[1].key, "report:reports/perf/deep/q1.md");
        assert_eq!(docs[1].title, "Q1 perf");
        assert_eq!(docs[1].summary, "Latency is fine.");
        assert_eq!(docs[1].report_type, "Perf");
        assert!(docs[1].timestamp.is_some());
    }

    #[cfg(unix)]
    #[test]
    fn test_unreadable_subdirectory_keeps_siblings() {
        use std::os::unix::fs::PermissionsExt;

        let temp = TempDir::new().unwrap();
        write(temp.path(), "reports/top.md", "# Top\n");
        write(temp.path(), "reports/locked/hidden.md", "# Hidden\n");
        let locked = temp.path().join("reports/locked");
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o000)).unwrap();

        let docs = collect_documents(temp.path(), ReportSource::Report);
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).unwrap();
        assert!(docs.iter().any(|d| d.rel_path == "reports/top.md"));
    }

    #[test]
    fn test_untitled_document_uses_file_stem() {
        let temp = TempDir::new().unwrap();
        write(temp.path(), "verify/db-checks.md", "\n\n");

        let docs = collect_documents(temp.path(), ReportSource::Verify);
        assert_eq!(docs[0].title, "Db Checks");
        assert_eq!(docs[0].report_type, "Db Checks");
        assert_eq!(docs[0].key, "verify:verify/db-checks.md");
    }

    #[test]
    fn test_missing_root_and_issue_source_are_empty() {
        let temp = TempDir::new().unwrap();
        assert!(collect_documents(temp.path(), ReportSource::Report).is_empty());
        assert!(collect_documents(temp.path(), ReportSource::Issue).is_empty());
    }
}
