//! Text sniffing helpers for report titles and labels.

use regex::Regex;
use std::sync::LazyLock;

static HTML_TITLE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<title[^>]*>(.*?)</title>").unwrap());
static HTML_TAG: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<[^>]*>").unwrap());
// Ordered-list numbers stop at three digits so a leading year is kept.
static LINE_MARKER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(?:#{1,6}\s*|[-*+]\s+|\d{1,3}[.)]\s+)").unwrap());

const SUMMARY_MAX_CHARS: usize = 160;

/// `api-smoke_test` -> `Api Smoke Test`
pub fn humanize(raw: &str) -> String {
    raw.replace(['-', '_'], " ")
        .split_whitespace()
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<String>>()
        .join(" ")
}

/// Collapse runs of whitespace into single spaces.
pub fn collapse_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Contents of the `<title>` element with tags stripped.
pub fn html_title(content: &str) -> Option<String> {
    let inner = HTML_TITLE.captures(content)?.get(1)?.as_str();
    let stripped = HTML_TAG.replace_all(inner, " ");
    let title = collapse_whitespace(&stripped);
    (!title.is_empty()).then_some(title)
}

fn strip_line_marker(line: &str) -> &str {
    let trimmed = line.trim();
    match LINE_MARKER.find(trimmed) {
        Some(m) => trimmed[m.end()..].trim(),
        None => trimmed,
    }
}

/// First non-blank line with any heading or list marker stripped.
pub fn first_line_title(content: &str) -> Option<String> {
    content
        .lines()
        .map(strip_line_marker)
        .find(|line| !line.is_empty())
        .map(str::to_string)
}

/// First plain line after the title line, truncated.
pub fn first_paragraph_line(content: &str) -> Option<String> {
    let line = content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .skip(1)
        .find(|line| !line.starts_with('#'))?;
    Some(truncate_chars(line, SUMMARY_MAX_CHARS))
}

pub fn truncate_chars(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        s.chars().take(max).collect::<String>() + "..."
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_humanize() {
        insta::assert_snapshot!(humanize("api-smoke_test"), @"Api Smoke Test");
        assert_eq!(humanize("QA"), "QA");
        assert_eq!(humanize("--"), "");
    }

    #[test]
    fn test_html_title_strips_tags_and_whitespace() {
        let html = "<html><head><TITLE>\n  Nightly <b>run</b>\n report </TITLE></head></html>";
        assert_eq!(html_title(html).as_deref(), Some("Nightly run report"));
        assert_eq!(html_title("<title>  </title>"), None);
        assert_eq!(html_title("<p>no title</p>"), None);
    }

    #[test]
    fn test_first_line_title_strips_markers() {
        assert_eq!(
            first_line_title("\n\n## Coverage gaps\nbody").as_deref(),
            Some("Coverage gaps")
        );
        assert_eq!(first_line_title("- item one").as_deref(), Some("item one"));
        assert_eq!(first_line_title("2) second").as_deref(), Some("second"));
        assert_eq!(first_line_title("12. twelfth").as_deref(), Some("twelfth"));
        assert_eq!(first_line_title("2024. Retro").as_deref(), Some("2024. Retro"));
        assert_eq!(first_line_title("title: Login").as_deref(), Some("title: Login"));
        assert_eq!(first_line_title("   \n\t\n"), None);
    }

    #[test]
    fn test_first_paragraph_line() {
        let md = "# Title\n\n## Sub\nFirst real line.\nSecond.";
        assert_eq!(first_paragraph_line(md).as_deref(), Some("First real line."));
        assert_eq!(first_paragraph_line("# Only title"), None);
    }

    #[test]
    fn test_truncate_chars() {
        assert_eq!(truncate_chars("héllo", 10), "héllo");
        assert_eq!(truncate_chars("héllo", 2), "hé...");
    }
}
