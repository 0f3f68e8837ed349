//! Progress metrics reported by downstream tools.
//!
//! Both summaries resolve through an ordered list of strategies: the strict
//! schema first, then a flat numeric map read through known key aliases.
//! A missing or unreadable file is a normal state and yields `(0, 0)`.

use pipetrace_core::fields::{FieldLookup, numeric_entries};
use pipetrace_core::{Strategy, resolve_first};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::path::Path;

pub const TASK_PROGRESS_PATH: &str = ".pipeline/progress.json";
pub const VERIFY_SUMMARY_PATH: &str = ".pipeline/verify.json";

const TASK_DONE_ALIASES: &[&str] = &["done", "completed", "tasks_done", "tasksDone", "finished"];
const TASK_TOTAL_ALIASES: &[&str] = &["total", "tasks_total", "tasksTotal", "count"];
const VERIFY_PASS_ALIASES: &[&str] = &["passed", "pass", "ok", "succeeded"];
const VERIFY_TOTAL_ALIASES: &[&str] = &["total", "checks_total", "count"];

/// A `done`/`total` pair; for verification `done` counts passing checks.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Tally {
    pub done: u64,
    pub total: u64,
}

impl Tally {
    pub fn new(done: u64, total: u64) -> Self {
        Self { done, total }
    }
}

#[derive(Debug, Deserialize)]
struct TaskProgressDoc {
    done: Option<u64>,
    total: Option<u64>,
    /// Legacy name for `done`
    completed: Option<u64>,
}

#[derive(Debug, Deserialize)]
struct VerifySummaryDoc {
    passed: Option<u64>,
    total: Option<u64>,
    checks: Option<Map<String, Value>>,
}

const TASK_STRATEGIES: &[Strategy<Tally>] = &[
    Strategy {
        name: "task_schema",
        resolve: task_schema,
    },
    Strategy {
        name: "task_aliases",
        resolve: task_aliases,
    },
];

const VERIFY_STRATEGIES: &[Strategy<Tally>] = &[
    Strategy {
        name: "verify_schema",
        resolve: verify_schema,
    },
    Strategy {
        name: "verify_aliases",
        resolve: verify_aliases,
    },
];

fn task_schema(value: &Value) -> Option<Tally> {
    if !value.is_object() {
        return None;
    }
    let doc: TaskProgressDoc = serde_json::from_value(value.clone()).ok()?;
    if doc.done.is_none() && doc.total.is_none() && doc.completed.is_none() {
        return None;
    }

    let done = doc
        .done
        .filter(|d| *d > 0)
        .or(doc.completed)
        .unwrap_or(0);
    // `completed` doubles as the total only when nothing else states cardinality
    let total = doc
        .total
        .or(if doc.done.is_none() { doc.completed } else { None })
        .unwrap_or(0);

    Some(Tally::new(done, total))
}

fn alias_pair(value: &Value, done_keys: &[&str], total_keys: &[&str]) -> Option<Tally> {
    let entries = numeric_entries(value);
    let lookup = |keys: &[&str]| keys.iter().find_map(|key| entries.get(*key).copied());

    let done = lookup(done_keys);
    let total = lookup(total_keys);
    if done.is_none() && total.is_none() {
        return None;
    }
    Some(Tally::new(done.unwrap_or(0), total.unwrap_or(0)))
}

fn task_aliases(value: &Value) -> Option<Tally> {
    alias_pair(value, TASK_DONE_ALIASES, TASK_TOTAL_ALIASES)
}

fn check_passed(check: &Value) -> bool {
    let status = match check {
        Value::String(s) => Some(s.as_str()),
        other => other.str_field("status"),
    };
    status.is_some_and(|s| s.trim().eq_ignore_ascii_case("pass"))
}

fn verify_schema(value: &Value) -> Option<Tally> {
    if !value.is_object() {
        return None;
    }
    let doc: VerifySummaryDoc = serde_json::from_value(value.clone()).ok()?;

    if let (Some(passed), Some(total)) = (doc.passed, doc.total) {
        return Some(Tally::new(passed, total));
    }

    if let Some(checks) = doc.checks.filter(|c| !c.is_empty()) {
        let passed = checks.values().filter(|c| check_passed(c)).count() as u64;
        return Some(Tally::new(passed, checks.len() as u64));
    }

    if doc.passed.is_some() || doc.total.is_some() {
        return Some(Tally::new(
            doc.passed.unwrap_or(0),
            doc.total.unwrap_or(0),
        ));
    }

    None
}

fn verify_aliases(value: &Value) -> Option<Tally> {
    alias_pair(value, VERIFY_PASS_ALIASES, VERIFY_TOTAL_ALIASES)
}

fn read_json(path: &Path) -> Option<Value> {
    let content = std::fs::read_to_string(path).ok()?;
    match serde_json::from_str(&content) {
        Ok(value) => Some(value),
        Err(err) => {
            tracing::debug!(path = %path.display(), error = %err, "Metrics file is not valid JSON");
            None
        }
    }
}

fn resolve_file(path: &Path, strategies: &[Strategy<Tally>]) -> Tally {
    read_json(path)
        .and_then(|value| resolve_first(&value, strategies))
        .unwrap_or_default()
}

pub fn task_progress(project: &Path) -> Tally {
    resolve_file(&project.join(TASK_PROGRESS_PATH), TASK_STRATEGIES)
}

pub fn verification(project: &Path) -> Tally {
    resolve_file(&project.join(VERIFY_SUMMARY_PATH), VERIFY_STRATEGIES)
}
