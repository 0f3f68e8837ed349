//! Custom assertions over CLI JSON output.

use anyhow::{Context, Result};
use serde_json::Value;

/// Assert that a JSON array of projects has the expected names, in order.
pub fn assert_project_names(json: &Value, expected: &[&str]) -> Result<()> {
    let projects = json.as_array().context("Expected a JSON array of projects")?;

    let names: Vec<&str> = projects
        .iter()
        .map(|p| p["name"].as_str().unwrap_or_default())
        .collect();

    if names != expected {
        anyhow::bail!("Expected projects {:?}, got {:?}", expected, names);
    }
    Ok(())
}

/// Assert the stage states of a stats object, in pipeline order.
pub fn assert_stage_states(stats: &Value, expected: &[&str]) -> Result<()> {
    let pipeline = stats["pipeline"]
        .as_array()
        .context("Expected 'pipeline' array in stats")?;

    let states: Vec<&str> = pipeline
        .iter()
        .map(|s| s["state"].as_str().unwrap_or_default())
        .collect();

    if states != expected {
        anyhow::bail!("Expected stage states {:?}, got {:?}", expected, states);
    }
    Ok(())
}

/// Assert that report keys are non-empty and unique.
pub fn assert_unique_report_keys(reports: &Value) -> Result<()> {
    let reports = reports
        .as_array()
        .context("Expected a JSON array of reports")?;

    let mut seen = std::collections::HashSet::new();
    for (i, report) in reports.iter().enumerate() {
        let key = report["key"]
            .as_str()
            .with_context(|| format!("Report {} missing key", i))?;
        if key.is_empty() {
            anyhow::bail!("Report {} has an empty key", i);
        }
        if !seen.insert(key.to_string()) {
            anyhow::bail!("Duplicate report key: {}", key);
        }
    }
    Ok(())
}
