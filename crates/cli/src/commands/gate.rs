use super::validate::context_from_args;
use anyhow::{Context, Result};
use release_qc_core::load_submission;
use release_qc_validator::{Step, blocking_findings, can_proceed, validate_with};
use std::path::PathBuf;

/// Print which wizard steps the submission could leave.
///
/// With `--step`, only that step is checked and a blocked step fails the
/// command, which makes it usable as a pipeline gate.
pub async fn run(path: PathBuf, step: Option<String>, today: Option<String>) -> Result<()> {
    let ctx = context_from_args(today.as_deref(), None)?;
    let snapshot = load_submission(&path)
        .with_context(|| format!("Failed to load submission {}", path.display()))?;
    let results = validate_with(&snapshot, &ctx);

    let steps = match step.as_deref() {
        Some(name) => vec![Step::parse(name).with_context(|| {
            format!(
                "Unknown step '{}'. Use 1-6 or artist, album, tracks, files, distribution, review",
                name
            )
        })?],
        None => Step::ALL.to_vec(),
    };

    let mut blocked = Vec::new();
    for step in &steps {
        if can_proceed(*step, &results) {
            println!("✓ {}. {}", step.index() + 1, step);
            continue;
        }
        let findings = blocking_findings(*step, &results);
        println!(
            "✗ {}. {} ({} blocking)",
            step.index() + 1,
            step,
            findings.len()
        );
        for finding in findings {
            println!("    {}: {}", finding.field, finding.message);
        }
        blocked.push(*step);
    }

    if step.is_some() && !blocked.is_empty() {
        anyhow::bail!("{} cannot proceed", blocked[0]);
    }
    Ok(())
}
