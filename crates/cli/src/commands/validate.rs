use anyhow::{Context, Result};
use chrono::NaiveDate;
use release_qc_core::config::load_settings;
use release_qc_core::load_submission;
use release_qc_validator::{
    FindingsReport, QcValidationResults, Severity, ValidationContext, inspect_assets,
    validate_with,
};
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::debug;
use walkdir::WalkDir;

const MAX_SCAN_DEPTH: usize = 3;

#[derive(Serialize)]
struct FileResults {
    file: String,
    #[serde(flatten)]
    results: QcValidationResults,
}

/// Build the validation context from the command-line overrides.
pub fn context_from_args(
    today: Option<&str>,
    settings: Option<&Path>,
) -> Result<ValidationContext> {
    let mut ctx = match today {
        Some(date) => ValidationContext::on(
            NaiveDate::parse_from_str(date, "%Y-%m-%d")
                .with_context(|| format!("Invalid --today date '{}', expected YYYY-MM-DD", date))?,
        ),
        None => ValidationContext::current(),
    };
    if let Some(path) = settings {
        let loaded = load_settings(path)
            .with_context(|| format!("Failed to load settings from {}", path.display()))?;
        ctx = ctx.with_settings(loaded);
    }
    Ok(ctx)
}

/// Submission files under `path`: the file itself, or every
/// `submission*.toml` / `submission*.json` below a directory.
fn collect_submissions(path: &Path) -> Result<Vec<PathBuf>> {
    if path.is_file() {
        return Ok(vec![path.to_path_buf()]);
    }
    if !path.is_dir() {
        anyhow::bail!("Path '{}' does not exist", path.display());
    }

    let mut files: Vec<PathBuf> = WalkDir::new(path)
        .max_depth(MAX_SCAN_DEPTH)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .map(|e| e.into_path())
        .filter(|p| is_submission_file(p))
        .collect();
    files.sort();

    if files.is_empty() {
        anyhow::bail!(
            "No submission files found under {}\nRun 'release-qc init {}' first",
            path.display(),
            path.display()
        );
    }
    Ok(files)
}

fn is_submission_file(path: &Path) -> bool {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().to_lowercase())
        .unwrap_or_default();
    name.starts_with("submission") && (name.ends_with(".toml") || name.ends_with(".json"))
}

/// Validate one submission file, optionally inspecting the files it
/// references (resolved against the file's directory).
pub fn validate_file(
    path: &Path,
    ctx: &ValidationContext,
    assets: bool,
) -> Result<QcValidationResults> {
    let snapshot = load_submission(path)
        .with_context(|| format!("Failed to load submission {}", path.display()))?;
    let mut results = validate_with(&snapshot, ctx);

    if assets {
        let base_dir = path.parent().unwrap_or_else(|| Path::new("."));
        results.merge(inspect_assets(&snapshot, base_dir, &ctx.settings));
    }
    debug!(file = %path.display(), findings = results.findings.len(), "validated");
    Ok(results)
}

pub async fn run(
    path: PathBuf,
    json: bool,
    assets: bool,
    today: Option<String>,
    settings: Option<PathBuf>,
) -> Result<()> {
    let ctx = context_from_args(today.as_deref(), settings.as_deref())?;
    let files = collect_submissions(&path)?;

    let mut reports = Vec::new();
    for file in &files {
        let results = validate_file(file, &ctx, assets)?;
        reports.push(FileResults {
            file: file.display().to_string(),
            results,
        });
    }

    let failed = reports.iter().filter(|r| !r.results.is_valid).count();

    if json {
        println!("{}", serde_json::to_string_pretty(&reports)?);
    } else {
        for report in &reports {
            println!("🔍 {}", report.file);
            print!("{}", FindingsReport::new(&report.results));
            println!();
        }
        let warnings: usize = reports
            .iter()
            .map(|r| r.results.count(Severity::Warning))
            .sum();
        println!(
            "Checked {} submission(s) against {}: {} failed, {} warning(s)",
            reports.len(),
            ctx.today,
            failed,
            warnings
        );
    }

    if failed > 0 {
        anyhow::bail!("{} submission(s) have blocking errors", failed);
    }
    Ok(())
}
