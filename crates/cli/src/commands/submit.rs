use super::configure::{load_config, read_input};
use anyhow::{Context, Result};
use release_qc_core::load_submission;
use release_qc_submitter::{HttpSubmitter, SubmitError, Wizard};
use release_qc_validator::{
    FindingsReport, QcValidationResults, Severity, ValidationContext, inspect_assets,
    validate_with,
};
use std::path::{Path, PathBuf};

/// Validation used before sending: field rules plus the referenced files.
fn pre_submit_check(path: &Path, ctx: &ValidationContext) -> Result<QcValidationResults> {
    let snapshot = load_submission(path)
        .with_context(|| format!("Failed to load submission {}", path.display()))?;
    let mut results = validate_with(&snapshot, ctx);
    let base_dir = path.parent().unwrap_or_else(|| Path::new("."));
    results.merge(inspect_assets(&snapshot, base_dir, &ctx.settings));
    Ok(results)
}

/// Validate a submission file and send it to the configured service.
pub async fn run(path: PathBuf, force: bool) -> Result<()> {
    println!("📦 Preparing submission {}...\n", path.display());

    let ctx = ValidationContext::current();
    let results = pre_submit_check(&path, &ctx)?;
    print!("{}", FindingsReport::new(&results));

    if !results.is_valid {
        anyhow::bail!(
            "Submission blocked: {} error(s) remain\nRun 'release-qc validate {}' for details",
            results.count(Severity::Error),
            path.display()
        );
    }

    let warnings = results.count(Severity::Warning);
    if warnings > 0 && !force {
        println!();
        let answer = read_input(&format!(
            "⚠️  {} warning(s) remain. Submit anyway? (y/N): ",
            warnings
        ))?;
        if !answer.eq_ignore_ascii_case("y") && !answer.eq_ignore_ascii_case("yes") {
            println!("❌ Submission cancelled.");
            return Ok(());
        }
    }

    let config = load_config()?
        .context("No submission configuration found.\nRun 'release-qc configure' first")?;
    let submitter = HttpSubmitter::new(&config.submission.endpoint, &config.submission.api_token)?;

    let snapshot = load_submission(&path)
        .with_context(|| format!("Failed to load submission {}", path.display()))?;
    let mut wizard = Wizard::with_snapshot(submitter, snapshot, ctx);

    println!("🚀 Sending to {}...", wizard.submitter().submissions_url());
    match wizard.submit().await {
        Ok(receipt) => {
            println!();
            println!("✅ Submission accepted!");
            println!("   ID: {}", receipt.id);
            if !receipt.status.is_empty() {
                println!("   Status: {}", receipt.status);
            }
            Ok(())
        }
        Err(SubmitError::Blocked(count)) => {
            anyhow::bail!("Submission blocked: {} error(s) remain", count)
        }
        Err(SubmitError::Failed) => {
            anyhow::bail!("Error during submission\nRun with RUST_LOG=debug for details")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_pre_submit_check_includes_assets() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("submission.toml");
        fs::write(
            &path,
            "[artist]\nname = \"IU\"\n\n[files]\ncoverArt = \"cover.png\"\naudio = [\"01.flac\"]\n",
        )
        .unwrap();

        let ctx = ValidationContext::on(NaiveDate::from_ymd_opt(2026, 3, 1).unwrap());
        let results = pre_submit_check(&path, &ctx).unwrap();
        assert!(!results.is_valid);
        assert_eq!(
            results
                .findings
                .iter()
                .filter(|f| f.rule == "files-not-found")
                .count(),
            2
        );
    }

    #[tokio::test]
    async fn test_run_refuses_invalid_submission() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("submission.toml");
        fs::write(&path, "[artist]\nname = \"\"\n").unwrap();

        let err = run(path, true).await.unwrap_err();
        assert!(err.to_string().starts_with("Submission blocked"));
    }

    #[tokio::test]
    async fn test_run_missing_file() {
        let dir = TempDir::new().unwrap();
        assert!(run(dir.path().join("nope.toml"), true).await.is_err());
    }
}
