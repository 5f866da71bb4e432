use crate::finding::{QcValidationResults, ValidationFinding};
use crate::rules::{RULES, Rule};
use chrono::{Local, NaiveDate};
use release_qc_core::{QcSettings, Section, SubmissionSnapshot};
use tracing::debug;

/// Everything a validation pass depends on besides the snapshot itself.
///
/// Pinning `today` makes results reproducible; the date-relative rules
/// (release date in the past, notice period, future copyright year) read
/// it instead of the wall clock.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationContext {
    pub today: NaiveDate,
    pub settings: QcSettings,
}

impl ValidationContext {
    /// Local calendar date with default settings.
    pub fn current() -> Self {
        Self::on(Local::now().date_naive())
    }

    pub fn on(today: NaiveDate) -> Self {
        Self {
            today,
            settings: QcSettings::default(),
        }
    }

    pub fn with_settings(mut self, settings: QcSettings) -> Self {
        self.settings = settings;
        self
    }
}

impl Default for ValidationContext {
    fn default() -> Self {
        Self::current()
    }
}

/// Validate a snapshot against today's date and default settings.
pub fn validate_submission(snapshot: &SubmissionSnapshot) -> QcValidationResults {
    validate_with(snapshot, &ValidationContext::current())
}

/// Validate a snapshot against an explicit context.
///
/// Pure: the same snapshot and context always give the same findings in
/// the same order.
pub fn validate_with(
    snapshot: &SubmissionSnapshot,
    ctx: &ValidationContext,
) -> QcValidationResults {
    run(RULES.iter(), snapshot, ctx)
}

/// Evaluate only the rules owned by `sections`.
///
/// Findings keep rule-table order regardless of the order of `sections`.
pub fn validate_sections(
    snapshot: &SubmissionSnapshot,
    ctx: &ValidationContext,
    sections: &[Section],
) -> QcValidationResults {
    run(
        RULES.iter().filter(|rule| sections.contains(&rule.section)),
        snapshot,
        ctx,
    )
}

fn run<'r>(
    rules: impl Iterator<Item = &'r Rule>,
    snapshot: &SubmissionSnapshot,
    ctx: &ValidationContext,
) -> QcValidationResults {
    let mut findings = Vec::new();
    let mut evaluated = 0usize;

    for rule in rules {
        evaluated += 1;
        for violation in rule.evaluate(snapshot, ctx) {
            findings.push(ValidationFinding {
                field: violation.field,
                severity: rule.severity,
                message: violation.message.unwrap_or_else(|| rule.message.to_string()),
                suggestion: violation.suggestion,
                rule: rule.id,
            });
        }
    }

    let results = QcValidationResults::from_findings(findings);
    debug!(
        rules = evaluated,
        errors = results.errors().count(),
        warnings = results.warnings().count(),
        "validation pass finished"
    );
    results
}
