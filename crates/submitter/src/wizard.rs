//! The wizard session: sole owner of the snapshot and its latest results.
//!
//! Every mutation produces a new snapshot value and re-runs validation
//! before returning, so `results()` never describes a stale snapshot.

use crate::{SubmissionReceipt, Submitter};
use release_qc_core::{Error, SubmissionSnapshot};
use release_qc_validator::{
    QcValidationResults, Severity, Step, ValidationContext, apply_suggestion, blocking_findings,
    can_proceed, can_submit, validate_with,
};
use std::sync::Arc;
use tracing::{error, info, warn};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum NavigationError {
    #[error("{step} has {count} error(s) to fix before moving on")]
    Blocked { step: Step, count: usize },
    #[error("Already at the last step")]
    AtLastStep,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SubmitError {
    #[error("Submission blocked: {0} error(s) remain")]
    Blocked(usize),
    /// The service call failed. Details go to the log, never to the user.
    #[error("Error during submission")]
    Failed,
}

pub struct Wizard<S> {
    snapshot: Arc<SubmissionSnapshot>,
    results: QcValidationResults,
    step: Step,
    ctx: ValidationContext,
    submitter: S,
}

impl<S: Submitter> Wizard<S> {
    /// Empty form at the first step, validated against today's date.
    pub fn new(submitter: S) -> Self {
        Self::with_snapshot(
            submitter,
            SubmissionSnapshot::empty(),
            ValidationContext::current(),
        )
    }

    pub fn with_snapshot(
        submitter: S,
        snapshot: SubmissionSnapshot,
        ctx: ValidationContext,
    ) -> Self {
        let results = validate_with(&snapshot, &ctx);
        Self {
            snapshot: Arc::new(snapshot),
            results,
            step: Step::first(),
            ctx,
            submitter,
        }
    }

    /// The current snapshot. Later updates never change a returned value.
    pub fn snapshot(&self) -> Arc<SubmissionSnapshot> {
        Arc::clone(&self.snapshot)
    }

    pub fn results(&self) -> &QcValidationResults {
        &self.results
    }

    pub fn step(&self) -> Step {
        self.step
    }

    pub fn submitter(&self) -> &S {
        &self.submitter
    }

    /// Apply one edit and re-validate.
    pub fn update(&mut self, edit: impl FnOnce(&mut SubmissionSnapshot)) -> &QcValidationResults {
        edit(Arc::make_mut(&mut self.snapshot));
        self.revalidate();
        &self.results
    }

    /// Accept the suggestion of the finding at `index` in `results().findings`.
    pub fn apply_suggestion(&mut self, index: usize) -> release_qc_core::Result<()> {
        let finding = self
            .results
            .findings
            .get(index)
            .ok_or_else(|| Error::InvalidData(format!("No finding at index {}", index)))?;
        let fixed = apply_suggestion(&self.snapshot, finding)?;
        self.snapshot = Arc::new(fixed);
        self.revalidate();
        Ok(())
    }

    pub fn can_proceed(&self) -> bool {
        can_proceed(self.step, &self.results)
    }

    pub fn next(&mut self) -> Result<Step, NavigationError> {
        let next = self.step.next().ok_or(NavigationError::AtLastStep)?;
        self.check_leaving(self.step)?;
        self.step = next;
        Ok(next)
    }

    /// Going back is never gated; on the first step this is a no-op.
    pub fn previous(&mut self) -> Step {
        if let Some(previous) = self.step.previous() {
            self.step = previous;
        }
        self.step
    }

    /// Jump to any earlier step, or forward across steps that all pass.
    pub fn go_to(&mut self, target: Step) -> Result<Step, NavigationError> {
        if target > self.step {
            for step in Step::ALL
                .into_iter()
                .filter(|s| *s >= self.step && *s < target)
            {
                self.check_leaving(step)?;
            }
        }
        self.step = target;
        Ok(target)
    }

    fn check_leaving(&self, step: Step) -> Result<(), NavigationError> {
        let blocking = blocking_findings(step, &self.results);
        if blocking.is_empty() {
            Ok(())
        } else {
            Err(NavigationError::Blocked {
                step,
                count: blocking.len(),
            })
        }
    }

    /// Re-validate, then hand the snapshot to the service exactly once.
    ///
    /// On success the form is discarded and the session starts over at the
    /// first step. On failure the snapshot is kept so the user can retry.
    pub async fn submit(&mut self) -> Result<SubmissionReceipt, SubmitError> {
        self.revalidate();
        if !can_submit(&self.results) {
            let errors = self.results.count(Severity::Error);
            warn!(errors, "submission blocked by validation errors");
            return Err(SubmitError::Blocked(errors));
        }

        match self.submitter.submit(&self.snapshot).await {
            Ok(receipt) => {
                info!(id = %receipt.id, status = %receipt.status, "submission accepted");
                self.reset();
                Ok(receipt)
            }
            Err(e) => {
                error!("submission failed: {:#}", e);
                Err(SubmitError::Failed)
            }
        }
    }

    fn revalidate(&mut self) {
        self.results = validate_with(&self.snapshot, &self.ctx);
    }

    fn reset(&mut self) {
        self.snapshot = Arc::new(SubmissionSnapshot::empty());
        self.step = Step::first();
        self.revalidate();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use chrono::NaiveDate;
    use release_qc_core::{AlbumType, Contributor, FieldPath, TrackInfo, Translation};
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct MockSubmitter {
        calls: AtomicUsize,
        fail: bool,
    }

    impl MockSubmitter {
        fn new(fail: bool) -> Self {
            Self {
                calls: AtomicUsize::new(0),
                fail,
            }
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl Submitter for MockSubmitter {
        async fn submit(&self, payload: &SubmissionSnapshot) -> anyhow::Result<SubmissionReceipt> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                anyhow::bail!("503 Service Unavailable");
            }
            Ok(SubmissionReceipt {
                id: format!("sub-{}", payload.artist.name),
                status: "pending".to_string(),
            })
        }
    }

    fn ctx() -> ValidationContext {
        ValidationContext::on(NaiveDate::from_ymd_opt(2026, 3, 1).unwrap())
    }

    fn complete_single() -> SubmissionSnapshot {
        let mut s = SubmissionSnapshot::empty();
        s.artist.name = "IU".to_string();
        s.artist.artist_type = "solo".to_string();
        s.artist.translations = vec![Translation {
            language: "ko".to_string(),
            value: "아이유".to_string(),
        }];
        s.album.title = "Love Poem".to_string();
        s.album.title_translations = vec![Translation {
            language: "ko".to_string(),
            value: "러브포엠".to_string(),
        }];
        s.album.album_type = Some(AlbumType::Single);
        s.album.genres = vec!["K-Pop".to_string()];
        s.album.release_date = "2026-04-15".to_string();
        s.album.copyright_holder = "EDAM Entertainment".to_string();
        s.album.auto_generate_upc = true;
        s.tracks = vec![TrackInfo {
            title: "Love Poem".to_string(),
            isrc: "KRA381900001".to_string(),
            artists: vec!["IU".to_string()],
            contributors: vec![Contributor {
                name: "IU".to_string(),
                role: "composer".to_string(),
            }],
            ..TrackInfo::default()
        }];
        s.files.cover_art = "artwork/cover.jpg".to_string();
        s.files.audio = vec!["audio/01.flac".to_string()];
        s.distribution.territories = vec!["WW".to_string()];
        s.distribution.selected_platforms = vec!["spotify".to_string()];
        s.distribution.price_type = "PAID".to_string();
        s
    }

    fn wizard(snapshot: SubmissionSnapshot, fail: bool) -> Wizard<MockSubmitter> {
        Wizard::with_snapshot(MockSubmitter::new(fail), snapshot, ctx())
    }

    #[test]
    fn test_update_revalidates() {
        let mut wizard = wizard(SubmissionSnapshot::empty(), false);
        assert!(wizard.results().for_field(FieldPath::ArtistName).any(|f| f.is_error()));

        let results = wizard.update(|s| s.artist.name = "IU".to_string());
        assert!(!results.for_field(FieldPath::ArtistName).any(|f| f.is_error()));
    }

    #[test]
    fn test_earlier_snapshots_are_not_mutated() {
        let mut wizard = wizard(SubmissionSnapshot::empty(), false);
        let before = wizard.snapshot();
        wizard.update(|s| s.artist.name = "IU".to_string());
        assert_eq!(before.artist.name, "");
        assert_eq!(wizard.snapshot().artist.name, "IU");
    }

    #[test]
    fn test_next_is_gated_and_previous_is_not() {
        let mut wizard = wizard(SubmissionSnapshot::empty(), false);
        assert!(matches!(
            wizard.next(),
            Err(NavigationError::Blocked {
                step: Step::ArtistInformation,
                ..
            })
        ));
        assert_eq!(wizard.step(), Step::ArtistInformation);

        wizard.update(|s| s.artist.name = "IU".to_string());
        assert_eq!(wizard.next(), Ok(Step::AlbumInformation));
        assert_eq!(wizard.previous(), Step::ArtistInformation);
        assert_eq!(wizard.previous(), Step::ArtistInformation);
    }

    #[test]
    fn test_go_to_checks_every_skipped_step() {
        let mut snapshot = complete_single();
        snapshot.album.title.clear();
        let mut wizard = wizard(snapshot, false);

        assert!(matches!(
            wizard.go_to(Step::FileUpload),
            Err(NavigationError::Blocked {
                step: Step::AlbumInformation,
                ..
            })
        ));
        assert_eq!(wizard.go_to(Step::AlbumInformation), Ok(Step::AlbumInformation));
        assert_eq!(wizard.go_to(Step::ArtistInformation), Ok(Step::ArtistInformation));
    }

    #[test]
    fn test_apply_suggestion_replaces_snapshot() {
        let mut snapshot = complete_single();
        snapshot.tracks[0].title = "Love Poem ".to_string();
        let mut wizard = wizard(snapshot, false);

        let index = wizard
            .results()
            .findings
            .iter()
            .position(|f| f.rule == "track-title-edge-whitespace")
            .unwrap();
        wizard.apply_suggestion(index).unwrap();
        assert_eq!(wizard.snapshot().tracks[0].title, "Love Poem");
        assert!(wizard.apply_suggestion(999).is_err());
    }

    #[tokio::test]
    async fn test_submit_blocked_by_errors() {
        let mut wizard = wizard(SubmissionSnapshot::empty(), false);
        let result = wizard.submit().await;
        assert!(matches!(result, Err(SubmitError::Blocked(n)) if n > 0));
        assert_eq!(wizard.submitter().calls(), 0);
    }

    #[tokio::test]
    async fn test_submit_failure_is_generic_and_keeps_form() {
        let mut wizard = wizard(complete_single(), true);
        let err = wizard.submit().await.unwrap_err();
        assert_eq!(err, SubmitError::Failed);
        assert_eq!(err.to_string(), "Error during submission");
        assert_eq!(wizard.submitter().calls(), 1);
        assert_eq!(wizard.snapshot().artist.name, "IU");
    }

    #[tokio::test]
    async fn test_submit_success_resets_session() {
        let mut wizard = wizard(complete_single(), false);
        wizard.go_to(Step::ReviewAndSubmit).unwrap();

        let receipt = wizard.submit().await.unwrap();
        assert_eq!(receipt.id, "sub-IU");
        assert_eq!(wizard.submitter().calls(), 1);
        assert_eq!(wizard.step(), Step::ArtistInformation);
        assert_eq!(*wizard.snapshot(), SubmissionSnapshot::empty());
    }
}
