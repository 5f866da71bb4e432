//! Boundary to the backend submission service, and the wizard session
//! that owns a snapshot on its way there.

pub mod http;
pub mod wizard;

use async_trait::async_trait;
use release_qc_core::SubmissionSnapshot;
use serde::{Deserialize, Serialize};

pub use http::HttpSubmitter;
pub use wizard::{NavigationError, SubmitError, Wizard};

/// What the submission service hands back for an accepted release.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmissionReceipt {
    /// Server-assigned submission id
    pub id: String,
    #[serde(default)]
    pub status: String,
}

#[async_trait]
pub trait Submitter: Send + Sync {
    async fn submit(&self, payload: &SubmissionSnapshot) -> anyhow::Result<SubmissionReceipt>;
}
