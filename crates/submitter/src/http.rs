use crate::{SubmissionReceipt, Submitter};
use anyhow::{Context, Result};
use async_trait::async_trait;
use release_qc_core::SubmissionSnapshot;
use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderValue};
use std::time::Duration;
use tracing::info;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

/// Submission service reached over HTTPS with a bearer token.
pub struct HttpSubmitter {
    client: reqwest::Client,
    endpoint: String,
}

impl HttpSubmitter {
    pub fn new(endpoint: &str, api_token: &str) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {}", api_token))
                .context("API token contains characters not allowed in a header")?,
        );

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(REQUEST_TIMEOUT)
            .build()?;

        Ok(Self {
            client,
            endpoint: endpoint.trim_end_matches('/').to_string(),
        })
    }

    pub fn submissions_url(&self) -> String {
        format!("{}/submissions", self.endpoint)
    }
}

#[async_trait]
impl Submitter for HttpSubmitter {
    async fn submit(&self, payload: &SubmissionSnapshot) -> Result<SubmissionReceipt> {
        let url = self.submissions_url();
        info!(%url, tracks = payload.tracks.len(), "sending submission");

        let response = self
            .client
            .post(&url)
            .json(payload)
            .send()
            .await
            .context("Failed to reach the submission service")?
            .error_for_status()
            .context("Submission service rejected the release")?;

        let receipt: SubmissionReceipt = response
            .json()
            .await
            .context("Unexpected response from the submission service")?;
        Ok(receipt)
    }
}
