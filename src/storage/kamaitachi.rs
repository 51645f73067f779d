//! Direct import into Kamaitachi.
//!
//! The batch document is posted to the direct-manual import endpoint, then
//! the returned status URL is polled until the import completes.

use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use reqwest::header::CONTENT_TYPE;
use serde::Deserialize;
use serde::de::DeserializeOwned;

use crate::error::{AppError, Result};
use crate::models::{ClientConfig, KamaitachiConfig};
use crate::storage::ExportSink;
use crate::utils::http;

/// Import status reported once Kamaitachi has processed a batch.
const COMPLETED: &str = "completed";

/// Transport to the Kamaitachi API. Both calls return the raw response body.
#[async_trait]
pub trait ImportApi: Send + Sync {
    /// Submit a BATCH-MANUAL document.
    async fn submit(&self, url: &str, api_key: &str, document: &[u8]) -> Result<String>;

    /// Read the state of a submitted import.
    async fn status(&self, url: &str) -> Result<String>;
}

/// `ImportApi` over reqwest.
pub struct HttpImportApi {
    client: Client,
}

impl HttpImportApi {
    pub fn new(config: &ClientConfig) -> Result<Self> {
        Ok(Self {
            client: http::create_api_client(config)?,
        })
    }
}

#[async_trait]
impl ImportApi for HttpImportApi {
    async fn submit(&self, url: &str, api_key: &str, document: &[u8]) -> Result<String> {
        let response = self
            .client
            .post(url)
            .bearer_auth(api_key)
            .header("X-User-Intent", "true")
            .header(CONTENT_TYPE, "application/json")
            .body(document.to_vec())
            .send()
            .await?;
        Ok(response.text().await?)
    }

    async fn status(&self, url: &str) -> Result<String> {
        Ok(self.client.get(url).send().await?.text().await?)
    }
}

/// Counts of a completed import.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImportOutcome {
    pub new_scores: usize,
    pub sessions: usize,
    pub errors: usize,
}

impl fmt::Display for ImportOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Kamaitachi ({} new scores, {} sessions, {} errors)",
            self.new_scores, self.sessions, self.errors
        )
    }
}

#[derive(Deserialize)]
struct Envelope<T> {
    success: bool,
    #[serde(default)]
    description: String,
    body: Option<T>,
}

#[derive(Deserialize)]
struct Submitted {
    url: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ImportProgress {
    import_status: String,
    import: Option<ImportDocument>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ImportDocument {
    #[serde(default, rename = "scoreIDs")]
    score_ids: Vec<serde_json::Value>,
    #[serde(default)]
    created_sessions: Vec<serde_json::Value>,
    #[serde(default)]
    errors: Vec<serde_json::Value>,
}

/// Unwrap the body of a successful API response.
fn parse_body<T: DeserializeOwned>(raw: &str) -> Result<T> {
    let envelope: Envelope<T> = serde_json::from_str(raw)?;
    if !envelope.success {
        return Err(AppError::import(envelope.description));
    }
    envelope
        .body
        .ok_or_else(|| AppError::import("response has no body"))
}

/// Sink importing the export straight into a Kamaitachi profile.
pub struct KamaitachiSink<A = HttpImportApi> {
    api: A,
    api_key: String,
    import_url: String,
    poll_interval: Duration,
    max_polls: usize,
}

impl<A: ImportApi> KamaitachiSink<A> {
    /// Fails when no API key is configured.
    pub fn new(api: A, config: &KamaitachiConfig) -> Result<Self> {
        Ok(Self {
            api,
            api_key: config.api_key()?.to_string(),
            import_url: config.import_url.clone(),
            poll_interval: Duration::from_millis(config.poll_interval_ms),
            max_polls: config.max_polls,
        })
    }

    /// Submit a document and wait for the import to complete.
    pub async fn import(&self, document: &[u8]) -> Result<ImportOutcome> {
        let raw = self
            .api
            .submit(&self.import_url, &self.api_key, document)
            .await?;
        let submitted: Submitted = parse_body(&raw)?;
        log::info!("Import queued at {}", submitted.url);

        for check in 1..=self.max_polls {
            let progress: ImportProgress = parse_body(&self.api.status(&submitted.url).await?)?;
            if progress.import_status == COMPLETED {
                let import = progress
                    .import
                    .ok_or_else(|| AppError::import("completed import has no document"))?;
                return Ok(ImportOutcome {
                    new_scores: import.score_ids.len(),
                    sessions: import.created_sessions.len(),
                    errors: import.errors.len(),
                });
            }
            log::debug!("Import is {} (check {check})", progress.import_status);
            tokio::time::sleep(self.poll_interval).await;
        }

        Err(AppError::import(format!(
            "import not completed after {} status checks",
            self.max_polls
        )))
    }
}

#[async_trait]
impl<A: ImportApi> ExportSink for KamaitachiSink<A> {
    async fn deliver(&self, _file_name: &str, bytes: &[u8]) -> Result<String> {
        let outcome = self.import(bytes).await?;
        if outcome.errors > 0 {
            log::warn!("Kamaitachi reported {} import errors", outcome.errors);
        }
        log::info!("Imported {} new scores", outcome.new_scores);
        Ok(outcome.to_string())
    }
}
