// src/pipeline/export.rs

//! Export orchestration.
//!
//! One run walks the listing pages of a game version and play type, fetches
//! every scored chart's detail page in order, and delivers the finished
//! BATCH-MANUAL document. Any page failure discards the whole run.

use url::Url;

use crate::error::{AppError, Result};
use crate::models::{
    Config, ExportBatch, ExportRequest, ListingPage, ScoreRecord, RecordPolicy,
};
use crate::pipeline::guard::RunGuard;
use crate::pipeline::pages::{ListingUrl, PageCursor};
use crate::pipeline::progress::{ProgressReporter, RunState};
use crate::services::{ListingExtractor, PageFetcher, ScoreNormalizer};
use crate::storage::ExportSink;
use crate::utils::{http, resolve_url};

/// Result of a successful run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportSummary {
    pub request: ExportRequest,
    pub record_count: usize,
    pub skipped: usize,
    pub pages_read: usize,
    /// Where the sink put the document
    pub location: String,
}

/// Drives export runs for one trigger.
///
/// Triggers that must not run at the same time share a `RunGuard`.
pub struct Exporter<'a> {
    config: &'a Config,
    fetcher: &'a dyn PageFetcher,
    sink: &'a dyn ExportSink,
    reporter: &'a dyn ProgressReporter,
    guard: RunGuard,
    extractor: ListingExtractor,
    normalizer: ScoreNormalizer,
    base_url: Url,
    state: RunState,
    scores: Vec<ScoreRecord>,
    skipped: usize,
}

impl<'a> Exporter<'a> {
    pub fn new(
        config: &'a Config,
        fetcher: &'a dyn PageFetcher,
        sink: &'a dyn ExportSink,
        reporter: &'a dyn ProgressReporter,
        guard: RunGuard,
    ) -> Result<Self> {
        Ok(Self {
            config,
            fetcher,
            sink,
            reporter,
            guard,
            extractor: ListingExtractor::new(&config.listing)?,
            normalizer: ScoreNormalizer::new(config.detail.clone()),
            base_url: Url::parse(&config.client.base_url)?,
            state: RunState::Idle,
            scores: Vec::new(),
            skipped: 0,
        })
    }

    pub fn state(&self) -> RunState {
        self.state
    }

    /// Records collected so far in the current run.
    pub fn collected(&self) -> &[ScoreRecord] {
        &self.scores
    }

    /// Run one export.
    ///
    /// Fails with `RunInProgress` without touching any state when another
    /// trigger sharing the guard is running.
    pub async fn run(&mut self, request: ExportRequest) -> Result<ExportSummary> {
        let token = self.guard.try_acquire()?;

        self.scores.clear();
        self.skipped = 0;
        self.set_state(RunState::Running);
        log::info!("Starting {request} export");

        let outcome = match self.collect(request).await {
            Ok(pages_read) => self.deliver(request, pages_read).await,
            Err(e) => Err(e),
        };

        let result = match outcome {
            Ok(summary) => {
                self.set_state(RunState::Succeeded);
                self.reporter.status(
                    &self
                        .config
                        .messages
                        .exported
                        .replace("{count}", &summary.record_count.to_string()),
                );
                if summary.skipped > 0 {
                    self.reporter.status(
                        &self
                            .config
                            .messages
                            .skipped
                            .replace("{count}", &summary.skipped.to_string()),
                    );
                }
                Ok(summary)
            }
            Err(e) => {
                self.scores.clear();
                log::error!("{request} export failed: {e}");
                self.set_state(RunState::Failed);
                self.reporter.failure(&self.config.messages.failed);
                Err(e)
            }
        };

        drop(token);
        self.set_state(RunState::Idle);
        result
    }

    /// Read every listing page and its detail pages. Returns pages read.
    async fn collect(&mut self, request: ExportRequest) -> Result<usize> {
        let config = self.config;
        let site = config.site(request.game_version)?;
        let expected = site.expected_pages(request.play_type);
        let limit = expected.unwrap_or(config.export.max_pages);
        let mut cursor = PageCursor::new(site.listing_url(request.play_type), limit);

        while let Some(listing) = cursor.next() {
            self.report_page(&listing, expected);

            let page = self.read_listing(&listing).await?;
            if page.is_end() {
                log::debug!("Listing ended at offset {}", listing.offset);
                cursor.finish();
                break;
            }

            log::debug!(
                "Page {}: {} songs, {} scores",
                listing.page_number(),
                page.song_rows,
                page.refs.len()
            );

            for cell in &page.refs {
                let detail_url = resolve_url(&self.base_url, &cell.href)?;
                self.read_detail(&detail_url).await?;
            }
        }

        if cursor.reached_end() {
            return Ok(cursor.pages_yielded() - 1);
        }
        if expected.is_none() {
            log::warn!(
                "Stopped after export.max_pages ({}) listing pages",
                config.export.max_pages
            );
        }
        Ok(cursor.pages_yielded())
    }

    async fn read_listing(&self, listing: &ListingUrl) -> Result<ListingPage> {
        let markup = self.fetcher.fetch(&listing.url).await?;
        self.extractor
            .extract(&http::parse_document(&markup))
            .map_err(|e| match e {
                AppError::Extract { message, .. } => {
                    AppError::extract(format!("listing page {}", listing.offset), message)
                }
                other => other,
            })
    }

    async fn read_detail(&mut self, url: &str) -> Result<()> {
        let markup = self.fetcher.fetch(url).await?;
        match self.normalizer.parse(&http::parse_document(&markup), url) {
            Ok(record) => {
                self.scores.push(record);
                Ok(())
            }
            Err(e) if self.record_policy(&e) == Some(RecordPolicy::Skip) => {
                log::warn!("Skipping {url}: {e}");
                self.skipped += 1;
                Ok(())
            }
            Err(e) => Err(e),
        }
    }

    async fn deliver(&mut self, request: ExportRequest, pages_read: usize) -> Result<ExportSummary> {
        let scores = std::mem::take(&mut self.scores);
        let record_count = scores.len();
        let batch = ExportBatch::new(request.play_type, &self.config.export.service, scores);
        let bytes = batch.to_json_bytes()?;

        let location = self
            .sink
            .deliver(&self.config.export.file_name, &bytes)
            .await?;

        Ok(ExportSummary {
            request,
            record_count,
            skipped: self.skipped,
            pages_read,
            location,
        })
    }

    /// Policy covering a per-record error, `None` for page-level errors.
    fn record_policy(&self, error: &AppError) -> Option<RecordPolicy> {
        if !error.is_record_level() {
            return None;
        }
        let export = &self.config.export;
        Some(match error {
            AppError::Field { .. } => export.on_malformed,
            _ => export.on_unrecognized,
        })
    }

    fn report_page(&self, listing: &ListingUrl, expected: Option<usize>) {
        let page = listing.page_number();
        let messages = &self.config.messages;
        let message = match expected {
            Some(total) if page <= total => messages
                .reading_page_of
                .replace("{page}", &page.to_string())
                .replace("{total}", &total.to_string()),
            _ => messages.reading_page.replace("{page}", &page.to_string()),
        };
        self.reporter.status(&message);
    }

    fn set_state(&mut self, state: RunState) {
        self.state = state;
        self.reporter.state_changed(state);
    }
}
