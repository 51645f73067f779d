//! Application configuration structures.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};
use crate::models::{GameVersion, SiteConfig};

/// Root application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// HTTP client settings
    #[serde(default)]
    pub client: ClientConfig,

    /// Export run behavior
    #[serde(default)]
    pub export: ExportConfig,

    /// Listing page structure
    #[serde(default)]
    pub listing: ListingConfig,

    /// Detail page structure
    #[serde(default)]
    pub detail: DetailConfig,

    /// Status messages shown while exporting
    #[serde(default)]
    pub messages: Messages,

    /// Known site contexts, one per game version
    #[serde(default = "crate::models::site::default_sites")]
    pub sites: Vec<SiteConfig>,

    /// Direct import into Kamaitachi
    #[serde(default)]
    pub kamaitachi: KamaitachiConfig,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    /// Load configuration or return default if loading fails.
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        Self::load(&path).unwrap_or_else(|e| {
            log::warn!(
                "Config load failed from {:?}: {}. Using defaults.",
                path.as_ref(),
                e
            );
            Self::default()
        })
    }

    /// Site context for a game version.
    pub fn site(&self, version: GameVersion) -> Result<&SiteConfig> {
        self.sites
            .iter()
            .find(|site| site.version == version)
            .ok_or_else(|| AppError::config(format!("No site configured for {version}")))
    }

    /// Validate configuration values for basic sanity.
    pub fn validate(&self) -> Result<()> {
        if self.client.user_agent.trim().is_empty() {
            return Err(AppError::validation("client.user_agent is empty"));
        }
        if self.client.timeout_secs == 0 {
            return Err(AppError::validation("client.timeout_secs must be > 0"));
        }
        url::Url::parse(&self.client.base_url)
            .map_err(|e| AppError::validation(format!("client.base_url: {e}")))?;
        if self.export.file_name.trim().is_empty() {
            return Err(AppError::validation("export.file_name is empty"));
        }
        if self.export.max_pages == 0 {
            return Err(AppError::validation("export.max_pages must be > 0"));
        }
        if self.listing.table_id.trim().is_empty() {
            return Err(AppError::validation("listing.table_id is empty"));
        }
        if scraper::Selector::parse(&self.listing.marker_selector).is_err() {
            return Err(AppError::validation(format!(
                "listing.marker_selector '{}' is not a valid selector",
                self.listing.marker_selector
            )));
        }
        if self.sites.is_empty() {
            return Err(AppError::validation("No sites defined"));
        }
        url::Url::parse(&self.kamaitachi.import_url)
            .map_err(|e| AppError::validation(format!("kamaitachi.import_url: {e}")))?;
        if self.kamaitachi.max_polls == 0 {
            return Err(AppError::validation("kamaitachi.max_polls must be > 0"));
        }
        for site in &self.sites {
            for template in [&site.single_url, &site.double_url] {
                url::Url::parse(template).map_err(|e| {
                    AppError::validation(format!("{} listing url '{}': {}", site.version, template, e))
                })?;
            }
        }
        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            client: ClientConfig::default(),
            export: ExportConfig::default(),
            listing: ListingConfig::default(),
            detail: DetailConfig::default(),
            messages: Messages::default(),
            sites: crate::models::site::default_sites(),
            kamaitachi: KamaitachiConfig::default(),
        }
    }
}

/// HTTP client settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientConfig {
    /// User-Agent header for HTTP requests
    #[serde(default = "defaults::user_agent")]
    pub user_agent: String,

    /// Request timeout in seconds
    #[serde(default = "defaults::timeout")]
    pub timeout_secs: u64,

    /// Site root that relative detail links resolve against
    #[serde(default = "defaults::base_url")]
    pub base_url: String,

    /// Raw `Cookie` header of an already logged-in browser session
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cookie: Option<String>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            user_agent: defaults::user_agent(),
            timeout_secs: defaults::timeout(),
            base_url: defaults::base_url(),
            cookie: None,
        }
    }
}

/// What to do with a record that cannot be turned into a score.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecordPolicy {
    /// Drop the record and keep going
    #[default]
    Skip,
    /// Fail the whole run
    Abort,
}

/// Export run settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportConfig {
    /// Name of the produced file
    #[serde(default = "defaults::file_name")]
    pub file_name: String,

    /// Service identifier written to the batch header
    #[serde(default = "defaults::service")]
    pub service: String,

    /// Upper bound on listing pages read in one run
    #[serde(default = "defaults::max_pages")]
    pub max_pages: usize,

    /// Unknown full-combo descriptor or difficulty index
    #[serde(default)]
    pub on_unrecognized: RecordPolicy,

    /// Score or timestamp cell that does not parse
    #[serde(default)]
    pub on_malformed: RecordPolicy,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            file_name: defaults::file_name(),
            service: defaults::service(),
            max_pages: defaults::max_pages(),
            on_unrecognized: RecordPolicy::default(),
            on_malformed: RecordPolicy::default(),
        }
    }
}

/// Kamaitachi import settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KamaitachiConfig {
    /// API key with the score submission permission
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    /// Direct-manual import endpoint
    #[serde(default = "defaults::import_url")]
    pub import_url: String,

    /// Delay between import status checks
    #[serde(default = "defaults::poll_interval")]
    pub poll_interval_ms: u64,

    /// Status checks before giving up on an import
    #[serde(default = "defaults::max_polls")]
    pub max_polls: usize,
}

impl KamaitachiConfig {
    /// The configured API key, if it is usable.
    pub fn api_key(&self) -> Result<&str> {
        self.api_key
            .as_deref()
            .map(str::trim)
            .filter(|key| !key.is_empty())
            .ok_or_else(|| AppError::config("kamaitachi.api_key is not set"))
    }
}

impl Default for KamaitachiConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            import_url: defaults::import_url(),
            poll_interval_ms: defaults::poll_interval(),
            max_polls: defaults::max_polls(),
        }
    }
}

/// Listing page structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListingConfig {
    /// Element id of the score table
    #[serde(default = "defaults::listing_table")]
    pub table_id: String,

    /// Selector of the per-cell score marker
    #[serde(default = "defaults::marker_selector")]
    pub marker_selector: String,

    /// Marker text of a chart without a recorded score
    #[serde(default = "defaults::placeholder")]
    pub placeholder: String,
}

impl Default for ListingConfig {
    fn default() -> Self {
        Self {
            table_id: defaults::listing_table(),
            marker_selector: defaults::marker_selector(),
            placeholder: defaults::placeholder(),
        }
    }
}

/// Where a value sits in a details table.
///
/// The cell right after a cell whose text equals `label` wins; the fixed
/// `row`/`column` position is used when no such label exists.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldLocator {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    pub row: usize,
    pub column: usize,
}

impl FieldLocator {
    pub fn new(label: Option<&str>, row: usize, column: usize) -> Self {
        Self {
            label: label.map(str::to_string),
            row,
            column,
        }
    }
}

/// Detail page structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DetailConfig {
    /// Element id of the song info table
    #[serde(default = "defaults::info_table")]
    pub info_table_id: String,

    /// Element id of the score details table
    #[serde(default = "defaults::detail_table")]
    pub detail_table_id: String,

    #[serde(default = "defaults::title")]
    pub title: FieldLocator,

    #[serde(default = "defaults::grade")]
    pub grade: FieldLocator,

    #[serde(default = "defaults::score")]
    pub score: FieldLocator,

    #[serde(default = "defaults::timestamp")]
    pub timestamp: FieldLocator,

    #[serde(default = "defaults::full_combo")]
    pub full_combo: FieldLocator,
}

impl Default for DetailConfig {
    fn default() -> Self {
        Self {
            info_table_id: defaults::info_table(),
            detail_table_id: defaults::detail_table(),
            title: defaults::title(),
            grade: defaults::grade(),
            score: defaults::score(),
            timestamp: defaults::timestamp(),
            full_combo: defaults::full_combo(),
        }
    }
}

/// Status message templates.
///
/// Placeholders: `{page}`, `{total}`, `{count}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Messages {
    #[serde(default = "defaults::msg_reading_page")]
    pub reading_page: String,
    #[serde(default = "defaults::msg_reading_page_of")]
    pub reading_page_of: String,
    #[serde(default = "defaults::msg_failed")]
    pub failed: String,
    #[serde(default = "defaults::msg_exported")]
    pub exported: String,
    #[serde(default = "defaults::msg_skipped")]
    pub skipped: String,
}

impl Default for Messages {
    fn default() -> Self {
        Self {
            reading_page: defaults::msg_reading_page(),
            reading_page_of: defaults::msg_reading_page_of(),
            failed: defaults::msg_failed(),
            exported: defaults::msg_exported(),
            skipped: defaults::msg_skipped(),
        }
    }
}

mod defaults {
    use super::FieldLocator;

    // Client defaults
    pub fn user_agent() -> String {
        "Mozilla/5.0 (compatible; ddr-exporter/0.1)".into()
    }
    pub fn timeout() -> u64 {
        30
    }
    pub fn base_url() -> String {
        "https://p.eagate.573.jp/".into()
    }

    // Export defaults
    pub fn file_name() -> String {
        "ddr-export.json".into()
    }
    pub fn service() -> String {
        "kt-ddr-site-exporter".into()
    }
    pub fn max_pages() -> usize {
        64
    }

    // Kamaitachi defaults
    pub fn import_url() -> String {
        "https://kamai.tachi.ac/ir/direct-manual/import".into()
    }
    pub fn poll_interval() -> u64 {
        1000
    }
    pub fn max_polls() -> usize {
        300
    }

    // Listing defaults
    pub fn listing_table() -> String {
        "data_tbl".into()
    }
    pub fn marker_selector() -> String {
        "div.data_score".into()
    }
    pub fn placeholder() -> String {
        "-".into()
    }

    // Detail defaults
    pub fn info_table() -> String {
        "music_info".into()
    }
    pub fn detail_table() -> String {
        "music_detail_table".into()
    }
    pub fn title() -> FieldLocator {
        FieldLocator::new(None, 0, 1)
    }
    pub fn grade() -> FieldLocator {
        FieldLocator::new(Some("最高ランク"), 1, 1)
    }
    pub fn score() -> FieldLocator {
        FieldLocator::new(Some("ハイスコア"), 1, 3)
    }
    pub fn timestamp() -> FieldLocator {
        FieldLocator::new(Some("最終プレー時間"), 3, 3)
    }
    pub fn full_combo() -> FieldLocator {
        FieldLocator::new(Some("フルコンボ種別"), 4, 1)
    }

    // Message defaults
    pub fn msg_reading_page() -> String {
        "Exporting: Reading page {page}...".into()
    }
    pub fn msg_reading_page_of() -> String {
        "Exporting: Reading page {page}/{total}...".into()
    }
    pub fn msg_failed() -> String {
        "Failed to read scores. Are you logged in?".into()
    }
    pub fn msg_exported() -> String {
        "Exported {count} scores.".into()
    }
    pub fn msg_skipped() -> String {
        "Skipped {count} scores that could not be read.".into()
    }
}
