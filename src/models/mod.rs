// src/models/mod.rs

//! Domain models for the exporter.
//!
//! This module contains all data structures used throughout the application,
//! organized by their primary purpose.

mod batch;
mod config;
mod score;
mod site;

// Re-export all public types
pub use batch::{BatchMeta, ExportBatch, GAME};
pub use config::{
    ClientConfig, Config, DetailConfig, ExportConfig, FieldLocator, KamaitachiConfig, ListingConfig,
    Messages, RecordPolicy,
};
pub use score::{Difficulty, Lamp, MatchType, ScoreRecord};
pub use site::{ExportRequest, GameVersion, PageHint, PlayType, SiteConfig};

/// A scored chart found on a listing page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScoreCellRef {
    /// Table row index, the header row is 0
    pub row: usize,
    /// Table column index, the song label column is 0
    pub column: usize,
    /// Detail page link exactly as found in the cell
    pub href: String,
}

/// What a listing page yielded.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListingPage {
    /// Song rows in the table, scored or not
    pub song_rows: usize,
    /// Scored charts in row-major order
    pub refs: Vec<ScoreCellRef>,
}

impl ListingPage {
    /// A page without song rows marks the end of the listing.
    pub fn is_end(&self) -> bool {
        self.song_rows == 0
    }
}
