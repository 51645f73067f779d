//! Service layer for the exporter.
//!
//! This module contains the business logic for:
//! - Page retrieval (`PageFetcher`, `HttpFetcher`)
//! - Listing page row extraction (`ListingExtractor`)
//! - Detail page normalization (`ScoreNormalizer`)

pub mod detail;
mod fetcher;
mod listing;
pub mod table;

pub use detail::ScoreNormalizer;
pub use fetcher::{HttpFetcher, PageFetcher};
pub use listing::ListingExtractor;

#[cfg(test)]
pub(crate) use fetcher::fixture;
