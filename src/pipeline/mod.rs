//! Export pipeline.
//!
//! - `Exporter`: drives one export run from listing pages to the sink
//! - `PageCursor`: lazy sequence of listing page URLs
//! - `RunGuard`: keeps triggers from running at the same time

pub mod export;
pub mod guard;
pub mod pages;
pub mod progress;

pub use export::{ExportSummary, Exporter};
pub use guard::{RunGuard, RunToken};
pub use pages::{ListingUrl, PageCursor};
pub use progress::{ConsoleReporter, ProgressReporter, RunState};
