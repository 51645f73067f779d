// src/services/listing.rs

//! Listing page row extraction.
//!
//! Walks the score table of a play data listing page and returns the detail
//! link of every chart that has a recorded score, in row-major order.

use scraper::{Html, Selector};

use crate::error::{AppError, Result};
use crate::models::{ListingConfig, ListingPage, ScoreCellRef};
use crate::services::table::{Table, cell_text};

/// Extracts scored chart links from listing pages.
pub struct ListingExtractor {
    table_id: String,
    placeholder: String,
    marker: Selector,
    anchor: Selector,
}

impl ListingExtractor {
    /// Create an extractor for the configured table layout.
    pub fn new(config: &ListingConfig) -> Result<Self> {
        Ok(Self {
            table_id: config.table_id.clone(),
            placeholder: config.placeholder.clone(),
            marker: parse_selector(&config.marker_selector)?,
            anchor: parse_selector("a[href]")?,
        })
    }

    /// Extract the scored charts of one listing page.
    ///
    /// A page whose table has only the header row yields an empty
    /// `ListingPage`. A page without the table at all is an error.
    pub fn extract(&self, document: &Html) -> Result<ListingPage> {
        let table = Table::find(document, &self.table_id).ok_or_else(|| {
            AppError::extract("listing", format!("table #{} not found", self.table_id))
        })?;

        let mut page = ListingPage {
            song_rows: table.row_count().saturating_sub(1),
            refs: Vec::new(),
        };

        for (row_idx, row) in table.rows().iter().enumerate().skip(1) {
            for (col_idx, cell) in row.iter().enumerate().skip(1) {
                let Some(marker) = cell.select(&self.marker).next() else {
                    log::debug!("No score marker at row {row_idx}, column {col_idx}");
                    continue;
                };
                if cell_text(marker) == self.placeholder {
                    continue;
                }

                let href = cell
                    .select(&self.anchor)
                    .next()
                    .and_then(|a| a.value().attr("href"))
                    .ok_or_else(|| {
                        AppError::extract(
                            "listing",
                            format!("scored cell at row {row_idx}, column {col_idx} has no link"),
                        )
                    })?;

                page.refs.push(ScoreCellRef {
                    row: row_idx,
                    column: col_idx,
                    href: href.to_string(),
                });
            }
        }

        Ok(page)
    }
}

fn parse_selector(s: &str) -> Result<Selector> {
    Selector::parse(s).map_err(|e| AppError::selector(s, format!("{e:?}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn extractor() -> ListingExtractor {
        ListingExtractor::new(&ListingConfig::default()).unwrap()
    }

    fn cell(diff: u8, score: &str) -> String {
        format!(
            r#"<td><a href="/game/ddr/ddra3/p/playdata/music_detail.html?index=song&amp;diff={diff}"><div class="data_score">{score}</div></a></td>"#
        )
    }

    #[test]
    fn test_parse_selector_invalid() {
        assert!(parse_selector("[[invalid").is_err());
    }

    #[test]
    fn test_placeholder_cells_are_skipped() {
        let markup = format!(
            r#"<table id="data_tbl">
                <tr><th>MUSIC</th><th>BEGINNER</th><th>BASIC</th><th>DIFFICULT</th></tr>
                <tr><td>Song A</td>{}{}{}</tr>
            </table>"#,
            cell(0, "-"),
            cell(1, "812340"),
            cell(2, "-"),
        );
        let page = extractor().extract(&Html::parse_document(&markup)).unwrap();

        assert_eq!(page.song_rows, 1);
        assert_eq!(page.refs.len(), 1);
        assert_eq!(page.refs[0].row, 1);
        assert_eq!(page.refs[0].column, 2);
        assert_eq!(
            page.refs[0].href,
            "/game/ddr/ddra3/p/playdata/music_detail.html?index=song&diff=1"
        );
    }

    #[test]
    fn test_row_major_order() {
        let markup = format!(
            r#"<table id="data_tbl">
                <tr><th>MUSIC</th><th>BASIC</th><th>EXPERT</th></tr>
                <tr><td>Song A</td>{}{}</tr>
                <tr><td>Song B</td>{}{}</tr>
            </table>"#,
            cell(1, "100"),
            cell(3, "200"),
            cell(1, "300"),
            cell(3, "-"),
        );
        let page = extractor().extract(&Html::parse_document(&markup)).unwrap();

        let positions: Vec<_> = page.refs.iter().map(|r| (r.row, r.column)).collect();
        assert_eq!(positions, vec![(1, 1), (1, 2), (2, 1)]);
        assert_eq!(page.song_rows, 2);
    }

    #[test]
    fn test_cell_without_marker_is_skipped() {
        let markup = format!(
            r#"<table id="data_tbl">
                <tr><th>MUSIC</th><th>BEGINNER</th><th>BASIC</th><th>DIFFICULT</th></tr>
                <tr><td>Song A</td><td></td><td><a href="/x?diff=1">NO PLAY</a></td>{}</tr>
            </table>"#,
            cell(2, "654321"),
        );
        let page = extractor().extract(&Html::parse_document(&markup)).unwrap();

        assert_eq!(page.refs.len(), 1);
        assert_eq!((page.refs[0].row, page.refs[0].column), (1, 3));
        assert!(page.refs[0].href.ends_with("diff=2"));
    }

    #[test]
    fn test_header_only_table_is_end() {
        let markup = r#"<table id="data_tbl"><tr><th>MUSIC</th><th>BASIC</th></tr></table>"#;
        let page = extractor().extract(&Html::parse_document(markup)).unwrap();
        assert!(page.is_end());
        assert!(page.refs.is_empty());
    }

    #[test]
    fn test_all_placeholder_page_is_not_end() {
        let markup = format!(
            r#"<table id="data_tbl"><tr><th>MUSIC</th><th>BASIC</th></tr><tr><td>Song</td>{}</tr></table>"#,
            cell(1, "-")
        );
        let page = extractor().extract(&Html::parse_document(&markup)).unwrap();
        assert!(!page.is_end());
        assert!(page.refs.is_empty());
    }

    #[test]
    fn test_missing_table_is_error() {
        let markup = "<html><body><p>Please log in</p></body></html>";
        let result = extractor().extract(&Html::parse_document(markup));
        assert!(matches!(result, Err(AppError::Extract { .. })));
    }

    #[test]
    fn test_scored_cell_without_link_is_error() {
        let markup = r#"<table id="data_tbl">
            <tr><th>MUSIC</th><th>BASIC</th></tr>
            <tr><td>Song</td><td><div class="data_score">512000</div></td></tr>
        </table>"#;
        let result = extractor().extract(&Html::parse_document(markup));
        assert!(matches!(result, Err(AppError::Extract { .. })));
    }
}
