// src/services/table.rs

//! Row/cell access to HTML tables.

use scraper::{ElementRef, Html};

use crate::models::FieldLocator;

/// A table flattened into rows of `td`/`th` cells.
#[derive(Debug, Clone)]
pub struct Table<'a> {
    rows: Vec<Vec<ElementRef<'a>>>,
}

impl<'a> Table<'a> {
    /// Find a `<table>` by element id.
    pub fn find(document: &'a Html, id: &str) -> Option<Self> {
        document
            .root_element()
            .descendants()
            .filter_map(ElementRef::wrap)
            .find(|el| el.value().name() == "table" && el.value().id() == Some(id))
            .map(Self::from_element)
    }

    /// Collect the rows that belong to this table, leaving nested tables out.
    pub fn from_element(table: ElementRef<'a>) -> Self {
        let mut rows = Vec::new();
        for child in table.children().filter_map(ElementRef::wrap) {
            match child.value().name() {
                "tr" => rows.push(cells(child)),
                "thead" | "tbody" | "tfoot" => rows.extend(
                    child
                        .children()
                        .filter_map(ElementRef::wrap)
                        .filter(|el| el.value().name() == "tr")
                        .map(cells),
                ),
                _ => {}
            }
        }
        Self { rows }
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn rows(&self) -> &[Vec<ElementRef<'a>>] {
        &self.rows
    }

    pub fn cell(&self, row: usize, column: usize) -> Option<ElementRef<'a>> {
        self.rows.get(row)?.get(column).copied()
    }

    /// The cell right after the first cell whose text equals `label`.
    pub fn labelled(&self, label: &str) -> Option<ElementRef<'a>> {
        self.rows.iter().find_map(|row| {
            row.iter()
                .position(|cell| cell_text(*cell) == label)
                .and_then(|idx| row.get(idx + 1).copied())
        })
    }

    /// Resolve a locator, preferring its label over its position.
    pub fn locate(&self, locator: &FieldLocator) -> Option<ElementRef<'a>> {
        locator
            .label
            .as_deref()
            .and_then(|label| self.labelled(label))
            .or_else(|| self.cell(locator.row, locator.column))
    }
}

fn cells(row: ElementRef<'_>) -> Vec<ElementRef<'_>> {
    row.children()
        .filter_map(ElementRef::wrap)
        .filter(|el| matches!(el.value().name(), "td" | "th"))
        .collect()
}

/// Visible text of a cell with whitespace runs collapsed.
pub fn cell_text(cell: ElementRef<'_>) -> String {
    let raw: String = cell.text().collect();
    raw.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    const MARKUP: &str = r#"
        <table id="outer">
            <tr><th>Rank</th><td> AA </td><th>Score</th><td>950000</td></tr>
            <tr><td>inner<table id="nested"><tr><td>x</td></tr></table></td><td>last</td></tr>
        </table>
    "#;

    #[test]
    fn test_find_by_id() {
        let document = Html::parse_document(MARKUP);
        assert!(Table::find(&document, "outer").is_some());
        assert!(Table::find(&document, "nested").is_some());
        assert!(Table::find(&document, "missing").is_none());
    }

    #[test]
    fn test_rows_exclude_nested_table() {
        let document = Html::parse_document(MARKUP);
        let table = Table::find(&document, "outer").unwrap();
        assert_eq!(table.row_count(), 2);
        assert_eq!(cell_text(table.cell(1, 1).unwrap()), "last");
    }

    #[test]
    fn test_labelled_cell() {
        let document = Html::parse_document(MARKUP);
        let table = Table::find(&document, "outer").unwrap();
        assert_eq!(cell_text(table.labelled("Score").unwrap()), "950000");
        assert!(table.labelled("Combo").is_none());
    }

    #[test]
    fn test_locate_prefers_label() {
        let document = Html::parse_document(MARKUP);
        let table = Table::find(&document, "outer").unwrap();

        let by_label = FieldLocator::new(Some("Rank"), 0, 3);
        assert_eq!(cell_text(table.locate(&by_label).unwrap()), "AA");

        let fallback = FieldLocator::new(Some("Grade"), 0, 3);
        assert_eq!(cell_text(table.locate(&fallback).unwrap()), "950000");

        let out_of_range = FieldLocator::new(None, 5, 0);
        assert!(table.locate(&out_of_range).is_none());
    }
}
