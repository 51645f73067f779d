//! Lazy sequence of listing page URLs.
//!
//! Offsets count up from 0 until the caller reports an empty page through
//! `finish`, or until the page limit is reached.

/// One listing page to read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListingUrl {
    pub offset: usize,
    pub url: String,
}

impl ListingUrl {
    /// 1-based page number for display.
    pub fn page_number(&self) -> usize {
        self.offset + 1
    }
}

#[derive(Debug, Clone)]
pub struct PageCursor {
    template: String,
    max_pages: usize,
    next_offset: usize,
    finished: bool,
}

impl PageCursor {
    /// `template` is the listing URL the offset is appended to.
    pub fn new(template: impl Into<String>, max_pages: usize) -> Self {
        Self {
            template: template.into(),
            max_pages,
            next_offset: 0,
            finished: false,
        }
    }

    /// Stop the sequence; the last page yielded was past the end.
    pub fn finish(&mut self) {
        self.finished = true;
    }

    /// Whether the sequence ended on an empty page rather than the cap.
    pub fn reached_end(&self) -> bool {
        self.finished
    }

    pub fn pages_yielded(&self) -> usize {
        self.next_offset
    }
}

impl Iterator for PageCursor {
    type Item = ListingUrl;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished || self.next_offset >= self.max_pages {
            return None;
        }
        let offset = self.next_offset;
        self.next_offset += 1;
        Some(ListingUrl {
            offset,
            url: format!("{}{}", self.template, offset),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TEMPLATE: &str = "https://x.test/music_data_single.html?offset=";

    #[test]
    fn test_offsets_append_to_template() {
        let urls: Vec<_> = PageCursor::new(TEMPLATE, 3).map(|p| p.url).collect();
        assert_eq!(
            urls,
            vec![
                format!("{TEMPLATE}0"),
                format!("{TEMPLATE}1"),
                format!("{TEMPLATE}2"),
            ]
        );
    }

    #[test]
    fn test_finish_stops_sequence() {
        let mut cursor = PageCursor::new(TEMPLATE, 10);
        assert_eq!(cursor.next().map(|p| p.offset), Some(0));
        assert_eq!(cursor.next().map(|p| p.page_number()), Some(2));
        cursor.finish();
        assert!(cursor.next().is_none());
        assert!(cursor.reached_end());
        assert_eq!(cursor.pages_yielded(), 2);
    }

    #[test]
    fn test_cap_is_not_end() {
        let mut cursor = PageCursor::new(TEMPLATE, 1);
        assert!(cursor.next().is_some());
        assert!(cursor.next().is_none());
        assert!(!cursor.reached_end());
    }
}
