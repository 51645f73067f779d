//! Utility functions and helpers.

pub mod http;
pub mod log;

use url::Url;

use crate::error::Result;

/// Resolve a potentially relative URL against a base URL.
pub fn resolve_url(base: &Url, href: &str) -> Result<String> {
    Ok(base.join(href)?.to_string())
}

/// Look up a query parameter value in a URL.
pub fn query_param(url: &str, key: &str) -> Option<String> {
    Url::parse(url)
        .ok()?
        .query_pairs()
        .find(|(k, _)| k == key)
        .map(|(_, v)| v.into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_url() {
        let base = Url::parse("https://p.eagate.573.jp/").unwrap();
        assert_eq!(
            resolve_url(&base, "/game/ddr/ddra3/p/playdata/music_detail.html?index=x&diff=3")
                .unwrap(),
            "https://p.eagate.573.jp/game/ddr/ddra3/p/playdata/music_detail.html?index=x&diff=3"
        );
        assert_eq!(
            resolve_url(&base, "game/ddr/x.html").unwrap(),
            "https://p.eagate.573.jp/game/ddr/x.html"
        );
        assert_eq!(
            resolve_url(&base, "https://other.com/x").unwrap(),
            "https://other.com/x"
        );
    }

    #[test]
    fn test_query_param() {
        let url = "https://p.eagate.573.jp/music_detail.html?index=abc&diff=7";
        assert_eq!(query_param(url, "diff"), Some("7".to_string()));
        assert_eq!(query_param(url, "index"), Some("abc".to_string()));
        assert_eq!(query_param(url, "offset"), None);
    }
}
