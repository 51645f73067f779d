// src/models/site.rs

//! Game versions, play types, and the per-version site table.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// DDR release whose play data is exported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GameVersion {
    A20,
    A3,
}

impl GameVersion {
    pub fn as_str(&self) -> &'static str {
        match self {
            GameVersion::A20 => "A20",
            GameVersion::A3 => "A3",
        }
    }

    /// Detect the version from the URL of a page on the site.
    pub fn detect(url: &str, sites: &[SiteConfig]) -> Option<Self> {
        sites
            .iter()
            .find(|site| url.contains(&site.path_marker))
            .map(|site| site.version)
    }
}

impl fmt::Display for GameVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for GameVersion {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "A20" => Ok(GameVersion::A20),
            "A3" => Ok(GameVersion::A3),
            other => Err(format!("unknown game version '{other}' (expected A20 or A3)")),
        }
    }
}

/// Single or double play.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PlayType {
    #[serde(rename = "SP")]
    Single,
    #[serde(rename = "DP")]
    Double,
}

impl PlayType {
    pub fn as_str(&self) -> &'static str {
        match self {
            PlayType::Single => "SP",
            PlayType::Double => "DP",
        }
    }
}

impl fmt::Display for PlayType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PlayType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "SP" | "SINGLE" => Ok(PlayType::Single),
            "DP" | "DOUBLE" => Ok(PlayType::Double),
            other => Err(format!("unknown play type '{other}' (expected SP or DP)")),
        }
    }
}

/// What one export run collects.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExportRequest {
    pub game_version: GameVersion,
    pub play_type: PlayType,
}

impl ExportRequest {
    pub fn new(game_version: GameVersion, play_type: PlayType) -> Self {
        Self {
            game_version,
            play_type,
        }
    }
}

impl fmt::Display for ExportRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.game_version, self.play_type)
    }
}

/// Listing page counts of the live site. Zero means unknown.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageHint {
    #[serde(default)]
    pub sp: usize,
    #[serde(default)]
    pub dp: usize,
}

/// Listing locations for one game version.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SiteConfig {
    /// Game version served by this site
    pub version: GameVersion,

    /// Path fragment identifying pages of this version
    pub path_marker: String,

    /// Single play listing URL; the page offset is appended
    pub single_url: String,

    /// Double play listing URL; the page offset is appended
    pub double_url: String,

    /// Pages read per run; an empty page may still end the run earlier
    #[serde(default)]
    pub expected_pages: PageHint,
}

impl SiteConfig {
    /// Listing URL template for a play type.
    pub fn listing_url(&self, play_type: PlayType) -> &str {
        match play_type {
            PlayType::Single => &self.single_url,
            PlayType::Double => &self.double_url,
        }
    }

    /// Expected page count for a play type, if known.
    pub fn expected_pages(&self, play_type: PlayType) -> Option<usize> {
        let count = match play_type {
            PlayType::Single => self.expected_pages.sp,
            PlayType::Double => self.expected_pages.dp,
        };
        (count > 0).then_some(count)
    }
}

pub(crate) fn default_sites() -> Vec<SiteConfig> {
    vec![
        SiteConfig {
            version: GameVersion::A20,
            path_marker: "/ddra20/".to_string(),
            single_url:
                "https://p.eagate.573.jp/game/ddr/ddra20/p/playdata/music_data_single.html?offset="
                    .to_string(),
            double_url:
                "https://p.eagate.573.jp/game/ddr/ddra20/p/playdata/music_data_double.html?offset="
                    .to_string(),
            expected_pages: PageHint { sp: 18, dp: 18 },
        },
        SiteConfig {
            version: GameVersion::A3,
            path_marker: "/ddra3/".to_string(),
            single_url:
                "https://p.eagate.573.jp/game/ddr/ddra3/p/playdata/music_data_single.html?offset="
                    .to_string(),
            double_url:
                "https://p.eagate.573.jp/game/ddr/ddra3/p/playdata/music_data_double.html?offset="
                    .to_string(),
            expected_pages: PageHint { sp: 23, dp: 21 },
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detect_version_from_url() {
        let sites = default_sites();
        assert_eq!(
            GameVersion::detect(
                "https://p.eagate.573.jp/game/ddr/ddra20/p/playdata/index.html",
                &sites
            ),
            Some(GameVersion::A20)
        );
        assert_eq!(
            GameVersion::detect("https://p.eagate.573.jp/game/ddr/ddra3/p/index.html", &sites),
            Some(GameVersion::A3)
        );
        assert_eq!(GameVersion::detect("https://example.com/", &sites), None);
    }

    #[test]
    fn test_parse_play_type() {
        assert_eq!("sp".parse::<PlayType>(), Ok(PlayType::Single));
        assert_eq!("DOUBLE".parse::<PlayType>(), Ok(PlayType::Double));
        assert!("tp".parse::<PlayType>().is_err());
    }

    #[test]
    fn test_parse_game_version() {
        assert_eq!("a3".parse::<GameVersion>(), Ok(GameVersion::A3));
        assert!("world".parse::<GameVersion>().is_err());
    }

    #[test]
    fn test_expected_pages() {
        let sites = default_sites();
        assert_eq!(sites[1].expected_pages(PlayType::Single), Some(23));
        assert_eq!(sites[1].expected_pages(PlayType::Double), Some(21));

        let mut site = sites[0].clone();
        site.expected_pages = PageHint::default();
        assert_eq!(site.expected_pages(PlayType::Single), None);
    }

    #[test]
    fn test_play_type_serializes_short_name() {
        assert_eq!(serde_json::to_string(&PlayType::Double).unwrap(), "\"DP\"");
    }
}
