// src/services/detail.rs

//! Detail page normalization.
//!
//! Turns one score detail page into a `ScoreRecord`: title cleanup, lamp
//! and difficulty lookups, and JST timestamp conversion.

use std::sync::LazyLock;

use chrono::{FixedOffset, NaiveDateTime};
use regex::Regex;
use scraper::Html;

use crate::error::{AppError, Result};
use crate::models::{DetailConfig, Difficulty, FieldLocator, Lamp, MatchType, ScoreRecord};
use crate::services::table::{Table, cell_text};
use crate::utils::query_param;

/// Full-combo descriptor shown when the chart was not full-comboed.
pub const NO_FULL_COMBO: &str = "---";

/// Lowest grade; a non-full-combo play with it is a fail.
pub const FAILING_GRADE: &str = "E";

/// Full-combo tiers, lowest quality first.
const FULL_COMBO_LAMPS: [(&str, Lamp); 4] = [
    ("グッドフルコンボ", Lamp::FullCombo),
    ("グレートフルコンボ", Lamp::GreatFullCombo),
    ("パーフェクトフルコンボ", Lamp::PerfectFullCombo),
    ("マーベラスフルコンボ", Lamp::MarvelousFullCombo),
];

/// Single play charts occupy indices 0-4.
const SINGLE_DIFFICULTIES: [Difficulty; 5] = [
    Difficulty::Beginner,
    Difficulty::Basic,
    Difficulty::Difficult,
    Difficulty::Expert,
    Difficulty::Challenge,
];

/// Double play charts start here and have no beginner chart.
const DOUBLE_START: u8 = 5;

const DOUBLE_DIFFICULTIES: [Difficulty; 4] = [
    Difficulty::Basic,
    Difficulty::Difficult,
    Difficulty::Expert,
    Difficulty::Challenge,
];

/// Query parameter of the detail URL holding the difficulty index.
const DIFFICULTY_PARAM: &str = "diff";

/// Offset of the timestamps shown on the site (JST).
const JST_OFFSET_SECS: i32 = 9 * 3600;

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

static LINE_BREAK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)<br\s*/?>").expect("line break pattern is valid"));

/// Clean a raw title cell.
///
/// Keeps the part before the first line break, decodes `&amp;` and strips
/// trailing whitespace only. Some titles on the site carry a trailing space
/// that the song database does not.
pub fn normalize_title(raw_html: &str) -> String {
    let first_line = LINE_BREAK.split(raw_html).next().unwrap_or_default();
    first_line.replace("&amp;", "&").trim_end().to_string()
}

/// Determine the lamp from the grade and the full-combo descriptor.
pub fn compute_lamp(grade: &str, full_combo: &str) -> Result<Lamp> {
    if full_combo == NO_FULL_COMBO {
        return Ok(if grade == FAILING_GRADE {
            Lamp::Failed
        } else {
            Lamp::Clear
        });
    }

    FULL_COMBO_LAMPS
        .iter()
        .find(|(descriptor, _)| *descriptor == full_combo)
        .map(|(_, lamp)| *lamp)
        .ok_or_else(|| AppError::UnknownLamp(full_combo.to_string()))
}

/// Map a flat difficulty index to its difficulty.
///
/// 0-4 are the single play charts, 5-8 the double play charts.
pub fn difficulty_from_index(index: u8) -> Result<Difficulty> {
    let found = if index < DOUBLE_START {
        SINGLE_DIFFICULTIES.get(index as usize)
    } else {
        DOUBLE_DIFFICULTIES.get((index - DOUBLE_START) as usize)
    };
    found
        .copied()
        .ok_or_else(|| AppError::UnknownDifficulty(index.to_string()))
}

/// Read the difficulty index embedded in a detail URL.
pub fn difficulty_from_url(url: &str) -> Result<Difficulty> {
    let raw = query_param(url, DIFFICULTY_PARAM).unwrap_or_default();
    let index: u8 = raw
        .trim()
        .parse()
        .map_err(|_| AppError::UnknownDifficulty(raw.clone()))?;
    difficulty_from_index(index)
}

/// Convert a `YYYY-MM-DD HH:MM:SS` JST timestamp to epoch milliseconds.
pub fn jst_to_unix_millis(timestamp: &str) -> Result<i64> {
    let naive = NaiveDateTime::parse_from_str(timestamp.trim(), TIMESTAMP_FORMAT)
        .map_err(|_| AppError::field("timestamp", timestamp))?;
    let jst = FixedOffset::east_opt(JST_OFFSET_SECS)
        .ok_or_else(|| AppError::field("timestamp offset", JST_OFFSET_SECS.to_string()))?;
    let local = naive
        .and_local_timezone(jst)
        .single()
        .ok_or_else(|| AppError::field("timestamp", timestamp))?;
    Ok(local.timestamp_millis())
}

/// Parse a score cell. Thousands separators are tolerated.
pub fn parse_score(text: &str) -> Result<u32> {
    text.trim()
        .replace(',', "")
        .parse()
        .map_err(|_| AppError::field("score", text))
}

/// Builds score records from detail pages.
pub struct ScoreNormalizer {
    layout: DetailConfig,
}

impl ScoreNormalizer {
    pub fn new(layout: DetailConfig) -> Self {
        Self { layout }
    }

    /// Parse one detail page. `url` is the address the page was fetched from.
    pub fn parse(&self, document: &Html, url: &str) -> Result<ScoreRecord> {
        let info = self.table(document, &self.layout.info_table_id)?;
        let details = self.table(document, &self.layout.detail_table_id)?;

        let title_cell = locate(&info, &self.layout.title, "title")?;
        let identifier = normalize_title(&title_cell.inner_html());

        let grade = cell_text(locate(&details, &self.layout.grade, "grade")?);
        let full_combo = cell_text(locate(&details, &self.layout.full_combo, "full combo")?);
        let score = cell_text(locate(&details, &self.layout.score, "score")?);
        let timestamp = cell_text(locate(&details, &self.layout.timestamp, "timestamp")?);

        Ok(ScoreRecord {
            score: parse_score(&score)?,
            lamp: compute_lamp(&grade, &full_combo)?,
            match_type: MatchType::SongTitle,
            identifier,
            difficulty: difficulty_from_url(url)?,
            time_achieved: jst_to_unix_millis(&timestamp)?,
        })
    }

    fn table<'a>(&self, document: &'a Html, id: &str) -> Result<Table<'a>> {
        Table::find(document, id)
            .ok_or_else(|| AppError::extract("detail", format!("table #{id} not found")))
    }
}

fn locate<'a>(
    table: &Table<'a>,
    locator: &FieldLocator,
    name: &str,
) -> Result<scraper::ElementRef<'a>> {
    table.locate(locator).ok_or_else(|| {
        AppError::extract(
            "detail",
            format!(
                "{name} cell not found (row {}, column {})",
                locator.row, locator.column
            ),
        )
    })
}
