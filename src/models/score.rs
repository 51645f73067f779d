// src/models/score.rs

//! Normalized score records in Kamaitachi BATCH-MANUAL form.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Clear-status classification of a play.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Lamp {
    #[serde(rename = "FAILED")]
    Failed,
    #[serde(rename = "CLEAR")]
    Clear,
    #[serde(rename = "FULL COMBO")]
    FullCombo,
    #[serde(rename = "GREAT FULL COMBO")]
    GreatFullCombo,
    #[serde(rename = "PERFECT FULL COMBO")]
    PerfectFullCombo,
    #[serde(rename = "MARVELOUS FULL COMBO")]
    MarvelousFullCombo,
}

impl Lamp {
    pub fn as_str(&self) -> &'static str {
        match self {
            Lamp::Failed => "FAILED",
            Lamp::Clear => "CLEAR",
            Lamp::FullCombo => "FULL COMBO",
            Lamp::GreatFullCombo => "GREAT FULL COMBO",
            Lamp::PerfectFullCombo => "PERFECT FULL COMBO",
            Lamp::MarvelousFullCombo => "MARVELOUS FULL COMBO",
        }
    }
}

impl fmt::Display for Lamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Chart difficulty tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Difficulty {
    Beginner,
    Basic,
    Difficult,
    Expert,
    Challenge,
}

impl Difficulty {
    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Beginner => "BEGINNER",
            Difficulty::Basic => "BASIC",
            Difficulty::Difficult => "DIFFICULT",
            Difficulty::Expert => "EXPERT",
            Difficulty::Challenge => "CHALLENGE",
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How Kamaitachi resolves `identifier` to a song.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum MatchType {
    #[default]
    #[serde(rename = "songTitle")]
    SongTitle,
}

/// A single exported score.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreRecord {
    /// Money score
    pub score: u32,

    /// Clear status
    pub lamp: Lamp,

    /// Always `songTitle`
    pub match_type: MatchType,

    /// Normalized song title
    pub identifier: String,

    /// Chart difficulty
    pub difficulty: Difficulty,

    /// Epoch milliseconds of the play
    pub time_achieved: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_score_record_wire_format() {
        let record = ScoreRecord {
            score: 987_650,
            lamp: Lamp::GreatFullCombo,
            match_type: MatchType::SongTitle,
            identifier: "PARANOiA".to_string(),
            difficulty: Difficulty::Expert,
            time_achieved: 1_672_542_000_000,
        };

        let value = serde_json::to_value(&record).unwrap();
        assert_eq!(
            value,
            serde_json::json!({
                "score": 987650,
                "lamp": "GREAT FULL COMBO",
                "matchType": "songTitle",
                "identifier": "PARANOiA",
                "difficulty": "EXPERT",
                "timeAchieved": 1672542000000i64,
            })
        );
    }

    #[test]
    fn test_lamp_display_matches_serde() {
        for lamp in [
            Lamp::Failed,
            Lamp::Clear,
            Lamp::FullCombo,
            Lamp::GreatFullCombo,
            Lamp::PerfectFullCombo,
            Lamp::MarvelousFullCombo,
        ] {
            let json = serde_json::to_string(&lamp).unwrap();
            assert_eq!(json, format!("\"{}\"", lamp));
        }
    }
}
