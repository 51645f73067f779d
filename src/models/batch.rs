// src/models/batch.rs

//! The exported BATCH-MANUAL document.

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::models::{PlayType, ScoreRecord};

/// Game tag expected by Kamaitachi for DDR imports.
pub const GAME: &str = "ddr";

/// Batch header.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchMeta {
    pub game: String,
    pub playtype: PlayType,
    pub service: String,
}

/// Full export document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportBatch {
    pub meta: BatchMeta,
    pub scores: Vec<ScoreRecord>,
}

impl ExportBatch {
    pub fn new(play_type: PlayType, service: impl Into<String>, scores: Vec<ScoreRecord>) -> Self {
        Self {
            meta: BatchMeta {
                game: GAME.to_string(),
                playtype: play_type,
                service: service.into(),
            },
            scores,
        }
    }

    /// Serialize with two-space indentation.
    pub fn to_json_bytes(&self) -> Result<Vec<u8>> {
        Ok(serde_json::to_vec_pretty(self)?)
    }
}
