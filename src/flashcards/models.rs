//! Data models for the flashcard system

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// A flashcard keyed by its front text
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Card {
    /// Insertion sequence assigned by the store on first insert
    #[serde(default)]
    pub id: u64,
    pub front: String,
    pub back: String,
    /// Days remaining before the card is due again
    #[serde(default)]
    pub days_left: i64,
    /// Consecutive successful reviews
    #[serde(default)]
    pub counter: u32,
}

impl Card {
    /// A fresh card, due immediately
    pub fn new(front: impl Into<String>, back: impl Into<String>) -> Self {
        Self {
            id: 0,
            front: front.into(),
            back: back.into(),
            days_left: 0,
            counter: 0,
        }
    }

    pub fn has_front(&self) -> bool {
        !self.front.trim().is_empty()
    }

    /// Check if the card is due for review in smart mode
    pub fn is_due(&self) -> bool {
        self.days_left <= 0
    }
}

/// How a review session picks and orders its cards
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ReviewMode {
    /// Every card, shuffled, without touching the schedule
    Random,
    /// Due cards only, most overdue first, schedule updated on answer
    #[default]
    Smart,
}

impl fmt::Display for ReviewMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Random => write!(f, "random"),
            Self::Smart => write!(f, "smart"),
        }
    }
}

impl FromStr for ReviewMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "random" => Ok(Self::Random),
            "smart" => Ok(Self::Smart),
            other => Err(format!("unknown review mode: {}", other)),
        }
    }
}

/// In-memory snapshot of a card held by a review session
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionEntry {
    pub front: String,
    pub back: String,
    pub days_left: i64,
    pub counter: u32,
}

impl From<&Card> for SessionEntry {
    fn from(card: &Card) -> Self {
        Self {
            front: card.front.clone(),
            back: card.back.clone(),
            days_left: card.days_left,
            counter: card.counter,
        }
    }
}

/// Card as it appears in an export file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportedCard {
    pub front: String,
    pub back: String,
    pub days_left: i64,
    pub counter: u32,
}

impl From<&Card> for ExportedCard {
    fn from(card: &Card) -> Self {
        Self {
            front: card.front.trim().to_string(),
            back: card.back.trim().to_string(),
            days_left: card.days_left,
            counter: card.counter,
        }
    }
}

/// Loosely typed card read from an import file
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportedCard {
    #[serde(default)]
    pub front: Option<String>,
    #[serde(default)]
    pub back: Option<String>,
    #[serde(default)]
    pub days_left: Option<i64>,
    #[serde(default)]
    pub counter: Option<u32>,
}

/// Outcome of an import
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportReport {
    pub imported: usize,
    pub skipped_invalid: usize,
    pub skipped_existing: usize,
}
