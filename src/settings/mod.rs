//! Persisted user preferences
//!
//! Stored as `settings.json` next to the card collection.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::dictionary::DEFAULT_DICTIONARY_URL;
use crate::flashcards::listing::DEFAULT_PAGE_SIZE;

#[derive(Error, Debug)]
pub enum SettingsError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Data directory not found")]
    DataDirNotFound,
}

pub type Result<T> = std::result::Result<T, SettingsError>;

/// Get the default data directory
pub fn default_data_dir() -> Result<PathBuf> {
    dirs::data_local_dir()
        .map(|p| p.join("wordcards"))
        .ok_or(SettingsError::DataDirNotFound)
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    /// Last chosen review session size
    #[serde(skip_serializing_if = "Option::is_none")]
    pub flashcard_count: Option<usize>,
    /// Day the card schedule was last rolled forward
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_days_update: Option<NaiveDate>,
    /// Rows per page in the card list
    #[serde(default = "default_page_size")]
    pub page_size: usize,
    /// Base URL of the online dictionary
    #[serde(default = "default_dictionary_url")]
    pub dictionary_url: String,
    /// Word queued for the next lookup
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pending_word: Option<String>,
}

fn default_page_size() -> usize {
    DEFAULT_PAGE_SIZE
}

fn default_dictionary_url() -> String {
    DEFAULT_DICTIONARY_URL.to_string()
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            flashcard_count: None,
            last_days_update: None,
            page_size: default_page_size(),
            dictionary_url: default_dictionary_url(),
            pending_word: None,
        }
    }
}

impl Settings {
    /// Session size limit, ignoring a stored zero
    pub fn count_limit(&self) -> Option<usize> {
        self.flashcard_count.filter(|&n| n > 0)
    }

    /// Queue a word for the next lookup
    pub fn queue_word(&mut self, word: &str) {
        let word = word.trim();
        self.pending_word = (!word.is_empty()).then(|| word.to_string());
    }

    /// Take the queued word, so it is looked up only once
    pub fn take_pending_word(&mut self) -> Option<String> {
        self.pending_word.take()
    }
}

/// Loads and saves `settings.json`
pub struct SettingsStorage {
    path: PathBuf,
}

impl SettingsStorage {
    pub fn new(data_dir: &Path) -> Self {
        Self {
            path: data_dir.join("settings.json"),
        }
    }

    /// Load settings, falling back to defaults when the file is missing
    pub fn load(&self) -> Result<Settings> {
        if !self.path.exists() {
            return Ok(Settings::default());
        }

        let content = fs::read_to_string(&self.path)?;
        let settings: Settings = serde_json::from_str(&content)?;
        Ok(settings)
    }

    pub fn save(&self, settings: &Settings) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&self.path, serde_json::to_string_pretty(settings)?)?;
        Ok(())
    }

    /// Load, change and save in one step
    pub fn update<F>(&self, change: F) -> Result<Settings>
    where
        F: FnOnce(&mut Settings),
    {
        let mut settings = self.load()?;
        change(&mut settings);
        self.save(&settings)?;
        Ok(settings)
    }
}
