//! Online dictionary lookup
//!
//! Looks a word up on the dictionary site, splits the result page into
//! entries and turns chosen entries into flashcards.

mod client;
pub mod keyboard;
pub mod parser;

use serde::{Deserialize, Serialize};

use crate::flashcards::models::Card;
use crate::flashcards::storage::{insert_new, CardStore, Result as StorageResult};

pub use crate::flashcards::storage::SaveOutcome;
pub use client::{DictionaryClient, DictionaryError};

pub const DEFAULT_DICTIONARY_URL: &str = "https://igi.ysn.ru/btsja";

/// One article of a dictionary result page
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DictionaryEntry {
    /// Raw inner HTML of the article
    pub html: String,
    /// Plain text of the article, used as the card back
    pub text: String,
    /// Word the article defines, used as the card front
    pub headword: String,
    /// Whether a card for the headword is already saved
    #[serde(default)]
    pub saved: bool,
}

impl DictionaryEntry {
    pub fn to_card(&self) -> Card {
        Card::new(self.headword.trim(), self.text.trim())
    }
}

/// Entries found for a query
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LookupResult {
    /// Lowercased word that was looked up
    pub query: String,
    pub entries: Vec<DictionaryEntry>,
}

impl LookupResult {
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Flag entries whose headword already has a card
    pub async fn mark_saved<S>(&mut self, store: &S) -> StorageResult<()>
    where
        S: CardStore + ?Sized,
    {
        for entry in &mut self.entries {
            entry.saved = store.contains(entry.headword.trim()).await?;
        }
        Ok(())
    }
}

/// Save an entry as a new card, due immediately
pub async fn save_entry<S>(store: &S, entry: &DictionaryEntry) -> StorageResult<SaveOutcome>
where
    S: CardStore + ?Sized,
{
    let outcome = insert_new(store, entry.to_card()).await?;
    if let SaveOutcome::Saved(card) = &outcome {
        log::info!("Saved '{}' from the dictionary", card.front);
    }
    Ok(outcome)
}
