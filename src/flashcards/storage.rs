//! Storage operations for flashcards
//!
//! Cards live in a single JSON array inside the data directory:
//! ```text
//! {data-dir}/
//! └── cards.json   # Array of all cards, in insertion order
//! ```
//!
//! Cards are keyed by their `front` text. `put` is an upsert: an existing
//! card keeps its insertion id, a new one gets the next id.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use thiserror::Error;
use tokio::fs;
use tokio::sync::Mutex;

use super::models::Card;

#[derive(Error, Debug)]
pub enum FlashcardStorageError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Card not found: {0}")]
    CardNotFound(String),

    #[error("Card has an empty front")]
    InvalidCard,

    #[error("Invalid format: {0}")]
    InvalidFormat(String),
}

pub type Result<T> = std::result::Result<T, FlashcardStorageError>;

/// Key/value collection of cards keyed by front text
#[async_trait]
pub trait CardStore: Send + Sync {
    /// All cards in insertion order
    async fn get_all(&self) -> Result<Vec<Card>>;

    /// Look up a card by its front
    async fn get(&self, front: &str) -> Result<Option<Card>>;

    /// Insert or replace the card with the same front
    async fn put(&self, card: Card) -> Result<Card>;

    /// Upsert a batch of cards in one write
    ///
    /// Either every card is saved or, on error, none is.
    async fn put_all(&self, cards: Vec<Card>) -> Result<Vec<Card>>;

    /// Remove a card; removing a missing card is not an error
    async fn delete(&self, front: &str) -> Result<()>;

    /// Remove every card
    async fn clear(&self) -> Result<()>;

    /// Check whether a card with this front is saved
    async fn contains(&self, front: &str) -> Result<bool> {
        Ok(self.get(front).await?.is_some())
    }
}

/// Result of saving a card that must not replace an existing one
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaveOutcome {
    Saved(Card),
    /// A card with this front exists and was left as it is
    AlreadySaved(Card),
}

/// Save a card unless one with the same front is already stored
pub async fn insert_new<S>(store: &S, card: Card) -> Result<SaveOutcome>
where
    S: CardStore + ?Sized,
{
    if let Some(existing) = store.get(&card.front).await? {
        return Ok(SaveOutcome::AlreadySaved(existing));
    }
    Ok(SaveOutcome::Saved(store.put(card).await?))
}

/// Upsert into an in-memory card list
fn upsert(cards: &mut Vec<Card>, mut card: Card) -> Result<Card> {
    if !card.has_front() {
        return Err(FlashcardStorageError::InvalidCard);
    }

    match cards.iter().position(|c| c.front == card.front) {
        Some(pos) => {
            card.id = cards[pos].id;
            cards[pos] = card.clone();
        }
        None => {
            card.id = cards.iter().map(|c| c.id).max().unwrap_or(0) + 1;
            cards.push(card.clone());
        }
    }

    Ok(card)
}

/// Upsert a batch into a copy of `cards`, leaving `cards` alone on error
fn upsert_all(cards: &[Card], batch: Vec<Card>) -> Result<(Vec<Card>, Vec<Card>)> {
    let mut updated = cards.to_vec();
    let saved = batch
        .into_iter()
        .map(|card| upsert(&mut updated, card))
        .collect::<Result<Vec<_>>>()?;
    Ok((updated, saved))
}

/// Card store backed by a JSON file
pub struct FlashcardStorage {
    /// Path of the cards.json file
    cards_path: PathBuf,
    /// Serializes read-modify-write cycles on the file
    write_lock: Mutex<()>,
}

impl FlashcardStorage {
    pub fn new(data_dir: &Path) -> Self {
        Self {
            cards_path: data_dir.join("cards.json"),
            write_lock: Mutex::new(()),
        }
    }

    pub fn cards_path(&self) -> &Path {
        &self.cards_path
    }

    /// Initialize storage, creating an empty cards.json if missing
    pub async fn init(&self) -> Result<()> {
        if let Some(parent) = self.cards_path.parent() {
            fs::create_dir_all(parent).await?;
        }

        if !self.cards_path.exists() {
            let empty: Vec<Card> = Vec::new();
            self.write_cards(&empty).await?;
        }

        Ok(())
    }

    async fn read_cards(&self) -> Result<Vec<Card>> {
        if !self.cards_path.exists() {
            return Ok(Vec::new());
        }

        let content = fs::read_to_string(&self.cards_path).await?;
        if content.trim().is_empty() {
            return Ok(Vec::new());
        }

        let cards: Vec<Card> = serde_json::from_str(&content)?;
        Ok(cards)
    }

    async fn write_cards(&self, cards: &[Card]) -> Result<()> {
        if let Some(parent) = self.cards_path.parent() {
            fs::create_dir_all(parent).await?;
        }

        // Readers never see a partially written file
        let tmp_path = self.cards_path.with_extension("json.tmp");
        fs::write(&tmp_path, serde_json::to_string_pretty(cards)?).await?;
        fs::rename(&tmp_path, &self.cards_path).await?;
        Ok(())
    }
}

#[async_trait]
impl CardStore for FlashcardStorage {
    async fn get_all(&self) -> Result<Vec<Card>> {
        let _guard = self.write_lock.lock().await;
        self.read_cards().await
    }

    async fn get(&self, front: &str) -> Result<Option<Card>> {
        let _guard = self.write_lock.lock().await;
        let cards = self.read_cards().await?;
        Ok(cards.into_iter().find(|c| c.front == front))
    }

    async fn put(&self, card: Card) -> Result<Card> {
        let _guard = self.write_lock.lock().await;
        let mut cards = self.read_cards().await?;
        let saved = upsert(&mut cards, card)?;
        self.write_cards(&cards).await?;
        log::debug!("Saved card '{}' (id {})", saved.front, saved.id);
        Ok(saved)
    }

    async fn put_all(&self, batch: Vec<Card>) -> Result<Vec<Card>> {
        let _guard = self.write_lock.lock().await;
        let cards = self.read_cards().await?;
        let (updated, saved) = upsert_all(&cards, batch)?;
        self.write_cards(&updated).await?;
        log::debug!("Saved {} cards", saved.len());
        Ok(saved)
    }

    async fn delete(&self, front: &str) -> Result<()> {
        let _guard = self.write_lock.lock().await;
        let mut cards = self.read_cards().await?;
        let before = cards.len();
        cards.retain(|c| c.front != front);
        if cards.len() != before {
            self.write_cards(&cards).await?;
            log::info!("Deleted card '{}'", front);
        }
        Ok(())
    }

    async fn clear(&self) -> Result<()> {
        let _guard = self.write_lock.lock().await;
        self.write_cards(&[]).await?;
        log::info!("Cleared all cards");
        Ok(())
    }
}

/// Card store kept entirely in memory
#[derive(Default)]
pub struct MemoryCardStore {
    cards: Mutex<Vec<Card>>,
}

impl MemoryCardStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a store holding the given cards, assigning ids in order
    pub fn with_cards(cards: impl IntoIterator<Item = Card>) -> Self {
        let mut stored = Vec::new();
        for card in cards {
            // Blank fronts are dropped like any other rejected put
            let _ = upsert(&mut stored, card);
        }
        Self {
            cards: Mutex::new(stored),
        }
    }
}

#[async_trait]
impl CardStore for MemoryCardStore {
    async fn get_all(&self) -> Result<Vec<Card>> {
        Ok(self.cards.lock().await.clone())
    }

    async fn get(&self, front: &str) -> Result<Option<Card>> {
        let cards = self.cards.lock().await;
        Ok(cards.iter().find(|c| c.front == front).cloned())
    }

    async fn put(&self, card: Card) -> Result<Card> {
        let mut cards = self.cards.lock().await;
        upsert(&mut cards, card)
    }

    async fn put_all(&self, batch: Vec<Card>) -> Result<Vec<Card>> {
        let mut cards = self.cards.lock().await;
        let (updated, saved) = upsert_all(&cards, batch)?;
        *cards = updated;
        Ok(saved)
    }

    async fn delete(&self, front: &str) -> Result<()> {
        self.cards.lock().await.retain(|c| c.front != front);
        Ok(())
    }

    async fn clear(&self) -> Result<()> {
        self.cards.lock().await.clear();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn create_test_storage() -> (FlashcardStorage, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let storage = FlashcardStorage::new(temp_dir.path());
        (storage, temp_dir)
    }

    #[tokio::test]
    async fn test_init_creates_empty_collection() {
        let (storage, _temp) = create_test_storage();
        storage.init().await.unwrap();

        assert!(storage.cards_path().exists());
        assert!(storage.get_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_put_and_get() {
        let (storage, _temp) = create_test_storage();

        let saved = storage.put(Card::new("ile", "hand")).await.unwrap();
        assert_eq!(saved.id, 1);

        let card = storage.get("ile").await.unwrap().unwrap();
        assert_eq!(card.back, "hand");
        assert!(storage.get("ich").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_put_is_upsert_keyed_by_front() {
        let (storage, _temp) = create_test_storage();

        storage.put(Card::new("ile", "hand")).await.unwrap();
        storage.put(Card::new("ich", "inside")).await.unwrap();

        let mut updated = Card::new("ile", "arm");
        updated.counter = 2;
        let saved = storage.put(updated).await.unwrap();
        assert_eq!(saved.id, 1);

        let cards = storage.get_all().await.unwrap();
        assert_eq!(cards.len(), 2);
        assert_eq!(cards[0].front, "ile");
        assert_eq!(cards[0].back, "arm");
        assert_eq!(cards[0].counter, 2);
        assert_eq!(cards[1].id, 2);
    }

    #[tokio::test]
    async fn test_put_rejects_blank_front() {
        let (storage, _temp) = create_test_storage();

        let result = storage.put(Card::new("  ", "nothing")).await;
        assert!(matches!(result, Err(FlashcardStorageError::InvalidCard)));
        assert!(storage.get_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_delete_and_clear() {
        let (storage, _temp) = create_test_storage();

        storage.put(Card::new("ile", "hand")).await.unwrap();
        storage.put(Card::new("ich", "inside")).await.unwrap();

        storage.delete("ile").await.unwrap();
        storage.delete("missing").await.unwrap();
        assert_eq!(storage.get_all().await.unwrap().len(), 1);

        storage.clear().await.unwrap();
        assert!(storage.get_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_ids_keep_growing_after_delete() {
        let (storage, _temp) = create_test_storage();

        storage.put(Card::new("a", "1")).await.unwrap();
        storage.put(Card::new("b", "2")).await.unwrap();
        storage.delete("a").await.unwrap();
        let saved = storage.put(Card::new("c", "3")).await.unwrap();
        assert_eq!(saved.id, 3);
    }

    #[tokio::test]
    async fn test_put_all_writes_batch() {
        let (storage, _temp) = create_test_storage();
        storage.put(Card::new("ile", "hand")).await.unwrap();

        let mut changed = Card::new("ile", "arm");
        changed.days_left = 3;
        let saved = storage
            .put_all(vec![changed, Card::new("ich", "inside")])
            .await
            .unwrap();

        assert_eq!(saved.iter().map(|c| c.id).collect::<Vec<_>>(), vec![1, 2]);
        let cards = storage.get_all().await.unwrap();
        assert_eq!(cards.len(), 2);
        assert_eq!((cards[0].back.as_str(), cards[0].days_left), ("arm", 3));
    }

    #[tokio::test]
    async fn test_put_all_is_all_or_nothing() {
        let (storage, _temp) = create_test_storage();
        storage.put(Card::new("ile", "hand")).await.unwrap();

        let result = storage
            .put_all(vec![Card::new("ile", "arm"), Card::new(" ", "blank"), Card::new("ich", "inside")])
            .await;
        assert!(matches!(result, Err(FlashcardStorageError::InvalidCard)));

        let cards = storage.get_all().await.unwrap();
        assert_eq!(cards.len(), 1);
        assert_eq!(cards[0].back, "hand");

        let memory = MemoryCardStore::with_cards(vec![Card::new("ile", "hand")]);
        assert!(memory
            .put_all(vec![Card::new("ich", "inside"), Card::new("", "blank")])
            .await
            .is_err());
        assert!(!memory.contains("ich").await.unwrap());
    }

    #[tokio::test]
    async fn test_insert_new_never_replaces() {
        let (storage, _temp) = create_test_storage();
        let mut existing = Card::new("ile", "hand");
        existing.counter = 4;
        existing.days_left = 6;
        storage.put(existing).await.unwrap();

        let outcome = insert_new(&storage, Card::new("ile", "arm")).await.unwrap();
        assert!(matches!(outcome, SaveOutcome::AlreadySaved(ref c) if c.back == "hand"));
        let ile = storage.get("ile").await.unwrap().unwrap();
        assert_eq!((ile.back.as_str(), ile.counter, ile.days_left), ("hand", 4, 6));

        let outcome = insert_new(&storage, Card::new("ich", "inside")).await.unwrap();
        assert!(matches!(outcome, SaveOutcome::Saved(ref c) if c.id == 2));
    }

    #[tokio::test]
    async fn test_memory_store_matches_file_store() {
        let store = MemoryCardStore::with_cards(vec![
            Card::new("ile", "hand"),
            Card::new("", "dropped"),
            Card::new("ich", "inside"),
        ]);

        let cards = store.get_all().await.unwrap();
        assert_eq!(cards.len(), 2);
        assert_eq!(cards[1].id, 2);
        assert!(store.contains("ich").await.unwrap());

        store.delete("ich").await.unwrap();
        assert!(!store.contains("ich").await.unwrap());
    }
}
