//! Review session state machine
//!
//! A session walks a queue of card snapshots:
//! ```text
//! Empty                      (built with no eligible cards)
//! Reviewing { show_answer }  (index < queue length)
//! Exhausted                  (index == queue length)
//! ```
//! Only building a new session leaves `Empty` or `Exhausted`.
//!
//! In smart mode every answer is written back to the card store. Store
//! failures and cards deleted mid-session are logged and skipped; the
//! session itself never fails.

use rand::Rng;
use serde::Serialize;

use super::algorithm::{apply_known, apply_unknown};
use super::models::{Card, ReviewMode, SessionEntry};
use super::queue::build_queue;
use super::storage::{CardStore, Result};

/// Minimum number of cards between a forgotten card and its next showing
const MIN_REQUEUE_GAP: usize = 2;

pub const SHOW_ANSWER_LABEL: &str = "Show answer";
pub const DONT_KNOW_LABEL: &str = "Don't know";
pub const KNOW_LABEL: &str = "Know";

/// Where a session currently is
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "camelCase")]
pub enum SessionStatus {
    /// No eligible cards were found
    Empty,
    /// A card is on screen
    Reviewing {
        #[serde(rename = "showAnswer")]
        show_answer: bool,
    },
    /// Every card in the queue has been answered
    Exhausted,
}

/// What a transition did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReviewOutcome {
    /// The answer is now visible
    Revealed,
    /// Moved on to the next card
    Advanced { persisted: bool },
    /// The card was queued again at `position` and the session moved on
    Requeued { position: usize, persisted: bool },
    /// Nothing to act on
    Ignored,
}

/// Display state derived from a session
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionView {
    pub mode: ReviewMode,
    pub status: SessionStatus,
    pub front: Option<String>,
    /// Only set once the answer is shown
    pub back: Option<String>,
    pub position: usize,
    pub total: usize,
    pub unknown_label: &'static str,
    pub known_label: &'static str,
}

/// One review pass over a queue of cards
#[derive(Debug, Clone)]
pub struct ReviewSession {
    queue: Vec<SessionEntry>,
    index: usize,
    show_answer: bool,
    mode: ReviewMode,
}

impl ReviewSession {
    pub fn new(queue: Vec<SessionEntry>, mode: ReviewMode) -> Self {
        Self {
            queue,
            index: 0,
            show_answer: false,
            mode,
        }
    }

    /// Build a session from a snapshot of the card collection
    pub fn build<R: Rng + ?Sized>(
        cards: &[Card],
        mode: ReviewMode,
        count_limit: Option<usize>,
        rng: &mut R,
    ) -> Self {
        let queue = build_queue(cards, mode, count_limit, rng);
        log::info!("Starting {} review with {} cards", mode, queue.len());
        Self::new(queue, mode)
    }

    /// Build a session from the current contents of a store
    pub async fn start<S, R>(
        store: &S,
        mode: ReviewMode,
        count_limit: Option<usize>,
        rng: &mut R,
    ) -> Result<Self>
    where
        S: CardStore + ?Sized,
        R: Rng + ?Sized,
    {
        let cards = store.get_all().await?;
        Ok(Self::build(&cards, mode, count_limit, rng))
    }

    pub fn mode(&self) -> ReviewMode {
        self.mode
    }

    pub fn queue(&self) -> &[SessionEntry] {
        &self.queue
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn show_answer(&self) -> bool {
        self.show_answer
    }

    pub fn status(&self) -> SessionStatus {
        if self.queue.is_empty() {
            SessionStatus::Empty
        } else if self.index >= self.queue.len() {
            SessionStatus::Exhausted
        } else {
            SessionStatus::Reviewing {
                show_answer: self.show_answer,
            }
        }
    }

    /// The card on screen, if any
    pub fn current(&self) -> Option<&SessionEntry> {
        self.queue.get(self.index)
    }

    /// Cards not yet answered, the current one included
    pub fn remaining(&self) -> usize {
        self.queue.len().saturating_sub(self.index)
    }

    /// Show the answer of the current card
    pub fn reveal(&mut self) -> ReviewOutcome {
        if self.current().is_none() {
            return ReviewOutcome::Ignored;
        }
        self.show_answer = true;
        ReviewOutcome::Revealed
    }

    /// Answer "know" for the current card
    pub async fn mark_known<S>(&mut self, store: &S) -> ReviewOutcome
    where
        S: CardStore + ?Sized,
    {
        let Some(front) = self.current().map(|e| e.front.clone()) else {
            return ReviewOutcome::Ignored;
        };

        let persisted = match self.mode {
            ReviewMode::Smart => persist_schedule(store, &front, apply_known).await,
            ReviewMode::Random => false,
        };

        self.advance();
        ReviewOutcome::Advanced { persisted }
    }

    /// Answer "don't know" for the current card
    ///
    /// The first press only reveals the answer. Pressed again, the card's
    /// counter decays and the card is queued again at least
    /// `MIN_REQUEUE_GAP` cards later.
    pub async fn mark_unknown<S, R>(&mut self, store: &S, rng: &mut R) -> ReviewOutcome
    where
        S: CardStore + ?Sized,
        R: Rng + ?Sized,
    {
        let Some(front) = self.current().map(|e| e.front.clone()) else {
            return ReviewOutcome::Ignored;
        };
        if !self.show_answer {
            return self.reveal();
        }

        let position = self.requeue_current(rng);

        let persisted = match self.mode {
            ReviewMode::Smart => persist_schedule(store, &front, apply_unknown).await,
            ReviewMode::Random => false,
        };

        self.advance();
        ReviewOutcome::Requeued {
            position,
            persisted,
        }
    }

    /// Insert a copy of the current entry into the tail of the queue
    ///
    /// Returns the copy's index. The current slot is kept so the index can
    /// simply move forward.
    fn requeue_current<R: Rng + ?Sized>(&mut self, rng: &mut R) -> usize {
        let entry = self.queue[self.index].clone();
        let tail_len = self.queue.len() - self.index - 1;

        let offset = if tail_len < MIN_REQUEUE_GAP {
            tail_len
        } else {
            rng.gen_range(MIN_REQUEUE_GAP..=tail_len)
        };

        let position = self.index + 1 + offset;
        self.queue.insert(position, entry);
        position
    }

    fn advance(&mut self) {
        self.index += 1;
        self.show_answer = false;
    }

    /// Project the session onto what a front end should display
    pub fn view(&self) -> SessionView {
        let status = self.status();
        let total = self.queue.len();

        let (front, back, position) = match status {
            SessionStatus::Empty => (None, None, 0),
            SessionStatus::Exhausted => (None, None, total),
            SessionStatus::Reviewing { show_answer } => {
                let entry = &self.queue[self.index];
                let back = show_answer.then(|| entry.back.clone());
                (Some(entry.front.clone()), back, self.index + 1)
            }
        };

        SessionView {
            mode: self.mode,
            status,
            front,
            back,
            position,
            total,
            unknown_label: if self.show_answer {
                DONT_KNOW_LABEL
            } else {
                SHOW_ANSWER_LABEL
            },
            known_label: KNOW_LABEL,
        }
    }
}

/// Read a card, update its schedule and write it back
///
/// Returns whether the write happened.
async fn persist_schedule<S>(store: &S, front: &str, apply: fn(&mut Card)) -> bool
where
    S: CardStore + ?Sized,
{
    let mut card = match store.get(front).await {
        Ok(Some(card)) => card,
        Ok(None) => {
            log::warn!("Card '{}' is no longer stored, schedule not updated", front);
            return false;
        }
        Err(e) => {
            log::warn!("Failed to read card '{}': {}", front, e);
            return false;
        }
    };

    apply(&mut card);
    let (counter, days_left) = (card.counter, card.days_left);

    match store.put(card).await {
        Ok(_) => {
            log::debug!(
                "Card '{}' now at counter {} with {} days left",
                front,
                counter,
                days_left
            );
            true
        }
        Err(e) => {
            log::warn!("Failed to save card '{}': {}", front, e);
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::flashcards::storage::{FlashcardStorageError, MemoryCardStore};
    use async_trait::async_trait;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn card(front: &str, days_left: i64, counter: u32) -> Card {
        let mut card = Card::new(front, format!("{} back", front));
        card.days_left = days_left;
        card.counter = counter;
        card
    }

    fn session_of(fronts: &[&str], mode: ReviewMode) -> ReviewSession {
        let queue = fronts
            .iter()
            .map(|f| SessionEntry::from(&card(f, 0, 0)))
            .collect();
        ReviewSession::new(queue, mode)
    }

    /// Store whose every operation fails
    struct BrokenStore;

    #[async_trait]
    impl CardStore for BrokenStore {
        async fn get_all(&self) -> Result<Vec<Card>> {
            Err(FlashcardStorageError::InvalidFormat("broken".to_string()))
        }
        async fn get(&self, _front: &str) -> Result<Option<Card>> {
            Err(FlashcardStorageError::InvalidFormat("broken".to_string()))
        }
        async fn put(&self, _card: Card) -> Result<Card> {
            Err(FlashcardStorageError::InvalidFormat("broken".to_string()))
        }
        async fn put_all(&self, _cards: Vec<Card>) -> Result<Vec<Card>> {
            Err(FlashcardStorageError::InvalidFormat("broken".to_string()))
        }
        async fn delete(&self, _front: &str) -> Result<()> {
            Err(FlashcardStorageError::InvalidFormat("broken".to_string()))
        }
        async fn clear(&self) -> Result<()> {
            Err(FlashcardStorageError::InvalidFormat("broken".to_string()))
        }
    }

    #[tokio::test]
    async fn test_mark_known_random_leaves_store_untouched() {
        let store = MemoryCardStore::with_cards(vec![card("ile", 0, 0), card("ich", 0, 0)]);
        let mut session = session_of(&["ile", "ich"], ReviewMode::Random);
        let before = session.queue().to_vec();

        let outcome = session.mark_known(&store).await;

        assert_eq!(outcome, ReviewOutcome::Advanced { persisted: false });
        assert_eq!(session.index(), 1);
        assert_eq!(session.queue(), before.as_slice());
        assert_eq!(store.get("ile").await.unwrap().unwrap().counter, 0);
    }

    #[tokio::test]
    async fn test_mark_known_smart_updates_store() {
        let store = MemoryCardStore::with_cards(vec![card("ile", 0, 2), card("ich", 0, 0)]);
        let mut session = session_of(&["ile", "ich"], ReviewMode::Smart);
        let before = session.queue().to_vec();

        let outcome = session.mark_known(&store).await;

        assert_eq!(outcome, ReviewOutcome::Advanced { persisted: true });
        assert_eq!(session.index(), 1);
        assert!(!session.show_answer());
        assert_eq!(session.queue(), before.as_slice());

        let stored = store.get("ile").await.unwrap().unwrap();
        assert_eq!(stored.counter, 3);
        assert_eq!(stored.days_left, 2);
        assert_eq!(store.get("ich").await.unwrap().unwrap().counter, 0);
    }

    #[tokio::test]
    async fn test_mark_known_after_reveal() {
        let store = MemoryCardStore::new();
        let mut session = session_of(&["a", "b"], ReviewMode::Random);

        assert_eq!(session.reveal(), ReviewOutcome::Revealed);
        assert!(session.show_answer());
        session.mark_known(&store).await;
        assert_eq!(session.index(), 1);
        assert!(!session.show_answer());
    }

    #[tokio::test]
    async fn test_first_unknown_press_reveals() {
        let store = MemoryCardStore::with_cards(vec![card("a", 0, 5)]);
        let mut session = session_of(&["a", "b", "c"], ReviewMode::Smart);
        let mut rng = StdRng::seed_from_u64(1);

        let outcome = session.mark_unknown(&store, &mut rng).await;

        assert_eq!(outcome, ReviewOutcome::Revealed);
        assert!(session.show_answer());
        assert_eq!(session.index(), 0);
        assert_eq!(session.queue().len(), 3);
        assert_eq!(store.get("a").await.unwrap().unwrap().counter, 5);
    }

    #[tokio::test]
    async fn test_unknown_commit_decays_counter() {
        let store = MemoryCardStore::with_cards(vec![card("a", -2, 5), card("z", -1, 0)]);
        let mut rng = StdRng::seed_from_u64(2);

        let mut session = session_of(&["a", "b", "c", "d"], ReviewMode::Smart);
        session.reveal();
        let outcome = session.mark_unknown(&store, &mut rng).await;
        assert!(matches!(outcome, ReviewOutcome::Requeued { persisted: true, .. }));

        let stored = store.get("a").await.unwrap().unwrap();
        assert_eq!(stored.counter, 3);
        assert_eq!(stored.days_left, 2);

        let mut session = session_of(&["z", "b"], ReviewMode::Smart);
        session.reveal();
        session.mark_unknown(&store, &mut rng).await;

        let stored = store.get("z").await.unwrap().unwrap();
        assert_eq!(stored.counter, 0);
        assert_eq!(stored.days_left, 0);
    }

    #[tokio::test]
    async fn test_unknown_commit_random_leaves_store_untouched() {
        let store = MemoryCardStore::with_cards(vec![card("a", -2, 5)]);
        let mut rng = StdRng::seed_from_u64(2);
        let mut session = session_of(&["a", "b", "c"], ReviewMode::Random);

        session.reveal();
        let outcome = session.mark_unknown(&store, &mut rng).await;

        assert!(matches!(outcome, ReviewOutcome::Requeued { persisted: false, .. }));
        assert_eq!(store.get("a").await.unwrap().unwrap().counter, 5);
    }

    #[tokio::test]
    async fn test_requeue_keeps_minimum_gap() {
        let store = MemoryCardStore::new();
        let mut rng = StdRng::seed_from_u64(99);
        let mut seen = std::collections::HashSet::new();

        for _ in 0..500 {
            let mut session = session_of(&["a", "b", "c", "d", "e", "f"], ReviewMode::Random);
            // Move to "b" so the removal point is not the queue head
            session.mark_known(&store).await;
            let index = session.index();

            session.reveal();
            let outcome = session.mark_unknown(&store, &mut rng).await;
            let ReviewOutcome::Requeued { position, .. } = outcome else {
                panic!("expected a requeue, got {:?}", outcome);
            };

            assert!(position >= index + 1 + MIN_REQUEUE_GAP);
            assert!(position <= 6);
            assert_eq!(session.queue()[position].front, "b");
            assert_eq!(session.queue().len(), 7);
            assert_eq!(session.index(), index + 1);
            assert!(!session.show_answer());
            seen.insert(position);
        }

        // Tail of 4 after "b": offsets 2, 3 and 4 are all reachable
        assert_eq!(seen.len(), 3);
    }

    #[tokio::test]
    async fn test_requeue_on_short_tail_appends() {
        let store = MemoryCardStore::new();
        let mut rng = StdRng::seed_from_u64(4);

        let mut session = session_of(&["a", "b"], ReviewMode::Random);
        session.reveal();
        let outcome = session.mark_unknown(&store, &mut rng).await;
        assert_eq!(outcome, ReviewOutcome::Requeued { position: 2, persisted: false });
        assert_eq!(session.queue().len(), 3);
        assert_eq!(session.queue()[2].front, "a");

        let mut session = session_of(&["a"], ReviewMode::Random);
        session.reveal();
        let outcome = session.mark_unknown(&store, &mut rng).await;
        assert_eq!(outcome, ReviewOutcome::Requeued { position: 1, persisted: false });
        assert_eq!(session.current().unwrap().front, "a");
    }

    #[tokio::test]
    async fn test_exhausted_ignores_actions() {
        let store = MemoryCardStore::with_cards(vec![card("ile", 0, 1)]);
        let mut rng = StdRng::seed_from_u64(0);
        let mut session = session_of(&["ile"], ReviewMode::Smart);

        session.mark_known(&store).await;
        assert_eq!(session.status(), SessionStatus::Exhausted);
        let stored = store.get("ile").await.unwrap().unwrap();

        assert_eq!(session.reveal(), ReviewOutcome::Ignored);
        assert_eq!(session.mark_known(&store).await, ReviewOutcome::Ignored);
        assert_eq!(session.mark_unknown(&store, &mut rng).await, ReviewOutcome::Ignored);

        assert_eq!(session.index(), 1);
        assert!(!session.show_answer());
        assert_eq!(store.get("ile").await.unwrap().unwrap(), stored);

        let view = session.view();
        assert_eq!(view.status, SessionStatus::Exhausted);
        assert_eq!((view.position, view.total), (1, 1));
        assert!(view.front.is_none());
    }

    #[tokio::test]
    async fn test_empty_session() {
        let store = MemoryCardStore::with_cards(vec![card("later", 3, 2)]);
        let mut rng = StdRng::seed_from_u64(0);

        let mut session = ReviewSession::start(&store, ReviewMode::Smart, None, &mut rng)
            .await
            .unwrap();

        assert_eq!(session.status(), SessionStatus::Empty);
        assert_eq!(session.mark_known(&store).await, ReviewOutcome::Ignored);
        let view = session.view();
        assert_eq!((view.position, view.total), (0, 0));
    }

    #[tokio::test]
    async fn test_missing_card_is_skipped() {
        let store = MemoryCardStore::with_cards(vec![card("ile", 0, 0), card("ich", 0, 0)]);
        let mut rng = StdRng::seed_from_u64(0);
        let mut session = ReviewSession::start(&store, ReviewMode::Smart, None, &mut rng)
            .await
            .unwrap();

        let first = session.current().unwrap().front.clone();
        store.delete(&first).await.unwrap();

        let outcome = session.mark_known(&store).await;
        assert_eq!(outcome, ReviewOutcome::Advanced { persisted: false });
        assert!(store.get(&first).await.unwrap().is_none());
        assert_eq!(session.index(), 1);
    }

    #[tokio::test]
    async fn test_store_failures_do_not_stop_the_session() {
        let mut rng = StdRng::seed_from_u64(0);
        let mut session = session_of(&["a", "b", "c"], ReviewMode::Smart);

        assert_eq!(
            session.mark_known(&BrokenStore).await,
            ReviewOutcome::Advanced { persisted: false }
        );
        session.reveal();
        let outcome = session.mark_unknown(&BrokenStore, &mut rng).await;
        assert!(matches!(outcome, ReviewOutcome::Requeued { persisted: false, .. }));
        assert_eq!(session.index(), 2);
    }

    #[tokio::test]
    async fn test_start_fails_when_store_is_unreadable() {
        let mut rng = StdRng::seed_from_u64(0);
        let result = ReviewSession::start(&BrokenStore, ReviewMode::Random, None, &mut rng).await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_smart_review_against_file_store() {
        use crate::flashcards::storage::FlashcardStorage;
        use tempfile::TempDir;

        let temp = TempDir::new().unwrap();
        let store = FlashcardStorage::new(temp.path());
        store.init().await.unwrap();
        store.put(card("ile", -2, 2)).await.unwrap();
        store.put(card("ich", 0, 5)).await.unwrap();
        store.put(card("aga", 4, 1)).await.unwrap();
        let mut rng = StdRng::seed_from_u64(8);

        let mut session = ReviewSession::start(&store, ReviewMode::Smart, None, &mut rng)
            .await
            .unwrap();
        let order: Vec<&str> = session.queue().iter().map(|e| e.front.as_str()).collect();
        assert_eq!(order, vec!["ile", "ich"]);

        session.mark_known(&store).await;
        session.mark_unknown(&store, &mut rng).await;
        session.mark_unknown(&store, &mut rng).await;

        // "ich" had a one-card tail, so it went to the end
        assert_eq!(session.queue().len(), 3);
        assert_eq!(session.current().unwrap().front, "ich");

        let ile = store.get("ile").await.unwrap().unwrap();
        assert_eq!((ile.counter, ile.days_left), (3, 2));
        let ich = store.get("ich").await.unwrap().unwrap();
        assert_eq!((ich.counter, ich.days_left), (3, 2));
        let aga = store.get("aga").await.unwrap().unwrap();
        assert_eq!((aga.counter, aga.days_left), (1, 4));
    }

    #[test]
    fn test_view_labels_follow_answer_state() {
        let mut session = session_of(&["ile", "ich"], ReviewMode::Random);

        let view = session.view();
        assert_eq!(view.front.as_deref(), Some("ile"));
        assert!(view.back.is_none());
        assert_eq!(view.unknown_label, SHOW_ANSWER_LABEL);
        assert_eq!(view.known_label, KNOW_LABEL);
        assert_eq!((view.position, view.total), (1, 2));

        session.reveal();
        let view = session.view();
        assert_eq!(view.back.as_deref(), Some("ile back"));
        assert_eq!(view.unknown_label, DONT_KNOW_LABEL);
        assert_eq!(view.status, SessionStatus::Reviewing { show_answer: true });
    }
}
