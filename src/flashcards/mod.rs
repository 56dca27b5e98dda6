//! Flashcard and spaced repetition system
//!
//! This module provides:
//! - Card storage keyed by front text (JSON file or in memory)
//! - The Fibonacci spacing schedule
//! - Review queue building and the review session state machine
//! - Card list search/sort/paging, calendar upkeep and export/import

pub mod algorithm;
pub mod listing;
pub mod maintenance;
pub mod models;
pub mod queue;
pub mod session;
pub mod storage;
pub mod transfer;

pub use models::*;
pub use session::{ReviewOutcome, ReviewSession, SessionStatus, SessionView};
pub use storage::{
    insert_new, CardStore, FlashcardStorage, FlashcardStorageError, MemoryCardStore, SaveOutcome,
};
