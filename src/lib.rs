pub mod dictionary;
pub mod flashcards;
pub mod settings;
