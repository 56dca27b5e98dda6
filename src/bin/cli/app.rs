use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::Utc;

use wordcards_lib::dictionary::DictionaryClient;
use wordcards_lib::flashcards::maintenance::roll_over_days;
use wordcards_lib::flashcards::FlashcardStorage;
use wordcards_lib::settings::{default_data_dir, Settings, SettingsStorage};

/// Shared application state for CLI commands
pub struct App {
    pub cards: FlashcardStorage,
    pub settings_storage: SettingsStorage,
    pub settings: Settings,
}

impl App {
    /// Open the data directory and bring the schedule up to today
    pub async fn new(data_dir: Option<PathBuf>) -> Result<Self> {
        let data_dir = match data_dir {
            Some(dir) => dir,
            None => default_data_dir().context("Failed to get data directory")?,
        };

        let cards = FlashcardStorage::new(&data_dir);
        cards
            .init()
            .await
            .with_context(|| format!("Failed to initialize card storage in {}", data_dir.display()))?;

        let settings_storage = SettingsStorage::new(&data_dir);
        let settings = settings_storage.load().context("Failed to load settings")?;

        log::debug!("Using data directory {}", data_dir.display());

        let mut app = Self {
            cards,
            settings_storage,
            settings,
        };
        app.catch_up_days().await?;
        Ok(app)
    }

    /// Count down days left once per calendar day
    async fn catch_up_days(&mut self) -> Result<()> {
        let today = Utc::now().date_naive();
        let recorded = roll_over_days(&self.cards, self.settings.last_days_update, today)
            .await
            .context("Failed to update days left")?;

        if let Some(date) = recorded {
            self.settings.last_days_update = Some(date);
            self.save_settings()?;
        }
        Ok(())
    }

    pub fn save_settings(&self) -> Result<()> {
        self.settings_storage
            .save(&self.settings)
            .context("Failed to save settings")
    }

    pub fn dictionary(&self) -> Result<DictionaryClient> {
        DictionaryClient::new(&self.settings.dictionary_url)
            .context("Failed to create dictionary client")
    }
}

/// Ask a yes/no question on the terminal, defaulting to no
pub fn confirm(question: &str) -> Result<bool> {
    print!("{} [y/N] ", question);
    io::stdout().flush()?;

    let mut answer = String::new();
    io::stdin().lock().read_line(&mut answer)?;
    Ok(matches!(answer.trim().to_lowercase().as_str(), "y" | "yes"))
}
