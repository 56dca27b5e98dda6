use std::time::Duration;

use reqwest::Client;
use thiserror::Error;

use super::parser::parse_entries;
use super::LookupResult;

#[derive(Error, Debug)]
pub enum DictionaryError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("Dictionary returned status {0}")]
    Status(u16),
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),
    #[error("Nothing to look up")]
    EmptyQuery,
}

pub type Result<T> = std::result::Result<T, DictionaryError>;

/// Client for the online dictionary
pub struct DictionaryClient {
    client: Client,
    base_url: String,
}

impl DictionaryClient {
    /// Create a new dictionary client
    pub fn new(base_url: &str) -> Result<Self> {
        // Normalize URL - ensure no trailing slash
        let base_url = base_url.trim().trim_end_matches('/').to_string();

        if !base_url.starts_with("http://") && !base_url.starts_with("https://") {
            return Err(DictionaryError::InvalidUrl(
                "URL must start with http:// or https://".to_string(),
            ));
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .connect_timeout(Duration::from_secs(10))
            .build()?;

        Ok(Self { client, base_url })
    }

    /// Page URL for a lookup of `word`
    pub fn lookup_url(&self, word: &str) -> String {
        format!(
            "{}/index.php?data1={}&talww=2",
            self.base_url,
            urlencoding::encode(word)
        )
    }

    /// Search page of the dictionary, or the results page for `word`
    pub fn page_url(&self, word: Option<&str>) -> String {
        match word {
            Some(word) => self.lookup_url(&word.trim().to_lowercase()),
            None => format!("{}/", self.base_url),
        }
    }

    /// Look up a word; a single attempt, never retried
    pub async fn lookup(&self, word: &str) -> Result<LookupResult> {
        let query = word.trim().to_lowercase();
        if query.is_empty() {
            return Err(DictionaryError::EmptyQuery);
        }

        let url = self.lookup_url(&query);
        log::debug!("Looking up '{}' at {}", query, url);

        let response = self.client.get(&url).send().await?;
        let status = response.status();
        if !status.is_success() {
            log::warn!("Lookup of '{}' failed with status {}", query, status);
            return Err(DictionaryError::Status(status.as_u16()));
        }

        let html = response.text().await?;
        let entries = parse_entries(&html);
        log::info!("Found {} entries for '{}'", entries.len(), query);

        Ok(LookupResult { query, entries })
    }
}
