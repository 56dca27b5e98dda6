use anyhow::{bail, Context, Result};

use wordcards_lib::dictionary::keyboard::expand_backslashes;
use wordcards_lib::dictionary::{save_entry, DictionaryError, SaveOutcome};

use crate::app::App;
use crate::render::terminal::render_entry;
use crate::OutputFormat;

pub async fn run(
    app: &mut App,
    word: Option<String>,
    save: &[usize],
    url: bool,
    caps_lock: bool,
    format: &OutputFormat,
    use_color: bool,
) -> Result<()> {
    let word = match word {
        Some(word) => Some(expand_backslashes(&word, caps_lock)),
        None => {
            let pending = app.settings.take_pending_word();
            if pending.is_some() {
                app.save_settings()?;
            }
            pending
        }
    };

    let client = app.dictionary()?;
    if url {
        println!("{}", client.page_url(word.as_deref()));
        return Ok(());
    }

    let Some(word) = word else {
        bail!("No word given and none queued");
    };

    let mut result = match client.lookup(&word).await {
        Ok(result) => result,
        Err(DictionaryError::Http(e)) => {
            bail!("The lookup failed; check the internet connection or VPN ({})", e)
        }
        Err(e) => return Err(e).context("The lookup failed"),
    };

    for &number in save {
        let Some(entry) = number.checked_sub(1).and_then(|i| result.entries.get(i)) else {
            bail!("No entry {} (found {})", number, result.entries.len());
        };
        match save_entry(&app.cards, entry).await.context("Failed to save card")? {
            SaveOutcome::Saved(card) => log::info!("Saved \"{}\"", card.front),
            SaveOutcome::AlreadySaved(card) => log::info!("\"{}\" was already saved", card.front),
        }
    }
    result.mark_saved(&app.cards).await?;

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&result)?),
        OutputFormat::Plain => {
            if result.is_empty() {
                println!("No matches for \"{}\".", result.query);
                return Ok(());
            }
            for (i, entry) in result.entries.iter().enumerate() {
                println!("{}\n", render_entry(i + 1, entry, use_color));
            }
            if save.is_empty() {
                println!("Save entries with: wordcards lookup {} --save 1", result.query);
            }
        }
    }

    Ok(())
}

pub fn run_queue_word(app: &mut App, word: &str, caps_lock: bool) -> Result<()> {
    let word = expand_backslashes(word, caps_lock);
    app.settings.queue_word(&word);
    app.save_settings()?;

    match &app.settings.pending_word {
        Some(word) => println!("Queued \"{}\" for the next lookup", word),
        None => println!("Nothing to queue"),
    }
    Ok(())
}
