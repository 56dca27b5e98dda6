use anyhow::{bail, Context, Result};

use wordcards_lib::dictionary::keyboard::expand_backslashes;
use wordcards_lib::flashcards::maintenance::{reset_all, reset_card, skip_day};
use wordcards_lib::flashcards::{insert_new, Card, CardStore, SaveOutcome};

use crate::app::{confirm, App};
use crate::render::terminal::render_card;
use crate::OutputFormat;

pub async fn run_add(
    app: &App,
    front: &str,
    back: &str,
    force: bool,
    caps_lock: bool,
    format: &OutputFormat,
) -> Result<()> {
    let front = expand_backslashes(front.trim(), caps_lock);
    let back = expand_backslashes(back.trim(), caps_lock);
    if front.is_empty() {
        bail!("The front of a card cannot be empty");
    }

    let card = Card::new(front, back);
    let card = if force {
        app.cards.put(card).await.context("Failed to save card")?
    } else {
        match insert_new(&app.cards, card).await.context("Failed to save card")? {
            SaveOutcome::Saved(card) => card,
            SaveOutcome::AlreadySaved(card) => {
                bail!("\"{}\" is already saved; use --force to replace it", card.front)
            }
        }
    };

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&card)?),
        OutputFormat::Plain => println!("Saved \"{}\"", card.front),
    }
    Ok(())
}

pub async fn run_show(
    app: &App,
    front: &str,
    format: &OutputFormat,
    use_color: bool,
) -> Result<()> {
    let Some(card) = app.cards.get(front).await.context("Failed to load card")? else {
        bail!("No card \"{}\"", front);
    };

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&card)?),
        OutputFormat::Plain => println!("{}", render_card(&card, use_color)),
    }
    Ok(())
}

pub async fn run_delete(app: &App, front: &str) -> Result<()> {
    if !app.cards.contains(front).await? {
        bail!("No card \"{}\"", front);
    }
    app.cards.delete(front).await.context("Failed to delete card")?;
    println!("Deleted \"{}\"", front);
    Ok(())
}

pub async fn run_reset(app: &App, front: &str) -> Result<()> {
    reset_card(&app.cards, front)
        .await
        .with_context(|| format!("Failed to reset \"{}\"", front))?;
    println!("\"{}\" is due now", front);
    Ok(())
}

pub async fn run_reset_all(app: &App, yes: bool) -> Result<()> {
    if !yes && !confirm("Reset the counter and days left of ALL cards?")? {
        println!("Cancelled.");
        return Ok(());
    }
    let count = reset_all(&app.cards).await.context("Failed to reset cards")?;
    println!("Reset {} cards", count);
    Ok(())
}

pub async fn run_skip_day(app: &mut App, yes: bool) -> Result<()> {
    if !yes && !confirm("Skip one day?")? {
        println!("Cancelled.");
        return Ok(());
    }
    let changed = skip_day(&app.cards).await.context("Failed to skip a day")?;

    app.settings.last_days_update = Some(chrono::Utc::now().date_naive());
    app.save_settings()?;

    println!("{} cards moved one day closer", changed);
    Ok(())
}

pub async fn run_clear(app: &App, yes: bool) -> Result<()> {
    if !yes && !confirm("Delete ALL cards?")? {
        println!("Cancelled.");
        return Ok(());
    }
    app.cards.clear().await.context("Failed to clear cards")?;
    println!("All cards deleted");
    Ok(())
}
