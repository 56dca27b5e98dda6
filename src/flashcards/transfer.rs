//! Export and import of the whole card collection
//!
//! The file format is a JSON array of `{front, back, daysLeft, counter}`.

use std::collections::HashSet;
use std::path::Path;

use tokio::fs;

use super::models::{Card, ExportedCard, ImportReport, ImportedCard};
use super::storage::{CardStore, FlashcardStorageError, Result};

/// Serialize every card to the export format
pub async fn export_cards<S>(store: &S) -> Result<String>
where
    S: CardStore + ?Sized,
{
    let cards = store.get_all().await?;
    to_export_json(&cards)
}

fn to_export_json(cards: &[Card]) -> Result<String> {
    let exported: Vec<ExportedCard> = cards.iter().map(ExportedCard::from).collect();
    Ok(serde_json::to_string_pretty(&exported)?)
}

/// Write every card to an export file, returning how many were written
pub async fn export_to_file<S>(store: &S, path: &Path) -> Result<usize>
where
    S: CardStore + ?Sized,
{
    let cards = store.get_all().await?;
    let count = cards.len();
    fs::write(path, to_export_json(&cards)?).await?;
    log::info!("Exported {} cards to {}", count, path.display());
    Ok(count)
}

/// Add cards from an export payload
///
/// Cards without a front or back, and cards whose front is already
/// stored, are skipped. Existing cards are never overwritten. The accepted
/// cards are written in one batch.
pub async fn import_cards<S>(store: &S, json: &str) -> Result<ImportReport>
where
    S: CardStore + ?Sized,
{
    let value: serde_json::Value = serde_json::from_str(json)?;
    if !value.is_array() {
        return Err(FlashcardStorageError::InvalidFormat(
            "expected a JSON array of cards".to_string(),
        ));
    }
    let incoming: Vec<ImportedCard> = serde_json::from_value(value)?;

    let mut existing: HashSet<String> = store
        .get_all()
        .await?
        .into_iter()
        .map(|c| c.front)
        .collect();

    let mut report = ImportReport::default();
    let mut accepted = Vec::new();
    for entry in incoming {
        let front = entry.front.as_deref().map(str::trim).unwrap_or_default();
        let back = entry.back.as_deref().map(str::trim).unwrap_or_default();
        if front.is_empty() || back.is_empty() {
            report.skipped_invalid += 1;
            continue;
        }
        if existing.contains(front) {
            report.skipped_existing += 1;
            continue;
        }

        let mut card = Card::new(front, back);
        card.days_left = entry.days_left.unwrap_or(0);
        card.counter = entry.counter.unwrap_or(0);
        accepted.push(card);

        existing.insert(front.to_string());
    }
    report.imported = store.put_all(accepted).await?.len();

    log::info!(
        "Imported {} cards ({} invalid, {} already saved)",
        report.imported,
        report.skipped_invalid,
        report.skipped_existing
    );
    Ok(report)
}

/// Import cards from a `.json` file
pub async fn import_from_file<S>(store: &S, path: &Path) -> Result<ImportReport>
where
    S: CardStore + ?Sized,
{
    let is_json = path
        .extension()
        .map(|ext| ext.eq_ignore_ascii_case("json"))
        .unwrap_or(false);
    if !is_json {
        return Err(FlashcardStorageError::InvalidFormat(format!(
            "only .json files can be imported: {}",
            path.display()
        )));
    }

    let json = fs::read_to_string(path).await?;
    import_cards(store, &json).await
}
