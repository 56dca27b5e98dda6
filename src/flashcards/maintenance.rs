//! Calendar upkeep and counter resets

use chrono::NaiveDate;

use super::storage::{CardStore, FlashcardStorageError, Result};

/// Count down every card's days left for the days elapsed since `last_update`
///
/// Returns the date that should be recorded as the last update, or `None`
/// when nothing needs recording. A first run only records `today`. Cards
/// that were never answered correctly do not go below zero.
pub async fn roll_over_days<S>(
    store: &S,
    last_update: Option<NaiveDate>,
    today: NaiveDate,
) -> Result<Option<NaiveDate>>
where
    S: CardStore + ?Sized,
{
    let Some(last_update) = last_update else {
        return Ok(Some(today));
    };

    let elapsed = (today - last_update).num_days();
    if elapsed == 0 {
        return Ok(None);
    }
    if elapsed < 0 {
        log::warn!("Last update {} is after today {}, not rolling back", last_update, today);
        return Ok(Some(today));
    }

    let mut cards = store.get_all().await?;
    for card in &mut cards {
        card.days_left = card.days_left.saturating_sub(elapsed);
        if card.counter == 0 && card.days_left < 0 {
            card.days_left = 0;
        }
    }
    let count = store.put_all(cards).await?.len();

    log::info!("Rolled {} cards forward by {} days", count, elapsed);
    Ok(Some(today))
}

/// Bring every scheduled card one day closer to being due
///
/// Returns how many cards changed.
pub async fn skip_day<S>(store: &S) -> Result<usize>
where
    S: CardStore + ?Sized,
{
    let scheduled: Vec<_> = store
        .get_all()
        .await?
        .into_iter()
        .filter(|card| card.days_left > 0)
        .map(|mut card| {
            card.days_left -= 1;
            card
        })
        .collect();
    let changed = store.put_all(scheduled).await?.len();

    log::info!("Skipped a day for {} cards", changed);
    Ok(changed)
}

/// Clear the schedule of one card so it is due now
pub async fn reset_card<S>(store: &S, front: &str) -> Result<()>
where
    S: CardStore + ?Sized,
{
    let mut card = store
        .get(front)
        .await?
        .ok_or_else(|| FlashcardStorageError::CardNotFound(front.to_string()))?;

    card.counter = 0;
    card.days_left = 0;
    store.put(card).await?;
    Ok(())
}

/// Clear the schedule of every card
pub async fn reset_all<S>(store: &S) -> Result<usize>
where
    S: CardStore + ?Sized,
{
    let mut cards = store.get_all().await?;
    for card in &mut cards {
        card.counter = 0;
        card.days_left = 0;
    }
    let count = store.put_all(cards).await?.len();

    log::info!("Reset {} cards", count);
    Ok(count)
}
