//! Fibonacci spacing schedule
//!
//! A card answered correctly `counter` times in a row is next due after
//! `F(counter + 1) - 1` days:
//! - 0, 1: due again today
//! - 2: 1 day
//! - 3: 2 days
//! - 4: 4 days
//! - 5: 7 days
//! - 6: 12 days

use super::models::Card;

/// Counter a forgotten card drops back to once it has gone past this
const DECAY_CAP: u32 = 3;

/// Fibonacci term `F(n)` with `F(0) = 0`, saturating at `i64::MAX`
pub fn fibonacci(n: u32) -> i64 {
    if n == 0 {
        return 0;
    }

    let (mut a, mut b) = (0i64, 1i64);
    for _ in 2..=n {
        let next = a.saturating_add(b);
        a = b;
        b = next;
        if b == i64::MAX {
            break;
        }
    }
    b
}

/// Days until a card with the given success counter is due again
pub fn interval(counter: u32) -> i64 {
    let term = fibonacci(counter.saturating_add(1));
    if term == i64::MAX {
        term
    } else {
        term - 1
    }
}

/// Counter after a "don't know" answer
///
/// 0 stays 0, 1..=3 drop to 1, anything above drops to 3.
pub fn decay_counter(counter: u32) -> u32 {
    if counter <= DECAY_CAP {
        if counter == 0 {
            0
        } else {
            1
        }
    } else {
        DECAY_CAP
    }
}

/// Apply a correct answer to a card's schedule
pub fn apply_known(card: &mut Card) {
    card.counter = card.counter.saturating_add(1);
    card.days_left = interval(card.counter);
}

/// Apply a committed "don't know" answer to a card's schedule
pub fn apply_unknown(card: &mut Card) {
    card.counter = decay_counter(card.counter);
    card.days_left = interval(card.counter);
}

/// Schedule column of the card list: `daysLeft\interval (counter)`
pub fn format_schedule(card: &Card) -> String {
    format!("{}\\{} ({})", card.days_left, interval(card.counter), card.counter)
}
