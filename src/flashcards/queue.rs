//! Review queue construction

use rand::seq::SliceRandom;
use rand::Rng;

use super::models::{Card, ReviewMode, SessionEntry};

/// Build the ordered queue for a review session
///
/// Smart mode keeps due cards only, most overdue first (stable for ties).
/// Random mode shuffles every card. A `count_limit` smaller than the
/// eligible set truncates the queue and shuffles what is left.
pub fn build_queue<R: Rng + ?Sized>(
    cards: &[Card],
    mode: ReviewMode,
    count_limit: Option<usize>,
    rng: &mut R,
) -> Vec<SessionEntry> {
    let mut eligible: Vec<&Card> = cards.iter().filter(|c| c.has_front()).collect();

    match mode {
        ReviewMode::Smart => {
            eligible.retain(|c| c.is_due());
            // sort_by_key is stable
            eligible.sort_by_key(|c| c.days_left);
        }
        ReviewMode::Random => {
            eligible.shuffle(rng);
        }
    }

    if let Some(limit) = count_limit {
        if limit > 0 && limit < eligible.len() {
            eligible.truncate(limit);
            eligible.shuffle(rng);
        }
    }

    eligible.into_iter().map(SessionEntry::from).collect()
}
