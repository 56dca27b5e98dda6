//! Search, sort and pagination for the card list

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::algorithm::format_schedule;
use super::models::Card;

pub const DEFAULT_PAGE_SIZE: usize = 10;

/// Order of the card list
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SortOrder {
    /// Store order
    #[default]
    Added,
    AddedAsc,
    AddedDesc,
    AlphaAsc,
    AlphaDesc,
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Added => "added",
            Self::AddedAsc => "added-asc",
            Self::AddedDesc => "added-desc",
            Self::AlphaAsc => "alpha-asc",
            Self::AlphaDesc => "alpha-desc",
        };
        write!(f, "{}", name)
    }
}

impl FromStr for SortOrder {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('_', "-").as_str() {
            "added" => Ok(Self::Added),
            "added-asc" | "addedasc" => Ok(Self::AddedAsc),
            "added-desc" | "addeddesc" => Ok(Self::AddedDesc),
            "alpha" | "alpha-asc" | "alphaasc" => Ok(Self::AlphaAsc),
            "alpha-desc" | "alphadesc" => Ok(Self::AlphaDesc),
            other => Err(format!("unknown sort order: {}", other)),
        }
    }
}

/// What part of the card list to show
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListQuery {
    pub search: Option<String>,
    pub sort: SortOrder,
    /// 1-based page number
    pub page: usize,
    pub page_size: usize,
}

impl Default for ListQuery {
    fn default() -> Self {
        Self {
            search: None,
            sort: SortOrder::default(),
            page: 1,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

/// A row of the card list
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CardRow {
    pub front: String,
    pub back: String,
    pub days_left: i64,
    pub counter: u32,
    /// `daysLeft\interval (counter)`
    pub schedule: String,
}

impl From<&Card> for CardRow {
    fn from(card: &Card) -> Self {
        Self {
            front: card.front.clone(),
            back: card.back.clone(),
            days_left: card.days_left,
            counter: card.counter,
            schedule: format_schedule(card),
        }
    }
}

/// One page of the card list
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CardPage {
    pub rows: Vec<CardRow>,
    pub page: usize,
    pub total_pages: usize,
    /// Cards matching the search, across all pages
    pub total_matches: usize,
}

/// Filter, sort and page a card collection
pub fn list_cards(cards: &[Card], query: &ListQuery) -> CardPage {
    let needle = query
        .search
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_lowercase);

    let mut matches: Vec<&Card> = cards
        .iter()
        .filter(|c| c.has_front())
        .filter(|c| match &needle {
            Some(n) => c.front.to_lowercase().contains(n.as_str()),
            None => true,
        })
        .collect();

    match query.sort {
        SortOrder::Added => {}
        SortOrder::AddedAsc => matches.sort_by_key(|c| c.id),
        SortOrder::AddedDesc => matches.sort_by(|a, b| b.id.cmp(&a.id)),
        SortOrder::AlphaAsc => matches.sort_by(|a, b| alpha_cmp(a, b)),
        SortOrder::AlphaDesc => matches.sort_by(|a, b| alpha_cmp(b, a)),
    }

    let page_size = query.page_size.max(1);
    let total_matches = matches.len();
    let total_pages = total_matches.div_ceil(page_size).max(1);
    let page = query.page.clamp(1, total_pages);

    let rows = matches
        .into_iter()
        .skip((page - 1) * page_size)
        .take(page_size)
        .map(CardRow::from)
        .collect();

    CardPage {
        rows,
        page,
        total_pages,
        total_matches,
    }
}

fn alpha_cmp(a: &Card, b: &Card) -> std::cmp::Ordering {
    a.front
        .to_lowercase()
        .cmp(&b.front.to_lowercase())
        .then_with(|| a.front.cmp(&b.front))
}
