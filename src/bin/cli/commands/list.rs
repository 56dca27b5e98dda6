use anyhow::{Context, Result};

use wordcards_lib::flashcards::listing::{list_cards, ListQuery, SortOrder};
use wordcards_lib::flashcards::CardStore;

use crate::app::App;
use crate::render::terminal::{pad, paint, truncate, Color};
use crate::OutputFormat;

pub async fn run(
    app: &App,
    search: Option<String>,
    sort: SortOrder,
    page: usize,
    format: &OutputFormat,
    use_color: bool,
) -> Result<()> {
    let cards = app.cards.get_all().await.context("Failed to load cards")?;
    let query = ListQuery {
        search,
        sort,
        page,
        page_size: app.settings.page_size,
    };
    let result = list_cards(&cards, &query);

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&result)?);
        }
        OutputFormat::Plain => {
            if result.rows.is_empty() {
                println!("No cards.");
                return Ok(());
            }

            let front_width = result
                .rows
                .iter()
                .map(|r| r.front.chars().count())
                .max()
                .unwrap_or(5)
                .clamp(5, 24);
            let back_width = 48;
            let schedule_width = 14;

            println!(
                "{} {} {}",
                pad("Front", front_width),
                pad("Back", back_width),
                pad("Days", schedule_width)
            );
            println!(
                "{} {} {}",
                "\u{2500}".repeat(front_width),
                "\u{2500}".repeat(back_width),
                "\u{2500}".repeat(schedule_width)
            );

            for row in &result.rows {
                let schedule = pad(&row.schedule, schedule_width);
                let schedule = if row.days_left <= 0 {
                    paint(&schedule, Color::GREEN, use_color)
                } else {
                    schedule
                };
                println!(
                    "{} {} {}",
                    pad(&truncate(&row.front, front_width), front_width),
                    pad(&truncate(&row.back, back_width), back_width),
                    schedule
                );
            }

            println!(
                "\nPage {} / {} ({} cards)",
                result.page, result.total_pages, result.total_matches
            );
        }
    }

    Ok(())
}
