use std::io::{self, BufRead, Write};

use anyhow::{Context, Result};

use wordcards_lib::flashcards::{ReviewMode, ReviewOutcome, ReviewSession, SessionStatus};

use crate::app::App;
use crate::render::terminal::render_view;
use crate::OutputFormat;

/// A key pressed during review
enum Action {
    Reveal,
    Unknown,
    Known,
    Quit,
}

fn parse_action(input: &str) -> Option<Action> {
    match input.trim().to_lowercase().as_str() {
        "s" | "show" => Some(Action::Reveal),
        "" | "u" | "n" | "no" => Some(Action::Unknown),
        "k" | "y" | "yes" => Some(Action::Known),
        "q" | "quit" => Some(Action::Quit),
        _ => None,
    }
}

pub async fn run(
    app: &mut App,
    mode: ReviewMode,
    count: Option<usize>,
    format: &OutputFormat,
    use_color: bool,
) -> Result<()> {
    // A new count is remembered for the next session
    if let Some(count) = count {
        if app.settings.flashcard_count != Some(count) {
            app.settings.flashcard_count = Some(count);
            app.save_settings()?;
        }
    }

    let mut rng = rand::thread_rng();
    let mut session = ReviewSession::start(&app.cards, mode, app.settings.count_limit(), &mut rng)
        .await
        .context("Failed to load cards")?;

    if let OutputFormat::Json = format {
        // Non-interactive: describe the session that would start
        let output = serde_json::json!({
            "view": session.view(),
            "queue": session.queue(),
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();

    loop {
        println!("\n{}", render_view(&session.view(), use_color));
        if !matches!(session.status(), SessionStatus::Reviewing { .. }) {
            break;
        }

        print!("> ");
        io::stdout().flush()?;
        let Some(line) = lines.next() else { break };
        let Some(action) = parse_action(&line?) else {
            println!("Keys: s = show answer, u = don't know, k = know, q = quit");
            continue;
        };

        let outcome = match action {
            Action::Reveal => session.reveal(),
            Action::Unknown => session.mark_unknown(&app.cards, &mut rng).await,
            Action::Known => session.mark_known(&app.cards).await,
            Action::Quit => break,
        };

        if let ReviewOutcome::Requeued { position, .. } = outcome {
            log::debug!("Card comes back at position {}", position + 1);
        }
    }

    Ok(())
}
