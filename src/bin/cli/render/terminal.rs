use wordcards_lib::dictionary::DictionaryEntry;
use wordcards_lib::flashcards::algorithm::format_schedule;
use wordcards_lib::flashcards::{Card, SessionStatus, SessionView};

/// ANSI color codes
#[allow(dead_code)]
pub struct Color;

#[allow(dead_code)]
impl Color {
    pub const RESET: &str = "\x1b[0m";
    pub const BOLD: &str = "\x1b[1m";
    pub const DIM: &str = "\x1b[2m";
    pub const GREEN: &str = "\x1b[32m";
    pub const YELLOW: &str = "\x1b[33m";
    pub const CYAN: &str = "\x1b[36m";
    pub const GRAY: &str = "\x1b[90m";
}

/// Wrap `text` in a color when colors are on
pub fn paint(text: &str, color: &str, use_color: bool) -> String {
    if use_color {
        format!("{}{}{}", color, text, Color::RESET)
    } else {
        text.to_string()
    }
}

/// Cut `text` to `width` characters, marking the cut with "..."
pub fn truncate(text: &str, width: usize) -> String {
    let flat = text.split_whitespace().collect::<Vec<_>>().join(" ");
    if flat.chars().count() <= width {
        return flat;
    }
    let kept: String = flat.chars().take(width.saturating_sub(3)).collect();
    format!("{}...", kept)
}

/// Pad `text` to `width` characters
pub fn pad(text: &str, width: usize) -> String {
    let len = text.chars().count();
    if len >= width {
        text.to_string()
    } else {
        format!("{}{}", text, " ".repeat(width - len))
    }
}

/// Render a dictionary entry with its number and saved marker
pub fn render_entry(number: usize, entry: &DictionaryEntry, use_color: bool) -> String {
    let star = if entry.saved {
        paint("\u{2605}", Color::YELLOW, use_color)
    } else {
        "\u{2606}".to_string()
    };
    let heading = paint(&entry.headword, Color::BOLD, use_color);

    let mut lines = vec![format!("{} [{}] {}", star, number, heading)];
    for line in entry.text.lines() {
        lines.push(format!("    {}", line));
    }
    lines.join("\n")
}

/// Render one card with its full back text
pub fn render_card(card: &Card, use_color: bool) -> String {
    format!(
        "{}\n\n{}\n\n{}",
        paint(&card.front, Color::BOLD, use_color),
        card.back,
        paint(&format!("Days: {}", format_schedule(card)), Color::GRAY, use_color)
    )
}

/// Render the review screen for a session
pub fn render_view(view: &SessionView, use_color: bool) -> String {
    let progress = paint(
        &format!("Card {} / {}", view.position, view.total),
        Color::GRAY,
        use_color,
    );

    match view.status {
        SessionStatus::Empty => format!("{}\nNo cards to review.", progress),
        SessionStatus::Exhausted => format!("{}\nReview finished \u{1f389}", progress),
        SessionStatus::Reviewing { .. } => {
            let front = view.front.as_deref().unwrap_or_default();
            let mut lines = vec![progress, paint(front, Color::BOLD, use_color)];
            if let Some(back) = &view.back {
                lines.push(paint(back, Color::CYAN, use_color));
            }
            lines.push(format!(
                "[u] {}   [k] {}   [q] Quit",
                view.unknown_label, view.known_label
            ));
            lines.join("\n")
        }
    }
}
