mod app;
mod commands;
mod render;

use std::io::IsTerminal;
use std::path::PathBuf;

use clap::{Parser, Subcommand};

use wordcards_lib::flashcards::listing::SortOrder;
use wordcards_lib::flashcards::ReviewMode;

#[derive(Parser)]
#[command(name = "wordcards", about = "Dictionary lookup and flashcard review", version)]
struct Cli {
    /// Use a specific data directory (default: platform data dir)
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Output format
    #[arg(long, global = true, default_value = "plain")]
    format: OutputFormat,

    /// Disable ANSI colors
    #[arg(long, global = true)]
    no_color: bool,

    /// Treat digits before a backslash as typed with caps lock on
    #[arg(long, global = true)]
    caps_lock: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Clone, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    Plain,
    Json,
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
enum ModeArg {
    Smart,
    Random,
}

impl From<ModeArg> for ReviewMode {
    fn from(mode: ModeArg) -> Self {
        match mode {
            ModeArg::Smart => ReviewMode::Smart,
            ModeArg::Random => ReviewMode::Random,
        }
    }
}

#[derive(Subcommand)]
enum Command {
    /// Look a word up in the dictionary
    Lookup {
        /// Word to look up (default: the queued word)
        word: Option<String>,
        /// Save the numbered entries as flashcards
        #[arg(long, value_delimiter = ',')]
        save: Vec<usize>,
        /// Print the dictionary page URL instead of looking up
        #[arg(long)]
        url: bool,
    },

    /// Queue a word for the next lookup
    QueueWord {
        word: String,
    },

    /// Add a flashcard by hand
    Add {
        front: String,
        back: String,
        /// Replace an existing card with this front, resetting its schedule
        #[arg(long)]
        force: bool,
    },

    /// Print one flashcard in full
    Show {
        front: String,
    },

    /// List flashcards
    List {
        /// Only cards whose front contains this text
        #[arg(long)]
        search: Option<String>,
        /// added, added-asc, added-desc, alpha-asc, alpha-desc
        #[arg(long, default_value = "added")]
        sort: SortOrder,
        /// Page number
        #[arg(long, default_value = "1")]
        page: usize,
    },

    /// Delete a flashcard
    Delete {
        front: String,
    },

    /// Make a flashcard due now and restart its schedule
    Reset {
        front: String,
    },

    /// Restart the schedule of every flashcard
    ResetAll {
        /// Do not ask for confirmation
        #[arg(long)]
        yes: bool,
    },

    /// Bring every scheduled card one day closer
    SkipDay {
        /// Do not ask for confirmation
        #[arg(long)]
        yes: bool,
    },

    /// Delete every flashcard
    Clear {
        /// Do not ask for confirmation
        #[arg(long)]
        yes: bool,
    },

    /// Write all flashcards to a JSON file
    Export {
        #[arg(default_value = "flashcards.json")]
        path: PathBuf,
    },

    /// Add flashcards from a JSON file
    Import {
        path: PathBuf,
    },

    /// Review flashcards interactively
    Review {
        /// smart: due cards only; random: every card, schedule untouched
        #[arg(long, default_value = "smart")]
        mode: ModeArg,
        /// Maximum cards in the session (remembered for next time, 0 for no limit)
        #[arg(long)]
        count: Option<usize>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::init();

    let cli = Cli::parse();
    let use_color = !cli.no_color && std::io::stdout().is_terminal();
    let mut app = app::App::new(cli.data_dir).await?;

    match cli.command {
        Command::Lookup { word, save, url } => {
            commands::lookup::run(&mut app, word, &save, url, cli.caps_lock, &cli.format, use_color)
                .await?;
        }
        Command::QueueWord { word } => {
            commands::lookup::run_queue_word(&mut app, &word, cli.caps_lock)?;
        }
        Command::Add { front, back, force } => {
            commands::cards::run_add(&app, &front, &back, force, cli.caps_lock, &cli.format).await?;
        }
        Command::Show { front } => {
            commands::cards::run_show(&app, &front, &cli.format, use_color).await?;
        }
        Command::List { search, sort, page } => {
            commands::list::run(&app, search, sort, page, &cli.format, use_color).await?;
        }
        Command::Delete { front } => {
            commands::cards::run_delete(&app, &front).await?;
        }
        Command::Reset { front } => {
            commands::cards::run_reset(&app, &front).await?;
        }
        Command::ResetAll { yes } => {
            commands::cards::run_reset_all(&app, yes).await?;
        }
        Command::SkipDay { yes } => {
            commands::cards::run_skip_day(&mut app, yes).await?;
        }
        Command::Clear { yes } => {
            commands::cards::run_clear(&app, yes).await?;
        }
        Command::Export { path } => {
            commands::transfer::run_export(&app, &path).await?;
        }
        Command::Import { path } => {
            commands::transfer::run_import(&app, &path, &cli.format).await?;
        }
        Command::Review { mode, count } => {
            commands::review::run(&mut app, mode.into(), count, &cli.format, use_color).await?;
        }
    }

    Ok(())
}
