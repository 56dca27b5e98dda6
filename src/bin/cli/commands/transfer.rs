use std::path::Path;

use anyhow::{Context, Result};

use wordcards_lib::flashcards::transfer::{export_to_file, import_from_file};

use crate::app::App;
use crate::OutputFormat;

pub async fn run_export(app: &App, path: &Path) -> Result<()> {
    let count = export_to_file(&app.cards, path)
        .await
        .with_context(|| format!("Failed to export to {}", path.display()))?;
    println!("Exported {} cards to {}", count, path.display());
    Ok(())
}

pub async fn run_import(app: &App, path: &Path, format: &OutputFormat) -> Result<()> {
    let report = import_from_file(&app.cards, path)
        .await
        .with_context(|| format!("Failed to import {}", path.display()))?;

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
        OutputFormat::Plain => {
            println!("Imported {} cards", report.imported);
            if report.skipped_existing > 0 {
                println!("  {} already saved", report.skipped_existing);
            }
            if report.skipped_invalid > 0 {
                println!("  {} without a front or back", report.skipped_invalid);
            }
        }
    }
    Ok(())
}
