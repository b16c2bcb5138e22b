use std::{fs::File, path::PathBuf};

use anyhow::Context;
use clap::Parser;

use bookreview::{app, db, import};

/// Load a CSV of books (isbn,title,author,year) into the catalog.
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// CSV file with a header row
    #[arg(long, default_value = "books.csv")]
    path: PathBuf,

    #[arg(long, env = "DATABASE_URL", hide_env_values = true)]
    database_url: String,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    app::init_tracing("import=info,bookreview=info");
    let args = Args::parse();

    let file = File::open(&args.path)
        .with_context(|| format!("open {}", args.path.display()))?;
    let books = import::read_books(file)?;
    tracing::info!(path = %args.path.display(), rows = books.len(), "importing books");

    let pool = db::connect(&args.database_url, 1).await?;
    db::migrate(&pool).await?;

    let summary = import::import_books(&pool, &books).await?;
    tracing::info!(
        inserted = summary.inserted,
        skipped = summary.skipped,
        "books imported"
    );
    Ok(())
}
