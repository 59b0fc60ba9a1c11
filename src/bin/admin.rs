//! CLI administration tool for quicklink.
//!
//! Inspects links and the database without going through the HTTP API.
//!
//! # Usage
//!
//! ```bash
//! # List the 20 newest links
//! cargo run --bin admin -- links list --limit 20
//!
//! # Show one link
//! cargo run --bin admin -- links show aZ3k9Q
//!
//! # View statistics
//! cargo run --bin admin -- stats
//!
//! # Check database connection / apply migrations
//! cargo run --bin admin -- db check
//! cargo run --bin admin -- db migrate
//! ```
//!
//! # Environment Variables
//!
//! Same database variables as the server: `DATABASE_URL`, or the `DB_*`
//! components. `BASE_URL` is used to print full short URLs.

use quicklink::config::{Config, mask_connection_string};
use quicklink::domain::repositories::{LinkRepository, StoreError};
use quicklink::infrastructure::persistence::PgLinkRepository;
use quicklink::server::connect_database;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::*;
use sqlx::PgPool;
use std::sync::Arc;

/// CLI tool for managing quicklink.
#[derive(Parser)]
#[command(name = "admin")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Top-level command groups.
#[derive(Subcommand)]
enum Commands {
    /// Inspect links
    Links {
        #[command(subcommand)]
        action: LinksAction,
    },

    /// Show statistics
    Stats,

    /// Database operations
    Db {
        #[command(subcommand)]
        action: DbAction,
    },
}

#[derive(Subcommand)]
enum LinksAction {
    /// List links, newest first
    List {
        /// Maximum number of links to print
        #[arg(short, long, default_value_t = 50)]
        limit: usize,
    },

    /// Show a single link by slug
    Show { slug: String },
}

/// Database operation subcommands.
#[derive(Subcommand)]
enum DbAction {
    /// Check database connection
    Check,

    /// Show database info
    Info,

    /// Apply pending migrations
    Migrate,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let config = Config::from_env()?;
    let database_url = config
        .database_url
        .clone()
        .context("The admin tool requires the postgres storage backend")?;

    let pool = connect_database(&config, &database_url).await?;

    match cli.command {
        Commands::Links { action } => handle_links_action(action, &pool, &config).await?,
        Commands::Stats => handle_stats(&pool).await?,
        Commands::Db { action } => handle_db_action(action, &pool, &database_url).await?,
    }

    Ok(())
}

/// Dispatches link inspection commands.
async fn handle_links_action(action: LinksAction, pool: &PgPool, config: &Config) -> Result<()> {
    let repo = PgLinkRepository::new(Arc::new(pool.clone()));

    match action {
        LinksAction::List { limit } => list_links(&repo, limit, &config.base_url).await,
        LinksAction::Show { slug } => show_link(&repo, &slug, &config.base_url).await,
    }
}

/// Prints links as a table.
///
/// ```text
/// 📋 Links
///
///   ID    Slug       Created            Original URL
///   ───────────────────────────────────────────────────────────────
///   2     aZ3k9Q     2025-01-16 14:20   https://example.com/b
///   1     Qx81mT     2025-01-15 10:30   https://example.com/a
/// ```
async fn list_links(repo: &PgLinkRepository, limit: usize, base_url: &str) -> Result<()> {
    println!("{}", "📋 Links".bright_blue().bold());
    println!();

    let links = repo
        .list_all()
        .await
        .map_err(|e| anyhow::anyhow!("Failed to list links: {}", e))?;

    if links.is_empty() {
        println!("{}", "  No links found".yellow());
        return Ok(());
    }

    println!(
        "  {:<5} {:<10} {:<18} {}",
        "ID".bright_white().bold(),
        "Slug".bright_white().bold(),
        "Created".bright_white().bold(),
        "Original URL".bright_white().bold()
    );
    println!("  {}", "─".repeat(75).bright_black());

    for link in links.iter().take(limit) {
        println!(
            "  {:<5} {:<10} {:<18} {}",
            link.id.to_string().bright_black(),
            link.slug.cyan(),
            link.created_at
                .format("%Y-%m-%d %H:%M")
                .to_string()
                .bright_black(),
            link.original_url
        );
    }

    println!();
    println!(
        "  Showing {} of {} (short URLs: {}/<slug>)",
        links.len().min(limit).to_string().bright_white().bold(),
        links.len().to_string().bright_white().bold(),
        base_url
    );
    println!();

    Ok(())
}

async fn show_link(repo: &PgLinkRepository, slug: &str, base_url: &str) -> Result<()> {
    let link = match repo.get_by_slug(slug).await {
        Ok(link) => link,
        Err(StoreError::NotFound { .. }) => {
            println!("{}", format!("❌ No link with slug '{slug}'").red());
            return Ok(());
        }
        Err(e) => return Err(anyhow::anyhow!("Database error: {}", e)),
    };

    println!("{}", "🔗 Link".bright_blue().bold());
    println!();
    println!("  ID:        {}", link.id.to_string().bright_black());
    println!("  Slug:      {}", link.slug.cyan());
    println!("  Short URL: {}/{}", base_url, link.slug);
    println!("  Target:    {}", link.original_url.bright_white());
    println!(
        "  Created:   {}",
        link.created_at.format("%Y-%m-%d %H:%M:%S UTC")
    );
    println!();

    Ok(())
}

/// Displays link counts.
async fn handle_stats(pool: &PgPool) -> Result<()> {
    println!("{}", "📊 Statistics".bright_blue().bold());
    println!();

    let repo = PgLinkRepository::new(Arc::new(pool.clone()));
    let links_count = repo
        .count()
        .await
        .map_err(|e| anyhow::anyhow!("Failed to count links: {}", e))?;

    let last_day: i64 = sqlx::query_scalar(
        "SELECT COUNT(*) FROM links WHERE created_at > NOW() - INTERVAL '1 day'",
    )
    .fetch_one(pool)
    .await?;

    let distinct_urls: i64 = sqlx::query_scalar("SELECT COUNT(DISTINCT original_url) FROM links")
        .fetch_one(pool)
        .await?;

    println!(
        "  Links:          {}",
        links_count.to_string().bright_green().bold()
    );
    println!(
        "  Last 24h:       {}",
        last_day.to_string().bright_green().bold()
    );
    println!(
        "  Distinct URLs:  {}",
        distinct_urls.to_string().bright_green().bold()
    );
    println!();

    Ok(())
}

/// Handles database diagnostic commands.
async fn handle_db_action(action: DbAction, pool: &PgPool, database_url: &str) -> Result<()> {
    match action {
        DbAction::Check => {
            println!("{}", "🔍 Checking database connection...".bright_blue());

            sqlx::query("SELECT 1").fetch_one(pool).await?;

            println!("{}", "✅ Database connection OK".green().bold());
        }
        DbAction::Info => {
            println!("{}", "ℹ️  Database Information".bright_blue().bold());
            println!();

            let version: String = sqlx::query_scalar("SELECT version()")
                .fetch_one(pool)
                .await?;

            println!("  URL:        {}", mask_connection_string(database_url));
            println!("  PostgreSQL: {}", version.bright_white());
            println!();
        }
        DbAction::Migrate => {
            println!("{}", "🛠  Applying migrations...".bright_blue());

            sqlx::migrate!("./migrations")
                .run(pool)
                .await
                .context("Failed to run migrations")?;

            println!("{}", "✅ Migrations up to date".green().bold());
        }
    }

    Ok(())
}
