//! CLI administration tool for blog-api.
//!
//! Inspects and removes users directly in the database, without going
//! through the HTTP API and its identity provider.
//!
//! # Usage
//!
//! ```bash
//! # List users, newest first
//! cargo run --bin admin -- user list --page 2 --page-size 50
//!
//! # Show one user with likes and bookmarks
//! cargo run --bin admin -- user show <uid>
//!
//! # Delete a user (asks for confirmation unless -y)
//! cargo run --bin admin -- user delete <uid>
//!
//! # Check database connection
//! cargo run --bin admin -- db check
//! ```
//!
//! # Environment Variables
//!
//! - `DATABASE_URL` (required): PostgreSQL connection string

use blog_api::domain::entities::User;
use blog_api::domain::repositories::UserRepository;
use blog_api::infrastructure::persistence::PgUserRepository;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::*;
use dialoguer::Confirm;
use sqlx::PgPool;
use std::sync::Arc;

/// CLI tool for managing blog-api users.
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
    /// Manage users
    User {
        #[command(subcommand)]
        action: UserAction,
    },

    /// Database operations
    Db {
        #[command(subcommand)]
        action: DbAction,
    },
}

/// User management subcommands.
#[derive(Subcommand)]
enum UserAction {
    /// List users, newest first
    List {
        /// Page number (1-based)
        #[arg(long, default_value_t = 1)]
        page: u32,

        /// Users per page (1-100)
        #[arg(long, default_value_t = 25)]
        page_size: u32,
    },

    /// Show a single user
    Show {
        /// User ID (identity provider UID)
        id: String,
    },

    /// Delete a user together with likes and bookmarks
    Delete {
        /// User ID (identity provider UID)
        id: String,

        /// Skip confirmation prompt
        #[arg(short = 'y', long)]
        yes: bool,
    },
}

/// Database operation subcommands.
#[derive(Subcommand)]
enum DbAction {
    /// Check database connection
    Check,

    /// Show database info
    Info,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let database_url = std::env::var("DATABASE_URL").context("DATABASE_URL must be set")?;

    let pool = PgPool::connect(&database_url)
        .await
        .context("Failed to connect to database")?;

    match cli.command {
        Commands::User { action } => handle_user_action(action, &pool).await?,
        Commands::Db { action } => handle_db_action(action, &pool).await?,
    }

    Ok(())
}

/// Dispatches user management commands.
async fn handle_user_action(action: UserAction, pool: &PgPool) -> Result<()> {
    let repo = PgUserRepository::new(Arc::new(pool.clone()));

    match action {
        UserAction::List { page, page_size } => list_users(&repo, page, page_size).await?,
        UserAction::Show { id } => show_user(&repo, &id).await?,
        UserAction::Delete { id, yes } => delete_user(&repo, &id, yes).await?,
    }

    Ok(())
}

/// Prints one page of users as a table.
///
/// ```text
/// 👥 Users (page 1, 25 per page)
///
///   ID                             Name                 Likes  Bookmarks  Created
///   ────────────────────────────────────────────────────────────────────────────
///   aZ3kP0...                      Ada Lovelace         3      1          2025-01-15 10:30
/// ```
async fn list_users(repo: &PgUserRepository, page: u32, page_size: u32) -> Result<()> {
    anyhow::ensure!(page > 0, "page must be positive");
    anyhow::ensure!(
        (1..=100).contains(&page_size),
        "page-size must be between 1 and 100"
    );

    println!(
        "{}",
        format!("👥 Users (page {page}, {page_size} per page)")
            .bright_blue()
            .bold()
    );
    println!();

    let offset = i64::from(page - 1) * i64::from(page_size);
    let users = repo
        .list(offset, i64::from(page_size))
        .await
        .map_err(|e| anyhow::anyhow!("Failed to list users: {}", e))?;
    let total = repo
        .count()
        .await
        .map_err(|e| anyhow::anyhow!("Failed to count users: {}", e))?;

    if users.is_empty() {
        println!("{}", "  No users found".yellow());
        println!();
        return Ok(());
    }

    println!(
        "  {:<30} {:<20} {:<6} {:<10} {}",
        "ID".bright_white().bold(),
        "Name".bright_white().bold(),
        "Likes".bright_white().bold(),
        "Bookmarks".bright_white().bold(),
        "Created".bright_white().bold()
    );
    println!("  {}", "─".repeat(85).bright_black());

    for user in &users {
        println!(
            "  {:<30} {:<20} {:<6} {:<10} {}",
            user.id.bright_black(),
            truncate(&user.name, 20).cyan(),
            user.likes.len(),
            user.bookmarks.len(),
            user.created_at
                .format("%Y-%m-%d %H:%M")
                .to_string()
                .bright_black()
        );
    }

    println!();
    println!(
        "  Showing {} of {}",
        users.len().to_string().bright_white().bold(),
        total.to_string().bright_white().bold()
    );
    println!();

    Ok(())
}

async fn show_user(repo: &PgUserRepository, id: &str) -> Result<()> {
    let user = repo
        .find_by_id(id)
        .await
        .map_err(|e| anyhow::anyhow!("Database error: {}", e))?
        .context("User not found")?;

    print_user(&user);

    Ok(())
}

/// Deletes a user after confirmation (default: No).
async fn delete_user(repo: &PgUserRepository, id: &str, skip_confirm: bool) -> Result<()> {
    println!("{}", "🗑️  Delete User".bright_blue().bold());
    println!();

    let user = repo
        .find_by_id(id)
        .await
        .map_err(|e| anyhow::anyhow!("Database error: {}", e))?
        .context("User not found")?;

    print_user(&user);

    if !skip_confirm {
        let confirmed = Confirm::new()
            .with_prompt("Delete this user with all likes and bookmarks?")
            .default(false)
            .interact()?;

        if !confirmed {
            println!("{}", "❌ Cancelled".red());
            return Ok(());
        }
    }

    let removed = repo
        .delete(id)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to delete user: {}", e))?;

    println!();
    if removed {
        println!("{}", "✅ User deleted".green().bold());
    } else {
        println!("{}", "⚠️  User was already gone".yellow());
    }
    println!();

    Ok(())
}

fn print_user(user: &User) {
    println!("  ID:        {}", user.id.bright_black());
    println!("  Name:      {}", user.name.cyan());
    println!("  Email:     {}", user.email);
    if !user.photo_url.is_empty() {
        println!("  Photo:     {}", user.photo_url);
    }
    println!(
        "  Created:   {}",
        user.created_at.format("%Y-%m-%d %H:%M:%S UTC")
    );
    println!(
        "  Updated:   {}",
        user.updated_at.format("%Y-%m-%d %H:%M:%S UTC")
    );
    println!(
        "  Likes:     {}",
        user.likes.len().to_string().bright_green().bold()
    );
    for blog_id in &user.likes {
        println!("    - {}", blog_id.bright_black());
    }
    println!(
        "  Bookmarks: {}",
        user.bookmarks.len().to_string().bright_green().bold()
    );
    for blog_id in &user.bookmarks {
        println!("    - {}", blog_id.bright_black());
    }
    println!();
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        return s.to_string();
    }
    let mut out: String = s.chars().take(max.saturating_sub(1)).collect();
    out.push('…');
    out
}

/// Handles database diagnostic commands.
async fn handle_db_action(action: DbAction, pool: &PgPool) -> Result<()> {
    match action {
        DbAction::Check => {
            println!("{}", "🔍 Checking database connection...".bright_blue());

            let repo = PgUserRepository::new(Arc::new(pool.clone()));
            repo.ping()
                .await
                .map_err(|e| anyhow::anyhow!("Database check failed: {}", e))?;

            println!("{}", "✅ Database connection OK".green().bold());
        }
        DbAction::Info => {
            println!("{}", "ℹ️  Database Information".bright_blue().bold());
            println!();

            let version: String = sqlx::query_scalar("SELECT version()")
                .fetch_one(pool)
                .await?;
            let users: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users")
                .fetch_one(pool)
                .await?;

            println!("  PostgreSQL: {}", version.bright_white());
            println!("  Users:      {}", users.to_string().bright_green().bold());
            println!();
        }
    }

    Ok(())
}
