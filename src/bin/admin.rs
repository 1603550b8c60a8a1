//! CLI administration tool for confidently.
//!
//! Manages admin API tokens and experts directly against the database,
//! without going through the HTTP API.
//!
//! # Usage
//!
//! ```bash
//! # Create a new API token
//! cargo run --bin admin -- token create
//!
//! # List all tokens
//! cargo run --bin admin -- token list
//!
//! # Revoke a token
//! cargo run --bin admin -- token revoke "Ops laptop"
//!
//! # Onboard an expert
//! cargo run --bin admin -- expert add --email ada@example.com --fullname "Ada Lovelace"
//!
//! # List experts
//! cargo run --bin admin -- expert list --active true
//!
//! # Check database connection
//! cargo run --bin admin -- db check
//! ```
//!
//! # Environment Variables
//!
//! - `DATABASE_URL` or `DB_*` components (required): PostgreSQL connection
//! - `TOKEN_SIGNING_SECRET` (required for `token create`): must match the server

use confidently::application::services::ExpertService;
use confidently::config::Config;
use confidently::domain::entities::NewExpert;
use confidently::domain::repositories::TokenRepository;
use confidently::infrastructure::persistence::{PgExpertRepository, PgTokenRepository};
use confidently::utils::token::{generate_token, hash_token};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::*;
use dialoguer::{Confirm, Input};
use sqlx::PgPool;
use std::sync::Arc;

/// CLI tool for managing confidently.
#[derive(Parser)]
#[command(name = "admin")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Manage admin API tokens
    Token {
        #[command(subcommand)]
        action: TokenAction,
    },

    /// Manage experts
    Expert {
        #[command(subcommand)]
        action: ExpertAction,
    },

    /// Database operations
    Db {
        #[command(subcommand)]
        action: DbAction,
    },
}

#[derive(Subcommand)]
enum TokenAction {
    /// Create a new API token
    Create {
        /// Token name (e.g., "Ops laptop", "Onboarding bot")
        #[arg(short, long)]
        name: Option<String>,

        /// Custom token value (optional, auto-generated if not provided)
        #[arg(short, long)]
        token: Option<String>,

        /// Skip confirmation prompt
        #[arg(short = 'y', long)]
        yes: bool,
    },

    /// List all tokens
    List,

    /// Revoke a token
    Revoke {
        /// Token name or ID to revoke
        name_or_id: String,
    },
}

#[derive(Subcommand)]
enum ExpertAction {
    /// Onboard a new expert with an empty availability set
    Add {
        #[arg(short, long)]
        email: Option<String>,

        #[arg(short, long)]
        fullname: Option<String>,

        #[arg(short, long)]
        specialization: Option<String>,

        #[arg(long, default_value_t = 0)]
        years: i32,
    },

    /// List experts
    List {
        /// Filter by active flag
        #[arg(long)]
        active: Option<bool>,
    },
}

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

    let database_url = Config::load_database_url().context("Database is not configured")?;

    let pool = PgPool::connect(&database_url)
        .await
        .context("Failed to connect to database")?;

    match cli.command {
        Commands::Token { action } => handle_token_action(action, &pool).await?,
        Commands::Expert { action } => handle_expert_action(action, &pool).await?,
        Commands::Db { action } => handle_db_action(action, &pool).await?,
    }

    Ok(())
}

async fn handle_token_action(action: TokenAction, pool: &PgPool) -> Result<()> {
    let repo = Arc::new(PgTokenRepository::new(Arc::new(pool.clone())));

    match action {
        TokenAction::Create { name, token, yes } => {
            let secret = std::env::var("TOKEN_SIGNING_SECRET")
                .context("TOKEN_SIGNING_SECRET must be set")?;
            create_token(repo, &secret, name, token, yes).await?;
        }
        TokenAction::List => list_tokens(repo).await?,
        TokenAction::Revoke { name_or_id } => revoke_token(repo, name_or_id).await?,
    }

    Ok(())
}

/// Creates a new API token with interactive prompts.
///
/// Only the HMAC-SHA256 hash (keyed by `TOKEN_SIGNING_SECRET`) is stored. The
/// raw token is shown once and cannot be retrieved later.
async fn create_token(
    repo: Arc<PgTokenRepository>,
    secret: &str,
    name: Option<String>,
    token: Option<String>,
    skip_confirm: bool,
) -> Result<()> {
    println!("{}", "🔑 Create API Token".bright_blue().bold());
    println!();

    let token_name = match name {
        Some(n) => n,
        None => Input::new()
            .with_prompt("Token name")
            .with_initial_text("Ops laptop")
            .interact_text()?,
    };

    let token_value = match token {
        Some(t) => {
            println!("{}", "⚠️  Using provided token value".yellow());
            t
        }
        None => {
            let generated = generate_token();
            println!("{}", "✨ Generated new token".green());
            generated
        }
    };

    println!();
    println!("{}", "Token details:".bright_white().bold());
    println!("  Name:  {}", token_name.cyan());
    println!("  Token: {}", token_value.bright_yellow().bold());
    println!();
    println!(
        "{}",
        "⚠️  IMPORTANT: Save this token now! You won't be able to see it again."
            .red()
            .bold()
    );
    println!();

    if !skip_confirm {
        let confirmed = Confirm::new()
            .with_prompt("Create this token?")
            .default(true)
            .interact()?;

        if !confirmed {
            println!("{}", "❌ Cancelled".red());
            return Ok(());
        }
    }

    let token_hash = hash_token(secret, &token_value);

    repo.create_token(&token_name, &token_hash)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to create token: {}", e))?;

    println!();
    println!("{}", "✅ Token created successfully!".green().bold());
    println!();
    println!("{}", "Example:".bright_white());
    println!(
        "  curl -H \"Authorization: Bearer {}\" http://localhost:3000/api/admin/experts",
        token_value.bright_yellow()
    );
    println!();

    Ok(())
}

async fn list_tokens(repo: Arc<PgTokenRepository>) -> Result<()> {
    println!("{}", "📋 API Tokens".bright_blue().bold());
    println!();

    let tokens = repo
        .list_tokens()
        .await
        .map_err(|e| anyhow::anyhow!("Failed to list tokens: {}", e))?;

    if tokens.is_empty() {
        println!("{}", "  No tokens found".yellow());
        println!();
        println!(
            "  Create one with: {} admin token create",
            "cargo run --bin".bright_cyan()
        );
        return Ok(());
    }

    println!(
        "  {:<4} {:<30} {:<17} {:<17} {:<8}",
        "ID".bright_white().bold(),
        "Name".bright_white().bold(),
        "Created".bright_white().bold(),
        "Last used".bright_white().bold(),
        "Status".bright_white().bold()
    );
    println!("  {}", "─".repeat(80).bright_black());

    for token in &tokens {
        let status = if token.revoked_at.is_some() {
            "REVOKED".red()
        } else {
            "ACTIVE".green()
        };

        let last_used = token
            .last_used_at
            .map(|t| t.format("%Y-%m-%d %H:%M").to_string())
            .unwrap_or_else(|| "never".to_string());

        println!(
            "  {:<4} {:<30} {:<17} {:<17} {}",
            token.id.to_string().bright_black(),
            token.name.cyan(),
            token
                .created_at
                .format("%Y-%m-%d %H:%M")
                .to_string()
                .bright_black(),
            last_used.bright_black(),
            status
        );
    }

    println!();
    println!(
        "  Total: {}",
        tokens.len().to_string().bright_white().bold()
    );
    println!();

    Ok(())
}

/// Revokes a token by name or numeric ID after confirmation.
async fn revoke_token(repo: Arc<PgTokenRepository>, name_or_id: String) -> Result<()> {
    println!("{}", "🔒 Revoke API Token".bright_blue().bold());
    println!();

    let token = match name_or_id.parse::<i64>() {
        Ok(id) => repo
            .list_tokens()
            .await
            .map_err(|e| anyhow::anyhow!("Database error: {}", e))?
            .into_iter()
            .find(|t| t.id == id),
        Err(_) => repo
            .find_by_name(&name_or_id)
            .await
            .map_err(|e| anyhow::anyhow!("Database error: {}", e))?,
    };

    let token = token.context("Token not found")?;

    if token.revoked_at.is_some() {
        println!("{}", "⚠️  This token is already revoked".yellow());
        return Ok(());
    }

    println!("  Token: {}", token.name.cyan());
    println!("  ID:    {}", token.id.to_string().bright_black());
    println!();

    let confirmed = Confirm::new()
        .with_prompt("Revoke this token?")
        .default(false)
        .interact()?;

    if !confirmed {
        println!("{}", "❌ Cancelled".red());
        return Ok(());
    }

    repo.revoke_token(token.id)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to revoke token: {}", e))?;

    println!();
    println!("{}", "✅ Token revoked successfully!".green().bold());
    println!();

    Ok(())
}

async fn handle_expert_action(action: ExpertAction, pool: &PgPool) -> Result<()> {
    let repo = Arc::new(PgExpertRepository::new(Arc::new(pool.clone())));
    let service = ExpertService::new(repo);

    match action {
        ExpertAction::Add {
            email,
            fullname,
            specialization,
            years,
        } => {
            println!("{}", "👤 Onboard Expert".bright_blue().bold());
            println!();

            let email = match email {
                Some(e) => e,
                None => Input::new().with_prompt("Email").interact_text()?,
            };
            let fullname = match fullname {
                Some(f) => f,
                None => Input::new().with_prompt("Full name").interact_text()?,
            };

            let expert = service
                .onboard_expert(NewExpert {
                    email,
                    fullname,
                    specialization,
                    years_of_experience: years,
                })
                .await
                .map_err(|e| anyhow::anyhow!("Failed to onboard expert: {}", e))?;

            println!(
                "{} {} ({})",
                "✅ Expert created with id".green().bold(),
                expert.id.to_string().bright_white().bold(),
                expert.email.cyan()
            );
            println!();
        }
        ExpertAction::List { active } => {
            println!("{}", "📋 Experts".bright_blue().bold());
            println!();

            let experts = service
                .list_experts(active)
                .await
                .map_err(|e| anyhow::anyhow!("Failed to list experts: {}", e))?;

            if experts.is_empty() {
                println!("{}", "  No experts found".yellow());
                return Ok(());
            }

            println!(
                "  {:<5} {:<28} {:<32} {:<20} {:<6} {:<8}",
                "ID".bright_white().bold(),
                "Name".bright_white().bold(),
                "Email".bright_white().bold(),
                "Specialization".bright_white().bold(),
                "Slots".bright_white().bold(),
                "Status".bright_white().bold()
            );
            println!("  {}", "─".repeat(104).bright_black());

            for expert in &experts {
                let status = if expert.active {
                    "ACTIVE".green()
                } else {
                    "INACTIVE".red()
                };

                println!(
                    "  {:<5} {:<28} {:<32} {:<20} {:<6} {}",
                    expert.id.to_string().bright_black(),
                    expert.fullname.cyan(),
                    expert.email,
                    expert.specialization.as_deref().unwrap_or("-"),
                    expert.availability.len(),
                    status
                );
            }

            println!();
            println!(
                "  Total: {}",
                experts.len().to_string().bright_white().bold()
            );
            println!();
        }
    }

    Ok(())
}

async fn handle_db_action(action: DbAction, pool: &PgPool) -> Result<()> {
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

            let experts: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM experts")
                .fetch_one(pool)
                .await?;

            let active_tokens: i64 =
                sqlx::query_scalar("SELECT COUNT(*) FROM api_tokens WHERE revoked_at IS NULL")
                    .fetch_one(pool)
                    .await?;

            println!("  PostgreSQL:    {}", version.bright_white());
            println!(
                "  Experts:       {}",
                experts.to_string().bright_green().bold()
            );
            println!(
                "  Active tokens: {}",
                active_tokens.to_string().bright_green().bold()
            );
            println!();
        }
    }

    Ok(())
}
