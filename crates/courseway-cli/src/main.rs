use std::path::PathBuf;

use clap::{Parser, Subcommand};
use courseway_cli::tools::{expiry_label, fixture_summary, mint_token, password_hash};
use courseway_config::JwtConfig;
use dialoguer::Password;
use dotenvy::dotenv;

#[derive(Parser)]
#[command(name = "courseway-cli")]
#[command(about = "Courseway CLI - Operator tools for the Courseway API", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print a bcrypt hash for a fixture account
    HashPassword {
        /// Password (will be prompted securely if not provided)
        #[arg(short = 'p', long)]
        password: Option<String>,

        /// bcrypt cost factor
        #[arg(short = 'c', long, default_value = "12")]
        cost: u32,
    },
    /// Mint a token signed with JWT_SECRET
    IssueToken {
        #[arg(short = 'u', long)]
        username: String,

        #[arg(short = 'i', long)]
        user_id: i64,
    },
    /// Load a host fixture and report what it contains
    CheckFixture {
        path: PathBuf,
    },
}

fn main() {
    dotenv().ok();

    let cli = Cli::parse();

    let outcome = match cli.command {
        Commands::HashPassword { password, cost } => handle_hash_password(password, cost),
        Commands::IssueToken { username, user_id } => handle_issue_token(&username, user_id),
        Commands::CheckFixture { path } => handle_check_fixture(&path),
    };

    if let Err(e) = outcome {
        eprintln!("\n❌ {:#}", e);
        std::process::exit(1);
    }
}

fn handle_hash_password(password: Option<String>, cost: u32) -> anyhow::Result<()> {
    let password = match password {
        Some(password) => password,
        None => Password::new()
            .with_prompt("Password")
            .with_confirmation("Confirm password", "Passwords don't match")
            .interact()?,
    };

    println!("{}", password_hash(&password, cost)?);
    Ok(())
}

fn handle_issue_token(username: &str, user_id: i64) -> anyhow::Result<()> {
    let jwt_config = JwtConfig::from_env()?;
    let issued = mint_token(username, user_id, &jwt_config)?;

    println!("✅ Token issued for {} (id {})", username, user_id);
    println!("   Expires: {}", expiry_label(issued.expires));
    println!("{}", issued.token);
    Ok(())
}

fn handle_check_fixture(path: &std::path::Path) -> anyhow::Result<()> {
    let summary = fixture_summary(path)?;
    println!("✅ {}: {}", path.display(), summary);
    Ok(())
}
