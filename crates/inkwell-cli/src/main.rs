use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing::info;

use inkwell_db::Database;
use inkwell_db::migrations;
use inkwell_db::queries::table_counts;

mod commands;

#[derive(Debug, Parser)]
#[command(name = "inkwell", version, about = "Profiles, articles and claps in a SQLite store")]
struct Cli {
    /// SQLite database file
    #[arg(long, env = "INKWELL_DB_PATH", default_value = "inkwell.db")]
    db_path: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Create or upgrade the schema
    Migrate,

    /// Register a profile with a freshly salted password hash
    AddProfile {
        #[arg(long)]
        full_name: String,
        #[arg(long)]
        caption: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        phone: Option<String>,
        #[arg(long, env = "INKWELL_PASSWORD", hide_env_values = true)]
        password: String,
    },

    /// Check a password against a registered profile
    Login {
        #[arg(long)]
        email: String,
        #[arg(long, env = "INKWELL_PASSWORD", hide_env_values = true)]
        password: String,
    },

    /// Publish an article
    AddArticle {
        #[arg(long)]
        author: String,
        #[arg(long)]
        content: String,
    },

    /// Clap for an article
    Clap {
        #[arg(long)]
        article: String,
        #[arg(long)]
        profile: String,
    },

    /// Print every article with its author and claps as JSON
    Export {
        #[arg(long)]
        pretty: bool,
    },

    /// Print row counts per table
    Stats,
}

fn main() -> anyhow::Result<()> {
    // Load .env if present
    let _ = dotenvy::dotenv();

    // Logs go to stderr so export output stays clean
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "inkwell=info".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let mut db = Database::open(&cli.db_path)?;

    match cli.command {
        Command::Migrate => {
            let version = db.with_conn(migrations::current_version)?;
            info!("Schema at version {}", version);
        }
        Command::AddProfile {
            full_name,
            caption,
            email,
            phone,
            password,
        } => {
            let profile = commands::add_profile(
                &db,
                commands::NewProfile {
                    full_name: &full_name,
                    caption: &caption,
                    email: &email,
                    phone: phone.as_deref(),
                    password: &password,
                },
            )?;
            println!("{}", profile.id());
        }
        Command::Login { email, password } => {
            let profile = commands::login(&db, &email, &password)?;
            println!("{}", profile.id());
        }
        Command::AddArticle { author, content } => {
            let article = commands::add_article(&mut db, &author, &content)?;
            println!("{}", article.id());
        }
        Command::Clap { article, profile } => {
            commands::add_clap(&mut db, &article, &profile)?;
        }
        Command::Export { pretty } => {
            let export = commands::export(&db)?;
            let out = if pretty {
                serde_json::to_string_pretty(&export)?
            } else {
                serde_json::to_string(&export)?
            };
            println!("{}", out);
        }
        Command::Stats => {
            let counts = db.with_conn(table_counts)?;
            println!("profiles: {}", counts.profiles);
            println!("articles: {}", counts.articles);
            println!("claps:    {}", counts.claps);
        }
    }

    Ok(())
}
