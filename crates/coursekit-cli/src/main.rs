use anyhow::Context;
use clap::{Parser, Subcommand};
use dialoguer::Input;
use dotenvy::dotenv;
use uuid::Uuid;

use coursekit_auth::{UserRole, create_access_token};
use coursekit_cli::seeder::{self, PagesPerCourse, SeedConfig};
use coursekit_config::JwtConfig;
use coursekit_db::init_db_pool;

#[derive(Parser)]
#[command(name = "coursekit-cli")]
#[command(about = "Coursekit CLI - Administrative tools for Coursekit", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Mint an access token signed with JWT_SECRET
    IssueToken {
        /// Email address (prompted if not provided)
        #[arg(short = 'e', long)]
        email: Option<String>,

        /// Role: admin or user
        #[arg(short = 'r', long, default_value = "admin")]
        role: UserRole,

        /// Subject id; random when omitted
        #[arg(long)]
        user_id: Option<Uuid>,
    },
    /// Seed the database with fake courses, modules and pages
    Seed {
        /// Number of courses to create
        #[arg(short = 'c', long, default_value = "5")]
        courses: usize,

        /// Number of modules per course
        #[arg(long, default_value = "4")]
        modules: usize,

        /// Number of pages per parent (and root pages per course)
        #[arg(long, default_value = "3")]
        pages: usize,

        /// Levels of page nesting
        #[arg(long, default_value = "2")]
        depth: usize,
    },
    /// Clear all courses (modules and pages cascade)
    ClearSeed,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();

    let cli = Cli::parse();

    match cli.command {
        Commands::IssueToken {
            email,
            role,
            user_id,
        } => handle_issue_token(email, role, user_id),
        Commands::Seed {
            courses,
            modules,
            pages,
            depth,
        } => {
            let config = SeedConfig::new(courses)
                .with_modules(modules)
                .with_pages(PagesPerCourse {
                    per_parent: pages,
                    depth,
                });
            let pool = init_db_pool().await?;
            seeder::seed_database(&pool, &config).await
        }
        Commands::ClearSeed => {
            let pool = init_db_pool().await?;
            seeder::clear_seeded_data(&pool).await
        }
    }
}

fn handle_issue_token(
    email: Option<String>,
    role: UserRole,
    user_id: Option<Uuid>,
) -> anyhow::Result<()> {
    let email = match email {
        Some(email) => email,
        None => Input::new()
            .with_prompt("Email address")
            .interact_text()
            .context("Failed to read email")?,
    };

    let jwt_config = JwtConfig::from_env();
    let user_id = user_id.unwrap_or_else(Uuid::new_v4);

    let token = create_access_token(user_id, &email, role, &jwt_config)
        .map_err(|e| anyhow::anyhow!("{}", e.error))?;

    eprintln!(
        "✅ Token for {} ({}), valid for {}s",
        email, role, jwt_config.access_token_expiry
    );
    println!("{}", token);
    Ok(())
}
