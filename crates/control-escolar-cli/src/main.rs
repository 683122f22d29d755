use clap::{Parser, Subcommand};
use dialoguer::{Input, Password};
use dotenvy::dotenv;
use sqlx::PgPool;

use control_escolar_cli::admin::{NewAdmin, create_admin};
use control_escolar_cli::seeder::{self, SeedConfig};
use control_escolar_db::init_db_pool;
use control_escolar_models::role_groups;

#[derive(Parser)]
#[command(name = "control-escolar-cli")]
#[command(about = "Control Escolar CLI - Administrative tools for Control Escolar", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create an administrator account
    CreateAdmin {
        /// First name of the administrator
        #[arg(short = 'f', long)]
        first_name: Option<String>,

        /// Last name of the administrator
        #[arg(short = 'l', long)]
        last_name: Option<String>,

        /// Email address, also used as the username
        #[arg(short = 'e', long)]
        email: Option<String>,

        /// Password (will be prompted securely if not provided)
        #[arg(short = 'p', long)]
        password: Option<String>,

        /// Role group the account joins
        #[arg(long, default_value = role_groups::ADMIN)]
        role: String,
    },
    /// Seed the database with fake teachers and courses
    Seed {
        /// Number of teachers to create
        #[arg(short = 't', long, default_value = "10")]
        teachers: usize,

        /// Number of courses to create, assigned round-robin to the new teachers
        #[arg(short = 'c', long, default_value = "30")]
        courses: usize,
    },
    /// Clear all seeded teachers, accounts and courses
    ClearSeed,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();

    let cli = Cli::parse();
    let pool = init_db_pool().await?;

    match cli.command {
        Commands::CreateAdmin {
            first_name,
            last_name,
            email,
            password,
            role,
        } => handle_create_admin(&pool, first_name, last_name, email, password, role).await,
        Commands::Seed { teachers, courses } => {
            handle_seed(&pool, SeedConfig::new(teachers, courses)).await
        }
        Commands::ClearSeed => handle_clear_seed(&pool).await,
    }
}

async fn handle_create_admin(
    pool: &PgPool,
    first_name: Option<String>,
    last_name: Option<String>,
    email: Option<String>,
    password: Option<String>,
    role: String,
) -> anyhow::Result<()> {
    let first_name = match first_name {
        Some(value) => value,
        None => Input::new().with_prompt("First name").interact_text()?,
    };

    let last_name = match last_name {
        Some(value) => value,
        None => Input::new().with_prompt("Last name").interact_text()?,
    };

    let email = match email {
        Some(value) => value,
        None => Input::new().with_prompt("Email address").interact_text()?,
    };

    let password = match password {
        Some(value) => value,
        None => Password::new()
            .with_prompt("Password")
            .with_confirmation("Confirm password", "Passwords don't match")
            .interact()?,
    };

    let admin = NewAdmin {
        first_name,
        last_name,
        email,
        password,
        role,
    };

    match create_admin(pool, &admin).await {
        Ok(user_id) => {
            println!("\n✅ Administrator created successfully!");
            println!("   ID: {}", user_id);
            println!("   Email: {}", admin.email);
            println!("   Name: {} {}", admin.first_name, admin.last_name);
            println!("   Role group: {}", admin.role);
            Ok(())
        }
        Err(e) => {
            eprintln!("\n❌ Error creating administrator: {:#}", e);
            std::process::exit(1);
        }
    }
}

async fn handle_seed(pool: &PgPool, config: SeedConfig) -> anyhow::Result<()> {
    match seeder::seed_all(pool, config).await {
        Ok(summary) => {
            println!(
                "✅ Seeded {} teachers and {} courses",
                summary.teacher_ids.len(),
                summary.courses
            );
            Ok(())
        }
        Err(e) => {
            eprintln!("\n❌ Error seeding database: {:#}", e);
            std::process::exit(1);
        }
    }
}

async fn handle_clear_seed(pool: &PgPool) -> anyhow::Result<()> {
    match seeder::clear_all(pool).await {
        Ok(summary) => {
            println!(
                "✅ Cleared {} seeded accounts and {} seeded courses",
                summary.accounts, summary.courses
            );
            Ok(())
        }
        Err(e) => {
            eprintln!("\n❌ Error clearing seeded data: {:#}", e);
            std::process::exit(1);
        }
    }
}
