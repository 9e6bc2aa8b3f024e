//! LibraryHub CLI - command-line front-end for the LibraryHub REST API

use std::sync::Arc;

use anyhow::Context;
use chrono::{Local, NaiveDate};
use clap::{Args, Parser, Subcommand};
use serde::Serialize;
use serde_json::json;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt::writer::BoxMakeWriter, layer::SubscriberExt, util::SubscriberInitExt};

use libraryhub::{
    config::{AppConfig, LoggingConfig},
    models::{
        BookStatus, ChangePassword, CreateBook, CreateLoan, Language, Login, Register, Role,
        UpdateBook, UpdateLoan, UpdateUser, UserLanguage,
    },
    services::{notify::TracingNotifier, Services},
    AppError, AppState,
};

#[derive(Parser)]
#[command(name = "libraryhub", version, about = "LibraryHub library management client")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Sign in and remember the session
    Login {
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
    },
    /// Create an account and sign in with it
    Register {
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
        #[arg(long)]
        password_confirm: String,
    },
    /// Forget the stored session
    Logout,
    /// Show whether a session is stored
    Status,
    ChangePassword {
        #[arg(long)]
        current: String,
        #[arg(long = "new")]
        new_password: String,
        #[arg(long)]
        confirm: String,
    },
    #[command(subcommand)]
    Books(BookCommand),
    #[command(subcommand)]
    Loans(LoanCommand),
    #[command(subcommand)]
    Users(UserCommand),
}

#[derive(Subcommand)]
enum BookCommand {
    List,
    Get { id: i64 },
    Create(BookFields),
    Update {
        id: i64,
        #[command(flatten)]
        fields: BookUpdateFields,
    },
    Delete { id: i64 },
}

#[derive(Args)]
struct BookFields {
    #[arg(long)]
    title: String,
    #[arg(long)]
    publisher: String,
    /// e.g. english, ukrainian, or the catalogue name
    #[arg(long)]
    language: Language,
    #[arg(long)]
    year: i32,
    #[arg(long)]
    location: String,
    #[arg(long, default_value = "new")]
    status: BookStatus,
}

#[derive(Args)]
struct BookUpdateFields {
    #[arg(long)]
    title: Option<String>,
    #[arg(long)]
    publisher: Option<String>,
    #[arg(long)]
    language: Option<Language>,
    #[arg(long)]
    year: Option<i32>,
    #[arg(long)]
    location: Option<String>,
    #[arg(long)]
    status: Option<BookStatus>,
}

#[derive(Subcommand)]
enum LoanCommand {
    List,
    Get { id: i64 },
    Create {
        #[arg(long)]
        book_id: i64,
        #[arg(long)]
        user_id: i64,
        /// YYYY-MM-DD, defaults to today
        #[arg(long)]
        issue_date: Option<NaiveDate>,
        /// YYYY-MM-DD
        #[arg(long)]
        due_date: NaiveDate,
    },
    Update {
        id: i64,
        #[arg(long)]
        issue_date: Option<NaiveDate>,
        #[arg(long)]
        due_date: Option<NaiveDate>,
        #[arg(long)]
        returned: Option<bool>,
        #[arg(long)]
        return_date: Option<NaiveDate>,
        #[arg(long)]
        user_id: Option<i64>,
        #[arg(long)]
        book_id: Option<i64>,
    },
    /// Mark a loan as returned
    Return {
        id: i64,
        /// YYYY-MM-DD, defaults to today
        #[arg(long)]
        date: Option<NaiveDate>,
    },
    Delete { id: i64 },
}

#[derive(Subcommand)]
enum UserCommand {
    List,
    Get { id: i64 },
    Update {
        id: i64,
        #[arg(long)]
        email: Option<String>,
        #[arg(long, conflicts_with = "clear_username")]
        username: Option<String>,
        #[arg(long)]
        clear_username: bool,
        #[arg(long, conflicts_with = "clear_name")]
        name: Option<String>,
        #[arg(long)]
        clear_name: bool,
        #[arg(long)]
        role: Option<Role>,
        #[arg(long)]
        language: Option<UserLanguage>,
    },
    Delete { id: i64 },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let config = AppConfig::load().context("Failed to load configuration")?;
    let _log_guard = init_tracing(&config.logging);

    tracing::debug!("Starting LibraryHub client v{}", env!("CARGO_PKG_VERSION"));

    let services = Services::from_config(&config, Arc::new(TracingNotifier))?;
    let state = AppState {
        config: Arc::new(config),
        services,
    };

    if let Err(e) = run(cli.command, &state).await {
        if let Some(app_error) = e.downcast_ref::<AppError>() {
            if app_error.is_unauthorized() {
                eprintln!("Not signed in or session expired. Run `libraryhub login`.");
            }
        }
        return Err(e);
    }

    Ok(())
}

fn init_tracing(logging: &LoggingConfig) -> Option<WorkerGuard> {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| format!("libraryhub={}", logging.level).into());

    let (writer, guard) = match &logging.directory {
        Some(directory) => {
            let appender = tracing_appender::rolling::daily(directory, "libraryhub.log");
            let (writer, guard) = tracing_appender::non_blocking(appender);
            (BoxMakeWriter::new(writer), Some(guard))
        }
        None => (BoxMakeWriter::new(std::io::stderr), None),
    };

    let registry = tracing_subscriber::registry().with(filter);
    if logging.format == "json" {
        registry
            .with(tracing_subscriber::fmt::layer().json().with_writer(writer))
            .init();
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_writer(writer))
            .init();
    }

    guard
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

async fn run(command: Command, state: &AppState) -> anyhow::Result<()> {
    let services = &state.services;

    match command {
        Command::Login { email, password } => {
            let response = services.auth.login(&Login { email, password }).await?;
            match response.user {
                Some(user) => println!("Signed in as {}", user.email),
                None => println!("Signed in"),
            }
        }
        Command::Register {
            email,
            password,
            password_confirm,
        } => {
            services
                .auth
                .register(&Register {
                    email,
                    password,
                    password_confirm,
                })
                .await?;
            println!("Account created");
        }
        Command::Logout => {
            services.auth.logout();
            println!("Signed out");
        }
        Command::Status => {
            print_json(&json!({
                "authenticated": services.session.is_authenticated(),
                "api": services.client.base_url().as_str(),
                "session_file": state.config.session_path(),
            }))?;
        }
        Command::ChangePassword {
            current,
            new_password,
            confirm,
        } => {
            services
                .auth
                .change_password(&ChangePassword {
                    password: current,
                    password_new: new_password,
                    password_confirm: confirm,
                })
                .await?;
            println!("Password changed");
        }
        Command::Books(command) => run_books(command, services).await?,
        Command::Loans(command) => run_loans(command, services).await?,
        Command::Users(command) => run_users(command, services).await?,
    }

    Ok(())
}

async fn run_books(command: BookCommand, services: &Services) -> anyhow::Result<()> {
    match command {
        BookCommand::List => print_json(&services.books.list().await?),
        BookCommand::Get { id } => print_json(&services.books.get(id).await?),
        BookCommand::Create(fields) => {
            let book = CreateBook {
                title: fields.title,
                publisher: fields.publisher,
                language: fields.language,
                year: fields.year,
                location: fields.location,
                status: fields.status,
            };
            print_json(&services.books.create(&book).await?)
        }
        BookCommand::Update { id, fields } => {
            let update = UpdateBook {
                title: fields.title,
                publisher: fields.publisher,
                language: fields.language,
                year: fields.year,
                location: fields.location,
                status: fields.status,
            };
            print_json(&services.books.update(id, &update).await?)
        }
        BookCommand::Delete { id } => {
            services.books.delete(id).await?;
            println!("Book {} deleted", id);
            Ok(())
        }
    }
}

async fn run_loans(command: LoanCommand, services: &Services) -> anyhow::Result<()> {
    let today = || Local::now().date_naive();

    match command {
        LoanCommand::List => print_json(&services.loans.list().await?),
        LoanCommand::Get { id } => print_json(&services.loans.get(id).await?),
        LoanCommand::Create {
            book_id,
            user_id,
            issue_date,
            due_date,
        } => {
            let loan = CreateLoan {
                issue_date: issue_date.unwrap_or_else(today),
                due_date,
                is_returned: None,
                return_date: None,
                user_id,
                book_id,
            };
            print_json(&services.loans.create(&loan).await?)
        }
        LoanCommand::Update {
            id,
            issue_date,
            due_date,
            returned,
            return_date,
            user_id,
            book_id,
        } => {
            let update = UpdateLoan {
                issue_date,
                due_date,
                is_returned: returned,
                return_date,
                user_id,
                book_id,
            };
            print_json(&services.loans.update(id, &update).await?)
        }
        LoanCommand::Return { id, date } => {
            let date = date.unwrap_or_else(today);
            print_json(&services.loans.mark_returned(id, date).await?)
        }
        LoanCommand::Delete { id } => {
            services.loans.delete(id).await?;
            println!("Loan {} deleted", id);
            Ok(())
        }
    }
}

async fn run_users(command: UserCommand, services: &Services) -> anyhow::Result<()> {
    match command {
        UserCommand::List => print_json(&services.users.list().await?),
        UserCommand::Get { id } => print_json(&services.users.get(id).await?),
        UserCommand::Update {
            id,
            email,
            username,
            clear_username,
            name,
            clear_name,
            role,
            language,
        } => {
            let update = UpdateUser {
                email,
                username: if clear_username { Some(None) } else { username.map(Some) },
                name: if clear_name { Some(None) } else { name.map(Some) },
                role,
                language,
            };
            print_json(&services.users.update(id, &update).await?)
        }
        UserCommand::Delete { id } => {
            services.users.delete(id).await?;
            println!("User {} deleted", id);
            Ok(())
        }
    }
}
