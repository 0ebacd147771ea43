mod config;
mod db;
mod error;
mod models;
mod operations;

use chrono::{DateTime, NaiveDate, Utc};
use clap::{Parser, Subcommand};
use config::AppConfig;
use db::repository::{LocalStorageRepository, TransactionRepository};
use db::settings_repository;
use error::{AppError, ExportError, FormError};
use models::template::DashboardTemplate;
use models::transaction::TransactionType;
use operations::add::{
    TransactionInput, add_transaction_to_store, parse_details, parse_type,
};
use operations::aggregate::YearScope;
use operations::{dashboard, export, summary};
use rusqlite::Connection;
use std::io;
use std::path::PathBuf;
use std::process;

#[derive(Parser)]
#[command(name = "fintrack")]
#[command(about = "Personal income and expense tracker")]
#[command(version)]
struct Cli {
    /// Storage file holding transactions and settings
    #[arg(long, env = "FINTRACK_DB")]
    db: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Quiet output (errors only)
    #[arg(short, long)]
    quiet: bool,

    /// Without a subcommand an interactive prompt is started
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Record a new transaction
    Add {
        #[arg(long, allow_hyphen_values = true)]
        amount: String,
        /// income or expense
        #[arg(long = "type", default_value = "expense")]
        transaction_type: String,
        #[arg(long)]
        category: String,
        #[arg(long)]
        description: Option<String>,
        /// YYYY-MM-DD or RFC 3339; defaults to now
        #[arg(long)]
        date: Option<String>,
    },
    /// List every transaction in the order it was recorded
    List,
    /// Print the dashboard as text
    Summary {
        #[arg(long)]
        template: Option<String>,
        /// Last month of the monthly trend (YYYY-MM-DD); defaults to today
        #[arg(long)]
        as_of: Option<String>,
        /// Only count transactions from the reference year in the monthly trend
        #[arg(long)]
        this_year_only: bool,
    },
    /// Open the interactive terminal dashboard
    Dashboard {
        #[arg(long)]
        template: Option<String>,
        #[arg(long)]
        this_year_only: bool,
    },
    /// Write all stored transactions to a JSON file
    Export {
        #[arg(long, default_value = ".")]
        dir: PathBuf,
    },
    /// Show or change the dashboard template
    Template {
        #[command(subcommand)]
        action: TemplateAction,
    },
    /// Show the categories available for each transaction type
    Categories {
        #[arg(long = "type")]
        transaction_type: Option<String>,
    },
}

#[derive(Subcommand)]
enum TemplateAction {
    Get,
    /// default, minimal or detailed
    Set { name: String },
    Reset,
}

fn main() {
    let cli = Cli::parse();
    let config = AppConfig::new(cli.db, cli.verbose, cli.quiet);
    config.init_logging();

    let conn = match db::connection::establish_connection(&config.db_path) {
        Ok(conn) => conn,
        Err(e) => {
            eprintln!("Error opening storage '{}': {}", config.db_path.display(), e);
            process::exit(1);
        }
    };

    let result = match cli.command {
        Some(command) => run_command(&conn, command),
        None => {
            run_interactive(&conn);
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

fn run_command(conn: &Connection, command: Commands) -> Result<(), AppError> {
    let repo = LocalStorageRepository::new(conn);
    match command {
        Commands::Add {
            amount,
            transaction_type,
            category,
            description,
            date,
        } => {
            let input = TransactionInput {
                amount,
                transaction_type: Some(transaction_type),
                category,
                description,
                date,
            };
            handle_add(&repo, &input)
        }
        Commands::List => handle_list(&repo),
        Commands::Summary {
            template,
            as_of,
            this_year_only,
        } => {
            let template = resolve_template(conn, template.as_deref())?;
            let reference = match as_of {
                Some(raw) => parse_reference_date(&raw)?,
                None => Utc::now(),
            };
            let transactions = repo.load()?;
            let scope = year_scope(this_year_only);
            print!(
                "{}",
                summary::render_summary(template, &transactions, reference, scope)
            );
            Ok(())
        }
        Commands::Dashboard {
            template,
            this_year_only,
        } => {
            let template = resolve_template(conn, template.as_deref())?;
            let transactions = repo.load()?;
            let scope = year_scope(this_year_only);
            dashboard::run_dashboard(&transactions, template, Utc::now(), scope)
        }
        Commands::Export { dir } => handle_export(&repo, &dir),
        Commands::Template { action } => match action {
            TemplateAction::Get => {
                let current = settings_repository::get_template(conn)?;
                let available: Vec<&str> = DashboardTemplate::ALL.iter().map(|t| t.id()).collect();
                println!("{} (available: {})", current, available.join(", "));
                Ok(())
            }
            TemplateAction::Set { name } => handle_set_template(conn, &name),
            TemplateAction::Reset => {
                settings_repository::clear_template(conn)?;
                println!("Dashboard template reset to {}.", DashboardTemplate::default());
                Ok(())
            }
        },
        Commands::Categories { transaction_type } => {
            let types = match transaction_type {
                Some(raw) => vec![parse_type(&raw)?],
                None => vec![TransactionType::Expense, TransactionType::Income],
            };
            for kind in types {
                println!("{}: {}", kind, kind.categories().join(", "));
            }
            Ok(())
        }
    }
}

fn handle_add(repo: &impl TransactionRepository, input: &TransactionInput) -> Result<(), AppError> {
    let transaction = add_transaction_to_store(repo, input, Utc::now())?;
    println!(
        "Transaction added. Your {} has been successfully recorded ({}).",
        transaction.transaction_type, transaction.id
    );
    Ok(())
}

fn handle_list(repo: &impl TransactionRepository) -> Result<(), AppError> {
    let transactions = repo.load()?;
    if transactions.is_empty() {
        println!("No transactions yet. Use `add` to get started.");
    }
    for transaction in &transactions {
        println!("{}", summary::transaction_line(transaction));
    }
    Ok(())
}

fn handle_export(
    repo: &impl TransactionRepository,
    dir: &std::path::Path,
) -> Result<(), AppError> {
    match export::export_transactions(repo, dir, Utc::now().date_naive()) {
        Ok(path) => {
            println!(
                "Export successful. Your transactions have been exported to {}",
                path.display()
            );
            Ok(())
        }
        Err(ExportError::NoData) => {
            println!("No data to export. You don't have any transactions to export yet.");
            Ok(())
        }
        Err(e) => Err(e.into()),
    }
}

fn handle_set_template(conn: &Connection, name: &str) -> Result<(), AppError> {
    let template: DashboardTemplate = name.parse()?;
    settings_repository::set_template(conn, template)?;
    println!("Dashboard template set to {}.", template);
    Ok(())
}

/// Flag first, then the stored choice, then the default layout.
fn resolve_template(conn: &Connection, flag: Option<&str>) -> Result<DashboardTemplate, AppError> {
    match flag {
        Some(name) => Ok(name.parse()?),
        None => Ok(settings_repository::get_template(conn)?),
    }
}

fn year_scope(this_year_only: bool) -> YearScope {
    if this_year_only {
        YearScope::ReferenceYear
    } else {
        YearScope::AnyYear
    }
}

fn parse_reference_date(raw: &str) -> Result<DateTime<Utc>, AppError> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|d| d.and_utc())
        .ok_or_else(|| FormError::InvalidDate(raw.to_string()).into())
}

pub enum UserCommands {
    Add,
    List,
    Summary,
    Dashboard,
    Export,
    Template,
    Exit,
    Unknown,
}

fn run_interactive(conn: &Connection) {
    println!("Welcome to the finance tracker!");
    let repo = LocalStorageRepository::new(conn);

    loop {
        println!("Please enter a command (add, list, summary, dashboard, export, template, exit):");

        let input = match read_user_input() {
            Ok(cmd) => cmd,
            Err(e) => {
                println!("Error reading input: {}", e);
                continue;
            }
        };
        let parts: Vec<&str> = input.split_whitespace().collect();
        if parts.is_empty() {
            continue;
        }

        let result = match check_for_command(parts[0]) {
            UserCommands::Add => {
                println!(
                    "Please enter transaction details in the format:\n\
                     amount, type(income/expense), category[, description[, date(YYYY-MM-DD)]]\n\
                     The description may contain commas."
                );
                let details = match read_user_input() {
                    Ok(details) => details,
                    Err(e) => {
                        println!("Error reading input: {}", e);
                        continue;
                    }
                };
                parse_details(&details)
                    .map_err(AppError::from)
                    .and_then(|input| handle_add(&repo, &input))
            }
            UserCommands::List => handle_list(&repo),
            UserCommands::Summary => {
                resolve_template(conn, parts.get(1).copied()).and_then(|template| {
                    let transactions = repo.load()?;
                    print!(
                        "{}",
                        summary::render_summary(
                            template,
                            &transactions,
                            Utc::now(),
                            YearScope::AnyYear
                        )
                    );
                    Ok(())
                })
            }
            UserCommands::Dashboard => {
                resolve_template(conn, parts.get(1).copied()).and_then(|template| {
                    let transactions = repo.load()?;
                    dashboard::run_dashboard(
                        &transactions,
                        template,
                        Utc::now(),
                        YearScope::AnyYear,
                    )
                })
            }
            UserCommands::Export => {
                let dir = parts.get(1).copied().unwrap_or(".");
                handle_export(&repo, std::path::Path::new(dir))
            }
            UserCommands::Template => match parts.get(1) {
                Some(name) => handle_set_template(conn, name),
                None => settings_repository::get_template(conn)
                    .map(|template| println!("Current template: {}", template))
                    .map_err(AppError::from),
            },
            UserCommands::Exit => {
                println!("Exiting the application.");
                break;
            }
            UserCommands::Unknown => {
                println!("No valid command found: {}", parts[0]);
                Ok(())
            }
        };

        if let Err(e) = result {
            println!("Error: {}", e);
            println!("Please try again.");
        }
    }
}

fn read_user_input() -> Result<String, String> {
    let mut input = String::new();
    let read = io::stdin()
        .read_line(&mut input)
        .map_err(|_| "Failed to read line".to_string())?;
    if read == 0 {
        // end of input behaves like `exit`
        return Ok("exit".to_string());
    }
    Ok(input.trim().to_string())
}

fn check_for_command(input: &str) -> UserCommands {
    match input {
        "add" => UserCommands::Add,
        "list" | "print" => UserCommands::List,
        "summary" => UserCommands::Summary,
        "dashboard" => UserCommands::Dashboard,
        "export" => UserCommands::Export,
        "template" => UserCommands::Template,
        "exit" | "quit" => UserCommands::Exit,
        _ => UserCommands::Unknown,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::connection::establish_test_connection;
    use chrono::TimeZone;

    #[test]
    fn test_check_for_command() {
        assert!(matches!(check_for_command("add"), UserCommands::Add));
        assert!(matches!(check_for_command("print"), UserCommands::List));
        assert!(matches!(check_for_command("quit"), UserCommands::Exit));
        assert!(matches!(check_for_command("remove"), UserCommands::Unknown));
    }

    #[test]
    fn test_resolve_template_prefers_flag() {
        let conn = establish_test_connection().unwrap();
        settings_repository::set_template(&conn, DashboardTemplate::Minimal).unwrap();

        assert_eq!(
            resolve_template(&conn, Some("detailed")).unwrap(),
            DashboardTemplate::Detailed
        );
        assert_eq!(resolve_template(&conn, None).unwrap(), DashboardTemplate::Minimal);
    }

    #[test]
    fn test_resolve_template_rejects_unknown_flag() {
        let conn = establish_test_connection().unwrap();
        assert!(matches!(
            resolve_template(&conn, Some("fancy")),
            Err(AppError::Storage(_))
        ));
    }

    #[test]
    fn test_parse_reference_date() {
        assert_eq!(
            parse_reference_date("2025-03-15").unwrap(),
            Utc.with_ymd_and_hms(2025, 3, 15, 0, 0, 0).unwrap()
        );
        assert!(parse_reference_date("March").is_err());
    }

    #[test]
    fn test_year_scope_flag() {
        assert_eq!(year_scope(true), YearScope::ReferenceYear);
        assert_eq!(year_scope(false), YearScope::AnyYear);
    }

    #[test]
    fn test_cli_parses_add() {
        let cli = Cli::try_parse_from([
            "fintrack", "add", "--amount", "12.5", "--type", "income", "--category", "Salary",
        ])
        .unwrap();
        match cli.command {
            Some(Commands::Add {
                amount,
                transaction_type,
                category,
                ..
            }) => {
                assert_eq!(amount, "12.5");
                assert_eq!(transaction_type, "income");
                assert_eq!(category, "Salary");
            }
            _ => panic!("expected add command"),
        }
    }

    #[test]
    fn test_run_command_add_then_export() {
        let conn = establish_test_connection().unwrap();
        let dir = tempfile::tempdir().unwrap();

        run_command(
            &conn,
            Commands::Add {
                amount: "50".to_string(),
                transaction_type: "expense".to_string(),
                category: "Food".to_string(),
                description: None,
                date: Some("2025-01-10".to_string()),
            },
        )
        .unwrap();
        run_command(
            &conn,
            Commands::Export {
                dir: dir.path().to_path_buf(),
            },
        )
        .unwrap();

        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 1);
        assert_eq!(LocalStorageRepository::new(&conn).load().unwrap().len(), 1);
    }

    #[test]
    fn test_run_command_add_invalid_amount() {
        let conn = establish_test_connection().unwrap();
        let result = run_command(
            &conn,
            Commands::Add {
                amount: "-3".to_string(),
                transaction_type: "expense".to_string(),
                category: "Food".to_string(),
                description: None,
                date: None,
            },
        );
        assert!(matches!(result, Err(AppError::Form(FormError::InvalidAmount(_)))));
    }
}
