use anyhow::{Context, Result};
use chrono::Utc;
use clap::{Args, Parser, Subcommand};
use std::time::Duration;
use uuid::Uuid;

use crate::application::{
    AppError, FinanceService, MonthlyReport, Settings, DEFAULT_DATABASE, DEFAULT_REPORT_PREFIX,
};
use crate::domain::{
    format_cents, suggested_categories, year_options, DenialReason, EntryDraft, LoginProvider,
    MonthPeriod, TransactionKind,
};
use crate::io::NoteQuoting;
use crate::logging::init_tracing;

/// Tallybook - Monthly income and expense tracker
#[derive(Parser)]
#[command(name = "tallybook")]
#[command(about = "A local-first tracker for monthly income, expenses and spending by category")]
#[command(version)]
pub struct Cli {
    /// Database file path
    #[arg(short, long, global = true, default_value = DEFAULT_DATABASE)]
    pub database: String,

    /// Prefix of exported report file names
    #[arg(long, global = true, default_value = DEFAULT_REPORT_PREFIX)]
    pub report_prefix: String,

    /// Duration of the simulated cloud sync, in milliseconds
    #[arg(long, global = true, default_value_t = 2000)]
    pub sync_delay_ms: u64,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Month selection shared by the reporting commands.
#[derive(Args, Debug, Clone, Copy)]
pub struct PeriodArgs {
    /// Month number 1-12 (defaults to the current month)
    #[arg(short, long)]
    pub month: Option<u32>,

    /// Year (defaults to the current year)
    #[arg(short, long)]
    pub year: Option<i32>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Sign in with a mock account (google or email)
    Login {
        /// Provider: google, email
        provider: String,
    },

    /// Sign out
    Logout,

    /// Show the signed-in account
    Whoami,

    /// Upgrade the signed-in account to PRO
    Upgrade,

    /// Record an income or expense
    Add {
        /// Amount (e.g., "12.50" or "12")
        amount: String,

        /// Type: income, expense
        #[arg(short = 't', long = "type", default_value = "expense")]
        kind: String,

        /// Category (see `tallybook categories` for suggestions)
        #[arg(short, long)]
        category: Option<String>,

        /// Date (YYYY-MM-DD, defaults to today)
        #[arg(long)]
        date: Option<String>,

        /// Free-text note
        #[arg(short, long)]
        note: Option<String>,
    },

    /// Delete a transaction
    Delete {
        /// Transaction ID
        id: String,
    },

    /// List the transactions of a month, most recent first
    List {
        #[command(flatten)]
        period: PeriodArgs,
    },

    /// Show income, expense and balance for a month
    Summary {
        #[command(flatten)]
        period: PeriodArgs,
    },

    /// Show spending per category for a month
    Breakdown {
        #[command(flatten)]
        period: PeriodArgs,
    },

    /// Export a month as CSV (PRO)
    Export {
        #[command(flatten)]
        period: PeriodArgs,

        /// Output file, "-" for stdout (defaults to the report file name)
        #[arg(short, long)]
        output: Option<String>,

        /// Double embedded quotes in notes so the file is standard CSV
        #[arg(long)]
        escape_quotes: bool,
    },

    /// Import transactions from an exported CSV file
    Import {
        /// Input file (stdin if omitted)
        #[arg(short, long)]
        input: Option<String>,

        /// Validate without importing
        #[arg(long)]
        dry_run: bool,
    },

    /// Sync data to the cloud (PRO)
    Sync,

    /// List suggested categories
    Categories {
        /// Type: income, expense (omit for both)
        #[arg(short = 't', long = "type")]
        kind: Option<String>,
    },
}

impl Cli {
    fn settings(&self) -> Settings {
        Settings::default()
            .with_database(self.database.clone())
            .with_report_prefix(self.report_prefix.clone())
            .with_sync_delay(Duration::from_millis(self.sync_delay_ms))
    }

    pub async fn run(self) -> Result<()> {
        init_tracing(self.verbose);

        let service = FinanceService::open(self.settings()).await?;

        match self.command {
            Commands::Login { provider } => {
                let provider = LoginProvider::from_str(&provider).ok_or_else(|| {
                    anyhow::anyhow!("Invalid provider '{}'. Valid providers: google, email", provider)
                })?;
                let user = service.login(provider).await?;
                println!("Signed in as {} <{}>", user.name, user.email);
            }

            Commands::Logout => {
                service.logout().await?;
                println!("Signed out.");
            }

            Commands::Whoami => match service.current_user().await {
                Some(user) => {
                    println!("{} <{}>", user.name, user.email);
                    println!("  ID:   {}", user.id);
                    println!("  Plan: {}", if user.is_pro { "PRO" } else { "Free" });
                }
                None => println!("Not signed in."),
            },

            Commands::Upgrade => {
                let user = service.subscribe().await?;
                println!("Thank you! {} is now a PRO member.", user.name);
            }

            Commands::Add {
                amount,
                kind,
                category,
                date,
                note,
            } => {
                let kind = parse_kind(&kind)?;
                let date = date.unwrap_or_else(|| Utc::now().date_naive().to_string());

                let mut draft = EntryDraft::new(kind, amount).with_date(date);
                if let Some(category) = category {
                    draft = draft.with_category(category);
                }
                if let Some(note) = note {
                    draft = draft.with_note(note);
                }

                let transaction = service.add_transaction(draft).await?;
                println!(
                    "Recorded {}: {} {} on {} ({})",
                    transaction.kind,
                    format_cents(transaction.amount_cents),
                    transaction.category,
                    transaction.date,
                    transaction.id
                );
            }

            Commands::Delete { id } => {
                let id = Uuid::parse_str(&id).context("Invalid transaction ID format (expected UUID)")?;
                let removed = service.delete_transaction(id).await?;
                println!(
                    "Deleted {}: {} {} on {}",
                    removed.kind,
                    format_cents(removed.amount_cents),
                    removed.category,
                    removed.date
                );
            }

            Commands::List { period } => {
                let report = service.monthly_report(resolve_period(period)?).await;
                print_transactions(&report);
            }

            Commands::Summary { period } => {
                let report = service.monthly_report(resolve_period(period)?).await;
                print_summary(&report);
            }

            Commands::Breakdown { period } => {
                let report = service.monthly_report(resolve_period(period)?).await;
                print_breakdown(&report);
            }

            Commands::Export {
                period,
                output,
                escape_quotes,
            } => {
                let quoting = if escape_quotes {
                    NoteQuoting::Escaped
                } else {
                    NoteQuoting::Verbatim
                };
                let period = resolve_period(period)?;
                run_export_command(&service, period, output.as_deref(), quoting).await?;
            }

            Commands::Import { input, dry_run } => {
                run_import_command(&service, input.as_deref(), dry_run).await?;
            }

            Commands::Sync => match service.sync().await {
                Ok(report) => println!(
                    "Synced {} transaction(s) to the cloud at {}",
                    report.synced,
                    report.completed_at.format("%Y-%m-%d %H:%M:%S")
                ),
                Err(e) => print_gate(e)?,
            },

            Commands::Categories { kind } => {
                let kinds = match kind {
                    Some(kind) => vec![parse_kind(&kind)?],
                    None => vec![TransactionKind::Income, TransactionKind::Expense],
                };
                for kind in kinds {
                    println!("{}:", kind.label());
                    for category in suggested_categories(kind) {
                        println!("  {}", category);
                    }
                }
            }
        }

        Ok(())
    }
}

async fn run_export_command(
    service: &FinanceService,
    period: MonthPeriod,
    output: Option<&str>,
    quoting: NoteQuoting,
) -> Result<()> {
    let export = match service.export_csv(period, quoting).await {
        Ok(export) => export,
        Err(e) => return print_gate(e),
    };

    match output {
        Some("-") => println!("{}", export.content),
        Some(path) => {
            std::fs::write(path, &export.content)
                .with_context(|| format!("Failed to create output file: {}", path))?;
            eprintln!("Exported {} transaction(s) to {}", export.rows, path);
        }
        None => {
            std::fs::write(&export.filename, &export.content)
                .with_context(|| format!("Failed to create output file: {}", export.filename))?;
            eprintln!("Exported {} transaction(s) to {}", export.rows, export.filename);
        }
    }

    Ok(())
}

async fn run_import_command(
    service: &FinanceService,
    input: Option<&str>,
    dry_run: bool,
) -> Result<()> {
    use crate::io::{ImportOptions, Importer};
    use std::fs::File;
    use std::io::{stdin, Read};

    let importer = Importer::new(service);

    // Determine input reader
    let reader: Box<dyn Read> = match input {
        Some(path) => {
            let file =
                File::open(path).with_context(|| format!("Failed to open input file: {}", path))?;
            Box::new(file)
        }
        None => Box::new(stdin()),
    };

    let result = importer
        .import_csv(reader, ImportOptions { dry_run })
        .await?;

    if dry_run {
        println!("Validation complete");
    } else {
        println!("Import complete");
    }
    println!("  Imported: {}", result.imported);
    println!("  Errors:   {}", result.errors.len());

    if !result.errors.is_empty() {
        println!("\nErrors:");
        for error in result.errors.iter().take(10) {
            println!(
                "  Line {}: {}",
                error.line,
                error
                    .field
                    .as_ref()
                    .map(|f| format!("{}: ", f))
                    .unwrap_or_default()
                    + &error.error
            );
        }
        if result.errors.len() > 10 {
            println!("  ... and {} more errors", result.errors.len() - 10);
        }
    }

    Ok(())
}

/// Turn a gated-feature refusal into a prompt. Other errors pass through.
fn print_gate(error: AppError) -> Result<()> {
    match error {
        AppError::PermissionDenied {
            feature,
            reason: DenialReason::UpgradeRequired,
        } => {
            println!("{} is a PRO feature. Run `tallybook upgrade` to unlock it.", feature);
            Ok(())
        }
        AppError::PermissionDenied {
            feature,
            reason: DenialReason::SignInRequired,
        } => {
            println!("Sign in to use {}: `tallybook login google`", feature);
            Ok(())
        }
        other => Err(other.into()),
    }
}

fn parse_kind(kind: &str) -> Result<TransactionKind> {
    TransactionKind::from_str(kind).ok_or_else(|| {
        anyhow::anyhow!("Invalid type '{}'. Valid types: income, expense", kind)
    })
}

/// Resolve the selected month, defaulting to the current one.
/// Years are limited to five either side of the current year.
fn resolve_period(args: PeriodArgs) -> Result<MonthPeriod, AppError> {
    let current = MonthPeriod::current(Utc::now());
    let month = args.month.unwrap_or(current.month() + 1);
    let year = args.year.unwrap_or(current.year());

    let invalid = AppError::InvalidPeriod { month, year };
    if !year_options(current.year()).contains(&year) {
        return Err(invalid);
    }
    MonthPeriod::from_human(month, year).ok_or(invalid)
}

fn print_transactions(report: &MonthlyReport) {
    if report.transactions.is_empty() {
        println!("No transactions in {}.", report.period);
        return;
    }

    println!(
        "{:<10} {:<8} {:<20} {:>12} {:<24} {}",
        "DATE", "TYPE", "CATEGORY", "AMOUNT", "NOTE", "ID"
    );
    println!("{}", "-".repeat(114));
    for t in &report.transactions {
        let sign = if t.is_income() { "+" } else { "-" };
        println!(
            "{:<10} {:<8} {:<20} {:>12} {:<24} {}",
            t.date,
            t.kind,
            truncate(&t.category, 20),
            format!("{}{}", sign, format_cents(t.amount_cents)),
            truncate(t.note.as_deref().unwrap_or(""), 24),
            t.id
        );
    }
}

fn print_summary(report: &MonthlyReport) {
    let summary = &report.summary;
    println!("Summary for {}", report.period);
    println!("  Income:   {:>12}", format_cents(summary.total_income));
    println!("  Expense:  {:>12}", format_cents(summary.total_expense));
    if summary.is_deficit() {
        println!("  Balance:  {:>12}  (deficit)", format_cents(summary.balance));
    } else {
        println!("  Balance:  {:>12}", format_cents(summary.balance));
    }
    println!(
        "  Transactions: {}  |  previous: {}  |  next: {}",
        report.transactions.len(),
        report.period.previous(),
        report.period.next()
    );
}

fn print_breakdown(report: &MonthlyReport) {
    if report.breakdown.is_empty() {
        println!("No spending in {}.", report.period);
        return;
    }

    println!("Spending by category, {}", report.period);
    println!("{:<20} {:>12} {:>7}", "CATEGORY", "AMOUNT", "SHARE");
    println!("{}", "-".repeat(64));
    for share in &report.breakdown {
        let bar = "#".repeat((share.percentage / 5.0).round() as usize);
        println!(
            "{:<20} {:>12} {:>6.1}%  {}",
            truncate(&share.category, 20),
            format_cents(share.amount_cents),
            share.percentage,
            bar
        );
    }
}

fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let head: String = s.chars().take(max_len - 3).collect();
        format!("{}...", head)
    }
}
