#[cfg(test)]
#[path = "main_test.rs"]
mod tests;

use std::path::PathBuf;
use std::process::ExitCode;

use admin_console::config::{ConfigError, normalize_api_url};
use admin_console::net::error::ApiError;
use admin_console::net::filters::{self, BookingFilter, MechanicFilter, PageQuery, TransactionFilter, UserFilter};
use admin_console::net::types::{
    BOOKING_STATUSES, BookingSummary, DisputeUpdate, Paged, PayoutMechanic, PayoutRequest, TRANSACTION_STATUSES,
    TRANSACTION_TYPES, Transaction, booking_status_label, transaction_type_label,
};
use admin_console::pages::{PageWindow, format_minor_as_major, paginate, parse_major_to_minor};
use admin_console::routes::Route;
use admin_console::{Console, ConsoleConfig, ConsoleError};
use clap::{Args, Parser, Subcommand};
use serde::Serialize;
use serde_json::json;

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("{}", .source.display_message(.fallback))]
    Api { fallback: &'static str, source: ApiError },
    #[error("{}", .source.display_message(.fallback))]
    Console { fallback: &'static str, source: ConsoleError },
    #[error("not signed in as an admin; run `mechanic-admin login`")]
    NotSignedIn,
    #[error("missing password; pass --password or set ADMIN_PASSWORD")]
    MissingPassword,
    #[error("invalid JSON payload: {0}")]
    InvalidJson(#[from] serde_json::Error),
    #[error("booking {0} has no open dispute")]
    NoOpenDispute(String),
    #[error("mechanic {id} has no balance to pay out (balance {balance})")]
    NotOwed { id: String, balance: String },
}

/// Attach the message shown when the backend gives nothing better.
fn failed(fallback: &'static str) -> impl FnOnce(ApiError) -> CliError {
    move |source| CliError::Api { fallback, source }
}

#[derive(Parser, Debug)]
#[command(name = "mechanic-admin", about = "Mechanic marketplace admin console")]
struct Cli {
    #[arg(long, env = "ADMIN_API_URL")]
    api_url: Option<String>,

    #[arg(long, env = "ADMIN_SESSION_FILE")]
    session_file: Option<PathBuf>,

    /// Log requests to stderr.
    #[arg(short, long, default_value_t = false)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    Login {
        #[arg(long)]
        email: String,
        #[arg(long, env = "ADMIN_PASSWORD", hide_env_values = true)]
        password: Option<String>,
    },
    Logout,
    Whoami,
    Stats,
    Users(UsersCommand),
    Mechanics(MechanicsCommand),
    Bookings(BookingsCommand),
    Transactions(TransactionsCommand),
    Payouts(PayoutsCommand),
}

#[derive(Args, Debug, Clone, Copy)]
struct PageArgs {
    #[arg(long, default_value_t = 1)]
    page: u32,
    /// Page size; defaults to ADMIN_PAGE_LIMIT.
    #[arg(long)]
    limit: Option<u32>,
}

impl PageArgs {
    fn query(self, config: &ConsoleConfig) -> PageQuery {
        PageQuery::new(self.page.max(1), self.limit.unwrap_or(config.page_limit).max(1))
    }
}

fn limit_of(paging: &PageQuery) -> u32 {
    paging.limit.unwrap_or(1)
}

#[derive(Args, Debug)]
struct UsersCommand {
    #[command(subcommand)]
    command: UsersSubcommand,
}

#[derive(Subcommand, Debug)]
enum UsersSubcommand {
    List {
        #[command(flatten)]
        paging: PageArgs,
        #[arg(long)]
        search: Option<String>,
        /// `true`, `false` or `all`.
        #[arg(long)]
        email_verified: Option<String>,
    },
    Get {
        id: String,
    },
}

#[derive(Args, Debug)]
struct MechanicsCommand {
    #[command(subcommand)]
    command: MechanicsSubcommand,
}

#[derive(Subcommand, Debug)]
enum MechanicsSubcommand {
    List {
        #[command(flatten)]
        paging: PageArgs,
        #[arg(long)]
        search: Option<String>,
        /// `true`, `false` or `all`.
        #[arg(long)]
        verified: Option<String>,
    },
    Get {
        id: String,
    },
    Verify {
        id: String,
    },
    Unverify {
        id: String,
    },
}

#[derive(Args, Debug)]
struct BookingsCommand {
    #[command(subcommand)]
    command: BookingsSubcommand,
}

#[derive(Subcommand, Debug)]
enum BookingsSubcommand {
    List {
        #[command(flatten)]
        paging: PageArgs,
        #[arg(long)]
        status: Option<String>,
        #[arg(long)]
        user_id: Option<String>,
        #[arg(long)]
        mechanic_id: Option<String>,
        #[arg(long)]
        date_from: Option<String>,
        #[arg(long)]
        date_to: Option<String>,
        /// `true`, `false` or `all`.
        #[arg(long)]
        has_dispute: Option<String>,
    },
    Get {
        id: String,
    },
    /// Record a dispute reason; omit --reason to clear it.
    Dispute {
        id: String,
        #[arg(long)]
        reason: Option<String>,
    },
    /// Resolve an open dispute.
    Resolve {
        id: String,
    },
}

#[derive(Args, Debug)]
struct TransactionsCommand {
    #[command(subcommand)]
    command: TransactionsSubcommand,
}

#[derive(Subcommand, Debug)]
enum TransactionsSubcommand {
    List {
        #[command(flatten)]
        paging: PageArgs,
        #[arg(long = "type")]
        kind: Option<String>,
        #[arg(long)]
        status: Option<String>,
        #[arg(long)]
        user_id: Option<String>,
        #[arg(long)]
        mechanic_id: Option<String>,
        #[arg(long)]
        date_from: Option<String>,
        #[arg(long)]
        date_to: Option<String>,
    },
}

#[derive(Args, Debug)]
struct PayoutsCommand {
    #[command(subcommand)]
    command: PayoutsSubcommand,
}

#[derive(Subcommand, Debug)]
enum PayoutsSubcommand {
    /// Mechanics with a balance the platform owes.
    List {
        #[arg(long, default_value_t = 1)]
        page: u32,
    },
    /// Record a payout against a mechanic the platform owes.
    Record {
        mechanic_id: String,
        /// Amount in naira, e.g. 12.50.
        #[arg(long)]
        amount: String,
        #[arg(long)]
        reference: Option<String>,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let level = if cli.verbose { tracing::Level::DEBUG } else { tracing::Level::WARN };
    tracing_subscriber::fmt().with_writer(std::io::stderr).with_max_level(level).init();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<(), CliError> {
    let console = open_console(cli.api_url.as_deref(), cli.session_file)?;

    match cli.command {
        Command::Login { email, password } => run_login(&console, &email, password).await,
        Command::Logout => {
            console.logout();
            eprintln!("signed out");
            Ok(())
        }
        Command::Whoami => {
            guard(&console, Route::Dashboard)?;
            let session = console.session().current();
            print_json(&json!({ "status": format!("{:?}", session.status()), "user": session.user() }))
        }
        Command::Stats => {
            guard(&console, Route::Dashboard)?;
            let stats = console.api().stats().await.map_err(failed("Failed to load stats"))?;
            print_json(&stats)
        }
        Command::Users(users) => run_users(&console, users).await,
        Command::Mechanics(mechanics) => run_mechanics(&console, mechanics).await,
        Command::Bookings(bookings) => run_bookings(&console, bookings).await,
        Command::Transactions(transactions) => run_transactions(&console, transactions).await,
        Command::Payouts(payouts) => run_payouts(&console, payouts).await,
    }
}

fn open_console(api_url: Option<&str>, session_file: Option<PathBuf>) -> Result<Console, CliError> {
    let mut config = ConsoleConfig::from_env()?;
    if let Some(url) = api_url {
        config.api_url = normalize_api_url(url)?;
    }
    if let Some(path) = session_file {
        config.session_file = Some(path);
    }
    Console::new(config).map_err(failed("Failed to start console"))
}

/// Every command but `login` and `logout` shows a protected screen.
fn guard(console: &Console, route: Route) -> Result<(), CliError> {
    if console.open(route.clone()) == route { Ok(()) } else { Err(CliError::NotSignedIn) }
}

async fn run_login(console: &Console, email: &str, password: Option<String>) -> Result<(), CliError> {
    let password = password.ok_or(CliError::MissingPassword)?;
    let user = console
        .login(email, &password)
        .await
        .map_err(|source| CliError::Console { fallback: "Login failed", source })?;

    if !user.is_admin() {
        eprintln!("warning: {} is not an admin; protected commands will be refused", user.email);
    }
    print_json(&user)
}

async fn run_users(console: &Console, users: UsersCommand) -> Result<(), CliError> {
    match users.command {
        UsersSubcommand::List { paging, search, email_verified } => {
            guard(console, Route::Users)?;
            let filter = UserFilter {
                paging: paging.query(console.config()),
                search: filters::text(search.as_deref()),
                email_verified: flag(email_verified.as_deref()),
            };
            let page = console.api().users(Some(&filter)).await.map_err(failed("Failed to load users"))?;
            print_page(&page, limit_of(&filter.paging))
        }
        UsersSubcommand::Get { id } => {
            guard(console, Route::UserDetail(id.clone()))?;
            let user = console.api().user(&id).await.map_err(failed("Failed to load user"))?;
            print_json(&user)
        }
    }
}

async fn run_mechanics(console: &Console, mechanics: MechanicsCommand) -> Result<(), CliError> {
    match mechanics.command {
        MechanicsSubcommand::List { paging, search, verified } => {
            guard(console, Route::Mechanics)?;
            let filter = MechanicFilter {
                paging: paging.query(console.config()),
                search: filters::text(search.as_deref()),
                is_verified: flag(verified.as_deref()),
            };
            let page = console.api().mechanics(Some(&filter)).await.map_err(failed("Failed to load mechanics"))?;
            print_page(&page, limit_of(&filter.paging))
        }
        MechanicsSubcommand::Get { id } => {
            guard(console, Route::MechanicDetail(id.clone()))?;
            let mechanic = console.api().mechanic(&id).await.map_err(failed("Failed to load mechanic"))?;
            print_json(&mechanic)
        }
        MechanicsSubcommand::Verify { id } => set_verified(console, &id, true).await,
        MechanicsSubcommand::Unverify { id } => set_verified(console, &id, false).await,
    }
}

async fn set_verified(console: &Console, id: &str, is_verified: bool) -> Result<(), CliError> {
    guard(console, Route::MechanicDetail(id.to_owned()))?;
    let result =
        console.api().set_mechanic_verified(id, is_verified).await.map_err(failed("Failed to update verification"))?;
    print_json(&result)
}

async fn run_bookings(console: &Console, bookings: BookingsCommand) -> Result<(), CliError> {
    match bookings.command {
        BookingsSubcommand::List { paging, status, user_id, mechanic_id, date_from, date_to, has_dispute } => {
            guard(console, Route::Bookings)?;
            let filter = BookingFilter {
                paging: paging.query(console.config()),
                status: filters::choice(status.as_deref(), &BOOKING_STATUSES).map_err(failed("Invalid status"))?,
                user_id: filters::text(user_id.as_deref()),
                mechanic_id: filters::text(mechanic_id.as_deref()),
                date_from: filters::text(date_from.as_deref()),
                date_to: filters::text(date_to.as_deref()),
                has_dispute: flag(has_dispute.as_deref()),
            };
            let page = console.api().bookings(Some(&filter)).await.map_err(failed("Failed to load bookings"))?;
            print_page(&page, limit_of(&filter.paging))
        }
        BookingsSubcommand::Get { id } => {
            guard(console, Route::BookingDetail(id.clone()))?;
            let booking = console.api().booking(&id).await.map_err(failed("Failed to load booking"))?;
            print_json(&booking)?;
            eprintln!("{}", booking_line(&booking.summary));
            Ok(())
        }
        BookingsSubcommand::Dispute { id, reason } => {
            guard(console, Route::BookingDetail(id.clone()))?;
            let update = DisputeUpdate::reason(reason.as_deref().unwrap_or_default());
            let result = console.api().set_booking_dispute(&id, &update).await.map_err(failed("Failed to update"))?;
            print_json(&result)
        }
        BookingsSubcommand::Resolve { id } => {
            guard(console, Route::BookingDetail(id.clone()))?;
            let booking = console.api().booking(&id).await.map_err(failed("Failed to load booking"))?;
            ensure_open_dispute(&booking.summary)?;
            let result = console
                .api()
                .set_booking_dispute(&id, &DisputeUpdate::Resolve)
                .await
                .map_err(failed("Failed to resolve"))?;
            print_json(&result)
        }
    }
}

async fn run_transactions(console: &Console, transactions: TransactionsCommand) -> Result<(), CliError> {
    match transactions.command {
        TransactionsSubcommand::List { paging, kind, status, user_id, mechanic_id, date_from, date_to } => {
            guard(console, Route::Transactions)?;
            let filter = TransactionFilter {
                paging: paging.query(console.config()),
                kind: filters::choice(kind.as_deref(), &TRANSACTION_TYPES.map(|(code, _)| code))
                    .map_err(failed("Invalid type"))?,
                status: filters::choice(status.as_deref(), &TRANSACTION_STATUSES).map_err(failed("Invalid status"))?,
                user_id: filters::text(user_id.as_deref()),
                mechanic_id: filters::text(mechanic_id.as_deref()),
                date_from: filters::text(date_from.as_deref()),
                date_to: filters::text(date_to.as_deref()),
            };
            let page =
                console.api().transactions(Some(&filter)).await.map_err(failed("Failed to load transactions"))?;
            print_page(&page, limit_of(&filter.paging))?;
            for transaction in &page.items {
                eprintln!("{}", transaction_line(transaction));
            }
            Ok(())
        }
    }
}

async fn run_payouts(console: &Console, payouts: PayoutsCommand) -> Result<(), CliError> {
    guard(console, Route::Payouts)?;
    match payouts.command {
        PayoutsSubcommand::List { page } => {
            let mechanics = console.api().payout_mechanics().await.map_err(failed("Failed to load mechanics"))?;
            let limit = console.config().page_limit;
            print_page(&paginate(&mechanics, page, limit), limit)
        }
        PayoutsSubcommand::Record { mechanic_id, amount, reference } => {
            let amount_minor = parse_major_to_minor(&amount).map_err(failed("Enter a valid amount"))?;
            let payout = PayoutRequest::new(&mechanic_id, amount_minor, reference.as_deref())
                .map_err(failed("Failed to record payout"))?;
            let mechanics = console.api().payout_mechanics().await.map_err(failed("Failed to load mechanics"))?;
            let recipient = payee(&mechanics, payout.mechanic_id())?;
            let created = console.api().record_payout(&payout).await.map_err(failed("Failed to record payout"))?;
            print_json(&created)?;
            eprintln!(
                "recorded payout of {} to {}",
                format_minor_as_major(payout.amount_minor()),
                display_or_id(&recipient.summary.company_name, &recipient.summary.id)
            );
            Ok(())
        }
    }
}

/// Tri-state select flag: `true`, `false`, anything else means "all".
fn flag(raw: Option<&str>) -> Option<bool> {
    raw.and_then(filters::tri_state)
}

fn ensure_open_dispute(booking: &BookingSummary) -> Result<(), CliError> {
    if booking.has_open_dispute() { Ok(()) } else { Err(CliError::NoOpenDispute(booking.id.clone())) }
}

/// The mechanic a payout is recorded against must be listed with a positive
/// balance.
fn payee<'a>(mechanics: &'a [PayoutMechanic], id: &str) -> Result<&'a PayoutMechanic, CliError> {
    let found = mechanics.iter().find(|m| m.summary.id == id);
    match found {
        Some(mechanic) if mechanic.summary.is_payout_eligible() => Ok(mechanic),
        _ => Err(CliError::NotOwed {
            id: id.to_owned(),
            balance: format_minor_as_major(found.map_or(0, |m| m.summary.balance_minor())),
        }),
    }
}

fn display_or_id<'a>(name: &'a str, id: &'a str) -> &'a str {
    if name.is_empty() { id } else { name }
}

fn booking_line(booking: &BookingSummary) -> String {
    let dispute = if booking.has_open_dispute() { " \u{b7} dispute open" } else { "" };
    format!("{} \u{b7} {}{dispute}", booking.id, booking_status_label(&booking.status))
}

fn transaction_line(transaction: &Transaction) -> String {
    format!(
        "{} \u{b7} {} \u{b7} {} \u{b7} {} \u{b7} {}",
        transaction.created_at.as_deref().unwrap_or("-"),
        transaction_type_label(&transaction.kind),
        transaction.status,
        format_minor_as_major(transaction.amount_minor),
        transaction.party().unwrap_or("-"),
    )
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<(), CliError> {
    let rendered = serde_json::to_string_pretty(value)?;
    println!("{rendered}");
    Ok(())
}

/// JSON envelope on stdout, pagination footer on stderr.
fn print_page<T: Serialize>(page: &Paged<T>, limit: u32) -> Result<(), CliError> {
    print_json(page)?;
    let window = PageWindow::of(page, limit);
    if let Some(footer) = window.footer() {
        eprintln!("{footer}{}", page_hint(&window));
    }
    Ok(())
}

/// Flags that reach the neighbouring pages, empty when there are none.
fn page_hint(window: &PageWindow) -> String {
    let mut hints = Vec::new();
    if window.has_previous() {
        hints.push(format!("previous: --page {}", window.page() - 1));
    }
    if window.has_next() {
        hints.push(format!("next: --page {}", window.page() + 1));
    }
    if hints.is_empty() { String::new() } else { format!(" ({})", hints.join(", ")) }
}
