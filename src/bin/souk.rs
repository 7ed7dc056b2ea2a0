//! CLI binary for browsing the Souk catalog and placing orders.

use std::io::{self, Write as _};
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Args, Parser, Subcommand};
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Cell, Color, Table};
use indicatif::{ProgressBar, ProgressStyle};
use owo_colors::OwoColorize;
use souk_rs::catalog::{Catalog, CatalogFilter};
use souk_rs::checkout::SubmitOutcome;
use souk_rs::models::{Category, CatalogEntry, Credentials, MenuItemId, SignupRequest};
use souk_rs::souk::SoukBlocking;
use souk_rs::storage::{BlockingSessionStorage, FileSessionStorage};

/// Environment variable overriding the API base URL.
const BASE_URL_ENV: &str = "SOUK_BASE_URL";

/// Environment variable overriding the fallback chat phone number.
const FALLBACK_PHONE_ENV: &str = "SOUK_FALLBACK_PHONE";

/// Souk marketplace CLI — browse the catalog and place orders.
#[derive(Debug, Parser)]
#[command(name = "souk", version, about)]
struct Cli {
    /// Override the session storage directory (default: XDG data dir).
    #[arg(long, global = true, value_name = "DIR")]
    data_dir: Option<PathBuf>,
    /// Subcommand to execute.
    #[command(subcommand)]
    command: Command,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
enum Command {
    /// Browse the catalog, optionally filtered by text, category, or
    /// price range.
    Catalog(CatalogArgs),
    /// Log in with a phone number (or email) and password.
    Login {
        /// Login identifier (phone number or email).
        #[arg(long)]
        login: String,
        /// Account password.
        #[arg(long)]
        password: String,
    },
    /// Register a new account and log it in.
    Signup {
        /// Display name.
        #[arg(long)]
        name: String,
        /// Phone number in international format.
        #[arg(long)]
        phone: String,
        /// Account password.
        #[arg(long)]
        password: String,
        /// Email address (optional).
        #[arg(long)]
        email: Option<String>,
    },
    /// Log out and clear the stored session.
    Logout,
    /// Show the currently logged-in user.
    Whoami,
    /// Build a cart from catalog item IDs and submit it.
    Order(OrderArgs),
}

/// Arguments for the `catalog` subcommand.
#[derive(Debug, Args)]
struct CatalogArgs {
    /// Free-text filter over display names (case-insensitive).
    #[arg(long)]
    query: Option<String>,
    /// Category filter: shopping, restaurants, real-estate, or cars.
    #[arg(long, value_parser = parse_category)]
    category: Option<Category>,
    /// Minimum price (inclusive, MRU). Requires --max-price.
    #[arg(long, requires = "max_price")]
    min_price: Option<u64>,
    /// Maximum price (inclusive, MRU). Requires --min-price.
    #[arg(long, requires = "min_price")]
    max_price: Option<u64>,
}

/// Arguments for the `order` subcommand.
#[derive(Debug, Args)]
struct OrderArgs {
    /// Catalog item IDs: a product ID (e.g. `p1`) or a restaurant menu
    /// item as `restaurant/item` (e.g. `r1/m1`). Repeat an ID to order
    /// more than one unit.
    #[arg(required = true, value_name = "ITEM")]
    items: Vec<String>,
}

/// One parsed order item reference.
#[derive(Debug, PartialEq, Eq)]
enum ItemRef {
    /// A shopping product, by raw catalog ID.
    Product(String),
    /// A restaurant menu item, by restaurant and menu item ID.
    Menu(String, String),
}

/// Parses a category name for clap.
fn parse_category(s: &str) -> Result<Category, String> {
    match s {
        "shopping" => Ok(Category::Shopping),
        "restaurants" => Ok(Category::Restaurants),
        "real-estate" => Ok(Category::RealEstate),
        "cars" => Ok(Category::Cars),
        other => Err(format!(
            "unknown category `{other}` (expected shopping, restaurants, real-estate, or cars)"
        )),
    }
}

/// Parses an order item reference (`p1` or `r1/m1`).
fn parse_item(spec: &str) -> Result<ItemRef, String> {
    match spec.split_once('/') {
        None => Ok(ItemRef::Product(spec.to_owned())),
        Some((restaurant, item)) if !restaurant.is_empty() && !item.is_empty() => {
            Ok(ItemRef::Menu(restaurant.to_owned(), item.to_owned()))
        }
        Some(_) => Err(format!("malformed item reference: {spec}")),
    }
}

/// Runs the CLI, returning an appropriate exit code.
fn run() -> io::Result<ExitCode> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .init();

    let _dotenv = dotenvy::dotenv();

    let cli = Cli::parse();

    let storage = match create_storage(cli.data_dir) {
        Ok(storage) => storage,
        Err(err) => {
            writeln!(
                io::stderr().lock(),
                "{} failed to initialize session storage: {err}",
                "error:".red().bold()
            )?;
            return Ok(ExitCode::FAILURE);
        }
    };

    let facade = match create_facade(storage) {
        Ok(facade) => facade,
        Err(err) => {
            writeln!(
                io::stderr().lock(),
                "{} failed to build client: {err}",
                "error:".red().bold()
            )?;
            return Ok(ExitCode::FAILURE);
        }
    };

    if let Err(err) = facade.restore_session() {
        writeln!(
            io::stderr().lock(),
            "{} failed to restore session: {err}",
            "error:".red().bold()
        )?;
        return Ok(ExitCode::FAILURE);
    }

    dispatch(&facade, cli.command)
}

/// Creates the session storage backend, using `data_dir` if provided or
/// the default XDG data directory otherwise.
fn create_storage(data_dir: Option<PathBuf>) -> souk_rs::error::Result<FileSessionStorage> {
    let dir = match data_dir {
        Some(dir) => dir,
        None => FileSessionStorage::default_dir()?,
    };
    FileSessionStorage::new(dir)
}

/// Builds the blocking facade, applying environment overrides for the
/// base URL and the fallback phone number.
fn create_facade<S: BlockingSessionStorage>(
    storage: S,
) -> souk_rs::error::Result<SoukBlocking<S>> {
    let mut builder = SoukBlocking::builder().storage(storage);
    if let Ok(url) = std::env::var(BASE_URL_ENV)
        && !url.is_empty()
    {
        builder = builder.base_url(url);
    }
    if let Ok(phone) = std::env::var(FALLBACK_PHONE_ENV)
        && !phone.is_empty()
    {
        builder = builder.fallback_phone(phone);
    }
    builder.build()
}

/// Dispatches to the appropriate subcommand handler.
fn dispatch<S: BlockingSessionStorage>(
    facade: &SoukBlocking<S>,
    command: Command,
) -> io::Result<ExitCode> {
    match command {
        Command::Catalog(args) => cmd_catalog(&args),
        Command::Login { login, password } => cmd_login(facade, login, password),
        Command::Signup {
            name,
            phone,
            password,
            email,
        } => cmd_signup(facade, name, phone, password, email),
        Command::Logout => cmd_logout(facade),
        Command::Whoami => cmd_whoami(facade),
        Command::Order(args) => cmd_order(facade, &args),
    }
}

/// Executes the `catalog` subcommand: prints matching entries.
fn cmd_catalog(args: &CatalogArgs) -> io::Result<ExitCode> {
    let mut filter = CatalogFilter::new();
    if let Some(query) = args.query.as_deref() {
        filter = filter.query(query);
    }
    if let Some(category) = args.category {
        filter = filter.category(category);
    }
    if let Some((min, max)) = args.min_price.zip(args.max_price) {
        filter = filter.price_range(min, max);
    }

    let catalog = Catalog::sample();
    let hits = catalog.search(&filter);
    print_catalog_table(&hits)?;
    Ok(ExitCode::SUCCESS)
}

/// Executes the `login` subcommand.
fn cmd_login<S: BlockingSessionStorage>(
    facade: &SoukBlocking<S>,
    login: String,
    password: String,
) -> io::Result<ExitCode> {
    let spinner = make_spinner("Logging in...");
    match facade.login(&Credentials { login, password }) {
        Ok(user) => {
            spinner.finish_and_clear();
            writeln!(
                io::stdout().lock(),
                "{} logged in as {}",
                "ok:".green().bold(),
                user.name.bold()
            )?;
            Ok(ExitCode::SUCCESS)
        }
        Err(err) => {
            spinner.finish_and_clear();
            writeln!(
                io::stderr().lock(),
                "{} login failed: {err}",
                "error:".red().bold()
            )?;
            Ok(ExitCode::FAILURE)
        }
    }
}

/// Executes the `signup` subcommand.
fn cmd_signup<S: BlockingSessionStorage>(
    facade: &SoukBlocking<S>,
    name: String,
    phone: String,
    password: String,
    email: Option<String>,
) -> io::Result<ExitCode> {
    let spinner = make_spinner("Creating account...");
    let request = SignupRequest {
        name,
        phone,
        password,
        email,
    };
    match facade.signup(&request) {
        Ok(user) => {
            spinner.finish_and_clear();
            writeln!(
                io::stdout().lock(),
                "{} account created, logged in as {}",
                "ok:".green().bold(),
                user.name.bold()
            )?;
            Ok(ExitCode::SUCCESS)
        }
        Err(err) => {
            spinner.finish_and_clear();
            writeln!(
                io::stderr().lock(),
                "{} signup failed: {err}",
                "error:".red().bold()
            )?;
            Ok(ExitCode::FAILURE)
        }
    }
}

/// Executes the `logout` subcommand.
fn cmd_logout<S: BlockingSessionStorage>(facade: &SoukBlocking<S>) -> io::Result<ExitCode> {
    match facade.logout() {
        Ok(()) => {
            writeln!(io::stdout().lock(), "{} logged out", "ok:".green().bold())?;
            Ok(ExitCode::SUCCESS)
        }
        Err(err) => {
            writeln!(
                io::stderr().lock(),
                "{} logout failed: {err}",
                "error:".red().bold()
            )?;
            Ok(ExitCode::FAILURE)
        }
    }
}

/// Executes the `whoami` subcommand.
fn cmd_whoami<S: BlockingSessionStorage>(facade: &SoukBlocking<S>) -> io::Result<ExitCode> {
    match facade.current_user() {
        Ok(Some(user)) => {
            let mut out = io::stdout().lock();
            writeln!(out, "{} {}", "Name:".bold(), user.name)?;
            writeln!(out, "{} {}", "Phone:".bold(), user.phone)?;
            if let Some(email) = user.email.as_deref() {
                writeln!(out, "{} {email}", "Email:".bold())?;
            }
            Ok(ExitCode::SUCCESS)
        }
        Ok(None) => {
            writeln!(io::stdout().lock(), "{}", "Not logged in.".dimmed())?;
            Ok(ExitCode::SUCCESS)
        }
        Err(err) => {
            writeln!(
                io::stderr().lock(),
                "{} failed to read session: {err}",
                "error:".red().bold()
            )?;
            Ok(ExitCode::FAILURE)
        }
    }
}

/// Resolves one item reference against the catalog and adds it to the
/// facade's cart. Returns `false` (with the error printed) when the
/// reference does not resolve to an orderable item.
fn add_item<S: BlockingSessionStorage>(
    facade: &SoukBlocking<S>,
    catalog: &Catalog,
    item: &ItemRef,
) -> io::Result<bool> {
    let added = match item {
        ItemRef::Product(raw_id) => match catalog.entry(raw_id) {
            Some(CatalogEntry::Product(product)) => {
                facade.add_product(product).is_ok()
            }
            Some(_) => {
                writeln!(
                    io::stderr().lock(),
                    "{} {raw_id} is not an orderable product",
                    "error:".red().bold()
                )?;
                false
            }
            None => {
                writeln!(
                    io::stderr().lock(),
                    "{} no such product: {raw_id}",
                    "error:".red().bold()
                )?;
                false
            }
        },
        ItemRef::Menu(restaurant_id, item_id) => {
            let found = catalog
                .restaurants()
                .into_iter()
                .find(|restaurant| restaurant.id.as_inner() == restaurant_id.as_str())
                .and_then(|restaurant| {
                    restaurant
                        .menu_item(&MenuItemId::from(item_id.as_str()))
                        .map(|menu_item| (restaurant, menu_item))
                });
            match found {
                Some((restaurant, menu_item)) => {
                    facade.add_menu_item(restaurant, menu_item).is_ok()
                }
                None => {
                    writeln!(
                        io::stderr().lock(),
                        "{} no such menu item: {restaurant_id}/{item_id}",
                        "error:".red().bold()
                    )?;
                    false
                }
            }
        }
    };
    Ok(added)
}

/// Executes the `order` subcommand: fills the cart and submits it.
fn cmd_order<S: BlockingSessionStorage>(
    facade: &SoukBlocking<S>,
    args: &OrderArgs,
) -> io::Result<ExitCode> {
    let catalog = Catalog::sample();
    for spec in &args.items {
        let item = match parse_item(spec) {
            Ok(item) => item,
            Err(message) => {
                writeln!(io::stderr().lock(), "{} {message}", "error:".red().bold())?;
                return Ok(ExitCode::FAILURE);
            }
        };
        if !add_item(facade, &catalog, &item)? {
            return Ok(ExitCode::FAILURE);
        }
    }

    print_cart(facade)?;

    let spinner = make_spinner("Submitting order...");
    match facade.checkout() {
        Ok(SubmitOutcome::Placed(order_id)) => {
            spinner.finish_and_clear();
            writeln!(
                io::stdout().lock(),
                "{} order placed: {}",
                "ok:".green().bold(),
                order_id.to_string().bold()
            )?;
            Ok(ExitCode::SUCCESS)
        }
        Ok(SubmitOutcome::Fallback(link)) => {
            spinner.finish_and_clear();
            let mut out = io::stdout().lock();
            writeln!(
                out,
                "{} order routed to WhatsApp; open this link to finish:",
                "note:".yellow().bold()
            )?;
            writeln!(out, "  {link}")?;
            Ok(ExitCode::SUCCESS)
        }
        Ok(SubmitOutcome::InFlight) => {
            spinner.finish_and_clear();
            writeln!(
                io::stderr().lock(),
                "{} a submission is already in flight",
                "error:".red().bold()
            )?;
            Ok(ExitCode::FAILURE)
        }
        Err(err) => {
            spinner.finish_and_clear();
            writeln!(
                io::stderr().lock(),
                "{} order failed: {err}",
                "error:".red().bold()
            )?;
            Ok(ExitCode::FAILURE)
        }
    }
}

// ── Output formatting ────────────────────────────────────────────────

/// Prints catalog entries in a table, with restaurant menu items as
/// orderable `restaurant/item` rows.
fn print_catalog_table(entries: &[&CatalogEntry]) -> io::Result<()> {
    let mut out = io::stdout().lock();
    if entries.is_empty() {
        writeln!(out, "{}", "No matching entries.".dimmed())?;
        return Ok(());
    }

    let mut table = Table::new();
    _ = table.load_preset(UTF8_FULL);
    _ = table.set_header(vec![
        Cell::new("ID").fg(Color::Cyan),
        Cell::new("Category").fg(Color::Cyan),
        Cell::new("Name").fg(Color::Cyan),
        Cell::new("Price").fg(Color::Cyan),
    ]);

    for entry in entries {
        let price = entry
            .price()
            .map_or_else(|| "\u{2014}".to_owned(), |amount| amount.to_string());
        _ = table.add_row(vec![
            Cell::new(entry.raw_id()),
            Cell::new(format!("{:?}", entry.category())),
            Cell::new(entry.display_name()),
            Cell::new(price),
        ]);
        if let CatalogEntry::Restaurant(restaurant) = entry {
            for menu_item in &restaurant.menu {
                _ = table.add_row(vec![
                    Cell::new(format!("{}/{}", restaurant.id, menu_item.id)).fg(Color::DarkGrey),
                    Cell::new("Menu").fg(Color::DarkGrey),
                    Cell::new(&menu_item.name),
                    Cell::new(menu_item.price.to_string()),
                ]);
            }
        }
    }

    writeln!(
        out,
        "{} {}",
        "Catalog".green().bold(),
        format_args!("({})", entries.len()).dimmed()
    )?;
    writeln!(out)?;
    writeln!(out, "{table}")?;
    Ok(())
}

/// Prints the current cart contents and total.
fn print_cart<S: BlockingSessionStorage>(facade: &SoukBlocking<S>) -> io::Result<()> {
    let mut out = io::stdout().lock();
    let (lines, total) = match facade.cart_lines().and_then(|lines| {
        facade.cart_total().map(|total| (lines, total))
    }) {
        Ok(snapshot) => snapshot,
        Err(err) => {
            writeln!(
                io::stderr().lock(),
                "{} failed to read cart: {err}",
                "error:".red().bold()
            )?;
            return Ok(());
        }
    };

    let mut table = Table::new();
    _ = table.load_preset(UTF8_FULL);
    _ = table.set_header(vec![
        Cell::new("Item").fg(Color::Cyan),
        Cell::new("Qty").fg(Color::Cyan),
        Cell::new("Line total").fg(Color::Cyan),
    ]);
    for line in &lines {
        _ = table.add_row(vec![
            Cell::new(&line.name),
            Cell::new(line.quantity),
            Cell::new(line.line_total().to_string()),
        ]);
    }

    writeln!(out, "{}", "Cart".green().bold())?;
    writeln!(out)?;
    writeln!(out, "{table}")?;
    writeln!(out, "{} {}", "Total:".bold(), total.to_string().bold())?;
    Ok(())
}

/// Creates a spinner with the given message.
fn make_spinner(message: &str) -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.cyan} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    spinner.set_message(message.to_owned());
    spinner.enable_steady_tick(core::time::Duration::from_millis(80));
    spinner
}

/// Entry point.
fn main() -> ExitCode {
    match run() {
        Ok(code) => code,
        Err(err) => {
            // Last-resort error output — if stderr itself failed, nothing
            // we can do.
            let _ignored = writeln!(io::stderr(), "fatal I/O error: {err}");
            ExitCode::FAILURE
        }
    }
}
