//! Dierenasiel Alert CLI
//!
//! Monitors ikzoekbaas for newly listed shelter animals and notifies
//! through console, desktop and Telegram sinks.

use std::path::PathBuf;
use std::time::Duration;

use clap::{Args, Parser, Subcommand};
use dierenasiel_alert::{
    error::Result,
    models::{AnimalType, Availability, Config, Distance, SearchQuery, SortOrder},
    notify::{ConsoleNotifier, DesktopNotifier, Notifier, TelegramNotifier},
    pipeline::Monitor,
    report::generate_report,
    services::Pager,
    storage::SeenStore,
};

/// Dierenasiel Alert - shelter listing monitor
#[derive(Parser, Debug)]
#[command(
    name = "dierenasiel-alert",
    version,
    about = "Monitor ikzoekbaas for new available animals at a given shelter"
)]
struct Cli {
    /// Path to a TOML configuration file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

/// Search filters shared by every subcommand.
#[derive(Args, Debug)]
struct FilterArgs {
    /// Animal type: katten, honden, vogels or konijnen-en-knagers
    #[arg(long, default_value = "katten")]
    animal_type: AnimalType,

    /// Shelter site code (e.g. deKuipershoek). Mutually exclusive with --location
    #[arg(long)]
    site: Option<String>,

    /// Postal code for location-based search (e.g. 7323PM). Mutually exclusive with --site
    #[arg(long)]
    location: Option<String>,

    /// Distance filter: 10km, 25km or 50km (only with --location)
    #[arg(long)]
    distance: Option<Distance>,

    /// Availability filter: available, reserved or unavailable
    #[arg(long, default_value = "available")]
    availability: Availability,

    /// Sort order: aflopend (descending) or oplopend (ascending)
    #[arg(long, default_value = "aflopend")]
    order: SortOrder,
}

impl FilterArgs {
    fn into_query(self) -> Result<SearchQuery> {
        SearchQuery::build(
            self.animal_type,
            self.site,
            self.location,
            self.distance,
            self.availability,
            self.order,
        )
    }
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List currently listed animals
    List {
        #[command(flatten)]
        filters: FilterArgs,
    },

    /// Monitor for new animals and send notifications
    Monitor {
        #[command(flatten)]
        filters: FilterArgs,

        /// Polling interval in seconds (0 = run once and exit)
        #[arg(long, default_value_t = 0)]
        interval: u64,

        /// Path to the seen-set store file
        #[arg(long)]
        store: Option<PathBuf>,

        /// Enable Telegram notifications
        #[arg(long)]
        telegram: bool,

        /// Telegram bot token (or set TELEGRAM_BOT_TOKEN)
        #[arg(long)]
        telegram_token: Option<String>,

        /// Telegram chat ID (or set TELEGRAM_CHAT_ID)
        #[arg(long)]
        telegram_chat_id: Option<String>,

        /// Disable desktop notifications
        #[arg(long)]
        no_desktop: bool,
    },

    /// Generate an HTML report with animal photos
    Report {
        #[command(flatten)]
        filters: FilterArgs,

        /// Output file path
        #[arg(long, default_value = "animals_report.html")]
        output: PathBuf,

        /// Report title (default: derived from the search filters)
        #[arg(long)]
        title: Option<String>,
    },
}

/// Initialize logging based on verbosity flag.
fn init_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp_secs()
        .init();
}

/// Default store path under the user's data directory.
fn default_store_path() -> PathBuf {
    match std::env::var_os("HOME") {
        Some(home) => PathBuf::from(home).join(".local/share/dierenasiel-alert/seen.json"),
        None => PathBuf::from("seen.json"),
    }
}

/// Assemble the notification sinks for a monitor run.
fn build_sinks(
    no_desktop: bool,
    telegram: bool,
    telegram_token: Option<String>,
    telegram_chat_id: Option<String>,
) -> Result<Vec<Box<dyn Notifier>>> {
    let mut sinks: Vec<Box<dyn Notifier>> = Vec::new();

    if !no_desktop {
        sinks.push(Box::new(DesktopNotifier::new()));
    }
    sinks.push(Box::new(ConsoleNotifier));

    if telegram {
        let token = telegram_token.or_else(|| std::env::var("TELEGRAM_BOT_TOKEN").ok());
        let chat_id = telegram_chat_id.or_else(|| std::env::var("TELEGRAM_CHAT_ID").ok());
        match (token, chat_id) {
            (Some(token), Some(chat_id)) => {
                sinks.push(Box::new(TelegramNotifier::new(token, chat_id)?));
            }
            _ => {
                log::warn!(
                    "Telegram notifications enabled but token or chat id not provided, skipping"
                );
            }
        }
    }

    Ok(sinks)
}

/// Main entry point for the CLI application.
#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config = match &cli.config {
        Some(path) => Config::load(path)?,
        None => Config::load_or_default("config.toml"),
    };
    config.validate()?;

    match cli.command {
        Command::List { filters } => {
            let query = filters.into_query()?;
            let pager = Pager::from_config(&config.scraper)?;
            let animals = pager.fetch_all(&query).await?;

            if animals.is_empty() {
                println!("No {} found for {}", query.animal_type.english(), query.describe());
                return Ok(());
            }

            println!("Found {} for {}:", animals.len(), query.describe());
            println!();
            for animal in &animals {
                println!("  ID: {}", animal.id);
                println!("  Name: {}", animal.name);
                println!("  URL: {}", animal.profile_url);
                if let Some(location) = &animal.location {
                    println!("  Location: {}", location);
                }
                if let Some(site) = &animal.site {
                    println!("  Site: {}", site);
                }
                println!("  Availability: {}", animal.availability);
                if let Some(photo) = &animal.photo_url {
                    println!("  Photo: {}", photo);
                }
                println!();
            }
        }

        Command::Monitor {
            filters,
            interval,
            store,
            telegram,
            telegram_token,
            telegram_chat_id,
            no_desktop,
        } => {
            let query = filters.into_query()?;
            let store = SeenStore::new(store.unwrap_or_else(default_store_path));
            let sinks = build_sinks(no_desktop, telegram, telegram_token, telegram_chat_id)?;
            let pager = Pager::from_config(&config.scraper)?;
            let monitor = Monitor::new(pager, query, store, sinks);

            if interval == 0 {
                monitor.run_once().await?;
            } else {
                monitor
                    .run_interval(Duration::from_secs(interval.max(1)))
                    .await?;
            }
        }

        Command::Report {
            filters,
            output,
            title,
        } => {
            let query = filters.into_query()?;
            let pager = Pager::from_config(&config.scraper)?;
            let animals = pager.fetch_all(&query).await?;

            if animals.is_empty() {
                println!("No {} found for {}", query.animal_type.english(), query.describe());
                return Ok(());
            }

            let title =
                title.unwrap_or_else(|| format!("Dierenasiel Alert - {}", query.describe()));
            log::info!("Generating report for {} animals...", animals.len());
            generate_report(&config.scraper, &animals, &output, &title).await?;
        }
    }

    Ok(())
}
