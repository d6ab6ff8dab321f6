//! Lunch CLI - print NYC public school lunch menus
//!
//! Downloads (or reads from cache) the published menu CSV for a month and
//! prints one line per school day.

use std::io;

use chrono::{Datelike, Local, Month};
use clap::FromArgMatches;

use lunch::app::App;
use lunch::cache::CacheManager;
use lunch::cli::{self, Cli, Commands, PrintSelection};
use lunch::config::LunchConfig;
use lunch::data::MenuClient;
use lunch::error::AppError;

#[tokio::main(flavor = "current_thread")]
async fn main() {
    // Initialize logging
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"))
        .format_timestamp(None)
        .init();

    // Parse CLI arguments
    let cli = Cli::from_arg_matches(&cli::command().get_matches()).unwrap_or_else(|e| e.exit());

    if cli.verbose {
        log::set_max_level(log::LevelFilter::Debug);
    }

    if let Err(e) = run(&cli).await {
        log::error!("{}", e);
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

async fn run(cli: &Cli) -> Result<(), AppError> {
    let config = LunchConfig::load(cli.config.as_deref())?;

    let cache = match &cli.cache_dir {
        Some(dir) => CacheManager::with_dir(dir.clone()),
        None => CacheManager::new().ok_or(AppError::NoCacheDir)?,
    };

    match &cli.command {
        Commands::Print(args) => {
            let selection = PrintSelection::from_args(args)?;
            let client = MenuClient::new(cache).with_refresh(selection.refresh);
            let app = App::new(config, client);

            let mut stdout = io::stdout();
            app.run_print(&selection, current_month(), &mut stdout)
                .await
        }
    }
}

/// The month of the local date the command runs on
fn current_month() -> Month {
    let month = Local::now().month();
    // Datelike::month is always 1..=12
    Month::try_from(month as u8).unwrap_or(Month::January)
}
