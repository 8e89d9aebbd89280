//! BikeMee CLI - JCDecaux bike-share data with a local response cache
//!
//! Each subcommand runs one cache manager operation and prints the payload
//! delivered by its completion event. A failed operation emits no event, so
//! the process exits non-zero with nothing on stdout.

use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use bikemee::cache::CacheStore;
use bikemee::cli::{Cli, Command};
use bikemee::config::ApiConfig;
use bikemee::fetch::HttpFetcher;
use bikemee::manager::{CacheEvent, CacheManager};

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}

#[tokio::main]
async fn main() -> ExitCode {
    init_logging();
    let cli = Cli::parse();

    let store = match &cli.cache_dir {
        Some(dir) => CacheStore::with_dir(dir.clone()),
        None => match CacheStore::new() {
            Some(store) => store,
            None => {
                eprintln!("could not determine a cache directory");
                return ExitCode::FAILURE;
            }
        },
    };

    // Purge is synchronous and needs neither a fetcher nor a manager.
    if matches!(cli.command, Command::Purge) {
        return if store.purge_all() {
            ExitCode::SUCCESS
        } else {
            eprintln!("cache purge failed; some entries may remain");
            ExitCode::FAILURE
        };
    }

    let fetcher = match HttpFetcher::with_insecure_tls(cli.insecure) {
        Ok(fetcher) => Arc::new(fetcher),
        Err(e) => {
            eprintln!("failed to build HTTP client: {e}");
            return ExitCode::FAILURE;
        }
    };

    let config = ApiConfig::default().with_api_key(cli.api_key.clone());
    let (manager, mut events) = CacheManager::new(store, fetcher, config);

    match &cli.command {
        Command::Contracts { refresh } => manager.get_contracts(*refresh).await,
        Command::Carto { city } => manager.download_carto(city).await,
        Command::Station { number, contract } => {
            manager.get_station_details(number, contract).await
        }
        Command::Purge => unreachable!("handled above"),
    }

    match events.try_recv() {
        Ok(CacheEvent::ContractsUpdated(body))
        | Ok(CacheEvent::CartoChanged(body))
        | Ok(CacheEvent::StationDetails(body)) => {
            println!("{body}");
            ExitCode::SUCCESS
        }
        // No event: the operation failed, or contracts had no cached copy
        // and --refresh was not passed.
        Err(_) => ExitCode::FAILURE,
    }
}
