//! Command-line interface parsing for the BikeMee client
//!
//! This module handles parsing of CLI arguments using clap, mapping each
//! subcommand onto one cache manager operation.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// BikeMee - JCDecaux bike-share data with a local response cache
#[derive(Parser, Debug)]
#[command(name = "bikemee")]
#[command(about = "Fetch JCDecaux bike-share contracts, station catalogs and live station details")]
#[command(version)]
pub struct Cli {
    /// Disable TLS certificate verification (insecure; only for endpoints
    /// with a broken certificate chain)
    #[arg(long, global = true)]
    pub insecure: bool,

    /// JCDecaux API key, used by the station detail request
    #[arg(long, global = true, env = "JCDECAUX_API_KEY", default_value = "")]
    pub api_key: String,

    /// Override the cache directory (defaults to the platform cache dir)
    #[arg(long, global = true, value_name = "DIR")]
    pub cache_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

/// One subcommand per cache manager operation
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Print the contracts listing (served from cache unless --refresh)
    Contracts {
        /// Force a network refresh even when a cached copy exists
        #[arg(long)]
        refresh: bool,
    },
    /// Print the station catalog for a city, downloading it if the cached
    /// copy is missing or older than two weeks
    Carto {
        /// Contract/city code, e.g. "paris"
        city: String,
    },
    /// Print live details for one station (always fetched, never cached)
    Station {
        /// Station number
        number: String,
        /// Contract/city code the station belongs to
        #[arg(long)]
        contract: String,
    },
    /// Delete the cache directory and everything in it
    Purge,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_contracts_default() {
        let cli = Cli::parse_from(["bikemee", "contracts"]);
        match cli.command {
            Command::Contracts { refresh } => assert!(!refresh),
            other => panic!("Expected Contracts, got {other:?}"),
        }
    }

    #[test]
    fn test_parse_contracts_with_refresh() {
        let cli = Cli::parse_from(["bikemee", "contracts", "--refresh"]);
        match cli.command {
            Command::Contracts { refresh } => assert!(refresh),
            other => panic!("Expected Contracts, got {other:?}"),
        }
    }

    #[test]
    fn test_parse_carto_captures_city() {
        let cli = Cli::parse_from(["bikemee", "carto", "paris"]);
        match cli.command {
            Command::Carto { city } => assert_eq!(city, "paris"),
            other => panic!("Expected Carto, got {other:?}"),
        }
    }

    #[test]
    fn test_parse_station_requires_contract() {
        let result = Cli::try_parse_from(["bikemee", "station", "42"]);
        assert!(result.is_err(), "station without --contract should be rejected");
    }

    #[test]
    fn test_parse_station_with_contract() {
        let cli = Cli::parse_from(["bikemee", "station", "42", "--contract", "lyon"]);
        match cli.command {
            Command::Station { number, contract } => {
                assert_eq!(number, "42");
                assert_eq!(contract, "lyon");
            }
            other => panic!("Expected Station, got {other:?}"),
        }
    }

    #[test]
    fn test_insecure_defaults_off() {
        let cli = Cli::parse_from(["bikemee", "contracts"]);
        assert!(!cli.insecure);
    }

    #[test]
    fn test_insecure_flag_after_subcommand() {
        let cli = Cli::parse_from(["bikemee", "carto", "paris", "--insecure"]);
        assert!(cli.insecure);
    }

    #[test]
    fn test_cache_dir_override() {
        let cli = Cli::parse_from(["bikemee", "--cache-dir", "/tmp/bm", "purge"]);
        assert_eq!(cli.cache_dir.as_deref(), Some(std::path::Path::new("/tmp/bm")));
    }

    #[test]
    fn test_missing_subcommand_is_rejected() {
        assert!(Cli::try_parse_from(["bikemee"]).is_err());
    }
}
