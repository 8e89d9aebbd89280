//! Endpoint and credential configuration for the JCDecaux APIs
//!
//! The defaults point at the public developer portal; tests override the
//! base URLs to keep request construction observable without a network.

/// Base URL for the contracts listing
const CONTRACTS_BASE_URL: &str = "https://developer.jcdecaux.com/rest/vls";

/// Base URL for per-city station catalogs
const STATIONS_BASE_URL: &str = "https://developer.jcdecaux.com/rest/vls";

/// Base URL for the live per-station details API
const STATIONS_API_BASE_URL: &str = "https://api.jcdecaux.com/vls/v1";

/// API endpoints and the credential passed through on detail requests
#[derive(Debug, Clone)]
pub struct ApiConfig {
    contracts_base: String,
    stations_base: String,
    stations_api_base: String,
    api_key: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            contracts_base: CONTRACTS_BASE_URL.to_string(),
            stations_base: STATIONS_BASE_URL.to_string(),
            stations_api_base: STATIONS_API_BASE_URL.to_string(),
            api_key: String::new(),
        }
    }
}

impl ApiConfig {
    /// Sets the API key sent with station detail requests
    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = api_key.into();
        self
    }

    /// Overrides the contracts endpoint base URL
    pub fn with_contracts_base(mut self, base: impl Into<String>) -> Self {
        self.contracts_base = base.into();
        self
    }

    /// Overrides the station catalog endpoint base URL
    pub fn with_stations_base(mut self, base: impl Into<String>) -> Self {
        self.stations_base = base.into();
        self
    }

    /// Overrides the station detail API base URL
    pub fn with_stations_api_base(mut self, base: impl Into<String>) -> Self {
        self.stations_api_base = base.into();
        self
    }

    /// URL of the contracts listing
    pub fn contracts_url(&self) -> String {
        format!("{}/contracts", self.contracts_base)
    }

    /// URL of the station catalog for one city
    pub fn carto_url(&self, city: &str) -> String {
        format!("{}/stations/{}.json", self.stations_base, city)
    }

    /// URL of the live details for one station within a contract
    pub fn station_details_url(&self, station_number: &str, contract: &str) -> String {
        format!(
            "{}/stations/{}?contract={}&apiKey={}",
            self.stations_api_base, station_number, contract, self.api_key
        )
    }
}
