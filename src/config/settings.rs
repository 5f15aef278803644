//! Settings structures for WhereAmI-RS configuration

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Main settings structure loaded from settings.yml
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub general: GeneralSettings,
    pub server: ServerSettings,
    pub outgoing: OutgoingSettings,
    pub provider: ProviderSettings,
    pub resolver: ResolverSettings,
    pub query: QuerySettings,
}

impl Settings {
    /// Load settings from a YAML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    /// Parse settings from YAML text
    pub fn from_yaml(content: &str) -> Result<Self> {
        let settings: Settings = serde_yaml::from_str(content)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Check the provider and resolver sections
    pub fn validate(&self) -> std::result::Result<(), crate::error::ResolveError> {
        if self.provider.page_size == 0 {
            return Err(crate::error::ResolveError::Config(
                "provider page_size must be positive".into(),
            ));
        }
        self.resolver.validate()
    }

    /// Merge with environment variables (WHEREAMI_* prefix)
    pub fn merge_env(&mut self) {
        self.merge_vars(|key| std::env::var(key).ok());
    }

    fn merge_vars<F>(&mut self, var: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(val) = var("WHEREAMI_DEBUG") {
            self.general.debug = val.parse().unwrap_or(false);
        }
        if let Some(val) = var("WHEREAMI_PORT") {
            if let Ok(port) = val.parse() {
                self.server.port = port;
            }
        }
        if let Some(val) = var("WHEREAMI_BIND_ADDRESS") {
            self.server.bind_address = val;
        }
        if let Some(val) = var("WHEREAMI_API_KEY") {
            self.provider.api_key = Some(val);
        }
        if let Some(val) = var("WHEREAMI_PROVIDER_URL") {
            self.provider.base_url = val;
        }
    }
}

/// General settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralSettings {
    /// Enable debug logging
    pub debug: bool,
    /// Instance name reported by /health
    pub instance_name: String,
}

impl Default for GeneralSettings {
    fn default() -> Self {
        Self {
            debug: false,
            instance_name: "WhereAmI".to_string(),
        }
    }
}

/// Server settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
    /// Server port
    pub port: u16,
    /// Bind address
    pub bind_address: String,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            port: 8080,
            bind_address: "127.0.0.1".to_string(),
        }
    }
}

/// Outgoing request settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutgoingSettings {
    /// Per-call request timeout in seconds
    pub request_timeout: f64,
    /// Idle pooled connections kept per host
    pub pool_maxsize: usize,
    /// Extra attempts after a network failure or timeout
    pub retries: u32,
    /// User agent sent to the provider
    pub user_agent: String,
    /// Proxy settings
    pub proxies: ProxySettings,
}

impl Default for OutgoingSettings {
    fn default() -> Self {
        Self {
            request_timeout: 5.0,
            pool_maxsize: 20,
            retries: 0,
            user_agent: format!("whereami-rs/{}", crate::VERSION),
            proxies: ProxySettings::default(),
        }
    }
}

/// Proxy settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ProxySettings {
    pub http: Option<String>,
    pub https: Option<String>,
    pub all: Option<String>,
}

/// Place-search provider settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProviderSettings {
    /// Provider implementation to load
    pub engine: String,
    /// API key if required
    pub api_key: Option<String>,
    /// Base URL of the provider's place API
    pub base_url: String,
    /// Result language requested from the provider
    pub language: Option<String>,
    /// Maximum places kept from one response
    pub page_size: usize,
}

impl Default for ProviderSettings {
    fn default() -> Self {
        Self {
            engine: "google_places".to_string(),
            api_key: None,
            base_url: "https://maps.googleapis.com/maps/api/place".to_string(),
            language: None,
            page_size: crate::provider::DEFAULT_PAGE_LIMIT,
        }
    }
}

/// Tunables of the location-resolution algorithm. Distances are meters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResolverSettings {
    /// Starting radius of every neighborhood search
    pub default_radius: u32,
    /// Amount the radius shrinks or grows per step
    pub radius_step: u32,
    /// Neighborhood search stops once the radius exceeds this
    pub max_radius: u32,
    /// Neighborhood search stops once the radius drops below this
    pub min_radius: u32,
    /// Radius of the per-keyword text search around the rough position
    pub search_radius: u32,
    /// Answer with a lone seed place when nothing else matched
    pub accept_seed_only: bool,
    /// Issue the per-keyword text searches concurrently
    pub parallel_candidate_search: bool,
}

impl Default for ResolverSettings {
    fn default() -> Self {
        Self {
            default_radius: 50,
            radius_step: 10,
            max_radius: 300,
            min_radius: 10,
            search_radius: 20_000,
            accept_seed_only: true,
            parallel_candidate_search: false,
        }
    }
}

impl ResolverSettings {
    /// Reject combinations under which the adaptive search cannot terminate
    /// or can never run.
    pub fn validate(&self) -> std::result::Result<(), crate::error::ResolveError> {
        use crate::error::ResolveError;

        if self.radius_step == 0 {
            return Err(ResolveError::Config("radius_step must be positive".into()));
        }
        if self.search_radius == 0 {
            return Err(ResolveError::Config("search_radius must be positive".into()));
        }
        if self.min_radius > self.max_radius {
            return Err(ResolveError::Config(format!(
                "min_radius {} exceeds max_radius {}",
                self.min_radius, self.max_radius
            )));
        }
        if !(self.min_radius..=self.max_radius).contains(&self.default_radius) {
            return Err(ResolveError::Config(format!(
                "default_radius {} outside [{}, {}]",
                self.default_radius, self.min_radius, self.max_radius
            )));
        }
        Ok(())
    }
}

/// How the raw keyword string of the legacy endpoint is split
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct QuerySettings {
    /// Separator between keywords
    pub separator: String,
    /// Wrap each keyword as `*keyword*` before searching
    pub wildcard: bool,
}

impl Default for QuerySettings {
    fn default() -> Self {
        Self {
            separator: "&".to_string(),
            wildcard: true,
        }
    }
}
