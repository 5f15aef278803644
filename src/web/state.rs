//! Application state shared across handlers

use crate::config::Settings;
use crate::metrics::Metrics;
use crate::provider::PlaceSearchProvider;
use crate::resolver::LocationResolver;
use std::sync::Arc;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Global settings
    pub settings: Arc<Settings>,
    /// Location resolver
    pub resolver: Arc<LocationResolver>,
    /// Metrics collector
    pub metrics: Arc<Metrics>,
}

impl AppState {
    /// Create new application state
    pub fn new(settings: Settings, provider: Arc<dyn PlaceSearchProvider>) -> anyhow::Result<Self> {
        let resolver = LocationResolver::new(provider, settings.resolver.clone())?;

        Ok(Self {
            settings: Arc::new(settings),
            resolver: Arc::new(resolver),
            metrics: Arc::new(Metrics::new()),
        })
    }

    /// Get instance name
    pub fn instance_name(&self) -> &str {
        &self.settings.general.instance_name
    }
}
