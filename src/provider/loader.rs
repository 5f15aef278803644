//! Provider loader for initializing the place-search provider from configuration

use super::google::GooglePlaces;
use super::traits::PlaceSearchProvider;
use crate::config::Settings;
use crate::network::HttpClient;
use anyhow::Result;
use std::sync::Arc;
use tracing::info;

/// Loader for initializing providers from configuration
pub struct ProviderLoader;

impl ProviderLoader {
    /// Create the configured provider
    pub fn load(settings: &Settings, client: HttpClient) -> Result<Arc<dyn PlaceSearchProvider>> {
        let config = &settings.provider;
        let provider: Arc<dyn PlaceSearchProvider> = match config.engine.as_str() {
            "google_places" => {
                let api_key = config
                    .api_key
                    .as_deref()
                    .filter(|k| !k.is_empty())
                    .ok_or_else(|| {
                        anyhow::anyhow!("provider google_places requires an api_key")
                    })?;
                Arc::new(GooglePlaces::with_settings(client, api_key, config))
            }
            other => {
                return Err(anyhow::anyhow!("Unknown provider type: {}", other));
            }
        };

        info!("Loaded provider: {} ({})", provider.name(), config.base_url);
        Ok(provider)
    }

    /// Get list of available provider types
    pub fn available_providers() -> Vec<&'static str> {
        vec!["google_places"]
    }
}
