//! WhereAmI-RS: resolve an approximate position and a few remembered
//! place names into a precise coordinate.
//!
//! Candidates for every keyword are fetched from a place search provider,
//! then an adaptive-radius neighborhood search looks for a cluster of
//! places, one per keyword, standing close to each other. The answer is
//! the mean coordinate of the best cluster.

pub mod config;
pub mod error;
pub mod metrics;
pub mod network;
pub mod provider;
pub mod query;
pub mod resolver;
pub mod web;

pub use config::Settings;
pub use error::{ProviderError, ResolveError};
pub use provider::PlaceSearchProvider;
pub use resolver::{Coordinate, LocationResolver, LocationResult, Place, Resolution};

/// Application version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
