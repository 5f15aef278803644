//! HTTP networking module
//!
//! Provides the pooled HTTP client used to reach place-search providers.

mod client;

pub use client::{HttpClient, ProviderRequest, ProviderResponse};
