//! Place-search provider module
//!
//! Defines the provider trait the resolver depends on and the concrete
//! provider implementations.

mod loader;
mod traits;

pub mod google;

#[cfg(test)]
pub(crate) mod stub;

pub use loader::ProviderLoader;
pub use traits::*;
