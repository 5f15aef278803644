//! Location resolution
//!
//! Turns a rough position and a handful of place names into one
//! coordinate: each keyword is searched around the rough position, then
//! the neighborhoods of the candidates are searched for the other
//! keywords, and the places of the best matching cluster are averaged.

mod candidates;
mod executor;
mod models;
mod neighborhood;

pub use candidates::CandidateFinder;
pub use executor::LocationResolver;
pub use models::*;
pub use neighborhood::{Attempt, NeighborhoodMatcher, Outcome, RadiusState};
