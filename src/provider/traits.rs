//! Provider trait

use crate::error::ProviderError;
use crate::resolver::{Coordinate, Place};
use async_trait::async_trait;

/// Page size of the reference provider; a response this long is saturated
pub const DEFAULT_PAGE_LIMIT: usize = 20;

/// An external service answering proximity and text queries for places.
///
/// Both queries return places ranked by the provider, at most one page.
#[async_trait]
pub trait PlaceSearchProvider: Send + Sync {
    /// Provider name
    fn name(&self) -> &str;

    /// Most places one query returns; a page this long is saturated
    fn page_limit(&self) -> usize {
        DEFAULT_PAGE_LIMIT
    }

    /// Places matching `query` within `radius_m` meters of `center`
    async fn search_by_text(
        &self,
        center: Coordinate,
        radius_m: u32,
        query: &str,
    ) -> Result<Vec<Place>, ProviderError>;

    /// Any places within `radius_m` meters of `center`
    async fn search_nearby(
        &self,
        center: Coordinate,
        radius_m: u32,
    ) -> Result<Vec<Place>, ProviderError>;
}
