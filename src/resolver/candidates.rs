//! Per-keyword candidate search

use super::models::{Coordinate, KeywordCandidates};
use crate::error::ProviderError;
use crate::provider::PlaceSearchProvider;
use tracing::debug;

/// Looks up the places matching one keyword around the rough position.
///
/// The search radius is deliberately wide so that a position error of a
/// few kilometers does not exclude the true place.
pub struct CandidateFinder<'a> {
    provider: &'a dyn PlaceSearchProvider,
    search_radius: u32,
}

impl<'a> CandidateFinder<'a> {
    pub fn new(provider: &'a dyn PlaceSearchProvider, search_radius: u32) -> Self {
        Self {
            provider,
            search_radius,
        }
    }

    /// Ranked candidates for the keyword at position `index` of the request,
    /// exactly as the provider returned them
    pub async fn find(
        &self,
        approx: Coordinate,
        index: usize,
        keyword: &str,
    ) -> Result<KeywordCandidates, ProviderError> {
        let places = self
            .provider
            .search_by_text(approx, self.search_radius, keyword)
            .await?;

        debug!(
            "Keyword '{}': {} candidates within {}m",
            keyword,
            places.len(),
            self.search_radius
        );
        for place in &places {
            debug!(
                "  {}: {}, {}",
                place.name, place.coordinate.latitude, place.coordinate.longitude
            );
        }

        Ok(KeywordCandidates::new(index, keyword, places))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::stub::{Call, StubProvider};
    use crate::resolver::Place;

    #[tokio::test]
    async fn test_find_returns_ranked_list_verbatim() {
        let places = vec![
            Place::new("Starbucks", 40.1, -73.9),
            Place::new("Starbucks Coffee", 40.2, -73.8),
        ];
        let provider = StubProvider::new().with_text("starbucks", places.clone());
        let finder = CandidateFinder::new(&provider, 20_000);

        let found = finder
            .find(Coordinate::new(40.0, -74.0), 3, "starbucks")
            .await
            .unwrap();

        assert_eq!(found.index, 3);
        assert_eq!(found.keyword, "starbucks");
        assert_eq!(found.candidates, places);
        assert_eq!(
            provider.calls(),
            vec![Call::Text {
                query: "starbucks".to_string(),
                radius: 20_000
            }]
        );
    }

    #[tokio::test]
    async fn test_find_unknown_keyword_is_empty() {
        let provider = StubProvider::new();
        let finder = CandidateFinder::new(&provider, 20_000);
        let found = finder
            .find(Coordinate::default(), 0, "nowhere")
            .await
            .unwrap();
        assert!(found.is_empty());
    }

    #[tokio::test]
    async fn test_find_propagates_provider_error() {
        let provider = StubProvider::new().failing_text(ProviderError::Timeout);
        let finder = CandidateFinder::new(&provider, 20_000);
        let result = finder.find(Coordinate::default(), 0, "x").await;
        assert_eq!(result.unwrap_err(), ProviderError::Timeout);
    }
}
