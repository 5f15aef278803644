//! Deterministic in-memory provider for tests

use super::traits::*;
use crate::error::ProviderError;
use crate::resolver::{Coordinate, Place};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;

/// One recorded provider call
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    Text { query: String, radius: u32 },
    Nearby { center: (f64, f64), radius: u32 },
}

type NearbyFn = Box<dyn Fn(u32) -> Vec<Place> + Send + Sync>;

/// Answers text searches from a keyword table and nearby searches from a
/// per-seed function of the radius. Unknown inputs yield no places.
#[derive(Default)]
pub struct StubProvider {
    text: HashMap<String, Vec<Place>>,
    nearby: Vec<((f64, f64), NearbyFn)>,
    fail_text: Option<ProviderError>,
    fail_nearby: Option<ProviderError>,
    page_limit: Option<usize>,
    calls: Mutex<Vec<Call>>,
}

impl StubProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_text(mut self, query: &str, places: Vec<Place>) -> Self {
        self.text.insert(query.to_string(), places);
        self
    }

    /// Same neighbors at every radius
    pub fn with_nearby(self, seed: &Place, neighbors: Vec<Place>) -> Self {
        self.with_nearby_fn(seed, move |_| neighbors.clone())
    }

    pub fn with_nearby_fn<F>(mut self, seed: &Place, f: F) -> Self
    where
        F: Fn(u32) -> Vec<Place> + Send + Sync + 'static,
    {
        let key = (seed.coordinate.latitude, seed.coordinate.longitude);
        self.nearby.push((key, Box::new(f)));
        self
    }

    pub fn with_page_limit(mut self, limit: usize) -> Self {
        self.page_limit = Some(limit);
        self
    }

    pub fn failing_text(mut self, err: ProviderError) -> Self {
        self.fail_text = Some(err);
        self
    }

    pub fn failing_nearby(mut self, err: ProviderError) -> Self {
        self.fail_nearby = Some(err);
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn text_queries(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                Call::Text { query, .. } => Some(query),
                Call::Nearby { .. } => None,
            })
            .collect()
    }

    pub fn nearby_calls(&self) -> Vec<((f64, f64), u32)> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                Call::Nearby { center, radius } => Some((center, radius)),
                Call::Text { .. } => None,
            })
            .collect()
    }
}

/// `n` distinct filler places, none of which match a keyword
pub fn filler(n: usize) -> Vec<Place> {
    (0..n)
        .map(|i| Place::new(format!("filler {}", i), 0.0, 0.0))
        .collect()
}

#[async_trait]
impl PlaceSearchProvider for StubProvider {
    fn name(&self) -> &str {
        "stub"
    }

    fn page_limit(&self) -> usize {
        self.page_limit.unwrap_or(DEFAULT_PAGE_LIMIT)
    }

    async fn search_by_text(
        &self,
        _center: Coordinate,
        radius_m: u32,
        query: &str,
    ) -> Result<Vec<Place>, ProviderError> {
        self.calls.lock().unwrap().push(Call::Text {
            query: query.to_string(),
            radius: radius_m,
        });
        if let Some(ref err) = self.fail_text {
            return Err(err.clone());
        }
        Ok(self.text.get(query).cloned().unwrap_or_default())
    }

    async fn search_nearby(
        &self,
        center: Coordinate,
        radius_m: u32,
    ) -> Result<Vec<Place>, ProviderError> {
        let key = (center.latitude, center.longitude);
        self.calls.lock().unwrap().push(Call::Nearby {
            center: key,
            radius: radius_m,
        });
        if let Some(ref err) = self.fail_nearby {
            return Err(err.clone());
        }
        Ok(self
            .nearby
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, f)| f(radius_m))
            .unwrap_or_default())
    }
}
