//! Adaptive-radius neighborhood search around one candidate place
//!
//! The first proximity query decides the direction of the search. A
//! saturated page (as many results as the provider returns at most) means
//! the area is dense, so the radius shrinks until the page is no longer
//! full. A short page means the area is sparse, so the radius grows until
//! the page fills up. Every query is followed by an intersection pass that
//! looks for the other keywords' candidates among the neighbors.

use super::models::{Cluster, KeywordCandidates, Place};
use crate::config::ResolverSettings;
use crate::error::ProviderError;
use crate::provider::PlaceSearchProvider;
use std::fmt;
use tracing::debug;

/// Direction of the radius adjustment, fixed by the first query
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RadiusState {
    Probing,
    Shrinking,
    Growing,
}

impl fmt::Display for RadiusState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Probing => write!(f, "probing"),
            Self::Shrinking => write!(f, "shrinking"),
            Self::Growing => write!(f, "growing"),
        }
    }
}

/// How a neighborhood attempt ended
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    /// The first query around the seed returned nothing
    NoSignal,
    /// Every keyword is represented
    Complete(Cluster),
    /// Best cluster found for this seed before the search stopped
    Partial(Cluster),
}

/// Result of one attempt and the number of proximity queries it cost
#[derive(Debug, Clone, PartialEq)]
pub struct Attempt {
    pub outcome: Outcome,
    pub queries: u32,
}

pub struct NeighborhoodMatcher<'a> {
    provider: &'a dyn PlaceSearchProvider,
    settings: &'a ResolverSettings,
}

impl<'a> NeighborhoodMatcher<'a> {
    pub fn new(provider: &'a dyn PlaceSearchProvider, settings: &'a ResolverSettings) -> Self {
        Self { provider, settings }
    }

    fn in_bounds(&self, radius: u32) -> bool {
        radius >= self.settings.min_radius && radius <= self.settings.max_radius
    }

    /// Search around `seed`, a candidate of `own`, for the candidates of the
    /// other `groups`. `keyword_count` is the number of keywords in the request.
    pub async fn match_around(
        &self,
        own: &KeywordCandidates,
        seed: &Place,
        groups: &[KeywordCandidates],
        keyword_count: usize,
    ) -> Result<Attempt, ProviderError> {
        let mut cluster = Cluster::seeded(own.index, own.keyword.as_str(), seed.clone());
        let mut state = RadiusState::Probing;
        let mut radius = Some(self.settings.default_radius);
        let mut queries = 0;
        let page_limit = self.provider.page_limit();

        while let Some(current) = radius.filter(|r| self.in_bounds(*r)) {
            let neighbors = self.provider.search_nearby(seed.coordinate, current).await?;
            queries += 1;

            debug!(
                "Around '{}' at {}m ({}): {} neighbors",
                seed.name,
                current,
                state,
                neighbors.len()
            );

            if neighbors.is_empty() {
                if state == RadiusState::Probing {
                    return Ok(Attempt {
                        outcome: Outcome::NoSignal,
                        queries,
                    });
                }
                break;
            }

            let saturated = neighbors.len() >= page_limit;
            if state == RadiusState::Probing {
                state = if saturated {
                    RadiusState::Shrinking
                } else {
                    RadiusState::Growing
                };
            }

            intersect(&mut cluster, &neighbors, own.index, groups);
            if cluster.len() == keyword_count {
                return Ok(Attempt {
                    outcome: Outcome::Complete(cluster),
                    queries,
                });
            }

            radius = match (state, saturated) {
                (RadiusState::Shrinking, true) => current.checked_sub(self.settings.radius_step),
                (RadiusState::Growing, false) => current.checked_add(self.settings.radius_step),
                // threshold crossed: keep this radius and its neighbors
                _ => None,
            };
        }

        Ok(Attempt {
            outcome: Outcome::Partial(cluster),
            queries,
        })
    }
}

/// Add to `cluster` one neighbor for every other group not yet represented
fn intersect(cluster: &mut Cluster, neighbors: &[Place], own: usize, groups: &[KeywordCandidates]) {
    for group in groups {
        if group.index == own || cluster.contains_group(group.index) {
            continue;
        }
        if let Some(neighbor) = first_match(&group.candidates, neighbors) {
            debug!("  '{}' matched by neighbor '{}'", group.keyword, neighbor.name);
            cluster.push(group.index, group.keyword.as_str(), neighbor.clone());
        }
    }
}

/// First neighbor sharing a name with a candidate, trying candidates in
/// rank order and neighbors in rank order
fn first_match<'n>(candidates: &[Place], neighbors: &'n [Place]) -> Option<&'n Place> {
    candidates
        .iter()
        .find_map(|candidate| neighbors.iter().find(|n| candidate.same_name(n)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::stub::{filler, StubProvider};

    fn settings() -> ResolverSettings {
        ResolverSettings::default()
    }

    fn groups() -> (KeywordCandidates, Vec<KeywordCandidates>) {
        let a = KeywordCandidates::new(0, "a", vec![Place::new("Alpha", 10.0, 10.0)]);
        let b = KeywordCandidates::new(1, "b", vec![Place::new("Bravo", 50.0, 50.0)]);
        (a.clone(), vec![a, b])
    }

    fn with(mut places: Vec<Place>, extra: Place) -> Vec<Place> {
        places.push(extra);
        places
    }

    #[test]
    fn test_first_match_prefers_candidate_rank() {
        let candidates = vec![Place::new("X", 0.0, 0.0), Place::new("Y", 0.0, 0.0)];
        let neighbors = vec![Place::new("y", 1.0, 1.0), Place::new("x", 2.0, 2.0)];
        let hit = first_match(&candidates, &neighbors).unwrap();
        assert_eq!(hit.name, "x");
        assert_eq!(hit.coordinate.latitude, 2.0);
    }

    #[test]
    fn test_first_match_is_exact() {
        let candidates = vec![Place::new("CAFE", 0.0, 0.0)];
        let neighbors = vec![Place::new("Café ", 1.0, 1.0), Place::new("The Cafe", 2.0, 2.0)];
        assert!(first_match(&candidates, &neighbors).is_none());

        let neighbors = vec![Place::new("Cafe", 3.0, 3.0)];
        assert_eq!(first_match(&candidates, &neighbors).unwrap().name, "Cafe");
    }

    #[tokio::test]
    async fn test_no_signal_on_empty_probe() {
        let (own, groups) = groups();
        let provider = StubProvider::new();
        let settings = settings();
        let matcher = NeighborhoodMatcher::new(&provider, &settings);

        let attempt = matcher
            .match_around(&own, &own.candidates[0], &groups, 2)
            .await
            .unwrap();
        assert_eq!(attempt.outcome, Outcome::NoSignal);
        assert_eq!(attempt.queries, 1);
    }

    #[tokio::test]
    async fn test_always_saturated_shrinks_to_min_and_stops() {
        let (own, groups) = groups();
        let seed = own.candidates[0].clone();
        let provider = StubProvider::new().with_nearby(&seed, filler(20));
        let settings = settings();
        let matcher = NeighborhoodMatcher::new(&provider, &settings);

        let attempt = matcher.match_around(&own, &seed, &groups, 2).await.unwrap();

        let radii: Vec<u32> = provider.nearby_calls().iter().map(|(_, r)| *r).collect();
        assert_eq!(radii, vec![50, 40, 30, 20, 10]);
        assert_eq!(attempt.queries, 5);
        match attempt.outcome {
            Outcome::Partial(cluster) => {
                assert_eq!(cluster.len(), 1);
                assert_eq!(cluster.seed(), &seed);
            }
            other => panic!("unexpected outcome: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_saturation_uses_provider_page_limit() {
        let (own, groups) = groups();
        let seed = own.candidates[0].clone();
        // a full page for a provider that returns at most 10 places
        let provider = StubProvider::new()
            .with_page_limit(10)
            .with_nearby(&seed, filler(10));
        let settings = settings();
        let matcher = NeighborhoodMatcher::new(&provider, &settings);

        matcher.match_around(&own, &seed, &groups, 2).await.unwrap();

        let radii: Vec<u32> = provider.nearby_calls().iter().map(|(_, r)| *r).collect();
        assert_eq!(radii, vec![50, 40, 30, 20, 10]);
    }

    #[tokio::test]
    async fn test_never_saturated_grows_to_max_and_stops() {
        let (own, groups) = groups();
        let seed = own.candidates[0].clone();
        let provider = StubProvider::new().with_nearby(&seed, filler(3));
        let settings = settings();
        let matcher = NeighborhoodMatcher::new(&provider, &settings);

        let attempt = matcher.match_around(&own, &seed, &groups, 2).await.unwrap();

        let radii: Vec<u32> = provider.nearby_calls().iter().map(|(_, r)| *r).collect();
        assert_eq!(radii.first(), Some(&50));
        assert_eq!(radii.last(), Some(&300));
        assert_eq!(radii.len(), 26);
        assert!(matches!(attempt.outcome, Outcome::Partial(_)));
    }

    #[tokio::test]
    async fn test_growing_stops_when_page_fills() {
        let (own, groups) = groups();
        let seed = own.candidates[0].clone();
        let provider = StubProvider::new()
            .with_nearby_fn(&seed, |r| if r < 70 { filler(5) } else { filler(20) });
        let settings = settings();
        let matcher = NeighborhoodMatcher::new(&provider, &settings);

        let attempt = matcher.match_around(&own, &seed, &groups, 2).await.unwrap();

        let radii: Vec<u32> = provider.nearby_calls().iter().map(|(_, r)| *r).collect();
        assert_eq!(radii, vec![50, 60, 70]);
        assert_eq!(attempt.queries, 3);
    }

    #[tokio::test]
    async fn test_direction_is_fixed_by_first_query() {
        let (own, groups) = groups();
        let seed = own.candidates[0].clone();
        // saturated at 50 and 40, short at 30: shrinking must stop at 30 and
        // never turn around to grow
        let provider = StubProvider::new()
            .with_nearby_fn(&seed, |r| if r >= 40 { filler(20) } else { filler(4) });
        let settings = settings();
        let matcher = NeighborhoodMatcher::new(&provider, &settings);

        matcher.match_around(&own, &seed, &groups, 2).await.unwrap();

        let radii: Vec<u32> = provider.nearby_calls().iter().map(|(_, r)| *r).collect();
        assert_eq!(radii, vec![50, 40, 30]);
    }

    #[tokio::test]
    async fn test_match_found_while_growing() {
        let (own, groups) = groups();
        let seed = own.candidates[0].clone();
        let provider = StubProvider::new().with_nearby_fn(&seed, |r| {
            if r < 80 {
                filler(5)
            } else {
                with(filler(5), Place::new("BRAVO", 10.001, 10.001))
            }
        });
        let settings = settings();
        let matcher = NeighborhoodMatcher::new(&provider, &settings);

        let attempt = matcher.match_around(&own, &seed, &groups, 2).await.unwrap();

        assert_eq!(attempt.queries, 4);
        match attempt.outcome {
            Outcome::Complete(cluster) => {
                assert_eq!(cluster.len(), 2);
                let matched = &cluster.members()[1];
                assert_eq!(matched.group, 1);
                assert_eq!(matched.keyword, "b");
                // the neighbor near the seed is kept, not the distant candidate
                assert_eq!(matched.place.coordinate.latitude, 10.001);
            }
            other => panic!("unexpected outcome: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_partial_matches_accumulate_once_per_group() {
        let a = KeywordCandidates::new(0, "a", vec![Place::new("Alpha", 10.0, 10.0)]);
        let b = KeywordCandidates::new(1, "b", vec![Place::new("Bravo", 0.0, 0.0)]);
        let c = KeywordCandidates::new(2, "c", vec![Place::new("Charlie", 0.0, 0.0)]);
        let groups = vec![a.clone(), b, c];
        let seed = a.candidates[0].clone();
        // Bravo shows up at every radius, Charlie never does
        let provider = StubProvider::new()
            .with_nearby(&seed, with(filler(3), Place::new("Bravo", 10.0, 10.0)));
        let settings = settings();
        let matcher = NeighborhoodMatcher::new(&provider, &settings);

        let attempt = matcher.match_around(&a, &seed, &groups, 3).await.unwrap();

        assert_eq!(attempt.queries, 26);
        match attempt.outcome {
            Outcome::Partial(cluster) => {
                assert_eq!(cluster.len(), 2);
                assert!(cluster.contains_group(1));
                assert!(!cluster.contains_group(2));
            }
            other => panic!("unexpected outcome: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_empty_page_after_probe_keeps_cluster() {
        let a = KeywordCandidates::new(0, "a", vec![Place::new("Alpha", 10.0, 10.0)]);
        let b = KeywordCandidates::new(1, "b", vec![Place::new("Bravo", 0.0, 0.0)]);
        let c = KeywordCandidates::new(2, "c", vec![Place::new("Charlie", 0.0, 0.0)]);
        let groups = vec![a.clone(), b, c];
        let seed = a.candidates[0].clone();
        let provider = StubProvider::new().with_nearby_fn(&seed, |r| {
            if r == 50 {
                vec![Place::new("Bravo", 10.0, 10.0)]
            } else {
                vec![]
            }
        });
        let settings = settings();
        let matcher = NeighborhoodMatcher::new(&provider, &settings);

        let attempt = matcher.match_around(&a, &seed, &groups, 3).await.unwrap();
        assert_eq!(attempt.queries, 2);
        match attempt.outcome {
            Outcome::Partial(cluster) => assert_eq!(cluster.len(), 2),
            other => panic!("unexpected outcome: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_zero_min_radius_terminates() {
        let (own, groups) = groups();
        let seed = own.candidates[0].clone();
        let provider = StubProvider::new().with_nearby(&seed, filler(20));
        let settings = ResolverSettings {
            min_radius: 0,
            ..ResolverSettings::default()
        };
        let matcher = NeighborhoodMatcher::new(&provider, &settings);

        matcher.match_around(&own, &seed, &groups, 2).await.unwrap();

        let radii: Vec<u32> = provider.nearby_calls().iter().map(|(_, r)| *r).collect();
        assert_eq!(radii, vec![50, 40, 30, 20, 10, 0]);
    }

    #[tokio::test]
    async fn test_provider_error_propagates() {
        let (own, groups) = groups();
        let provider = StubProvider::new().failing_nearby(ProviderError::RateLimited);
        let settings = settings();
        let matcher = NeighborhoodMatcher::new(&provider, &settings);

        let result = matcher
            .match_around(&own, &own.candidates[0], &groups, 2)
            .await;
        assert_eq!(result.unwrap_err(), ProviderError::RateLimited);
    }
}
