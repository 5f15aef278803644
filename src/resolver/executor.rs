//! Resolution orchestration

use super::candidates::CandidateFinder;
use super::models::{
    Cluster, Coordinate, KeywordCandidates, LocationResult, NotFoundReason, Resolution,
    ResolutionStats,
};
use super::neighborhood::{NeighborhoodMatcher, Outcome};
use crate::config::ResolverSettings;
use crate::error::{Phase, ResolveError, Result};
use crate::provider::PlaceSearchProvider;
use futures::future::try_join_all;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Resolves a rough position plus nearby place names to a single coordinate
pub struct LocationResolver {
    provider: Arc<dyn PlaceSearchProvider>,
    settings: ResolverSettings,
}

impl LocationResolver {
    /// Create a resolver; fails if the settings cannot drive a terminating search
    pub fn new(provider: Arc<dyn PlaceSearchProvider>, settings: ResolverSettings) -> Result<Self> {
        settings.validate()?;
        Ok(Self { provider, settings })
    }

    /// Flat variant for transport layers
    pub async fn resolve_location(
        &self,
        latitude: f64,
        longitude: f64,
        keywords: &[String],
    ) -> Result<LocationResult> {
        let resolution = self
            .resolve(Coordinate::new(latitude, longitude), keywords)
            .await?;
        Ok(LocationResult::from(&resolution))
    }

    /// Resolve `approx` and `keywords` to a position.
    ///
    /// Only provider failures are errors; running out of candidates is a
    /// [`Resolution::NotFound`].
    pub async fn resolve(&self, approx: Coordinate, keywords: &[String]) -> Result<Resolution> {
        let mut stats = ResolutionStats::default();

        if keywords.is_empty() {
            return Ok(not_found(NotFoundReason::NoInput, stats));
        }

        let mut groups = match self.find_candidates(approx, keywords, &mut stats).await? {
            Ok(groups) => groups,
            Err(reason) => return Ok(not_found(reason, stats)),
        };

        if let [only] = groups.as_slice() {
            // a single signal cannot be triangulated
            if let Some(top) = only.top() {
                let cluster = Cluster::seeded(only.index, only.keyword.as_str(), top.clone());
                return Ok(found(cluster, true, stats));
            }
        }

        // least ambiguous keyword first; stable, so ties keep request order
        groups.sort_by_key(KeywordCandidates::len);
        debug!(
            "Group order: {:?}",
            groups
                .iter()
                .map(|g| (g.keyword.as_str(), g.len()))
                .collect::<Vec<_>>()
        );

        let matcher = NeighborhoodMatcher::new(self.provider.as_ref(), &self.settings);
        let mut best: Option<Cluster> = None;

        for group in &groups {
            for seed in &group.candidates {
                stats.seeds_tried += 1;
                let attempt = matcher
                    .match_around(group, seed, &groups, keywords.len())
                    .await
                    .map_err(|e| {
                        warn!("Neighborhood search around '{}' failed: {}", seed.name, e);
                        ResolveError::provider(Phase::Neighborhood(seed.name.clone()), e)
                    })?;
                stats.nearby_queries += attempt.queries;

                match attempt.outcome {
                    Outcome::Complete(cluster) => {
                        info!(
                            "All {} keywords matched around '{}'",
                            keywords.len(),
                            seed.name
                        );
                        return Ok(found(cluster, true, stats));
                    }
                    Outcome::Partial(cluster) => best = keep_larger(best, cluster),
                    Outcome::NoSignal => debug!("No neighbors around '{}'", seed.name),
                }
            }
        }

        match best {
            Some(cluster) if cluster.len() > 1 || self.settings.accept_seed_only => {
                info!(
                    "Best effort: {} of {} keywords matched",
                    cluster.len(),
                    keywords.len()
                );
                Ok(found(cluster, false, stats))
            }
            _ => {
                info!("No place cluster found for {} keywords", keywords.len());
                Ok(not_found(NotFoundReason::NoMatch, stats))
            }
        }
    }

    /// Candidate lists in request order, or the first keyword with none
    async fn find_candidates(
        &self,
        approx: Coordinate,
        keywords: &[String],
        stats: &mut ResolutionStats,
    ) -> Result<std::result::Result<Vec<KeywordCandidates>, NotFoundReason>> {
        let finder = CandidateFinder::new(self.provider.as_ref(), self.settings.search_radius);
        let lookup = |index: usize, keyword: &String| {
            let finder = &finder;
            let keyword = keyword.clone();
            async move {
                finder.find(approx, index, &keyword).await.map_err(|e| {
                    warn!("Candidate search for '{}' failed: {}", keyword, e);
                    ResolveError::provider(Phase::Candidates(keyword.clone()), e)
                })
            }
        };

        if self.settings.parallel_candidate_search {
            let groups = try_join_all(keywords.iter().enumerate().map(|(i, k)| lookup(i, k))).await?;
            stats.text_queries += groups.len() as u32;
            if let Some(empty) = groups.iter().find(|g| g.is_empty()) {
                info!("Could not find any place named '{}'", empty.keyword);
                return Ok(Err(NotFoundReason::KeywordNotFound(empty.keyword.clone())));
            }
            return Ok(Ok(groups));
        }

        let mut groups = Vec::with_capacity(keywords.len());
        for (index, keyword) in keywords.iter().enumerate() {
            let group = lookup(index, keyword).await?;
            stats.text_queries += 1;
            if group.is_empty() {
                info!("Could not find any place named '{}'", keyword);
                return Ok(Err(NotFoundReason::KeywordNotFound(keyword.clone())));
            }
            groups.push(group);
        }
        Ok(Ok(groups))
    }
}

/// Fold step over attempts: the larger cluster wins, the earlier one on ties
fn keep_larger(best: Option<Cluster>, candidate: Cluster) -> Option<Cluster> {
    match best {
        Some(current) if current.len() >= candidate.len() => Some(current),
        _ => Some(candidate),
    }
}

fn found(cluster: Cluster, complete: bool, stats: ResolutionStats) -> Resolution {
    // a cluster always holds its seed
    let coordinate = cluster.centroid().unwrap_or_default();
    Resolution::Found {
        coordinate,
        cluster,
        complete,
        stats,
    }
}

fn not_found(reason: NotFoundReason, stats: ResolutionStats) -> Resolution {
    Resolution::NotFound { reason, stats }
}
