//! Data model of a resolution request

use serde::{Deserialize, Serialize};

/// A WGS84 position, passed through exactly as the provider reports it
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Coordinate {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinate {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Arithmetic mean of latitudes and of longitudes; `None` when empty
    pub fn mean<'a, I>(coordinates: I) -> Option<Self>
    where
        I: IntoIterator<Item = &'a Coordinate>,
    {
        let (count, lat, lon) = coordinates
            .into_iter()
            .fold((0usize, 0.0, 0.0), |(n, lat, lon), c| {
                (n + 1, lat + c.latitude, lon + c.longitude)
            });
        if count == 0 {
            return None;
        }
        Some(Self::new(lat / count as f64, lon / count as f64))
    }
}

/// A place returned by the provider
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Place {
    pub name: String,
    pub coordinate: Coordinate,
    /// Provider-specific identifier, not used by the algorithm
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub place_id: Option<String>,
    /// Short address, not used by the algorithm
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
}

impl Place {
    pub fn new(name: impl Into<String>, latitude: f64, longitude: f64) -> Self {
        Self {
            name: name.into(),
            coordinate: Coordinate::new(latitude, longitude),
            place_id: None,
            address: None,
        }
    }

    /// Exact, case-insensitive name comparison. No trimming or accent folding.
    pub fn same_name(&self, other: &Place) -> bool {
        self.name.to_lowercase() == other.name.to_lowercase()
    }
}

/// The ranked text-search results for one keyword
#[derive(Debug, Clone, PartialEq)]
pub struct KeywordCandidates {
    /// Position of the keyword in the request; identifies the group
    pub index: usize,
    pub keyword: String,
    pub candidates: Vec<Place>,
}

impl KeywordCandidates {
    pub fn new(index: usize, keyword: impl Into<String>, candidates: Vec<Place>) -> Self {
        Self {
            index,
            keyword: keyword.into(),
            candidates,
        }
    }

    /// Highest-ranked candidate
    pub fn top(&self) -> Option<&Place> {
        self.candidates.first()
    }

    pub fn len(&self) -> usize {
        self.candidates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }
}

/// A place in a cluster together with the keyword group it stands for
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClusterMember {
    /// Index of the keyword in the caller's original keyword list
    pub group: usize,
    pub keyword: String,
    pub place: Place,
}

/// Places believed to co-locate, at most one per keyword group
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Cluster {
    members: Vec<ClusterMember>,
}

impl Cluster {
    /// Start a cluster from the seed place of `group`
    pub fn seeded(group: usize, keyword: impl Into<String>, seed: Place) -> Self {
        Self {
            members: vec![ClusterMember {
                group,
                keyword: keyword.into(),
                place: seed,
            }],
        }
    }

    /// Add the match for `group`. Returns false and leaves the cluster
    /// unchanged if the group is already represented.
    pub fn push(&mut self, group: usize, keyword: impl Into<String>, place: Place) -> bool {
        if self.contains_group(group) {
            return false;
        }
        self.members.push(ClusterMember {
            group,
            keyword: keyword.into(),
            place,
        });
        true
    }

    pub fn contains_group(&self, group: usize) -> bool {
        self.members.iter().any(|m| m.group == group)
    }

    /// Never zero: a cluster always holds its seed
    #[allow(clippy::len_without_is_empty)]
    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn seed(&self) -> &Place {
        &self.members[0].place
    }

    pub fn members(&self) -> &[ClusterMember] {
        &self.members
    }

    pub fn places(&self) -> impl Iterator<Item = &Place> {
        self.members.iter().map(|m| &m.place)
    }

    /// Mean position of every member, seed included
    pub fn centroid(&self) -> Option<Coordinate> {
        Coordinate::mean(self.places().map(|p| &p.coordinate))
    }
}

/// Why a resolution produced no coordinate
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "reason", content = "keyword", rename_all = "snake_case")]
pub enum NotFoundReason {
    /// No keywords were supplied
    NoInput,
    /// A keyword had no candidates within the search radius
    KeywordNotFound(String),
    /// Every seed was tried and none left a usable cluster
    NoMatch,
}

impl NotFoundReason {
    pub fn label(&self) -> &'static str {
        match self {
            Self::NoInput => "no_input",
            Self::KeywordNotFound(_) => "keyword_not_found",
            Self::NoMatch => "no_match",
        }
    }
}

/// Provider work done for one resolution
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ResolutionStats {
    pub text_queries: u32,
    pub nearby_queries: u32,
    pub seeds_tried: u32,
}

/// Outcome of resolving one request
#[derive(Debug, Clone, PartialEq)]
pub enum Resolution {
    Found {
        coordinate: Coordinate,
        cluster: Cluster,
        /// The cluster holds one place for every keyword
        complete: bool,
        stats: ResolutionStats,
    },
    NotFound {
        reason: NotFoundReason,
        stats: ResolutionStats,
    },
}

impl Resolution {
    pub fn is_found(&self) -> bool {
        matches!(self, Self::Found { .. })
    }

    pub fn coordinate(&self) -> Option<Coordinate> {
        match self {
            Self::Found { coordinate, .. } => Some(*coordinate),
            Self::NotFound { .. } => None,
        }
    }

    pub fn stats(&self) -> ResolutionStats {
        match self {
            Self::Found { stats, .. } | Self::NotFound { stats, .. } => *stats,
        }
    }
}

/// Flat result handed to transport layers: zero coordinates when not found
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LocationResult {
    pub found: bool,
    pub latitude: f64,
    pub longitude: f64,
}

impl From<&Resolution> for LocationResult {
    fn from(resolution: &Resolution) -> Self {
        match resolution.coordinate() {
            Some(c) => Self {
                found: true,
                latitude: c.latitude,
                longitude: c.longitude,
            },
            None => Self {
                found: false,
                latitude: 0.0,
                longitude: 0.0,
            },
        }
    }
}
