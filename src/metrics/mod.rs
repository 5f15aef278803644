//! Metrics collection module
//!
//! Tracks resolution outcomes, provider usage and timings for `/stats`.

use crate::resolver::{Resolution, ResolutionStats};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::RwLock;

const MAX_TIMINGS: usize = 100;

/// In-process metrics collector
pub struct Metrics {
    started_at: DateTime<Utc>,
    /// Total resolution requests
    total_resolutions: AtomicU64,
    /// Requests answered with a coordinate
    found: AtomicU64,
    /// Requests that needed every keyword and got them all
    complete: AtomicU64,
    /// Not-found outcomes by reason
    not_found: RwLock<HashMap<String, u64>>,
    /// Provider failures by kind
    provider_errors: RwLock<HashMap<String, u64>>,
    text_queries: AtomicU64,
    nearby_queries: AtomicU64,
    /// Recent resolution times in ms
    resolution_times: RwLock<Vec<u64>>,
}

impl Metrics {
    /// Create a new metrics instance
    pub fn new() -> Self {
        Self {
            started_at: Utc::now(),
            total_resolutions: AtomicU64::new(0),
            found: AtomicU64::new(0),
            complete: AtomicU64::new(0),
            not_found: RwLock::new(HashMap::new()),
            provider_errors: RwLock::new(HashMap::new()),
            text_queries: AtomicU64::new(0),
            nearby_queries: AtomicU64::new(0),
            resolution_times: RwLock::new(Vec::new()),
        }
    }

    /// Record a finished resolution
    pub fn record_resolution(&self, resolution: &Resolution, time_ms: u64) {
        self.total_resolutions.fetch_add(1, Ordering::Relaxed);
        self.record_queries(resolution.stats());
        self.record_time(time_ms);

        match resolution {
            Resolution::Found { complete, .. } => {
                self.found.fetch_add(1, Ordering::Relaxed);
                if *complete {
                    self.complete.fetch_add(1, Ordering::Relaxed);
                }
            }
            Resolution::NotFound { reason, .. } => {
                if let Ok(mut map) = self.not_found.write() {
                    *map.entry(reason.label().to_string()).or_insert(0) += 1;
                }
            }
        }
    }

    /// Record a resolution aborted by a provider failure
    pub fn record_provider_error(&self, kind: &str, time_ms: u64) {
        self.total_resolutions.fetch_add(1, Ordering::Relaxed);
        self.record_time(time_ms);
        if let Ok(mut map) = self.provider_errors.write() {
            *map.entry(kind.to_string()).or_insert(0) += 1;
        }
    }

    fn record_queries(&self, stats: ResolutionStats) {
        self.text_queries
            .fetch_add(stats.text_queries as u64, Ordering::Relaxed);
        self.nearby_queries
            .fetch_add(stats.nearby_queries as u64, Ordering::Relaxed);
    }

    fn record_time(&self, time_ms: u64) {
        if let Ok(mut times) = self.resolution_times.write() {
            // Keep last 100 resolution times
            if times.len() >= MAX_TIMINGS {
                times.remove(0);
            }
            times.push(time_ms);
        }
    }

    /// Average of the recent resolution times
    pub fn avg_resolution_time(&self) -> Option<u64> {
        let times = self.resolution_times.read().ok()?;
        if times.is_empty() {
            None
        } else {
            Some(times.iter().sum::<u64>() / times.len() as u64)
        }
    }

    /// Point-in-time copy of every counter
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            started_at: self.started_at,
            total_resolutions: self.total_resolutions.load(Ordering::Relaxed),
            found: self.found.load(Ordering::Relaxed),
            complete: self.complete.load(Ordering::Relaxed),
            not_found: self
                .not_found
                .read()
                .map(|m| m.clone())
                .unwrap_or_default(),
            provider_errors: self
                .provider_errors
                .read()
                .map(|m| m.clone())
                .unwrap_or_default(),
            text_queries: self.text_queries.load(Ordering::Relaxed),
            nearby_queries: self.nearby_queries.load(Ordering::Relaxed),
            avg_resolution_time_ms: self.avg_resolution_time(),
        }
    }
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}

/// Serializable view of [`Metrics`]
#[derive(Debug, Clone, Serialize)]
pub struct MetricsSnapshot {
    pub started_at: DateTime<Utc>,
    pub total_resolutions: u64,
    pub found: u64,
    pub complete: u64,
    pub not_found: HashMap<String, u64>,
    pub provider_errors: HashMap<String, u64>,
    pub text_queries: u64,
    pub nearby_queries: u64,
    pub avg_resolution_time_ms: Option<u64>,
}
