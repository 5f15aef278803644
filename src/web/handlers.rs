//! HTTP request handlers

use super::state::AppState;
use crate::error::ResolveError;
use crate::query::ParsedQuery;
use crate::resolver::{ClusterMember, Coordinate, LocationResult, NotFoundReason, Resolution};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use std::time::Instant;
use tracing::{info, info_span, warn, Instrument};
use uuid::Uuid;

/// Body of `POST /api/resolve`
#[derive(Debug, Deserialize)]
pub struct ResolveRequest {
    pub latitude: f64,
    pub longitude: f64,
    pub keywords: Vec<String>,
}

/// JSON answer of `POST /api/resolve`
#[derive(Debug, Serialize)]
pub struct ResolveResponse {
    pub found: bool,
    pub latitude: f64,
    pub longitude: f64,
    /// Every keyword is represented in `places`
    pub complete: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub keyword: Option<String>,
    pub places: Vec<ClusterMember>,
}

impl From<Resolution> for ResolveResponse {
    fn from(resolution: Resolution) -> Self {
        let flat = LocationResult::from(&resolution);
        let mut response = Self {
            found: flat.found,
            latitude: flat.latitude,
            longitude: flat.longitude,
            complete: false,
            reason: None,
            keyword: None,
            places: vec![],
        };
        match resolution {
            Resolution::Found {
                cluster, complete, ..
            } => {
                response.complete = complete;
                response.places = cluster.members().to_vec();
            }
            Resolution::NotFound { reason, .. } => {
                response.reason = Some(reason.label());
                if let NotFoundReason::KeywordNotFound(keyword) = reason {
                    response.keyword = Some(keyword);
                }
            }
        }
        response
    }
}

/// Run one resolution inside a request span, recording metrics
async fn run_resolution(
    state: &AppState,
    approx: Coordinate,
    keywords: &[String],
) -> Result<Resolution, ResolveError> {
    let span = info_span!("resolve", request_id = %Uuid::new_v4());

    async {
        info!(
            "Resolving {:?} around {}, {}",
            keywords, approx.latitude, approx.longitude
        );
        let start = Instant::now();
        let result = state.resolver.resolve(approx, keywords).await;
        let elapsed = start.elapsed();
        let time_ms = elapsed.as_millis() as u64;

        match &result {
            Ok(resolution) => {
                state.metrics.record_resolution(resolution, time_ms);
                match resolution.coordinate() {
                    Some(c) => info!(
                        "Resolved to {}, {} in {:?}",
                        c.latitude, c.longitude, elapsed
                    ),
                    None => info!("No location found in {:?}", elapsed),
                }
            }
            Err(e) => {
                let kind = match e {
                    ResolveError::Provider { source, .. } => source.kind(),
                    ResolveError::Config(_) => "config",
                };
                state.metrics.record_provider_error(kind, time_ms);
                warn!("Resolution failed after {:?}: {}", elapsed, e);
            }
        }
        result
    }
    .instrument(span)
    .await
}

/// Legacy plain-text endpoint: `GET /location/:lat/:lon/:query`.
///
/// Answers `found,latitude,longitude` with `found` as `1` or `0`.
pub async fn location(
    State(state): State<AppState>,
    Path((lat, lon, query)): Path<(f64, f64, String)>,
) -> Response {
    let parsed = ParsedQuery::parse_with(&query, &state.settings.query);
    let result = run_resolution(&state, Coordinate::new(lat, lon), &parsed.keywords).await;

    match result {
        Ok(resolution) => plain_text(StatusCode::OK, LocationResult::from(&resolution)),
        Err(_) => plain_text(
            StatusCode::BAD_GATEWAY,
            LocationResult::from(&Resolution::NotFound {
                reason: NotFoundReason::NoMatch,
                stats: Default::default(),
            }),
        ),
    }
}

fn plain_text(status: StatusCode, result: LocationResult) -> Response {
    let body = format!(
        "{},{:?},{:?}",
        u8::from(result.found),
        result.latitude,
        result.longitude
    );
    (
        status,
        [(axum::http::header::CONTENT_TYPE, "text/plain")],
        body,
    )
        .into_response()
}

/// JSON endpoint: `POST /api/resolve`
pub async fn resolve(
    State(state): State<AppState>,
    Json(request): Json<ResolveRequest>,
) -> Response {
    let keywords: Vec<String> = request
        .keywords
        .into_iter()
        .filter(|k| !k.trim().is_empty())
        .collect();
    let approx = Coordinate::new(request.latitude, request.longitude);

    match run_resolution(&state, approx, &keywords).await {
        Ok(resolution) => Json(ResolveResponse::from(resolution)).into_response(),
        Err(e) => (
            StatusCode::BAD_GATEWAY,
            Json(serde_json::json!({ "error": e.to_string() })),
        )
            .into_response(),
    }
}

/// Health check handler
pub async fn health(State(state): State<AppState>) -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok",
        "instance": state.instance_name(),
        "version": crate::VERSION
    }))
}

/// Metrics snapshot handler
pub async fn stats(State(state): State<AppState>) -> impl IntoResponse {
    Json(state.metrics.snapshot())
}
