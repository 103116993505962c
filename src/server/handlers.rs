use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Instant;
use tracing::info;

use crate::error::SolarError;
use crate::location::{builtin_places, LocationQuery, Place, PlaceInfo};
use crate::report::{self, DayReport, NextReport};

use super::state::AppState;

// ─── Error response ──────────────────────────────────────────────

#[derive(Serialize)]
struct ApiErrorBody {
    error: String,
    code: u16,
}

pub struct ApiError(StatusCode, String);

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ApiErrorBody {
            error: self.1,
            code: self.0.as_u16(),
        };
        (self.0, Json(body)).into_response()
    }
}

impl From<SolarError> for ApiError {
    fn from(e: SolarError) -> Self {
        let status = match e {
            SolarError::UnknownPlace(_) => StatusCode::NOT_FOUND,
            SolarError::EventNeverOccurs { .. } => StatusCode::UNPROCESSABLE_ENTITY,
            SolarError::Config { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            _ => StatusCode::BAD_REQUEST,
        };
        ApiError(status, e.to_string())
    }
}

// ─── Shared helpers ──────────────────────────────────────────────

fn resolve_place(
    state: &AppState,
    place: &Option<String>,
    lat: Option<f64>,
    lon: Option<f64>,
    tz: &Option<String>,
) -> Result<Place, ApiError> {
    let query = LocationQuery {
        place: place.clone(),
        lat,
        lon,
        tz: tz.clone(),
    };
    Ok(query.resolve(&state.config)?)
}

// ─── GET /api/next ───────────────────────────────────────────────

#[derive(Deserialize)]
pub struct NextQuery {
    pub place: Option<String>,
    pub lat: Option<f64>,
    pub lon: Option<f64>,
    pub tz: Option<String>,
    pub at: Option<String>,
    pub event: Option<String>,
}

pub async fn next_events(
    State(state): State<Arc<AppState>>,
    Query(params): Query<NextQuery>,
) -> Result<Json<NextReport>, ApiError> {
    let start = Instant::now();

    let place = resolve_place(&state, &params.place, params.lat, params.lon, &params.tz)?;
    let at: DateTime<Utc> = match params.at.as_deref() {
        Some(s) => report::parse_moment(s, place.tz)?,
        None => Utc::now(),
    };
    let events = report::parse_event_list(params.event.as_deref(), state.config.twilight)
        .map_err(|e| ApiError(StatusCode::BAD_REQUEST, e))?;

    let resolver = state.resolver(place.coordinate);
    let output = report::next_report(&place, &resolver, at, &events)?;

    info!(
        place = %place.name,
        at = %output.at,
        events = output.events.len(),
        elapsed_ms = start.elapsed().as_secs_f64() * 1000.0,
        "GET /api/next"
    );
    Ok(Json(output))
}

// ─── GET /api/day ────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct DayQuery {
    pub place: Option<String>,
    pub lat: Option<f64>,
    pub lon: Option<f64>,
    pub tz: Option<String>,
    pub date: Option<String>,
}

pub async fn day_events(
    State(state): State<Arc<AppState>>,
    Query(params): Query<DayQuery>,
) -> Result<Json<DayReport>, ApiError> {
    let start = Instant::now();

    let place = resolve_place(&state, &params.place, params.lat, params.lon, &params.tz)?;
    let date = match params.date.as_deref() {
        Some(d) => report::parse_date(d)?,
        None => Utc::now().with_timezone(&place.tz).date_naive(),
    };

    let resolver = state.resolver(place.coordinate);
    let output = report::day_report(&place, &resolver, date)?;

    info!(
        place = %place.name,
        %date,
        state = %output.state,
        elapsed_ms = start.elapsed().as_secs_f64() * 1000.0,
        "GET /api/day"
    );
    Ok(Json(output))
}

// ─── GET /api/places ─────────────────────────────────────────────

pub async fn place_list() -> Json<Vec<PlaceInfo>> {
    Json(builtin_places())
}
