use axum::{
    Json,
    extract::{Query, State},
    http::header::{self, HeaderMap, HeaderValue},
    response::{IntoResponse, Response},
};
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use tokio_stream::wrappers::ReceiverStream;
use utoipa::{IntoParams, ToSchema};

use crate::common::AppState;
use crate::config;
use crate::error::{AppError, AppResult};
use crate::notify::Notification;
use crate::series::{
    self, AggregateSummary, AlertEvent, AlertState, AlertThresholds, DisplayWindow,
    GRID_STEP_SECS, GridSample, RawSample, SeriesStatus, SunEvent, SunMark,
};

fn default_format() -> String {
    "json".to_string()
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct ProcessQuery {
    /// Response format: json (default), ndjson, csv
    #[serde(default = "default_format")]
    pub format: String,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct ProcessRequest {
    /// Location the samples were fetched for
    pub location: String,
    /// Raw readings covering the fetch window, as returned by the sample source
    pub samples: Vec<RawSample>,
    /// Named range preset anchored at `to` (or now); mutually exclusive with
    /// an explicit `from`
    pub preset: Option<String>,
    /// Start of the display window (required without a preset, ISO 8601)
    pub from: Option<DateTime<Utc>>,
    /// End of the display window (defaults to now for presets)
    pub to: Option<DateTime<Utc>>,
    /// Start of the fetch window; must not be after `from`. Defaults to
    /// `from` minus the rolling window of seed history.
    pub fetch_from: Option<DateTime<Utc>>,
    /// Rolling-mean window in grid steps; absent or 0 leaves the mean
    /// columns absent
    pub rolling_window: Option<u32>,
    /// Sunrise/sunset instants resolved by the caller, one per day in range
    #[serde(default)]
    pub sun_events: Vec<SunEvent>,
    /// Threshold overrides; server defaults apply when omitted
    pub thresholds: Option<AlertThresholds>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct AlertReport {
    /// Alert flags after this invocation
    pub state: AlertState,
    /// Transitions that fired a notification during this invocation
    pub fired: Vec<AlertEvent>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct SeriesResponse {
    pub location: String,
    /// Distinguishes an empty range from a populated series
    pub status: SeriesStatus,
    /// Start of the display window
    pub from: DateTime<Utc>,
    /// End of the display window
    pub to: DateTime<Utc>,
    /// Grid resolution
    pub resolution: String,
    /// Uniform annotated series, oldest first
    pub series: Vec<GridSample>,
    pub summary: AggregateSummary,
    pub alerts: AlertReport,
}

struct ResolvedWindow {
    window: DisplayWindow,
    rolling_window: Option<u32>,
}

/// Extra history fetched ahead of the display window so early rolling-mean
/// positions have data.
fn seed_fetch_start(from: DateTime<Utc>, rolling_window: Option<u32>) -> DateTime<Utc> {
    match rolling_window.filter(|w| *w > 0) {
        Some(w) => from - Duration::seconds(i64::from(w) * GRID_STEP_SECS),
        None => from,
    }
}

fn resolve_window(request: &ProcessRequest) -> AppResult<ResolvedWindow> {
    match (&request.preset, request.from) {
        (Some(name), None) => {
            if request.fetch_from.is_some() {
                return Err(AppError::BadRequest(
                    "fetch_from cannot be combined with a preset".to_string(),
                ));
            }
            let preset = config::find_preset(name).ok_or_else(|| {
                let known = config::RANGE_PRESETS
                    .iter()
                    .map(|p| p.name)
                    .collect::<Vec<_>>()
                    .join(", ");
                AppError::BadRequest(format!("Unknown preset: {name}. Must be one of: {known}"))
            })?;

            let to = request.to.unwrap_or_else(Utc::now);
            let from = to - Duration::minutes(preset.duration_minutes);
            let rolling_window = request.rolling_window.or(preset.rolling_window);

            Ok(ResolvedWindow {
                window: DisplayWindow {
                    from,
                    to,
                    fetch_from: seed_fetch_start(from, rolling_window),
                },
                rolling_window,
            })
        }
        (Some(_), Some(_)) => Err(AppError::BadRequest(
            "preset and explicit from are mutually exclusive".to_string(),
        )),
        (None, Some(from)) => {
            let Some(to) = request.to else {
                return Err(AppError::BadRequest(
                    "to is required with an explicit from".to_string(),
                ));
            };
            let rolling_window = request.rolling_window;
            let fetch_from = request
                .fetch_from
                .unwrap_or_else(|| seed_fetch_start(from, rolling_window));

            Ok(ResolvedWindow {
                window: DisplayWindow {
                    from,
                    to,
                    fetch_from,
                },
                rolling_window,
            })
        }
        (None, None) => Err(AppError::BadRequest(
            "specify a preset or an explicit from/to window".to_string(),
        )),
    }
}

fn determine_format(query_format: &str, headers: &HeaderMap) -> String {
    // Query parameter takes precedence
    if query_format != "json" {
        return query_format.to_lowercase();
    }

    // Check Accept header
    if let Some(accept) = headers.get(header::ACCEPT)
        && let Ok(accept_str) = accept.to_str()
    {
        if accept_str.contains("application/x-ndjson") {
            return "ndjson".to_string();
        }
        if accept_str.contains("text/csv") {
            return "csv".to_string();
        }
    }

    "json".to_string()
}

fn event_cell(event: Option<SunMark>) -> &'static str {
    match event {
        Some(SunMark::Sunrise) => "sunrise",
        Some(SunMark::Sunset) => "sunset",
        None => "",
    }
}

fn build_csv_response(series: Vec<GridSample>) -> AppResult<Response> {
    let (tx, rx) = tokio::sync::mpsc::channel::<Result<String, std::io::Error>>(100);

    tokio::spawn(async move {
        let header = "time,temperature,humidity,temperature_mean,humidity_mean,event\n";
        let _ = tx.send(Ok(header.to_string())).await;

        for row in &series {
            let mut line = row.timestamp.to_rfc3339();
            for value in [
                row.temperature,
                row.humidity,
                row.temperature_mean,
                row.humidity_mean,
            ] {
                line.push(',');
                if let Some(v) = value {
                    line.push_str(&v.to_string());
                }
            }
            line.push(',');
            line.push_str(event_cell(row.event));
            line.push('\n');
            if tx.send(Ok(line)).await.is_err() {
                break;
            }
        }
    });

    let stream = ReceiverStream::new(rx);
    let body = axum::body::Body::from_stream(stream);

    Response::builder()
        .header(header::CONTENT_TYPE, HeaderValue::from_static("text/csv"))
        .body(body)
        .map_err(|e| AppError::Internal(e.to_string()))
}

fn build_ndjson_response(series: Vec<GridSample>) -> AppResult<Response> {
    let (tx, rx) = tokio::sync::mpsc::channel::<Result<String, std::io::Error>>(100);

    tokio::spawn(async move {
        for row in &series {
            let Ok(mut line) = serde_json::to_string(row) else {
                break;
            };
            line.push('\n');
            if tx.send(Ok(line)).await.is_err() {
                break;
            }
        }
    });

    let stream = ReceiverStream::new(rx);
    let body = axum::body::Body::from_stream(stream);

    Response::builder()
        .header(
            header::CONTENT_TYPE,
            HeaderValue::from_static("application/x-ndjson"),
        )
        .body(body)
        .map_err(|e| AppError::Internal(e.to_string()))
}

/// Process one batch of raw readings into the annotated display series
///
/// Runs the resample / rolling-mean / truncate / sun-alignment pipeline over
/// the posted samples, evaluates the edge-triggered alerts for the location,
/// and returns the series with summary statistics. Supports JSON, CSV, and
/// NDJSON formats.
#[utoipa::path(
    post,
    path = "/api/series/process",
    params(ProcessQuery),
    request_body = ProcessRequest,
    responses(
        (status = 200, description = "Series processed successfully", body = SeriesResponse),
        (status = 400, description = "Misordered window or invalid parameters"),
    ),
    tag = "series"
)]
pub async fn process_series(
    State(state): State<AppState>,
    Query(query): Query<ProcessQuery>,
    headers: HeaderMap,
    Json(request): Json<ProcessRequest>,
) -> AppResult<Response> {
    let resolved = resolve_window(&request)?;
    let thresholds = request.thresholds.unwrap_or(state.config.alert_thresholds);
    let format = determine_format(&query.format, &headers);

    let result = series::process(
        &request.samples,
        &resolved.window,
        resolved.rolling_window,
        &request.sun_events,
    )?;

    // Read-evaluate-write under one lock; refresh cycles for a location
    // must not overlap.
    let (alert_state, fired) = {
        let mut registry = state
            .alerts
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        let entry = registry.entry(request.location.clone()).or_default();
        let fired = series::evaluate(entry, &result.summary, &thresholds);
        (*entry, fired)
    };

    for event in &fired {
        state.notifier.send(Notification::from_alert(
            &request.location,
            event,
            state.config.alert_sound.clone(),
        ));
    }

    tracing::debug!(
        location = %request.location,
        samples = request.samples.len(),
        rows = result.series.len(),
        fired = fired.len(),
        "series_processed"
    );

    match format.as_str() {
        "csv" => build_csv_response(result.series),
        "ndjson" => build_ndjson_response(result.series),
        _ => {
            let response = SeriesResponse {
                location: request.location,
                status: result.status,
                from: resolved.window.from,
                to: resolved.window.to,
                resolution: "1-min".to_string(),
                series: result.series,
                summary: result.summary,
                alerts: AlertReport {
                    state: alert_state,
                    fired,
                },
            };
            Ok(Json(response).into_response())
        }
    }
}
