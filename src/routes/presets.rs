use axum::Json;
use serde::Serialize;
use utoipa::ToSchema;

use crate::config::RANGE_PRESETS;

#[derive(Debug, Serialize, ToSchema)]
pub struct PresetResponse {
    /// Preset name accepted by the process endpoint
    pub name: String,
    /// Display window length
    pub duration_minutes: i64,
    /// Rolling-mean window in grid steps (null disables the mean columns)
    pub rolling_window: Option<u32>,
}

/// List the named display-range presets
///
/// Each preset pairs a window length with the rolling-mean width used at
/// that zoom level.
#[utoipa::path(
    get,
    path = "/api/presets",
    responses(
        (status = 200, description = "Presets retrieved successfully", body = Vec<PresetResponse>),
    ),
    tag = "presets"
)]
pub async fn list_presets() -> Json<Vec<PresetResponse>> {
    let presets = RANGE_PRESETS
        .iter()
        .map(|p| PresetResponse {
            name: p.name.to_string(),
            duration_minutes: p.duration_minutes,
            rolling_window: p.rolling_window,
        })
        .collect();

    Json(presets)
}
