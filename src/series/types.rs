use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Grid spacing of the resampled series.
pub const GRID_STEP_SECS: i64 = 60;

/// One reading as delivered by the sample source.
///
/// Readings are not guaranteed evenly spaced or ordered; duplicates at the
/// same timestamp may occur (the last one delivered wins). A missing or
/// non-finite reading never enters the grid or the statistics.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct RawSample {
    pub timestamp: DateTime<Utc>,
    pub temperature: Option<f64>,
    pub humidity: Option<f64>,
    pub location: String,
}

/// Sunrise/sunset marker on a grid row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum SunMark {
    Sunrise,
    Sunset,
}

/// One row of the uniform, annotated series.
///
/// Timestamps are strictly increasing with constant 1-minute spacing. A
/// `None` reading is a hole: no qualifying sample reached that grid position.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct GridSample {
    pub timestamp: DateTime<Utc>,
    pub temperature: Option<f64>,
    pub humidity: Option<f64>,
    pub temperature_mean: Option<f64>,
    pub humidity_mean: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub event: Option<SunMark>,
}

/// Sunrise/sunset instants for one calendar day, already resolved by the
/// surrounding collaborator. The date only parses as `YYYY-MM-DD`.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SunEvent {
    pub date: NaiveDate,
    pub sunrise: DateTime<Utc>,
    pub sunset: DateTime<Utc>,
}

/// Mean/min/max over the non-absent values of one column.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, ToSchema)]
pub struct ColumnSummary {
    pub mean: f64,
    pub min: f64,
    pub max: f64,
}

/// Per-invocation statistics over the truncated series.
///
/// A `None` column summary means every value in that column was absent;
/// it is never coerced to zero.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct AggregateSummary {
    /// Number of grid rows in the displayed series
    pub count: usize,
    /// Timestamp of the first displayed row (null if no data)
    pub first: Option<DateTime<Utc>>,
    /// Timestamp of the last displayed row (null if no data)
    pub last: Option<DateTime<Utc>>,
    pub temperature: Option<ColumnSummary>,
    pub humidity: Option<ColumnSummary>,
    /// Most recent non-absent temperature reading
    pub latest_temperature: Option<f64>,
    /// Most recent non-absent humidity reading
    pub latest_humidity: Option<f64>,
}

impl AggregateSummary {
    /// Summary for an invocation that produced no rows at all.
    #[must_use]
    pub fn undefined() -> Self {
        Self {
            count: 0,
            first: None,
            last: None,
            temperature: None,
            humidity: None,
            latest_temperature: None,
            latest_humidity: None,
        }
    }
}

/// Inclusive lower/upper bound for one metric; a value outside
/// `[low, high]` is alarmed.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, ToSchema)]
pub struct ThresholdRange {
    pub low: f64,
    pub high: f64,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, ToSchema)]
pub struct AlertThresholds {
    pub temperature: ThresholdRange,
    pub humidity: ThresholdRange,
}

/// Edge-trigger memory carried across refresh invocations.
///
/// A flag stays set while the condition persists so a continuous excursion
/// fires exactly one notification; it clears when the value re-enters range.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, ToSchema)]
pub struct AlertState {
    pub temperature_active: bool,
    pub humidity_active: bool,
}

/// Columnar form of the resampled grid, one entry per grid boundary.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SampleGrid {
    pub timestamps: Vec<DateTime<Utc>>,
    pub temperature: Vec<Option<f64>>,
    pub humidity: Vec<Option<f64>>,
}

impl SampleGrid {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.timestamps.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.timestamps.len()
    }
}
