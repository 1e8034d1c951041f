//! The resampling, rolling-aggregation and annotation pipeline.
//!
//! Stages run in a fixed order, each as its own pure function: validate the
//! windows, resample onto the 1-minute grid, compute trailing rolling means
//! over the full fetched range, place sunrise/sunset marks on the full grid,
//! truncate away the seed history, then summarize what remains. Alert
//! evaluation ([`alert::evaluate`]) is separate so the pipeline itself stays
//! free of side effects.

pub mod alert;
pub mod resample;
pub mod rolling;
pub mod summary;
pub mod sun;
pub mod types;
pub mod window;

use serde::Serialize;
use utoipa::ToSchema;

pub use alert::{AlertEvent, AlertKind, Metric, evaluate};
pub use resample::resample;
pub use rolling::rolling_mean;
pub use summary::summarize;
pub use sun::align_sun_events;
pub use types::{
    AggregateSummary, AlertState, AlertThresholds, ColumnSummary, GRID_STEP_SECS, GridSample,
    RawSample, SampleGrid, SunEvent, SunMark, ThresholdRange,
};
pub use window::{DisplayWindow, SeriesError, truncate};

/// Distinguishes "no data in range" from a populated series whose aggregates
/// may still be individually undefined.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum SeriesStatus {
    Ok,
    NoData,
}

/// Result of one pipeline invocation.
#[derive(Debug, Clone, PartialEq)]
pub struct ProcessedSeries {
    pub status: SeriesStatus,
    pub series: Vec<GridSample>,
    pub summary: AggregateSummary,
}

/// Run the full pipeline for one refresh.
///
/// `rolling_window` is in grid steps; `None` or zero leaves the rolling-mean
/// columns entirely absent. Sun events are aligned against the full fetched
/// grid (and back-shifted) before truncation removes the seed history.
///
/// # Errors
///
/// Returns [`SeriesError`] when the windows are misordered; nothing is
/// resampled in that case.
pub fn process(
    samples: &[RawSample],
    window: &DisplayWindow,
    rolling_window: Option<u32>,
    sun_events: &[SunEvent],
) -> Result<ProcessedSeries, SeriesError> {
    window.validate()?;

    let mut grid = resample(samples, window.fetch_from);

    let (temperature_mean, humidity_mean) = match rolling_window.filter(|w| *w > 0) {
        Some(w) => (
            rolling_mean(&grid.temperature, w as usize),
            rolling_mean(&grid.humidity, w as usize),
        ),
        None => (vec![None; grid.len()], vec![None; grid.len()]),
    };

    let events = align_sun_events(&grid.timestamps, sun_events);

    let removed = truncate(&mut grid, window.from);

    let series: Vec<GridSample> = (0..grid.len())
        .map(|i| GridSample {
            timestamp: grid.timestamps[i],
            temperature: grid.temperature[i],
            humidity: grid.humidity[i],
            temperature_mean: temperature_mean[removed + i],
            humidity_mean: humidity_mean[removed + i],
            event: events[removed + i],
        })
        .collect();

    let summary = summarize(&grid);
    let status = if series.is_empty() {
        SeriesStatus::NoData
    } else {
        SeriesStatus::Ok
    };

    Ok(ProcessedSeries {
        status,
        series,
        summary,
    })
}
