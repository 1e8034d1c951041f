use serde::Serialize;
use utoipa::ToSchema;

use super::types::{AggregateSummary, AlertState, AlertThresholds, ThresholdRange};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Metric {
    Temperature,
    Humidity,
}

impl Metric {
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Temperature => "Temperature",
            Self::Humidity => "Humidity",
        }
    }

    #[must_use]
    pub fn unit(self) -> &'static str {
        match self {
            Self::Temperature => "°C",
            Self::Humidity => "%RH",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum AlertKind {
    Low,
    High,
}

/// One inactive-to-active transition observed during an invocation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, ToSchema)]
pub struct AlertEvent {
    pub metric: Metric,
    pub kind: AlertKind,
    pub value: f64,
    pub threshold: f64,
}

/// Evaluate the latest readings against the thresholds, edge-triggered.
///
/// A value outside `[low, high]` is alarmed. The returned events are only the
/// transitions into the alarmed state; while a condition persists the flag in
/// `state` stays set and nothing re-fires. The flag clears when the value
/// re-enters range. An undefined latest reading leaves its flag untouched.
pub fn evaluate(
    state: &mut AlertState,
    summary: &AggregateSummary,
    thresholds: &AlertThresholds,
) -> Vec<AlertEvent> {
    let mut fired = Vec::new();

    if let Some(value) = summary.latest_temperature {
        check(
            Metric::Temperature,
            value,
            thresholds.temperature,
            &mut state.temperature_active,
            &mut fired,
        );
    }
    if let Some(value) = summary.latest_humidity {
        check(
            Metric::Humidity,
            value,
            thresholds.humidity,
            &mut state.humidity_active,
            &mut fired,
        );
    }

    fired
}

fn check(
    metric: Metric,
    value: f64,
    range: ThresholdRange,
    active: &mut bool,
    fired: &mut Vec<AlertEvent>,
) {
    let out_of_range = value < range.low || value > range.high;

    if out_of_range && !*active {
        let (kind, threshold) = if value > range.high {
            (AlertKind::High, range.high)
        } else {
            (AlertKind::Low, range.low)
        };
        fired.push(AlertEvent {
            metric,
            kind,
            value,
            threshold,
        });
    }

    *active = out_of_range;
}
