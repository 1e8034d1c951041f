use super::types::{AggregateSummary, ColumnSummary, SampleGrid};

/// Compute per-invocation statistics over the truncated grid.
///
/// Absent values are ignored; a column with no present values yields `None`
/// rather than a zeroed summary. The latest readings scan backward past any
/// trailing holes.
#[must_use]
pub fn summarize(grid: &SampleGrid) -> AggregateSummary {
    if grid.is_empty() {
        return AggregateSummary::undefined();
    }

    AggregateSummary {
        count: grid.len(),
        first: grid.timestamps.first().copied(),
        last: grid.timestamps.last().copied(),
        temperature: column_summary(&grid.temperature),
        humidity: column_summary(&grid.humidity),
        latest_temperature: latest(&grid.temperature),
        latest_humidity: latest(&grid.humidity),
    }
}

fn column_summary(values: &[Option<f64>]) -> Option<ColumnSummary> {
    let mut sum = 0.0;
    let mut count = 0usize;
    let mut min = f64::INFINITY;
    let mut max = f64::NEG_INFINITY;

    for v in values.iter().flatten() {
        sum += v;
        count += 1;
        min = min.min(*v);
        max = max.max(*v);
    }

    (count > 0).then(|| ColumnSummary {
        mean: sum / count as f64,
        min,
        max,
    })
}

fn latest(values: &[Option<f64>]) -> Option<f64> {
    values.iter().rev().flatten().next().copied()
}
