use chrono::{DateTime, Utc};

use super::types::{SunEvent, SunMark};

/// Annotate grid rows with sunrise/sunset marks.
///
/// Each event instant is matched to the grid row with the minimum absolute
/// time difference (ties resolved to the first row in grid order); instants
/// outside the grid span produce no mark. After all events are placed the
/// whole event column is shifted back by one grid step, compensating for the
/// one-step bias of the nearest match against the full fetched grid; a mark
/// shifted off the front is dropped. Runs on the untruncated grid.
#[must_use]
pub fn align_sun_events(
    timestamps: &[DateTime<Utc>],
    events: &[SunEvent],
) -> Vec<Option<SunMark>> {
    let mut marks: Vec<Option<SunMark>> = vec![None; timestamps.len()];

    for event in events {
        for (instant, mark) in [
            (event.sunrise, SunMark::Sunrise),
            (event.sunset, SunMark::Sunset),
        ] {
            if let Some(idx) = nearest_row(timestamps, instant) {
                marks[idx] = Some(mark);
            }
        }
    }

    if !marks.is_empty() {
        marks.rotate_left(1);
        if let Some(last) = marks.last_mut() {
            *last = None;
        }
    }

    marks
}

/// Index of the grid row closest to `instant`, or `None` when the instant
/// falls outside the grid span.
fn nearest_row(timestamps: &[DateTime<Utc>], instant: DateTime<Utc>) -> Option<usize> {
    let (first, last) = (timestamps.first()?, timestamps.last()?);
    if instant < *first || instant > *last {
        return None;
    }

    let after = timestamps.partition_point(|t| *t < instant);
    if after == 0 {
        return Some(0);
    }

    let before = after - 1;
    let d_before = instant - timestamps[before];
    let d_after = timestamps[after] - instant;
    // Ties go to the earlier row.
    if d_before <= d_after {
        Some(before)
    } else {
        Some(after)
    }
}
