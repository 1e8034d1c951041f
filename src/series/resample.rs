use chrono::{DateTime, Duration, Utc};

use super::types::{GRID_STEP_SECS, RawSample, SampleGrid};

/// Resample raw readings onto a uniform 1-minute grid.
///
/// The grid covers `[min(fetch_from, earliest sample), latest sample]` with
/// boundaries aligned to whole minutes. Each boundary takes the last finite
/// reading from its interval `(previous boundary, boundary]`; the value then
/// holds until the next observation. A position stays a hole when no finite
/// reading has been observed yet, or when its interval contained samples but
/// none carried a finite value for that column (such an interval does not
/// break the hold for later empty intervals).
///
/// Input ordering is not required; among samples at the same timestamp the
/// last one delivered wins. Empty input yields an empty grid.
#[must_use]
pub fn resample(samples: &[RawSample], fetch_from: DateTime<Utc>) -> SampleGrid {
    if samples.is_empty() {
        return SampleGrid::default();
    }

    let mut ordered: Vec<&RawSample> = samples.iter().collect();
    // Stable: equal timestamps keep arrival order, so the later delivery wins.
    ordered.sort_by_key(|s| s.timestamp);

    let first_ts = ordered[0].timestamp;
    let last_ts = ordered[ordered.len() - 1].timestamp;

    let start_secs = fetch_from
        .min(first_ts)
        .timestamp()
        .div_euclid(GRID_STEP_SECS)
        * GRID_STEP_SECS;
    let last_secs = last_ts.timestamp();
    let end_secs = if last_secs.rem_euclid(GRID_STEP_SECS) == 0 {
        last_secs
    } else {
        last_secs.div_euclid(GRID_STEP_SECS) * GRID_STEP_SECS + GRID_STEP_SECS
    };

    let Some(start) = DateTime::from_timestamp(start_secs, 0) else {
        return SampleGrid::default();
    };
    let len = ((end_secs - start_secs) / GRID_STEP_SECS + 1) as usize;

    let mut temperature: Vec<Option<f64>> = vec![None; len];
    let mut humidity: Vec<Option<f64>> = vec![None; len];
    // Intervals that saw at least one sample; a sampled interval that still
    // holds None for a column is a hole, not a candidate for the hold-forward.
    let mut sampled = vec![false; len];

    for sample in ordered {
        let offset = sample.timestamp.timestamp() - start_secs;
        let idx = ((offset + GRID_STEP_SECS - 1) / GRID_STEP_SECS) as usize;
        sampled[idx] = true;
        if let Some(t) = sample.temperature.filter(|v| v.is_finite()) {
            temperature[idx] = Some(t);
        }
        if let Some(h) = sample.humidity.filter(|v| v.is_finite()) {
            humidity[idx] = Some(h);
        }
    }

    hold_forward(&mut temperature, &sampled);
    hold_forward(&mut humidity, &sampled);

    let timestamps = (0..len)
        .map(|i| start + Duration::seconds(i as i64 * GRID_STEP_SECS))
        .collect();

    SampleGrid {
        timestamps,
        temperature,
        humidity,
    }
}

/// Carry the last observed value into empty intervals. Sampled-but-holey
/// positions stay absent and do not disturb the carried value.
fn hold_forward(values: &mut [Option<f64>], sampled: &[bool]) {
    let mut carry: Option<f64> = None;
    for (value, &had_sample) in values.iter_mut().zip(sampled) {
        match *value {
            Some(v) => carry = Some(v),
            None if !had_sample => *value = carry,
            None => {}
        }
    }
}
