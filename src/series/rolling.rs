/// Trailing rolling mean over one grid column.
///
/// Position `i` averages the window `[i - window + 1, i]`, clipped at the
/// sequence start. The mean is defined only once at least `max(window / 2, 1)`
/// non-absent values are present in the window; otherwise the position is
/// absent. Causal: the window never looks ahead.
#[must_use]
pub fn rolling_mean(values: &[Option<f64>], window: usize) -> Vec<Option<f64>> {
    let min_periods = (window / 2).max(1);
    let mut means = vec![None; values.len()];

    for i in 0..values.len() {
        let lo = i.saturating_sub(window.saturating_sub(1));
        let mut sum = 0.0;
        let mut count = 0usize;
        for value in values[lo..=i].iter().flatten() {
            sum += value;
            count += 1;
        }
        if count >= min_periods {
            means[i] = Some(sum / count as f64);
        }
    }

    means
}
