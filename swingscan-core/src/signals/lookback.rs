//! Lookback-OR: relax a bar-exact condition to "held within the last k bars".

/// True at `i` when any of `series[i+1-k ..= i]` is true.
///
/// `k <= 1` returns the series unchanged. The window never reaches forward,
/// and widening it can only add true positions.
pub fn lookback_or(series: &[bool], k: usize) -> Vec<bool> {
    if k <= 1 {
        return series.to_vec();
    }

    let mut last_true: Option<usize> = None;
    series
        .iter()
        .enumerate()
        .map(|(i, &v)| {
            if v {
                last_true = Some(i);
            }
            last_true.map_or(false, |t| i - t < k)
        })
        .collect()
}
