//! Trailing-window helpers shared by the indicators.
//!
//! All helpers return a series aligned with the input. A position is NaN until
//! `window` values are available and whenever any value inside its window is
//! NaN.

/// Rolling sum over the trailing `window` values.
///
/// Keeps a running sum and a count of NaNs in the window, so it is O(n).
pub fn rolling_sum(values: &[f64], window: usize) -> Vec<f64> {
    let n = values.len();
    let mut result = vec![f64::NAN; n];

    if window == 0 || n < window {
        return result;
    }

    let mut sum = 0.0;
    let mut nan_count = 0usize;

    for i in 0..n {
        let entering = values[i];
        if entering.is_nan() {
            nan_count += 1;
        } else {
            sum += entering;
        }

        if i >= window {
            let leaving = values[i - window];
            if leaving.is_nan() {
                nan_count -= 1;
            } else {
                sum -= leaving;
            }
        }

        if i + 1 >= window && nan_count == 0 {
            result[i] = sum;
        }
    }

    result
}

/// Rolling minimum over the trailing `window` values.
pub fn rolling_min(values: &[f64], window: usize) -> Vec<f64> {
    rolling_apply(values, window, |w| w.iter().copied().fold(f64::INFINITY, f64::min))
}

/// Rolling maximum over the trailing `window` values.
pub fn rolling_max(values: &[f64], window: usize) -> Vec<f64> {
    rolling_apply(values, window, |w| {
        w.iter().copied().fold(f64::NEG_INFINITY, f64::max)
    })
}

/// Mean absolute deviation of each window around that window's own mean.
pub fn mean_abs_deviation(values: &[f64], window: usize) -> Vec<f64> {
    rolling_apply(values, window, |w| {
        let len = w.len() as f64;
        let mean = w.iter().sum::<f64>() / len;
        w.iter().map(|v| (v - mean).abs()).sum::<f64>() / len
    })
}

/// Apply `f` to every complete, NaN-free trailing window.
fn rolling_apply(values: &[f64], window: usize, f: impl Fn(&[f64]) -> f64) -> Vec<f64> {
    let n = values.len();
    let mut result = vec![f64::NAN; n];

    if window == 0 || n < window {
        return result;
    }

    for i in (window - 1)..n {
        let slice = &values[i + 1 - window..=i];
        if slice.iter().any(|v| v.is_nan()) {
            continue;
        }
        result[i] = f(slice);
    }

    result
}
