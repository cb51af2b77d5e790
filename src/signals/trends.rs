// src/signals/trends.rs
//! Interest/acceleration math over an interest-over-time series (points in
//! 0..100, newest last). Pure; the series comes from a `TrendSource`.

/// Interest and velocity derived from a series.
///
/// Interest is the mean of the most-recent ~25% of points, normalized to
/// [0,1]. Velocity compares that recent mean against the preceding baseline
/// through a tanh squash centered at 0.5, so "no change" reads 0.5 and a
/// spike saturates toward 1.0.
pub fn trend_metrics(series: &[f64]) -> (f64, f64) {
    let n = series.len();
    if n < 2 {
        return (0.0, 0.0);
    }
    let cut = ((n as f64 * 0.75) as usize).max(1);
    let (base, recent) = series.split_at(cut);
    if base.is_empty() || recent.is_empty() {
        return (0.0, 0.0);
    }

    let recent_mean = mean(recent) / 100.0;
    let base_mean = mean(base) / 100.0;
    let gain = (recent_mean - base_mean) / (base_mean + 1e-9);
    let velocity = (0.5 + gain.tanh() * 0.5).clamp(0.0, 1.0);

    (recent_mean.clamp(0.0, 1.0), velocity)
}

fn mean(xs: &[f64]) -> f64 {
    xs.iter().sum::<f64>() / xs.len() as f64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flat_series_reads_half_velocity() {
        let series = vec![40.0; 16];
        let (interest, velocity) = trend_metrics(&series);
        assert!((interest - 0.4).abs() < 1e-9);
        assert!((velocity - 0.5).abs() < 1e-6);
    }

    #[test]
    fn spike_in_recent_window_accelerates() {
        let mut series = vec![10.0; 12];
        series.extend([80.0, 90.0, 95.0, 100.0]);
        let (interest, velocity) = trend_metrics(&series);
        assert!(interest > 0.8);
        assert!(velocity > 0.9);
    }

    #[test]
    fn decay_in_recent_window_decelerates() {
        let mut series = vec![90.0; 12];
        series.extend([10.0, 5.0, 5.0, 0.0]);
        let (_, velocity) = trend_metrics(&series);
        assert!(velocity < 0.2);
    }

    #[test]
    fn degenerate_series_is_zero() {
        assert_eq!(trend_metrics(&[]), (0.0, 0.0));
        assert_eq!(trend_metrics(&[50.0]), (0.0, 0.0));
    }

    #[test]
    fn velocity_stays_in_unit_range() {
        let mut series = vec![0.0; 12];
        series.extend([100.0; 4]);
        let (_, velocity) = trend_metrics(&series);
        assert!((0.0..=1.0).contains(&velocity));
    }
}
