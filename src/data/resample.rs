use chrono::{DateTime, Duration, Utc};
use serde::Deserialize;
use crate::data::types::{RawObservation, TimeSeriesPoint};

/// How hours without any observation are imputed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GapFill {
    #[default]
    Zero,
    ForwardFill,
    Linear,
}

pub fn floor_to_hour(ts: DateTime<Utc>) -> DateTime<Utc> {
    let secs = ts.timestamp();
    DateTime::from_timestamp(secs - secs.rem_euclid(3600), 0).unwrap_or(ts)
}

/// Resample irregular observations onto a dense hourly grid of `hours`
/// points ending at the hour of the latest observation.
///
/// Observations inside the same hour are averaged. Observations older than
/// the grid are dropped. Returns an empty vector when there is nothing to
/// resample.
pub fn resample_hourly(raw: &[RawObservation], hours: usize, fill: GapFill) -> Vec<TimeSeriesPoint> {
    let observed: Vec<&RawObservation> = raw.iter().filter(|o| o.value.is_finite()).collect();

    let end = match observed.iter().map(|o| o.timestamp).max() {
        Some(latest) if hours > 0 => floor_to_hour(latest),
        _ => return Vec::new(),
    };
    let start = end - Duration::hours(hours as i64 - 1);

    let mut buckets = vec![(0.0_f64, 0_usize); hours];
    for obs in observed {
        let idx = (floor_to_hour(obs.timestamp) - start).num_hours();
        if idx < 0 || idx as usize >= hours {
            continue;
        }
        let bucket = &mut buckets[idx as usize];
        bucket.0 += obs.value;
        bucket.1 += 1;
    }

    let means: Vec<Option<f64>> = buckets
        .into_iter()
        .map(|(sum, count)| (count > 0).then(|| sum / count as f64))
        .collect();

    fill_gaps(&means, fill)
        .into_iter()
        .enumerate()
        .map(|(i, value)| TimeSeriesPoint {
            timestamp: start + Duration::hours(i as i64),
            value,
        })
        .collect()
}

fn fill_gaps(means: &[Option<f64>], fill: GapFill) -> Vec<f64> {
    match fill {
        GapFill::Zero => means.iter().map(|m| m.unwrap_or(0.0)).collect(),
        GapFill::ForwardFill => {
            let mut last = 0.0;
            means
                .iter()
                .map(|m| {
                    if let Some(v) = m {
                        last = *v;
                    }
                    last
                })
                .collect()
        }
        GapFill::Linear => {
            let known: Vec<(usize, f64)> = means
                .iter()
                .enumerate()
                .filter_map(|(i, m)| m.map(|v| (i, v)))
                .collect();

            (0..means.len())
                .map(|i| {
                    if let Some(v) = means[i] {
                        return v;
                    }
                    // Neighbours on either side; edges take the nearest one.
                    let after = known.partition_point(|(k, _)| *k < i);
                    match (after.checked_sub(1).map(|j| known[j]), known.get(after)) {
                        (Some((i0, v0)), Some(&(i1, v1))) => {
                            let frac = (i - i0) as f64 / (i1 - i0) as f64;
                            v0 + (v1 - v0) * frac
                        }
                        (Some((_, v0)), None) => v0,
                        (None, Some(&(_, v1))) => v1,
                        (None, None) => 0.0,
                    }
                })
                .collect()
        }
    }
}
