use chrono::{DateTime, Utc};
use tracing::warn;
use crate::forecast::types::{ForecastPoint, ForecastRow, Segment};

/// Tag each forecast row as `Past` (inside the training window) or `Future`.
///
/// Rows come out ordered by timestamp: all `Past` rows, then all `Future`
/// rows. Accepts already-tagged rows, in which case the tags are recomputed.
pub fn partition<I, P>(forecast: I, window_end: DateTime<Utc>) -> Vec<ForecastRow>
where
    I: IntoIterator<Item = P>,
    P: Into<ForecastPoint>,
{
    let mut points: Vec<ForecastPoint> = forecast.into_iter().map(Into::into).collect();

    if !points.windows(2).all(|w| w[0].timestamp <= w[1].timestamp) {
        warn!("Forecast rows out of order, sorting by timestamp");
        points.sort_by_key(|p| p.timestamp);
    }

    points
        .into_iter()
        .map(|p| ForecastRow {
            timestamp: p.timestamp,
            predicted_value: p.predicted_value,
            segment: if p.timestamp <= window_end {
                Segment::Past
            } else {
                Segment::Future
            },
        })
        .collect()
}

/// Number of rows tagged with `segment`.
pub fn count_segment(rows: &[ForecastRow], segment: Segment) -> usize {
    rows.iter().filter(|r| r.segment == segment).count()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn forecast(hours: i64) -> (Vec<ForecastPoint>, DateTime<Utc>) {
        let t0 = Utc.with_ymd_and_hms(2026, 10, 17, 0, 0, 0).unwrap();
        let points = (0..hours)
            .map(|h| ForecastPoint {
                timestamp: t0 + Duration::hours(h),
                predicted_value: 50.0 + h as f64,
            })
            .collect();
        (points, t0)
    }

    #[test]
    fn test_partition_completeness() {
        let (points, t0) = forecast(24 + 48);
        let window_end = t0 + Duration::hours(23);

        let rows = partition(points.clone(), window_end);

        let past = count_segment(&rows, Segment::Past);
        let future = count_segment(&rows, Segment::Future);
        assert_eq!(past + future, points.len());
        assert_eq!(future, 48);

        let last_past = rows.iter().filter(|r| r.segment == Segment::Past).map(|r| r.timestamp).max();
        let first_future = rows.iter().filter(|r| r.segment == Segment::Future).map(|r| r.timestamp).min();
        assert!(last_past.unwrap() < first_future.unwrap());
    }

    #[test]
    fn test_past_rows_precede_future_rows() {
        let (points, t0) = forecast(10);
        let rows = partition(points, t0 + Duration::hours(4));

        let first_future = rows.iter().position(|r| r.segment == Segment::Future).unwrap();
        assert!(rows[..first_future].iter().all(|r| r.segment == Segment::Past));
        assert!(rows[first_future..].iter().all(|r| r.segment == Segment::Future));
    }

    #[test]
    fn test_repartition_is_idempotent() {
        let (points, t0) = forecast(30);
        let window_end = t0 + Duration::hours(12);

        let once = partition(points, window_end);
        let twice = partition(once.clone(), window_end);

        assert_eq!(once, twice);
    }

    #[test]
    fn test_window_end_row_is_past() {
        let (points, t0) = forecast(3);
        let rows = partition(points, t0 + Duration::hours(1));

        assert_eq!(rows[1].segment, Segment::Past);
        assert_eq!(rows[2].segment, Segment::Future);
    }

    #[test]
    fn test_unordered_input_is_sorted() {
        let (mut points, t0) = forecast(6);
        points.reverse();

        let rows = partition(points, t0 + Duration::hours(2));

        assert!(rows.windows(2).all(|w| w[0].timestamp < w[1].timestamp));
        assert_eq!(count_segment(&rows, Segment::Future), 3);
    }
}
