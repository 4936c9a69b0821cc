use crate::data::PricePoint;
use chrono::{DateTime, Duration, Utc};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeWindow {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl TimeWindow {
    /// Window covering `points` periods of `minutes_per_point` back from `now`.
    pub fn ending_at(now: DateTime<Utc>, minutes_per_point: i64, points: u32) -> Self {
        let span = Duration::minutes(minutes_per_point * i64::from(points));
        Self {
            start: now - span,
            end: now,
        }
    }

    pub fn contains(&self, instant: DateTime<Utc>) -> bool {
        self.start <= instant && instant <= self.end
    }
}

pub fn filter_range(points: &[PricePoint], window: &TimeWindow) -> Vec<PricePoint> {
    points
        .iter()
        .filter(|p| window.contains(p.period_start))
        .cloned()
        .collect()
}

/// Subgraph replies come newest first; charts read left to right.
pub fn chronological(mut points: Vec<PricePoint>) -> Vec<PricePoint> {
    points.sort_by_key(|p| p.period_start);
    points
}
