//! Activity timeline merging and chart-series downsampling.

use chrono::Duration;

use crate::tracker::types::{ActivityEvent, ProgressPoint};

/// Restrict a statistics query to one user or show everyone.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserFilter {
    All,
    Single(String),
}

impl UserFilter {
    /// Store keys are lowercased, so the comparison ignores ASCII case:
    /// a filter built from a raw CLI id must match records written under
    /// any casing of the same id.
    pub fn matches(&self, user_id: &str) -> bool {
        match self {
            UserFilter::All => true,
            UserFilter::Single(id) => id.eq_ignore_ascii_case(user_id),
        }
    }
}

/// Flatten per-user event lists into one feed, newest first. Events with
/// identical timestamps keep their input-relative order (stable sort).
pub fn merge_timeline(per_user: Vec<Vec<ActivityEvent>>, filter: &UserFilter) -> Vec<ActivityEvent> {
    let mut merged: Vec<ActivityEvent> = per_user
        .into_iter()
        .flatten()
        .filter(|e| filter.matches(&e.user_id))
        .collect();
    merged.sort_by(|a, b| b.completed_at.cmp(&a.completed_at));
    merged
}

/// Collapse runs of points that fall within `window` of the first point of
/// the current group, keeping only the last (most recent cumulative value)
/// of each group. Output never has more points than the input, always ends
/// with the input's final point, and introduces no new timestamps. Keeps
/// chart lines readable when many quests land in a short span.
pub fn downsample(points: &[ProgressPoint], window: Duration) -> Vec<ProgressPoint> {
    let mut out = Vec::new();
    let mut iter = points.iter();
    let Some(first) = iter.next() else {
        return out;
    };

    let mut group_start = first.timestamp;
    let mut group_last = *first;
    for point in iter {
        if point.timestamp.signed_duration_since(group_start) < window {
            group_last = *point;
        } else {
            out.push(group_last);
            group_start = point.timestamp;
            group_last = *point;
        }
    }
    out.push(group_last);
    out
}

/// Build a cumulative-progress series from a user's events, oldest first.
/// A user with no events yields an empty series, not an error.
pub fn cumulative_series(events: &[ActivityEvent]) -> Vec<ProgressPoint> {
    let mut ordered: Vec<&ActivityEvent> = events.iter().collect();
    ordered.sort_by(|a, b| a.completed_at.cmp(&b.completed_at));
    ordered
        .into_iter()
        .enumerate()
        .map(|(idx, event)| ProgressPoint {
            timestamp: event.completed_at,
            cumulative_count: idx + 1,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn point(minute: u32, count: usize) -> ProgressPoint {
        ProgressPoint {
            timestamp: Utc.with_ymd_and_hms(2026, 3, 1, 12, minute, 0).unwrap(),
            cumulative_count: count,
        }
    }

    #[test]
    fn burst_within_window_collapses_to_latest_point() {
        // Five completions inside ten minutes, one hour window.
        let points: Vec<ProgressPoint> = (0..5).map(|i| point(i * 2, i as usize + 1)).collect();
        let reduced = downsample(&points, Duration::hours(1));
        assert_eq!(reduced.len(), 1);
        assert_eq!(reduced[0].cumulative_count, 5);
        assert_eq!(reduced[0].timestamp, points[4].timestamp);
    }

    #[test]
    fn points_past_the_window_start_a_new_group() {
        let points = vec![point(0, 1), point(5, 2), point(30, 3), point(32, 4)];
        let reduced = downsample(&points, Duration::minutes(20));
        assert_eq!(reduced.len(), 2);
        assert_eq!(reduced[0].cumulative_count, 2);
        assert_eq!(reduced[1].cumulative_count, 4);
    }

    #[test]
    fn downsample_preserves_final_point_and_timestamps() {
        let points = vec![point(0, 1), point(7, 2), point(45, 3)];
        let reduced = downsample(&points, Duration::minutes(10));
        assert!(reduced.len() <= points.len());
        assert_eq!(*reduced.last().unwrap(), *points.last().unwrap());
        for p in &reduced {
            assert!(points.iter().any(|orig| orig.timestamp == p.timestamp));
        }
    }

    #[test]
    fn empty_series_stays_empty() {
        assert!(downsample(&[], Duration::hours(1)).is_empty());
        assert!(cumulative_series(&[]).is_empty());
    }
}
