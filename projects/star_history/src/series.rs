use chrono::{DateTime, Utc};

use crate::config::RepositoryIdentifier;

/// Moment a single star was recorded.
pub type StarEvent = DateTime<Utc>;

/// Running star total: one point per star, counts 1..=N in timestamp order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CumulativeSeries {
    points: Vec<(DateTime<Utc>, u32)>,
}

/// Series per repository, kept in configured order.
pub type StarHistory = Vec<(RepositoryIdentifier, CumulativeSeries)>;

impl CumulativeSeries {
    /// Builds the series from stars in arrival order. GitHub does not promise
    /// chronological delivery across pages, so events are sorted first.
    pub fn from_star_events(mut events: Vec<StarEvent>) -> Self {
        events.sort_unstable();

        let points = events
            .into_iter()
            .zip(1u32..)
            .collect();

        Self { points }
    }

    pub fn points(&self) -> &[(DateTime<Utc>, u32)] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn total(&self) -> u32 {
        self.points.last().map_or(0, |(_, count)| *count)
    }

    pub fn first_starred_at(&self) -> Option<DateTime<Utc>> {
        self.points.first().map(|(at, _)| *at)
    }

    pub fn last_starred_at(&self) -> Option<DateTime<Utc>> {
        self.points.last().map(|(at, _)| *at)
    }
}
