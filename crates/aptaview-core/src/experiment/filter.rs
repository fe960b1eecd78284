//! In-memory filtering and sorting of the experiment list.
//!
//! These are pure functions over a fetched summary list; the store in
//! the application layer applies them to its cache.

use chrono::{DateTime, Duration, Utc};
use strum_macros::{Display, EnumString};

use crate::experiment::model::{ExperimentStatus, ExperimentSummary};

/// Status criterion: everything, or one status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusFilter {
    All,
    Only(ExperimentStatus),
}

impl Default for StatusFilter {
    fn default() -> Self {
        Self::All
    }
}

impl StatusFilter {
    fn matches(&self, status: ExperimentStatus) -> bool {
        match self {
            Self::All => true,
            Self::Only(wanted) => *wanted == status,
        }
    }
}

/// Creation-date window, relative to "now" at evaluation time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString)]
pub enum DateRange {
    #[strum(serialize = "all")]
    All,
    #[strum(serialize = "7")]
    Last7Days,
    #[strum(serialize = "30")]
    Last30Days,
    #[strum(serialize = "90")]
    Last90Days,
}

impl Default for DateRange {
    fn default() -> Self {
        Self::All
    }
}

impl DateRange {
    fn days(&self) -> Option<i64> {
        match self {
            Self::All => None,
            Self::Last7Days => Some(7),
            Self::Last30Days => Some(30),
            Self::Last90Days => Some(90),
        }
    }

    /// Inclusive cutoff: experiments created at or after it pass.
    fn matches(&self, created_at: DateTime<Utc>, now: DateTime<Utc>) -> bool {
        match self.days() {
            None => true,
            Some(days) => created_at >= now - Duration::days(days),
        }
    }
}

/// Sort key for the experiment list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString)]
pub enum ListSort {
    /// Name, ascending, case-insensitive.
    #[strum(serialize = "name")]
    Name,
    /// Creation date, newest first.
    #[strum(serialize = "createdAt", serialize = "created-at")]
    CreatedAt,
}

impl Default for ListSort {
    fn default() -> Self {
        Self::CreatedAt
    }
}

/// Combined list criteria.
#[derive(Debug, Clone, Default)]
pub struct ExperimentFilter {
    /// Case-insensitive substring matched against name or description.
    pub search: String,
    pub status: StatusFilter,
    pub date_range: DateRange,
    pub sort: ListSort,
}

/// Applies search, status and date criteria, then sorts.
///
/// `now` is passed in so the date window is deterministic under test.
pub fn filter_experiments(
    list: &[ExperimentSummary],
    filter: &ExperimentFilter,
    now: DateTime<Utc>,
) -> Vec<ExperimentSummary> {
    let search = filter.search.trim().to_lowercase();

    let mut result: Vec<ExperimentSummary> = list
        .iter()
        .filter(|exp| {
            let matches_search = search.is_empty()
                || exp.name.to_lowercase().contains(&search)
                || exp
                    .description
                    .as_ref()
                    .is_some_and(|d| d.to_lowercase().contains(&search));
            matches_search
                && filter.status.matches(exp.status)
                && filter.date_range.matches(exp.created_at, now)
        })
        .cloned()
        .collect();

    match filter.sort {
        ListSort::Name => {
            result.sort_by(|a, b| a.name.to_lowercase().cmp(&b.name.to_lowercase()))
        }
        ListSort::CreatedAt => result.sort_by(|a, b| b.created_at.cmp(&a.created_at)),
    }

    result
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use chrono::TimeZone;

    use super::*;

    fn summary(name: &str, description: Option<&str>, status: ExperimentStatus, day: u32) -> ExperimentSummary {
        ExperimentSummary {
            id: format!("id-{name}"),
            name: name.to_string(),
            description: description.map(str::to_string),
            status,
            created_at: Utc.with_ymd_and_hms(2024, 6, day, 12, 0, 0).unwrap(),
        }
    }

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 30, 12, 0, 0).unwrap()
    }

    #[test]
    fn search_matches_name_or_description() {
        let list = vec![
            summary("Thrombin", None, ExperimentStatus::Completed, 1),
            summary("Control", Some("thrombin rerun"), ExperimentStatus::Draft, 2),
            summary("Other", None, ExperimentStatus::Draft, 3),
        ];
        let filter = ExperimentFilter {
            search: "THROMBIN".to_string(),
            ..Default::default()
        };

        let result = filter_experiments(&list, &filter, now());
        let names: Vec<_> = result.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["Control", "Thrombin"]);
    }

    #[test]
    fn status_filter_keeps_only_matching() {
        let list = vec![
            summary("a", None, ExperimentStatus::Draft, 1),
            summary("b", None, ExperimentStatus::Running, 2),
        ];
        let filter = ExperimentFilter {
            status: StatusFilter::Only(ExperimentStatus::Running),
            ..Default::default()
        };

        let result = filter_experiments(&list, &filter, now());
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].name, "b");
    }

    #[test]
    fn date_range_boundary_is_inclusive() {
        // 2024-06-23 12:00 is exactly 7 days before "now".
        let list = vec![
            summary("edge", None, ExperimentStatus::Draft, 23),
            summary("older", None, ExperimentStatus::Draft, 22),
        ];
        let filter = ExperimentFilter {
            date_range: DateRange::Last7Days,
            ..Default::default()
        };

        let result = filter_experiments(&list, &filter, now());
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].name, "edge");
    }

    #[test]
    fn name_sort_is_case_insensitive_ascending() {
        let list = vec![
            summary("beta", None, ExperimentStatus::Draft, 1),
            summary("Alpha", None, ExperimentStatus::Draft, 2),
        ];
        let filter = ExperimentFilter {
            sort: ListSort::Name,
            ..Default::default()
        };

        let result = filter_experiments(&list, &filter, now());
        let names: Vec<_> = result.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["Alpha", "beta"]);
    }

    #[test]
    fn default_sort_is_newest_first() {
        let list = vec![
            summary("old", None, ExperimentStatus::Draft, 1),
            summary("new", None, ExperimentStatus::Draft, 20),
        ];

        let result = filter_experiments(&list, &ExperimentFilter::default(), now());
        assert_eq!(result[0].name, "new");
    }

    #[test]
    fn parses_wire_values() {
        assert_eq!(DateRange::from_str("7").unwrap(), DateRange::Last7Days);
        assert_eq!(ListSort::from_str("createdAt").unwrap(), ListSort::CreatedAt);
        assert_eq!(ListSort::from_str("created-at").unwrap(), ListSort::CreatedAt);
    }
}
