//! Sort stage of the pool pipeline.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use strum_macros::{Display, EnumString};
use thiserror::Error;

use crate::pool::row::AptamerRow;

/// Which cycle metric a dynamic column sorts on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString)]
#[strum(serialize_all = "lowercase")]
pub enum CycleMetric {
    Count,
    Frequency,
}

/// Sortable pool columns.
///
/// The wire form used by table headers is `id`, `sequence`,
/// `cycle-<round>-count` or `cycle-<round>-frequency`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortColumn {
    Id,
    Sequence,
    Cycle { round: u32, metric: CycleMetric },
}

/// Error for unrecognized sort column names.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unrecognized sort column '{0}'")]
pub struct ParseSortColumnError(pub String);

impl FromStr for SortColumn {
    type Err = ParseSortColumnError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "id" => return Ok(Self::Id),
            "sequence" => return Ok(Self::Sequence),
            _ => {}
        }

        let err = || ParseSortColumnError(s.to_string());
        let rest = s.strip_prefix("cycle-").ok_or_else(err)?;
        let (round, metric) = rest.rsplit_once('-').ok_or_else(err)?;
        let round = round.parse().map_err(|_| err())?;
        let metric = metric.parse().map_err(|_| err())?;
        Ok(Self::Cycle { round, metric })
    }
}

impl fmt::Display for SortColumn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Id => write!(f, "id"),
            Self::Sequence => write!(f, "sequence"),
            Self::Cycle { round, metric } => write!(f, "cycle-{round}-{metric}"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString)]
#[strum(serialize_all = "lowercase")]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    pub fn apply(&self, ord: Ordering) -> Ordering {
        match self {
            Self::Asc => ord,
            Self::Desc => ord.reverse(),
        }
    }
}

/// Column plus direction; applied stably.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PoolSort {
    pub column: SortColumn,
    pub direction: SortDirection,
}

impl Default for PoolSort {
    fn default() -> Self {
        Self {
            column: SortColumn::Id,
            direction: SortDirection::Asc,
        }
    }
}

impl PoolSort {
    /// Sorts rows in place.
    ///
    /// For cycle columns, `count` compares CPM when `use_cpm` is set
    /// and raw counts otherwise. Rows without an entry for the sort
    /// cycle always order after rows that have one, in both
    /// directions.
    pub fn apply(&self, rows: &mut [AptamerRow], use_cpm: bool) {
        rows.sort_by(|a, b| self.compare(a, b, use_cpm));
    }

    fn compare(&self, a: &AptamerRow, b: &AptamerRow, use_cpm: bool) -> Ordering {
        match self.column {
            SortColumn::Id => self.direction.apply(a.id.cmp(&b.id)),
            SortColumn::Sequence => self
                .direction
                .apply(a.sequence.to_lowercase().cmp(&b.sequence.to_lowercase())),
            SortColumn::Cycle { round, metric } => {
                let value = |row: &AptamerRow| {
                    row.cycles.get(&round).map(|m| match metric {
                        CycleMetric::Count if use_cpm => m.cpm,
                        CycleMetric::Count => m.count as f64,
                        CycleMetric::Frequency => m.frequency,
                    })
                };
                match (value(a), value(b)) {
                    (Some(x), Some(y)) => self
                        .direction
                        .apply(x.partial_cmp(&y).unwrap_or(Ordering::Equal)),
                    (Some(_), None) => Ordering::Less,
                    (None, Some(_)) => Ordering::Greater,
                    (None, None) => Ordering::Equal,
                }
            }
        }
    }
}
