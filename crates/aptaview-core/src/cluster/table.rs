//! Aggregated per-cluster rows for the family analysis table.

use std::cmp::Ordering;
use std::collections::{BTreeMap, BTreeSet};

use serde::Serialize;
use strum_macros::{Display, EnumString};

use crate::cluster::model::ClusterAnalysis;
use crate::pool::{AptamerRow, SortDirection};
use crate::report::SelectionCycle;

/// One cluster aggregated over its member aptamers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClusterTableRow {
    pub cluster_id: u64,
    pub aptamer_ids: Vec<u64>,
    /// Summed reference-cycle counts of all members.
    pub size: u64,
    /// Number of distinct member aptamers.
    pub diversity: usize,
}

/// Builds one row per cluster by inverting the aptamer-to-cluster
/// assignment of `analysis`.
///
/// `size` sums the reference cycle counts of the members; aptamers
/// the reference cycle never observed contribute zero. Rows come out
/// in ascending cluster id order, which the table sort then reorders.
pub fn cluster_table_rows(
    analysis: &ClusterAnalysis,
    reference: Option<&SelectionCycle>,
) -> Vec<ClusterTableRow> {
    let mut by_cluster: BTreeMap<u64, ClusterTableRow> = BTreeMap::new();

    for (&aptamer_id, &cluster_id) in &analysis.aptamer_to_cluster {
        let row = by_cluster.entry(cluster_id).or_insert_with(|| ClusterTableRow {
            cluster_id,
            aptamer_ids: Vec::new(),
            size: 0,
            diversity: 0,
        });
        row.aptamer_ids.push(aptamer_id);
        row.size += reference
            .and_then(|cycle| cycle.counts.get(&aptamer_id).copied())
            .unwrap_or(0);
    }

    let mut rows: Vec<ClusterTableRow> = by_cluster.into_values().collect();
    for row in &mut rows {
        row.diversity = row.aptamer_ids.len();
    }
    rows
}

/// Pool rows restricted to the members of `cluster`, keeping the pool
/// order.
pub fn members_of(rows: &[AptamerRow], cluster: &ClusterTableRow) -> Vec<AptamerRow> {
    let ids: BTreeSet<u64> = cluster.aptamer_ids.iter().copied().collect();
    rows.iter().filter(|row| ids.contains(&row.id)).cloned().collect()
}

/// Sortable cluster table columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString)]
#[strum(serialize_all = "lowercase")]
pub enum ClusterSortColumn {
    Id,
    Size,
    Diversity,
}

/// Column plus direction for the cluster table; `size` descending by
/// default, so the largest families surface first.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClusterSort {
    pub column: ClusterSortColumn,
    pub direction: SortDirection,
}

impl Default for ClusterSort {
    fn default() -> Self {
        Self {
            column: ClusterSortColumn::Size,
            direction: SortDirection::Desc,
        }
    }
}

impl ClusterSort {
    pub fn apply(&self, rows: &mut [ClusterTableRow]) {
        rows.sort_by(|a, b| self.direction.apply(self.compare(a, b)));
    }

    fn compare(&self, a: &ClusterTableRow, b: &ClusterTableRow) -> Ordering {
        match self.column {
            ClusterSortColumn::Id => a.cluster_id.cmp(&b.cluster_id),
            ClusterSortColumn::Size => a.size.cmp(&b.size),
            ClusterSortColumn::Diversity => a.diversity.cmp(&b.diversity),
        }
    }
}

/// Default page size of the cluster table.
pub const CLUSTER_PAGE_SIZE: usize = 15;

/// Page size choices offered by the cluster table.
pub const CLUSTER_PAGE_SIZE_OPTIONS: [usize; 4] = [15, 25, 50, 100];
