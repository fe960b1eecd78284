//! The derived table pipeline for the aptamer pool.
//!
//! Rows are materialized from the report once, then each query runs
//! the pure stages in order: filter, sort, paginate. Stages own no
//! state; changing one input and re-running is the whole reactivity
//! model.

pub mod filter;
pub mod page;
pub mod row;
pub mod sort;

pub use filter::PoolFilter;
pub use page::{Page, PageRequest, PoolPage};
pub use row::{AptamerRow, CycleMetrics, aptamer_rows};
pub use sort::{CycleMetric, ParseSortColumnError, PoolSort, SortColumn, SortDirection};

/// A full pool query: filter + sort + page + display options.
#[derive(Debug, Clone, PartialEq)]
pub struct PoolQuery {
    pub filter: PoolFilter,
    /// `None` keeps the input order.
    pub sort: Option<PoolSort>,
    pub page: PageRequest,
    /// Show cycle counts as CPM instead of raw counts; also switches
    /// what `count` sort columns compare.
    pub use_cpm: bool,
}

impl Default for PoolQuery {
    fn default() -> Self {
        Self {
            filter: PoolFilter::default(),
            sort: Some(PoolSort::default()),
            page: PageRequest::default(),
            use_cpm: true,
        }
    }
}

impl PoolQuery {
    /// Runs the pipeline over materialized rows.
    pub fn run(&self, rows: &[AptamerRow]) -> PoolPage {
        let mut rows = self.filter.apply(rows);
        if let Some(sort) = &self.sort {
            sort.apply(&mut rows, self.use_cpm);
        }
        self.page.paginate(&rows)
    }

    /// Clears the search text, id mode and page index. The sort is
    /// deliberately left untouched.
    pub fn reset_search(&mut self) {
        self.filter = PoolFilter::default();
        self.page.index = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::{ExperimentReport, SelectionCycle};

    fn report(n: u64) -> ExperimentReport {
        let mut report = ExperimentReport::default();
        for id in 0..n {
            report.id_to_aptamer.insert(id, format!("ACGT{id:04}"));
        }
        report.selection_cycles.push(SelectionCycle {
            name: "r1".to_string(),
            round: 1,
            total_size: 1000,
            unique_size: n,
            counts: (0..n).map(|id| (id, id + 1)).collect(),
            ..Default::default()
        });
        report
    }

    #[test]
    fn row_count_matches_id_map() {
        let report = report(25);
        assert_eq!(aptamer_rows(&report).len(), report.id_to_aptamer.len());
    }

    #[test]
    fn pipeline_composes_filter_sort_page() {
        let rows = aptamer_rows(&report(25));
        let query = PoolQuery {
            sort: Some(PoolSort {
                column: SortColumn::Id,
                direction: SortDirection::Desc,
            }),
            page: PageRequest::new(1, 10),
            ..Default::default()
        };

        let page = query.run(&rows);
        // Descending ids 24..0, second page starts at 14.
        assert_eq!(page.items[0].id, 14);
        assert_eq!(page.items.len(), 10);
        assert_eq!(page.total_pages, 3);
    }

    #[test]
    fn page_index_survives_filter_changes() {
        // The page index is independent state: narrowing the filter
        // without resetting it can leave the caller on an empty page.
        let rows = aptamer_rows(&report(25));
        let mut query = PoolQuery {
            page: PageRequest::new(2, 10),
            ..Default::default()
        };
        assert!(!query.run(&rows).is_empty());

        query.filter = PoolFilter::ids("1,2,3");
        let page = query.run(&rows);
        assert!(page.is_empty());
        assert_eq!(page.total_items, 3);

        query.reset_search();
        let page = query.run(&rows);
        assert_eq!(page.index, 0);
        assert_eq!(page.total_items, 25);
    }

    #[test]
    fn cpm_toggle_flows_into_sort() {
        let rows = aptamer_rows(&report(5));
        let query = PoolQuery {
            sort: Some(PoolSort {
                column: SortColumn::Cycle {
                    round: 1,
                    metric: CycleMetric::Count,
                },
                direction: SortDirection::Desc,
            }),
            use_cpm: false,
            ..Default::default()
        };
        let page = query.run(&rows);
        assert_eq!(page.items[0].id, 4);
    }
}
