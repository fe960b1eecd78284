//! Search stage of the pool pipeline.

use crate::pool::row::AptamerRow;

/// Pool search criteria.
///
/// With `search_ids` set the query is read as a comma-separated id
/// list; otherwise it is a case-insensitive substring match on the
/// full sequence. A blank query passes everything through.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PoolFilter {
    pub query: String,
    pub search_ids: bool,
}

impl PoolFilter {
    /// Id-list filter, e.g. `"3, 7,12"`.
    pub fn ids(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            search_ids: true,
        }
    }

    /// Sequence substring filter.
    pub fn sequence(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            search_ids: false,
        }
    }

    /// Applies the filter, preserving row order.
    ///
    /// Id tokens that fail to parse are dropped; a query of only
    /// invalid tokens therefore matches nothing.
    pub fn apply(&self, rows: &[AptamerRow]) -> Vec<AptamerRow> {
        let query = self.query.trim().to_lowercase();
        if query.is_empty() {
            return rows.to_vec();
        }

        if self.search_ids {
            let ids: Vec<u64> = query
                .split(',')
                .filter_map(|token| token.trim().parse().ok())
                .collect();
            rows.iter()
                .filter(|row| ids.contains(&row.id))
                .cloned()
                .collect()
        } else {
            rows.iter()
                .filter(|row| row.sequence.to_lowercase().contains(&query))
                .cloned()
                .collect()
        }
    }
}
