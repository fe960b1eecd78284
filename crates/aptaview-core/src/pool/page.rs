//! Pagination stage shared by the derived table views.

use serde::Serialize;

use crate::pool::row::AptamerRow;

/// A page window over the filtered and sorted rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PageRequest {
    /// Zero-based page index.
    pub index: usize,
    /// Rows per page.
    pub size: usize,
}

impl Default for PageRequest {
    fn default() -> Self {
        Self { index: 0, size: 10 }
    }
}

impl PageRequest {
    pub fn new(index: usize, size: usize) -> Self {
        Self { index, size }
    }

    pub fn first(size: usize) -> Self {
        Self { index: 0, size }
    }

    /// Slices `[index*size, index*size + size)` clamped to the row
    /// count. An out-of-range index yields an empty page, never an
    /// error.
    pub fn paginate<T: Clone>(&self, rows: &[T]) -> Page<T> {
        let total_items = rows.len();
        let total_pages = if self.size == 0 {
            0
        } else {
            total_items.div_ceil(self.size)
        };

        let start = (self.index * self.size).min(total_items);
        let end = (start + self.size).min(total_items);

        Page {
            items: rows[start..end].to_vec(),
            total_items,
            total_pages,
            index: self.index,
            size: self.size,
        }
    }
}

/// Final output of a table pipeline.
#[derive(Debug, Clone, Serialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    /// Row count after filtering, before pagination.
    pub total_items: usize,
    pub total_pages: usize,
    pub index: usize,
    pub size: usize,
}

impl<T> Page<T> {
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// Page of pool rows.
pub type PoolPage = Page<AptamerRow>;
