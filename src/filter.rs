//! Zero-row filtering for matrix layouts
//!
//! Cells are laid out row-major, `columns` per row. Rows where every value is
//! null carry no information and are dropped, except the row holding the
//! anchor cell (original index 0), which always survives so each group keeps
//! a first node to align against.

use crate::error::{MemvizError, Result};
use crate::group::{Group, GroupCells};
use crate::record::MemoryCell;

/// Whether a value is in the null set
pub fn is_null(value: u64) -> bool {
    value == 0
}

/// Row filter for one column count
#[derive(Debug, Clone, Copy)]
pub struct ZeroRowFilter {
    columns: usize,
}

impl ZeroRowFilter {
    /// Create a filter for the given layout width
    pub fn new(columns: usize) -> Result<Self> {
        if columns == 0 {
            return Err(MemvizError::InvalidColumns { columns });
        }
        Ok(Self { columns })
    }

    pub fn columns(&self) -> usize {
        self.columns
    }

    /// Check if a row should stay in the layout
    pub fn keeps_row(&self, row: &[MemoryCell]) -> bool {
        row.iter().any(|cell| cell.original_index == 0) || !row.iter().all(|cell| is_null(cell.value))
    }

    /// Drop all-null rows, preserving order
    pub fn apply(&self, cells: &[MemoryCell]) -> Vec<MemoryCell> {
        cells
            .chunks(self.columns)
            .filter(|row| self.keeps_row(row))
            .flatten()
            .copied()
            .collect()
    }

    /// Filter a group's cells
    ///
    /// Register groups pass through untouched: every dumped register is shown.
    pub fn filter_group(&self, group: &Group) -> Group {
        match &group.cells {
            GroupCells::Memory(cells) => {
                let kept = self.apply(cells);
                if kept.len() != cells.len() {
                    tracing::debug!(
                        "group {}: dropped {} null cell(s)",
                        group.id,
                        cells.len() - kept.len()
                    );
                }
                Group {
                    cells: GroupCells::Memory(kept),
                    ..group.clone()
                }
            }
            GroupCells::Register(_) => group.clone(),
        }
    }
}
