use super::index::{CellRef, GlobalIndex, PageIndex};
use super::page::{pte_page_number, register_page_number};
use crate::filter::is_null;
use crate::group::{Group, GroupCells};
use crate::record::{GroupId, MemoryCell, RegisterCell};
use serde::Serialize;

/// Kind of reference a cell value makes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EdgeKind {
    /// Value is the literal address of another retained cell
    DirectPointer,
    /// Value is a valid PTE mapping a tracked page
    PageTableWalk,
    /// Register value names a tracked page
    RegisterWalk,
}

/// Where a reference lands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EdgeTarget {
    Cell(CellRef),
    /// The whole group anchoring the page
    Group(GroupId),
}

/// One resolved reference
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Edge {
    pub from: CellRef,
    pub to: EdgeTarget,
    pub kind: EdgeKind,
}

/// Classifies cell values against fully built indexes
///
/// Both indexes must be complete before resolution starts: any cell may
/// point forward or backward into any group.
#[derive(Debug, Clone, Copy)]
pub struct Resolver<'a> {
    global: &'a GlobalIndex,
    pages: &'a PageIndex,
}

impl<'a> Resolver<'a> {
    pub fn new(global: &'a GlobalIndex, pages: &'a PageIndex) -> Self {
        Self { global, pages }
    }

    fn direct(&self, value: u64) -> Option<(EdgeTarget, EdgeKind)> {
        if is_null(value) {
            return None;
        }
        self.global
            .lookup_address(value)
            .map(|cell| (EdgeTarget::Cell(cell), EdgeKind::DirectPointer))
    }

    /// Resolve a memory word: direct pointer first, then page-table walk
    pub fn resolve_memory(&self, cell: &MemoryCell) -> Option<(EdgeTarget, EdgeKind)> {
        self.direct(cell.value).or_else(|| {
            let page = pte_page_number(cell.value)?;
            let group = self.pages.get(page)?;
            Some((EdgeTarget::Group(group), EdgeKind::PageTableWalk))
        })
    }

    /// Resolve a register: direct pointer first, then register walk
    pub fn resolve_register(&self, cell: &RegisterCell) -> Option<(EdgeTarget, EdgeKind)> {
        self.direct(cell.value).or_else(|| {
            let page = register_page_number(&cell.name, cell.value)?;
            let group = self.pages.get(page)?;
            Some((EdgeTarget::Group(group), EdgeKind::RegisterWalk))
        })
    }

    /// All edges, in group order then cell order
    pub fn resolve(&self, groups: &[Group]) -> Vec<Edge> {
        let mut edges = Vec::new();

        for group in groups {
            let resolved: Vec<Option<(EdgeTarget, EdgeKind)>> = match &group.cells {
                GroupCells::Memory(cells) => cells.iter().map(|c| self.resolve_memory(c)).collect(),
                GroupCells::Register(cells) => {
                    cells.iter().map(|c| self.resolve_register(c)).collect()
                }
            };

            for (position, hit) in resolved.into_iter().enumerate() {
                if let Some((to, kind)) = hit {
                    edges.push(Edge {
                        from: CellRef::new(group.id, position),
                        to,
                        kind,
                    });
                }
            }
        }

        tracing::debug!("resolved {} edge(s)", edges.len());
        edges
    }
}
