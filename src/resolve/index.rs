use crate::group::{Group, GroupCells};
use crate::record::GroupId;
use serde::Serialize;
use std::collections::hash_map::Entry;
use std::collections::HashMap;

/// Lookup key of a retained cell
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum CellKey {
    Address(u64),
    Register(String),
}

/// Position of a retained cell within its (filtered) group
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct CellRef {
    pub group: GroupId,
    pub position: usize,
}

impl CellRef {
    pub fn new(group: GroupId, position: usize) -> Self {
        Self { group, position }
    }
}

/// Every retained cell, addressable by literal address or register name
///
/// Built only after filtering, so dropped cells are never link targets.
/// Duplicate keys keep the first cell seen.
#[derive(Debug, Default)]
pub struct GlobalIndex {
    entries: HashMap<CellKey, CellRef>,
}

impl GlobalIndex {
    pub fn build(groups: &[Group]) -> Self {
        let mut index = Self::default();

        for group in groups {
            match &group.cells {
                GroupCells::Memory(cells) => {
                    for (position, cell) in cells.iter().enumerate() {
                        index.insert(CellKey::Address(cell.address), CellRef::new(group.id, position));
                    }
                }
                GroupCells::Register(cells) => {
                    for (position, cell) in cells.iter().enumerate() {
                        index.insert(CellKey::Register(cell.name.clone()), CellRef::new(group.id, position));
                    }
                }
            }
        }

        index
    }

    fn insert(&mut self, key: CellKey, cell: CellRef) {
        match self.entries.entry(key) {
            Entry::Occupied(existing) => {
                tracing::debug!(
                    "duplicate key {:?} in {}; keeping {}[{}]",
                    existing.key(),
                    cell.group,
                    existing.get().group,
                    existing.get().position
                );
            }
            Entry::Vacant(slot) => {
                slot.insert(cell);
            }
        }
    }

    pub fn get(&self, key: &CellKey) -> Option<CellRef> {
        self.entries.get(key).copied()
    }

    /// Cell whose address equals `value`, if it was retained
    pub fn lookup_address(&self, value: u64) -> Option<CellRef> {
        self.get(&CellKey::Address(value))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Two groups anchored the same physical page
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PageConflict {
    pub page: u64,
    /// Group that held the page before
    pub previous: GroupId,
    /// Group that now holds it
    pub current: GroupId,
}

/// Physical page number → anchoring group
///
/// On conflict the later group wins and the collision is recorded.
#[derive(Debug, Default)]
pub struct PageIndex {
    pages: HashMap<u64, GroupId>,
    conflicts: Vec<PageConflict>,
}

impl PageIndex {
    pub fn build(groups: &[Group]) -> Self {
        let mut index = Self::default();

        for group in groups {
            let Some(page) = group.anchor_physical_page else {
                continue;
            };
            if let Some(previous) = index.pages.insert(page, group.id) {
                tracing::warn!(
                    "physical page {:#x} anchored by both {} and {}; using {}",
                    page,
                    previous,
                    group.id,
                    group.id
                );
                index.conflicts.push(PageConflict {
                    page,
                    previous,
                    current: group.id,
                });
            }
        }

        index
    }

    pub fn get(&self, page: u64) -> Option<GroupId> {
        self.pages.get(&page).copied()
    }

    pub fn conflicts(&self) -> &[PageConflict] {
        &self.conflicts
    }

    pub fn len(&self) -> usize {
        self.pages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }
}
