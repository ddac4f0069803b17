//! Abstract graph description of a resolved dump
//!
//! `MemoryGraph` is what every presentation backend consumes: clusters of
//! nodes, invisible alignment edges that pin the layout, and visible
//! reference edges. Building it involves no resolution of its own.
//!
//! Ordering is deterministic: clusters in group-discovery order, nodes in
//! row-major order, reference edges in cell-discovery order.

use crate::group::{Group, GroupCells, GroupKind};
use crate::record::{display_value, format_hex, GroupId, MemoryCell, RegisterCell};
use crate::resolve::page::{pte_page_number, register_page_number};
use crate::resolve::{CellRef, Edge, EdgeKind, EdgeTarget, PageConflict};
use serde::Serialize;

/// Placeholder for empty label fields
const BLANK: &str = " ";

/// One cell's node, with its label fields already formatted
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Node {
    pub cell: CellRef,
    /// Address for memory cells, register name for registers
    pub address: String,
    pub value: String,
    /// `[i]` right-aligned for memory cells, blank for registers
    pub index: String,
    /// Page number the value refers to, or blank
    pub page: String,
}

/// One command group
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Cluster {
    pub id: GroupId,
    pub kind: GroupKind,
    pub title: String,
    pub columns: usize,
    pub nodes: Vec<Node>,
}

impl Cluster {
    /// Nodes split into layout rows
    pub fn rows(&self) -> std::slice::Chunks<'_, Node> {
        self.nodes.chunks(self.columns)
    }

    pub fn row_count(&self) -> usize {
        self.nodes.len().div_ceil(self.columns)
    }
}

/// Direction of an invisible layout edge
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Axis {
    /// Neighbors in the same row
    Horizontal,
    /// Same column, consecutive rows
    Vertical,
    /// Last row of one cluster to first row of the next
    InterGroup,
}

/// Layout-only edge; carries no data meaning
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct AlignmentEdge {
    pub from: CellRef,
    pub to: CellRef,
    pub axis: Axis,
}

/// Visible edge for one resolved reference
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ReferenceEdge {
    pub from: CellRef,
    /// Target node; the anchor node when the edge targets a whole group
    pub to: CellRef,
    pub kind: EdgeKind,
    /// Cluster the edge should clip at, for group-level targets
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cluster: Option<GroupId>,
}

/// Complete renderable description
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MemoryGraph {
    pub has_registers: bool,
    pub clusters: Vec<Cluster>,
    pub alignment: Vec<AlignmentEdge>,
    pub references: Vec<ReferenceEdge>,
    pub conflicts: Vec<PageConflict>,
}

impl MemoryGraph {
    pub fn node_count(&self) -> usize {
        self.clusters.iter().map(|c| c.nodes.len()).sum()
    }

    pub fn cluster(&self, id: GroupId) -> Option<&Cluster> {
        self.clusters.iter().find(|c| c.id == id)
    }

    /// Reference edge count per kind: (direct, page walk, register walk)
    pub fn reference_counts(&self) -> (usize, usize, usize) {
        self.references
            .iter()
            .fold((0, 0, 0), |(d, p, r), edge| match edge.kind {
                EdgeKind::DirectPointer => (d + 1, p, r),
                EdgeKind::PageTableWalk => (d, p + 1, r),
                EdgeKind::RegisterWalk => (d, p, r + 1),
            })
    }
}

/// Serializes filtered groups and resolved edges into a [`MemoryGraph`]
#[derive(Debug, Clone, Copy)]
pub struct GraphBuilder {
    columns: usize,
}

impl GraphBuilder {
    /// `columns` applies to memory clusters; register clusters are one column
    pub fn new(columns: usize) -> Self {
        Self {
            columns: columns.max(1),
        }
    }

    pub fn build(&self, groups: &[Group], edges: &[Edge], conflicts: &[PageConflict]) -> MemoryGraph {
        let clusters: Vec<Cluster> = groups.iter().map(|g| self.cluster(g)).collect();

        let mut alignment = Vec::new();
        for cluster in &clusters {
            intra_cluster_alignment(cluster, &mut alignment);
        }
        for pair in clusters.windows(2) {
            inter_cluster_alignment(&pair[0], &pair[1], &mut alignment);
        }

        let references = edges
            .iter()
            .map(|edge| match edge.to {
                EdgeTarget::Cell(to) => ReferenceEdge {
                    from: edge.from,
                    to,
                    kind: edge.kind,
                    cluster: None,
                },
                EdgeTarget::Group(group) => ReferenceEdge {
                    from: edge.from,
                    to: CellRef::new(group, 0),
                    kind: edge.kind,
                    cluster: Some(group),
                },
            })
            .collect();

        MemoryGraph {
            has_registers: groups.iter().any(|g| g.kind() == GroupKind::Register),
            clusters,
            alignment,
            references,
            conflicts: conflicts.to_vec(),
        }
    }

    fn cluster(&self, group: &Group) -> Cluster {
        let width = index_width(group.parsed_cells);
        let (columns, nodes) = match &group.cells {
            GroupCells::Memory(cells) => (
                self.columns,
                cells
                    .iter()
                    .enumerate()
                    .map(|(position, cell)| memory_node(group.id, position, cell, width))
                    .collect(),
            ),
            GroupCells::Register(cells) => (
                1,
                cells
                    .iter()
                    .enumerate()
                    .map(|(position, cell)| register_node(position, cell, width))
                    .collect(),
            ),
        };

        Cluster {
            id: group.id,
            kind: group.kind(),
            title: group.title(),
            columns,
            nodes,
        }
    }
}

/// Digits needed for the largest original index
fn index_width(parsed_cells: usize) -> usize {
    parsed_cells.saturating_sub(1).to_string().len()
}

fn memory_node(group: GroupId, position: usize, cell: &MemoryCell, width: usize) -> Node {
    let index = format!("[{}]", cell.original_index);
    Node {
        cell: CellRef::new(group, position),
        address: format_hex(cell.address),
        value: display_value(cell.value),
        index: format!("{:>w$}", index, w = width + 2),
        page: pte_page_number(cell.value).map_or_else(|| BLANK.to_string(), format_hex),
    }
}

fn register_node(position: usize, cell: &RegisterCell, width: usize) -> Node {
    Node {
        cell: CellRef::new(GroupId::Registers, position),
        address: cell.name.clone(),
        value: display_value(cell.value),
        index: " ".repeat(width + 3),
        page: register_page_number(&cell.name, cell.value)
            .map_or_else(|| BLANK.to_string(), format_hex),
    }
}

fn intra_cluster_alignment(cluster: &Cluster, out: &mut Vec<AlignmentEdge>) {
    let n = cluster.nodes.len();
    let cols = cluster.columns;

    for (r, row) in cluster.rows().enumerate() {
        for pair in row.windows(2) {
            out.push(AlignmentEdge {
                from: pair[0].cell,
                to: pair[1].cell,
                axis: Axis::Horizontal,
            });
        }
        for (c, node) in row.iter().enumerate() {
            let below = (r + 1) * cols + c;
            if below < n {
                out.push(AlignmentEdge {
                    from: node.cell,
                    to: cluster.nodes[below].cell,
                    axis: Axis::Vertical,
                });
            }
        }
    }
}

fn inter_cluster_alignment(upper: &Cluster, lower: &Cluster, out: &mut Vec<AlignmentEdge>) {
    let (Some(last_row), Some(first_row)) = (upper.rows().last(), lower.rows().next()) else {
        return;
    };

    for (from, to) in last_row.iter().zip(first_row) {
        out.push(AlignmentEdge {
            from: from.cell,
            to: to.cell,
            axis: Axis::InterGroup,
        });
    }
}
