// Cross-reference resolution between dump cells
//
// Every retained cell is classified in priority order:
// 1. Direct pointer: the value is the address of another retained cell
// 2. Page-table walk: memory value with V=1 whose PPN (value >> 10) is anchored by a group
// 3. Register walk: register value whose page (satp PPN field, else value >> 12) is anchored
//
// Resolution runs only after GlobalIndex and PageIndex are complete, so
// references resolve the same way regardless of group order.

mod index;
pub mod page;
mod resolver;

pub use index::{CellKey, CellRef, GlobalIndex, PageConflict, PageIndex};
pub use resolver::{Edge, EdgeKind, EdgeTarget, Resolver};

#[cfg(test)]
mod tests;
