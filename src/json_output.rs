//! JSON output format for memory graphs
//!
//! `--format json` emits the abstract graph instead of DOT, for tooling
//! that does its own layout.

use crate::graph::MemoryGraph;
use crate::theme::Theme;
use serde::Serialize;

/// Summary counts for a rendered dump
#[derive(Debug, Clone, Serialize)]
pub struct JsonSummary {
    pub clusters: usize,
    pub nodes: usize,
    pub direct_pointers: usize,
    pub page_table_walks: usize,
    pub register_walks: usize,
    pub page_conflicts: usize,
}

/// Top-level JSON document
#[derive(Debug, Clone, Serialize)]
pub struct JsonOutput<'a> {
    pub version: &'static str,
    pub theme: Theme,
    pub summary: JsonSummary,
    pub graph: &'a MemoryGraph,
}

impl<'a> JsonOutput<'a> {
    pub fn new(graph: &'a MemoryGraph, theme: Theme) -> Self {
        let (direct_pointers, page_table_walks, register_walks) = graph.reference_counts();
        Self {
            version: env!("CARGO_PKG_VERSION"),
            theme,
            summary: JsonSummary {
                clusters: graph.clusters.len(),
                nodes: graph.node_count(),
                direct_pointers,
                page_table_walks,
                register_walks,
                page_conflicts: graph.conflicts.len(),
            },
            graph,
        }
    }

    /// Serialize as pretty-printed JSON
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::GraphBuilder;
    use crate::group::Group;
    use crate::record::{GroupId, MemoryCell};

    fn graph() -> MemoryGraph {
        let cells = vec![MemoryCell {
            address: 0x1000,
            value: 0x1000,
            origin_group: GroupId::Memory(1),
            original_index: 0,
        }];
        let group = Group::memory(GroupId::Memory(1), "(gdb) x /1g 0x1000", Some(0x1000), cells);
        GraphBuilder::new(4).build(&[group], &[], &[])
    }

    #[test]
    fn test_json_structure() {
        let graph = graph();
        let json = JsonOutput::new(&graph, Theme::Dark).to_json().unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(value["theme"], "dark");
        assert_eq!(value["summary"]["nodes"], 1);
        assert_eq!(value["graph"]["clusters"][0]["id"], "g1");
        assert_eq!(value["graph"]["clusters"][0]["kind"], "memory");
        assert_eq!(value["graph"]["clusters"][0]["nodes"][0]["address"], "0x1000");
        assert_eq!(value["graph"]["has_registers"], false);
    }
}
