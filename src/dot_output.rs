//! Graphviz DOT output for memory graphs
//!
//! Each cell becomes a 2×2 HTML-table node:
//!
//! ```text
//! ┌────────────┬────────────┐
//! │ addr       │ val        │   ports "addr" / "val"
//! ├────────────┼────────────┤
//! │ [index]    │ page       │   ports "index" / "page"
//! └────────────┴────────────┘
//! ```

use crate::config::{DotStyle, LabelMode};
use crate::graph::{Cluster, MemoryGraph, Node, ReferenceEdge};
use crate::record::GroupId;
use crate::resolve::{CellRef, EdgeKind};
use crate::theme::Palette;
use std::fmt::Write;

/// DOT formatter
#[derive(Debug, Clone)]
pub struct DotOutput {
    palette: Palette,
    style: DotStyle,
    labels: LabelMode,
}

fn node_name(cell: CellRef) -> String {
    format!("{}_node{}", cell.group, cell.position)
}

fn cluster_name(group: GroupId) -> String {
    format!("cluster_{}", group)
}

impl DotOutput {
    pub fn new(palette: Palette, style: DotStyle, labels: LabelMode) -> Self {
        Self {
            palette,
            style,
            labels,
        }
    }

    /// Escape text for HTML-like labels
    fn escape_html(text: &str) -> String {
        text.replace('&', "&amp;")
            .replace('<', "&lt;")
            .replace('>', "&gt;")
            .replace('"', "&quot;")
    }

    /// Escape text for double-quoted DOT strings
    fn escape_quoted(text: &str) -> String {
        text.replace('\\', "\\\\").replace('"', "\\\"")
    }

    /// Render the whole graph
    pub fn render(&self, graph: &MemoryGraph) -> String {
        let mut out = String::new();
        let show_labels = self.labels.show(graph.has_registers);

        out.push_str("digraph MemoryLayout {\n");
        self.write_header(&mut out, graph.has_registers);

        for cluster in &graph.clusters {
            self.write_cluster(&mut out, graph, cluster, show_labels);
        }

        out.push('\n');
        for edge in graph.alignment.iter().filter(|e| e.from.group != e.to.group) {
            let _ = writeln!(
                out,
                "    {} -> {} [style=invis];",
                node_name(edge.from),
                node_name(edge.to)
            );
        }

        out.push('\n');
        for edge in &graph.references {
            let _ = writeln!(out, "    {}", self.reference_edge(edge, graph.has_registers));
        }

        out.push_str("}\n");
        out
    }

    fn write_header(&self, out: &mut String, has_registers: bool) {
        let s = &self.style;
        let text = &self.palette.text;
        let ranksep = if has_registers {
            s.ranksep_with_registers
        } else {
            s.ranksep
        };

        out.push_str("    graph [bgcolor=transparent];\n");
        out.push_str("    compound=true;\n");
        let _ = writeln!(out, "    rankdir={};", s.rankdir);
        let _ = writeln!(out, "    splines={};", s.splines);
        let _ = writeln!(out, "    nodesep={};", s.nodesep);
        let _ = writeln!(out, "    ranksep={};", ranksep);
        let _ = writeln!(
            out,
            "    node [shape=record, fontname=\"{}\", fontsize={}, margin={}, fontcolor=\"{}\"];",
            s.font, s.font_size, s.node_margin, text
        );
        let _ = writeln!(
            out,
            "    edge [fontname=\"{}\", fontsize={}, fontcolor=\"{}\", color=\"{}\"];",
            s.font, s.font_size, text, text
        );
        out.push('\n');
    }

    fn write_cluster(&self, out: &mut String, graph: &MemoryGraph, cluster: &Cluster, show_labels: bool) {
        let _ = writeln!(out, "    subgraph {} {{", cluster_name(cluster.id));
        let _ = writeln!(out, "        color=\"{}\";", self.palette.cluster);
        if show_labels {
            let _ = writeln!(out, "        label=\"{}\";", Self::escape_quoted(&cluster.title));
            let _ = writeln!(out, "        fontname=\"{}\";", self.style.font);
            let _ = writeln!(out, "        fontsize={};", self.style.font_size);
            let _ = writeln!(out, "        fontcolor=\"{}\";", self.palette.text);
            out.push('\n');
        }

        for node in &cluster.nodes {
            out.push_str(&self.node(node));
        }

        out.push('\n');
        for (r, row) in cluster.rows().enumerate() {
            let _ = writeln!(out, "        subgraph row_{}_{} {{", cluster.id, r);
            out.push_str("            rank = same;\n");
            for node in row {
                let _ = writeln!(out, "            {};", node_name(node.cell));
            }
            out.push_str("        }\n");
        }

        out.push('\n');
        for edge in graph
            .alignment
            .iter()
            .filter(|e| e.from.group == cluster.id && e.to.group == cluster.id)
        {
            let _ = writeln!(
                out,
                "        {} -> {} [style=invis];",
                node_name(edge.from),
                node_name(edge.to)
            );
        }
        out.push_str("    }\n");
    }

    fn node(&self, node: &Node) -> String {
        let p = &self.palette;
        let pad = self.style.cell_padding;
        let td = |bg: &str, port: &str, text: &str| {
            format!(
                "<TD BGCOLOR=\"{}\" PORT=\"{}\" ALIGN=\"RIGHT\" CELLPADDING=\"{}\"><FONT COLOR=\"{}\">{}</FONT></TD>",
                bg,
                port,
                pad,
                p.text,
                Self::escape_html(text)
            )
        };

        format!(
            r#"        {name} [shape=none, margin={margin}, label=<
            <TABLE BORDER="0" CELLBORDER="1" CELLSPACING="0" COLOR="{border}">
                <TR>
                    {addr}
                    {val}
                </TR>
                <TR>
                    {index}
                    {page}
                </TR>
            </TABLE>
        >];
"#,
            name = node_name(node.cell),
            margin = self.style.node_margin,
            border = p.border,
            addr = td(&p.addr_bg, "addr", &node.address),
            val = td(&p.val_bg, "val", &node.value),
            index = td(&p.index_bg, "index", &node.index),
            page = td(&p.val_bg, "page", &node.page),
        )
    }

    /// Format one reference edge
    ///
    /// With registers present, edges leave from named ports and walks are
    /// colored by kind; otherwise every reference is a whole-node arrow.
    fn reference_edge(&self, edge: &ReferenceEdge, has_registers: bool) -> String {
        let from = node_name(edge.from);
        let to = node_name(edge.to);
        let lhead = edge
            .cluster
            .map(|g| format!(", lhead=\"{}\"", cluster_name(g)))
            .unwrap_or_default();

        match (has_registers, edge.kind) {
            (true, EdgeKind::DirectPointer) => format!("{}:val -> {}:addr;", from, to),
            (true, kind) => {
                let color = if kind == EdgeKind::RegisterWalk {
                    &self.palette.register_walk
                } else {
                    &self.palette.page_walk
                };
                format!(
                    "{}:page -> {} [color=\"{}\"{}, constraint=false];",
                    from, to, color, lhead
                )
            }
            (false, _) => format!(
                "{} -> {} [color=\"{}\"{}, constraint=false];",
                from, to, self.palette.pointer, lhead
            ),
        }
    }
}
