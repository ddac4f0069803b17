//! Dump-to-graph pipeline
//!
//! ```text
//! raw text ─▶ records/groups ─▶ filtered groups ─▶ GlobalIndex + PageIndex ─▶ edges ─▶ MemoryGraph
//! ```
//!
//! The indexes are built in a separate pass after every group has been
//! parsed and filtered, so a cell may reference any group regardless of
//! where it appears in the transcript.

use crate::config::RenderConfig;
use crate::error::{MemvizError, Result};
use crate::filter::ZeroRowFilter;
use crate::graph::{GraphBuilder, MemoryGraph};
use crate::group::{group_lines, Group};
use crate::record::DumpGrammar;
use crate::resolve::{Edge, GlobalIndex, PageIndex, Resolver};

/// Intermediate results of one run
#[derive(Debug)]
pub struct Analysis {
    /// Groups after zero-row filtering
    pub groups: Vec<Group>,
    pub global: GlobalIndex,
    pub pages: PageIndex,
    pub edges: Vec<Edge>,
}

/// Configured pipeline, reusable across inputs
#[derive(Debug, Clone)]
pub struct Pipeline {
    grammar: DumpGrammar,
    filter: ZeroRowFilter,
    builder: GraphBuilder,
}

impl Pipeline {
    pub fn new(config: &RenderConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            grammar: DumpGrammar::new(&config.prompt)?,
            filter: ZeroRowFilter::new(config.columns)?,
            builder: GraphBuilder::new(config.columns),
        })
    }

    /// Parse, group, filter, index and resolve a transcript
    ///
    /// # Errors
    ///
    /// Returns [`MemvizError::NoAddresses`] when no memory word or register
    /// could be parsed from the input.
    pub fn analyze(&self, input: &str) -> Result<Analysis> {
        let lines: Vec<&str> = input.lines().collect();

        let groups = group_lines(&self.grammar, &lines);
        if groups.iter().all(Group::is_empty) {
            return Err(MemvizError::NoAddresses);
        }
        tracing::debug!("parsed {} group(s) from {} line(s)", groups.len(), lines.len());

        let groups: Vec<Group> = groups.iter().map(|g| self.filter.filter_group(g)).collect();

        let global = GlobalIndex::build(&groups);
        let pages = PageIndex::build(&groups);
        let edges = Resolver::new(&global, &pages).resolve(&groups);

        Ok(Analysis {
            groups,
            global,
            pages,
            edges,
        })
    }

    /// Run the whole pipeline
    pub fn render(&self, input: &str) -> Result<MemoryGraph> {
        let analysis = self.analyze(input)?;
        Ok(self
            .builder
            .build(&analysis.groups, &analysis.edges, analysis.pages.conflicts()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resolve::EdgeKind;

    fn pipeline() -> Pipeline {
        Pipeline::new(&RenderConfig::default()).unwrap()
    }

    #[test]
    fn test_empty_input_is_fatal() {
        assert_eq!(pipeline().render("").unwrap_err(), MemvizError::NoAddresses);
        assert_eq!(
            pipeline().render("GNU gdb (GDB) 14.2\n(gdb) continue\n").unwrap_err(),
            MemvizError::NoAddresses
        );
    }

    #[test]
    fn test_invalid_columns() {
        let config = RenderConfig {
            columns: 0,
            ..RenderConfig::default()
        };
        assert_eq!(
            Pipeline::new(&config).unwrap_err(),
            MemvizError::InvalidColumns { columns: 0 }
        );
    }

    #[test]
    fn test_forward_and_backward_references() {
        let input = "\
(gdb) x /2g 0x1000
0x1000:\t0x0000000000002000\t0x0000000000000000
(gdb) x /2g 0x2000
0x2000:\t0x0000000000001000\t0x0000000000000000
";
        let analysis = pipeline().analyze(input).unwrap();
        assert_eq!(analysis.edges.len(), 2);
        assert!(analysis.edges.iter().all(|e| e.kind == EdgeKind::DirectPointer));
    }

    #[test]
    fn test_filtered_groups_feed_the_index() {
        let input = "\
(gdb) x /8g 0x1000
0x1000:\t0x1\t0x0
0x1010:\t0x0\t0x0
0x1020:\t0x0\t0x0
0x1030:\t0x0\t0x5
";
        let analysis = pipeline().analyze(input).unwrap();
        assert_eq!(analysis.groups[0].len(), 8);

        let config = RenderConfig {
            columns: 2,
            ..RenderConfig::default()
        };
        let analysis = Pipeline::new(&config).unwrap().analyze(input).unwrap();
        assert_eq!(analysis.groups[0].len(), 4);
        assert!(analysis.global.lookup_address(0x1010).is_none());
        assert!(analysis.global.lookup_address(0x1038).is_some());
    }

    #[test]
    fn test_page_conflicts_reach_the_graph() {
        let input = "\
(gdb) x /1g 0x83a5b000
0x83a5b000:\t0x1
(gdb) x /1g 0x83a5b008
0x83a5b008:\t0x2
";
        let graph = pipeline().render(input).unwrap();
        assert_eq!(graph.conflicts.len(), 1);
        assert_eq!(graph.conflicts[0].page, 0x83a5b);
    }

    #[test]
    fn test_register_only_input() {
        let graph = pipeline()
            .render("(gdb) i r satp\nsatp           0x8000000000083a5b\t-9223372036854236581\n")
            .unwrap();
        assert!(graph.has_registers);
        assert_eq!(graph.node_count(), 1);
        assert!(graph.references.is_empty());
    }
}
