//! memviz - Render GDB memory and register dumps as Graphviz diagrams
//!
//! This library parses debugger transcripts (`x /Ng` memory examines and
//! `info registers` output), resolves pointers, page-table entries and
//! `satp`-style root registers into edges, and emits a graph description
//! suitable for embedding in documentation.
//!
//! # Example
//!
//! ```
//! use memviz::config::RenderConfig;
//! use memviz::pipeline::Pipeline;
//!
//! # fn main() -> Result<(), memviz::error::MemvizError> {
//! let input = "(gdb) x /4g 0x2000\n0x2000:\t0x2000\t0x0\t0x0\t0x0\n";
//! let graph = Pipeline::new(&RenderConfig::default())?.render(input)?;
//! assert_eq!(graph.clusters.len(), 1);
//! assert_eq!(graph.references.len(), 1);
//! # Ok(())
//! # }
//! ```

pub mod cli;
pub mod config;
pub mod dot_output;
pub mod error;
pub mod filter;
pub mod graph;
pub mod group;
pub mod json_output;
pub mod pipeline;
pub mod record;
pub mod resolve;
pub mod theme;
