//! CLI argument parsing for memviz

use crate::config::{LabelMode, RenderConfig};
use crate::theme::Theme;
use clap::{Parser, ValueEnum};
use std::path::PathBuf;

/// Output format for the rendered graph
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Graphviz DOT (default)
    Dot,
    /// Abstract graph as JSON
    Json,
}

#[derive(Parser, Debug)]
#[command(name = "memviz")]
#[command(version)]
#[command(about = "Render GDB memory/register dumps as Graphviz diagrams", long_about = None)]
pub struct Cli {
    /// GDB transcript to read (stdin if omitted)
    #[arg(value_name = "FILE")]
    pub file: Option<PathBuf>,

    /// TOML configuration file
    #[arg(long = "config", value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Cells per row in memory clusters
    #[arg(long = "columns", value_name = "N")]
    pub columns: Option<usize>,

    /// Color theme
    #[arg(long = "theme", value_enum)]
    pub theme: Option<Theme>,

    /// Debugger prompt that starts command lines
    #[arg(long = "prompt", value_name = "PROMPT")]
    pub prompt: Option<String>,

    /// When to show cluster titles
    #[arg(long = "labels", value_enum)]
    pub labels: Option<LabelMode>,

    /// Output format
    #[arg(long = "format", value_enum, default_value = "dot")]
    pub format: OutputFormat,

    /// Write output to a file instead of stdout
    #[arg(short = 'o', long = "output", value_name = "PATH")]
    pub output: Option<PathBuf>,

    /// Do not report page conflicts on stderr
    #[arg(short = 'q', long = "quiet")]
    pub quiet: bool,

    /// Enable debug tracing to stderr
    #[arg(long = "debug")]
    pub debug: bool,
}

impl Cli {
    /// Apply flag overrides on top of a base configuration
    pub fn apply(&self, mut config: RenderConfig) -> RenderConfig {
        if let Some(columns) = self.columns {
            config.columns = columns;
        }
        if let Some(theme) = self.theme {
            config.theme = theme;
        }
        if let Some(prompt) = &self.prompt {
            config.prompt = prompt.clone();
        }
        if let Some(labels) = self.labels {
            config.labels = labels;
        }
        config
    }
}
