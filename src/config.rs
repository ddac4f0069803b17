//! Render configuration
//!
//! Loaded from an optional TOML file and overridden by CLI flags. Every field
//! has a default, so an empty file is a valid configuration.
//!
//! # Example
//! ```toml
//! columns = 8
//! theme = "dark"
//! labels = "always"
//!
//! [style]
//! splines = "spline"
//! font_size = 10
//! ```

use crate::error::{MemvizError, Result};
use crate::record::DEFAULT_PROMPT;
use crate::theme::Theme;
use anyhow::Context;
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// When to show cluster titles
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LabelMode {
    /// Only when the dump includes registers
    #[default]
    Auto,
    Always,
    Never,
}

impl LabelMode {
    pub fn show(self, has_registers: bool) -> bool {
        match self {
            LabelMode::Auto => has_registers,
            LabelMode::Always => true,
            LabelMode::Never => false,
        }
    }
}

/// Graphviz layout attributes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DotStyle {
    pub font: String,
    pub font_size: u32,
    pub cell_padding: u32,
    pub node_margin: f64,
    pub rankdir: String,
    pub splines: String,
    pub nodesep: f64,
    /// Rank separation for memory-only dumps
    pub ranksep: f64,
    /// Rank separation once a register group is present
    pub ranksep_with_registers: f64,
}

impl Default for DotStyle {
    fn default() -> Self {
        Self {
            font: "SF Mono,monospace".to_string(),
            font_size: 12,
            cell_padding: 4,
            node_margin: 0.125,
            rankdir: "TB".to_string(),
            splines: "ortho".to_string(),
            nodesep: 0.3,
            ranksep: 0.6,
            ranksep_with_registers: 0.1,
        }
    }
}

/// Everything the core needs from the outside
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Cells per row in memory clusters
    pub columns: usize,
    pub theme: Theme,
    /// Debugger prompt that starts command lines
    pub prompt: String,
    pub labels: LabelMode,
    pub style: DotStyle,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            columns: 4,
            theme: Theme::Light,
            prompt: DEFAULT_PROMPT.to_string(),
            labels: LabelMode::Auto,
            style: DotStyle::default(),
        }
    }
}

impl RenderConfig {
    /// Load configuration from a TOML file
    pub fn from_toml<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let content = fs::read_to_string(path.as_ref()).with_context(|| {
            format!("Failed to read config file: {}", path.as_ref().display())
        })?;
        Self::from_toml_str(&content)
    }

    /// Parse configuration from TOML text
    pub fn from_toml_str(content: &str) -> anyhow::Result<Self> {
        let config: Self = toml::from_str(content).context("Failed to parse TOML config")?;
        config.validate()?;
        Ok(config)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.columns == 0 {
            return Err(MemvizError::InvalidColumns {
                columns: self.columns,
            });
        }
        if self.prompt.trim().is_empty() {
            return Err(MemvizError::InvalidConfig("prompt must not be empty".to_string()));
        }
        if self.style.font_size == 0 {
            return Err(MemvizError::InvalidConfig("style.font_size must be > 0".to_string()));
        }
        Ok(())
    }
}
