//! Color themes for rendered diagrams
//!
//! The theme is only a lookup key: it picks colors and never changes which
//! cells or edges appear.

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// Opacity applied to cell backgrounds
const BACKGROUND_ALPHA: f64 = 0.18;

// System colors (light, dark)
const RED: ([u8; 3], [u8; 3]) = ([0xFF, 0x3B, 0x30], [0xFF, 0x45, 0x3A]);
const ORANGE: ([u8; 3], [u8; 3]) = ([0xFF, 0x95, 0x00], [0xFF, 0x9F, 0x0A]);
const GREEN: ([u8; 3], [u8; 3]) = ([0x34, 0xC7, 0x59], [0x30, 0xD1, 0x58]);
const BLUE: ([u8; 3], [u8; 3]) = ([0x00, 0x7A, 0xFF], [0x0A, 0x84, 0xFF]);
const PINK: ([u8; 3], [u8; 3]) = ([0xFF, 0x2D, 0x55], [0xFF, 0x37, 0x5F]);
const GRAY2: ([u8; 3], [u8; 3]) = ([0xAE, 0xAE, 0xB2], [0x63, 0x63, 0x66]);
const GRAY3: ([u8; 3], [u8; 3]) = ([0xC7, 0xC7, 0xCC], [0x48, 0x48, 0x4A]);

/// Diagram color theme
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    /// Dark text on a light page (default)
    #[default]
    Light,
    /// Light text on a dark page
    Dark,
}

/// Resolved colors for one theme
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Palette {
    pub text: String,
    pub border: String,
    pub cluster: String,
    pub addr_bg: String,
    pub val_bg: String,
    pub index_bg: String,
    /// Direct pointers
    pub pointer: String,
    /// Page-table walks
    pub page_walk: String,
    /// Register walks
    pub register_walk: String,
}

/// `#RRGGBB`
pub fn rgb(color: [u8; 3]) -> String {
    format!("#{}", hex::encode_upper(color))
}

/// `#RRGGBBAA` with alpha in 0.0..=1.0 (truncated to a byte)
pub fn rgba(color: [u8; 3], alpha: f64) -> String {
    let a = (alpha.clamp(0.0, 1.0) * 255.0) as u8;
    format!("#{}", hex::encode_upper([color[0], color[1], color[2], a]))
}

impl Theme {
    pub fn palette(self) -> Palette {
        let pick = |pair: ([u8; 3], [u8; 3])| match self {
            Theme::Light => pair.0,
            Theme::Dark => pair.1,
        };
        let text = match self {
            Theme::Light => "#1c1e21",
            Theme::Dark => "#e3e3e3",
        };

        Palette {
            text: text.to_string(),
            border: rgb(pick(GRAY2)),
            cluster: rgb(pick(GRAY3)),
            addr_bg: rgba(pick(PINK), BACKGROUND_ALPHA),
            val_bg: rgba(pick(GREEN), BACKGROUND_ALPHA),
            index_bg: rgba(pick(BLUE), BACKGROUND_ALPHA),
            pointer: rgb(pick(BLUE)),
            page_walk: rgb(pick(ORANGE)),
            register_walk: rgb(pick(RED)),
        }
    }
}
