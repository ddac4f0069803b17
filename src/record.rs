//! Record parsing for GDB memory and register dumps
//!
//! Recognizes four line shapes:
//! - Memory lines: `0x83a5b000:\t0x0000000000000000\t0x0000000020e97801`
//! - Register lines: `satp           0x8000000000083a5b\t-9223372036854236581`
//! - Examine commands: `(gdb) x /512g 0x83A5B000`
//! - Register markers: `(gdb) i r satp`
//!
//! Anything else is tool noise and is skipped without error.

use crate::error::{MemvizError, Result};
use regex::Regex;
use serde::{Serialize, Serializer};
use std::fmt;

/// Byte distance between consecutive words on one memory line
pub const CELL_STRIDE: u64 = 8;

/// Display form of a null value, padded so empty slots keep a stable width
pub const PADDED_NULL_DISPLAY: &str = "0x00000000";

/// Default debugger prompt
pub const DEFAULT_PROMPT: &str = "(gdb)";

/// Identity of a command group
///
/// Memory groups are numbered from 1 in discovery order; all register output
/// shares the single `reg` pseudo-group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum GroupId {
    Registers,
    Memory(u32),
}

impl fmt::Display for GroupId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GroupId::Registers => write!(f, "reg"),
            GroupId::Memory(n) => write!(f, "g{}", n),
        }
    }
}

impl Serialize for GroupId {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// One 64-bit word from a memory dump
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MemoryCell {
    pub address: u64,
    pub value: u64,
    pub origin_group: GroupId,
    /// Position within the group before any filtering
    pub original_index: u32,
}

/// One register from an `info registers` dump
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RegisterCell {
    pub name: String,
    pub value: u64,
    pub original_index: u32,
}

/// An examine-memory command (`x /<count>g <address>`)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExamineCommand {
    /// Requested word count; `None` for the bare `x /g` form
    pub count: Option<u32>,
    pub address: u64,
}

/// Parse a hex literal with or without a `0x` prefix
///
/// Returns `None` for empty input, non-hex digits, or values wider than 64 bits.
pub fn parse_hex(text: &str) -> Option<u64> {
    let digits = text
        .strip_prefix("0x")
        .or_else(|| text.strip_prefix("0X"))
        .unwrap_or(text);
    if digits.is_empty() {
        return None;
    }
    u64::from_str_radix(digits, 16).ok()
}

/// Normalized hex form: lowercase, `0x` prefix, no leading zeros
pub fn format_hex(value: u64) -> String {
    format!("{:#x}", value)
}

/// Hex form used in node labels; zero is padded to [`PADDED_NULL_DISPLAY`]
pub fn display_value(value: u64) -> String {
    if value == 0 {
        PADDED_NULL_DISPLAY.to_string()
    } else {
        format_hex(value)
    }
}

/// Compiled line grammars for one debugger prompt
#[derive(Debug, Clone)]
pub struct DumpGrammar {
    memory_line: Regex,
    register_line: Regex,
    examine_command: Regex,
    register_command: Regex,
}

impl DumpGrammar {
    /// Build grammars for the given prompt (e.g. `(gdb)`)
    pub fn new(prompt: &str) -> Result<Self> {
        let prompt = regex::escape(prompt.trim());
        let compile = |pattern: &str| {
            Regex::new(pattern).map_err(|e| MemvizError::InvalidConfig(e.to_string()))
        };

        Ok(Self {
            memory_line: compile(r"^0x([0-9a-fA-F]+)(?:\s*<[^>]*>)?:\s*(.*)$")?,
            register_line: compile(r"^([A-Za-z_][A-Za-z0-9_]*)\s+0x([0-9a-fA-F]+)(?:\s|$)")?,
            examine_command: compile(&format!(
                r"^{}\s+x\s*/(\d*)g\s+0x([0-9a-fA-F]+)",
                prompt
            ))?,
            register_command: compile(&format!(
                r"^{}\s+(?:i|info)\s+(?:r|registers)\b",
                prompt
            ))?,
        })
    }

    /// Grammars for the stock GDB prompt
    pub fn gdb() -> Result<Self> {
        Self::new(DEFAULT_PROMPT)
    }

    /// Split a memory line into its base address and the words that follow
    ///
    /// Parsing of words stops at the first token that is not 64-bit hex, so
    /// trailing tool output never shifts the stride of the words before it.
    pub fn parse_memory_line(&self, line: &str) -> Option<(u64, Vec<u64>)> {
        let caps = self.memory_line.captures(line)?;
        let base = parse_hex(&caps[1])?;
        let words: Vec<u64> = caps[2].split_whitespace().map_while(parse_hex).collect();
        Some((base, words))
    }

    /// Split a register line into name and value
    pub fn parse_register_line(&self, line: &str) -> Option<(String, u64)> {
        let caps = self.register_line.captures(line.trim())?;
        let value = parse_hex(&caps[2])?;
        Some((caps[1].to_string(), value))
    }

    /// Whether the line has the `<name> 0x<hex>` register shape
    pub fn is_register_line(&self, line: &str) -> bool {
        self.parse_register_line(line).is_some()
    }

    /// Whether the line is a register dump marker (`(gdb) i r ...`)
    pub fn is_register_command(&self, line: &str) -> bool {
        self.register_command.is_match(line.trim())
    }

    /// Parse an examine-memory command line
    pub fn parse_command(&self, line: &str) -> Option<ExamineCommand> {
        let caps = self.examine_command.captures(line.trim_start())?;
        let address = parse_hex(&caps[2])?;
        let count = caps[1].parse::<u32>().ok();
        Some(ExamineCommand { count, address })
    }

    /// Parse all memory lines into cells owned by `group`
    ///
    /// Only the first word of each line uses the dump's own address; later
    /// words are placed at [`CELL_STRIDE`] increments from it.
    pub fn parse_memory_cells<'a, I>(&self, lines: I, group: GroupId) -> Vec<MemoryCell>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut cells = Vec::new();
        let mut index = 0u32;

        for line in lines {
            let Some((base, words)) = self.parse_memory_line(line) else {
                tracing::trace!("skipping non-memory line: {:?}", line);
                continue;
            };

            let mut address = base;
            for value in words {
                cells.push(MemoryCell {
                    address,
                    value,
                    origin_group: group,
                    original_index: index,
                });
                index += 1;
                address = address.wrapping_add(CELL_STRIDE);
            }
        }

        cells
    }

    /// Parse all register lines, in dump order
    pub fn parse_register_cells<'a, I>(&self, lines: I) -> Vec<RegisterCell>
    where
        I: IntoIterator<Item = &'a str>,
    {
        lines
            .into_iter()
            .filter_map(|line| self.parse_register_line(line))
            .zip(0u32..)
            .map(|((name, value), original_index)| RegisterCell {
                name,
                value,
                original_index,
            })
            .collect()
    }
}
