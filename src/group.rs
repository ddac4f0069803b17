//! Command grouping for interleaved debugger transcripts
//!
//! Each `x /<N>g <addr>` command opens a new group that collects the memory
//! lines after it. When the transcript contains a register marker
//! (`(gdb) i r`), every register line is pulled out into one `reg` group
//! first so register output never lands under an unrelated memory command.

use crate::record::{format_hex, DumpGrammar, GroupId, MemoryCell, RegisterCell};
use crate::resolve::page::address_page_number;
use serde::Serialize;

/// Whether a group holds memory words or registers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum GroupKind {
    Memory,
    Register,
}

/// Cells of one group, tagged once at parse time
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GroupCells {
    Memory(Vec<MemoryCell>),
    Register(Vec<RegisterCell>),
}

/// All output produced by one command
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Group {
    pub id: GroupId,
    pub command_text: String,
    pub cells: GroupCells,
    /// Physical page named by the command's address (memory groups only)
    pub anchor_physical_page: Option<u64>,
    /// Number of cells parsed before any filtering
    pub parsed_cells: usize,
}

impl Group {
    /// Build a memory group; the anchor page comes from the command address
    pub fn memory(
        id: GroupId,
        command_text: impl Into<String>,
        address: Option<u64>,
        cells: Vec<MemoryCell>,
    ) -> Self {
        Self {
            id,
            command_text: command_text.into(),
            parsed_cells: cells.len(),
            cells: GroupCells::Memory(cells),
            anchor_physical_page: address.map(address_page_number),
        }
    }

    /// Build the register pseudo-group
    pub fn registers(command_text: impl Into<String>, cells: Vec<RegisterCell>) -> Self {
        Self {
            id: GroupId::Registers,
            command_text: command_text.into(),
            parsed_cells: cells.len(),
            cells: GroupCells::Register(cells),
            anchor_physical_page: None,
        }
    }

    pub fn kind(&self) -> GroupKind {
        match self.cells {
            GroupCells::Memory(_) => GroupKind::Memory,
            GroupCells::Register(_) => GroupKind::Register,
        }
    }

    pub fn len(&self) -> usize {
        match &self.cells {
            GroupCells::Memory(cells) => cells.len(),
            GroupCells::Register(cells) => cells.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Display title: physical page for memory, register identity otherwise
    pub fn title(&self) -> String {
        match &self.cells {
            GroupCells::Register(cells) if cells.len() == 1 => {
                format!("Register: {}", cells[0].name)
            }
            GroupCells::Register(_) => "Registers".to_string(),
            GroupCells::Memory(_) => match self.anchor_physical_page {
                Some(page) => format!("Physical Page: {}", format_hex(page)),
                None if self.command_text.is_empty() => "Memory".to_string(),
                None => self.command_text.clone(),
            },
        }
    }
}

/// Lines collected under one examine command
#[derive(Debug)]
struct PendingGroup<'a> {
    command: &'a str,
    address: u64,
    lines: Vec<&'a str>,
}

/// Partition a transcript into register and memory groups
///
/// The register group (if any) comes first, then memory groups in command
/// order. A transcript with no examine command at all is treated as a single
/// untitled memory dump. Groups whose command produced no words are dropped.
pub fn group_lines(grammar: &DumpGrammar, lines: &[&str]) -> Vec<Group> {
    let mut groups = Vec::new();

    let has_registers = lines.iter().any(|line| grammar.is_register_command(line));
    let memory_lines: Vec<&str> = if has_registers {
        let cells = grammar.parse_register_cells(lines.iter().copied());
        if !cells.is_empty() {
            let command = lines
                .iter()
                .find(|line| grammar.is_register_command(line))
                .map(|line| line.trim().to_string())
                .unwrap_or_default();
            tracing::debug!("extracted {} register(s)", cells.len());
            groups.push(Group::registers(command, cells));
        }
        lines
            .iter()
            .copied()
            .filter(|line| !grammar.is_register_command(line) && !grammar.is_register_line(line))
            .collect()
    } else {
        lines.to_vec()
    };

    let pending = split_by_command(grammar, &memory_lines);
    if pending.is_empty() {
        let cells = grammar.parse_memory_cells(memory_lines.iter().copied(), GroupId::Memory(1));
        if !cells.is_empty() {
            groups.push(Group::memory(GroupId::Memory(1), "", None, cells));
        }
        return groups;
    }

    for (n, group) in (1u32..).zip(pending) {
        let id = GroupId::Memory(n);
        let cells = grammar.parse_memory_cells(group.lines.iter().copied(), id);
        if cells.is_empty() {
            tracing::warn!("command {:?} produced no memory words; skipping", group.command);
            continue;
        }
        groups.push(Group::memory(id, group.command.trim(), Some(group.address), cells));
    }

    groups
}

/// Split lines at each examine command; lines before the first are dropped
fn split_by_command<'a>(grammar: &DumpGrammar, lines: &[&'a str]) -> Vec<PendingGroup<'a>> {
    let mut groups = Vec::new();
    let mut current: Option<PendingGroup<'a>> = None;
    let mut dropped = 0usize;

    for &line in lines {
        if let Some(command) = grammar.parse_command(line) {
            if let Some(done) = current.take() {
                groups.push(done);
            }
            current = Some(PendingGroup {
                command: line,
                address: command.address,
                lines: Vec::new(),
            });
        } else if let Some(group) = current.as_mut() {
            group.lines.push(line);
        } else {
            dropped += 1;
        }
    }

    if let Some(done) = current {
        groups.push(done);
    }
    if dropped > 0 && !groups.is_empty() {
        tracing::debug!("dropped {} line(s) before the first command", dropped);
    }

    groups
}
