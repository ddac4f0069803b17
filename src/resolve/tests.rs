// Resolver tests: pointer precedence, PTE validity, satp masking, conflicts

use super::*;
use crate::filter::ZeroRowFilter;
use crate::group::{group_lines, Group};
use crate::record::{DumpGrammar, GroupId, MemoryCell, RegisterCell};

fn memory_group(n: u32, base: u64, values: &[u64]) -> Group {
    let id = GroupId::Memory(n);
    let cells = values
        .iter()
        .zip(0u32..)
        .map(|(&value, i)| MemoryCell {
            address: base + u64::from(i) * 8,
            value,
            origin_group: id,
            original_index: i,
        })
        .collect();
    Group::memory(id, format!("(gdb) x /{}g {:#x}", values.len(), base), Some(base), cells)
}

fn register_group(regs: &[(&str, u64)]) -> Group {
    let cells = regs
        .iter()
        .zip(0u32..)
        .map(|(&(name, value), original_index)| RegisterCell {
            name: name.to_string(),
            value,
            original_index,
        })
        .collect();
    Group::registers("(gdb) i r", cells)
}

fn resolve(groups: &[Group]) -> Vec<Edge> {
    let global = GlobalIndex::build(groups);
    let pages = PageIndex::build(groups);
    Resolver::new(&global, &pages).resolve(groups)
}

#[test]
fn test_self_pointer_on_anchor() {
    let groups = [memory_group(1, 0x2000, &[0x2000, 0, 0, 0])];
    let edges = resolve(&groups);

    assert_eq!(edges.len(), 1);
    assert_eq!(edges[0].kind, EdgeKind::DirectPointer);
    assert_eq!(edges[0].from, CellRef::new(GroupId::Memory(1), 0));
    assert_eq!(edges[0].to, EdgeTarget::Cell(CellRef::new(GroupId::Memory(1), 0)));
}

#[test]
fn test_pointer_into_later_group() {
    let groups = [
        memory_group(1, 0x1000, &[0x3008]),
        memory_group(2, 0x3000, &[0x7, 0x8]),
    ];
    let edges = resolve(&groups);

    assert_eq!(edges.len(), 1);
    assert_eq!(edges[0].to, EdgeTarget::Cell(CellRef::new(GroupId::Memory(2), 1)));
}

#[test]
fn test_null_never_resolves() {
    // 0x0 is an address in this dump, but null is never a pointer
    let groups = [memory_group(1, 0x0, &[0x0, 0x0])];
    assert!(resolve(&groups).is_empty());
}

#[test]
fn test_page_table_walk() {
    let groups = [
        memory_group(1, 0x83a5b000, &[0x20e97801]),
        memory_group(2, 0x83a5e000, &[0x1]),
    ];
    let edges = resolve(&groups);

    let walk: Vec<&Edge> = edges
        .iter()
        .filter(|e| e.kind == EdgeKind::PageTableWalk)
        .collect();
    assert_eq!(walk.len(), 1);
    assert_eq!(walk[0].from, CellRef::new(GroupId::Memory(1), 0));
    assert_eq!(walk[0].to, EdgeTarget::Group(GroupId::Memory(2)));
}

#[test]
fn test_page_table_walk_requires_valid_bit() {
    let groups = [
        memory_group(1, 0x83a5b000, &[0x20e97800]),
        memory_group(2, 0x83a5e000, &[0x1]),
    ];
    assert!(resolve(&groups)
        .iter()
        .all(|e| e.kind != EdgeKind::PageTableWalk));
}

#[test]
fn test_page_table_walk_untracked_page() {
    let groups = [memory_group(1, 0x83a5b000, &[0x20e97801])];
    assert!(resolve(&groups).is_empty());
}

#[test]
fn test_direct_pointer_beats_page_walk() {
    // 0x20c01 is both an odd value mapping page 0x83 and a literal address
    let groups = [
        memory_group(1, 0x20c01, &[0x20c01]),
        memory_group(2, 0x83000, &[0x5]),
    ];
    let edges = resolve(&groups);
    assert_eq!(edges[0].kind, EdgeKind::DirectPointer);
}

#[test]
fn test_satp_register_walk() {
    let groups = [
        register_group(&[("satp", 0x8000000000083a5b)]),
        memory_group(1, 0x83a5b000, &[0x0]),
    ];
    let edges = resolve(&groups);

    assert_eq!(edges.len(), 1);
    assert_eq!(edges[0].kind, EdgeKind::RegisterWalk);
    assert_eq!(edges[0].from, CellRef::new(GroupId::Registers, 0));
    assert_eq!(edges[0].to, EdgeTarget::Group(GroupId::Memory(1)));
}

#[test]
fn test_generic_register_walk_uses_page_shift() {
    let groups = [
        register_group(&[("sp", 0x83a5b800)]),
        memory_group(1, 0x83a5b000, &[0x0]),
    ];
    let edges = resolve(&groups);
    assert_eq!(edges[0].kind, EdgeKind::RegisterWalk);
}

#[test]
fn test_register_direct_pointer() {
    let groups = [
        register_group(&[("a0", 0x83a5b008)]),
        memory_group(1, 0x83a5b000, &[0x1, 0x2]),
    ];
    let edges = resolve(&groups);
    assert_eq!(edges[0].kind, EdgeKind::DirectPointer);
    assert_eq!(edges[0].to, EdgeTarget::Cell(CellRef::new(GroupId::Memory(1), 1)));
}

#[test]
fn test_filtered_cells_are_not_targets() {
    let filter = ZeroRowFilter::new(1).unwrap();
    let groups: Vec<Group> = [
        memory_group(1, 0x1000, &[0x2008]),
        memory_group(2, 0x2000, &[0x5, 0x0]),
    ]
    .iter()
    .map(|g| filter.filter_group(g))
    .collect();

    assert!(resolve(&groups).is_empty());
}

#[test]
fn test_duplicate_address_first_seen_wins() {
    let groups = [
        memory_group(1, 0x1000, &[0x3000]),
        memory_group(2, 0x3000, &[0x1]),
        memory_group(3, 0x3000, &[0x2]),
    ];
    let global = GlobalIndex::build(&groups);
    assert_eq!(
        global.lookup_address(0x3000),
        Some(CellRef::new(GroupId::Memory(2), 0))
    );
}

#[test]
fn test_page_conflict_recorded_last_wins() {
    let groups = [
        memory_group(1, 0x83a5b000, &[0x1]),
        memory_group(2, 0x83a5b800, &[0x2]),
    ];
    let pages = PageIndex::build(&groups);

    assert_eq!(pages.get(0x83a5b), Some(GroupId::Memory(2)));
    assert_eq!(
        pages.conflicts(),
        &[PageConflict {
            page: 0x83a5b,
            previous: GroupId::Memory(1),
            current: GroupId::Memory(2),
        }]
    );
}

#[test]
fn test_register_names_indexed() {
    let groups = [register_group(&[("satp", 1), ("sp", 2)])];
    let global = GlobalIndex::build(&groups);
    assert_eq!(
        global.get(&CellKey::Register("sp".to_string())),
        Some(CellRef::new(GroupId::Registers, 1))
    );
    assert_eq!(global.len(), 2);
}

#[test]
fn test_resolution_from_transcript() {
    let grammar = DumpGrammar::gdb().unwrap();
    let lines = [
        "(gdb) i r satp",
        "satp           0x8000000000083a5b\t-9223372036854236581",
        "(gdb) x /4g 0x83A5B000",
        "0x83a5b000:\t0x0000000000000000\t0x0000000020e97801",
        "0x83a5b010:\t0x0000000000000000\t0x0000000000000000",
        "(gdb) x /2g 0x83A5E000",
        "0x83a5e000:\t0x00000000200000cf\t0x0000000000000000",
    ];
    let groups = group_lines(&grammar, &lines);
    let edges = resolve(&groups);

    let kinds: Vec<EdgeKind> = edges.iter().map(|e| e.kind).collect();
    assert_eq!(kinds, vec![EdgeKind::RegisterWalk, EdgeKind::PageTableWalk]);
    assert_eq!(edges[1].from, CellRef::new(GroupId::Memory(1), 1));
    assert_eq!(edges[1].to, EdgeTarget::Group(GroupId::Memory(2)));
}
