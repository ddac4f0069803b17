//! Page-number extraction for RISC-V Sv39/Sv48 style dumps

/// Right shift from a byte address to its physical page number
pub const PAGE_SHIFT: u32 = 12;

/// Right shift from a page-table entry to the page number it maps
pub const PTE_PPN_SHIFT: u32 = 10;

/// Valid bit of a page-table entry
pub const PTE_VALID: u64 = 0x1;

/// Root page number field of `satp` (low 44 bits; MODE and ASID live above)
pub const SATP_PPN_MASK: u64 = 0xFFF_FFFF_FFFF;

/// Name of the address-space root register
pub const SATP_REGISTER_NAME: &str = "satp";

/// Physical page containing a byte address
pub fn address_page_number(address: u64) -> u64 {
    address >> PAGE_SHIFT
}

/// Page number mapped by a page-table entry
///
/// Returns `None` for null entries and for entries whose valid bit is clear.
pub fn pte_page_number(value: u64) -> Option<u64> {
    if value == 0 || value & PTE_VALID == 0 {
        return None;
    }
    Some(value >> PTE_PPN_SHIFT)
}

/// Whether a register holds the address-space root (matched case-insensitively)
pub fn is_address_space_root(name: &str) -> bool {
    name.eq_ignore_ascii_case(SATP_REGISTER_NAME)
}

/// Page number referenced by a register value
///
/// `satp` is masked to its PPN field; any other register is treated as a
/// plain byte address.
pub fn register_page_number(name: &str, value: u64) -> Option<u64> {
    if value == 0 {
        return None;
    }
    if is_address_space_root(name) {
        Some(value & SATP_PPN_MASK)
    } else {
        Some(address_page_number(value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_address_page_number() {
        assert_eq!(address_page_number(0x83a5b000), 0x83a5b);
        assert_eq!(address_page_number(0x83a5bfff), 0x83a5b);
        assert_eq!(address_page_number(0xfff), 0);
    }

    #[test]
    fn test_pte_page_number_valid_entry() {
        assert_eq!(pte_page_number(0x20e97801), Some(0x83a5e));
    }

    #[test]
    fn test_pte_page_number_requires_valid_bit() {
        assert_eq!(pte_page_number(0x20e97800), None);
        assert_eq!(pte_page_number(0), None);
    }

    #[test]
    fn test_pte_page_number_uses_full_width() {
        // No sign extension: the top bit shifts down like any other
        assert_eq!(pte_page_number(u64::MAX), Some(u64::MAX >> 10));
    }

    #[test]
    fn test_satp_mask_ignores_mode_and_asid() {
        assert_eq!(
            register_page_number("satp", 0x8000000000083a5b),
            Some(0x83a5b)
        );
        assert_eq!(
            register_page_number("SATP", 0x8000_ffff_0008_3a5b),
            Some(0xfff_0008_3a5b & SATP_PPN_MASK)
        );
    }

    #[test]
    fn test_other_registers_shift_by_page() {
        assert_eq!(register_page_number("sp", 0x80205000), Some(0x80205));
        assert_eq!(register_page_number("pc", 0), None);
    }
}
