//! Register name tables (spec §4.5): width- and REX-aware lookups.
//!
//! Mirrors the teacher's `GeneralRegisters::REGISTER_NAMES` /
//! `register_name` pair (`src/regs/diff.rs`-adjacent style) — plain static
//! arrays plus a small lookup function, generalized from one fixed 64-bit
//! table to the four width-specific tables x86-64 actually has.

const REG8_NO_REX: [&str; 16] = [
    "al", "cl", "dl", "bl", "ah", "ch", "dh", "bh", "r8b", "r9b", "r10b", "r11b", "r12b", "r13b", "r14b", "r15b",
];
const REG8_REX: [&str; 16] = [
    "al", "cl", "dl", "bl", "spl", "bpl", "sil", "dil", "r8b", "r9b", "r10b", "r11b", "r12b", "r13b", "r14b", "r15b",
];
const REG16: [&str; 16] = [
    "ax", "cx", "dx", "bx", "sp", "bp", "si", "di", "r8w", "r9w", "r10w", "r11w", "r12w", "r13w", "r14w", "r15w",
];
const REG32: [&str; 16] = [
    "eax", "ecx", "edx", "ebx", "esp", "ebp", "esi", "edi", "r8d", "r9d", "r10d", "r11d", "r12d", "r13d", "r14d",
    "r15d",
];
const REG64: [&str; 16] = [
    "rax", "rcx", "rdx", "rbx", "rsp", "rbp", "rsi", "rdi", "r8", "r9", "r10", "r11", "r12", "r13", "r14", "r15",
];

/// Name of register `index` (already REX-extended, 0..=15) at the given
/// `width` (8/16/32/64). `rex_present` selects between the two 8-bit tables:
/// with any REX byte present, indices 4-7 are `spl bpl sil dil`; without
/// one, they're the architectural `ah ch dh bh`.
pub fn reg_name(index: u8, width: u32, rex_present: bool) -> &'static str {
    let i = (index & 0x0F) as usize;
    match width {
        8 => {
            if rex_present {
                REG8_REX[i]
            } else {
                REG8_NO_REX[i]
            }
        }
        16 => REG16[i],
        32 => REG32[i],
        64 => REG64[i],
        _ => "??",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn width_64_covers_all_sixteen_registers() {
        assert_eq!(reg_name(0, 64, false), "rax");
        assert_eq!(reg_name(4, 64, false), "rsp");
        assert_eq!(reg_name(8, 64, false), "r8");
        assert_eq!(reg_name(15, 64, false), "r15");
    }

    #[test]
    fn width_8_switches_on_rex_presence() {
        assert_eq!(reg_name(4, 8, false), "ah");
        assert_eq!(reg_name(4, 8, true), "spl");
        assert_eq!(reg_name(7, 8, false), "bh");
        assert_eq!(reg_name(7, 8, true), "dil");
    }

    #[test]
    fn low_eight_registers_are_rex_independent_at_byte_width() {
        for i in 0..4 {
            assert_eq!(reg_name(i, 8, false), reg_name(i, 8, true));
        }
    }

    #[test]
    fn unknown_width_is_reported_rather_than_panicking() {
        assert_eq!(reg_name(0, 1, false), "??");
    }

    #[test]
    fn extended_registers_use_the_same_name_at_every_width_family() {
        assert_eq!(reg_name(9, 16, false), "r9w");
        assert_eq!(reg_name(9, 32, false), "r9d");
        assert_eq!(reg_name(9, 64, false), "r9");
    }
}
