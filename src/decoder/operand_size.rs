//! Operand-size resolver (spec §4.3): immediate width from the descriptor,
//! REX.W, and the `66` prefix.

use super::operand_kind::OperandKind;
use super::tables::OpcodeDescriptor;

/// Computes the immediate width, in bytes, for one descriptor under the
/// given prefix state. Returns 0 when the instruction carries no immediate.
pub fn immediate_width(descriptor: &OpcodeDescriptor, has_66: bool, rex_w: bool) -> u8 {
    if descriptor.fixed_imm_size != 0 {
        return descriptor.fixed_imm_size;
    }

    for kind in &descriptor.operand_kinds[..descriptor.operand_count as usize] {
        match kind {
            OperandKind::Imm8 | OperandKind::Rel8 => return 1,
            OperandKind::Imm16 => return 2,
            OperandKind::Imm32 | OperandKind::Rel32 => return 4,
            OperandKind::Imm64 => return 8,
            OperandKind::ImmFull => {
                return if rex_w {
                    8
                } else if has_66 {
                    2
                } else {
                    4
                };
            }
            OperandKind::Immz => {
                // Never 8: Iz sign-extends from 32 bits even under REX.W.
                // See spec §9's "Open questions" note on IMMZ width.
                return if has_66 && !rex_w { 2 } else { 4 };
            }
            _ => {}
        }
    }

    0
}

/// Resolves the effective operand size (spec §3: 64 if REX.W, else 16 if
/// `has_66`, else 32) used for register/memory operand widths — distinct
/// from immediate width, which `immediate_width` computes separately.
pub fn effective_operand_size(has_66: bool, rex_w: bool) -> u32 {
    if rex_w {
        64
    } else if has_66 {
        16
    } else {
        32
    }
}

/// Resolves the effective address size (spec §3: 32 if `has_67`, else 64).
pub fn effective_address_size(has_67: bool) -> u32 {
    if has_67 {
        32
    } else {
        64
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decoder::tables::ModrmKind;

    fn descriptor_with(kinds: [OperandKind; 4], count: u8, fixed: u8) -> OpcodeDescriptor {
        OpcodeDescriptor {
            known: true,
            modrm_kind: ModrmKind::None,
            group_digit: 0,
            mnemonic: "test",
            operand_count: count,
            operand_kinds: kinds,
            fixed_imm_size: fixed,
            digit_group: None,
        }
    }

    #[test]
    fn immz_is_four_bytes_under_rex_w() {
        let d = descriptor_with([OperandKind::Rm, OperandKind::Immz, OperandKind::None, OperandKind::None], 2, 0);
        assert_eq!(immediate_width(&d, false, true), 4);
    }

    #[test]
    fn immz_is_two_bytes_under_66_without_rex_w() {
        let d = descriptor_with([OperandKind::Rm, OperandKind::Immz, OperandKind::None, OperandKind::None], 2, 0);
        assert_eq!(immediate_width(&d, true, false), 2);
    }

    #[test]
    fn immfull_is_eight_bytes_only_under_rex_w() {
        let d = descriptor_with([OperandKind::RegZ, OperandKind::ImmFull, OperandKind::None, OperandKind::None], 2, 0);
        assert_eq!(immediate_width(&d, false, true), 8);
        assert_eq!(immediate_width(&d, false, false), 4);
        assert_eq!(immediate_width(&d, true, false), 2);
    }

    #[test]
    fn fixed_imm_size_overrides_operand_kind_scan() {
        let d = descriptor_with([OperandKind::Al, OperandKind::Imm8, OperandKind::None, OperandKind::None], 2, 1);
        assert_eq!(immediate_width(&d, true, true), 1);
    }

    #[test]
    fn no_immediate_kind_yields_zero() {
        let d = descriptor_with([OperandKind::Reg, OperandKind::Rm, OperandKind::None, OperandKind::None], 2, 0);
        assert_eq!(immediate_width(&d, false, false), 0);
    }

    #[test]
    fn effective_sizes_follow_rex_w_then_66_then_default() {
        assert_eq!(effective_operand_size(false, true), 64);
        assert_eq!(effective_operand_size(true, false), 16);
        assert_eq!(effective_operand_size(false, false), 32);
        assert_eq!(effective_address_size(true), 32);
        assert_eq!(effective_address_size(false), 64);
    }
}
