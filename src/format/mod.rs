//! Formatter (spec §4.5): turns a decoded [`Instruction`] plus the starting
//! address of that instruction into one text line.
//!
//! Grounded on the original `disas.c`'s `format_mem`/`print_operand_generic`/
//! `print_simple` trio — same memory-operand cases (RIP-relative, SIB with
//! base+index, SIB with base only, SIB with index only, pure displacement,
//! plain `[reg]`), reworked into safe Rust string building instead of
//! `snprintf` into a fixed buffer.

pub mod registers;

use crate::decoder::instruction::Instruction;
use crate::decoder::operand_kind::OperandKind;

/// Produces one line: `ADDRESS: BYTES   MNEMONIC op1, op2`.
///
/// `raw` must be exactly the `insn.length` bytes the decoder consumed;
/// `address` is this instruction's own virtual address (the caller adds the
/// running offset within the symbol being disassembled).
pub fn format_instruction(insn: &Instruction, raw: &[u8], address: u64) -> String {
    let mut out = format!("{:016x}: ", address);

    for b in raw.iter().take(8) {
        out.push_str(&format!("{:02X} ", b));
    }
    for _ in raw.len().min(8)..8 {
        out.push_str("   ");
    }

    if insn.descriptor.mnemonic.is_empty() {
        out.push_str(&format!("db 0x{:02x}", insn.opcode));
        return out;
    }

    out.push_str(insn.descriptor.mnemonic);

    let kinds = insn.operand_kinds();
    if !kinds.is_empty() {
        out.push(' ');
        for (i, kind) in kinds.iter().enumerate() {
            if i > 0 {
                out.push_str(", ");
            }
            out.push_str(&format_operand(insn, *kind, address));
        }
    }

    out
}

fn format_operand(insn: &Instruction, kind: OperandKind, address: u64) -> String {
    // Explicit list rather than `OperandKind::*`: a glob here would shadow
    // the prelude's `Option::None`, which this function also matches on.
    use OperandKind::{
        AccZ, Al, Ax, Cl, Eax, Imm16, Imm32, Imm64, Imm8, ImmFull, Immz, Rax, Reg, Reg16, Reg32, Reg64, Reg8,
        RegZ, Rel32, Rel8, Rm, Rm16, Rm32, Rm64, Rm8, RmZ,
    };

    match kind {
        Reg | Reg8 | Reg16 | Reg32 | Reg64 | RegZ => {
            let width = kind.fixed_width().unwrap_or(insn.op_size);
            let regid = match insn.modrm {
                Some(m) => m.reg,
                // opcode+rd form: register index is the opcode's low 3 bits.
                None => (insn.opcode & 0x07) | ((insn.rex.b as u8) << 3),
            };
            registers::reg_name(regid, width, insn.rex.present).to_string()
        }
        Rm | Rm8 | Rm16 | Rm32 | Rm64 | RmZ => {
            let width = kind.fixed_width().unwrap_or(insn.op_size);
            match insn.modrm {
                Some(m) if m.md == 3 => registers::reg_name(m.rm, width, insn.rex.present).to_string(),
                _ => format_memory_operand(insn),
            }
        }
        Al => "al".to_string(),
        Ax => "ax".to_string(),
        Eax => "eax".to_string(),
        Rax => "rax".to_string(),
        Cl => "cl".to_string(),
        AccZ => registers::reg_name(0, insn.op_size, insn.rex.present).to_string(),
        Imm8 | Imm16 | Imm32 | Imm64 | Immz | ImmFull => {
            let width = insn.imm_size.max(1) as usize;
            let mask = if width >= 8 { u64::MAX } else { (1u64 << (width * 8)) - 1 };
            format!("0x{:0width$x}", insn.imm & mask, width = width * 2)
        }
        Rel8 | Rel32 => {
            let rel = sign_extend_to_i64(insn.imm, insn.imm_size);
            let next_rip = address.wrapping_add(insn.length as u64);
            let target = next_rip.wrapping_add(rel as u64);
            format!("0x{:x}", target)
        }
        OperandKind::None => "<?>".to_string(),
    }
}

fn sign_extend_to_i64(raw: u64, size: u8) -> i64 {
    match size {
        1 => raw as u8 as i8 as i64,
        2 => raw as u16 as i16 as i64,
        4 => raw as u32 as i32 as i64,
        _ => raw as i64,
    }
}

fn format_disp(disp_size: u8, disp: i64) -> String {
    if disp_size == 0 || disp == 0 {
        return String::new();
    }
    if disp < 0 {
        format!("-0x{:x}", -disp)
    } else {
        format!("+0x{:x}", disp)
    }
}

fn format_memory_operand(insn: &Instruction) -> String {
    let aw = insn.addr_size;

    if insn.is_rip_relative() {
        return match insn.disp_size {
            0 => "[rip]".to_string(),
            _ => format!("[rip{}]", format_disp(insn.disp_size, insn.disp)),
        };
    }

    if let Some(sib) = insn.sib {
        let modrm = insn.modrm.expect("SIB implies ModR/M was present");
        let have_base = !(modrm.md == 0 && sib.base_raw == 5);
        let have_index = sib.index_raw != 4;
        let scale = 1u32 << sib.scale;
        let disp = format_disp(insn.disp_size, insn.disp);

        return match (have_base, have_index) {
            (true, true) => {
                let base_s = registers::reg_name(sib.base, aw, insn.rex.present);
                let index_s = registers::reg_name(sib.index, aw, insn.rex.present);
                format!("[{}+{}*{}{}]", base_s, index_s, scale, disp)
            }
            (true, false) => {
                let base_s = registers::reg_name(sib.base, aw, insn.rex.present);
                format!("[{}{}]", base_s, disp)
            }
            (false, true) => {
                let index_s = registers::reg_name(sib.index, aw, insn.rex.present);
                format!("[{}*{}{}]", index_s, scale, disp)
            }
            // have_base=false only arises from modrm.md==0 && sib.base_raw==5,
            // and the decoder always sets disp_size=4 in exactly that state,
            // so this is always a disp32 absolute address — mask back to
            // 32 bits since insn.disp carries it sign-extended to i64.
            (false, false) => format!("[0x{:x}]", insn.disp as u32),
        };
    }

    let modrm = insn.modrm.expect("memory operand implies ModR/M was present");
    let base_s = registers::reg_name(modrm.rm, aw, insn.rex.present);
    format!("[{}{}]", base_s, format_disp(insn.disp_size, insn.disp))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decoder::decode;

    #[test]
    fn ret_formats_with_no_operands() {
        let bytes = [0xC3];
        let insn = decode(&bytes, 15).unwrap();
        let line = format_instruction(&insn, &bytes, 0x1000);
        assert!(line.contains("ret"));
        assert!(line.starts_with("0000000000001000:"));
    }

    #[test]
    fn mov_rbp_rsp_renders_both_registers() {
        let bytes = [0x48, 0x89, 0xE5];
        let insn = decode(&bytes, 15).unwrap();
        let line = format_instruction(&insn, &bytes, 0);
        assert!(line.contains("mov rbp, rsp"));
    }

    #[test]
    fn rip_relative_operand_resolves_to_an_absolute_target() {
        let bytes = [0x48, 0x8B, 0x05, 0x11, 0x22, 0x33, 0x44];
        let insn = decode(&bytes, 15).unwrap();
        let line = format_instruction(&insn, &bytes, 0x1000);
        // next RIP (0x1007) + 0x44332211
        assert!(line.contains("mov rax, [rip+0x44332211]"));
    }

    #[test]
    fn sib_with_no_index_renders_base_plus_disp() {
        let bytes = [0x48, 0x89, 0x44, 0x24, 0x08];
        let insn = decode(&bytes, 15).unwrap();
        let line = format_instruction(&insn, &bytes, 0);
        assert!(line.contains("mov [rsp+0x8], rax"));
    }

    #[test]
    fn sib_with_no_base_and_no_index_renders_a_hex_absolute_address() {
        let bytes = [0x8B, 0x04, 0x25, 0x11, 0x22, 0x33, 0x44];
        let insn = decode(&bytes, 15).unwrap();
        let line = format_instruction(&insn, &bytes, 0);
        assert!(line.contains("mov eax, [0x44332211]"));
    }

    #[test]
    fn sib_absolute_address_with_high_bit_set_does_not_sign_extend() {
        let bytes = [0x8B, 0x04, 0x25, 0x00, 0x00, 0x00, 0x80];
        let insn = decode(&bytes, 15).unwrap();
        let line = format_instruction(&insn, &bytes, 0);
        assert!(line.contains("mov eax, [0x80000000]"));
    }

    #[test]
    fn push_reg64_uses_64_bit_name_despite_32_bit_op_size() {
        let bytes = [0x55];
        let insn = decode(&bytes, 15).unwrap();
        let line = format_instruction(&insn, &bytes, 0);
        assert!(line.contains("push rbp"));
    }

    #[test]
    fn immediate_renders_as_width_padded_hex() {
        let bytes = [0x41, 0xB8, 0x2A, 0x00, 0x00, 0x00];
        let insn = decode(&bytes, 15).unwrap();
        let line = format_instruction(&insn, &bytes, 0);
        assert!(line.contains("mov r8d, 0x0000002a"));
    }

    #[test]
    fn bytes_column_is_space_separated_hex() {
        let bytes = [0xC3];
        let insn = decode(&bytes, 15).unwrap();
        let line = format_instruction(&insn, &bytes, 0);
        assert!(line.contains("C3"));
    }
}
