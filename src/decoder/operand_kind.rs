//! Operand-kind tag set used by the opcode descriptor tables.
//!
//! Spec §4.4 describes these as a closed set decoded in a single exhaustive
//! match; modelling them as a C-like enum (rather than, say, a trait object)
//! follows the teacher's own preference for plain enums over dynamic dispatch
//! (see `src/instruction_emulator.rs`'s `LegacyPrefix`).

/// One operand slot's role, as declared by an [`OpcodeDescriptor`](super::tables::OpcodeDescriptor).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OperandKind {
    /// Unused slot (descriptor declares fewer than 4 operands).
    #[default]
    None,
    /// ModR/M `reg` field, width taken from the effective operand size.
    Reg,
    /// ModR/M `r/m` field (register or memory), width from operand size.
    Rm,
    /// ModR/M `reg`, fixed 8-bit width.
    Reg8,
    /// ModR/M `reg`, fixed 16-bit width.
    Reg16,
    /// ModR/M `reg`, fixed 32-bit width.
    Reg32,
    /// ModR/M `reg`, fixed 64-bit width.
    Reg64,
    /// ModR/M `r/m`, fixed 8-bit width.
    Rm8,
    /// ModR/M `r/m`, fixed 16-bit width.
    Rm16,
    /// ModR/M `r/m`, fixed 32-bit width.
    Rm32,
    /// ModR/M `r/m`, fixed 64-bit width.
    Rm64,
    /// `reg`, operand-size-dependent width ("Z": 16/32/64).
    RegZ,
    /// `r/m`, operand-size-dependent width ("Z": 16/32/64).
    RmZ,
    /// Fixed `al` register operand.
    Al,
    /// Fixed `ax` register operand.
    Ax,
    /// Fixed `eax` register operand.
    Eax,
    /// Fixed `rax` register operand.
    Rax,
    /// Fixed `cl` register operand (shift-by-`cl` forms).
    Cl,
    /// Accumulator (register index 0) at the effective operand size —
    /// `al`/`ax`/`eax`/`rax` depending on `op_size`. Used by opcode+rd-less
    /// forms like `ADD rAX, immZ` and `TEST rAX, immZ` where the register is
    /// fixed but its width still follows the instruction's operand size.
    AccZ,
    /// 8-bit immediate.
    Imm8,
    /// 16-bit immediate.
    Imm16,
    /// 32-bit immediate.
    Imm32,
    /// True 64-bit immediate (`MOV r64, imm64` only).
    Imm64,
    /// Operand-size-dependent immediate (2 bytes under 66h, else 4; never 8).
    Immz,
    /// The one true exception to [`Immz`](Self::Immz)'s "never 8" rule:
    /// `MOV r, imm` (opcodes `0xB8`-`0xBF`) encodes a full 8-byte immediate
    /// under REX.W, and falls back to ordinary `Immz` sizing otherwise. See
    /// spec §4.3 and the "Open questions" note on `IMMZ` width under REX.W.
    ImmFull,
    /// 8-bit relative displacement (short jumps).
    Rel8,
    /// 32-bit relative displacement (near jumps/calls).
    Rel32,
}

impl OperandKind {
    /// Fixed bit width for this kind, or `None` when it depends on context
    /// (`Reg`/`Rm`/`RegZ`/`RmZ` resolve via the instruction's `op_size`).
    pub const fn fixed_width(self) -> Option<u32> {
        // Explicit import list, not `OperandKind::*`: a glob here would
        // shadow the prelude's `Option::None`, which this function returns.
        use OperandKind::{Al, Ax, Cl, Eax, Imm16, Imm32, Imm64, Imm8, Rax, Rel32, Rel8, Reg16, Reg32, Reg64, Reg8, Rm16, Rm32, Rm64, Rm8};
        match self {
            Reg8 | Rm8 | Al | Cl | Imm8 | Rel8 => Some(8),
            Reg16 | Rm16 | Ax | Imm16 => Some(16),
            Reg32 | Rm32 | Eax | Imm32 | Rel32 => Some(32),
            Reg64 | Rm64 | Rax | Imm64 => Some(64),
            _ => Option::None,
        }
    }

    /// Whether this kind denotes an immediate or relative-displacement slot
    /// (used by the operand-size resolver, spec §4.3).
    pub const fn is_immediate(self) -> bool {
        use OperandKind::*;
        matches!(self, Imm8 | Imm16 | Imm32 | Imm64 | Immz | ImmFull | Rel8 | Rel32)
    }
}
