//! The per-decode instruction record.
//!
//! Accumulated field-by-field over one `decode` call (see `decoder::decode`),
//! fully populated on success and otherwise discarded. Modelled as a plain
//! `Copy` struct the way the teacher's `PrefixInfo`/`ModRm`/`Sib` are: no
//! heap, no shared state, borrowed only from the static opcode tables.

use super::operand_kind::OperandKind;
use super::tables::OpcodeDescriptor;

/// Active opcode map an instruction was decoded from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpcodeMap {
    Primary,
    Map0f,
    Map0f38,
    Map0f3a,
}

impl OpcodeMap {
    /// The `map` byte reported in `DecodeError::UnknownOpcode`.
    pub const fn id(self) -> u8 {
        match self {
            OpcodeMap::Primary => 1,
            OpcodeMap::Map0f => 0x0F,
            OpcodeMap::Map0f38 => 0x38,
            OpcodeMap::Map0f3a => 0x3A,
        }
    }
}

/// Decomposed REX prefix bits. `present = false` means no REX byte was
/// effective for this instruction (either none appeared, or one appeared
/// but was invalidated by a later legacy prefix — see `PrefixInfo`).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RexBits {
    pub present: bool,
    pub raw: u8,
    pub w: bool,
    pub r: bool,
    pub x: bool,
    pub b: bool,
}

/// ModR/M fields, already REX-extended where applicable.
#[derive(Debug, Clone, Copy, Default)]
pub struct ModRmFields {
    pub raw: u8,
    pub md: u8,
    /// `reg`, pre-REX.R-extension (0..=7) — what a digit-group dispatch and
    /// `DecodeError::UnknownOpcode`'s digit mismatch check operate on.
    pub reg_raw: u8,
    /// `reg`, REX.R-extended (0..=15) — what the formatter renders.
    pub reg: u8,
    /// `rm`, pre-REX.B-extension (0..=7).
    pub rm_raw: u8,
    /// `rm`, REX.B-extended (0..=15).
    pub rm: u8,
}

/// SIB fields, already REX-extended where applicable.
#[derive(Debug, Clone, Copy, Default)]
pub struct SibFields {
    pub raw: u8,
    pub scale: u8,
    /// `index`, pre-REX.X-extension. `4` means "no index register" and is
    /// never promoted by REX.X (see spec §4.2's SIB phase note).
    pub index_raw: u8,
    pub index: u8,
    pub base_raw: u8,
    pub base: u8,
}

/// One fully decoded instruction.
#[derive(Debug, Clone, Copy)]
pub struct Instruction {
    pub has_66: bool,
    pub has_67: bool,
    pub lock: bool,
    pub rep: bool,
    pub repne: bool,
    pub segment_override: Option<u8>,

    pub rex: RexBits,

    pub map: OpcodeMap,
    pub opcode: u8,
    pub descriptor: OpcodeDescriptor,

    pub modrm: Option<ModRmFields>,
    pub sib: Option<SibFields>,

    pub disp_size: u8,
    pub disp: i64,

    pub imm_size: u8,
    pub imm: u64,

    pub op_size: u32,
    pub addr_size: u32,

    pub length: usize,
}

impl Instruction {
    /// Whether the decoded instruction addresses memory via RIP-relative
    /// addressing (`mod = 0`, no SIB, `rm & 7 = 5`, long mode).
    pub fn is_rip_relative(&self) -> bool {
        match self.modrm {
            Some(m) => self.sib.is_none() && m.md == 0 && m.rm_raw == 5,
            None => false,
        }
    }

    /// The operand slots actually used, per the descriptor's `operand_count`.
    pub fn operand_kinds(&self) -> &[OperandKind] {
        &self.descriptor.operand_kinds[..self.descriptor.operand_count as usize]
    }
}
