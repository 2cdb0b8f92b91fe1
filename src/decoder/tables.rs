//! Opcode descriptor tables: the four 256-entry maps keyed by opcode byte.
//!
//! Pure data, as close to the C original's designated-initializer tables
//! (`opcodes.h`) as a typed Rust array can get. `OpcodeDescriptor` literally
//! mirrors the `opcode_info` fields from that header, generalized with a
//! `digit_group` sub-table so a single primary-map byte (e.g. `0x80`, the
//! ALU-immediate group) can resolve to one of eight distinct mnemonics once
//! ModR/M's `reg` field is known, instead of only validating a single fixed
//! digit. See DESIGN.md for why: `opcodes.h`'s one-`group_digit`-per-entry
//! model can't express a real multi-mnemonic group.
//!
//! Tables are built once per process and cached behind a `OnceLock`, the
//! same "generate from a declarative source list" approach the design notes
//! call for in a language without const designated initializers.

use std::sync::OnceLock;

use super::operand_kind::OperandKind;

/// Whether a ModR/M byte follows an opcode, and what its `reg` field means.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ModrmKind {
    /// No ModR/M byte.
    #[default]
    None,
    /// ModR/M present, `reg` names an ordinary register operand.
    Reg,
    /// ModR/M present, `reg` is an opcode-extension digit (0-7). The actual
    /// mnemonic/operands for the matched digit live in `digit_group`.
    DigitGroup,
}

/// One opcode byte's entry in a map.
///
/// Mirrors the C original's `opcode_info` (`modrm_kind`, `group_digit`,
/// mnemonic, operand count/kinds) plus `known` and `digit_group`, both
/// additions this crate needs: `known` lets an entry be explicitly marked
/// decodable-with-no-operands rather than silently treated as one (spec
/// forbids mnemonic-less ModR/M entries — every slot is either `known` with
/// real operands, or unknown and rejected), and `digit_group` generalizes
/// `group_digit` from "the one digit this opcode accepts" to "the eight
/// descriptors this opcode dispatches across".
#[derive(Debug, Clone, Copy)]
pub struct OpcodeDescriptor {
    /// Whether the decoder may treat this byte as a real instruction. An
    /// entry with `known = false` always fails with `UnknownOpcode`,
    /// regardless of what its other fields happen to contain.
    pub known: bool,
    pub modrm_kind: ModrmKind,
    /// Required `reg` digit for single-digit groups. Informational only
    /// when `digit_group` is `Some`: the decoder dispatches through the
    /// sub-table in that case rather than comparing against this field.
    pub group_digit: u8,
    pub mnemonic: &'static str,
    pub operand_count: u8,
    pub operand_kinds: [OperandKind; 4],
    /// Non-zero overrides the operand-size resolver's computed width.
    pub fixed_imm_size: u8,
    /// Present for `modrm_kind = DigitGroup`: one descriptor per possible
    /// `reg` value (0-7), selected by the ModR/M byte's pre-extension `reg`.
    pub digit_group: Option<&'static [OpcodeDescriptor; 8]>,
}

impl OpcodeDescriptor {
    const fn unknown() -> Self {
        Self {
            known: false,
            modrm_kind: ModrmKind::None,
            group_digit: 0,
            mnemonic: "",
            operand_count: 0,
            operand_kinds: [OperandKind::None; 4],
            fixed_imm_size: 0,
            digit_group: None,
        }
    }
}

impl Default for OpcodeDescriptor {
    fn default() -> Self {
        Self::unknown()
    }
}

// Explicit import list rather than `OperandKind::*`: a glob would pull in
// `OperandKind::None`, which is ambiguous with `Option::None` from the
// prelude at every use site.
use OperandKind::{
    AccZ, Al, Cl, Imm16, Imm8, ImmFull, Immz, Reg, Reg64, Reg8, RegZ, Rel32, Rel8, Rm, Rm16, Rm64, Rm8,
};

const NONE4: [OperandKind; 4] = [OperandKind::None, OperandKind::None, OperandKind::None, OperandKind::None];

fn one(a: OperandKind) -> [OperandKind; 4] {
    [a, OperandKind::None, OperandKind::None, OperandKind::None]
}
fn two(a: OperandKind, b: OperandKind) -> [OperandKind; 4] {
    [a, b, OperandKind::None, OperandKind::None]
}
fn three(a: OperandKind, b: OperandKind, c: OperandKind) -> [OperandKind; 4] {
    [a, b, c, OperandKind::None]
}

/// A plain known opcode: no digit-group dispatch.
fn k(mnemonic: &'static str, modrm: ModrmKind, count: u8, kinds: [OperandKind; 4], imm: u8) -> OpcodeDescriptor {
    OpcodeDescriptor {
        known: true,
        modrm_kind: modrm,
        group_digit: 0,
        mnemonic,
        operand_count: count,
        operand_kinds: kinds,
        fixed_imm_size: imm,
        digit_group: None,
    }
}

/// A top-level digit-group dispatcher: the real mnemonics live in `table`.
fn group(table: &'static [OpcodeDescriptor; 8]) -> OpcodeDescriptor {
    OpcodeDescriptor {
        known: true,
        modrm_kind: ModrmKind::DigitGroup,
        group_digit: 0,
        mnemonic: "",
        operand_count: 0,
        operand_kinds: NONE4,
        fixed_imm_size: 0,
        digit_group: Some(table),
    }
}

const JCC_SUFFIX_MNEMONICS_J: [&str; 16] = [
    "jo", "jno", "jb", "jae", "je", "jne", "jbe", "ja", "js", "jns", "jp", "jnp", "jl", "jge", "jle", "jg",
];
const CMOVCC_MNEMONICS: [&str; 16] = [
    "cmovo", "cmovno", "cmovb", "cmovae", "cmove", "cmovne", "cmovbe", "cmova", "cmovs", "cmovns", "cmovp",
    "cmovnp", "cmovl", "cmovge", "cmovle", "cmovg",
];
const SETCC_MNEMONICS: [&str; 16] = [
    "seto", "setno", "setb", "setae", "sete", "setne", "setbe", "seta", "sets", "setns", "setp", "setnp",
    "setl", "setge", "setle", "setg",
];

/// `ADD/OR/ADC/SBB/AND/SUB/XOR/CMP` share the same 6-form layout at a `+0`
/// base opcode; `+6`/`+7` (segment push/pop) and overlapping prefix bytes
/// are left unknown since they're either invalid in long mode or consumed
/// during the prefix phase before the opcode map is ever indexed.
const ALU_GROUPS: [(u8, &str); 8] = [
    (0x00, "add"),
    (0x08, "or"),
    (0x10, "adc"),
    (0x18, "sbb"),
    (0x20, "and"),
    (0x28, "sub"),
    (0x30, "xor"),
    (0x38, "cmp"),
];

fn group1_table(b_mem: OperandKind, b_imm: OperandKind, imm_size: u8) -> [OpcodeDescriptor; 8] {
    let mnemonics = ["add", "or", "adc", "sbb", "and", "sub", "xor", "cmp"];
    let mut table = [OpcodeDescriptor::unknown(); 8];
    for (i, m) in mnemonics.into_iter().enumerate() {
        table[i] = k(m, ModrmKind::None, 2, two(b_mem, b_imm), imm_size);
    }
    table
}

fn group2_table(rm: OperandKind, count_operand: Option<OperandKind>, imm_size: u8) -> [OpcodeDescriptor; 8] {
    let mnemonics = ["rol", "ror", "rcl", "rcr", "shl", "shr", "shl", "sar"];
    let mut table = [OpcodeDescriptor::unknown(); 8];
    for (i, m) in mnemonics.into_iter().enumerate() {
        let kinds = match count_operand {
            Some(c) => two(rm, c),
            None => one(rm),
        };
        let count = if count_operand.is_some() { 2 } else { 1 };
        table[i] = k(m, ModrmKind::None, count, kinds, imm_size);
    }
    table
}

fn group3_table(rm: OperandKind, imm: OperandKind, imm_size: u8) -> [OpcodeDescriptor; 8] {
    let mut table = [OpcodeDescriptor::unknown(); 8];
    table[0] = k("test", ModrmKind::None, 2, two(rm, imm), imm_size);
    table[1] = k("test", ModrmKind::None, 2, two(rm, imm), imm_size);
    table[2] = k("not", ModrmKind::None, 1, one(rm), 0);
    table[3] = k("neg", ModrmKind::None, 1, one(rm), 0);
    table[4] = k("mul", ModrmKind::None, 1, one(rm), 0);
    table[5] = k("imul", ModrmKind::None, 1, one(rm), 0);
    table[6] = k("div", ModrmKind::None, 1, one(rm), 0);
    table[7] = k("idiv", ModrmKind::None, 1, one(rm), 0);
    table
}

static GROUP1_EB_IB: OnceLock<[OpcodeDescriptor; 8]> = OnceLock::new();
static GROUP1_EV_IZ: OnceLock<[OpcodeDescriptor; 8]> = OnceLock::new();
static GROUP1_EV_IB: OnceLock<[OpcodeDescriptor; 8]> = OnceLock::new();
static GROUP2_EB_IB: OnceLock<[OpcodeDescriptor; 8]> = OnceLock::new();
static GROUP2_EV_IB: OnceLock<[OpcodeDescriptor; 8]> = OnceLock::new();
static GROUP2_EB_1: OnceLock<[OpcodeDescriptor; 8]> = OnceLock::new();
static GROUP2_EV_1: OnceLock<[OpcodeDescriptor; 8]> = OnceLock::new();
static GROUP2_EB_CL: OnceLock<[OpcodeDescriptor; 8]> = OnceLock::new();
static GROUP2_EV_CL: OnceLock<[OpcodeDescriptor; 8]> = OnceLock::new();
static GROUP3_EB: OnceLock<[OpcodeDescriptor; 8]> = OnceLock::new();
static GROUP3_EV: OnceLock<[OpcodeDescriptor; 8]> = OnceLock::new();
static GROUP4_EB: OnceLock<[OpcodeDescriptor; 8]> = OnceLock::new();
static GROUP5_EV: OnceLock<[OpcodeDescriptor; 8]> = OnceLock::new();
static GROUP1A_EV: OnceLock<[OpcodeDescriptor; 8]> = OnceLock::new();
static GROUP11_EB_IB: OnceLock<[OpcodeDescriptor; 8]> = OnceLock::new();
static GROUP11_EV_IZ: OnceLock<[OpcodeDescriptor; 8]> = OnceLock::new();
static GROUP8_EV_IB: OnceLock<[OpcodeDescriptor; 8]> = OnceLock::new();
static GROUP_NOP: OnceLock<[OpcodeDescriptor; 8]> = OnceLock::new();

fn group1_eb_ib() -> &'static [OpcodeDescriptor; 8] {
    GROUP1_EB_IB.get_or_init(|| group1_table(Rm8, Imm8, 1))
}
fn group1_ev_iz() -> &'static [OpcodeDescriptor; 8] {
    GROUP1_EV_IZ.get_or_init(|| group1_table(Rm, Immz, 0))
}
fn group1_ev_ib() -> &'static [OpcodeDescriptor; 8] {
    GROUP1_EV_IB.get_or_init(|| group1_table(Rm, Imm8, 1))
}
fn group2_eb_ib() -> &'static [OpcodeDescriptor; 8] {
    GROUP2_EB_IB.get_or_init(|| group2_table(Rm8, Some(Imm8), 1))
}
fn group2_ev_ib() -> &'static [OpcodeDescriptor; 8] {
    GROUP2_EV_IB.get_or_init(|| group2_table(Rm, Some(Imm8), 1))
}
fn group2_eb_1() -> &'static [OpcodeDescriptor; 8] {
    GROUP2_EB_1.get_or_init(|| group2_table(Rm8, None, 0))
}
fn group2_ev_1() -> &'static [OpcodeDescriptor; 8] {
    GROUP2_EV_1.get_or_init(|| group2_table(Rm, None, 0))
}
fn group2_eb_cl() -> &'static [OpcodeDescriptor; 8] {
    GROUP2_EB_CL.get_or_init(|| group2_table(Rm8, Some(Cl), 0))
}
fn group2_ev_cl() -> &'static [OpcodeDescriptor; 8] {
    GROUP2_EV_CL.get_or_init(|| group2_table(Rm, Some(Cl), 0))
}
fn group3_eb() -> &'static [OpcodeDescriptor; 8] {
    GROUP3_EB.get_or_init(|| group3_table(Rm8, Imm8, 1))
}
fn group3_ev() -> &'static [OpcodeDescriptor; 8] {
    GROUP3_EV.get_or_init(|| group3_table(Rm, Immz, 0))
}
fn group4_eb() -> &'static [OpcodeDescriptor; 8] {
    GROUP4_EB.get_or_init(|| {
        let mut t = [OpcodeDescriptor::unknown(); 8];
        t[0] = k("inc", ModrmKind::None, 1, one(Rm8), 0);
        t[1] = k("dec", ModrmKind::None, 1, one(Rm8), 0);
        t
    })
}
fn group5_ev() -> &'static [OpcodeDescriptor; 8] {
    GROUP5_EV.get_or_init(|| {
        let mut t = [OpcodeDescriptor::unknown(); 8];
        t[0] = k("inc", ModrmKind::None, 1, one(Rm), 0);
        t[1] = k("dec", ModrmKind::None, 1, one(Rm), 0);
        t[2] = k("call", ModrmKind::None, 1, one(Rm64), 0);
        t[4] = k("jmp", ModrmKind::None, 1, one(Rm64), 0);
        t[6] = k("push", ModrmKind::None, 1, one(Rm64), 0);
        t
    })
}
fn group1a_ev() -> &'static [OpcodeDescriptor; 8] {
    GROUP1A_EV.get_or_init(|| {
        let mut t = [OpcodeDescriptor::unknown(); 8];
        t[0] = k("pop", ModrmKind::None, 1, one(Rm64), 0);
        t
    })
}
fn group11_eb_ib() -> &'static [OpcodeDescriptor; 8] {
    GROUP11_EB_IB.get_or_init(|| {
        let mut t = [OpcodeDescriptor::unknown(); 8];
        t[0] = k("mov", ModrmKind::None, 2, two(Rm8, Imm8), 1);
        t
    })
}
fn group11_ev_iz() -> &'static [OpcodeDescriptor; 8] {
    GROUP11_EV_IZ.get_or_init(|| {
        let mut t = [OpcodeDescriptor::unknown(); 8];
        t[0] = k("mov", ModrmKind::None, 2, two(Rm, Immz), 0);
        t
    })
}
fn group8_ev_ib() -> &'static [OpcodeDescriptor; 8] {
    GROUP8_EV_IB.get_or_init(|| {
        let mut t = [OpcodeDescriptor::unknown(); 8];
        t[4] = k("bt", ModrmKind::None, 2, two(Rm, Imm8), 1);
        t[5] = k("bts", ModrmKind::None, 2, two(Rm, Imm8), 1);
        t[6] = k("btr", ModrmKind::None, 2, two(Rm, Imm8), 1);
        t[7] = k("btc", ModrmKind::None, 2, two(Rm, Imm8), 1);
        t
    })
}
fn group_nop() -> &'static [OpcodeDescriptor; 8] {
    GROUP_NOP.get_or_init(|| {
        let mut t = [OpcodeDescriptor::unknown(); 8];
        t[0] = k("nop", ModrmKind::None, 1, one(Rm), 0);
        t
    })
}

fn build_primary_table() -> [OpcodeDescriptor; 256] {
    let mut t = [OpcodeDescriptor::unknown(); 256];

    for (base, name) in ALU_GROUPS {
        t[(base) as usize] = k(name, ModrmKind::Reg, 2, two(Rm8, Reg8), 0);
        t[(base + 1) as usize] = k(name, ModrmKind::Reg, 2, two(Rm, Reg), 0);
        t[(base + 2) as usize] = k(name, ModrmKind::Reg, 2, two(Reg8, Rm8), 0);
        t[(base + 3) as usize] = k(name, ModrmKind::Reg, 2, two(Reg, Rm), 0);
        t[(base + 4) as usize] = k(name, ModrmKind::None, 2, two(Al, Imm8), 1);
        t[(base + 5) as usize] = k(name, ModrmKind::None, 2, two(AccZ, Immz), 0);
    }

    for rd in 0u8..8 {
        t[(0x50 + rd) as usize] = k("push", ModrmKind::None, 1, one(Reg64), 0);
        t[(0x58 + rd) as usize] = k("pop", ModrmKind::None, 1, one(Reg64), 0);
    }
    // 0x90 itself is plain NOP (set below); 0x91-0x97 are XCHG eAX, r.
    for rd in 1u8..8 {
        t[(0x90 + rd) as usize] = k("xchg", ModrmKind::None, 2, two(AccZ, RegZ), 0);
    }
    for rd in 0u8..8 {
        t[(0xB0 + rd) as usize] = k("mov", ModrmKind::None, 2, two(Reg8, Imm8), 1);
        t[(0xB8 + rd) as usize] = k("mov", ModrmKind::None, 2, two(RegZ, ImmFull), 0);
    }

    t[0x68] = k("push", ModrmKind::None, 1, one(Immz), 0);
    t[0x69] = k("imul", ModrmKind::Reg, 3, three(Reg, Rm, Immz), 0);
    t[0x6A] = k("push", ModrmKind::None, 1, one(Imm8), 1);
    t[0x6B] = k("imul", ModrmKind::Reg, 3, three(Reg, Rm, Imm8), 1);

    for (i, m) in JCC_SUFFIX_MNEMONICS_J.into_iter().enumerate() {
        t[0x70 + i] = k(m, ModrmKind::None, 1, one(Rel8), 1);
    }

    t[0x80] = group(group1_eb_ib());
    t[0x81] = group(group1_ev_iz());
    t[0x83] = group(group1_ev_ib());

    t[0x84] = k("test", ModrmKind::Reg, 2, two(Rm8, Reg8), 0);
    t[0x85] = k("test", ModrmKind::Reg, 2, two(Rm, Reg), 0);
    t[0x86] = k("xchg", ModrmKind::Reg, 2, two(Rm8, Reg8), 0);
    t[0x87] = k("xchg", ModrmKind::Reg, 2, two(Rm, Reg), 0);
    t[0x88] = k("mov", ModrmKind::Reg, 2, two(Rm8, Reg8), 0);
    t[0x89] = k("mov", ModrmKind::Reg, 2, two(Rm, Reg), 0);
    t[0x8A] = k("mov", ModrmKind::Reg, 2, two(Reg8, Rm8), 0);
    t[0x8B] = k("mov", ModrmKind::Reg, 2, two(Reg, Rm), 0);
    t[0x8D] = k("lea", ModrmKind::Reg, 2, two(Reg, Rm), 0);
    t[0x8F] = group(group1a_ev());

    t[0x90] = k("nop", ModrmKind::None, 0, NONE4, 0);
    // Default 32-bit-operand-size names; decode() overrides the mnemonic to
    // cbw/cdqe or cwd/cqo once the instruction's actual op_size is known.
    t[0x98] = k("cwde", ModrmKind::None, 0, NONE4, 0);
    t[0x99] = k("cdq", ModrmKind::None, 0, NONE4, 0);
    t[0x9C] = k("pushfq", ModrmKind::None, 0, NONE4, 0);
    t[0x9D] = k("popfq", ModrmKind::None, 0, NONE4, 0);

    t[0xA8] = k("test", ModrmKind::None, 2, two(Al, Imm8), 1);
    t[0xA9] = k("test", ModrmKind::None, 2, two(AccZ, Immz), 0);

    t[0xC0] = group(group2_eb_ib());
    t[0xC1] = group(group2_ev_ib());
    t[0xC2] = k("ret", ModrmKind::None, 1, one(Imm16), 2);
    t[0xC3] = k("ret", ModrmKind::None, 0, NONE4, 0);
    t[0xC6] = group(group11_eb_ib());
    t[0xC7] = group(group11_ev_iz());
    t[0xC9] = k("leave", ModrmKind::None, 0, NONE4, 0);
    t[0xCC] = k("int3", ModrmKind::None, 0, NONE4, 0);
    t[0xCD] = k("int", ModrmKind::None, 1, one(Imm8), 1);

    t[0xD0] = group(group2_eb_1());
    t[0xD1] = group(group2_ev_1());
    t[0xD2] = group(group2_eb_cl());
    t[0xD3] = group(group2_ev_cl());

    t[0xE8] = k("call", ModrmKind::None, 1, one(Rel32), 4);
    t[0xE9] = k("jmp", ModrmKind::None, 1, one(Rel32), 4);
    t[0xEB] = k("jmp", ModrmKind::None, 1, one(Rel8), 1);

    t[0xF4] = k("hlt", ModrmKind::None, 0, NONE4, 0);
    t[0xF5] = k("cmc", ModrmKind::None, 0, NONE4, 0);
    t[0xF6] = group(group3_eb());
    t[0xF7] = group(group3_ev());
    t[0xFE] = group(group4_eb());
    t[0xFF] = group(group5_ev());

    t
}

fn build_0f_table() -> [OpcodeDescriptor; 256] {
    let mut t = [OpcodeDescriptor::unknown(); 256];

    t[0x05] = k("syscall", ModrmKind::None, 0, NONE4, 0);
    t[0x0B] = k("ud2", ModrmKind::None, 0, NONE4, 0);
    t[0x1F] = group(group_nop());

    for (i, m) in CMOVCC_MNEMONICS.into_iter().enumerate() {
        t[0x40 + i] = k(m, ModrmKind::Reg, 2, two(Reg, Rm), 0);
    }
    for (i, m) in JCC_SUFFIX_MNEMONICS_J.into_iter().enumerate() {
        t[0x80 + i] = k(m, ModrmKind::None, 1, one(Rel32), 4);
    }
    for (i, m) in SETCC_MNEMONICS.into_iter().enumerate() {
        t[0x90 + i] = k(m, ModrmKind::Reg, 1, one(Rm8), 0);
    }

    t[0x31] = k("rdtsc", ModrmKind::None, 0, NONE4, 0);
    t[0xA2] = k("cpuid", ModrmKind::None, 0, NONE4, 0);
    t[0xA3] = k("bt", ModrmKind::Reg, 2, two(Rm, Reg), 0);
    t[0xAB] = k("bts", ModrmKind::Reg, 2, two(Rm, Reg), 0);
    t[0xB0] = k("cmpxchg", ModrmKind::Reg, 2, two(Rm8, Reg8), 0);
    t[0xB1] = k("cmpxchg", ModrmKind::Reg, 2, two(Rm, Reg), 0);
    t[0xB3] = k("btr", ModrmKind::Reg, 2, two(Rm, Reg), 0);
    t[0xBA] = group(group8_ev_ib());
    t[0xBB] = k("btc", ModrmKind::Reg, 2, two(Rm, Reg), 0);
    t[0xB6] = k("movzx", ModrmKind::Reg, 2, two(Reg, Rm8), 0);
    t[0xB7] = k("movzx", ModrmKind::Reg, 2, two(Reg, Rm16), 0);
    t[0xBE] = k("movsx", ModrmKind::Reg, 2, two(Reg, Rm8), 0);
    t[0xBF] = k("movsx", ModrmKind::Reg, 2, two(Reg, Rm16), 0);
    t[0xAF] = k("imul", ModrmKind::Reg, 2, two(Reg, Rm), 0);
    t[0xC0] = k("xadd", ModrmKind::Reg, 2, two(Rm8, Reg8), 0);
    t[0xC1] = k("xadd", ModrmKind::Reg, 2, two(Rm, Reg), 0);

    t
}

fn build_0f38_table() -> [OpcodeDescriptor; 256] {
    // Entirely out of scope (spec non-goals: SSE/AVX-adjacent encodings,
    // accurate operand sizing for the 0F 38 space); every slot unknown.
    [OpcodeDescriptor::unknown(); 256]
}

fn build_0f3a_table() -> [OpcodeDescriptor; 256] {
    [OpcodeDescriptor::unknown(); 256]
}

static PRIMARY: OnceLock<[OpcodeDescriptor; 256]> = OnceLock::new();
static MAP_0F: OnceLock<[OpcodeDescriptor; 256]> = OnceLock::new();
static MAP_0F38: OnceLock<[OpcodeDescriptor; 256]> = OnceLock::new();
static MAP_0F3A: OnceLock<[OpcodeDescriptor; 256]> = OnceLock::new();

/// The primary (one-byte) opcode map.
pub fn primary_table() -> &'static [OpcodeDescriptor; 256] {
    PRIMARY.get_or_init(build_primary_table)
}

/// The `0F xx` two-byte opcode map.
pub fn map_0f_table() -> &'static [OpcodeDescriptor; 256] {
    MAP_0F.get_or_init(build_0f_table)
}

/// The `0F 38 xx` three-byte opcode map.
pub fn map_0f38_table() -> &'static [OpcodeDescriptor; 256] {
    MAP_0F38.get_or_init(build_0f38_table)
}

/// The `0F 3A xx` three-byte opcode map.
pub fn map_0f3a_table() -> &'static [OpcodeDescriptor; 256] {
    MAP_0F3A.get_or_init(build_0f3a_table)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ret_is_known_with_no_operands() {
        let d = primary_table()[0xC3];
        assert!(d.known);
        assert_eq!(d.mnemonic, "ret");
        assert_eq!(d.operand_count, 0);
    }

    #[test]
    fn mov_rm_reg_uses_ordinary_modrm() {
        let d = primary_table()[0x89];
        assert_eq!(d.modrm_kind, ModrmKind::Reg);
        assert_eq!(d.operand_kinds[0], OperandKind::Rm);
        assert_eq!(d.operand_kinds[1], OperandKind::Reg);
    }

    #[test]
    fn grp1_digit_group_resolves_all_eight_mnemonics() {
        let d = primary_table()[0x80];
        assert_eq!(d.modrm_kind, ModrmKind::DigitGroup);
        let sub = d.digit_group.expect("0x80 must carry a digit-group table");
        let names: Vec<&str> = sub.iter().map(|e| e.mnemonic).collect();
        assert_eq!(names, ["add", "or", "adc", "sbb", "and", "sub", "xor", "cmp"]);
        assert!(sub.iter().all(|e| e.known));
    }

    #[test]
    fn grp3_f6_mixes_operand_counts_and_immediates() {
        let sub = primary_table()[0xF6].digit_group.unwrap();
        assert_eq!(sub[0].mnemonic, "test");
        assert_eq!(sub[0].fixed_imm_size, 1);
        assert_eq!(sub[2].mnemonic, "not");
        assert_eq!(sub[2].operand_count, 1);
        assert_eq!(sub[2].fixed_imm_size, 0);
    }

    #[test]
    fn unmapped_primary_opcode_is_unknown() {
        // 0x0F is the two-byte escape; the decoder never indexes the
        // primary table with it, but the slot itself carries no mnemonic.
        assert!(!primary_table()[0x0F].known);
        assert!(!primary_table()[0xD6].known);
    }

    #[test]
    fn cmovcc_and_setcc_share_the_jcc_condition_order() {
        let cmov = map_0f_table()[0x44];
        assert_eq!(cmov.mnemonic, "cmove");
        let set = map_0f_table()[0x94];
        assert_eq!(set.mnemonic, "sete");
        let jcc = map_0f_table()[0x84];
        assert_eq!(jcc.mnemonic, "je");
    }

    #[test]
    fn syscall_and_ud2_take_no_modrm() {
        assert_eq!(map_0f_table()[0x05].mnemonic, "syscall");
        assert_eq!(map_0f_table()[0x0B].mnemonic, "ud2");
        assert_eq!(map_0f_table()[0x05].modrm_kind, ModrmKind::None);
    }

    #[test]
    fn three_byte_maps_are_entirely_out_of_scope() {
        assert!(map_0f38_table().iter().all(|e| !e.known));
        assert!(map_0f3a_table().iter().all(|e| !e.known));
    }

    #[test]
    fn opcode_plus_rd_forms_use_register_kinds_not_rm() {
        let push = primary_table()[0x55];
        assert_eq!(push.mnemonic, "push");
        assert_eq!(push.operand_kinds[0], OperandKind::Reg64);
        let mov_imm64 = primary_table()[0xB8];
        assert_eq!(mov_imm64.operand_kinds[1], OperandKind::ImmFull);
    }
}
