//! The x86-64 instruction decoder: a single pass over a borrowed byte slice
//! producing an [`Instruction`] or a [`DecodeError`].
//!
//! Structure mirrors the teacher's `instruction_emulator.rs`: a prefix-parse
//! step, a size-resolution step, then opcode/ModR/M/SIB/displacement/
//! immediate phases threaded through one `pos` cursor, generalized from
//! "just compute a length" to "build the full record the formatter needs".

pub mod instruction;
pub mod operand_kind;
pub mod operand_size;
pub mod tables;

use crate::error::{DecodeError, DecodeResult};

use instruction::{Instruction, ModRmFields, OpcodeMap, RexBits, SibFields};
use tables::{ModrmKind, OpcodeDescriptor};

const MAX_INSTRUCTION_LENGTH: usize = 15;

fn is_legacy_prefix(b: u8) -> bool {
    matches!(b, 0x66 | 0x67 | 0xF0 | 0xF2 | 0xF3 | 0x2E | 0x36 | 0x3E | 0x26 | 0x64 | 0x65)
}

fn is_rex(b: u8) -> bool {
    (0x40..=0x4F).contains(&b)
}

struct Prefixes {
    has_66: bool,
    has_67: bool,
    lock: bool,
    rep: bool,
    repne: bool,
    segment_override: Option<u8>,
    rex: RexBits,
    len: usize,
}

/// Prefix phase: consumes legacy prefixes and REX bytes in any order.
///
/// A REX byte only takes effect if no other legacy prefix follows it before
/// the opcode (`pending_rex` is cleared on every non-REX prefix); among
/// several consecutive REX bytes with nothing in between, the last one wins.
fn parse_prefixes(bytes: &[u8], limit: usize) -> Prefixes {
    let mut pos = 0;
    let mut has_66 = false;
    let mut has_67 = false;
    let mut lock = false;
    let mut rep = false;
    let mut repne = false;
    let mut segment_override = None;
    let mut pending_rex: Option<u8> = None;

    while pos < limit {
        let b = bytes[pos];
        if is_legacy_prefix(b) {
            pending_rex = None;
            match b {
                0x66 => has_66 = true,
                0x67 => has_67 = true,
                0xF0 => lock = true,
                0xF2 => repne = true,
                0xF3 => rep = true,
                _ => segment_override = Some(b),
            }
            pos += 1;
        } else if is_rex(b) {
            pending_rex = Some(b);
            pos += 1;
        } else {
            break;
        }
    }

    let rex = match pending_rex {
        Some(raw) => RexBits {
            present: true,
            raw,
            w: raw & 0x08 != 0,
            r: raw & 0x04 != 0,
            x: raw & 0x02 != 0,
            b: raw & 0x01 != 0,
        },
        None => RexBits::default(),
    };

    Prefixes { has_66, has_67, lock, rep, repne, segment_override, rex, len: pos }
}

/// Decodes exactly one instruction from `bytes`, reading at most
/// `min(max_len, bytes.len())` bytes and never past that bound.
///
/// The prefix phase alone never reads more than 15 bytes. If it consumes
/// exactly that many and still hasn't found a non-prefix byte, the encoding
/// is already malformed (at least one more byte is mandatory for the
/// opcode, pushing the total past 15) — that's reported directly rather
/// than risking a prefix byte being misread as the opcode.
pub fn decode(bytes: &[u8], max_len: usize) -> DecodeResult<Instruction> {
    let limit = bytes.len().min(max_len);

    let prefixes = parse_prefixes(bytes, limit.min(MAX_INSTRUCTION_LENGTH));
    if prefixes.len >= MAX_INSTRUCTION_LENGTH {
        return Err(DecodeError::MalformedLength { length: prefixes.len + 1 });
    }
    let mut pos = prefixes.len;

    // Opcode-map phase.
    if pos >= limit {
        return Err(DecodeError::Truncated);
    }
    let (map, map_consumed_second_byte) = if bytes[pos] == 0x0F {
        let escape_pos = pos + 1;
        if escape_pos >= limit {
            return Err(DecodeError::Truncated);
        }
        match bytes[escape_pos] {
            0x38 => (OpcodeMap::Map0f38, true),
            0x3A => (OpcodeMap::Map0f3a, true),
            _ => (OpcodeMap::Map0f, false),
        }
    } else {
        (OpcodeMap::Primary, false)
    };
    if map != OpcodeMap::Primary {
        pos += 1; // the 0F byte itself
        if map_consumed_second_byte {
            pos += 1; // the 38 or 3A selector byte
        }
    }

    if pos >= limit {
        return Err(DecodeError::Truncated);
    }
    let opcode = bytes[pos];
    pos += 1;

    let op_size = operand_size::effective_operand_size(prefixes.has_66, prefixes.rex.w);
    let addr_size = operand_size::effective_address_size(prefixes.has_67);

    let table = match map {
        OpcodeMap::Primary => tables::primary_table(),
        OpcodeMap::Map0f => tables::map_0f_table(),
        OpcodeMap::Map0f38 => tables::map_0f38_table(),
        OpcodeMap::Map0f3a => tables::map_0f3a_table(),
    };
    let mut descriptor: OpcodeDescriptor = table[opcode as usize];
    if !descriptor.known {
        return Err(DecodeError::UnknownOpcode { map: map.id(), opcode });
    }

    // 0x98/0x99 name a different instruction at each operand size (CBW/CWDE/
    // CDQE, CWD/CDQ/CQO); the static table can't express that, so override
    // the mnemonic here now that op_size is known.
    if map == OpcodeMap::Primary {
        match opcode {
            0x98 => descriptor.mnemonic = match op_size { 16 => "cbw", 64 => "cdqe", _ => "cwde" },
            0x99 => descriptor.mnemonic = match op_size { 16 => "cwd", 64 => "cqo", _ => "cdq" },
            _ => {}
        }
    }

    // ModR/M phase.
    let mut modrm: Option<ModRmFields> = None;
    if descriptor.modrm_kind != ModrmKind::None {
        if pos >= limit {
            return Err(DecodeError::Truncated);
        }
        let raw = bytes[pos];
        pos += 1;
        let md = (raw >> 6) & 0x03;
        let reg_raw = (raw >> 3) & 0x07;
        let rm_raw = raw & 0x07;

        if descriptor.modrm_kind == ModrmKind::DigitGroup {
            let sub_table = descriptor
                .digit_group
                .expect("DigitGroup descriptor must carry a sub-table");
            let sub = sub_table[reg_raw as usize];
            if !sub.known {
                return Err(DecodeError::UnknownOpcode { map: map.id(), opcode });
            }
            descriptor = sub;
        }

        modrm = Some(ModRmFields {
            raw,
            md,
            reg_raw,
            reg: reg_raw | ((prefixes.rex.r as u8) << 3),
            rm_raw,
            rm: rm_raw | ((prefixes.rex.b as u8) << 3),
        });
    }

    // SIB phase.
    let mut sib: Option<SibFields> = None;
    if let Some(m) = modrm {
        if m.md != 3 && m.rm_raw == 4 {
            if pos >= limit {
                return Err(DecodeError::Truncated);
            }
            let raw = bytes[pos];
            pos += 1;
            let scale = (raw >> 6) & 0x03;
            let index_raw = (raw >> 3) & 0x07;
            let base_raw = raw & 0x07;
            // index = 4 means "no index register"; REX.X never promotes it.
            let index = if index_raw == 4 { 4 } else { index_raw | ((prefixes.rex.x as u8) << 3) };
            let base = base_raw | ((prefixes.rex.b as u8) << 3);
            sib = Some(SibFields { raw, scale, index_raw, index, base_raw, base });
        }
    }

    // Displacement-size rules.
    let disp_size: u8 = match modrm {
        None => 0,
        Some(m) => match m.md {
            1 => 1,
            2 => 4,
            3 => 0,
            0 => {
                if sib.is_none() && m.rm_raw == 5 {
                    4 // RIP-relative
                } else if let Some(s) = sib {
                    if s.base_raw == 5 {
                        4
                    } else {
                        0
                    }
                } else {
                    0
                }
            }
            _ => unreachable!("mod is a 2-bit field"),
        },
    };

    if pos + disp_size as usize > limit {
        return Err(DecodeError::Truncated);
    }
    let disp: i64 = match disp_size {
        0 => 0,
        1 => bytes[pos] as i8 as i64,
        4 => i32::from_le_bytes(bytes[pos..pos + 4].try_into().unwrap()) as i64,
        _ => unreachable!("disp_size is always 0, 1, or 4"),
    };
    pos += disp_size as usize;

    // Immediate phase.
    let imm_size = operand_size::immediate_width(&descriptor, prefixes.has_66, prefixes.rex.w);
    if pos + imm_size as usize > limit {
        return Err(DecodeError::Truncated);
    }
    let mut imm_bytes = [0u8; 8];
    imm_bytes[..imm_size as usize].copy_from_slice(&bytes[pos..pos + imm_size as usize]);
    let imm = u64::from_le_bytes(imm_bytes);
    pos += imm_size as usize;

    if pos > MAX_INSTRUCTION_LENGTH {
        return Err(DecodeError::MalformedLength { length: pos });
    }

    Ok(Instruction {
        has_66: prefixes.has_66,
        has_67: prefixes.has_67,
        lock: prefixes.lock,
        rep: prefixes.rep,
        repne: prefixes.repne,
        segment_override: prefixes.segment_override,
        rex: prefixes.rex,
        map,
        opcode,
        descriptor,
        modrm,
        sib,
        disp_size,
        disp,
        imm_size,
        imm,
        op_size,
        addr_size,
        length: pos,
    })
}
