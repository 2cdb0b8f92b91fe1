//! A static ELF64/x86-64 binary inspector: an instruction decoder plus an
//! ELF extractor and text formatter built on top of it.
//!
//! Library surface for `src/main.rs`'s CLI and for standalone use (e.g. a
//! fuzz target). Pure decode-from-bytes; no process state, no I/O beyond
//! `elf::ElfFile::open`.

pub mod cli;
pub mod decoder;
pub mod elf;
pub mod error;
pub mod format;

pub use decoder::decode;
pub use decoder::instruction::Instruction;
pub use elf::{ElfFile, FunctionSymbol};
pub use error::{CliError, DecodeError, ElfError};
pub use format::format_instruction;
