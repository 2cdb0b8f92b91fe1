//! Error taxonomy for the decoder, the ELF extractor, and the CLI.
//!
//! Mirrors the teacher crate's `VmxError`-style "one enum per failure
//! surface, `thiserror` for `Display`" shape, adapted from `axerrno` (which
//! targets `no_std` hosts) to `thiserror` since this crate runs on `std`.

use thiserror::Error;

/// Failures that can occur while decoding a single instruction.
///
/// None of these are recoverable within one `decode` call; spec §7 leaves the
/// choice of whether to stop or resync the linear sweep to the caller.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecodeError {
    /// The encoding requires more bytes than were available (`max_len`).
    #[error("truncated instruction: ran out of bytes before decoding completed")]
    Truncated,

    /// No descriptor is known for this `(map, opcode)` pair, or a
    /// digit-group's `reg` field did not match the required group digit.
    #[error("unknown opcode 0x{opcode:02x} in map 0x{map:02x}")]
    UnknownOpcode {
        /// Active opcode map (1, 0x0F, 0x38, 0x3A) at the point of failure.
        map: u8,
        /// The opcode byte itself.
        opcode: u8,
    },

    /// Cumulative instruction length would exceed the architectural maximum
    /// of 15 bytes.
    #[error("malformed instruction: length {length} exceeds 15 bytes")]
    MalformedLength {
        /// The length that would have resulted, had decoding continued.
        length: usize,
    },
}

/// Failures surfaced while locating and extracting ELF64 structures.
#[derive(Error, Debug)]
pub enum ElfError {
    /// The file does not begin with the ELF64 magic `7F 45 4C 46`.
    #[error("not an ELF file")]
    NotAnElf,

    /// A section required for disassembly (`.text`, `.symtab`, `.strtab`) is
    /// absent from the section header table.
    #[error("missing required section: {0}")]
    MissingSection(&'static str),

    /// A computed offset or length would read past the end of the file.
    #[error("bounds overflow while reading ELF structure")]
    BoundsOverflow,

    /// Underlying file I/O failed (unreadable path, permission, etc.).
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Top-level error the CLI binary matches on to pick an exit code.
#[derive(Error, Debug)]
pub enum CliError {
    /// The command line itself was invalid (e.g. a named symbol that
    /// doesn't exist was requested).
    #[error("usage error: {0}")]
    Usage(String),

    /// Failed while loading or parsing the ELF file.
    #[error(transparent)]
    Elf(#[from] ElfError),
}

/// Convenience alias used throughout the decoder module.
pub type DecodeResult<T> = Result<T, DecodeError>;

/// Convenience alias used throughout the ELF extractor.
pub type ElfResult<T> = Result<T, ElfError>;
