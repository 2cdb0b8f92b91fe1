//! Command-line surface (spec §6): the `-f`/`-h`/`-x`/`-d` options, parsed
//! with `clap`'s derive API rather than a hand-rolled `argv` walk like the
//! original C program's `main.c` — the teacher crate has no CLI of its own to
//! draw from, so this is pulled from general Rust CLI practice.

use std::path::PathBuf;

use clap::{ArgAction, Parser};

/// Inspect and disassemble a 64-bit ELF x86-64 binary.
// spec §6 reserves `-h` for the section-header dump, which otherwise
// collides with clap's auto-generated `-h`/`--help`; `disable_help_flag`
// drops both, so `--help` is re-added below as a long-only flag.
#[derive(Parser, Debug)]
#[command(name = "gandelf", version, about, disable_help_flag = true)]
pub struct Cli {
    /// Path to the ELF64 file to inspect.
    pub path: PathBuf,

    /// Print the ELF file header (class, OS/ABI, entry point, type).
    #[arg(short = 'f', long = "header")]
    pub show_header: bool,

    /// Print program and section header summaries.
    #[arg(short = 'h', long = "headers")]
    pub show_section_headers: bool,

    /// Print help information.
    #[arg(long = "help", action = ArgAction::Help)]
    help: Option<bool>,

    /// Hex-dump bytes of a `.text` function symbol (every symbol if omitted).
    ///
    /// A name must be attached directly (`-xmain` or `--hexdump=main`), not
    /// as a separate argument — clap would otherwise not be able to tell the
    /// symbol name apart from the trailing file path.
    #[arg(short = 'x', long = "hexdump", value_name = "NAME", num_args = 0..=1, default_missing_value = "")]
    pub hexdump: Option<String>,

    /// Disassemble a `.text` function symbol (every symbol if omitted), same
    /// attached-value convention as `-x`.
    #[arg(short = 'd', long = "disassemble", value_name = "NAME", num_args = 0..=1, default_missing_value = "")]
    pub disassemble: Option<String>,
}

impl Cli {
    /// `hexdump`'s target name, where an empty string (from the bare `-x`
    /// flag) means "every symbol".
    pub fn hexdump_target(&self) -> Option<&str> {
        self.hexdump.as_deref()
    }

    /// `disassemble`'s target name, same convention as [`Self::hexdump_target`].
    pub fn disassemble_target(&self) -> Option<&str> {
        self.disassemble.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bare_dash_x_yields_an_empty_target_meaning_every_symbol() {
        let cli = Cli::parse_from(["gandelf", "a.out", "-x"]);
        assert_eq!(cli.hexdump_target(), Some(""));
    }

    #[test]
    fn dash_x_with_an_attached_name_yields_that_name() {
        let cli = Cli::parse_from(["gandelf", "-xmain", "a.out"]);
        assert_eq!(cli.hexdump_target(), Some("main"));
    }

    #[test]
    fn no_dash_x_yields_no_target() {
        let cli = Cli::parse_from(["gandelf", "a.out"]);
        assert_eq!(cli.hexdump_target(), None);
    }
}
