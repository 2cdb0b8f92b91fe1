//! CLI entry point (spec §6): wires `clap` argument parsing, the ELF
//! extractor, the decoder, and the formatter together.
//!
//! Exit codes follow spec §7: any `ElfError` or usage error goes to stderr
//! and the process exits 1; a `DecodeError` mid-sweep stops that symbol's
//! disassembly (logged via `warn!`) without aborting the whole run.

use std::process::ExitCode;

use clap::Parser;
use log::warn;

use gandelf::cli::Cli;
use gandelf::elf::{ElfFile, FunctionSymbol};
use gandelf::error::CliError;
use gandelf::{decode, format_instruction};

fn main() -> ExitCode {
    env_logger::init();
    let cli = Cli::parse();

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("gandelf: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> Result<(), CliError> {
    let elf = ElfFile::open(&cli.path)?;

    if cli.show_header {
        print_header(&elf);
    }
    if cli.show_section_headers {
        print_section_headers(&elf);
    }

    let need_functions = cli.hexdump_target().is_some() || cli.disassemble_target().is_some();
    let functions = if need_functions { elf.text_functions()? } else { Vec::new() };

    if let Some(target) = cli.hexdump_target() {
        hexdump(&functions, target)?;
    }
    if let Some(target) = cli.disassemble_target() {
        disassemble(&functions, target)?;
    }

    Ok(())
}

fn print_header(elf: &ElfFile) {
    let h = &elf.header;
    println!("ELF header:");
    println!("  class:        {}", if h.class == 2 { "ELF64" } else { "unknown" });
    println!("  data:         {}", if h.data_encoding == 1 { "little endian" } else { "unknown" });
    println!("  OS/ABI:       0x{:02x}", h.os_abi);
    println!("  ABI version:  {}", h.abi_version);
    println!("  type:         0x{:04x}", h.e_type);
    println!("  machine:      0x{:04x}", h.e_machine);
    println!("  entry point:  0x{:016x}", h.e_entry);
}

fn print_section_headers(elf: &ElfFile) {
    println!("Program headers:");
    for (i, ph) in elf.program_headers.iter().enumerate() {
        println!(
            "  [{i:2}] type=0x{:08x} offset=0x{:x} vaddr=0x{:016x} filesz=0x{:x} memsz=0x{:x}",
            ph.p_type, ph.offset, ph.vaddr, ph.filesz, ph.memsz
        );
    }
    println!("Section headers:");
    for (i, sh) in elf.section_headers.iter().enumerate() {
        println!(
            "  [{i:2}] {:<20} type=0x{:08x} addr=0x{:016x} size=0x{:x}",
            sh.name, sh.sh_type, sh.addr, sh.size
        );
    }
}

fn select<'a>(functions: &'a [FunctionSymbol], target: &str) -> Result<Vec<&'a FunctionSymbol>, CliError> {
    if target.is_empty() {
        return Ok(functions.iter().collect());
    }
    let found = functions.iter().find(|f| f.name == target);
    match found {
        Some(f) => Ok(vec![f]),
        None => Err(CliError::Usage(format!("no such symbol: {target}"))),
    }
}

fn hexdump(functions: &[FunctionSymbol], target: &str) -> Result<(), CliError> {
    for sym in select(functions, target)? {
        println!("{} @ 0x{:016x}:", sym.name, sym.virtual_address);
        for chunk in sym.bytes.chunks(16) {
            let line: Vec<String> = chunk.iter().map(|b| format!("{:02x}", b)).collect();
            println!("  {}", line.join(" "));
        }
    }
    Ok(())
}

fn disassemble(functions: &[FunctionSymbol], target: &str) -> Result<(), CliError> {
    for sym in select(functions, target)? {
        println!("{} @ 0x{:016x}:", sym.name, sym.virtual_address);
        let mut offset = 0usize;
        while offset < sym.bytes.len() {
            let remaining = &sym.bytes[offset..];
            match decode(remaining, remaining.len()) {
                Ok(insn) => {
                    let address = sym.virtual_address + offset as u64;
                    let raw = &remaining[..insn.length];
                    println!("  {}", format_instruction(&insn, raw, address));
                    offset += insn.length;
                }
                Err(e) => {
                    warn!("{}: decode failed at offset 0x{:x}: {e}", sym.name, offset);
                    break;
                }
            }
        }
    }
    Ok(())
}
