//! Exercises `ElfFile` against a minimal hand-built ELF64 fixture — no
//! checked-in binary, built from byte literals at test time, following
//! SPEC_FULL.md §4's test-tooling plan.

use std::io::Write;

use gandelf::elf::ElfFile;
use gandelf::error::ElfError;

fn push_u16(buf: &mut Vec<u8>, v: u16) {
    buf.extend_from_slice(&v.to_le_bytes());
}
fn push_u32(buf: &mut Vec<u8>, v: u32) {
    buf.extend_from_slice(&v.to_le_bytes());
}
fn push_u64(buf: &mut Vec<u8>, v: u64) {
    buf.extend_from_slice(&v.to_le_bytes());
}

/// Builds a minimal, well-formed ELF64 LE file with one `.text` section
/// containing two symbols: `my_func` (valid, one byte: `ret`) and
/// `bad_func` (whose declared size overflows the file, so extraction must
/// skip it rather than panic or read out of bounds).
fn build_fixture() -> Vec<u8> {
    const TEXT_VADDR: u64 = 0x1000;
    let text: Vec<u8> = vec![0xC3, 0x90, 0x90, 0x90, 0x90, 0x90, 0x90, 0x90];

    let mut strtab = Vec::new();
    strtab.push(0u8);
    strtab.extend_from_slice(b"my_func\0"); // offset 1
    strtab.extend_from_slice(b"bad_func\0"); // offset 9

    let mut shstrtab = Vec::new();
    shstrtab.push(0u8);
    shstrtab.extend_from_slice(b".text\0"); // offset 1
    shstrtab.extend_from_slice(b".symtab\0"); // offset 7
    shstrtab.extend_from_slice(b".strtab\0"); // offset 15
    shstrtab.extend_from_slice(b".shstrtab\0"); // offset 23

    let mut symtab = Vec::new();
    // Null symbol (index 0), reserved by convention.
    symtab.extend_from_slice(&[0u8; 24]);
    // my_func: STT_FUNC, STB_GLOBAL, in section index 1 (.text).
    push_u32(&mut symtab, 1); // st_name
    symtab.push(0x12); // st_info: bind=1, type=2 (STT_FUNC)
    symtab.push(0); // st_other
    push_u16(&mut symtab, 1); // st_shndx = .text
    push_u64(&mut symtab, TEXT_VADDR); // st_value
    push_u64(&mut symtab, 1); // st_size
    // bad_func: valid address within .text, but a size that reads past EOF.
    push_u32(&mut symtab, 9);
    symtab.push(0x12);
    symtab.push(0);
    push_u16(&mut symtab, 1);
    push_u64(&mut symtab, TEXT_VADDR + 5);
    push_u64(&mut symtab, 1000);

    const HEADER_LEN: u64 = 64;
    let text_offset = HEADER_LEN;
    let strtab_offset = text_offset + text.len() as u64;
    let symtab_offset = strtab_offset + strtab.len() as u64;
    let shstrtab_offset = symtab_offset + symtab.len() as u64;
    let shoff = shstrtab_offset + shstrtab.len() as u64;

    let mut file = Vec::new();

    // e_ident
    file.extend_from_slice(&[0x7F, b'E', b'L', b'F']);
    file.push(2); // EI_CLASS = ELFCLASS64
    file.push(1); // EI_DATA = little endian
    file.push(1); // EI_VERSION
    file.push(0); // EI_OSABI
    file.extend_from_slice(&[0u8; 8]); // EI_ABIVERSION + padding

    push_u16(&mut file, 2); // e_type = ET_EXEC
    push_u16(&mut file, 0x3E); // e_machine = EM_X86_64
    push_u32(&mut file, 1); // e_version
    push_u64(&mut file, TEXT_VADDR); // e_entry
    push_u64(&mut file, 0); // e_phoff
    push_u64(&mut file, shoff); // e_shoff
    push_u32(&mut file, 0); // e_flags
    push_u16(&mut file, 64); // e_ehsize
    push_u16(&mut file, 0); // e_phentsize
    push_u16(&mut file, 0); // e_phnum
    push_u16(&mut file, 64); // e_shentsize
    push_u16(&mut file, 5); // e_shnum
    push_u16(&mut file, 4); // e_shstrndx

    assert_eq!(file.len() as u64, HEADER_LEN);
    file.write_all(&text).unwrap();
    file.write_all(&strtab).unwrap();
    file.write_all(&symtab).unwrap();
    file.write_all(&shstrtab).unwrap();
    assert_eq!(file.len() as u64, shoff);

    // Section 0: SHT_NULL.
    file.extend_from_slice(&[0u8; 64]);

    // Section 1: .text
    push_u32(&mut file, 1); // sh_name
    push_u32(&mut file, 1); // sh_type = SHT_PROGBITS
    push_u64(&mut file, 0); // sh_flags
    push_u64(&mut file, TEXT_VADDR); // sh_addr
    push_u64(&mut file, text_offset); // sh_offset
    push_u64(&mut file, text.len() as u64); // sh_size
    push_u32(&mut file, 0); // sh_link
    push_u32(&mut file, 0); // sh_info
    push_u64(&mut file, 1); // sh_addralign
    push_u64(&mut file, 0); // sh_entsize

    // Section 2: .symtab
    push_u32(&mut file, 7);
    push_u32(&mut file, 2); // SHT_SYMTAB
    push_u64(&mut file, 0);
    push_u64(&mut file, 0);
    push_u64(&mut file, symtab_offset);
    push_u64(&mut file, symtab.len() as u64);
    push_u32(&mut file, 3); // sh_link -> .strtab's section index
    push_u32(&mut file, 0);
    push_u64(&mut file, 8);
    push_u64(&mut file, 24);

    // Section 3: .strtab
    push_u32(&mut file, 15);
    push_u32(&mut file, 3); // SHT_STRTAB
    push_u64(&mut file, 0);
    push_u64(&mut file, 0);
    push_u64(&mut file, strtab_offset);
    push_u64(&mut file, strtab.len() as u64);
    push_u32(&mut file, 0);
    push_u32(&mut file, 0);
    push_u64(&mut file, 1);
    push_u64(&mut file, 0);

    // Section 4: .shstrtab
    push_u32(&mut file, 23);
    push_u32(&mut file, 3); // SHT_STRTAB
    push_u64(&mut file, 0);
    push_u64(&mut file, 0);
    push_u64(&mut file, shstrtab_offset);
    push_u64(&mut file, shstrtab.len() as u64);
    push_u32(&mut file, 0);
    push_u32(&mut file, 0);
    push_u64(&mut file, 1);
    push_u64(&mut file, 0);

    file
}

fn write_fixture() -> std::path::PathBuf {
    let path = std::env::temp_dir().join(format!("gandelf-fixture-{}.elf", std::process::id()));
    std::fs::write(&path, build_fixture()).unwrap();
    path
}

#[test]
fn a_non_elf_file_is_rejected() {
    let path = std::env::temp_dir().join(format!("gandelf-not-elf-{}.bin", std::process::id()));
    std::fs::write(&path, b"not an elf file at all").unwrap();
    let err = ElfFile::open(&path).unwrap_err();
    assert!(matches!(err, ElfError::NotAnElf));
    let _ = std::fs::remove_file(&path);
}

#[test]
fn section_headers_are_parsed_with_resolved_names() {
    let path = write_fixture();
    let elf = ElfFile::open(&path).unwrap();
    let names: Vec<&str> = elf.section_headers.iter().map(|s| s.name.as_str()).collect();
    assert!(names.contains(&".text"));
    assert!(names.contains(&".symtab"));
    assert!(names.contains(&".strtab"));
    let _ = std::fs::remove_file(&path);
}

#[test]
fn a_valid_function_symbol_is_extracted_with_its_bytes() {
    let path = write_fixture();
    let elf = ElfFile::open(&path).unwrap();
    let functions = elf.text_functions().unwrap();
    let my_func = functions.iter().find(|f| f.name == "my_func").expect("my_func must be extracted");
    assert_eq!(my_func.virtual_address, 0x1000);
    assert_eq!(my_func.bytes, vec![0xC3]);
    let _ = std::fs::remove_file(&path);
}

#[test]
fn a_symbol_whose_byte_range_overflows_the_file_is_skipped_not_errored() {
    let path = write_fixture();
    let elf = ElfFile::open(&path).unwrap();
    let functions = elf.text_functions().unwrap();
    assert!(functions.iter().all(|f| f.name != "bad_func"));
    let _ = std::fs::remove_file(&path);
}
