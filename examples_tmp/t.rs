fn main() {
    // 0F 1F /1 nop with reg=1 (modrm = 0x48 -> mod=01 reg=001 rm=000)
    let bytes = [0x0Fu8, 0x1F, 0x48, 0x00];
    match gandelf::decode(&bytes, 15) {
        Ok(i) => println!("ok: {}", i.descriptor.mnemonic),
        Err(e) => println!("err: {e}"),
    }
}
