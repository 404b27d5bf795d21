use crate::backend::Target;

/// Emits the jump table: one `.quad .token_i` entry per token, in token
/// order, so a runtime-computed token index is also a valid jump-table
/// index. Placed ahead of `.text` so every `.token_i` label it references
/// has already been declared by the time the assembler resolves it.
pub fn emit_jump_table(asm: &mut Vec<String>, token_count: usize) {
    asm.push(".align 3".to_string());
    asm.push("jump_table:".to_string());
    for i in 0..token_count {
        asm.push(format!("    .quad .token_{}", i));
    }
    asm.push(String::new());
}

/// The two-instruction sequence that loads the jump table's base address
/// into `reg`. The hosted backend addresses static data with
/// `@PAGE`/`@PAGEOFF` (Mach-O); the bare-metal backend uses the GNU `as`
/// ELF convention of a plain `adrp` plus a `:lo12:` relocation.
pub fn load_jump_table_base(target: Target, reg: &str) -> Vec<String> {
    match target {
        Target::Arm64 => vec![
            format!("    adrp {}, jump_table@PAGE", reg),
            format!("    add {}, {}, jump_table@PAGEOFF", reg, reg),
        ],
        Target::Arm64Baremetal => vec![
            format!("    adrp {}, jump_table", reg),
            format!("    add {}, {}, :lo12:jump_table", reg, reg),
        ],
    }
}
