use crate::backend::Target;

/// The two-instruction sequence that loads `label`'s address into `reg`,
/// using whichever static-data addressing convention `target`'s object
/// format requires (Mach-O `@PAGE`/`@PAGEOFF` for the hosted backend, ELF
/// `adrp` + `:lo12:` for the bare-metal one).
pub fn load_label_address(target: Target, label: &str, reg: &str) -> Vec<String> {
    match target {
        Target::Arm64 => vec![
            format!("    adrp {}, {}@PAGE", reg, label),
            format!("    add {}, {}, {}@PAGEOFF", reg, reg, label),
        ],
        Target::Arm64Baremetal => vec![
            format!("    adrp {}, {}", reg, label),
            format!("    add {}, {}, :lo12:{}", reg, reg, label),
        ],
    }
}
