/// Emits the `mov`/`movz`/`movk`/`movn` sequence that materializes any `i64`
/// into `x0`, then pushes it onto the ELI operand stack (`x19`).
///
/// Negative values use `movn` (load the one's complement, then `movk` to
/// patch in higher halfwords) so the full 64-bit range round-trips without a
/// literal pool; positive values use the `movz`/`movk` mirror. Values that
/// fit a single 16-bit immediate skip straight to `mov`.
pub fn push_literal(asm: &mut Vec<String>, value: i64) {
    asm.push(format!("    // PUSH {}", value));
    if value >= 0 {
        push_positive(asm, value as u64);
    } else {
        push_negative(asm, value);
    }
    asm.push("    str x0, [x19], #8".to_string());
}

fn push_positive(asm: &mut Vec<String>, value: u64) {
    if value < 0x1_0000 {
        asm.push(format!("    mov x0, #{}", value));
        return;
    }
    asm.push(format!("    movz x0, #{}", value & 0xFFFF));
    if value > 0xFFFF {
        asm.push(format!("    movk x0, #{}, lsl #16", (value >> 16) & 0xFFFF));
    }
    if value > 0xFFFF_FFFF {
        asm.push(format!("    movk x0, #{}, lsl #32", (value >> 32) & 0xFFFF));
    }
    if value > 0xFFFF_FFFF_FFFF {
        asm.push(format!("    movk x0, #{}, lsl #48", (value >> 48) & 0xFFFF));
    }
}

fn push_negative(asm: &mut Vec<String>, value: i64) {
    if value >= -0x1_0000 {
        asm.push(format!("    mov x0, #{}", value));
        return;
    }
    let inverted = !(value as u64);
    asm.push(format!("    movn x0, #{}", inverted & 0xFFFF));
    if inverted > 0xFFFF {
        asm.push(format!("    movk x0, #{}, lsl #16", (inverted >> 16) & 0xFFFF));
    }
    if inverted > 0xFFFF_FFFF {
        asm.push(format!("    movk x0, #{}, lsl #32", (inverted >> 32) & 0xFFFF));
    }
    if inverted > 0xFFFF_FFFF_FFFF {
        asm.push(format!("    movk x0, #{}, lsl #48", (inverted >> 48) & 0xFFFF));
    }
}

/// Emits a Buffer token's backing data as a `.data` literal (`[len, elem0,
/// elem1, ...]`, matching the array-heap layout `l`/`g` expect) labeled
/// `label`, then the code that pushes its address.
pub fn push_buffer(
    asm: &mut Vec<String>,
    data: &mut Vec<String>,
    target: crate::backend::Target,
    label: &str,
    elements: &[i64],
) {
    data.push(format!("{}:", label));
    data.push(format!("    .quad {}", elements.len()));
    for e in elements {
        data.push(format!("    .quad {}", e));
    }
    data.push(String::new());

    asm.push(format!("    // PUSH buffer {}", label));
    for line in crate::addressing::load_label_address(target, label, "x0") {
        asm.push(line);
    }
    asm.push("    str x0, [x19], #8".to_string());
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn small_positive_uses_plain_mov() {
        let mut asm = Vec::new();
        push_literal(&mut asm, 5);
        assert!(asm.iter().any(|l| l.contains("mov x0, #5")));
    }

    #[test]
    fn large_positive_uses_movz_movk_chain() {
        let mut asm = Vec::new();
        push_literal(&mut asm, 0x1_0002_0003);
        assert!(asm.iter().any(|l| l.contains("movz")));
        assert!(asm.iter().any(|l| l.contains("lsl #16")));
        assert!(asm.iter().any(|l| l.contains("lsl #32")));
    }

    #[test]
    fn small_negative_uses_plain_mov() {
        let mut asm = Vec::new();
        push_literal(&mut asm, -5);
        assert!(asm.iter().any(|l| l.contains("mov x0, #-5")));
    }

    #[test]
    fn large_negative_uses_movn_chain() {
        let mut asm = Vec::new();
        push_literal(&mut asm, -0x1_0002_0003);
        assert!(asm.iter().any(|l| l.contains("movn")));
    }

    #[test]
    fn buffer_address_uses_target_specific_addressing() {
        use crate::backend::Target;

        let mut hosted_asm = Vec::new();
        let mut hosted_data = Vec::new();
        push_buffer(&mut hosted_asm, &mut hosted_data, Target::Arm64, "buf_0", &[72, 73]);
        assert!(hosted_asm.iter().any(|l| l.contains("buf_0@PAGEOFF")));
        assert!(!hosted_asm.iter().any(|l| l.contains(":lo12:")));

        let mut bare_asm = Vec::new();
        let mut bare_data = Vec::new();
        push_buffer(&mut bare_asm, &mut bare_data, Target::Arm64Baremetal, "buf_0", &[72, 73]);
        assert!(bare_asm.iter().any(|l| l.contains(":lo12:buf_0")));
    }
}
