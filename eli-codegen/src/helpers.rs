use crate::addressing::load_label_address;
use crate::backend::Target;

/// Emits the runtime helper routines a target's I/O opcodes `bl` into.
/// Hosted uses Darwin syscalls (`svc #0x80`) against stdin/stdout; bare-metal
/// polls the PL011 UART directly. Both share the same decimal
/// formatting/parsing algorithm (repeated divide-by-ten / accumulate digit).
pub fn emit_helpers(asm: &mut Vec<String>, target: Target) {
    match target {
        Target::Arm64 => emit_hosted_helpers(asm),
        Target::Arm64Baremetal => emit_uart_helpers(asm),
    }
}

fn emit_hosted_helpers(asm: &mut Vec<String>) {
    asm.push(String::new());
    asm.push("// Helper: print the signed decimal integer in x0, then a newline".to_string());
    asm.push("print_int:".to_string());
    asm.push("    stp x29, x30, [sp, #-16]!".to_string());
    asm.push("    mov x29, sp".to_string());
    for line in load_label_address(Target::Arm64, "print_buffer", "x10") {
        asm.push(line);
    }
    asm.push("    add x10, x10, #31".to_string());
    asm.push("    mov x11, #0".to_string());
    asm.push("    strb w11, [x10]".to_string());
    asm.push("    mov x12, #0".to_string());
    asm.push("    cmp x0, #0".to_string());
    asm.push("    bge .Lprint_int_positive".to_string());
    asm.push("    mov x12, #1".to_string());
    asm.push("    neg x0, x0".to_string());
    asm.push(".Lprint_int_positive:".to_string());
    asm.push("    mov x13, #10".to_string());
    asm.push(".Lprint_int_convert:".to_string());
    asm.push("    udiv x1, x0, x13".to_string());
    asm.push("    msub x2, x1, x13, x0".to_string());
    asm.push("    add x2, x2, #48".to_string());
    asm.push("    sub x10, x10, #1".to_string());
    asm.push("    strb w2, [x10]".to_string());
    asm.push("    mov x0, x1".to_string());
    asm.push("    cbnz x0, .Lprint_int_convert".to_string());
    asm.push("    cbz x12, .Lprint_int_emit".to_string());
    asm.push("    mov x2, #45".to_string());
    asm.push("    sub x10, x10, #1".to_string());
    asm.push("    strb w2, [x10]".to_string());
    asm.push(".Lprint_int_emit:".to_string());
    for line in load_label_address(Target::Arm64, "print_buffer", "x11") {
        asm.push(line);
    }
    asm.push("    add x11, x11, #31".to_string());
    asm.push("    sub x2, x11, x10".to_string());
    asm.push("    mov w13, #10".to_string());
    asm.push("    strb w13, [x11]".to_string());
    asm.push("    add x2, x2, #1".to_string());
    asm.push("    mov x0, #1".to_string());
    asm.push("    mov x1, x10".to_string());
    asm.push("    mov x16, #4".to_string());
    asm.push("    svc #0x80".to_string());
    asm.push("    ldp x29, x30, [sp], #16".to_string());
    asm.push("    ret".to_string());
    asm.push(String::new());

    asm.push("// Helper: read a signed decimal integer line from stdin into x0".to_string());
    asm.push("read_int:".to_string());
    asm.push("    stp x29, x30, [sp, #-16]!".to_string());
    asm.push("    mov x29, sp".to_string());
    asm.push("    sub sp, sp, #32".to_string());
    asm.push("    mov x0, #0".to_string());
    asm.push("    mov x1, sp".to_string());
    asm.push("    mov x2, #31".to_string());
    asm.push("    mov x16, #3".to_string());
    asm.push("    svc #0x80".to_string());
    asm.push("    mov x10, sp".to_string());
    asm.push("    mov x11, #0".to_string());
    asm.push("    mov x12, #0".to_string());
    asm.push("    ldrb w13, [x10]".to_string());
    asm.push("    cmp w13, #45".to_string());
    asm.push("    b.ne .Lread_int_digits".to_string());
    asm.push("    mov x12, #1".to_string());
    asm.push("    add x10, x10, #1".to_string());
    asm.push(".Lread_int_digits:".to_string());
    asm.push("    ldrb w13, [x10], #1".to_string());
    asm.push("    cmp w13, #10".to_string());
    asm.push("    b.eq .Lread_int_done".to_string());
    asm.push("    cmp w13, #48".to_string());
    asm.push("    b.lt .Lread_int_done".to_string());
    asm.push("    cmp w13, #57".to_string());
    asm.push("    b.gt .Lread_int_done".to_string());
    asm.push("    sub w13, w13, #48".to_string());
    asm.push("    mov x14, #10".to_string());
    asm.push("    mul x11, x11, x14".to_string());
    asm.push("    add x11, x11, x13".to_string());
    asm.push("    b .Lread_int_digits".to_string());
    asm.push(".Lread_int_done:".to_string());
    asm.push("    cmp x12, #0".to_string());
    asm.push("    b.eq .Lread_int_return".to_string());
    asm.push("    neg x11, x11".to_string());
    asm.push(".Lread_int_return:".to_string());
    asm.push("    mov x0, x11".to_string());
    asm.push("    add sp, sp, #32".to_string());
    asm.push("    ldp x29, x30, [sp], #16".to_string());
    asm.push("    ret".to_string());
    asm.push(String::new());

    asm.push("// Helper: read a single byte from stdin into x0".to_string());
    asm.push("read_char:".to_string());
    asm.push("    stp x29, x30, [sp, #-16]!".to_string());
    asm.push("    mov x29, sp".to_string());
    asm.push("    sub sp, sp, #16".to_string());
    asm.push("    mov x0, #0".to_string());
    asm.push("    mov x1, sp".to_string());
    asm.push("    mov x2, #1".to_string());
    asm.push("    mov x16, #3".to_string());
    asm.push("    svc #0x80".to_string());
    asm.push("    ldrb w0, [sp]".to_string());
    asm.push("    add sp, sp, #16".to_string());
    asm.push("    ldp x29, x30, [sp], #16".to_string());
    asm.push("    ret".to_string());
    asm.push(String::new());

    asm.push("// Helper: write the single byte in x0 to stdout".to_string());
    asm.push("print_char:".to_string());
    asm.push("    stp x29, x30, [sp, #-16]!".to_string());
    asm.push("    mov x29, sp".to_string());
    asm.push("    sub sp, sp, #16".to_string());
    asm.push("    strb w0, [sp]".to_string());
    asm.push("    mov x0, #1".to_string());
    asm.push("    mov x1, sp".to_string());
    asm.push("    mov x2, #1".to_string());
    asm.push("    mov x16, #4".to_string());
    asm.push("    svc #0x80".to_string());
    asm.push("    add sp, sp, #16".to_string());
    asm.push("    ldp x29, x30, [sp], #16".to_string());
    asm.push("    ret".to_string());
    asm.push(String::new());
}

fn emit_uart_helpers(asm: &mut Vec<String>) {
    asm.push(String::new());
    asm.push("// ==== Bare-metal helpers: PL011 UART at 0x09000000 ====".to_string());
    asm.push(String::new());

    asm.push("uart_print_int:".to_string());
    asm.push("    stp x29, x30, [sp, #-16]!".to_string());
    asm.push("    mov x29, sp".to_string());
    asm.push("    cmp x0, #0".to_string());
    asm.push("    bge .Luart_print_int_positive".to_string());
    asm.push("    mov x10, #0x09000000".to_string());
    asm.push("    mov w11, #45".to_string());
    asm.push(".Luart_wait_tx_minus:".to_string());
    asm.push("    ldr w14, [x10, #0x18]".to_string());
    asm.push("    tbnz w14, #5, .Luart_wait_tx_minus".to_string());
    asm.push("    strb w11, [x10]".to_string());
    asm.push("    neg x0, x0".to_string());
    asm.push(".Luart_print_int_positive:".to_string());
    for line in load_label_address(Target::Arm64Baremetal, "print_buffer", "x12") {
        asm.push(line);
    }
    asm.push("    mov x13, #0".to_string());
    asm.push(".Luart_print_int_convert:".to_string());
    asm.push("    mov x1, #10".to_string());
    asm.push("    udiv x2, x0, x1".to_string());
    asm.push("    msub x3, x2, x1, x0".to_string());
    asm.push("    add w3, w3, #48".to_string());
    asm.push("    strb w3, [x12, x13]".to_string());
    asm.push("    add x13, x13, #1".to_string());
    asm.push("    mov x0, x2".to_string());
    asm.push("    cbnz x0, .Luart_print_int_convert".to_string());
    asm.push("    mov x10, #0x09000000".to_string());
    asm.push(".Luart_print_int_emit:".to_string());
    asm.push("    sub x13, x13, #1".to_string());
    asm.push("    ldrb w11, [x12, x13]".to_string());
    asm.push(".Luart_wait_tx_digit:".to_string());
    asm.push("    ldr w14, [x10, #0x18]".to_string());
    asm.push("    tbnz w14, #5, .Luart_wait_tx_digit".to_string());
    asm.push("    strb w11, [x10]".to_string());
    asm.push("    cmp x13, #0".to_string());
    asm.push("    bne .Luart_print_int_emit".to_string());
    asm.push("    mov w11, #10".to_string());
    asm.push(".Luart_wait_tx_newline:".to_string());
    asm.push("    ldr w14, [x10, #0x18]".to_string());
    asm.push("    tbnz w14, #5, .Luart_wait_tx_newline".to_string());
    asm.push("    strb w11, [x10]".to_string());
    asm.push("    ldp x29, x30, [sp], #16".to_string());
    asm.push("    ret".to_string());
    asm.push(String::new());

    asm.push("uart_print_char:".to_string());
    asm.push("    stp x29, x30, [sp, #-16]!".to_string());
    asm.push("    mov x29, sp".to_string());
    asm.push("    mov x10, #0x09000000".to_string());
    asm.push(".Luart_wait_tx_char:".to_string());
    asm.push("    ldr w14, [x10, #0x18]".to_string());
    asm.push("    tbnz w14, #5, .Luart_wait_tx_char".to_string());
    asm.push("    strb w0, [x10]".to_string());
    asm.push("    ldp x29, x30, [sp], #16".to_string());
    asm.push("    ret".to_string());
    asm.push(String::new());

    asm.push("uart_read_char:".to_string());
    asm.push("    stp x29, x30, [sp, #-16]!".to_string());
    asm.push("    mov x29, sp".to_string());
    asm.push("    mov x10, #0x09000000".to_string());
    asm.push(".Luart_wait_rx_char:".to_string());
    asm.push("    ldr w11, [x10, #0x18]".to_string());
    asm.push("    tbnz w11, #4, .Luart_wait_rx_char".to_string());
    asm.push("    ldrb w0, [x10]".to_string());
    asm.push("    ldp x29, x30, [sp], #16".to_string());
    asm.push("    ret".to_string());
    asm.push(String::new());

    asm.push("uart_read_int:".to_string());
    asm.push("    stp x29, x30, [sp, #-16]!".to_string());
    asm.push("    mov x29, sp".to_string());
    asm.push("    mov x0, #0".to_string());
    asm.push("    mov x15, #0".to_string());
    asm.push("    mov x10, #0x09000000".to_string());
    asm.push(".Luart_read_first:".to_string());
    asm.push("    ldr w11, [x10, #0x18]".to_string());
    asm.push("    tbnz w11, #4, .Luart_read_first".to_string());
    asm.push("    ldrb w1, [x10]".to_string());
    asm.push("    cmp w1, #45".to_string());
    asm.push("    bne .Luart_read_first_digit".to_string());
    asm.push("    mov x15, #1".to_string());
    asm.push("    b .Luart_read_digits".to_string());
    asm.push(".Luart_read_first_digit:".to_string());
    asm.push("    sub w1, w1, #48".to_string());
    asm.push("    mov x0, x1".to_string());
    asm.push(".Luart_read_digits:".to_string());
    asm.push("    ldr w11, [x10, #0x18]".to_string());
    asm.push("    tbnz w11, #4, .Luart_read_digits".to_string());
    asm.push("    ldrb w1, [x10]".to_string());
    asm.push("    cmp w1, #10".to_string());
    asm.push("    beq .Luart_read_done".to_string());
    asm.push("    cmp w1, #13".to_string());
    asm.push("    beq .Luart_read_done".to_string());
    asm.push("    sub w1, w1, #48".to_string());
    asm.push("    mov x2, #10".to_string());
    asm.push("    mul x0, x0, x2".to_string());
    asm.push("    add x0, x0, x1".to_string());
    asm.push("    b .Luart_read_digits".to_string());
    asm.push(".Luart_read_done:".to_string());
    asm.push("    cbz x15, .Luart_read_return".to_string());
    asm.push("    neg x0, x0".to_string());
    asm.push(".Luart_read_return:".to_string());
    asm.push("    ldp x29, x30, [sp], #16".to_string());
    asm.push("    ret".to_string());
    asm.push(String::new());
}
