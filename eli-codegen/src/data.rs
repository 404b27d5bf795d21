/// The static memory map shared by both native targets. Mirrored from the
/// fixed-size regions the reference assembly backends lay out in `.data`.
pub const OPERAND_STACK_BYTES: u32 = 8192;
pub const MEMORY_SLOTS: u32 = 10_000;
pub const MEMORY_BYTES: u32 = MEMORY_SLOTS * 8;
/// Slots 1 and 2 (bytes 8 and 16) are reserved for the call-stack pointer
/// and call-depth counter; the array heap begins right after the region a
/// plain `T`/`F` program could address.
pub const ARRAY_HEAP_OFFSET: u32 = 40_000;
pub const CALL_STACK_FRAMES: u32 = 1000;
pub const CALL_STACK_BYTES: u32 = CALL_STACK_FRAMES * 16;
pub const PRINT_BUFFER_BYTES: u32 = 32;

/// PL011-compatible UART on QEMU's `virt` machine, used only by the
/// bare-metal target.
pub const UART_BASE: u32 = 0x0900_0000;
pub const UART_FLAG_OFFSET: u32 = 0x18;
pub const UART_TXFF_BIT: u32 = 5;
pub const UART_RXFE_BIT: u32 = 4;

/// Load address for the bare-metal ELF image.
pub const BAREMETAL_LOAD_ADDRESS: u32 = 0x4000_0000;

/// Emits the `.data` region common to both targets: operand stack, memory
/// (with call-stack metadata living at its first two slots), array heap
/// headroom, call-stack frames, and the integer-formatting scratch buffer.
pub fn emit_data_section(asm: &mut Vec<String>) {
    asm.push(".data".to_string());
    asm.push("stack_storage:".to_string());
    asm.push(format!("    .space {}", OPERAND_STACK_BYTES));
    asm.push(String::new());
    asm.push("memory_storage:".to_string());
    asm.push(format!(
        "    .space {}  // slots 1 and 2 hold call-stack pointer and depth",
        MEMORY_BYTES
    ));
    asm.push(String::new());
    asm.push("print_buffer:".to_string());
    asm.push(format!("    .space {}", PRINT_BUFFER_BYTES));
    asm.push(String::new());
    asm.push("call_stack_storage:".to_string());
    asm.push(format!(
        "    .space {}  // {} frames x 16 bytes",
        CALL_STACK_BYTES, CALL_STACK_FRAMES
    ));
    asm.push(String::new());
}
