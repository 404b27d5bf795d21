use eli::token::Token;

use crate::addressing::load_label_address;
use crate::backend::Target;
use crate::data::{self, OPERAND_STACK_BYTES};
use crate::jump_table;
use crate::literal;
use crate::opcodes;

/// Lowers a tokenized ELI program to a complete ARM64 assembly unit for
/// `target`: header, static data (stack/memory/call-stack/print-buffer
/// regions plus any buffer-literal data and the jump table), the per-token
/// text, the shared exit path, and the target's runtime helpers.
pub fn generate_assembly(tokens: &[Token], target: Target) -> String {
    let mut asm = Vec::new();
    let mut buffer_data = Vec::new();

    asm.push(".global _start".to_string());
    asm.push(".align 4".to_string());
    asm.push(String::new());

    data::emit_data_section(&mut asm);
    jump_table::emit_jump_table(&mut asm, tokens.len());

    asm.push(".text".to_string());
    asm.push("_start:".to_string());
    emit_entry(&mut asm, target);

    for (i, token) in tokens.iter().enumerate() {
        asm.push(format!(".token_{}:", i));
        match token {
            Token::Lit(value) => literal::push_literal(&mut asm, *value),
            Token::Buffer(elements) => {
                let label = format!("buf_{}", i);
                literal::push_buffer(&mut asm, &mut buffer_data, target, &label, elements);
            }
            Token::Op(op) => opcodes::emit_op(&mut asm, target, *op, i, tokens.len()),
        }
    }

    emit_exit(&mut asm, target);
    crate::helpers::emit_helpers(&mut asm, target);

    if !buffer_data.is_empty() {
        asm.push(".data".to_string());
        asm.extend(buffer_data);
    }

    asm.join("\n") + "\n"
}

/// Initializes the fixed register scheme: `x19` operand-stack pointer,
/// `x18` operand-stack base, `x24` memory base, `x25` array-heap bump
/// pointer (seeded past the `[call-stack ptr, call-depth]` slots and the
/// plain-memory region, at the fixed `ARRAY_HEAP_OFFSET`), and the call-stack
/// pointer/depth counter stored at memory offsets 8 and 16. Bare metal also
/// sets up a real CPU `sp` (the hosted Mach-O loader already provides one).
fn emit_entry(asm: &mut Vec<String>, target: Target) {
    asm.push("    // Initialize ELI operand stack".to_string());
    for line in load_label_address(target, "stack_storage", "x19") {
        asm.push(line);
    }
    asm.push(String::new());

    if target == Target::Arm64Baremetal {
        asm.push("    // Initialize the CPU stack pointer for bl/ret".to_string());
        for line in load_label_address(target, "stack_storage", "x0") {
            asm.push(line);
        }
        asm.push(format!("    add x0, x0, #{}", OPERAND_STACK_BYTES));
        asm.push("    mov sp, x0".to_string());
        asm.push(String::new());
    }

    asm.push("    // Initialize memory base".to_string());
    for line in load_label_address(target, "memory_storage", "x24") {
        asm.push(line);
    }
    asm.push(String::new());

    asm.push("    // Initialize array-heap bump pointer".to_string());
    for line in load_label_address(target, "memory_storage", "x25") {
        asm.push(line);
    }
    asm.push(format!("    mov w0, #{}", data::ARRAY_HEAP_OFFSET));
    asm.push("    add x25, x25, x0".to_string());
    asm.push(String::new());

    asm.push("    // Save operand-stack base pointer (restored on Q)".to_string());
    asm.push("    mov x18, x19".to_string());
    asm.push(String::new());

    asm.push("    // Initialize call stack".to_string());
    for line in load_label_address(target, "call_stack_storage", "x20") {
        asm.push(line);
    }
    asm.push("    str x20, [x24, #8]".to_string());
    asm.push("    mov x21, #0".to_string());
    asm.push("    str x21, [x24, #16]".to_string());
    asm.push(String::new());
}

/// The shared exit path: the syscall/halt sequence itself never touches
/// `x0`, so every caller (the `H` opcode, a bad jump, a call/return
/// over/underflow) sets the exit status explicitly before branching here.
fn emit_exit(asm: &mut Vec<String>, target: Target) {
    asm.push(String::new());
    asm.push("exit_program:".to_string());
    match target {
        Target::Arm64 => {
            asm.push("    mov x16, #1".to_string());
            asm.push("    svc #0x80".to_string());
        }
        Target::Arm64Baremetal => {
            asm.push(".halt_loop:".to_string());
            asm.push("    wfi".to_string());
            asm.push("    b .halt_loop".to_string());
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use eli::tokenizer::tokenize;

    #[test]
    fn emits_jump_table_sized_to_token_count() {
        let tokens = tokenize("2 3 A P H").unwrap();
        let asm = generate_assembly(&tokens, Target::Arm64);
        assert_eq!(asm.matches(".quad .token_").count(), tokens.len());
    }

    #[test]
    fn hosted_and_baremetal_differ_in_io_helper_names() {
        let tokens = tokenize("5 P H").unwrap();
        let hosted = generate_assembly(&tokens, Target::Arm64);
        let baremetal = generate_assembly(&tokens, Target::Arm64Baremetal);
        assert!(hosted.contains("bl print_int"));
        assert!(baremetal.contains("bl uart_print_int"));
    }

    #[test]
    fn labels_every_token() {
        let tokens = tokenize("1 2 A P H").unwrap();
        let asm = generate_assembly(&tokens, Target::Arm64);
        for i in 0..tokens.len() {
            assert!(asm.contains(&format!(".token_{}:", i)));
        }
    }

    #[test]
    fn buffer_literal_emits_data_block_and_push() {
        let tokens = tokenize("\"HI\"").unwrap();
        let asm = generate_assembly(&tokens, Target::Arm64);
        assert!(asm.contains("buf_0:"));
        assert!(asm.contains("    .quad 2"));
    }
}
