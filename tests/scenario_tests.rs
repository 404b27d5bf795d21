//! Top-level scenario tests exercising the public `eli` API end to end,
//! rather than a single module's internals. Mirrors the concrete scenario
//! corpus and boundary cases from the expanded specification.

use eli::io::TestIo;
use eli::tokenizer::tokenize;
use eli::vm::Vm;
use eli::{interpreter, run_source, Error};

fn output_of(source: &str) -> String {
    let mut io = TestIo::new();
    run_source(source, &mut io).unwrap();
    io.output
}

#[test]
fn scenario_add_and_print() {
    assert_eq!(output_of("2 3 A P H"), "5\n");
}

#[test]
fn scenario_divide_and_print() {
    assert_eq!(output_of("10 2 D P H"), "5\n");
}

#[test]
fn scenario_divide_by_zero_is_fatal() {
    let mut io = TestIo::new();
    assert_eq!(run_source("5 0 D", &mut io), Err(Error::DivideByZero));
}

#[test]
fn scenario_memory_roundtrip_on_unset_default() {
    assert_eq!(output_of("0 1 T 1 F P H"), "0\n");
}

#[test]
fn scenario_counted_loop_sums_one_to_one_thousand() {
    let program = "0 1001 T 1 1002 T \
        1001 F 1002 F A 1001 T \
        1002 F 1 A 1002 T \
        1002 F 1001 s -18 N \
        1001 F P H";
    assert_eq!(output_of(program), "500500\n");
}

#[test]
fn scenario_buffer_store_and_read_back() {
    let program = "\"HI\" 0 S 0 B U 0 g P 1 g P H";
    assert_eq!(output_of(program), "72\n73\n");
}

#[test]
fn boundary_empty_program_halts_with_empty_stack() {
    let tokens = tokenize("").unwrap();
    let mut vm = Vm::new(tokens);
    let mut io = TestIo::new();
    interpreter::run(&mut vm, &mut io).unwrap();
    assert!(vm.operand_stack.is_empty());
}

#[test]
fn boundary_modulo_by_zero_is_fatal() {
    let mut io = TestIo::new();
    assert_eq!(run_source("5 0 X", &mut io), Err(Error::DivideByZero));
}

#[test]
fn boundary_shift_by_zero_is_identity() {
    assert_eq!(output_of("7 0 < P H"), "7\n");
    assert_eq!(output_of("7 0 > P H"), "7\n");
}

#[test]
fn boundary_over_on_two_element_stack_duplicates_lower() {
    assert_eq!(output_of("1 2 Y P P P H"), "1\n2\n1\n");
}

#[test]
fn boundary_over_on_fewer_than_two_fails() {
    let mut io = TestIo::new();
    assert_eq!(run_source("1 Y", &mut io), Err(Error::StackUnderflow { op: 'Y' }));
}

#[test]
fn boundary_rot_requires_exactly_three() {
    let mut io = TestIo::new();
    assert_eq!(run_source("1 2 R", &mut io), Err(Error::StackUnderflow { op: 'R' }));
}

#[test]
fn boundary_return_without_matching_call_fails() {
    let mut io = TestIo::new();
    assert_eq!(run_source("0 Q", &mut io), Err(Error::CallStackUnderflow));
}

#[test]
fn property_call_return_net_stack_change_is_plus_one() {
    // Token layout: 100 200 2 C H 1 U A Q
    //                 0   1 2 3 4 5 6 7 8
    // `100 200` simulates the caller's own stack, untouched by convention;
    // `C` at token 3 calls token 5, whose body pushes and pops its own
    // scratch value (`1 U A`) before `Q`. Regardless of those internal
    // pushes/pops, the net effect of call+return must be exactly one value
    // landing above the caller's own two.
    let program = "100 200 2 C H 1 U A Q";
    let mut io = TestIo::new();
    let tokens = tokenize(program).unwrap();
    let mut vm = Vm::new(tokens);
    interpreter::run(&mut vm, &mut io).unwrap();
    assert_eq!(vm.operand_stack.len(), 3);
}

#[test]
fn property_jump_composability_lands_on_token_plus_offset() {
    // Tokens: [0]=Lit 0  [1]=Lit 3  [2]=J  [3]=Lit 99  [4]=H  [5]=Lit 1  [6]=P  [7]=H.
    // `J` sits at token index 2 and pops offset 3, landing on token 2 + 3 =
    // 5, skipping the dead `99 H` pair entirely.
    let tokens = tokenize("0 3 J 99 H 1 P H").unwrap();
    let mut vm = Vm::new(tokens);
    let mut io = TestIo::new();
    interpreter::run(&mut vm, &mut io).unwrap();
    assert_eq!(io.output, "1\n");
}

#[test]
fn property_array_build_and_index_round_trip() {
    assert_eq!(output_of("10 20 30 3 a l P H"), "3\n");
    assert_eq!(output_of("10 20 30 3 a 0 g P H"), "10\n");
    assert_eq!(output_of("10 20 30 3 a 2 g P H"), "30\n");
}

#[test]
fn property_array_index_out_of_range_is_fatal() {
    let mut io = TestIo::new();
    let err = run_source("10 20 1 a 5 g", &mut io).unwrap_err();
    assert!(matches!(err, Error::ArrayIndexOutOfRange { .. }));
}

#[test]
fn property_jump_target_out_of_range_is_bad_jump() {
    let mut io = TestIo::new();
    let err = run_source("-5 J", &mut io).unwrap_err();
    assert!(matches!(err, Error::BadJump(_)));
}

#[test]
fn io_read_int_and_char_round_trip_through_stack() {
    let mut io = TestIo::with_ints(vec![7]);
    io.input_chars.push_back('A' as i64);
    let program = "I 1 A P K O H";
    let tokens = tokenize(program).unwrap();
    let mut vm = Vm::new(tokens);
    interpreter::run(&mut vm, &mut io).unwrap();
    assert_eq!(io.output, "8\nA");
}

#[test]
fn scenario_cas_succeeds_when_expected_value_matches() {
    // mem[5] = 10, then `$` with new=20 old=10 addr=5: old matches, so the
    // swap succeeds (pushes 1) and mem[5] becomes 20.
    let program = "10 5 T 20 10 5 $ P 5 F P H";
    assert_eq!(output_of(program), "1\n20\n");
}

#[test]
fn scenario_cas_fails_when_expected_value_does_not_match() {
    // mem[5] = 10, then `$` with new=20 old=99 addr=5: old doesn't match the
    // current value, so the swap fails (pushes 0) and mem[5] is untouched.
    let program = "10 5 T 20 99 5 $ P 5 F P H";
    assert_eq!(output_of(program), "0\n10\n");
}

#[test]
fn scenario_tas_returns_old_value_and_writes_one() {
    // mem[7] = 42, then `%` on addr 7 returns the old value (42) and leaves
    // mem[7] set to 1.
    let program = "42 7 T 7 % P 7 F P H";
    assert_eq!(output_of(program), "42\n1\n");
}

#[test]
fn scenario_fence_has_no_operand_effect() {
    let program = "9 = P H";
    assert_eq!(output_of(program), "9\n");
}
