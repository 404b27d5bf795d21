use crate::error::Error;
use crate::io::Io;
use crate::token::{resolve_jump, Op, Token};
use crate::value::Value;
use crate::vm::{Frame, Vm, MAX_CALL_DEPTH};

enum Step {
    Continue,
    Halt,
}

/// Runs `vm` to completion, driving the program counter over its token
/// stream until `H` is reached or an opcode fails.
pub fn run(vm: &mut Vm, io: &mut dyn Io) -> Result<(), Error> {
    loop {
        if vm.pc >= vm.tokens.len() {
            return Ok(());
        }
        match step(vm, io)? {
            Step::Continue => continue,
            Step::Halt => return Ok(()),
        }
    }
}

/// Like [`run`], but calls `on_step` with the current token index, the
/// token about to execute, and a snapshot of the operand stack before each
/// step. This is the interpreter's half of the debug trace surface (the
/// other half is the compiler's `-d` flag echoing its token-to-opcode
/// mapping); nothing here changes the program's observable output.
pub fn run_traced(
    vm: &mut Vm,
    io: &mut dyn Io,
    mut on_step: impl FnMut(usize, &Token, &[Value]),
) -> Result<(), Error> {
    loop {
        if vm.pc >= vm.tokens.len() {
            return Ok(());
        }
        on_step(vm.pc, &vm.tokens[vm.pc], &vm.operand_stack);
        match step(vm, io)? {
            Step::Continue => continue,
            Step::Halt => return Ok(()),
        }
    }
}

fn step(vm: &mut Vm, io: &mut dyn Io) -> Result<Step, Error> {
    let token = vm.tokens[vm.pc].clone();
    match token {
        Token::Lit(n) => {
            vm.operand_stack.push(Value::Integer(n));
            vm.pc += 1;
            Ok(Step::Continue)
        }
        Token::Buffer(elements) => {
            let handle = vm.arrays.alloc(elements);
            vm.operand_stack.push(Value::ArrayRef(handle));
            vm.pc += 1;
            Ok(Step::Continue)
        }
        Token::Op(op) => execute(vm, io, op),
    }
}

fn pop(vm: &mut Vm, op: char) -> Result<Value, Error> {
    vm.operand_stack.pop().ok_or(Error::StackUnderflow { op })
}

fn pop_int(vm: &mut Vm, op: char) -> Result<i64, Error> {
    pop(vm, op)?.as_integer(op)
}

fn pop_addr(vm: &mut Vm, op: char) -> Result<i64, Error> {
    let addr = pop_int(vm, op)?;
    if addr < 0 {
        return Err(Error::NegativeAddress(addr));
    }
    Ok(addr)
}

fn execute(vm: &mut Vm, io: &mut dyn Io, op: Op) -> Result<Step, Error> {
    let c = op.as_char();
    match op {
        Op::Add => binary_int(vm, c, |a, b| Ok(a.wrapping_add(b)))?,
        Op::Sub => binary_int(vm, c, |a, b| Ok(a.wrapping_sub(b)))?,
        Op::Mul => binary_int(vm, c, |a, b| Ok(a.wrapping_mul(b)))?,
        Op::Div => binary_int(vm, c, |a, b| {
            if b == 0 {
                Err(Error::DivideByZero)
            } else {
                Ok(a.wrapping_div(b))
            }
        })?,
        Op::Mod => binary_int(vm, c, |a, b| {
            if b == 0 {
                Err(Error::DivideByZero)
            } else {
                Ok(a.wrapping_rem(b))
            }
        })?,

        Op::ArrayBuild => {
            let n = pop_int(vm, c)?;
            if n < 0 || vm.operand_stack.len() < n as usize {
                return Err(Error::StackUnderflow { op: c });
            }
            let start = vm.operand_stack.len() - n as usize;
            let mut elements = Vec::with_capacity(n as usize);
            for value in vm.operand_stack.drain(start..) {
                elements.push(value.as_integer(c)?);
            }
            let handle = vm.arrays.alloc(elements);
            vm.operand_stack.push(Value::ArrayRef(handle));
        }
        Op::ArrayLen => {
            let handle = pop(vm, c)?.as_array(c)?;
            vm.operand_stack.push(Value::Integer(vm.arrays.len(handle)));
        }
        Op::ArrayGet => {
            let index = pop_int(vm, c)?;
            let handle = pop(vm, c)?.as_array(c)?;
            let value = vm
                .arrays
                .get(handle, index)
                .ok_or(Error::ArrayIndexOutOfRange {
                    index,
                    len: vm.arrays.len(handle),
                })?;
            vm.operand_stack.push(Value::Integer(value));
        }

        Op::Eq => binary_int(vm, c, |a, b| Ok((a == b) as i64))?,
        Op::Gt => binary_int(vm, c, |a, b| Ok((a > b) as i64))?,
        Op::Lt => binary_int(vm, c, |a, b| Ok((a < b) as i64))?,

        Op::Not => {
            let a = pop_int(vm, c)?;
            vm.operand_stack.push(Value::Integer((a == 0) as i64));
        }
        Op::And => binary_int(vm, c, |a, b| Ok(a & b))?,
        Op::Or => binary_int(vm, c, |a, b| Ok(a | b))?,
        Op::Xor => binary_int(vm, c, |a, b| Ok(a ^ b))?,
        Op::BitNot => {
            let a = pop_int(vm, c)?;
            vm.operand_stack.push(Value::Integer(!a));
        }
        Op::Shl => binary_int(vm, c, |a, b| shift(a, b, true))?,
        Op::Shr => binary_int(vm, c, |a, b| shift(a, b, false))?,

        Op::Dup => {
            let a = *vm.operand_stack.last().ok_or(Error::StackUnderflow { op: c })?;
            vm.operand_stack.push(a);
        }
        Op::Swap => {
            let b = pop(vm, c)?;
            let a = pop(vm, c)?;
            vm.operand_stack.push(b);
            vm.operand_stack.push(a);
        }
        Op::Drop => {
            pop(vm, c)?;
        }
        Op::Over => {
            let len = vm.operand_stack.len();
            if len < 2 {
                return Err(Error::StackUnderflow { op: c });
            }
            let a = vm.operand_stack[len - 2];
            vm.operand_stack.push(a);
        }
        Op::Rot => {
            let len = vm.operand_stack.len();
            if len < 3 {
                return Err(Error::StackUnderflow { op: c });
            }
            let a = vm.operand_stack.remove(len - 3);
            vm.operand_stack.push(a);
        }

        Op::Store => {
            let addr = pop_addr(vm, c)?;
            let val = pop(vm, c)?;
            vm.memory.store(addr, val);
        }
        Op::Load => {
            let addr = pop_addr(vm, c)?;
            vm.operand_stack.push(vm.memory.load(addr));
        }
        Op::PtrAdd => binary_int(vm, c, |p, o| Ok(p.wrapping_add(o)))?,
        Op::PtrSub => binary_int(vm, c, |p, o| Ok(p.wrapping_sub(o)))?,
        Op::ReadBuffer => {
            let addr = pop_addr(vm, c)?;
            let handle = match vm.memory.load(addr) {
                Value::ArrayRef(handle) => handle,
                Value::Integer(scalar) => vm.arrays.alloc_scalar(scalar),
            };
            vm.operand_stack.push(Value::ArrayRef(handle));
        }
        Op::SetBuffer => {
            let addr = pop_addr(vm, c)?;
            let handle = pop(vm, c)?.as_array(c)?;
            vm.memory.store(addr, Value::ArrayRef(handle));
        }

        Op::Cas => {
            let addr = pop_addr(vm, c)?;
            let old = pop_int(vm, c)?;
            let new = pop_int(vm, c)?;
            let current = vm.memory.load(addr).as_integer(c)?;
            if current == old {
                vm.memory.store(addr, Value::Integer(new));
                vm.operand_stack.push(Value::Integer(1));
            } else {
                vm.operand_stack.push(Value::Integer(0));
            }
        }
        Op::Tas => {
            let addr = pop_addr(vm, c)?;
            let old = vm.memory.load(addr).as_integer(c)?;
            vm.memory.store(addr, Value::Integer(1));
            vm.operand_stack.push(Value::Integer(old));
        }
        Op::Fence => {}

        Op::Jump => {
            let offset = pop_int(vm, c)?;
            vm.pc = resolve_jump(vm.pc, offset, vm.tokens.len())?;
            return Ok(Step::Continue);
        }
        Op::JumpZero => {
            let offset = pop_int(vm, c)?;
            let val = pop_int(vm, c)?;
            if val == 0 {
                vm.pc = resolve_jump(vm.pc, offset, vm.tokens.len())?;
            } else {
                vm.pc += 1;
            }
            return Ok(Step::Continue);
        }
        Op::JumpNonZero => {
            let offset = pop_int(vm, c)?;
            let val = pop_int(vm, c)?;
            if val != 0 {
                vm.pc = resolve_jump(vm.pc, offset, vm.tokens.len())?;
            } else {
                vm.pc += 1;
            }
            return Ok(Step::Continue);
        }
        Op::Halt => return Ok(Step::Halt),

        Op::Call => {
            let offset = pop_int(vm, c)?;
            if vm.call_stack.len() >= MAX_CALL_DEPTH {
                return Err(Error::CallStackOverflow);
            }
            let target = resolve_jump(vm.pc, offset, vm.tokens.len())?;
            vm.call_stack.push(Frame {
                return_index: vm.pc + 1,
                caller_depth: vm.operand_stack.len(),
            });
            vm.pc = target;
            return Ok(Step::Continue);
        }
        Op::Return => {
            let rv = pop(vm, c)?;
            let frame = vm.call_stack.pop().ok_or(Error::CallStackUnderflow)?;
            vm.operand_stack.truncate(frame.caller_depth);
            vm.operand_stack.push(rv);
            vm.pc = frame.return_index;
            return Ok(Step::Continue);
        }

        Op::PrintInt => {
            let val = pop_int(vm, c)?;
            io.print_int(val);
        }
        Op::ReadInt => {
            let val = io.read_int()?;
            vm.operand_stack.push(Value::Integer(val));
        }
        Op::ReadChar => {
            let val = io.read_char()?;
            vm.operand_stack.push(Value::Integer(val));
        }
        Op::PrintChar => {
            let cp = pop_int(vm, c)?;
            io.print_char(cp)?;
        }
    }

    vm.pc += 1;
    Ok(Step::Continue)
}

fn binary_int(
    vm: &mut Vm,
    op: char,
    f: impl FnOnce(i64, i64) -> Result<i64, Error>,
) -> Result<(), Error> {
    let b = pop_int(vm, op)?;
    let a = pop_int(vm, op)?;
    vm.operand_stack.push(Value::Integer(f(a, b)?));
    Ok(())
}

/// Shifts of exactly 64 yield 0, matching the "defined as zero" option for
/// architectures whose native shift instruction would otherwise mask the
/// amount; shifts outside `[0, 64]` are rejected outright.
fn shift(a: i64, b: i64, left: bool) -> Result<i64, Error> {
    if !(0..=64).contains(&b) {
        return Err(Error::ShiftOutOfRange(b));
    }
    if b == 64 {
        return Ok(0);
    }
    Ok(if left {
        ((a as u64) << b) as i64
    } else {
        ((a as u64) >> b) as i64
    })
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::io::TestIo;
    use crate::tokenizer::tokenize;

    fn run_program(source: &str) -> TestIo {
        let mut io = TestIo::new();
        let tokens = tokenize(source).unwrap();
        let mut vm = Vm::new(tokens);
        run(&mut vm, &mut io).unwrap();
        io
    }

    fn run_program_with_io(source: &str, io: &mut TestIo) {
        let tokens = tokenize(source).unwrap();
        let mut vm = Vm::new(tokens);
        run(&mut vm, io).unwrap();
    }

    #[test]
    fn run_traced_visits_every_token_in_order() {
        let tokens = tokenize("2 3 A P H").unwrap();
        let mut vm = Vm::new(tokens);
        let mut io = TestIo::new();
        let mut visited = Vec::new();
        run_traced(&mut vm, &mut io, |pc, _token, _stack| visited.push(pc)).unwrap();
        assert_eq!(visited, vec![0, 1, 2, 3, 4]);
    }

    #[test]
    fn adds_and_prints() {
        let io = run_program("2 3 A P H");
        assert_eq!(io.output, "5\n");
    }

    #[test]
    fn divides_and_prints() {
        let io = run_program("10 2 D P H");
        assert_eq!(io.output, "5\n");
    }

    #[test]
    fn divide_by_zero_is_fatal() {
        let tokens = tokenize("5 0 D").unwrap();
        let mut vm = Vm::new(tokens);
        let mut io = TestIo::new();
        assert_eq!(run(&mut vm, &mut io), Err(Error::DivideByZero));
    }

    #[test]
    fn memory_round_trip() {
        let io = run_program("0 1 T 1 F P H");
        assert_eq!(io.output, "0\n");
    }

    #[test]
    fn counted_loop_sums_one_to_one_thousand() {
        // addr 1001: running total. addr 1002: loop counter, 1..1000 inclusive.
        // body: total += counter; counter += 1; loop while counter - 1001 != 0.
        let program = "0 1001 T 1 1002 T \
            1001 F 1002 F A 1001 T \
            1002 F 1 A 1002 T \
            1002 F 1001 s -18 N \
            1001 F P H";
        let io = run_program(program);
        assert_eq!(io.output, "500500\n");
    }

    #[test]
    fn buffer_round_trip() {
        // `g` consumes its array operand, so indexing the same buffer twice
        // duplicates the reference with `U` before the second index.
        let io = run_program("\"HI\" 0 S 0 B U 0 g P 1 g P H");
        assert_eq!(io.output, "72\n73\n");
    }

    #[test]
    fn scalar_coerces_to_single_element_array_on_read_buffer() {
        let io = run_program("7 1 T 1 B 0 g P H");
        assert_eq!(io.output, "7\n");
    }

    #[test]
    fn shift_by_64_yields_zero() {
        let io = run_program("1 64 < P H");
        assert_eq!(io.output, "0\n");
    }

    #[test]
    fn shift_by_65_is_out_of_range() {
        let tokens = tokenize("1 65 <").unwrap();
        let mut vm = Vm::new(tokens);
        let mut io = TestIo::new();
        assert_eq!(run(&mut vm, &mut io), Err(Error::ShiftOutOfRange(65)));
    }

    #[test]
    fn return_without_call_is_underflow() {
        let tokens = tokenize("0 Q").unwrap();
        let mut vm = Vm::new(tokens);
        let mut io = TestIo::new();
        assert_eq!(run(&mut vm, &mut io), Err(Error::CallStackUnderflow));
    }

    #[test]
    fn call_and_return_balance_the_operand_stack() {
        // C at token 2 calls token 4 (the function body), which doubles its
        // argument via U A and returns; H at token 3 is the call's return site.
        let program = "5 2 C H U A Q";
        let io = run_program(program);
        assert!(io.output.is_empty());
    }

    #[test]
    fn return_accepts_an_array_reference_without_type_mismatch() {
        // C at token 1 jumps to token 5, a subroutine that builds a 2-element
        // array and returns it (`rv --` is untyped, not `a b -- r`). The
        // caller takes its length to confirm the array survived the call.
        let program = "4 C l P H 10 20 2 a Q";
        let io = run_program(program);
        assert_eq!(io.output, "2\n");
    }

    #[test]
    fn out_of_range_jump_is_bad_jump() {
        let tokens = tokenize("100 J").unwrap();
        let mut vm = Vm::new(tokens);
        let mut io = TestIo::new();
        assert_eq!(run(&mut vm, &mut io), Err(Error::BadJump(101)));
    }

    #[test]
    fn reads_int_and_char_from_io() {
        let mut io = TestIo::with_ints(vec![41]);
        io.input_chars.push_back('Z' as i64);
        run_program_with_io("I 1 A P K O H", &mut io);
        assert_eq!(io.output, "42\nZ");
    }
}
