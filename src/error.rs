use std::error::Error as StdError;
use std::fmt;

/// Every way an ELI program can fail, shared by the interpreter and surfaced
/// (without a message) as the compiled program's exit status.
///
/// None of these are catchable from ELI itself: a program either halts
/// cleanly via `H` or stops here.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Error {
    /// An invalid character, an unterminated buffer literal, or an empty hex
    /// literal, at the given byte offset into the source text.
    Lexical(usize),
    /// `op` needed more operands than the stack held.
    StackUnderflow { op: char },
    /// `op` needed an array where it found a scalar, or vice versa.
    TypeMismatch { op: char },
    /// `D`/`X` with a zero divisor.
    DivideByZero,
    /// `<`/`>` with a shift amount outside `[0, 64]`.
    ShiftOutOfRange(i64),
    /// `g` with an index outside the array's bounds.
    ArrayIndexOutOfRange { index: i64, len: i64 },
    /// `J`/`Z`/`N`/`C`/`Q` computed a token index outside `[0, token_count]`.
    BadJump(i64),
    /// A memory address popped for `T`/`F`/`B`/`S` was negative.
    NegativeAddress(i64),
    /// `C` would push the call stack past its 1000-frame limit.
    CallStackOverflow,
    /// `Q` with no matching `C` frame.
    CallStackUnderflow,
    /// `I`/`K` found no more input.
    Eof,
    /// `I` read a line that is not a valid signed decimal integer.
    BadInteger(String),
    /// `O` was given a value outside the Unicode scalar range.
    BadCodePoint(i64),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::Lexical(pos) => write!(f, "lexical error at byte {}", pos),
            Error::StackUnderflow { op } => write!(f, "stack underflow at '{}'", op),
            Error::TypeMismatch { op } => write!(f, "type mismatch at '{}'", op),
            Error::DivideByZero => write!(f, "division by zero"),
            Error::ShiftOutOfRange(n) => write!(f, "shift amount {} out of range [0, 64]", n),
            Error::ArrayIndexOutOfRange { index, len } => {
                write!(f, "array index {} out of range (len {})", index, len)
            }
            Error::BadJump(target) => write!(f, "jump target {} out of range", target),
            Error::NegativeAddress(addr) => write!(f, "negative memory address {}", addr),
            Error::CallStackOverflow => write!(f, "call stack overflow"),
            Error::CallStackUnderflow => write!(f, "return with no matching call"),
            Error::Eof => write!(f, "unexpected end of input"),
            Error::BadInteger(s) => write!(f, "could not parse \"{}\" as an integer", s),
            Error::BadCodePoint(cp) => write!(f, "{} is not a valid Unicode code point", cp),
        }
    }
}

impl StdError for Error {
    fn description(&self) -> &str {
        "ELI program failed"
    }
}
