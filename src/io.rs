use std::io::{self, BufRead, Read, Write};

use crate::error::Error;

/// The interpreter's side channel to the outside world, used by `P`, `O`,
/// `I`, and `K`. Abstracted behind a trait so tests can run programs against
/// an in-memory harness instead of real stdio.
pub trait Io {
    fn print_int(&mut self, value: i64);
    fn print_char(&mut self, code_point: i64) -> Result<(), Error>;
    fn read_int(&mut self) -> Result<i64, Error>;
    fn read_char(&mut self) -> Result<i64, Error>;
}

/// The default `Io` implementation: line-buffered stdin, unbuffered stdout.
pub struct StdIo {
    stdin: io::Stdin,
}

impl StdIo {
    pub fn new() -> StdIo {
        StdIo { stdin: io::stdin() }
    }
}

impl Default for StdIo {
    fn default() -> StdIo {
        StdIo::new()
    }
}

impl Io for StdIo {
    fn print_int(&mut self, value: i64) {
        println!("{}", value);
    }

    fn print_char(&mut self, code_point: i64) -> Result<(), Error> {
        let c = code_point_to_char(code_point)?;
        print!("{}", c);
        io::stdout().flush().ok();
        Ok(())
    }

    fn read_int(&mut self) -> Result<i64, Error> {
        let mut line = String::new();
        let n = self.stdin.lock().read_line(&mut line).map_err(|_| Error::Eof)?;
        if n == 0 {
            return Err(Error::Eof);
        }
        line.trim().parse().map_err(|_| Error::BadInteger(line.trim().to_string()))
    }

    fn read_char(&mut self) -> Result<i64, Error> {
        let mut buf = [0u8; 1];
        let n = self.stdin.lock().read(&mut buf).map_err(|_| Error::Eof)?;
        if n == 0 {
            return Err(Error::Eof);
        }
        Ok(buf[0] as i64)
    }
}

fn code_point_to_char(code_point: i64) -> Result<char, Error> {
    if !(0..=0x10FFFF).contains(&code_point) {
        return Err(Error::BadCodePoint(code_point));
    }
    char::from_u32(code_point as u32).ok_or(Error::BadCodePoint(code_point))
}

/// An in-memory `Io` harness for tests: feeds a fixed input queue and
/// records every byte written by `P`/`O` for assertion.
#[derive(Default)]
pub struct TestIo {
    pub input_ints: std::collections::VecDeque<i64>,
    pub input_chars: std::collections::VecDeque<i64>,
    pub output: String,
}

impl TestIo {
    pub fn new() -> TestIo {
        TestIo::default()
    }

    pub fn with_ints(ints: impl IntoIterator<Item = i64>) -> TestIo {
        TestIo {
            input_ints: ints.into_iter().collect(),
            ..TestIo::default()
        }
    }

    pub fn with_chars(chars: impl IntoIterator<Item = i64>) -> TestIo {
        TestIo {
            input_chars: chars.into_iter().collect(),
            ..TestIo::default()
        }
    }
}

impl Io for TestIo {
    fn print_int(&mut self, value: i64) {
        self.output.push_str(&value.to_string());
        self.output.push('\n');
    }

    fn print_char(&mut self, code_point: i64) -> Result<(), Error> {
        self.output.push(code_point_to_char(code_point)?);
        Ok(())
    }

    fn read_int(&mut self) -> Result<i64, Error> {
        self.input_ints.pop_front().ok_or(Error::Eof)
    }

    fn read_char(&mut self) -> Result<i64, Error> {
        self.input_chars.pop_front().ok_or(Error::Eof)
    }
}
