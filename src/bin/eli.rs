#[macro_use]
extern crate clap;

use std::fs::File;
use std::io::Read as IoRead;
use std::path::Path;
use std::process::exit;

use clap::{Arg, ArgGroup};

use eli::interpreter;
use eli::io::StdIo;
use eli::tokenizer;
use eli::vm::Vm;

fn main() {
    let matches = app_from_crate!()
        .arg(
            Arg::with_name("PROGRAM")
                .help("Sets the source file to run")
                .index(1),
        )
        .arg(
            Arg::with_name("inline")
                .short("c")
                .takes_value(true)
                .value_name("SOURCE")
                .help("Runs an inline program instead of a file"),
        )
        .group(
            ArgGroup::with_name("input")
                .args(&["PROGRAM", "inline"])
                .required(true),
        )
        .arg(
            Arg::with_name("debug")
                .short("d")
                .long("debug")
                .help("Prints a per-step [pc] OP | Stack: ... trace to stderr"),
        )
        .get_matches();

    let source = match matches.value_of("inline") {
        Some(inline) => inline.to_string(),
        None => {
            let path = matches.value_of("PROGRAM").unwrap();
            match read_file(path) {
                Ok(text) => text,
                Err(err) => {
                    eprintln!("Reading \"{}\" failed: {}", path, err);
                    exit(1);
                }
            }
        }
    };

    let mut stdio = StdIo::new();
    let result = if matches.is_present("debug") {
        run_with_trace(&source, &mut stdio)
    } else {
        eli::run_source(&source, &mut stdio)
    };

    if let Err(err) = result {
        eprintln!("{}", err);
        exit(1);
    }
}

/// Mirrors `eli::run_source`, but drives `interpreter::run_traced` so each
/// step is echoed as `[pc] OP | Stack: [...]` before it executes.
fn run_with_trace(source: &str, io: &mut StdIo) -> Result<(), eli::Error> {
    let stripped = tokenizer::strip_comments(source);
    let tokens = tokenizer::tokenize(&stripped)?;
    let mut vm = Vm::new(tokens);
    interpreter::run_traced(&mut vm, io, |pc, token, stack| {
        eprintln!("[{:3}] {:?} | Stack: {:?}", pc, token, stack);
    })
}

fn read_file(path: &str) -> std::io::Result<String> {
    let mut file = File::open(Path::new(path))?;
    let mut text = String::new();
    file.read_to_string(&mut text)?;
    Ok(text)
}
