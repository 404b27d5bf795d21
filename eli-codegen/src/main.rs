#[macro_use]
extern crate clap;

use std::fs::File;
use std::io::Read as IoRead;
use std::path::{Path, PathBuf};
use std::process::exit;

use clap::Arg;

use eli_codegen::{compile, Target};

fn main() {
    let matches = app_from_crate!()
        .arg(
            Arg::with_name("INPUT")
                .help("Opcode string or file path (use -f for files)")
                .index(1),
        )
        .arg(
            Arg::with_name("file")
                .short("f")
                .long("file")
                .help("Treats INPUT as a file path instead of an inline opcode string"),
        )
        .arg(
            Arg::with_name("output")
                .short("o")
                .long("output")
                .takes_value(true)
                .value_name("PATH")
                .help("Sets the output binary path (default: derived from the input name)"),
        )
        .arg(
            Arg::with_name("arch")
                .short("a")
                .long("arch")
                .takes_value(true)
                .value_name("TARGET")
                .help("Sets the target architecture (default: arm64)"),
        )
        .arg(
            Arg::with_name("list")
                .short("l")
                .long("list")
                .help("Lists available target architectures and exits"),
        )
        .arg(
            Arg::with_name("debug")
                .short("d")
                .long("debug")
                .help("Prints the generated assembly's token-to-opcode mapping to stderr"),
        )
        .get_matches();

    if matches.is_present("list") {
        list_architectures();
        return;
    }

    let target = match matches.value_of("arch") {
        Some(flag) => match Target::from_flag(flag) {
            Some(target) => target,
            None => {
                eprintln!("Unknown architecture '{}'. Pass -l to list the available ones.", flag);
                exit(1);
            }
        },
        None => Target::Arm64,
    };

    let input = matches.value_of("INPUT").unwrap_or_else(|| {
        eprintln!("No input given. Pass a source file or an inline opcode string.");
        eprintln!("Use -l to list available architectures");
        exit(1);
    });

    // Auto-detect file mode if input looks like a file path, matching the
    // original compiler's "-f suppresses this message" convenience note.
    let mut is_file = matches.is_present("file");
    if !is_file && Path::new(input).is_file() {
        eprintln!("Note: Detected '{}' as file. Use -f flag to suppress this message.", input);
        is_file = true;
    }

    let (source, base_name) = if is_file {
        match read_file(input) {
            Ok(text) => (text, base_name_of(input)),
            Err(err) => {
                eprintln!("Reading \"{}\" failed: {}", input, err);
                exit(1);
            }
        }
    } else {
        (input.to_string(), "a".to_string())
    };

    let output_path = match matches.value_of("output") {
        Some(path) => PathBuf::from(path),
        None => PathBuf::from(target.output_filename(&base_name)),
    };

    if matches.is_present("debug") {
        eprint!("{}", debug_trace(&source));
    }

    match compile(&source, target, &output_path) {
        Ok(result) => {
            eprintln!("Wrote assembly: {}", result.asm_path.display());
            if let Some(script) = &result.linker_script_path {
                eprintln!("Wrote linker script: {}", script.display());
            }
            if result.linked {
                eprintln!("Linked binary: {}", output_path.display());
            } else {
                eprintln!(
                    "No assembler/linker found on PATH; assembly written but not linked."
                );
            }
        }
        Err(err) => {
            eprintln!("{}", err);
            exit(1);
        }
    }
}

fn list_architectures() {
    println!("Available architectures:");
    for target in Target::ALL {
        println!("  {:<16} {}", target.flag_name(), target.description());
    }
}

/// One `[index] opcode` line per token, matching the interpreter's `-d`
/// trace format without the runtime stack column (there is no VM state yet
/// to show; this is purely a compile-time token listing).
fn debug_trace(source: &str) -> String {
    let stripped = eli::tokenizer::strip_comments(source);
    let mut out = String::new();
    match eli::tokenizer::tokenize(&stripped) {
        Ok(tokens) => {
            for (i, token) in tokens.iter().enumerate() {
                out.push_str(&format!("[{:3}] {:?}\n", i, token));
            }
        }
        Err(err) => out.push_str(&format!("tokenize error: {}\n", err)),
    }
    out
}

fn read_file(path: &str) -> std::io::Result<String> {
    let mut file = File::open(Path::new(path))?;
    let mut text = String::new();
    file.read_to_string(&mut text)?;
    Ok(text)
}

fn base_name_of(path: &str) -> String {
    Path::new(path)
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("a")
        .to_string()
}
