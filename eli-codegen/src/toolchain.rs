use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

use crate::backend::Target;
use crate::error::Error;

/// Searches `PATH` for the first of `candidates` that exists and is
/// executable. Bare metal prefers cross-tool names (`aarch64-*-as`, etc.)
/// before falling back to the host's own `as`/`ld`/`objcopy`, since a native
/// hosted assembler happily accepts bare-metal assembly too on an ARM64 host.
fn find_tool(candidates: &[&str]) -> Option<PathBuf> {
    let path_var = env::var_os("PATH")?;
    for candidate in candidates {
        for dir in env::split_paths(&path_var) {
            let full = dir.join(candidate);
            if full.is_file() {
                return Some(full);
            }
        }
    }
    None
}

fn assembler_candidates(target: Target) -> &'static [&'static str] {
    match target {
        Target::Arm64 => &["as"],
        Target::Arm64Baremetal => &["aarch64-linux-gnu-as", "aarch64-elf-as", "as"],
    }
}

fn linker_candidates(target: Target) -> &'static [&'static str] {
    match target {
        Target::Arm64 => &["ld"],
        Target::Arm64Baremetal => &["aarch64-linux-gnu-ld", "aarch64-elf-ld", "ld"],
    }
}

fn objcopy_candidates() -> &'static [&'static str] {
    &["aarch64-linux-gnu-objcopy", "aarch64-elf-objcopy", "objcopy"]
}

fn run(tool: &Path, args: &[&str]) -> Result<(), Error> {
    let name = tool.file_name().and_then(|n| n.to_str()).unwrap_or("tool");
    let output = Command::new(tool).args(args).output().map_err(|e| Error::Io(e, "invoking", tool.to_path_buf()))?;
    if !output.status.success() {
        return Err(Error::ToolFailed {
            tool: name.to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        });
    }
    Ok(())
}

/// Assembles `asm_path` and links it into `output_path`, using the system
/// toolchain when present. Returns `Ok(None)` (not an error) when no
/// assembler/linker is found on `PATH`: the caller treats this as a warning,
/// since the `.s` (and `.ld`, for bare metal) file is already a complete
/// artifact without it.
pub fn assemble_and_link(
    target: Target,
    asm_path: &Path,
    linker_script_path: Option<&Path>,
    output_path: &Path,
) -> Result<Option<()>, Error> {
    let assembler = match find_tool(assembler_candidates(target)) {
        Some(tool) => tool,
        None => return Ok(None),
    };
    let linker = match find_tool(linker_candidates(target)) {
        Some(tool) => tool,
        None => return Ok(None),
    };

    let obj_path = output_path.with_extension("o");
    let obj_str = obj_path.to_string_lossy().into_owned();
    let asm_str = asm_path.to_string_lossy().into_owned();
    let output_str = output_path.to_string_lossy().into_owned();

    run(&assembler, &["-o", &obj_str, &asm_str])?;

    match target {
        Target::Arm64 => {
            run(
                &linker,
                &[
                    "-o",
                    &output_str,
                    &obj_str,
                    "-lSystem",
                    "-syslibroot",
                    "/Library/Developer/CommandLineTools/SDKs/MacOSX.sdk",
                    "-e",
                    "_start",
                    "-arch",
                    "arm64",
                ],
            )?;
        }
        Target::Arm64Baremetal => {
            let script = linker_script_path.expect("bare-metal link requires a linker script");
            let script_str = script.to_string_lossy().into_owned();
            run(&linker, &["-T", &script_str, "-nostdlib", "-o", &output_str, &obj_str, "--entry", "_start"])?;
            if let Some(objcopy) = find_tool(objcopy_candidates()) {
                let bin_str = output_path.with_extension("bin").to_string_lossy().into_owned();
                run(&objcopy, &["-O", "binary", &output_str, &bin_str])?;
            }
        }
    }

    fs::remove_file(&obj_path).ok();
    Ok(Some(()))
}
