//! Lowers an ELI token stream to ARM64 assembly and, when a toolchain is on
//! `PATH`, assembles and links it into a native binary. See `eli` for the
//! reference tree-walking interpreter these targets must stay semantically
//! identical to.

pub mod addressing;
pub mod backend;
pub mod data;
pub mod error;
pub mod helpers;
pub mod jump_table;
pub mod linker;
pub mod literal;
pub mod opcodes;
pub mod program;
pub mod toolchain;

use std::fs;
use std::path::{Path, PathBuf};

pub use backend::Target;
pub use error::Error;

/// The artifacts a [`compile`] call wrote to disk, and whether linking
/// actually happened.
pub struct CompileOutput {
    pub asm_path: PathBuf,
    pub linker_script_path: Option<PathBuf>,
    pub binary_path: Option<PathBuf>,
    pub linked: bool,
}

/// Tokenizes `source`, lowers it to `target`'s assembly, writes the `.s`
/// (and, for bare metal, the `.ld`) file next to `output_path`, and
/// opportunistically assembles/links a binary at `output_path`.
///
/// Per the ambient toolchain contract: a missing `as`/`ld` is not an error
/// here either, it is reported back via `linked: false` so the caller can
/// warn without failing the whole invocation.
pub fn compile(source: &str, target: Target, output_path: &Path) -> Result<CompileOutput, Error> {
    let stripped = eli::tokenizer::strip_comments(source);
    let tokens = eli::tokenizer::tokenize(&stripped)?;

    let asm = program::generate_assembly(&tokens, target);
    let asm_path = output_path.with_extension("s");
    fs::write(&asm_path, &asm).map_err(|e| Error::Io(e, "writing", asm_path.clone()))?;

    let linker_script_path = if target == Target::Arm64Baremetal {
        let path = output_path.with_extension("ld");
        let script = linker::linker_script();
        fs::write(&path, &script).map_err(|e| Error::Io(e, "writing", path.clone()))?;
        Some(path)
    } else {
        None
    };

    let linked = toolchain::assemble_and_link(
        target,
        &asm_path,
        linker_script_path.as_deref(),
        output_path,
    )?;

    Ok(CompileOutput {
        asm_path,
        linker_script_path,
        binary_path: linked.map(|_| output_path.to_path_buf()),
        linked: linked.is_some(),
    })
}

#[cfg(test)]
mod test {
    use super::*;
    use std::env::temp_dir;

    #[test]
    fn compile_always_writes_assembly() {
        let out = temp_dir().join(format!("eli_codegen_test_{}", std::process::id()));
        let result = compile("2 3 A P H", Target::Arm64, &out).unwrap();
        assert!(result.asm_path.exists());
        let contents = fs::read_to_string(&result.asm_path).unwrap();
        assert!(contents.contains("_start:"));
        fs::remove_file(&result.asm_path).ok();
    }

    #[test]
    fn baremetal_compile_also_writes_linker_script() {
        let out = temp_dir().join(format!("eli_codegen_test_bm_{}", std::process::id()));
        let result = compile("1 H", Target::Arm64Baremetal, &out).unwrap();
        assert!(result.linker_script_path.is_some());
        let script_path = result.linker_script_path.unwrap();
        assert!(script_path.exists());
        fs::remove_file(&result.asm_path).ok();
        fs::remove_file(&script_path).ok();
    }

    #[test]
    fn rejects_bad_source_before_touching_disk() {
        let out = temp_dir().join(format!("eli_codegen_test_bad_{}", std::process::id()));
        let err = compile("???", Target::Arm64, &out).unwrap_err();
        assert!(matches!(err, Error::Source(_)));
        assert!(!out.with_extension("s").exists());
    }
}
