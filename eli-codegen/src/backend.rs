use eli_util::InteropGetName;
use eli_util_derive::InteropGetName;

/// The two native targets this compiler lowers to. A fixed enumeration
/// rather than a scanned plugin directory: filesystem discovery adds no
/// value here and only complicates reasoning about which targets exist.
///
/// `flag_name`/`from_flag` (not `InteropGetName`) are the source of truth
/// for the `-a` CLI value, since that value is lowercase-with-underscores
/// and does not match the Rust variant identifiers; `InteropGetName` is
/// used only for the `-d` debug trace's backend label.
#[derive(Clone, Copy, Debug, PartialEq, Eq, InteropGetName)]
pub enum Target {
    Arm64,
    Arm64Baremetal,
}

impl Target {
    pub const ALL: [Target; 2] = [Target::Arm64, Target::Arm64Baremetal];

    /// The string accepted by the compiler CLI's `-a` flag.
    pub fn flag_name(self) -> &'static str {
        match self {
            Target::Arm64 => "arm64",
            Target::Arm64Baremetal => "arm64_baremetal",
        }
    }

    pub fn from_flag(s: &str) -> Option<Target> {
        Target::ALL.iter().copied().find(|t| t.flag_name() == s)
    }

    pub fn description(self) -> &'static str {
        match self {
            Target::Arm64 => "ARM64 (Apple Silicon / AArch64) native code generator",
            Target::Arm64Baremetal => {
                "ARM64 bare-metal image for QEMU's virt machine, PL011 UART I/O"
            }
        }
    }

    /// The filename the linked artifact should carry for `base_name`.
    pub fn output_filename(self, base_name: &str) -> String {
        match self {
            Target::Arm64 => base_name.to_string(),
            Target::Arm64Baremetal => format!("{}.elf", base_name),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn round_trips_through_flag_names() {
        for target in Target::ALL {
            assert_eq!(Target::from_flag(target.flag_name()), Some(target));
        }
    }

    #[test]
    fn unknown_flag_is_none() {
        assert_eq!(Target::from_flag("riscv"), None);
    }

    #[test]
    fn interop_name_matches_variant_identifier() {
        assert_eq!(Target::Arm64.interop_name(), b"Arm64\0".as_slice());
    }
}
