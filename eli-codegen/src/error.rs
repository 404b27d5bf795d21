use std::fmt;

/// Failures specific to compiling and packaging a native binary. Distinct
/// from [`eli::Error`], which covers the ELI-language semantics the
/// generated assembly itself realizes.
#[derive(Debug)]
pub enum Error {
    Source(eli::Error),
    Io(std::io::Error, &'static str, std::path::PathBuf),
    ToolFailed { tool: String, stderr: String },
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::Source(err) => write!(f, "{}", err),
            Error::Io(err, context, path) => {
                write!(f, "{} \"{}\" failed: {}", context, path.display(), err)
            }
            Error::ToolFailed { tool, stderr } => write!(f, "'{}' failed:\n{}", tool, stderr),
        }
    }
}

impl std::error::Error for Error {}

impl From<eli::Error> for Error {
    fn from(err: eli::Error) -> Error {
        Error::Source(err)
    }
}
