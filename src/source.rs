//! Input sources: standard input or a named file.

use std::fmt;
use std::fs::File;
use std::io::{self, Read};
use std::path::{Path, PathBuf};

use crate::error::SourceOpenError;

/// Operand that names standard input.
pub const STDIN_OPERAND: &str = "-";

/// One input source, opened only when its turn comes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Source {
    Stdin,
    Path(PathBuf),
}

impl Source {
    /// Resolve command-line operands into sources, keeping their order.
    ///
    /// No operands means standard input. The operand `-` also means
    /// standard input.
    pub fn from_operands(operands: Vec<PathBuf>) -> Vec<Source> {
        if operands.is_empty() {
            return vec![Source::Stdin];
        }
        operands.into_iter().map(Source::from).collect()
    }

    /// Open the source for reading. Dropping the handle closes it.
    ///
    /// # Errors
    ///
    /// Returns a [`SourceOpenError`] if the file cannot be opened or is a
    /// directory.
    pub fn open(&self) -> Result<Box<dyn Read>, SourceOpenError> {
        match self {
            Source::Stdin => Ok(Box::new(io::stdin().lock())),
            Source::Path(path) => open_file(path).map_err(|cause| SourceOpenError {
                name: self.to_string(),
                cause,
            }),
        }
    }
}

fn open_file(path: &Path) -> io::Result<Box<dyn Read>> {
    let file = File::open(path)?;
    if file.metadata()?.is_dir() {
        return Err(io::Error::other("Is a directory"));
    }
    Ok(Box::new(file))
}

impl From<PathBuf> for Source {
    fn from(path: PathBuf) -> Self {
        if path.as_os_str() == STDIN_OPERAND {
            Source::Stdin
        } else {
            Source::Path(path)
        }
    }
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Source::Stdin => f.write_str(STDIN_OPERAND),
            Source::Path(path) => write!(f, "{}", path.display()),
        }
    }
}
