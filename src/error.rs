//! Error types.
//!
//! Only [`FilterError`] is fatal to a run. The other two are reported as
//! diagnostics and the run carries on.

use std::io;

use thiserror::Error;

/// The output sink rejected a write.
#[derive(Debug, Error)]
pub enum FilterError {
    #[error("write error: {0}")]
    Write(#[from] io::Error),
}

/// A named source could not be opened for reading.
#[derive(Debug, Error)]
#[error("{name}: {cause}")]
pub struct SourceOpenError {
    /// Display name of the source (`-` for standard input).
    pub name: String,
    #[source]
    pub cause: io::Error,
}

/// A flag that is not recognised. It is ignored.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown option '{flag}' ignored")]
pub struct UnknownOptionError {
    pub flag: String,
}
