//! # linecat
//!
//! Concatenate byte streams to a single output, optionally making their line
//! structure visible.
//!
//! ## Overview
//!
//! Every input byte passes through a small state machine that can:
//! - **Number lines**: all lines, or only non-blank ones
//! - **Mark line ends**: a `$` before each newline
//! - **Squeeze blank lines**: runs of blank lines collapse to one
//! - **Show control bytes**: `^A` style escapes, tabs optional
//!
//! Numbering and blank-line tracking restart for every source.
//!
//! ## Example
//!
//! ```
//! use linecat::{Config, LineFilter};
//!
//! let config = Config {
//!     number_all_lines: true,
//!     show_ends: true,
//!     ..Config::new()
//! };
//!
//! let mut filter = LineFilter::new(config, Vec::new());
//! filter.process(&b"alpha\n\nbeta\n"[..]).unwrap();
//! let output = filter.finish().unwrap();
//!
//! assert_eq!(output, b"     1  alpha$\n     2  $\n     3  beta$\n");
//! ```

pub mod cli;
pub mod config;
pub mod driver;
pub mod error;
pub mod filter;
pub mod source;
pub mod state;

pub use cli::{Cli, ParsedArgs, parse_args};
pub use config::Config;
pub use driver::{PROGRAM_NAME, RunSummary, run};
pub use error::{FilterError, SourceOpenError, UnknownOptionError};
pub use filter::LineFilter;
pub use source::Source;
pub use state::StreamState;
