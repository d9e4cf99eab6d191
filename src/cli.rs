//! Command-line parsing.
//!
//! Unknown flags are not fatal: a pre-scan strips them out and reports each
//! one, then clap parses what is left.

use std::ffi::OsString;
use std::path::PathBuf;

use clap::Parser;

use crate::config::Config;
use crate::error::UnknownOptionError;
use crate::source::Source;

/// Short flags clap knows about, including the built-in help and version.
const SHORT_FLAGS: &str = "nbEstveAhV";

/// Long flags clap knows about, without the leading `--`.
const LONG_FLAGS: &[&str] = &[
    "number",
    "number-nonblank",
    "show-ends",
    "squeeze-blank",
    "show-tabs",
    "show-nonprinting",
    "show-all",
    "help",
    "version",
];

/// Concatenate files to standard output, optionally making line structure
/// visible.
///
/// With no FILE, or when FILE is -, read standard input.
#[derive(Parser, Debug)]
#[command(name = "linecat", version, args_override_self = true)]
pub struct Cli {
    /// Number all output lines
    #[arg(short = 'n', long = "number")]
    pub number: bool,

    /// Number non-empty output lines, overrides -n
    #[arg(short = 'b', long = "number-nonblank")]
    pub number_nonblank: bool,

    /// Display $ at the end of each line
    #[arg(short = 'E', long = "show-ends")]
    pub show_ends: bool,

    /// Suppress repeated empty output lines
    #[arg(short = 's', long = "squeeze-blank")]
    pub squeeze_blank: bool,

    /// Display TAB characters as ^I, implies -v
    #[arg(short = 't', long = "show-tabs")]
    pub show_tabs: bool,

    /// Use ^ notation for control characters, except LFD and TAB
    #[arg(short = 'v', long = "show-nonprinting")]
    pub show_nonprinting: bool,

    /// Equivalent to -vE
    #[arg(short = 'e')]
    pub nonprinting_and_ends: bool,

    /// Equivalent to -vET
    #[arg(short = 'A', long = "show-all")]
    pub show_all: bool,

    /// Files to read, in order
    #[arg(value_name = "FILE")]
    pub files: Vec<PathBuf>,
}

impl From<&Cli> for Config {
    fn from(cli: &Cli) -> Self {
        // -t carries -v with it, so -t alone escapes tabs.
        let show_tabs = cli.show_tabs || cli.show_all;
        Config {
            number_all_lines: cli.number || cli.number_nonblank,
            number_nonblank_lines: cli.number_nonblank,
            show_ends: cli.show_ends || cli.nonprinting_and_ends || cli.show_all,
            show_nonprinting: cli.show_nonprinting || cli.nonprinting_and_ends || show_tabs,
            show_tabs,
            squeeze_blank: cli.squeeze_blank,
        }
    }
}

/// Result of parsing the command line.
#[derive(Debug)]
pub struct ParsedArgs {
    pub config: Config,
    pub sources: Vec<Source>,
    /// Flags that were ignored.
    pub unknown: Vec<UnknownOptionError>,
}

/// Parse a full argument list, program name first.
///
/// # Errors
///
/// Returns the clap error for `--help` and `--version`. Unknown flags are
/// not errors; they come back in [`ParsedArgs::unknown`].
pub fn parse_args<I, T>(args: I) -> Result<ParsedArgs, clap::Error>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString>,
{
    let (kept, unknown) = strip_unknown_flags(args.into_iter().map(Into::into));
    let cli = Cli::try_parse_from(kept)?;
    Ok(ParsedArgs {
        config: Config::from(&cli),
        sources: Source::from_operands(cli.files),
        unknown,
    })
}

/// Split `args` into the arguments clap should see and the unknown flags.
///
/// Unknown letters are removed from short clusters, so `-nxE` keeps `-nE`.
/// Long flags must match exactly; `--number=x` is unknown. A flag that is
/// not valid UTF-8 is unknown as a whole. Nothing after `--` is inspected.
fn strip_unknown_flags<I>(args: I) -> (Vec<OsString>, Vec<UnknownOptionError>)
where
    I: IntoIterator<Item = OsString>,
{
    let mut args = args.into_iter();
    let mut kept: Vec<OsString> = args.next().into_iter().collect();
    let mut unknown = Vec::new();
    let mut operands_only = false;

    for arg in args {
        if operands_only {
            kept.push(arg);
            continue;
        }
        let Some(text) = arg.to_str() else {
            let bytes = arg.as_encoded_bytes();
            if bytes.len() > 1 && bytes[0] == b'-' {
                unknown.push(UnknownOptionError {
                    flag: arg.to_string_lossy().into_owned(),
                });
            } else {
                kept.push(arg);
            }
            continue;
        };

        if text == "--" {
            operands_only = true;
            kept.push(arg);
        } else if let Some(long) = text.strip_prefix("--") {
            if LONG_FLAGS.contains(&long) {
                kept.push(arg);
            } else {
                unknown.push(UnknownOptionError {
                    flag: text.to_string(),
                });
            }
        } else if let Some(cluster) = text.strip_prefix('-')
            && !cluster.is_empty()
        {
            let mut known = String::from("-");
            for c in cluster.chars() {
                if SHORT_FLAGS.contains(c) {
                    known.push(c);
                } else {
                    unknown.push(UnknownOptionError {
                        flag: format!("-{c}"),
                    });
                }
            }
            if known.len() > 1 {
                kept.push(known.into());
            }
        } else {
            kept.push(arg);
        }
    }

    (kept, unknown)
}
