//! CLI tool to concatenate files to stdout.
//!
//! Usage:
//!   linecat [-nbEstveA] [FILE]...
//!
//! With no FILE, or when FILE is -, reads standard input. Set `RUST_LOG`
//! (for example `RUST_LOG=linecat=debug`) to see per-source log events on
//! stderr.

use linecat::{PROGRAM_NAME, parse_args, run};
use std::env;
use std::io::{self, BufWriter};
use tracing::debug;

fn main() {
    init_logging();

    let parsed = match parse_args(env::args_os()) {
        Ok(parsed) => parsed,
        Err(e) => e.exit(),
    };

    for unknown in &parsed.unknown {
        eprintln!("{PROGRAM_NAME}: {unknown}");
    }
    debug!(config = ?parsed.config, sources = parsed.sources.len(), "parsed arguments");

    let stdout = io::stdout();
    let out = BufWriter::new(stdout.lock());
    let mut stderr = io::stderr();

    if let Err(e) = run(parsed.config, &parsed.sources, out, &mut stderr) {
        eprintln!("{PROGRAM_NAME}: {e}");
    }
}

/// Initialize tracing to stderr, filtered by `RUST_LOG` (default `warn`).
fn init_logging() {
    use tracing_subscriber::{EnvFilter, fmt, prelude::*};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    let _ = tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr))
        .with(filter)
        .try_init();
}
