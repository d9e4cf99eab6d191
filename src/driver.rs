//! Top-level run over an ordered list of sources.
//!
//! Each source is opened right before it is filtered and closed right after,
//! so an open failure on one source never affects the others. A write
//! failure stops the run: no further source is opened.

use std::io::Write;

use tracing::{debug, info};

use crate::config::Config;
use crate::error::FilterError;
use crate::filter::LineFilter;
use crate::source::Source;

/// Program name used as the prefix of diagnostics.
pub const PROGRAM_NAME: &str = "linecat";

/// How many sources were filtered and how many were skipped.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub processed: usize,
    pub skipped: usize,
}

/// Filter every source in order into `out`.
///
/// Sources that cannot be opened are reported on `diagnostics` and skipped.
///
/// # Errors
///
/// Returns [`FilterError::Write`] on the first failed write to `out`.
pub fn run<W: Write, D: Write>(
    config: Config,
    sources: &[Source],
    out: W,
    diagnostics: &mut D,
) -> Result<RunSummary, FilterError> {
    debug!(
        sources = sources.len(),
        plain = config.is_plain(),
        numbered = config.numbers_lines(),
        "starting run"
    );
    let mut filter = LineFilter::new(config, out);
    let mut summary = RunSummary::default();

    for source in sources {
        let reader = match source.open() {
            Ok(reader) => reader,
            Err(e) => {
                debug!(source = %source, error = %e.cause, "skipping source");
                let _ = writeln!(diagnostics, "{PROGRAM_NAME}: {e}");
                summary.skipped += 1;
                continue;
            }
        };

        debug!(source = %source, "filtering source");
        filter.process(reader)?;
        summary.processed += 1;
    }

    filter.finish()?;
    info!(
        processed = summary.processed,
        skipped = summary.skipped,
        "run complete"
    );
    Ok(summary)
}
