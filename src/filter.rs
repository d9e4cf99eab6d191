//! The per-byte line filter.
//!
//! Each input byte goes through a fixed pipeline before the next one is read:
//! squeeze check, line number, end marker, control-byte escape, emit, and
//! state update. All decisions use the [`StreamState`] from before the byte.

use std::io::{self, BufRead, BufReader, Read, Write};

use tracing::{debug, trace};

use crate::config::Config;
use crate::error::FilterError;
use crate::state::StreamState;

/// Width of the line number field. Larger numbers widen it.
pub const LINE_NUMBER_WIDTH: usize = 6;

/// Marker printed before each line terminator with `show_ends`.
pub const END_MARKER: u8 = b'$';

/// Bytes below this value are non-printing.
const PRINTABLE_START: u8 = 0x20;

/// Offset from a control byte to the letter that represents it (`0x01` -> `A`).
const CARET_OFFSET: u8 = 0x40;

/// Streams sources into a single output sink under a fixed [`Config`].
#[derive(Debug)]
pub struct LineFilter<W: Write> {
    config: Config,
    out: W,
}

impl<W: Write> LineFilter<W> {
    pub fn new(config: Config, out: W) -> Self {
        Self { config, out }
    }

    /// Filter one source until it is exhausted.
    ///
    /// Line numbering and blank-line tracking start fresh for every call.
    /// A read error ends the source the same way end-of-stream does.
    ///
    /// # Errors
    ///
    /// Returns [`FilterError::Write`] as soon as the sink rejects a write.
    pub fn process<R: Read>(&mut self, source: R) -> Result<(), FilterError> {
        let mut reader = BufReader::new(source);
        let mut state = StreamState::new();
        let plain = self.config.is_plain();
        let mut bytes_read: u64 = 0;

        loop {
            let chunk = match reader.fill_buf() {
                Ok(chunk) => chunk,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => {
                    debug!(error = %e, "read failed, ending source");
                    break;
                }
            };
            if chunk.is_empty() {
                break;
            }

            if plain {
                self.out.write_all(chunk)?;
            } else {
                for &byte in chunk {
                    state = self.step(state, byte)?;
                }
            }
            self.out.flush()?;

            let len = chunk.len();
            bytes_read += len as u64;
            reader.consume(len);
        }

        debug!(bytes_read, lines_numbered = state.line_number - 1, "source exhausted");
        Ok(())
    }

    /// Flush the sink and hand it back.
    ///
    /// # Errors
    ///
    /// Returns [`FilterError::Write`] if the final flush fails.
    pub fn finish(mut self) -> Result<W, FilterError> {
        self.out.flush()?;
        Ok(self.out)
    }

    fn step(&mut self, mut state: StreamState, byte: u8) -> Result<StreamState, FilterError> {
        let is_newline = byte == b'\n';

        if self.config.squeeze_blank && is_newline && state.consecutive_blank_run {
            trace!(line = state.line_number, "squeezed blank line");
            return Ok(state.advance(byte));
        }

        if state.at_line_start {
            state.line_number = self.write_line_number(state.line_number, is_newline)?;
        }

        if is_newline && self.config.show_ends {
            self.out.write_all(&[END_MARKER])?;
        }

        if self.escapes(byte) {
            self.out.write_all(&[b'^', byte + CARET_OFFSET])?;
        } else {
            self.out.write_all(&[byte])?;
        }

        Ok(state.advance(byte))
    }

    /// Print the number for the line that starts here, if it gets one.
    /// Returns the next line number.
    fn write_line_number(&mut self, line_number: u64, is_blank: bool) -> Result<u64, FilterError> {
        let numbered = if self.config.number_nonblank_lines {
            !is_blank
        } else {
            self.config.number_all_lines
        };
        if !numbered {
            return Ok(line_number);
        }
        write!(self.out, "{line_number:>width$}  ", width = LINE_NUMBER_WIDTH)?;
        Ok(line_number + 1)
    }

    /// Whether `byte` is replaced by a `^X` escape.
    fn escapes(&self, byte: u8) -> bool {
        if !self.config.show_nonprinting || byte == b'\n' || byte >= PRINTABLE_START {
            return false;
        }
        byte != b'\t' || self.config.show_tabs
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filter(config: Config, input: &[u8]) -> Vec<u8> {
        let mut filter = LineFilter::new(config, Vec::new());
        filter.process(input).unwrap();
        filter.finish().unwrap()
    }

    fn filter_str(config: Config, input: &str) -> String {
        String::from_utf8(filter(config, input.as_bytes())).unwrap()
    }

    fn numbered() -> Config {
        Config {
            number_all_lines: true,
            ..Config::new()
        }
    }

    fn nonblank() -> Config {
        Config {
            number_all_lines: true,
            number_nonblank_lines: true,
            ..Config::new()
        }
    }

    fn squeeze() -> Config {
        Config {
            squeeze_blank: true,
            ..Config::new()
        }
    }

    fn ends() -> Config {
        Config {
            show_ends: true,
            ..Config::new()
        }
    }

    fn nonprinting() -> Config {
        Config {
            show_nonprinting: true,
            ..Config::new()
        }
    }

    /// Sink that accepts `budget` bytes and then fails.
    struct FailingWriter {
        budget: usize,
    }

    impl Write for FailingWriter {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            if self.budget == 0 {
                return Err(io::Error::new(io::ErrorKind::BrokenPipe, "closed"));
            }
            let n = buf.len().min(self.budget);
            self.budget -= n;
            Ok(n)
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    /// Source that yields some bytes and then a read error.
    struct BrokenReader {
        data: Option<Vec<u8>>,
    }

    impl Read for BrokenReader {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            match self.data.take() {
                Some(data) => {
                    buf[..data.len()].copy_from_slice(&data);
                    Ok(data.len())
                }
                None => Err(io::Error::other("device gone")),
            }
        }
    }

    #[test]
    fn test_plain_passthrough() {
        assert_eq!(filter_str(Config::new(), "a\nb\n"), "a\nb\n");
    }

    #[test]
    fn test_plain_keeps_control_bytes() {
        let input = b"\x00\x01\t\x1b[0m\n\n\n\xff";
        assert_eq!(filter(Config::new(), input), input.to_vec());
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(filter_str(numbered(), ""), "");
        assert_eq!(filter_str(Config::new(), ""), "");
    }

    #[test]
    fn test_number_all_lines() {
        assert_eq!(filter_str(numbered(), "x\n"), "     1  x\n");
        assert_eq!(
            filter_str(numbered(), "a\n\nb\n"),
            "     1  a\n     2  \n     3  b\n"
        );
    }

    #[test]
    fn test_number_unterminated_last_line() {
        assert_eq!(filter_str(numbered(), "a\nb"), "     1  a\n     2  b");
    }

    #[test]
    fn test_number_field_widens() {
        let input = "x\n".repeat(1_000_000);
        let output = filter_str(numbered(), &input);
        let last = output.lines().last().unwrap();
        assert_eq!(last, "1000000  x");
    }

    #[test]
    fn test_nonblank_skips_blank_line() {
        assert_eq!(filter_str(nonblank(), "\n"), "\n");
        assert_eq!(
            filter_str(nonblank(), "a\n\nb\n"),
            "     1  a\n\n     2  b\n"
        );
    }

    #[test]
    fn test_nonblank_alone_numbers_text_lines() {
        let config = Config {
            number_nonblank_lines: true,
            ..Config::new()
        };
        assert_eq!(filter_str(config, "a\n\nb\n"), "     1  a\n\n     2  b\n");
    }

    #[test]
    fn test_squeeze_collapses_run() {
        assert_eq!(filter_str(squeeze(), "a\n\n\nb\n"), "a\n\nb\n");
        assert_eq!(filter_str(squeeze(), "a\n\n\n\n\n\nb\n"), "a\n\nb\n");
    }

    #[test]
    fn test_squeeze_leading_run() {
        assert_eq!(filter_str(squeeze(), "\n\n\nx\n"), "\nx\n");
    }

    #[test]
    fn test_squeeze_trailing_run() {
        assert_eq!(filter_str(squeeze(), "x\n\n\n\n"), "x\n\n");
    }

    #[test]
    fn test_squeeze_without_runs_is_noop() {
        let input = "a\n\nb\nc\n\nd";
        assert_eq!(filter_str(squeeze(), input), input);
    }

    #[test]
    fn test_squeeze_with_numbering() {
        let config = Config {
            squeeze_blank: true,
            ..numbered()
        };
        assert_eq!(
            filter_str(config, "a\n\n\n\nb\n"),
            "     1  a\n     2  \n     3  b\n"
        );
    }

    #[test]
    fn test_show_ends() {
        assert_eq!(filter_str(ends(), "a\n"), "a$\n");
        assert_eq!(filter_str(ends(), "a\n\nb"), "a$\n$\nb");
    }

    #[test]
    fn test_show_ends_on_unnumbered_blank_lines() {
        let config = Config {
            show_ends: true,
            ..nonblank()
        };
        assert_eq!(filter_str(config, "a\n\nb\n"), "     1  a$\n$\n     2  b$\n");
    }

    #[test]
    fn test_show_ends_with_squeeze() {
        let config = Config {
            squeeze_blank: true,
            ..ends()
        };
        assert_eq!(filter_str(config, "a\n\n\n\nb\n"), "a$\n$\nb$\n");
    }

    #[test]
    fn test_nonprinting_escapes_control_bytes() {
        assert_eq!(filter_str(nonprinting(), "\x01\n"), "^A\n");
        assert_eq!(filter_str(nonprinting(), "\x00\x1b\x1f"), "^@^[^_");
    }

    #[test]
    fn test_nonprinting_leaves_tab() {
        assert_eq!(filter_str(nonprinting(), "a\tb\n"), "a\tb\n");
    }

    #[test]
    fn test_nonprinting_with_tabs_escapes_tab() {
        let config = Config {
            show_tabs: true,
            ..nonprinting()
        };
        assert_eq!(filter_str(config, "a\tb\n"), "a^Ib\n");
    }

    #[test]
    fn test_show_tabs_alone_has_no_effect() {
        let config = Config {
            show_tabs: true,
            ..Config::new()
        };
        assert_eq!(filter_str(config, "a\tb\x01\n"), "a\tb\x01\n");
    }

    #[test]
    fn test_nonprinting_passes_high_bytes() {
        let input = b" ~\x7f\x80\xff\n";
        assert_eq!(filter(nonprinting(), input), input.to_vec());
    }

    #[test]
    fn test_all_options_together() {
        let config = Config {
            number_all_lines: true,
            number_nonblank_lines: false,
            show_ends: true,
            show_nonprinting: true,
            show_tabs: true,
            squeeze_blank: true,
        };
        assert_eq!(
            filter_str(config, "a\tb\n\n\n\x07\n"),
            "     1  a^Ib$\n     2  $\n     3  ^G$\n"
        );
    }

    #[test]
    fn test_state_resets_per_source() {
        let mut filter = LineFilter::new(numbered(), Vec::new());
        filter.process(&b"a\nb\n"[..]).unwrap();
        filter.process(&b"c\n"[..]).unwrap();
        let output = String::from_utf8(filter.finish().unwrap()).unwrap();
        assert_eq!(output, "     1  a\n     2  b\n     1  c\n");
    }

    #[test]
    fn test_blank_run_does_not_span_sources() {
        let mut filter = LineFilter::new(squeeze(), Vec::new());
        filter.process(&b"a\n\n"[..]).unwrap();
        filter.process(&b"\nb\n"[..]).unwrap();
        let output = String::from_utf8(filter.finish().unwrap()).unwrap();
        assert_eq!(output, "a\n\n\nb\n");
    }

    #[test]
    fn test_unterminated_source_then_next() {
        let mut filter = LineFilter::new(numbered(), Vec::new());
        filter.process(&b"a"[..]).unwrap();
        filter.process(&b"b\n"[..]).unwrap();
        let output = String::from_utf8(filter.finish().unwrap()).unwrap();
        assert_eq!(output, "     1  a     1  b\n");
    }

    #[test]
    fn test_write_error_is_returned() {
        let sink = FailingWriter { budget: 3 };
        let mut filter = LineFilter::new(ends(), sink);
        let err = filter.process(&b"abc\ndef\n"[..]).unwrap_err();
        assert!(matches!(err, FilterError::Write(_)));
    }

    #[test]
    fn test_write_error_in_plain_mode() {
        let sink = FailingWriter { budget: 0 };
        let mut filter = LineFilter::new(Config::new(), sink);
        assert!(filter.process(&b"abc\n"[..]).is_err());
    }

    #[test]
    fn test_read_error_ends_source() {
        let reader = BrokenReader {
            data: Some(b"a\nb".to_vec()),
        };
        let mut filter = LineFilter::new(numbered(), Vec::new());
        filter.process(reader).unwrap();
        let output = String::from_utf8(filter.finish().unwrap()).unwrap();
        assert_eq!(output, "     1  a\n     2  b");
    }
}
