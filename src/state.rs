//! Rolling per-source state of the line filter.

/// State carried from one byte to the next while filtering a single source.
///
/// A fresh value is created for every source, so line numbers restart at 1
/// and a blank-line run never spans two sources.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StreamState {
    /// Next line number to print.
    pub line_number: u64,
    /// The next byte begins a new output line.
    pub at_line_start: bool,
    /// The preceding input byte was a line terminator. The start of a
    /// source counts as following one, so a leading empty line is blank.
    pub previous_byte_was_newline: bool,
    /// The preceding byte completed a second or later consecutive blank line.
    pub consecutive_blank_run: bool,
}

impl StreamState {
    pub fn new() -> Self {
        Self {
            line_number: 1,
            at_line_start: true,
            previous_byte_was_newline: true,
            consecutive_blank_run: false,
        }
    }

    /// Advance past `byte`. Applies whether or not the byte was printed.
    pub fn advance(self, byte: u8) -> Self {
        let is_newline = byte == b'\n';
        Self {
            line_number: self.line_number,
            at_line_start: is_newline,
            previous_byte_was_newline: is_newline,
            consecutive_blank_run: is_newline && self.previous_byte_was_newline,
        }
    }
}

impl Default for StreamState {
    fn default() -> Self {
        Self::new()
    }
}
