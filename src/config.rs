//! Display options for a filtering run.

/// The set of display options, fixed for the whole run.
///
/// The fields are independent toggles with a few interaction rules that the
/// filter applies as guard conditions:
///
/// - `number_nonblank_lines` wins over `number_all_lines` on blank lines.
/// - `show_tabs` only has an effect together with `show_nonprinting`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Config {
    pub number_all_lines: bool,
    pub number_nonblank_lines: bool,
    pub show_ends: bool,
    pub show_nonprinting: bool,
    pub show_tabs: bool,
    pub squeeze_blank: bool,
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    /// True when no option is set and input can be copied through as-is.
    pub fn is_plain(&self) -> bool {
        *self == Self::default()
    }

    /// True when some line gets a number prefix.
    pub fn numbers_lines(&self) -> bool {
        self.number_all_lines || self.number_nonblank_lines
    }
}
