//! Per-call policy for the bulk converters.

/// The default character substituted for invalid input.
pub const DEFAULT_CHAR: char = '?';

/// What to do when the input ends partway through a multi-unit group,
/// e.g. a utf8 lead byte without all of its trailing bytes, or a utf16
/// high surrogate as the last unit.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Truncation {
    /// Emit the default character in place of the incomplete group and
    /// finish successfully.  Without a default character this is reported
    /// as `ConvertError::Invalid`.
    Substitute,
    /// Stop and return `ConvertError::Truncated`.
    Report,
}

/// Options controlling how the bulk converters deal with bad input.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct ConvertOptions {
    /// Character emitted in place of invalid input.  `None` makes invalid
    /// input an error, and so does `Some('\0')`.
    pub default_char: Option<char>,
    /// Handling of input that ends in an incomplete group.
    pub truncation: Truncation,
}

impl ConvertOptions {
    /// Substitutes `DEFAULT_CHAR` for invalid and truncated input.
    pub const fn new() -> ConvertOptions {
        ConvertOptions {
            default_char: Some(DEFAULT_CHAR),
            truncation: Truncation::Substitute,
        }
    }

    /// Rejects invalid and truncated input with `ConvertError::Invalid`.
    pub const fn strict() -> ConvertOptions {
        ConvertOptions {
            default_char: None,
            truncation: Truncation::Substitute,
        }
    }

    /// Sets the default character.  A NUL character is treated the same as
    /// `None`, since it can't be told apart from the terminator.
    pub fn with_default_char(mut self, default_char: Option<char>) -> ConvertOptions {
        self.default_char = default_char.filter(|&c| c != '\0');
        self
    }

    pub fn with_truncation(mut self, truncation: Truncation) -> ConvertOptions {
        self.truncation = truncation;
        self
    }
}

impl Default for ConvertOptions {
    fn default() -> ConvertOptions {
        ConvertOptions::new()
    }
}
