//! Knobs that customize how an archive treats imperfect input and how it
//! writes output.
//!
//! ```
//! use archivist::{MismatchedTypesPolicy, OverflowNumberPolicy, SerializationOptions};
//!
//! let options = SerializationOptions::new()
//!     .with_overflow_number_policy(OverflowNumberPolicy::Skip)
//!     .with_mismatched_types_policy(MismatchedTypesPolicy::Skip);
//!
//! assert_eq!(options.overflow_number_policy(), OverflowNumberPolicy::Skip);
//! assert_ne!(options, SerializationOptions::default());
//! ```

use crate::UtfType;

/// What to do when a stored number does not fit the target type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OverflowNumberPolicy {
    /// Fail the load with an overflow error
    #[default]
    ThrowError,

    /// Leave the target untouched and record a validation message
    Skip,
}

/// What to do when a stored value has a shape incompatible with the target
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MismatchedTypesPolicy {
    /// Fail the load with a mismatched types error
    #[default]
    ThrowError,

    /// Leave the target untouched and record a validation message
    Skip,
}

/// Controls the layout of text output
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FormatOptions {
    pretty: bool,
    indent_char: char,
    indent_width: u8,
}

impl FormatOptions {
    pub fn new() -> Self {
        FormatOptions::default()
    }

    /// Sets if the output is indented over multiple lines
    pub fn with_pretty(mut self, pretty: bool) -> Self {
        self.pretty = pretty;
        self
    }

    /// Sets the character repeated for every level of indentation
    pub fn with_indent_char(mut self, indent_char: char) -> Self {
        self.indent_char = indent_char;
        self
    }

    /// Sets how many indent characters make up one level
    pub fn with_indent_width(mut self, indent_width: u8) -> Self {
        self.indent_width = indent_width;
        self
    }

    pub fn pretty(&self) -> bool {
        self.pretty
    }

    pub fn indent_char(&self) -> char {
        self.indent_char
    }

    pub fn indent_width(&self) -> u8 {
        self.indent_width
    }

    /// The text of one indentation level
    pub(crate) fn indent(&self) -> String {
        std::iter::repeat(self.indent_char)
            .take(usize::from(self.indent_width))
            .collect()
    }
}

impl Default for FormatOptions {
    fn default() -> Self {
        FormatOptions {
            pretty: false,
            indent_char: ' ',
            indent_width: 4,
        }
    }
}

/// Controls how text output is encoded when written to a stream
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StreamOptions {
    encoding: UtfType,
    write_bom: bool,
}

impl StreamOptions {
    pub fn new() -> Self {
        StreamOptions::default()
    }

    pub fn with_encoding(mut self, encoding: UtfType) -> Self {
        self.encoding = encoding;
        self
    }

    /// Sets if the stream starts with the byte order mark of its encoding
    pub fn with_bom(mut self, write_bom: bool) -> Self {
        self.write_bom = write_bom;
        self
    }

    pub fn encoding(&self) -> UtfType {
        self.encoding
    }

    pub fn write_bom(&self) -> bool {
        self.write_bom
    }
}

impl Default for StreamOptions {
    fn default() -> Self {
        StreamOptions {
            encoding: UtfType::Utf8,
            write_bom: true,
        }
    }
}

/// Options shared by every scope of an archive
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SerializationOptions {
    overflow_number_policy: OverflowNumberPolicy,
    mismatched_types_policy: MismatchedTypesPolicy,
    format: FormatOptions,
    stream: StreamOptions,
}

impl SerializationOptions {
    /// Creates the structure with default options
    pub fn new() -> Self {
        SerializationOptions::default()
    }

    pub fn with_overflow_number_policy(mut self, policy: OverflowNumberPolicy) -> Self {
        self.overflow_number_policy = policy;
        self
    }

    pub fn with_mismatched_types_policy(mut self, policy: MismatchedTypesPolicy) -> Self {
        self.mismatched_types_policy = policy;
        self
    }

    pub fn with_format(mut self, format: FormatOptions) -> Self {
        self.format = format;
        self
    }

    pub fn with_stream(mut self, stream: StreamOptions) -> Self {
        self.stream = stream;
        self
    }

    pub fn overflow_number_policy(&self) -> OverflowNumberPolicy {
        self.overflow_number_policy
    }

    pub fn mismatched_types_policy(&self) -> MismatchedTypesPolicy {
        self.mismatched_types_policy
    }

    pub fn format(&self) -> &FormatOptions {
        &self.format
    }

    pub fn stream(&self) -> &StreamOptions {
        &self.stream
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_throw() {
        let options = SerializationOptions::default();
        assert_eq!(options.overflow_number_policy(), OverflowNumberPolicy::ThrowError);
        assert_eq!(options.mismatched_types_policy(), MismatchedTypesPolicy::ThrowError);
        assert!(!options.format().pretty());
        assert_eq!(options.stream().encoding(), UtfType::Utf8);
        assert!(options.stream().write_bom());
    }

    #[test]
    fn indent_repeats_char() {
        let format = FormatOptions::new()
            .with_indent_char('\t')
            .with_indent_width(2);
        assert_eq!(format.indent(), "\t\t");
    }
}
