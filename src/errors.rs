use crate::ValidationErrors;
use std::fmt;

/// An error that can occur when saving or loading an object
#[derive(Debug)]
pub struct Error(Box<ErrorKind>);

impl Error {
    pub(crate) fn new(kind: ErrorKind) -> Error {
        Error(Box::new(kind))
    }

    /// Return the specific type of error
    pub fn kind(&self) -> &ErrorKind {
        &self.0
    }

    /// Consume the error and return the specific type of error
    pub fn into_kind(self) -> ErrorKind {
        *self.0
    }

    /// Returns the path of the value that triggered the error (if available)
    pub fn path(&self) -> Option<&str> {
        self.0.path()
    }
}

/// Specific type of error
#[derive(Debug)]
pub enum ErrorKind {
    /// The input could not be parsed by the format backend
    Parsing {
        message: String,
        line: usize,
        column: usize,
    },

    /// The input stream is neither marked with a byte order mark nor valid UTF-8
    UnsupportedEncoding,

    /// A number did not fit into the target type
    Overflow { path: String, message: String },

    /// The stored value has a shape incompatible with the target type
    MismatchedTypes { path: String, message: String },

    /// An array was read past its last element
    OutOfRange { path: String, message: String },

    /// Loading finished with recorded validation errors
    FailedValidation(ValidationErrors),

    /// A value could not be saved as text, or a map key could not be read
    /// from text
    Convert { path: String, error: ConvertError },

    /// An error occurred reading or writing a stream
    Io(std::io::Error),

    /// A free form error raised by the format backend
    Message(String),
}

impl ErrorKind {
    pub fn path(&self) -> Option<&str> {
        match self {
            ErrorKind::Overflow { path, .. }
            | ErrorKind::MismatchedTypes { path, .. }
            | ErrorKind::OutOfRange { path, .. }
            | ErrorKind::Convert { path, .. } => Some(path.as_str()),
            _ => None,
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match *self.0 {
            ErrorKind::Convert { ref error, .. } => Some(error),
            ErrorKind::Io(ref err) => Some(err),
            _ => None,
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self.0 {
            ErrorKind::Parsing {
                ref message,
                line,
                column,
            } => write!(
                f,
                "unable to parse input: {} (line: {}, column: {})",
                message, line, column
            ),
            ErrorKind::UnsupportedEncoding => write!(
                f,
                "unsupported encoding: input has no byte order mark and is not valid utf-8"
            ),
            ErrorKind::Overflow {
                ref path,
                ref message,
            } => write!(f, "overflow at '{}': {}", path, message),
            ErrorKind::MismatchedTypes {
                ref path,
                ref message,
            } => write!(f, "mismatched types at '{}': {}", path, message),
            ErrorKind::OutOfRange {
                ref path,
                ref message,
            } => write!(f, "out of range at '{}': {}", path, message),
            ErrorKind::FailedValidation(ref errors) => {
                write!(f, "validation failed for {} path(s)", errors.len())
            }
            ErrorKind::Convert {
                ref path,
                ref error,
            } => write!(f, "conversion failed at '{}': {}", path, error),
            ErrorKind::Io(ref err) => write!(f, "io error: {}", err),
            ErrorKind::Message(ref msg) => write!(f, "{}", msg),
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(error: std::io::Error) -> Self {
        Error::new(ErrorKind::Io(error))
    }
}

impl From<ErrorKind> for Error {
    fn from(kind: ErrorKind) -> Self {
        Error::new(kind)
    }
}

/// An error raised by the text conversion engine
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConvertError {
    /// The text is not a recognized boolean
    InvalidBool(String),

    /// The text is not a number of the requested type
    InvalidNumber(String),

    /// The number is well formed but does not fit in the requested type
    Overflow(String),

    /// The text or value is not registered for the enum
    UnknownEnumValue {
        type_name: &'static str,
        value: String,
    },

    /// A datetime component is malformed or out of bounds
    Parsing { field: &'static str, input: String },

    /// A valid value that lies outside of the representable range of the target
    Range(String),
}

impl std::error::Error for ConvertError {}

impl fmt::Display for ConvertError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ConvertError::InvalidBool(text) => write!(f, "'{}' is not a boolean", text),
            ConvertError::InvalidNumber(text) => write!(f, "'{}' is not a number", text),
            ConvertError::Overflow(msg) => write!(f, "{}", msg),
            ConvertError::UnknownEnumValue { type_name, value } => {
                write!(f, "'{}' is not a registered value of {}", value, type_name)
            }
            ConvertError::Parsing { field, input } => write!(
                f,
                "invalid {} in '{}', expected YYYY-MM-DDThh:mm:ss[.SSS]Z",
                field, input
            ),
            ConvertError::Range(msg) => write!(f, "{}", msg),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_size() {
        assert_eq!(std::mem::size_of::<Error>(), std::mem::size_of::<usize>());
    }

    #[test]
    fn error_exposes_path() {
        let err = Error::new(ErrorKind::OutOfRange {
            path: String::from("/items/2"),
            message: String::from("No more items to load"),
        });
        assert_eq!(err.path(), Some("/items/2"));
        assert_eq!(
            err.to_string(),
            "out of range at '/items/2': No more items to load"
        );
    }

    #[test]
    fn datetime_parse_error_names_pattern() {
        let err = ConvertError::Parsing {
            field: "month",
            input: String::from("2020-13-01T00:00:00Z"),
        };
        let msg = err.to_string();
        assert!(msg.contains("month"));
        assert!(msg.contains("YYYY-MM-DDThh:mm:ss[.SSS]Z"));
    }
}
