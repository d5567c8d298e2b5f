use std::fmt;

/// Errors that can surface from zpretty.
///
/// Rendering a document never fails; these errors come from the edges:
/// decoding input bytes and the I/O done by the command line tool.
#[derive(Debug)]
pub enum Error {
    /// The encoding label is not known.
    UnknownEncoding(String),
    /// The input bytes are not valid in the given encoding.
    Malformed(&'static str),
    /// I/O error
    Io(std::io::Error),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::UnknownEncoding(label) => write!(f, "Unknown encoding: {}", label),
            Error::Malformed(encoding) => write!(f, "Input is not valid {}", encoding),
            Error::Io(e) => write!(f, "I/O error: {}", e),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for Error {
    #[inline]
    fn from(e: std::io::Error) -> Self {
        Error::Io(e)
    }
}
