use std::fmt;

#[derive(Debug)]
pub enum Error {
    Io(std::io::Error),
    /// The input is not a personnel record we can read.
    InvalidRecord(String),
    /// A section or row violates the grid invariants (construction-time defect).
    Layout(String),
    /// Failure in the PDF rendering primitives.
    Pdf(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Io(e) => write!(f, "I/O error: {e}"),
            Error::InvalidRecord(msg) => write!(f, "invalid record: {msg}"),
            Error::Layout(msg) => write!(f, "layout error: {msg}"),
            Error::Pdf(msg) => write!(f, "PDF error: {msg}"),
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
    fn from(e: std::io::Error) -> Self {
        Error::Io(e)
    }
}
