use core::{fmt, num::ParseFloatError};
use std::io;

#[derive(Debug)]
pub enum Error {
    /// A minimum, maximum or target query was made against an empty tree.
    EmptyTree,
    /// A weight was NaN or infinite.
    InvalidWeight(f64),
    /// A weight field was not a number.
    InvalidFloat(ParseFloatError),
    /// An input line could not be parsed into a command. `line` is 1-based.
    Parse { line: usize, kind: ParseErrorKind },
    Io(io::Error),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseErrorKind {
    Empty,
    UnknownKeyword(String),
    MissingField(&'static str),
    InvalidWeight(String),
}

impl Error {
    pub(crate) fn parse(line: usize, kind: ParseErrorKind) -> Self {
        Error::Parse { line, kind }
    }
}

impl From<ParseFloatError> for Error {
    fn from(err: ParseFloatError) -> Self {
        Error::InvalidFloat(err)
    }
}

impl From<io::Error> for Error {
    fn from(err: io::Error) -> Self {
        Error::Io(err)
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::EmptyTree => write!(f, "the tree is empty"),
            Error::InvalidWeight(w) => write!(f, "invalid weight: {w}"),
            Error::InvalidFloat(err) => write!(f, "invalid weight: {err}"),
            Error::Parse { line, kind } => write!(f, "line {line}: {kind}"),
            Error::Io(err) => write!(f, "i/o error: {err}"),
        }
    }
}

impl fmt::Display for ParseErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseErrorKind::Empty => write!(f, "empty line"),
            ParseErrorKind::UnknownKeyword(kw) => write!(f, "unknown keyword `{kw}`"),
            ParseErrorKind::MissingField(field) => write!(f, "missing {field}"),
            ParseErrorKind::InvalidWeight(w) => write!(f, "invalid weight `{w}`"),
        }
    }
}

impl core::error::Error for Error {
    fn source(&self) -> Option<&(dyn core::error::Error + 'static)> {
        match self {
            Error::InvalidFloat(err) => Some(err),
            Error::Io(err) => Some(err),
            _ => None,
        }
    }
}
