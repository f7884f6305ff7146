use std::fmt;
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// A read ran past the end of a buffer or file.
    Truncated,
    /// A file header signature did not match.
    BadMagic,
    /// The schema version is not 4.
    UnsupportedVersion,
    /// A tag reference does not land on a tag-string header.
    BrokenRef,
    /// Per-file metadata extraction failed.
    Metadata,
    Io,
}

#[derive(Debug)]
pub struct Error {
    pub kind: ErrorKind,
    pub context: String,
}

impl Error {
    pub fn new(kind: ErrorKind, context: String) -> Self {
        Error { kind, context }
    }

    pub fn truncated(what: &str) -> Self {
        Error::new(ErrorKind::Truncated, what.to_string())
    }

    pub fn io(path: &Path, err: std::io::Error) -> Self {
        Error::new(ErrorKind::Io, format!("{}: {}", path.display(), err))
    }

    pub fn metadata(path: &Path, detail: impl fmt::Display) -> Self {
        Error::new(ErrorKind::Metadata, format!("{}: {}", path.display(), detail))
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{:?}: {}", self.kind, self.context)
    }
}

impl std::error::Error for Error {}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error {
            kind: ErrorKind::Io,
            context: err.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
