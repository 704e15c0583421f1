use std::{error::Error, fmt, path::PathBuf};

use crate::isa::error::ParseError;

/// Failure while ingesting description text, carrying enough context to point at the input.
#[derive(Debug)]
pub enum LoadError {
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    Line {
        path: Option<PathBuf>,
        /// 1-based line number.
        line: usize,
        text: String,
        source: ParseError,
    },
}

impl LoadError {
    /// 1-based line number of the offending description, when the failure came from a line.
    pub fn line(&self) -> Option<usize> {
        match self {
            LoadError::Io { .. } => None,
            LoadError::Line { line, .. } => Some(*line),
        }
    }
}

impl fmt::Display for LoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LoadError::Io { path, source } => {
                write!(f, "failed to read '{}': {source}", path.display())
            }
            LoadError::Line {
                path: Some(path),
                line,
                text,
                source,
            } => write!(f, "{}:{line}: {source} (in {text:?})", path.display()),
            LoadError::Line {
                path: None,
                line,
                text,
                source,
            } => write!(f, "line {line}: {source} (in {text:?})"),
        }
    }
}

impl Error for LoadError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            LoadError::Io { source, .. } => Some(source),
            LoadError::Line { source, .. } => Some(source),
        }
    }
}
