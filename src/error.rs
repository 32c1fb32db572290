use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::mapping::{ParseError, ParseErrorKind};

/// Error building a [`ProguardMap`](crate::ProguardMap) or loading its
/// configuration.
#[derive(Debug, Error)]
pub enum Error {
    /// A line of the mapping could not be parsed.
    #[error("malformed mapping at line {line_number}: {kind}: `{line}`")]
    Parse {
        /// The 1-based number of the offending line.
        line_number: usize,
        /// The offending line.
        line: String,
        /// What was wrong with it.
        kind: ParseErrorKind,
    },

    /// A field or method line came before the first class header.
    #[error("member at line {line_number} appears before any class header")]
    MemberOutsideClass {
        /// The 1-based number of the offending line.
        line_number: usize,
    },

    /// Reading the mapping stream failed.
    #[error("failed to read mapping: {0}")]
    Io(#[from] io::Error),

    /// Reading a mapping or config file failed.
    #[error("failed to read {}: {source}", path.display())]
    Read {
        /// The file that was read.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: io::Error,
    },

    /// The configuration is not valid JSON for [`MapConfig`](crate::MapConfig).
    #[error("failed to parse config: {0}")]
    Config(#[from] serde_json::Error),
}

impl From<ParseError<'_>> for Error {
    fn from(err: ParseError<'_>) -> Self {
        Error::Parse {
            line_number: err.line_number(),
            line: String::from_utf8_lossy(err.line()).into_owned(),
            kind: err.kind(),
        }
    }
}
