// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Error type for table conversion.

use std::path::PathBuf;

use thiserror::Error;

/// Failures raised while loading or converting a table.
///
/// The encoders never fail. With default options only the boundary
/// (`InvalidArgument`, `IoUnavailable`) and the stream (`Read`, `Tokenize`)
/// can produce errors; the validation variants exist only when strict
/// checking is switched on.
#[derive(Debug, Error)]
pub enum TableError {
    /// Caller supplied an unusable argument (e.g. an empty path).
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
    /// The table file could not be opened for reading.
    #[error("could not open {}: {source}", path.display())]
    IoUnavailable {
        /// Path that failed to open.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
    /// Reading the stream failed part-way (including non-UTF-8 input).
    #[error("read error: {0}")]
    Read(#[from] std::io::Error),
    /// A line could not be split into fields.
    #[error("tokenize error: {0}")]
    Tokenize(#[from] csv::Error),
    /// Strict arity: a row's field count differs from the header's.
    #[error("row r{row}: expected {expected} fields, found {found}")]
    ArityMismatch {
        /// 1-based data row index.
        row: u64,
        /// Header column count.
        expected: usize,
        /// Row field count.
        found: usize,
    },
    /// Strict numeric: a value does not parse as a number.
    #[error("row r{row}, column {column}: {value:?} is not numeric")]
    NonNumeric {
        /// 1-based data row index.
        row: u64,
        /// 0-based column position.
        column: usize,
        /// Offending raw text.
        value: String,
    },
}

/// Convenience alias used across the crate.
pub type Result<T, E = TableError> = std::result::Result<T, E>;
