// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Line reading and field splitting.
//!
//! The line convention decides what a data line is: a trailing `\r` and a
//! leading byte-order mark are dropped, and blank lines or lines starting
//! (after blanks) with a comment marker are skipped. Field splitting runs
//! the `csv` reader over a single line, so quoted fields may contain the
//! delimiter but not a newline.

use std::io::{BufRead, Lines};

use tracing::trace;

use crate::error::{Result, TableError};
use crate::options::TokenizerOptions;

const BOM: char = '\u{feff}';

/// Splits a stream into data lines and data lines into fields.
#[derive(Debug, Clone)]
pub struct RowTokenizer {
    delimiter: u8,
    comment_markers: Vec<char>,
    trim: bool,
}

impl RowTokenizer {
    /// Build a tokenizer. The delimiter must be one ASCII character other
    /// than a quote or a line break.
    pub fn new(options: &TokenizerOptions) -> Result<Self> {
        let delimiter = u8::try_from(options.delimiter)
            .ok()
            .filter(|b| b.is_ascii() && !matches!(*b, b'"' | b'\n' | b'\r'))
            .ok_or_else(|| {
                TableError::InvalidArgument(format!(
                    "delimiter {:?} must be a single ASCII character other than a quote or newline",
                    options.delimiter
                ))
            })?;
        Ok(Self {
            delimiter,
            comment_markers: options.comment_markers.clone(),
            trim: options.trim,
        })
    }

    /// True for blank lines and comment lines.
    pub fn is_skippable(&self, line: &str) -> bool {
        match line.trim_start_matches([' ', '\t']).chars().next() {
            None => true,
            Some(c) => self.comment_markers.contains(&c),
        }
    }

    /// Split one data line into its fields, in order.
    pub fn tokenize(&self, line: &str) -> Result<Vec<String>> {
        let trim = if self.trim {
            csv::Trim::All
        } else {
            csv::Trim::None
        };
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .delimiter(self.delimiter)
            .trim(trim)
            .from_reader(line.as_bytes());
        let mut record = csv::StringRecord::new();
        if !reader.read_record(&mut record)? {
            return Ok(Vec::new());
        }
        Ok(record.iter().map(str::to_owned).collect())
    }

    /// Iterate over the data lines of `reader`, skipping blanks and comments.
    pub fn data_lines<R: BufRead>(&self, reader: R) -> DataLines<'_, R> {
        DataLines {
            tokenizer: self,
            lines: reader.lines(),
        }
    }
}

/// Iterator returned by [`RowTokenizer::data_lines`].
#[derive(Debug)]
pub struct DataLines<'t, R> {
    tokenizer: &'t RowTokenizer,
    lines: Lines<R>,
}

impl<R: BufRead> Iterator for DataLines<'_, R> {
    type Item = Result<String>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let line = match self.lines.next()? {
                Ok(line) => normalize(line),
                Err(err) => return Some(Err(err.into())),
            };
            if !self.tokenizer.is_skippable(&line) {
                return Some(Ok(line));
            }
            trace!(line = %line, "skipping non-data line");
        }
    }
}

fn normalize(mut line: String) -> String {
    while line.ends_with('\r') {
        line.pop();
    }
    match line.strip_prefix(BOM) {
        Some(rest) => rest.to_owned(),
        None => line,
    }
}
