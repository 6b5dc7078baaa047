// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Conversion options (tokenizer conventions + optional validation).

use serde::{Deserialize, Serialize};

/// Everything that tunes a conversion. Serializable so it can live in a
/// config store; missing fields fall back to their defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct ConvertOptions {
    /// Line and field splitting conventions.
    pub tokenizer: TokenizerOptions,
    /// Opt-in strictness checks.
    pub validation: Validation,
}

/// How lines are recognized and split into fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TokenizerOptions {
    /// Field separator (single ASCII character).
    pub delimiter: char,
    /// A line whose first non-blank character is one of these is skipped.
    pub comment_markers: Vec<char>,
    /// Trim whitespace around each field.
    pub trim: bool,
}

impl Default for TokenizerOptions {
    fn default() -> Self {
        Self {
            delimiter: ',',
            comment_markers: vec!['#', ';', '!'],
            trim: true,
        }
    }
}

/// Opt-in checks. Both off by default, which keeps conversion permissive:
/// rows of any width and any text are encoded verbatim.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Validation {
    /// Reject rows whose field count differs from the header's.
    pub arity: bool,
    /// Reject values that do not parse as floating-point numbers.
    pub numeric: bool,
}

impl Validation {
    /// True when any check is enabled.
    pub const fn is_strict(self) -> bool {
        self.arity || self.numeric
    }
}
