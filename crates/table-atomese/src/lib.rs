// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Headered delimited tables → Atomese similarity graph.
//!
//! A table such as
//!
//! ```text
//! i1,i2,o
//! 0,1,1
//! 1,0,1
//! ```
//!
//! becomes a `SimilarityLink` (truth value `stv 1 1`) over the header's
//! `ListLink` of `SchemaNode`s and a `SetLink` of rows, each row being
//! `(ListLink (Node "rN") (ListLink (NumberNode ...) ...))`.
//!
//! Layers, leaves first:
//! - [`tokenizer`]: data-line convention and field splitting.
//! - [`encode`]: header and row encoders (pure).
//! - [`assemble`](mod@assemble): the header/rows state machine and the stream driver.
//! - [`loader`]: the file boundary.
//!
//! Atoms are built through any [`AtomFactory`](atomese_graph::AtomFactory).
#![forbid(unsafe_code)]

pub mod assemble;
pub mod config;
pub mod encode;
pub mod error;
pub mod loader;
pub mod options;
pub mod tokenizer;

pub use assemble::{assemble, DatasetAssembler, DatasetGraph};
pub use encode::{encode_header, encode_row, RowIndex};
pub use error::{Result, TableError};
pub use loader::{load_table, TableLoader};
pub use options::{ConvertOptions, TokenizerOptions, Validation};
pub use tokenizer::RowTokenizer;
