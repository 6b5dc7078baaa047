// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Dataset assembly: header + rows → one similarity graph.
//!
//! ```text
//! (SimilarityLink (stv 1 1)
//!   (ListLink (SchemaNode "i1") (SchemaNode "i2") (SchemaNode "o"))
//!   (SetLink
//!     (ListLink (Node "r1") (ListLink (NumberNode "0") (NumberNode "1") (NumberNode "1")))
//!     ...))
//! ```
//!
//! The first data line is always the header. Row indices are dense: one per
//! data line pushed after the header, starting at `r1`.

use std::io::BufRead;

use atomese_graph::{AtomFactory, Handle, LinkType, TruthValue};
use tracing::{debug, trace};

use crate::encode::{encode_header, encode_row, RowIndex};
use crate::error::{Result, TableError};
use crate::options::{ConvertOptions, Validation};
use crate::tokenizer::RowTokenizer;

/// Root of a converted table plus direct access to its two parts.
#[derive(Debug, Clone)]
pub struct DatasetGraph {
    root: Handle,
    header: Handle,
    row_set: Handle,
}

impl DatasetGraph {
    /// The similarity link over (header, row set).
    pub fn root(&self) -> &Handle {
        &self.root
    }

    /// Give up the wrapper and keep only the root handle.
    pub fn into_handle(self) -> Handle {
        self.root
    }

    /// Ordered list of schema nodes.
    pub fn header(&self) -> &Handle {
        &self.header
    }

    /// Set of row fragments, in read order.
    pub fn row_set(&self) -> &Handle {
        &self.row_set
    }

    /// Number of header columns.
    pub fn column_count(&self) -> usize {
        self.header.arity()
    }

    /// Number of data rows.
    pub fn row_count(&self) -> usize {
        self.row_set.arity()
    }
}

#[derive(Debug)]
enum State {
    AwaitingHeader,
    ConsumingRows {
        header: Handle,
        columns: usize,
        next: RowIndex,
        rows: Vec<Handle>,
    },
}

/// Incremental builder fed one tokenized line at a time.
#[derive(Debug)]
pub struct DatasetAssembler<F> {
    factory: F,
    validation: Validation,
    state: State,
}

impl<F: AtomFactory> DatasetAssembler<F> {
    /// Permissive assembler.
    pub fn new(factory: F) -> Self {
        Self::with_validation(factory, Validation::default())
    }

    /// Assembler that applies `validation` to every data row.
    pub fn with_validation(factory: F, validation: Validation) -> Self {
        Self {
            factory,
            validation,
            state: State::AwaitingHeader,
        }
    }

    /// True until the header line has been pushed.
    pub fn is_awaiting_header(&self) -> bool {
        matches!(self.state, State::AwaitingHeader)
    }

    /// Number of data rows pushed so far.
    pub fn rows_consumed(&self) -> usize {
        match &self.state {
            State::AwaitingHeader => 0,
            State::ConsumingRows { rows, .. } => rows.len(),
        }
    }

    /// Feed the next data line's fields.
    ///
    /// The first call encodes the header; later calls encode rows `r1`, `r2`, ...
    /// Only fails when a validation check is enabled and the row violates it;
    /// a rejected row does not consume an index.
    pub fn push<S: AsRef<str>>(&mut self, fields: &[S]) -> Result<()> {
        match &mut self.state {
            State::AwaitingHeader => {
                let header = encode_header(&self.factory, fields);
                debug!(columns = fields.len(), "header encoded");
                self.state = State::ConsumingRows {
                    header,
                    columns: fields.len(),
                    next: RowIndex::FIRST,
                    rows: Vec::new(),
                };
            }
            State::ConsumingRows {
                columns,
                next,
                rows,
                ..
            } => {
                check_row(self.validation, *next, *columns, fields)?;
                rows.push(encode_row(&self.factory, fields, *next));
                trace!(row = %next, fields = fields.len(), "row encoded");
                *next = next.next();
            }
        }
        Ok(())
    }

    /// Wrap everything pushed so far into the dataset graph.
    ///
    /// With nothing pushed the header is an empty list; with only a header
    /// the row set is empty.
    pub fn finish(self) -> DatasetGraph {
        let (header, rows) = match self.state {
            State::AwaitingHeader => (encode_header::<_, &str>(&self.factory, &[]), Vec::new()),
            State::ConsumingRows { header, rows, .. } => (header, rows),
        };
        let row_set = self.factory.make_link(LinkType::SetLink, rows);
        let root = self.factory.make_link_with_tv(
            LinkType::SimilarityLink,
            vec![header.clone(), row_set.clone()],
            TruthValue::TRUE,
        );
        let graph = DatasetGraph {
            root,
            header,
            row_set,
        };
        debug!(
            columns = graph.column_count(),
            rows = graph.row_count(),
            "dataset assembled"
        );
        graph
    }
}

fn check_row<S: AsRef<str>>(
    validation: Validation,
    row: RowIndex,
    columns: usize,
    fields: &[S],
) -> Result<()> {
    if validation.arity && fields.len() != columns {
        return Err(TableError::ArityMismatch {
            row: row.get(),
            expected: columns,
            found: fields.len(),
        });
    }
    if validation.numeric {
        if let Some((column, value)) = fields
            .iter()
            .map(AsRef::as_ref)
            .enumerate()
            .find(|(_, v)| v.parse::<f64>().is_err())
        {
            return Err(TableError::NonNumeric {
                row: row.get(),
                column,
                value: value.to_owned(),
            });
        }
    }
    Ok(())
}

/// Read `reader` to the end and build its dataset graph.
///
/// Everything is buffered in memory; nothing is returned on failure.
pub fn assemble<F, R>(factory: F, reader: R, options: &ConvertOptions) -> Result<DatasetGraph>
where
    F: AtomFactory,
    R: BufRead,
{
    let tokenizer = RowTokenizer::new(&options.tokenizer)?;
    let mut assembler = DatasetAssembler::with_validation(factory, options.validation);
    for line in tokenizer.data_lines(reader) {
        let fields = tokenizer.tokenize(&line?)?;
        assembler.push(&fields)?;
    }
    Ok(assembler.finish())
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
    use super::*;
    use atomese_graph::{AtomTable, NodeType, TreeFactory};

    fn row_labels(graph: &DatasetGraph) -> Vec<String> {
        graph
            .row_set()
            .outgoing()
            .iter()
            .filter_map(|row| row.outgoing().first().and_then(|l| l.name()).map(str::to_owned))
            .collect()
    }

    #[test]
    fn first_push_is_the_header() {
        let mut asm = DatasetAssembler::new(TreeFactory);
        assert!(asm.is_awaiting_header());
        asm.push(&["i1", "o"]).unwrap();
        assert!(!asm.is_awaiting_header());
        assert_eq!(asm.rows_consumed(), 0);
        asm.push(&["0", "1"]).unwrap();
        asm.push(&["1", "0"]).unwrap();
        assert_eq!(asm.rows_consumed(), 2);

        let graph = asm.finish();
        assert_eq!(graph.column_count(), 2);
        assert_eq!(graph.row_count(), 2);
        assert_eq!(row_labels(&graph), vec!["r1", "r2"]);
    }

    #[test]
    fn nothing_pushed_gives_empty_header_and_rows() {
        let graph = DatasetAssembler::new(TreeFactory).finish();
        assert_eq!(
            graph.root().to_short_string(),
            "(SimilarityLink (stv 1.000000 1.000000) (ListLink) (SetLink))"
        );
    }

    #[test]
    fn header_only_gives_empty_row_set() {
        let mut asm = DatasetAssembler::new(TreeFactory);
        asm.push(&["a", "b"]).unwrap();
        let graph = asm.finish();
        assert_eq!(graph.column_count(), 2);
        assert_eq!(graph.row_count(), 0);
        assert_eq!(graph.row_set().link_type(), Some(LinkType::SetLink));
    }

    #[test]
    fn root_is_a_confident_similarity_over_header_and_rows() {
        let mut asm = DatasetAssembler::new(TreeFactory);
        asm.push(&["x"]).unwrap();
        asm.push(&["1"]).unwrap();
        let graph = asm.finish();
        let root = graph.root();
        assert_eq!(root.link_type(), Some(LinkType::SimilarityLink));
        assert_eq!(root.tv(), TruthValue::TRUE);
        assert_eq!(root.outgoing(), &[graph.header().clone(), graph.row_set().clone()]);
    }

    #[test]
    fn permissive_by_default() {
        let mut asm = DatasetAssembler::new(TreeFactory);
        asm.push(&["a", "b", "c"]).unwrap();
        asm.push(&["1"]).unwrap();
        asm.push(&["x", "y", "z", "w"]).unwrap();
        let graph = asm.finish();
        assert_eq!(row_labels(&graph), vec!["r1", "r2"]);
    }

    #[test]
    fn strict_arity_rejects_ragged_rows() {
        let validation = Validation {
            arity: true,
            numeric: false,
        };
        let mut asm = DatasetAssembler::with_validation(TreeFactory, validation);
        asm.push(&["a", "b"]).unwrap();
        asm.push(&["1", "2"]).unwrap();
        let err = asm.push(&["1"]).unwrap_err();
        assert!(matches!(
            err,
            TableError::ArityMismatch {
                row: 2,
                expected: 2,
                found: 1
            }
        ));
        assert_eq!(asm.rows_consumed(), 1);
    }

    #[test]
    fn strict_numeric_rejects_text() {
        let validation = Validation {
            arity: false,
            numeric: true,
        };
        let mut asm = DatasetAssembler::with_validation(TreeFactory, validation);
        asm.push(&["not", "checked"]).unwrap();
        asm.push(&["1", "-2.5e3"]).unwrap();
        let err = asm.push(&["1", "T"]).unwrap_err();
        match err {
            TableError::NonNumeric { row, column, value } => {
                assert_eq!((row, column, value.as_str()), (2, 1, "T"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn skipped_lines_do_not_consume_indices() {
        let input = "i1,o\n# comment\n\n0,1\n; another\n1,1\n";
        let graph = assemble(TreeFactory, input.as_bytes(), &ConvertOptions::default()).unwrap();
        assert_eq!(row_labels(&graph), vec!["r1", "r2"]);
    }

    #[test]
    fn interning_factory_shares_repeated_values() {
        let table = AtomTable::new();
        let input = "a,b\n0,0\n0,0\n";
        let graph = assemble(&table, input.as_bytes(), &ConvertOptions::default()).unwrap();
        let rows = graph.row_set().outgoing();
        let first = &rows[0].outgoing()[1];
        let second = &rows[1].outgoing()[1];
        assert!(Handle::ptr_eq(first, second));
        assert!(Handle::ptr_eq(&first.outgoing()[0], &first.outgoing()[1]));
        assert_eq!(first.outgoing()[0].node_type(), Some(NodeType::NumberNode));
    }

    #[test]
    fn tokenizer_errors_surface_before_reading() {
        let mut options = ConvertOptions::default();
        options.tokenizer.delimiter = '"';
        let err = assemble(TreeFactory, "a\n".as_bytes(), &options).unwrap_err();
        assert!(matches!(err, TableError::InvalidArgument(_)));
    }
}
