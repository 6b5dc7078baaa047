// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
#![allow(clippy::unwrap_used, clippy::expect_used)]
//! File-boundary behavior of `TableLoader`.

use std::io::Write;

use atomese_graph::AtomTable;
use table_atomese::{load_table, ConvertOptions, TableError, TableLoader, Validation};

fn write_table(contents: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().expect("temp file");
    file.write_all(contents.as_bytes()).expect("write table");
    file
}

#[test]
fn loads_a_file_from_disk() {
    let file = write_table("i1,i2,o\n0,1,1\n1,0,1\n0,0,0\n");
    let graph = load_table(file.path()).expect("load");
    assert_eq!(graph.column_count(), 3);
    assert_eq!(graph.row_count(), 3);
}

#[test]
fn empty_path_returns_no_graph() {
    let err = TableLoader::default().load("").unwrap_err();
    assert!(matches!(err, TableError::InvalidArgument(_)));
    assert!(err.to_string().contains("empty"));
}

#[test]
fn nonexistent_path_returns_no_graph() {
    let dir = tempfile::tempdir().expect("temp dir");
    let err = load_table(dir.path().join("missing.csv")).unwrap_err();
    assert!(matches!(err, TableError::IoUnavailable { .. }));
    assert!(err.to_string().contains("missing.csv"));
}

#[test]
fn tab_separated_file_with_options() {
    let file = write_table("a\tb\n1\t2\n");
    let mut options = ConvertOptions::default();
    options.tokenizer.delimiter = '\t';
    let graph = TableLoader::new(options).load(file.path()).expect("load");
    assert_eq!(graph.column_count(), 2);
    assert_eq!(graph.row_set().outgoing()[0].outgoing()[1].arity(), 2);
}

#[test]
fn strict_loader_fails_without_partial_result() {
    let file = write_table("a,b\n1,2\n3\n");
    let options = ConvertOptions {
        validation: Validation {
            arity: true,
            numeric: true,
        },
        ..ConvertOptions::default()
    };
    let err = TableLoader::new(options).load(file.path()).unwrap_err();
    assert!(matches!(err, TableError::ArityMismatch { row: 2, .. }));
}

#[test]
fn caller_supplied_factory_is_used() {
    let file = write_table("a,b\n0,0\n");
    let table = AtomTable::new();
    let graph = TableLoader::default()
        .load_with(&table, file.path())
        .expect("load");
    assert_eq!(graph.row_count(), 1);
    // a, b, "0", r1, header, tuple, row, set, root
    assert_eq!(table.len(), 9);
}
