// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! File boundary: path → open stream → dataset graph.

use std::fs::File;
use std::io::{self, BufReader, ErrorKind};
use std::path::Path;

use atomese_graph::{AtomFactory, TreeFactory};
use tracing::info;

use crate::assemble::{assemble, DatasetGraph};
use crate::error::{Result, TableError};
use crate::options::ConvertOptions;

/// Loads table files with a fixed set of options.
#[derive(Debug, Clone, Default)]
pub struct TableLoader {
    options: ConvertOptions,
}

impl TableLoader {
    /// Loader using `options` for every file.
    pub fn new(options: ConvertOptions) -> Self {
        Self { options }
    }

    /// Options in effect.
    pub fn options(&self) -> &ConvertOptions {
        &self.options
    }

    /// Convert the file at `path` using a fresh [`TreeFactory`].
    pub fn load(&self, path: impl AsRef<Path>) -> Result<DatasetGraph> {
        self.load_with(TreeFactory, path)
    }

    /// Convert the file at `path` using `factory` to build atoms.
    ///
    /// Fails with `InvalidArgument` for an empty path and `IoUnavailable`
    /// when the path cannot be opened as a readable file (directories
    /// included). The file is closed before returning.
    pub fn load_with<F: AtomFactory>(
        &self,
        factory: F,
        path: impl AsRef<Path>,
    ) -> Result<DatasetGraph> {
        let path = path.as_ref();
        if path.as_os_str().is_empty() {
            return Err(TableError::InvalidArgument("the file name is empty".into()));
        }
        let file = open_regular(path).map_err(|source| TableError::IoUnavailable {
            path: path.to_path_buf(),
            source,
        })?;
        info!(path = %path.display(), "converting table");
        let graph = assemble(factory, BufReader::new(file), &self.options)?;
        info!(
            path = %path.display(),
            columns = graph.column_count(),
            rows = graph.row_count(),
            "table converted"
        );
        Ok(graph)
    }
}

// Some platforms open directories successfully and only fail on read.
fn open_regular(path: &Path) -> io::Result<File> {
    let file = File::open(path)?;
    if file.metadata()?.is_dir() {
        return Err(io::Error::from(ErrorKind::IsADirectory));
    }
    Ok(file)
}

/// Convert the file at `path` with default options.
pub fn load_table(path: impl AsRef<Path>) -> Result<DatasetGraph> {
    TableLoader::default().load(path)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
    use super::*;

    #[test]
    fn empty_path_is_invalid_argument() {
        assert!(matches!(load_table(""), Err(TableError::InvalidArgument(_))));
    }

    #[test]
    fn missing_file_is_io_unavailable() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope.csv");
        match load_table(&missing) {
            Err(TableError::IoUnavailable { path, .. }) => assert_eq!(path, missing),
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn directory_is_io_unavailable() {
        let dir = tempfile::tempdir().unwrap();
        match load_table(dir.path()) {
            Err(TableError::IoUnavailable { path, source }) => {
                assert_eq!(path, dir.path());
                if cfg!(unix) {
                    assert_eq!(source.kind(), ErrorKind::IsADirectory);
                }
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }
}
