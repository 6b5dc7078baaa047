// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Persisted conversion options.
//!
//! [`OptionsConfig`] keeps one [`ConvertOptions`] document as JSON in a
//! [`ConfigStore`]. Storage is pluggable so front ends decide where the
//! document lives; the library never touches the filesystem for config.

use thiserror::Error;
use tracing::{debug, warn};

use crate::options::ConvertOptions;

/// Key under which options are stored unless another is chosen.
pub const DEFAULT_KEY: &str = "convert";

/// Raw blob storage keyed by logical name.
pub trait ConfigStore {
    /// Read the blob stored under `key`; `Ok(None)` when nothing is stored.
    fn read(&self, key: &str) -> Result<Option<Vec<u8>>, ConfigError>;
    /// Replace the blob stored under `key`.
    fn write(&self, key: &str, bytes: &[u8]) -> Result<(), ConfigError>;
}

impl<S: ConfigStore + ?Sized> ConfigStore for &S {
    fn read(&self, key: &str) -> Result<Option<Vec<u8>>, ConfigError> {
        (**self).read(key)
    }

    fn write(&self, key: &str, bytes: &[u8]) -> Result<(), ConfigError> {
        (**self).write(key, bytes)
    }
}

/// Failures while reading or writing stored options.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The store has no usable location (e.g. no home directory).
    #[error("config store unavailable: {0}")]
    Unavailable(String),
    /// The store failed to read or write.
    #[error("config io error for {key:?}: {source}")]
    Io {
        /// Key being accessed.
        key: String,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
    /// The stored document is not valid options JSON.
    #[error("malformed config {key:?}: {source}")]
    Malformed {
        /// Key being decoded.
        key: String,
        /// JSON decode error.
        #[source]
        source: serde_json::Error,
    },
    /// The options could not be encoded.
    #[error("could not encode config: {0}")]
    Encode(#[source] serde_json::Error),
}

/// Loads and saves [`ConvertOptions`] through a [`ConfigStore`].
#[derive(Debug)]
pub struct OptionsConfig<S> {
    store: S,
    key: String,
}

impl<S: ConfigStore> OptionsConfig<S> {
    /// Options document stored under [`DEFAULT_KEY`].
    pub fn new(store: S) -> Self {
        Self::with_key(store, DEFAULT_KEY)
    }

    /// Options document stored under `key`.
    pub fn with_key(store: S, key: impl Into<String>) -> Self {
        Self {
            store,
            key: key.into(),
        }
    }

    /// Key in use.
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Give back the store.
    pub fn into_inner(self) -> S {
        self.store
    }

    /// Stored options; `Ok(None)` when the document is absent or empty.
    ///
    /// Fields missing from the document take their defaults.
    pub fn load(&self) -> Result<Option<ConvertOptions>, ConfigError> {
        let Some(bytes) = self.store.read(&self.key)? else {
            return Ok(None);
        };
        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(None);
        }
        serde_json::from_slice(&bytes)
            .map(Some)
            .map_err(|source| ConfigError::Malformed {
                key: self.key.clone(),
                source,
            })
    }

    /// Stored options, or defaults when absent or unreadable.
    pub fn load_or_default(&self) -> ConvertOptions {
        match self.load() {
            Ok(Some(options)) => {
                debug!(key = %self.key, "loaded stored options");
                options
            }
            Ok(None) => ConvertOptions::default(),
            Err(err) => {
                warn!(%err, "ignoring stored options");
                ConvertOptions::default()
            }
        }
    }

    /// Persist `options` as pretty-printed JSON.
    pub fn save(&self, options: &ConvertOptions) -> Result<(), ConfigError> {
        let bytes = serde_json::to_vec_pretty(options).map_err(ConfigError::Encode)?;
        self.store.write(&self.key, &bytes)?;
        debug!(key = %self.key, "saved options");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used)]
    use super::*;
    use crate::options::Validation;
    use std::cell::RefCell;
    use std::collections::HashMap;

    #[derive(Default)]
    struct MemStore {
        blobs: RefCell<HashMap<String, Vec<u8>>>,
    }

    impl MemStore {
        fn with(key: &str, bytes: &[u8]) -> Self {
            let store = Self::default();
            store.write(key, bytes).unwrap();
            store
        }
    }

    impl ConfigStore for MemStore {
        fn read(&self, key: &str) -> Result<Option<Vec<u8>>, ConfigError> {
            Ok(self.blobs.borrow().get(key).cloned())
        }

        fn write(&self, key: &str, bytes: &[u8]) -> Result<(), ConfigError> {
            self.blobs.borrow_mut().insert(key.to_owned(), bytes.to_vec());
            Ok(())
        }
    }

    #[test]
    fn absent_document_is_none() {
        let cfg = OptionsConfig::new(MemStore::default());
        assert!(cfg.load().unwrap().is_none());
        assert_eq!(cfg.load_or_default(), ConvertOptions::default());
    }

    #[test]
    fn saved_options_load_back() {
        let cfg = OptionsConfig::new(MemStore::default());
        let mut opts = ConvertOptions::default();
        opts.tokenizer.delimiter = '\t';
        opts.validation = Validation {
            arity: true,
            numeric: false,
        };
        cfg.save(&opts).unwrap();
        assert_eq!(cfg.load().unwrap(), Some(opts));
    }

    #[test]
    fn blank_document_is_none() {
        let cfg = OptionsConfig::new(MemStore::with(DEFAULT_KEY, b"  \n"));
        assert!(cfg.load().unwrap().is_none());
    }

    #[test]
    fn malformed_document_falls_back_to_defaults() {
        let cfg = OptionsConfig::new(MemStore::with(DEFAULT_KEY, b"{ not json"));
        assert!(matches!(cfg.load(), Err(ConfigError::Malformed { .. })));
        assert_eq!(cfg.load_or_default(), ConvertOptions::default());
    }

    #[test]
    fn keys_are_independent() {
        let store = MemStore::default();
        let tsv = OptionsConfig::with_key(&store, "tsv");
        let mut opts = ConvertOptions::default();
        opts.tokenizer.delimiter = '\t';
        tsv.save(&opts).unwrap();

        assert_eq!(tsv.key(), "tsv");
        assert!(OptionsConfig::new(&store).load().unwrap().is_none());
        assert_eq!(tsv.load().unwrap(), Some(opts));
    }
}
