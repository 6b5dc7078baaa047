// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! `ConfigStore` over a directory of `<key>.json` files.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use table_atomese::config::{ConfigError, ConfigStore};

/// One JSON file per key under `dir`.
#[derive(Debug, Clone)]
pub struct DirStore {
    dir: PathBuf,
}

impl DirStore {
    /// Store in the platform config directory (e.g. `~/.config/table-atomese`).
    pub fn platform() -> Result<Self, ConfigError> {
        ProjectDirs::from("dev", "flyingrobots", "table-atomese")
            .map(|dirs| Self::at(dirs.config_dir()))
            .ok_or_else(|| ConfigError::Unavailable("no home directory".into()))
    }

    /// Store in `dir`, which is created on first write.
    pub fn at(dir: impl AsRef<Path>) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
        }
    }

    /// File backing `key`.
    pub fn file_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

impl ConfigStore for DirStore {
    fn read(&self, key: &str) -> Result<Option<Vec<u8>>, ConfigError> {
        match fs::read(self.file_for(key)) {
            Ok(bytes) => Ok(Some(bytes)),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
            Err(source) => Err(ConfigError::Io {
                key: key.to_owned(),
                source,
            }),
        }
    }

    fn write(&self, key: &str, bytes: &[u8]) -> Result<(), ConfigError> {
        let io = |source| ConfigError::Io {
            key: key.to_owned(),
            source,
        };
        fs::create_dir_all(&self.dir).map_err(io)?;
        fs::write(self.file_for(key), bytes).map_err(io)
    }
}
