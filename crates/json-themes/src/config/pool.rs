//! A pool of theme configs for `basedOn` lookups.
//!
//! [`ConfigPool`] collects configs from two kinds of sources:
//!
//! 1. **Inline** values added with [`ConfigPool::add`] or [`ConfigPool::add_str`]
//! 2. **Directories** scanned recursively with [`ConfigPool::add_dir`] for
//!    `.json`, `.yaml` and `.yml` files
//!
//! Configs are keyed by their `name` field, not by file name, because that is
//! what `basedOn` refers to. Inline configs replace earlier entries of the same
//! name; two files declaring the same name are an error, since silently
//! picking one would make inheritance depend on directory order.

use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use serde_json::Value;

use super::format::{parse_config_str, Format};
use crate::error::{PoolError, Result};

#[derive(Debug, Clone)]
struct PoolEntry {
    config: Value,
    origin: Option<PathBuf>,
}

/// A named collection of raw theme configs.
///
/// # Example
///
/// ```rust
/// use json_themes::ConfigPool;
/// use serde_json::json;
///
/// let mut pool = ConfigPool::new();
/// pool.add(json!({
///     "name": "Base",
///     "version": "1",
///     "globals": {},
///     "sets": {},
///     "components": {}
/// }));
///
/// assert!(pool.get("Base").is_some());
/// assert_eq!(pool.configs().len(), 1);
/// ```
#[derive(Debug, Clone, Default)]
pub struct ConfigPool {
    entries: IndexMap<String, PoolEntry>,
}

impl ConfigPool {
    /// Creates an empty pool.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a config value. Configs without a string `name` are ignored.
    pub fn add(&mut self, config: Value) -> &mut Self {
        if let Some(name) = config.get("name").and_then(Value::as_str) {
            let name = name.to_string();
            self.entries.insert(
                name,
                PoolEntry {
                    config,
                    origin: None,
                },
            );
        } else {
            tracing::warn!("ignoring pool config without a name");
        }
        self
    }

    /// Parses and adds a config document.
    pub fn add_str(&mut self, text: &str, format: Format) -> Result<&mut Self> {
        let config = parse_config_str(text, format)?;
        Ok(self.add(config))
    }

    /// Adds every config file found under `dir`, recursively.
    ///
    /// Files with unrecognized extensions are skipped.
    pub fn add_dir<P: AsRef<Path>>(&mut self, dir: P) -> std::result::Result<&mut Self, PoolError> {
        let dir = dir.as_ref();
        if !dir.is_dir() {
            return Err(PoolError::NotADirectory(dir.to_path_buf()));
        }

        let mut files = Vec::new();
        collect_config_files(dir, &mut files)?;
        files.sort();

        for path in files {
            self.add_file(&path)?;
        }
        Ok(self)
    }

    /// Reads and adds a single config file.
    pub fn add_file<P: AsRef<Path>>(
        &mut self,
        path: P,
    ) -> std::result::Result<&mut Self, PoolError> {
        let path = path.as_ref();
        let format = Format::from_path(path).ok_or_else(|| PoolError::Parse {
            path: path.to_path_buf(),
            message: "unrecognized config extension".to_string(),
        })?;
        let text = std::fs::read_to_string(path).map_err(|source| PoolError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = parse_config_str(&text, format).map_err(|e| PoolError::Parse {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

        let name = config
            .get("name")
            .and_then(Value::as_str)
            .ok_or_else(|| PoolError::Parse {
                path: path.to_path_buf(),
                message: "config has no name".to_string(),
            })?
            .to_string();

        if let Some(first) = self.entries.get(&name).and_then(|e| e.origin.clone()) {
            return Err(PoolError::DuplicateName {
                name,
                first,
                second: path.to_path_buf(),
            });
        }

        tracing::debug!(theme = %name, path = %path.display(), "loaded pool config");
        self.entries.insert(
            name,
            PoolEntry {
                config,
                origin: Some(path.to_path_buf()),
            },
        );
        Ok(self)
    }

    /// Returns the config with the given `name`.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.entries.get(name).map(|e| &e.config)
    }

    /// Returns the file a config was loaded from, if any.
    pub fn origin(&self, name: &str) -> Option<&Path> {
        self.entries.get(name).and_then(|e| e.origin.as_deref())
    }

    /// Returns the configs in insertion order, ready to pass to `load`.
    pub fn configs(&self) -> Vec<Value> {
        self.entries.values().map(|e| e.config.clone()).collect()
    }

    /// Returns the config names in insertion order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Returns true if the pool holds no configs.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns the number of configs in the pool.
    pub fn len(&self) -> usize {
        self.entries.len()
    }
}

fn collect_config_files(
    dir: &Path,
    files: &mut Vec<PathBuf>,
) -> std::result::Result<(), PoolError> {
    let entries = std::fs::read_dir(dir).map_err(|source| PoolError::Io {
        path: dir.to_path_buf(),
        source,
    })?;

    for entry in entries {
        let entry = entry.map_err(|source| PoolError::Io {
            path: dir.to_path_buf(),
            source,
        })?;
        let path = entry.path();

        if path.is_dir() {
            collect_config_files(&path, files)?;
        } else if path.is_file() && Format::from_path(&path).is_some() {
            files.push(path);
        }
    }
    Ok(())
}
