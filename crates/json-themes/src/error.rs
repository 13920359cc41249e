//! Error types for theme loading and compilation.
//!
//! [`ThemeError`] covers every fatal condition of a load: a missing or
//! malformed configuration, text that fails to parse, and reference cycles.
//! Non-fatal conditions (unknown variables, unknown sets, unknown components)
//! are logged through `tracing` and degrade to empty output instead.

use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

/// The kind of reference chain in which a cycle was found.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CycleKind {
    /// `$$` variables whose values reference each other.
    Variable,
    /// `__extends` on a color, border or font set.
    StyleSet,
    /// `__extends` on a box, or a variant aliasing another variant.
    Box,
    /// `__extends` between components.
    Component,
    /// `basedOn` between theme configurations.
    BasedOn,
}

impl fmt::Display for CycleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            CycleKind::Variable => "variable",
            CycleKind::StyleSet => "style set",
            CycleKind::Box => "box",
            CycleKind::Component => "component",
            CycleKind::BasedOn => "basedOn",
        };
        f.write_str(label)
    }
}

/// Error type for loading and compiling a theme configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ThemeError {
    /// `load` was called without a configuration.
    #[error("No Theming Config found!")]
    NoConfig,

    /// One or more required top-level keys are absent.
    #[error(
        "Falsy Theming Configuration: Please check your Config schema for {name} (missing: {})",
        .missing.join(", ")
    )]
    InvalidConfig {
        /// Config name, or `"config"` when the name itself is missing.
        name: String,
        /// Required keys that were not found.
        missing: Vec<String>,
    },

    /// The merged configuration does not fit the theming schema.
    #[error("invalid theming configuration {name}: {message}")]
    Deserialize { name: String, message: String },

    /// JSON or YAML text could not be parsed.
    #[error("failed to parse theming configuration: {message}")]
    Parse { message: String },

    /// A reference chain loops back onto itself.
    #[error("cycle detected in {kind} references: {}", .path.join(" -> "))]
    CycleDetected { kind: CycleKind, path: Vec<String> },
}

impl From<serde_json::Error> for ThemeError {
    fn from(err: serde_json::Error) -> Self {
        ThemeError::Parse {
            message: err.to_string(),
        }
    }
}

impl From<serde_yaml::Error> for ThemeError {
    fn from(err: serde_yaml::Error) -> Self {
        ThemeError::Parse {
            message: err.to_string(),
        }
    }
}

/// Error type for building a [`ConfigPool`](crate::ConfigPool).
#[derive(Debug, Error)]
pub enum PoolError {
    /// Reading a directory or file failed.
    #[error("failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A config file could not be parsed or has no usable `name`.
    #[error("failed to load theme config {}: {message}", .path.display())]
    Parse { path: PathBuf, message: String },

    /// The given path is not a directory.
    #[error("not a directory: {}", .0.display())]
    NotADirectory(PathBuf),

    /// Two files declare the same theme name.
    #[error(
        "theme '{name}' is declared twice: {} and {}",
        .first.display(),
        .second.display()
    )]
    DuplicateName {
        name: String,
        first: PathBuf,
        second: PathBuf,
    },
}

/// Result type for theme operations.
pub type Result<T> = std::result::Result<T, ThemeError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_config_names_the_config() {
        let err = ThemeError::InvalidConfig {
            name: "Dark".to_string(),
            missing: vec!["globals".to_string(), "sets".to_string()],
        };
        let msg = err.to_string();
        assert!(msg.contains("Dark"));
        assert!(msg.contains("globals, sets"));
    }

    #[test]
    fn test_cycle_display_joins_path() {
        let err = ThemeError::CycleDetected {
            kind: CycleKind::Box,
            path: vec!["a".into(), "b".into(), "a".into()],
        };
        assert_eq!(
            err.to_string(),
            "cycle detected in box references: a -> b -> a"
        );
    }

    #[test]
    fn test_from_json_error() {
        let json_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err: ThemeError = json_err.into();
        assert!(matches!(err, ThemeError::Parse { .. }));
    }
}
