//! Text formats a theming config can be written in.

use std::path::Path;

use serde_json::Value;

use crate::error::Result;

/// Recognized config file extensions, in priority order.
pub const CONFIG_EXTENSIONS: &[&str] = &[".json", ".yaml", ".yml"];

/// Source format of a config document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Json,
    Yaml,
}

impl Format {
    /// Picks the format from a file extension, if it is a recognized one.
    pub fn from_path(path: &Path) -> Option<Self> {
        let name = path.file_name()?.to_str()?;
        match CONFIG_EXTENSIONS.iter().position(|ext| name.ends_with(ext))? {
            0 => Some(Format::Json),
            _ => Some(Format::Yaml),
        }
    }
}

/// Parses a config document into an untyped value.
///
/// YAML documents go through `serde_yaml` and come out as the same JSON value
/// tree, so both formats share every later stage.
pub fn parse_config_str(text: &str, format: Format) -> Result<Value> {
    let value = match format {
        Format::Json => serde_json::from_str(text)?,
        Format::Yaml => serde_yaml::from_str(text)?,
    };
    Ok(value)
}
