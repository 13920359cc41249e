//! Theme configuration: parsing, inheritance and the typed model.
//!
//! A load goes through three stages, each in its own module:
//!
//! - [`format`]: JSON or YAML text into an untyped [`serde_json::Value`]
//! - [`inherit`]: validation and `basedOn` merging on the untyped tree
//! - [`model`]: conversion of the merged tree into [`ThemingConfig`]
//!
//! [`ConfigPool`] gathers the candidate base configs for the second stage.

pub mod format;
pub mod inherit;
pub mod model;
mod pool;

pub use format::{parse_config_str, Format, CONFIG_EXTENSIONS};
pub use inherit::{
    deep_merge, merge_configs, resolve_inheritance, strategy_for, validate, MergeStrategy,
    REPLACED_KEYS, REQUIRED_KEYS,
};
pub use model::{
    reference_name, Assets, BackdropFilter, BackdropFilterDefinition, BorderDefinition,
    BorderMap, BorderSet, BoxDefinition, BoxSource, ColorMap, ColorSet, ColorValue, Component,
    FontMap, FontSet, GradientDefinition, Part, PseudoElement, Selection, Sets, Source, States,
    ThemeValue, ThemingConfig, Variant,
};
pub use pool::ConfigPool;

pub(crate) use model::set_value;
