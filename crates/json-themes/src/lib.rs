//! # JSON Themes - Declarative Theme Compiler
//!
//! `json-themes` compiles a declarative theme configuration (JSON or YAML)
//! into CSS property maps and the class names a style engine assigns to
//! them. A theme names global variables, reusable style sets and the
//! components built from them; compiling it yields, for every component
//! variant, a class name, one class per named part and a set of default
//! props.
//!
//! ## Core Concepts
//!
//! - [`ThemingConfig`]: the typed theme model, built from a merged config value
//! - [`ConfigPool`]: named configs that `basedOn` references resolve against
//! - [`Resolver`]: the resolution pipeline (variables, sets, boxes, components)
//! - [`StyleEngine`]: the seam that turns CSS maps into class names
//! - [`Stylesheet`]: the bundled hashing engine that collects generated CSS
//! - [`ThemeManager`]: loads a theme, compiles every component and keeps it active
//!
//! ## Quick Start
//!
//! ```rust
//! use json_themes::ThemeManager;
//! use serde_json::json;
//!
//! let config = json!({
//!     "name": "Light",
//!     "version": "1.0.0",
//!     "globals": { "colors": { "primary": "#3366ff", "white": "#fff" } },
//!     "sets": {
//!         "colorSets": {
//!             "primary": {
//!                 "background": "$$colors.primary",
//!                 "foreground": "$$colors.white",
//!                 "__hover": { "background": "#2255ee" }
//!             }
//!         }
//!     },
//!     "components": {
//!         "Button": {
//!             "default": { "theming": { "colorSet": "$$primary", "padding": "0.5rem" } }
//!         }
//!     }
//! });
//!
//! let mut manager = ThemeManager::new();
//! let theme = manager.load(config, &[])?;
//! let button = theme.variant("Button", "default").unwrap();
//!
//! assert!(button.class_name.starts_with("go"));
//! let css = manager.engine_mut().extract_css();
//! assert!(css.contains("background:#3366ff;"));
//! assert!(css.contains(":hover{background:#2255ee;}"));
//! # Ok::<(), json_themes::ThemeError>(())
//! ```
//!
//! ## Inheritance
//!
//! A config may name a base config with `basedOn`. The base is looked up in
//! the pool by `name`, merged underneath recursively, and its own `basedOn`
//! is followed in turn. Objects merge key by key and arrays concatenate,
//! except `theming`, `colorSet`, `borderSet` and `fontSet`, which the child
//! replaces whole. A chain that loops back on itself fails with
//! [`ThemeError::CycleDetected`].
//!
//! ```rust
//! use json_themes::{ConfigPool, Format, ThemeManager};
//! use serde_json::json;
//!
//! let mut pool = ConfigPool::new();
//! pool.add_str(
//!     "name: Base\nversion: 1.0.0\nglobals:\n  gap: 2rem\nsets: {}\ncomponents: {}\n",
//!     Format::Yaml,
//! )?;
//!
//! let child = json!({
//!     "name": "Child",
//!     "basedOn": "Base",
//!     "version": "1.0.0",
//!     "globals": {},
//!     "sets": {},
//!     "components": { "Stack": { "default": { "theming": { "padding": "$$gap" } } } }
//! });
//!
//! let mut manager = ThemeManager::new();
//! manager.load_with_pool(child, &pool)?;
//! assert!(manager.engine().css().contains("padding:2rem;"));
//! # Ok::<(), json_themes::ThemeError>(())
//! ```
//!
//! ## Custom Engines
//!
//! Any type implementing [`StyleEngine`] can stand in for [`Stylesheet`],
//! for example to forward the maps to another styling runtime:
//!
//! ```rust
//! use json_themes::css::CssMap;
//! use json_themes::{StyleEngine, ThemeManager};
//!
//! #[derive(Default)]
//! struct Counter(Vec<CssMap>);
//!
//! impl StyleEngine for Counter {
//!     fn emit_class(&mut self, maps: &[CssMap]) -> String {
//!         self.0.extend(maps.iter().cloned());
//!         format!("c{}", self.0.len())
//!     }
//! }
//!
//! let manager = ThemeManager::with_engine(Counter::default());
//! assert!(manager.last_active().is_none());
//! ```

pub mod config;
pub mod css;
pub mod engine;
mod error;
mod manager;
pub mod resolve;

// Error types
pub use error::{CycleKind, PoolError, Result, ThemeError};

// Config loading and the typed model
pub use config::{
    deep_merge, merge_configs, parse_config_str, resolve_inheritance, validate, ConfigPool,
    Format, ThemingConfig, CONFIG_EXTENSIONS,
};

// Engines
pub use engine::{StyleEngine, Stylesheet, DEFAULT_CLASS_PREFIX};

// Resolution
pub use resolve::{
    resolve_component, BoxContext, ComponentVariant, ComponentsConfig, Resolver, Variables,
    DEFAULT_VARIANT,
};

// Theme management
pub use manager::{CompileOptions, LoadedTheme, ThemeManager};
