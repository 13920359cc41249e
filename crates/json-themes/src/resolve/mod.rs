//! Resolution of a merged config into CSS maps and class names.
//!
//! [`Resolver`] borrows one [`ThemingConfig`] and exposes the pipeline in
//! layers, each usable on its own:
//!
//! - [`Variables`]: `$$` references against `globals`
//! - [`Resolver::set_css`]: color, border and font sets
//! - [`Resolver::box_css`]: boxes, with their sets, states and pseudo-elements
//! - [`Resolver::resolve_component`]: variants, parts and default props
//!
//! Every step is a pure function of the config. Reference chains
//! (`__extends`, variant aliases, variables) are tracked while they are
//! followed and a loop fails with [`ThemeError::CycleDetected`].
//!
//! [`ThemeError::CycleDetected`]: crate::ThemeError::CycleDetected

mod boxes;
mod component;
mod sets;
mod variables;

pub use boxes::BoxContext;
pub use component::{ComponentVariant, ComponentsConfig, DEFAULT_VARIANT};
pub use sets::StyleSet;
pub use variables::{deep_attribute, has_reference, Variables};

use crate::config::ThemingConfig;
use crate::engine::StyleEngine;
use crate::error::Result;

/// Resolves styles against one merged config.
#[derive(Debug, Clone, Copy)]
pub struct Resolver<'a> {
    config: &'a ThemingConfig,
    vars: Variables<'a>,
}

impl<'a> Resolver<'a> {
    pub fn new(config: &'a ThemingConfig) -> Self {
        Self {
            config,
            vars: Variables::new(&config.globals).named(&config.name),
        }
    }

    pub fn config(&self) -> &'a ThemingConfig {
        self.config
    }

    /// The variable resolver over this config's globals.
    pub fn variables(&self) -> &Variables<'a> {
        &self.vars
    }
}

/// Compiles one component of `config`, requesting class names from `engine`.
///
/// # Example
///
/// ```rust
/// use json_themes::{resolve_component, Stylesheet, ThemingConfig};
/// use serde_json::json;
///
/// let config = ThemingConfig::from_value(json!({
///     "name": "Example",
///     "version": "1.0.0",
///     "globals": { "colors": { "fg": "white" } },
///     "sets": {},
///     "components": {
///         "Label": { "default": { "theming": { "colorSet": { "foreground": "$$colors.fg" } } } }
///     }
/// }))?;
///
/// let mut sheet = Stylesheet::new();
/// let label = resolve_component("Label", &config, &mut sheet)?;
///
/// let class = &label.variants[0].class_name;
/// assert_eq!(sheet.extract_css(), format!(".{}{{color:white;}}", class));
/// # Ok::<(), json_themes::ThemeError>(())
/// ```
pub fn resolve_component<E>(
    name: &str,
    config: &ThemingConfig,
    engine: &mut E,
) -> Result<ComponentsConfig>
where
    E: StyleEngine + ?Sized,
{
    Resolver::new(config).resolve_component(name, engine)
}
