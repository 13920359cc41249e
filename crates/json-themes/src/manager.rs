//! Loading themes and holding the active one.
//!
//! [`ThemeManager`] owns a style engine and the last theme it loaded. Each
//! [`load`](ThemeManager::load) validates the config, merges its `basedOn`
//! chain, compiles every declared component and replaces the active theme
//! as a whole. A failed load leaves the previous theme in place.

use serde::Serialize;
use serde_json::Value;

use crate::config::{resolve_inheritance, ConfigPool, ThemingConfig};
use crate::engine::{StyleEngine, Stylesheet, DEFAULT_CLASS_PREFIX};
use crate::error::{Result, ThemeError};
use crate::resolve::{ComponentVariant, ComponentsConfig, Resolver};

/// Settings for compiling themes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompileOptions {
    /// Prefix of generated class names.
    pub class_prefix: String,
}

impl Default for CompileOptions {
    fn default() -> Self {
        Self {
            class_prefix: DEFAULT_CLASS_PREFIX.to_string(),
        }
    }
}

/// A compiled theme.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LoadedTheme {
    pub name: String,
    pub components: Vec<ComponentsConfig>,
    /// The merged config the components were compiled from.
    #[serde(skip)]
    pub config: ThemingConfig,
}

impl LoadedTheme {
    /// Returns the compiled component with the given name.
    pub fn component(&self, name: &str) -> Option<&ComponentsConfig> {
        self.components.iter().find(|c| c.component == name)
    }

    /// Returns the variants of a component, or nothing if it is unknown.
    pub fn variants(&self, component: &str) -> &[ComponentVariant] {
        self.component(component)
            .map(|c| c.variants.as_slice())
            .unwrap_or_default()
    }

    /// Returns one variant of a component.
    pub fn variant(&self, component: &str, name: &str) -> Option<&ComponentVariant> {
        let found = self.variants(component).iter().find(|v| v.variant == name);
        if found.is_none() {
            tracing::warn!(
                theme = %self.name,
                component = %component,
                variant = %name,
                "variant not found"
            );
        }
        found
    }
}

/// Compiles themes and keeps the most recent one.
///
/// # Example
///
/// ```rust
/// use json_themes::ThemeManager;
/// use serde_json::json;
///
/// let mut manager = ThemeManager::new();
/// let theme = manager.load(json!({
///     "name": "Plain",
///     "version": "1.0.0",
///     "globals": {},
///     "sets": { "boxSets": { "card": { "padding": "1rem" } } },
///     "components": { "Card": { "default": { "theming": "$$card" } } }
/// }), &[])?;
///
/// assert_eq!(theme.name, "Plain");
/// assert!(theme.variant("Card", "default").is_some());
/// assert!(manager.engine().css().contains("padding:1rem;"));
/// # Ok::<(), json_themes::ThemeError>(())
/// ```
#[derive(Debug)]
pub struct ThemeManager<E: StyleEngine = Stylesheet> {
    engine: E,
    last_active: Option<LoadedTheme>,
}

impl ThemeManager<Stylesheet> {
    /// Creates a manager with the bundled [`Stylesheet`] engine.
    pub fn new() -> Self {
        Self::with_options(CompileOptions::default())
    }

    /// Creates a manager with a [`Stylesheet`] configured by `options`.
    pub fn with_options(options: CompileOptions) -> Self {
        Self::with_engine(Stylesheet::with_prefix(options.class_prefix))
    }
}

impl Default for ThemeManager<Stylesheet> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: StyleEngine> ThemeManager<E> {
    /// Creates a manager around a custom style engine.
    pub fn with_engine(engine: E) -> Self {
        Self {
            engine,
            last_active: None,
        }
    }

    /// Compiles `config` and makes it the active theme.
    ///
    /// `pool` holds the configs `basedOn` names are looked up in. A `null`
    /// config is rejected with [`ThemeError::NoConfig`].
    pub fn load(&mut self, config: Value, pool: &[Value]) -> Result<&LoadedTheme> {
        if config.is_null() {
            return Err(ThemeError::NoConfig);
        }

        let merged = resolve_inheritance(&config, pool)?;
        tracing::debug!(config = %merged, "Theming configuration");
        let config = ThemingConfig::from_value(merged)?;

        let components = {
            let resolver = Resolver::new(&config);
            config
                .components
                .keys()
                .map(|name| resolver.resolve_component(name, &mut self.engine))
                .collect::<Result<Vec<_>>>()?
        };

        tracing::debug!(
            theme = %config.name,
            components = components.len(),
            "loaded theme"
        );
        Ok(self.last_active.insert(LoadedTheme {
            name: config.name.clone(),
            components,
            config,
        }))
    }

    /// Like [`load`](Self::load), taking the base configs from a [`ConfigPool`].
    pub fn load_with_pool(&mut self, config: Value, pool: &ConfigPool) -> Result<&LoadedTheme> {
        self.load(config, &pool.configs())
    }

    /// Compiles a single component of an already merged config.
    pub fn resolve_component(
        &mut self,
        name: &str,
        config: &ThemingConfig,
    ) -> Result<ComponentsConfig> {
        Resolver::new(config).resolve_component(name, &mut self.engine)
    }

    /// The most recently loaded theme.
    pub fn last_active(&self) -> Option<&LoadedTheme> {
        self.last_active.as_ref()
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }

    pub fn engine_mut(&mut self) -> &mut E {
        &mut self.engine
    }

    pub fn into_engine(self) -> E {
        self.engine
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn theme(name: &str) -> Value {
        json!({
            "name": name,
            "version": "1.0.0",
            "globals": { "space": "1rem" },
            "sets": { "boxSets": { "card": { "padding": "$$space" } } },
            "components": {
                "Card": {
                    "default": { "theming": "$$card", "defaultProps": { "gap": "$$space" } },
                    "variants": { "flat": { "theming": { "padding": "0" } } }
                },
                "Badge": { "default": { "theming": { "width": "1rem" } } }
            }
        })
    }

    #[test]
    fn test_load_rejects_null() {
        let mut manager = ThemeManager::new();
        assert_eq!(manager.load(Value::Null, &[]).unwrap_err(), ThemeError::NoConfig);
        assert!(manager.last_active().is_none());
    }

    #[test]
    fn test_load_compiles_components_in_order() {
        let mut manager = ThemeManager::new();
        let loaded = manager.load(theme("One"), &[]).unwrap();

        let names: Vec<_> = loaded.components.iter().map(|c| c.component.as_str()).collect();
        assert_eq!(names, vec!["Card", "Badge"]);
        assert_eq!(loaded.variants("Card").len(), 2);
        assert_eq!(
            loaded.variant("Card", "default").unwrap().default_props,
            json!({ "gap": "1rem" })
        );
    }

    #[test]
    fn test_unknown_lookups() {
        let mut manager = ThemeManager::new();
        let loaded = manager.load(theme("One"), &[]).unwrap();
        assert!(loaded.variants("Nope").is_empty());
        assert!(loaded.variant("Card", "nope").is_none());
        assert!(loaded.component("Nope").is_none());
    }

    #[test]
    fn test_load_replaces_last_active() {
        let mut manager = ThemeManager::new();
        manager.load(theme("One"), &[]).unwrap();
        manager.load(theme("Two"), &[]).unwrap();
        assert_eq!(manager.last_active().unwrap().name, "Two");
    }

    #[test]
    fn test_failed_load_keeps_previous() {
        let mut manager = ThemeManager::new();
        manager.load(theme("One"), &[]).unwrap();
        let err = manager.load(json!({ "name": "Broken" }), &[]).unwrap_err();
        assert!(matches!(err, ThemeError::InvalidConfig { .. }));
        assert_eq!(manager.last_active().unwrap().name, "One");
    }

    #[test]
    fn test_load_uses_pool() {
        let mut base = theme("Base");
        base["globals"] = json!({ "space": "3rem" });
        let mut child = theme("Child");
        child["basedOn"] = json!("Base");
        child["globals"] = json!({});

        let mut manager = ThemeManager::new();
        manager.load(child, &[base]).unwrap();
        assert!(manager.engine().css().contains("padding:3rem;"));
    }

    #[test]
    fn test_class_prefix_option() {
        let mut manager = ThemeManager::with_options(CompileOptions {
            class_prefix: "th".to_string(),
        });
        let loaded = manager.load(theme("One"), &[]).unwrap();
        let class = &loaded.variant("Badge", "default").unwrap().class_name;
        assert!(class.starts_with("th"));
    }

    #[test]
    fn test_serializes_camel_case() {
        let mut manager = ThemeManager::new();
        let loaded = manager.load(theme("One"), &[]).unwrap();
        let value = serde_json::to_value(loaded).unwrap();
        let variant = &value["components"][0]["variants"][0];
        assert!(variant.get("className").is_some());
        assert!(variant.get("defaultProps").is_some());
        assert!(value.get("config").is_none());
    }
}
