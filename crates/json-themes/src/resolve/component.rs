//! Component assembly: variants, parts, default props and class names.

use indexmap::IndexMap;
use serde::Serialize;
use serde_json::{Map, Value};

use super::boxes::BoxContext;
use super::Resolver;
use crate::config::{deep_merge, reference_name, BoxSource, Part, Variant};
use crate::css::CssMap;
use crate::engine::StyleEngine;
use crate::error::{CycleKind, Result, ThemeError};

/// Name of the variant every component may declare at its top level.
pub const DEFAULT_VARIANT: &str = "default";

/// The compiled form of one variant.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ComponentVariant {
    pub variant: String,
    /// Class of the variant's box, or `""` when it emits no styles.
    pub class_name: String,
    /// Class of each part, by part name.
    pub parts: IndexMap<String, String>,
    /// `defaultProps` with variables resolved; `{}` when none are declared.
    pub default_props: Value,
}

/// The compiled form of one component.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComponentsConfig {
    pub component: String,
    pub variants: Vec<ComponentVariant>,
}

impl ComponentsConfig {
    /// Returns the variant with the given name.
    pub fn variant(&self, name: &str) -> Option<&ComponentVariant> {
        self.variants.iter().find(|v| v.variant == name)
    }
}

impl Resolver<'_> {
    /// Compiles one component, requesting class names from `engine`.
    ///
    /// An unknown component compiles to an empty variant list.
    pub fn resolve_component<E>(&self, name: &str, engine: &mut E) -> Result<ComponentsConfig>
    where
        E: StyleEngine + ?Sized,
    {
        self.component_with_trail(name, engine, &mut Vec::new())
    }

    fn component_with_trail<E>(
        &self,
        name: &str,
        engine: &mut E,
        trail: &mut Vec<String>,
    ) -> Result<ComponentsConfig>
    where
        E: StyleEngine + ?Sized,
    {
        let Some(component) = self.config.components.get(name) else {
            tracing::warn!(component = %name, "unknown component");
            return Ok(ComponentsConfig {
                component: name.to_string(),
                variants: Vec::new(),
            });
        };

        if trail.iter().any(|seen| seen == name) {
            let mut path = std::mem::take(trail);
            path.push(name.to_string());
            return Err(ThemeError::CycleDetected {
                kind: CycleKind::Component,
                path,
            });
        }

        let inherited = match &component.extends {
            Some(parent) => {
                trail.push(name.to_string());
                let parent = self.component_with_trail(reference_name(parent), engine, trail);
                trail.pop();
                Some(parent?)
            }
            None => None,
        };

        let no_parts = IndexMap::new();
        let default_parts = component.default.as_ref().map_or(&no_parts, |d| &d.parts);

        let mut variants = Vec::new();
        if let Some(default) = &component.default {
            let parts = self.merge_parts(default_parts, &no_parts)?;
            let compiled = self.compile_variant(
                engine,
                DEFAULT_VARIANT,
                default,
                &parts,
                BoxContext::Global,
            )?;
            variants.extend(compiled);
        }

        for (variant_name, variant) in &component.variants {
            if variant_name == DEFAULT_VARIANT {
                continue;
            }
            let parts = self.merge_parts(default_parts, &variant.parts)?;

            let compiled = self.compile_variant(
                engine,
                variant_name,
                variant,
                &parts,
                BoxContext::Component(name),
            )?;
            variants.extend(compiled);
        }

        let variants = match inherited {
            Some(parent) => layer_variants(parent.variants, variants),
            None => variants,
        };

        tracing::debug!(component = %name, variants = variants.len(), "compiled component");
        Ok(ComponentsConfig {
            component: name.to_string(),
            variants,
        })
    }

    /// Deep-merges a variant's parts over the default variant's.
    fn merge_parts(
        &self,
        defaults: &IndexMap<String, Part>,
        overrides: &IndexMap<String, Part>,
    ) -> Result<IndexMap<String, BoxSource>> {
        let mut merged = defaults.clone();
        for (name, part) in overrides {
            let part = match merged.get(name) {
                Some(existing) => {
                    existing
                        .merged_with(part)
                        .map_err(|e| ThemeError::Deserialize {
                            name: self.config.name.clone(),
                            message: format!("part {}: {}", name, e),
                        })?
                }
                None => part.clone(),
            };
            merged.insert(name.clone(), part);
        }
        Ok(merged
            .into_iter()
            .map(|(name, part)| (name, part.source))
            .collect())
    }

    fn compile_variant<E>(
        &self,
        engine: &mut E,
        name: &str,
        variant: &Variant,
        parts: &IndexMap<String, BoxSource>,
        context: BoxContext<'_>,
    ) -> Result<Option<ComponentVariant>>
    where
        E: StyleEngine + ?Sized,
    {
        let Some(theming) = &variant.theming else {
            tracing::debug!(variant = %name, "variant has no theming, dropped");
            return Ok(None);
        };
        let Some(css) = self.box_css(theming, context)? else {
            tracing::debug!(variant = %name, "variant box did not resolve, dropped");
            return Ok(None);
        };
        let class_name = emit(engine, css);

        let mut part_classes = IndexMap::with_capacity(parts.len());
        for (part, slot) in parts {
            let css = self
                .box_css(slot, BoxContext::Parts(parts))?
                .unwrap_or_default();
            part_classes.insert(part.clone(), emit(engine, css));
        }

        let default_props = match &variant.default_props {
            Some(props) => self.vars.resolve_props(props)?,
            None => Value::Object(Map::new()),
        };

        Ok(Some(ComponentVariant {
            variant: name.to_string(),
            class_name,
            parts: part_classes,
            default_props,
        }))
    }
}

fn emit<E: StyleEngine + ?Sized>(engine: &mut E, css: CssMap) -> String {
    if css.is_empty() {
        return String::new();
    }
    engine.emit_class(std::slice::from_ref(&css))
}

/// Layers a component's variants over those of the component it extends.
///
/// Same-named variants take the child's class, and its parts and default
/// props are merged over the parent's. New variants are appended.
fn layer_variants(
    mut base: Vec<ComponentVariant>,
    overlay: Vec<ComponentVariant>,
) -> Vec<ComponentVariant> {
    for variant in overlay {
        match base.iter_mut().find(|b| b.variant == variant.variant) {
            Some(existing) => {
                existing.class_name = variant.class_name;
                existing.parts.extend(variant.parts);
                let props = std::mem::take(&mut existing.default_props);
                existing.default_props = deep_merge(props, variant.default_props);
            }
            None => base.push(variant),
        }
    }
    base
}
