//! Box resolution and composition to CSS.
//!
//! A box slot is a reference, an inline [`BoxDefinition`], or a list of
//! either. References are looked up in `sets.boxSets` first; when that fails
//! the [`BoxContext`] decides where else to look:
//!
//! - [`BoxContext::Component`]: another variant of the same component, so one
//!   variant can alias another (`"theming": "$$primary"`)
//! - [`BoxContext::Parts`]: a sibling part of the same parts map
//!
//! Composition follows a fixed order: `__extends`, `transform`, border set,
//! color set, `padding`, font set, `height`, `width`, `before`, `after`. State
//! boxes are composed recursively and pushed to the front of the rule list,
//! then the rules are deep-merged and sorted by selector specificity.

use indexmap::IndexMap;

use super::Resolver;
use crate::config::{reference_name, set_value, BoxDefinition, BoxSource, PseudoElement, Source};
use crate::css::{self, sort_by_specificity, CssMap, CssValue, State};
use crate::error::{CycleKind, Result, ThemeError};

/// Where a box reference may be looked up besides the global box sets.
#[derive(Debug, Clone, Copy, Default)]
pub enum BoxContext<'c> {
    /// Global box sets only.
    #[default]
    Global,
    /// Variants of the named component.
    Component(&'c str),
    /// Parts of one variant, already merged with the default variant's parts.
    Parts(&'c IndexMap<String, BoxSource>),
}

enum Target<'t> {
    Definition(&'t BoxDefinition),
    Slot(&'t BoxSource),
}

impl Resolver<'_> {
    /// Composes a box slot to a single CSS map.
    ///
    /// Returns `Ok(None)` when a reference cannot be resolved, so callers can
    /// drop the owning variant. A resolved box that emits nothing yields an
    /// empty map.
    pub fn box_css(&self, source: &BoxSource, context: BoxContext<'_>) -> Result<Option<CssMap>> {
        self.source_css(source, context, &mut Vec::new())
    }

    fn source_css(
        &self,
        source: &BoxSource,
        context: BoxContext<'_>,
        trail: &mut Vec<String>,
    ) -> Result<Option<CssMap>> {
        match source {
            Source::Inline(definition) => self.compose(definition, context, trail).map(Some),
            Source::Reference(reference) => self.reference_css(reference, context, trail),
            Source::List(items) => {
                let mut merged = CssMap::new();
                for item in items {
                    if let Some(css) = self.source_css(item, context, trail)? {
                        css::merge_into(&mut merged, css);
                    }
                }
                sort_by_specificity(&mut merged);
                Ok(Some(merged))
            }
        }
    }

    fn lookup<'t>(&'t self, name: &str, context: BoxContext<'t>) -> Option<(String, Target<'t>)> {
        if let Some(definition) = self.config.sets.box_sets.get(name) {
            return Some((format!("boxSets.{}", name), Target::Definition(definition)));
        }

        match context {
            BoxContext::Global => None,
            BoxContext::Parts(parts) => parts
                .get(name)
                .map(|slot| (format!("parts.{}", name), Target::Slot(slot))),
            BoxContext::Component(component) => self
                .config
                .components
                .get(component)
                .and_then(|c| c.variants.get(name))
                .and_then(|variant| variant.theming.as_ref())
                .map(|slot| {
                    (
                        format!("{}.variants.{}", component, name),
                        Target::Slot(slot),
                    )
                }),
        }
    }

    fn reference_css(
        &self,
        reference: &str,
        context: BoxContext<'_>,
        trail: &mut Vec<String>,
    ) -> Result<Option<CssMap>> {
        let name = reference_name(reference);
        let Some((label, target)) = self.lookup(name, context) else {
            tracing::warn!(reference = %reference, "unknown box reference");
            return Ok(None);
        };

        if trail.contains(&label) {
            let mut path = std::mem::take(trail);
            path.push(label);
            return Err(ThemeError::CycleDetected {
                kind: CycleKind::Box,
                path,
            });
        }

        tracing::trace!(box_ref = %label, "resolving box reference");
        trail.push(label);
        let css = match target {
            Target::Definition(definition) => self.compose(definition, context, trail).map(Some),
            Target::Slot(slot) => self.source_css(slot, context, trail),
        };
        trail.pop();
        css
    }

    fn compose(
        &self,
        definition: &BoxDefinition,
        context: BoxContext<'_>,
        trail: &mut Vec<String>,
    ) -> Result<CssMap> {
        let vars = &self.vars;
        let mut rules: Vec<CssMap> = Vec::new();

        if let Some(parent) = &definition.extends {
            if let Some(css) = self.reference_css(parent, context, trail)? {
                if !css.is_empty() {
                    rules.push(css);
                }
            }
        }

        if let Some(transform) = set_value(&definition.transform) {
            let mut css = css::declaration("transform", vars.resolve_value(transform)?);
            css.insert("will-change".into(), "transform".into());
            rules.push(css);
        }
        if let Some(border_set) = &definition.border_set {
            rules.push(self.set_css(border_set)?);
        }
        if let Some(color_set) = &definition.color_set {
            rules.push(self.set_css(color_set)?);
        }
        if let Some(padding) = set_value(&definition.padding) {
            rules.push(css::declaration("padding", vars.resolve_value(padding)?));
        }
        if let Some(font_set) = &definition.font_set {
            rules.push(self.set_css(font_set)?);
        }
        if let Some(height) = set_value(&definition.height) {
            rules.push(css::declaration("height", vars.resolve_value(height)?));
        }
        if let Some(width) = set_value(&definition.width) {
            rules.push(css::declaration("width", vars.resolve_value(width)?));
        }
        if let Some(before) = &definition.before {
            rules.push(css::block("&::before", self.pseudo_css(before)?));
        }
        if let Some(after) = &definition.after {
            rules.push(css::block("&::after", self.pseudo_css(after)?));
        }

        for state in State::BOX_ORDER {
            if let Some(slot) = definition.states.get(state) {
                let inner = self.source_css(slot, context, trail)?.unwrap_or_default();
                rules.insert(0, css::block(state.selector(), inner));
            }
        }

        if rules.is_empty() {
            return Ok(CssMap::new());
        }

        let mut merged = css::merge(rules);
        sort_by_specificity(&mut merged);
        Ok(merged)
    }

    /// `before`/`after` declarations.
    ///
    /// `content` is quoted verbatim; everything else is variable-resolved.
    fn pseudo_css(&self, pseudo: &PseudoElement) -> Result<CssMap> {
        let mut css = CssMap::new();
        for (key, value) in pseudo {
            let Some(value) = value else { continue };
            let (key, text) = match key.as_str() {
                "content" => (key.as_str(), format!("\"{}\"", value.to_text())),
                "transitionSpeed" => ("transitionDuration", self.vars.resolve_value(value)?),
                _ => (key.as_str(), self.vars.resolve_value(value)?),
            };
            css.insert(key.to_string(), CssValue::Declaration(text));
        }
        Ok(css)
    }
}
