//! Color, border and font sets to CSS.
//!
//! All three kinds share one shape: a base property map, nine optional state
//! maps of the same type, and an optional `__extends` naming a parent set of
//! the same kind. [`StyleSet`] captures that shape so the extends and state
//! handling is written once; each kind only supplies its property mapping.

use indexmap::IndexMap;
use serde_json::Value;

use super::variables::Variables;
use super::Resolver;
use crate::config::{
    reference_name, set_value, BackdropFilter, BackdropFilterDefinition, BorderDefinition,
    BorderMap, BorderSet, ColorMap, ColorSet, FontMap, FontSet, Sets, Source, States, ThemeValue,
};
use crate::css::{self, sort_by_specificity, CssMap, CssValue, State, SELECTION_SELECTOR};
use crate::error::{CycleKind, Result, ThemeError};

const BACKDROP_FALLBACK: &str = "@supports not (backdrop-filter: blur(1px))";

/// A reusable style set kind.
pub trait StyleSet: Sized {
    /// Property map type of one level (base or state).
    type Map;

    /// Name of the `sets` table, used in logs and cycle paths.
    const TABLE: &'static str;

    fn table(sets: &Sets) -> &IndexMap<String, Self>;
    fn extends(&self) -> Option<&str>;
    fn base(&self) -> &Self::Map;
    fn states(&self) -> &States<Self::Map>;

    /// Maps one level's properties to CSS declarations, in emission order.
    fn map_css(vars: &Variables<'_>, map: &Self::Map) -> Result<CssMap>;

    /// Entries emitted after the state blocks.
    fn trailing_css(&self, _vars: &Variables<'_>) -> Result<CssMap> {
        Ok(CssMap::new())
    }
}

impl Resolver<'_> {
    /// Resolves a set slot (reference, inline set or list) to CSS.
    ///
    /// Unknown references resolve to an empty map.
    pub fn set_css<S: StyleSet>(&self, source: &Source<S>) -> Result<CssMap> {
        self.set_source_css(source, &mut Vec::new())
    }

    fn set_source_css<S: StyleSet>(
        &self,
        source: &Source<S>,
        trail: &mut Vec<String>,
    ) -> Result<CssMap> {
        match source {
            Source::Reference(reference) => self.named_set_css::<S>(reference, trail),
            Source::Inline(set) => self.inline_set_css::<S>(set, trail),
            Source::List(items) => {
                let mut merged = CssMap::new();
                for item in items {
                    css::merge_into(&mut merged, self.set_source_css(item, trail)?);
                }
                Ok(merged)
            }
        }
    }

    fn named_set_css<S: StyleSet>(
        &self,
        reference: &str,
        trail: &mut Vec<String>,
    ) -> Result<CssMap> {
        let name = reference_name(reference);
        let label = format!("{}.{}", S::TABLE, name);

        if trail.contains(&label) {
            let mut path = std::mem::take(trail);
            path.push(label);
            return Err(ThemeError::CycleDetected {
                kind: CycleKind::StyleSet,
                path,
            });
        }

        let Some(set) = S::table(&self.config.sets).get(name) else {
            tracing::warn!(set = %label, "unknown style set, skipped");
            return Ok(CssMap::new());
        };

        trail.push(label);
        let css = self.inline_set_css(set, trail)?;
        trail.pop();
        Ok(css)
    }

    fn inline_set_css<S: StyleSet>(&self, set: &S, trail: &mut Vec<String>) -> Result<CssMap> {
        let vars = &self.vars;
        let mut own = S::map_css(vars, set.base())?;

        for state in State::SET_ORDER {
            if let Some(map) = set.states().get(state) {
                let mut block = S::map_css(vars, map)?;
                if state == State::Disabled {
                    block.insert("pointer-events".into(), "none".into());
                }
                own.insert(state.selector().to_string(), CssValue::Block(block));
            }
        }
        own.extend(set.trailing_css(vars)?);

        let mut merged = match set.extends() {
            Some(parent) => self.named_set_css::<S>(parent, trail)?,
            None => CssMap::new(),
        };
        css::merge_into(&mut merged, own);
        sort_by_specificity(&mut merged);
        Ok(merged)
    }
}

fn put(css: &mut CssMap, key: &str, value: String) {
    css.insert(key.to_string(), CssValue::Declaration(value));
}

fn put_value(
    css: &mut CssMap,
    vars: &Variables<'_>,
    key: &str,
    value: &Option<ThemeValue>,
) -> Result<()> {
    if let Some(value) = set_value(value) {
        put(css, key, vars.resolve_value(value)?);
    }
    Ok(())
}

// =============================================================================
// Color sets
// =============================================================================

impl StyleSet for ColorSet {
    type Map = ColorMap;
    const TABLE: &'static str = "colorSets";

    fn table(sets: &Sets) -> &IndexMap<String, Self> {
        &sets.color_sets
    }

    fn extends(&self) -> Option<&str> {
        self.extends.as_deref()
    }

    fn base(&self) -> &ColorMap {
        &self.map
    }

    fn states(&self) -> &States<ColorMap> {
        &self.states
    }

    fn map_css(vars: &Variables<'_>, map: &ColorMap) -> Result<CssMap> {
        let mut css = CssMap::new();
        put_value(&mut css, vars, "transitionDuration", &map.transition_speed)?;
        if let Some(background) = map.background.as_ref().filter(|c| c.is_set()) {
            put(&mut css, "background", vars.resolve_color(background, true)?);
        }
        if let Some(border) = map.border.as_ref().filter(|c| c.is_set()) {
            put(&mut css, "borderColor", vars.resolve_color(border, false)?);
        }
        put_value(&mut css, vars, "filter", &map.filter)?;
        if let Some(filter) = &map.backdrop_filter {
            css.extend(backdrop_css(vars, filter)?);
        }
        if let Some(foreground) = map.foreground.as_ref().filter(|c| c.is_set()) {
            put(&mut css, "color", vars.resolve_color(foreground, false)?);
        }
        if let Some(icon) = set_value(&map.icon) {
            let icon = css::declaration("color", vars.resolve_value(icon)?);
            css.insert("& svg".into(), CssValue::Block(icon));
        }
        put_value(&mut css, vars, "boxShadow", &map.shadow)?;
        Ok(css)
    }

    fn trailing_css(&self, vars: &Variables<'_>) -> Result<CssMap> {
        let Some(selection) = &self.selection else {
            return Ok(CssMap::new());
        };
        let mut block = CssMap::new();
        if let Some(foreground) = selection.foreground.as_ref().filter(|c| c.is_set()) {
            put(&mut block, "color", vars.resolve_color(foreground, false)?);
        }
        if let Some(background) = selection.background.as_ref().filter(|c| c.is_set()) {
            put(&mut block, "background", vars.resolve_color(background, false)?);
        }
        Ok(css::block(SELECTION_SELECTOR, block))
    }
}

/// `backdropFilter` plus a background for engines without filter support.
///
/// A reference may point at a filter definition object in the globals; a
/// reference to plain text, or plain text itself, is the filter value.
fn backdrop_css(vars: &Variables<'_>, filter: &BackdropFilter) -> Result<CssMap> {
    let definition = match filter {
        BackdropFilter::Definition(definition) => definition.clone(),
        BackdropFilter::Plain(value) if !value.is_set() => return Ok(CssMap::new()),
        BackdropFilter::Plain(ThemeValue::Text(text)) if text.starts_with("$$") => {
            match vars.lookup(text)? {
                Some(found @ Value::Object(_)) => {
                    serde_json::from_value::<BackdropFilterDefinition>(found).map_err(|e| {
                        ThemeError::Deserialize {
                            name: vars.config_name().to_string(),
                            message: format!("backdrop filter {}: {}", text, e),
                        }
                    })?
                }
                _ => plain_filter(ThemeValue::Text(text.clone())),
            }
        }
        BackdropFilter::Plain(other) => plain_filter(other.clone()),
    };

    let mut css = CssMap::new();
    put_value(&mut css, vars, "backdropFilter", &definition.definition)?;
    if let Some(fallback) = definition.fallback_background.as_ref().filter(|c| c.is_set()) {
        let background = css::declaration("background", vars.resolve_color(fallback, true)?);
        css.insert(BACKDROP_FALLBACK.into(), CssValue::Block(background));
    }
    Ok(css)
}

fn plain_filter(value: ThemeValue) -> BackdropFilterDefinition {
    BackdropFilterDefinition {
        definition: Some(value),
        fallback_background: None,
    }
}

// =============================================================================
// Border sets
// =============================================================================

impl StyleSet for BorderSet {
    type Map = BorderMap;
    const TABLE: &'static str = "borderSets";

    fn table(sets: &Sets) -> &IndexMap<String, Self> {
        &sets.border_sets
    }

    fn extends(&self) -> Option<&str> {
        self.extends.as_deref()
    }

    fn base(&self) -> &BorderMap {
        &self.map
    }

    fn states(&self) -> &States<BorderMap> {
        &self.states
    }

    fn map_css(vars: &Variables<'_>, map: &BorderMap) -> Result<CssMap> {
        let mut css = CssMap::new();
        border_edge(&mut css, vars, "border", &map.image, &map.style, &map.width)?;
        put_value(&mut css, vars, "transitionDuration", &map.transition_speed)?;
        for (side, edge) in [
            ("bottom", &map.bottom),
            ("left", &map.left),
            ("right", &map.right),
            ("top", &map.top),
        ] {
            if let Some(BorderDefinition { image, style, width }) = edge {
                let prefix = format!("border-{}", side);
                border_edge(&mut css, vars, &prefix, image, style, width)?;
            }
        }
        put_value(&mut css, vars, "border-radius", &map.radius)?;
        Ok(css)
    }
}

fn border_edge(
    css: &mut CssMap,
    vars: &Variables<'_>,
    prefix: &str,
    image: &Option<ThemeValue>,
    style: &Option<ThemeValue>,
    width: &Option<ThemeValue>,
) -> Result<()> {
    put_value(css, vars, &format!("{}-image", prefix), image)?;
    put_value(css, vars, &format!("{}-style", prefix), style)?;
    put_value(css, vars, &format!("{}-width", prefix), width)
}

// =============================================================================
// Font sets
// =============================================================================

impl StyleSet for FontSet {
    type Map = FontMap;
    const TABLE: &'static str = "fontSets";

    fn table(sets: &Sets) -> &IndexMap<String, Self> {
        &sets.font_sets
    }

    fn extends(&self) -> Option<&str> {
        self.extends.as_deref()
    }

    fn base(&self) -> &FontMap {
        &self.map
    }

    fn states(&self) -> &States<FontMap> {
        &self.states
    }

    fn map_css(vars: &Variables<'_>, map: &FontMap) -> Result<CssMap> {
        let mut css = CssMap::new();
        put_value(&mut css, vars, "transitionDuration", &map.transition_speed)?;
        put_value(&mut css, vars, "font-family", &map.family)?;
        put_value(&mut css, vars, "letter-spacing", &map.letter_spacing)?;
        put_value(&mut css, vars, "lineHeight", &map.line_height)?;
        put_value(&mut css, vars, "fontSize", &map.size)?;
        put_value(&mut css, vars, "fontStyle", &map.style)?;
        put_value(&mut css, vars, "fontWeight", &map.weight)?;
        put_value(&mut css, vars, "textTransform", &map.transform)?;
        Ok(css)
    }
}
