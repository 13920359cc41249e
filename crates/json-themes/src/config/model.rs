//! Typed theming configuration.
//!
//! The raw config arrives as JSON (or YAML) and is merged along its `basedOn`
//! chain as an untyped [`serde_json::Value`]. Only the merged result is
//! converted into these types, which the resolvers then treat as read-only.
//!
//! Polymorphic slots (a set or box given by reference, inline, or as a list)
//! are modeled by [`Source`], so each resolver matches on the shape instead of
//! probing a value at runtime.

use indexmap::IndexMap;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

use super::inherit::deep_merge;
use crate::css::State;

/// Strips the `$$` prefix from a reference, if present.
pub fn reference_name(reference: &str) -> &str {
    reference.strip_prefix("$$").unwrap_or(reference)
}

/// Reads an explicit `null` the same as a missing key.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// A scalar config value: text, a number, or a flag.
///
/// A value is *unset* when it is an empty string or `false`; unset values
/// emit nothing. Numeric zero is a real value.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum ThemeValue {
    Text(String),
    Number(serde_json::Number),
    Flag(bool),
}

impl ThemeValue {
    /// Returns true if this value should be emitted.
    pub fn is_set(&self) -> bool {
        match self {
            ThemeValue::Text(text) => !text.is_empty(),
            ThemeValue::Number(_) => true,
            ThemeValue::Flag(flag) => *flag,
        }
    }

    /// Renders the value as text, before variable substitution.
    pub fn to_text(&self) -> String {
        match self {
            ThemeValue::Text(text) => text.clone(),
            ThemeValue::Number(number) => number.to_string(),
            ThemeValue::Flag(flag) => flag.to_string(),
        }
    }
}

impl From<&str> for ThemeValue {
    fn from(text: &str) -> Self {
        ThemeValue::Text(text.to_string())
    }
}

/// Returns the value if it is present and set.
pub(crate) fn set_value(value: &Option<ThemeValue>) -> Option<&ThemeValue> {
    value.as_ref().filter(|v| v.is_set())
}

/// A set or box slot: a `$$name` reference, an inline definition, or a list of
/// either whose resolutions are merged in order.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum Source<T> {
    Reference(String),
    List(Vec<Source<T>>),
    Inline(Box<T>),
}

/// A color that may also be a gradient.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum ColorValue {
    Gradient(GradientDefinition),
    Plain(ThemeValue),
}

impl ColorValue {
    /// Returns true if this value should be emitted.
    pub fn is_set(&self) -> bool {
        match self {
            ColorValue::Gradient(_) => true,
            ColorValue::Plain(value) => value.is_set(),
        }
    }
}

/// A gradient with a flat fallback for places gradients cannot go.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GradientDefinition {
    pub definition: Option<ThemeValue>,
    pub fallback_color: Option<ThemeValue>,
}

/// A backdrop filter, inline or by reference to a globals definition.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum BackdropFilter {
    Definition(BackdropFilterDefinition),
    Plain(ThemeValue),
}

/// A backdrop filter with a background for engines without filter support.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BackdropFilterDefinition {
    pub definition: Option<ThemeValue>,
    pub fallback_background: Option<ColorValue>,
}

/// The nine state sub-maps shared by style sets and boxes.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct States<T> {
    #[serde(rename = "__hover")]
    pub hover: Option<T>,
    #[serde(rename = "__active")]
    pub active: Option<T>,
    #[serde(rename = "__focus")]
    pub focus: Option<T>,
    #[serde(rename = "__focusVisible")]
    pub focus_visible: Option<T>,
    #[serde(rename = "__checked")]
    pub checked: Option<T>,
    #[serde(rename = "__pressed")]
    pub pressed: Option<T>,
    #[serde(rename = "__current")]
    pub current: Option<T>,
    #[serde(rename = "__invalid")]
    pub invalid: Option<T>,
    #[serde(rename = "__disabled")]
    pub disabled: Option<T>,
}

impl<T> States<T> {
    /// Returns the sub-map declared for `state`.
    pub fn get(&self, state: State) -> Option<&T> {
        match state {
            State::Hover => self.hover.as_ref(),
            State::Active => self.active.as_ref(),
            State::Focus => self.focus.as_ref(),
            State::FocusVisible => self.focus_visible.as_ref(),
            State::Checked => self.checked.as_ref(),
            State::Pressed => self.pressed.as_ref(),
            State::Current => self.current.as_ref(),
            State::Invalid => self.invalid.as_ref(),
            State::Disabled => self.disabled.as_ref(),
        }
    }
}

impl<T> Default for States<T> {
    fn default() -> Self {
        Self {
            hover: None,
            active: None,
            focus: None,
            focus_visible: None,
            checked: None,
            pressed: None,
            current: None,
            invalid: None,
            disabled: None,
        }
    }
}

// =============================================================================
// Style sets
// =============================================================================

/// Color properties of one set level.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ColorMap {
    pub transition_speed: Option<ThemeValue>,
    pub background: Option<ColorValue>,
    pub border: Option<ColorValue>,
    pub filter: Option<ThemeValue>,
    pub backdrop_filter: Option<BackdropFilter>,
    pub foreground: Option<ColorValue>,
    pub icon: Option<ThemeValue>,
    pub shadow: Option<ThemeValue>,
}

/// Text selection colors.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Selection {
    pub foreground: Option<ColorValue>,
    pub background: Option<ColorValue>,
}

/// A named or inline color set.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ColorSet {
    #[serde(rename = "__extends")]
    pub extends: Option<String>,
    #[serde(flatten)]
    pub map: ColorMap,
    #[serde(flatten)]
    pub states: States<ColorMap>,
    #[serde(rename = "__selection")]
    pub selection: Option<Selection>,
}

/// Image, style and width of one border edge (or all edges).
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct BorderDefinition {
    pub image: Option<ThemeValue>,
    pub style: Option<ThemeValue>,
    pub width: Option<ThemeValue>,
}

/// Border properties of one set level.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BorderMap {
    pub image: Option<ThemeValue>,
    pub style: Option<ThemeValue>,
    pub width: Option<ThemeValue>,
    pub transition_speed: Option<ThemeValue>,
    pub bottom: Option<BorderDefinition>,
    pub left: Option<BorderDefinition>,
    pub right: Option<BorderDefinition>,
    pub top: Option<BorderDefinition>,
    pub radius: Option<ThemeValue>,
}

/// A named or inline border set.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct BorderSet {
    #[serde(rename = "__extends")]
    pub extends: Option<String>,
    #[serde(flatten)]
    pub map: BorderMap,
    #[serde(flatten)]
    pub states: States<BorderMap>,
}

/// Font properties of one set level.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FontMap {
    pub transition_speed: Option<ThemeValue>,
    pub family: Option<ThemeValue>,
    pub letter_spacing: Option<ThemeValue>,
    pub line_height: Option<ThemeValue>,
    pub size: Option<ThemeValue>,
    pub style: Option<ThemeValue>,
    pub weight: Option<ThemeValue>,
    pub transform: Option<ThemeValue>,
}

/// A named or inline font set.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct FontSet {
    #[serde(rename = "__extends")]
    pub extends: Option<String>,
    #[serde(flatten)]
    pub map: FontMap,
    #[serde(flatten)]
    pub states: States<FontMap>,
}

// =============================================================================
// Boxes and components
// =============================================================================

/// `before`/`after` declarations, in declaration order.
///
/// `content` is emitted quoted and verbatim, `transitionSpeed` becomes
/// `transitionDuration`, every other entry is variable-resolved.
pub type PseudoElement = IndexMap<String, Option<ThemeValue>>;

/// The styling of one renderable box.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BoxDefinition {
    #[serde(rename = "__extends")]
    pub extends: Option<String>,
    pub border_set: Option<Source<BorderSet>>,
    pub color_set: Option<Source<ColorSet>>,
    pub font_set: Option<Source<FontSet>>,
    pub padding: Option<ThemeValue>,
    pub height: Option<ThemeValue>,
    pub width: Option<ThemeValue>,
    pub transform: Option<ThemeValue>,
    pub before: Option<PseudoElement>,
    pub after: Option<PseudoElement>,
    #[serde(flatten)]
    pub states: States<Source<BoxDefinition>>,
}

/// A box slot: reference, inline box, or list of boxes.
pub type BoxSource = Source<BoxDefinition>;

/// A part slot together with the raw value it was read from.
///
/// Named variants deep-merge their parts over the default variant's at the
/// raw level, so an inline part only overrides the keys it declares.
#[derive(Debug, Clone, PartialEq)]
pub struct Part {
    pub raw: Value,
    pub source: BoxSource,
}

impl Part {
    pub fn from_value(raw: Value) -> serde_json::Result<Self> {
        let source = BoxSource::deserialize(&raw)?;
        Ok(Self { raw, source })
    }

    /// Deep-merges `overlay` over this part.
    pub fn merged_with(&self, overlay: &Part) -> serde_json::Result<Self> {
        Self::from_value(deep_merge(self.raw.clone(), overlay.raw.clone()))
    }
}

impl<'de> Deserialize<'de> for Part {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = Value::deserialize(deserializer)?;
        Part::from_value(raw).map_err(serde::de::Error::custom)
    }
}

/// One styling alternative of a component.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Variant {
    pub theming: Option<BoxSource>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub parts: IndexMap<String, Part>,
    pub default_props: Option<Value>,
}

/// A themeable component: a default variant plus named variants.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Component {
    #[serde(rename = "__extends")]
    pub extends: Option<String>,
    pub default: Option<Variant>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub variants: IndexMap<String, Variant>,
}

// =============================================================================
// Root
// =============================================================================

/// Reusable named sets.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Sets {
    #[serde(default, deserialize_with = "null_as_default")]
    pub color_sets: IndexMap<String, ColorSet>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub border_sets: IndexMap<String, BorderSet>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub font_sets: IndexMap<String, FontSet>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub box_sets: IndexMap<String, BoxDefinition>,
}

/// Asset settings carried through from the config file.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Assets {
    pub base_url: Option<String>,
}

/// A fully merged theming configuration.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ThemingConfig {
    pub name: String,
    pub version: ThemeValue,
    pub based_on: Option<String>,
    #[serde(default)]
    pub globals: Value,
    #[serde(default, deserialize_with = "null_as_default")]
    pub sets: Sets,
    #[serde(default, deserialize_with = "null_as_default")]
    pub components: IndexMap<String, Component>,
    #[serde(default)]
    pub meta: Value,
    pub assets: Option<Assets>,
}

impl ThemingConfig {
    /// Converts a merged config value into the typed model.
    pub fn from_value(value: Value) -> crate::Result<Self> {
        let name = value
            .get("name")
            .and_then(Value::as_str)
            .unwrap_or("config")
            .to_string();
        serde_json::from_value(value).map_err(|e| crate::ThemeError::Deserialize {
            name,
            message: e.to_string(),
        })
    }
}
