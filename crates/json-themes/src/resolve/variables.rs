//! `$$` variable substitution against the `globals` token tree.
//!
//! A reference is `$$` followed by a dotted path and an optional `|`. The `|`
//! only terminates the path; whatever follows it stays literal, which is how
//! alpha suffixes are appended to colors:
//!
//! ```text
//! "$$colors.mix|aa"            -> "#cc6655aa"
//! "0 0 1rem $$colors.mix|aa"   -> "0 0 1rem #cc6655aa"
//! ```
//!
//! Leaves that themselves contain references are resolved transitively. A
//! leaf that is exactly one reference is an alias and resolves to the value it
//! points at, which may be an object (a gradient, a backdrop filter).

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::{Map, Value};

use crate::config::{ColorValue, ThemeValue};
use crate::error::{CycleKind, Result, ThemeError};

static VARIABLE_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\$\$[A-Za-z0-9_.]*\|?").expect("variable pattern is valid"));

/// Returns true if `text` contains at least one `$$` reference.
pub fn has_reference(text: &str) -> bool {
    VARIABLE_PATTERN.is_match(text)
}

/// Looks up a path in `root`, chasing references found in string leaves.
///
/// Returns `Ok(None)` when a segment is missing or the leaf is `null`.
pub fn deep_attribute(root: &Value, path: &[&str]) -> Result<Option<Value>> {
    lookup_path(root, &path.join("."), &mut Vec::new())
}

/// Resolves references against one config's globals.
#[derive(Debug, Clone, Copy)]
pub struct Variables<'a> {
    globals: &'a Value,
    config: &'a str,
}

impl<'a> Variables<'a> {
    pub fn new(globals: &'a Value) -> Self {
        Self { globals, config: "" }
    }

    /// Names the config the globals belong to, for error reports.
    pub fn named(self, config: &'a str) -> Self {
        Self { config, ..self }
    }

    /// Name of the config the globals belong to.
    pub fn config_name(&self) -> &'a str {
        self.config
    }

    /// Looks up the value a single reference points at.
    ///
    /// `reference` may carry the `$$` prefix and a trailing `|`.
    pub fn lookup(&self, reference: &str) -> Result<Option<Value>> {
        lookup_path(self.globals, token_path(reference), &mut Vec::new())
    }

    /// Substitutes every reference in `text` with its scalar value.
    pub fn resolve(&self, text: &str) -> Result<String> {
        self.resolve_with(text, scalar_text)
    }

    /// Substitutes every reference in `text`, rendering each looked-up value
    /// with `hook`.
    ///
    /// Missing references are logged and replaced by the empty string.
    pub fn resolve_with<F>(&self, text: &str, hook: F) -> Result<String>
    where
        F: Fn(&Value) -> Result<String>,
    {
        let mut trail = Vec::new();
        substitute(self.globals, text, &mut trail, &hook)
    }

    /// Renders a scalar config value, substituting references in text.
    pub fn resolve_value(&self, value: &ThemeValue) -> Result<String> {
        match value {
            ThemeValue::Text(text) => self.resolve(text),
            other => Ok(other.to_text()),
        }
    }

    /// Renders a color, picking the gradient or its fallback.
    ///
    /// Gradients are written where CSS accepts them (`allow_gradient`),
    /// otherwise their `fallbackColor` is used.
    pub fn resolve_color(&self, value: &ColorValue, allow_gradient: bool) -> Result<String> {
        match value {
            ColorValue::Gradient(gradient) => {
                let picked = if allow_gradient {
                    gradient.definition.as_ref()
                } else {
                    gradient.fallback_color.as_ref()
                };
                match picked {
                    Some(value) => self.resolve_value(value),
                    None => Ok(String::new()),
                }
            }
            ColorValue::Plain(ThemeValue::Text(text)) => {
                self.resolve_with(text, |value| self.color_text(value, allow_gradient))
            }
            ColorValue::Plain(other) => Ok(other.to_text()),
        }
    }

    fn color_text(&self, value: &Value, allow_gradient: bool) -> Result<String> {
        match value {
            Value::Object(map) => {
                let field = if allow_gradient {
                    "definition"
                } else {
                    "fallbackColor"
                };
                match map.get(field) {
                    Some(Value::String(text)) => self.resolve(text),
                    Some(other) => scalar_text(other),
                    None => Ok(String::new()),
                }
            }
            other => scalar_text(other),
        }
    }

    /// Resolves references in every string of a `defaultProps` tree.
    ///
    /// Objects and arrays are walked recursively; other scalars pass through.
    pub fn resolve_props(&self, props: &Value) -> Result<Value> {
        match props {
            Value::String(text) => Ok(Value::String(self.resolve(text)?)),
            Value::Array(items) => items
                .iter()
                .map(|item| self.resolve_props(item))
                .collect::<Result<Vec<_>>>()
                .map(Value::Array),
            Value::Object(map) => {
                let mut resolved = Map::with_capacity(map.len());
                for (key, value) in map {
                    resolved.insert(key.clone(), self.resolve_props(value)?);
                }
                Ok(Value::Object(resolved))
            }
            other => Ok(other.clone()),
        }
    }
}

fn token_path(token: &str) -> &str {
    let path = token.strip_prefix("$$").unwrap_or(token);
    path.strip_suffix('|').unwrap_or(path)
}

/// Returns the path if `text` is exactly one reference.
fn whole_reference(text: &str) -> Option<&str> {
    VARIABLE_PATTERN
        .find(text)
        .filter(|m| m.start() == 0 && m.end() == text.len())
        .map(|m| token_path(m.as_str()))
}

fn navigate<'v>(root: &'v Value, path: &str) -> Option<&'v Value> {
    path.split('.')
        .try_fold(root, |value, segment| match value {
            Value::Object(map) => map.get(segment),
            Value::Array(items) => segment.parse::<usize>().ok().and_then(|i| items.get(i)),
            _ => None,
        })
        .filter(|value| !value.is_null())
}

fn lookup_path(root: &Value, path: &str, trail: &mut Vec<String>) -> Result<Option<Value>> {
    if trail.iter().any(|seen| seen == path) {
        let mut cycle = trail.clone();
        cycle.push(path.to_string());
        return Err(ThemeError::CycleDetected {
            kind: CycleKind::Variable,
            path: cycle,
        });
    }

    let Some(found) = navigate(root, path) else {
        return Ok(None);
    };
    tracing::trace!(variable = %path, "resolved variable");

    match found {
        Value::String(text) if has_reference(text) => {
            trail.push(path.to_string());
            let resolved = match whole_reference(text) {
                Some(alias) => lookup_path(root, alias, trail),
                None => substitute(root, text, trail, &scalar_text).map(|s| Some(Value::String(s))),
            };
            trail.pop();
            resolved
        }
        other => Ok(Some(other.clone())),
    }
}

fn substitute(
    root: &Value,
    text: &str,
    trail: &mut Vec<String>,
    hook: &dyn Fn(&Value) -> Result<String>,
) -> Result<String> {
    let mut out = String::with_capacity(text.len());
    let mut last = 0;

    for token in VARIABLE_PATTERN.find_iter(text) {
        out.push_str(&text[last..token.start()]);
        match lookup_path(root, token_path(token.as_str()), trail)? {
            Some(value) => out.push_str(&hook(&value)?),
            None => tracing::warn!(variable = %token.as_str(), "No Var found. Skipped."),
        }
        last = token.end();
    }

    out.push_str(&text[last..]);
    Ok(out)
}

fn scalar_text(value: &Value) -> Result<String> {
    Ok(match value {
        Value::String(text) => text.clone(),
        Value::Number(number) => number.to_string(),
        Value::Bool(flag) => flag.to_string(),
        Value::Null => String::new(),
        Value::Array(_) | Value::Object(_) => {
            tracing::warn!("variable points at a structured value where text is expected");
            String::new()
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GradientDefinition;
    use proptest::prelude::*;
    use serde_json::json;

    fn globals() -> Value {
        json!({
            "colors": { "bg": "black", "fg": "white", "mix": "#cc6655" },
            "mapping": { "mapped": "$$colors.mix|aa", "alias": "$$gradient" },
            "gradient": {
                "definition": "linear-gradient(#e66465, #9198e5)",
                "fallbackColor": "#e66465"
            },
            "sizes": [ "1rem", "2rem" ],
            "zero": 0
        })
    }

    // =========================================================================
    // deep_attribute
    // =========================================================================

    #[test]
    fn test_deep_attribute_navigates() {
        let a = json!({ "deep1": { "deep2": "hi" } });
        let b = json!({ "deep1": { "deep2": { "deep3": "hu" }, "ho": "ho" } });

        assert_eq!(deep_attribute(&a, &["deep1", "deep2"]).unwrap(), Some(json!("hi")));
        assert_eq!(deep_attribute(&b, &["deep1", "ho"]).unwrap(), Some(json!("ho")));
        assert_eq!(
            deep_attribute(&b, &["deep1", "deep2", "deep3"]).unwrap(),
            Some(json!("hu"))
        );
        assert_eq!(
            deep_attribute(&b, &["deep1", "deep2"]).unwrap(),
            Some(json!({ "deep3": "hu" }))
        );
        assert_eq!(deep_attribute(&json!({}), &["not_existing"]).unwrap(), None);
    }

    #[test]
    fn test_deep_attribute_chases_references() {
        let b = json!({ "deep1": { "deep2": { "deep3": "$$deep1.ho" }, "ho": "ho" } });
        assert_eq!(
            deep_attribute(&b, &["deep1", "deep2", "deep3"]).unwrap(),
            Some(json!("ho"))
        );
    }

    #[test]
    fn test_deep_attribute_indexes_arrays() {
        let g = globals();
        assert_eq!(deep_attribute(&g, &["sizes", "1"]).unwrap(), Some(json!("2rem")));
        assert_eq!(deep_attribute(&g, &["sizes", "9"]).unwrap(), None);
    }

    #[test]
    fn test_deep_attribute_detects_cycles() {
        let root = json!({ "a": "$$b", "b": "x $$a" });
        let err = deep_attribute(&root, &["a"]).unwrap_err();
        match err {
            ThemeError::CycleDetected { kind, path } => {
                assert_eq!(kind, CycleKind::Variable);
                assert_eq!(path, vec!["a", "b", "a"]);
            }
            other => panic!("unexpected error {:?}", other),
        }
    }

    // =========================================================================
    // Substitution
    // =========================================================================

    #[test]
    fn test_resolve_plain_text_passes_through() {
        let g = globals();
        let vars = Variables::new(&g);
        assert_eq!(vars.resolve("1rem solid").unwrap(), "1rem solid");
    }

    #[test]
    fn test_resolve_suffix_and_chain() {
        let g = globals();
        let vars = Variables::new(&g);
        assert_eq!(vars.resolve("$$colors.mix|aa").unwrap(), "#cc6655aa");
        assert_eq!(vars.resolve("$$mapping.mapped").unwrap(), "#cc6655aa");
        assert_eq!(
            vars.resolve("0 0 1rem $$colors.mix|aa").unwrap(),
            "0 0 1rem #cc6655aa"
        );
    }

    #[test]
    fn test_resolve_multiple_tokens() {
        let g = globals();
        let vars = Variables::new(&g);
        assert_eq!(
            vars.resolve("$$colors.bg $$colors.fg").unwrap(),
            "black white"
        );
    }

    #[test]
    fn test_resolve_missing_is_empty() {
        let empty = json!({});
        let vars = Variables::new(&empty);
        assert_eq!(vars.resolve("$$not.there").unwrap(), "");
        assert_eq!(vars.resolve("a $$nope b").unwrap(), "a  b");
        assert_eq!(vars.lookup("$$not.there").unwrap(), None);
    }

    #[test]
    fn test_resolve_numbers() {
        let g = globals();
        let vars = Variables::new(&g);
        assert_eq!(vars.resolve("$$zero").unwrap(), "0");
        assert_eq!(vars.resolve_value(&ThemeValue::Number(3.into())).unwrap(), "3");
    }

    // =========================================================================
    // Colors
    // =========================================================================

    #[test]
    fn test_resolve_color_gradient_reference() {
        let g = globals();
        let vars = Variables::new(&g);
        let value = ColorValue::Plain("$$gradient".into());
        assert_eq!(
            vars.resolve_color(&value, true).unwrap(),
            "linear-gradient(#e66465, #9198e5)"
        );
        assert_eq!(vars.resolve_color(&value, false).unwrap(), "#e66465");
    }

    #[test]
    fn test_resolve_color_alias_reaches_gradient() {
        let g = globals();
        let vars = Variables::new(&g);
        let value = ColorValue::Plain("$$mapping.alias".into());
        assert_eq!(vars.resolve_color(&value, false).unwrap(), "#e66465");
    }

    #[test]
    fn test_resolve_color_inline_gradient() {
        let g = globals();
        let vars = Variables::new(&g);
        let value = ColorValue::Gradient(GradientDefinition {
            definition: Some("linear-gradient($$colors.bg, $$colors.fg)".into()),
            fallback_color: Some("$$colors.bg".into()),
        });
        assert_eq!(
            vars.resolve_color(&value, true).unwrap(),
            "linear-gradient(black, white)"
        );
        assert_eq!(vars.resolve_color(&value, false).unwrap(), "black");
    }

    // =========================================================================
    // Default props
    // =========================================================================

    #[test]
    fn test_resolve_props_recurses() {
        let g = globals();
        let vars = Variables::new(&g);
        let props = json!({
            "label": "$$colors.fg",
            "nested": { "tint": "$$colors.mix|80", "size": 3 },
            "list": [ "$$colors.bg", true ]
        });
        assert_eq!(
            vars.resolve_props(&props).unwrap(),
            json!({
                "label": "white",
                "nested": { "tint": "#cc665580", "size": 3 },
                "list": [ "black", true ]
            })
        );
    }

    proptest! {
        #[test]
        fn suffix_is_appended_verbatim(
            color in "#[0-9a-f]{3,6}",
            suffix in "[A-Za-z0-9 ]{0,6}",
        ) {
            let g = json!({ "colors": { "c": color.clone() } });
            let vars = Variables::new(&g);
            let resolved = vars.resolve(&format!("$$colors.c|{}", suffix)).unwrap();
            prop_assert_eq!(resolved, format!("{}{}", color, suffix));
        }

        #[test]
        fn text_without_references_is_unchanged(text in "[^$]{0,40}") {
            let g = globals();
            let vars = Variables::new(&g);
            prop_assert_eq!(vars.resolve(&text).unwrap(), text);
        }
    }
}
