//! The bundled hashing stylesheet engine.

use std::collections::HashMap;

use once_cell::sync::Lazy;
use regex::{Captures, Regex};

use super::StyleEngine;
use crate::css::{CssMap, CssValue};

/// Class name prefix used when none is configured.
pub const DEFAULT_CLASS_PREFIX: &str = "go";

static PARENT_SELECTOR: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"([^,])+").expect("parent selector pattern is valid"));

static NESTED_SELECTOR: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"([^,]*:\S+\([^)]*\))|([^,])+").expect("nested selector pattern is valid")
});

/// Collects the rules of every class it hands out.
///
/// # Example
///
/// ```rust
/// use json_themes::css::declaration;
/// use json_themes::{StyleEngine, Stylesheet};
///
/// let mut sheet = Stylesheet::new();
/// let class = sheet.emit_class(&[declaration("color", "red")]);
///
/// assert_eq!(class, "go3433634237");
/// assert_eq!(sheet.extract_css(), ".go3433634237{color:red;}");
/// assert!(sheet.css().is_empty());
/// ```
#[derive(Debug, Clone)]
pub struct Stylesheet {
    prefix: String,
    classes: HashMap<String, String>,
    rules: HashMap<String, String>,
    sheet: String,
}

impl Default for Stylesheet {
    fn default() -> Self {
        Self::with_prefix(DEFAULT_CLASS_PREFIX)
    }
}

impl Stylesheet {
    /// Creates an empty sheet with the default `go` prefix.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty sheet whose class names start with `prefix`.
    pub fn with_prefix(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            classes: HashMap::new(),
            rules: HashMap::new(),
            sheet: String::new(),
        }
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// The rules injected since the last [`extract_css`](Self::extract_css).
    pub fn css(&self) -> &str {
        &self.sheet
    }

    /// Drains and returns the injected rules.
    ///
    /// Classes requested again afterwards are re-injected.
    pub fn extract_css(&mut self) -> String {
        std::mem::take(&mut self.sheet)
    }
}

impl StyleEngine for Stylesheet {
    fn emit_class(&mut self, maps: &[CssMap]) -> String {
        let mut compiled = CssMap::new();
        for map in maps {
            compiled.extend(map.iter().map(|(k, v)| (k.clone(), v.clone())));
        }

        let prefix = &self.prefix;
        let class = self
            .classes
            .entry(flatten(&compiled))
            .or_insert_with_key(|text| format!("{}{}", prefix, class_hash(text)))
            .clone();

        let rule = self
            .rules
            .entry(class.clone())
            .or_insert_with(|| compile_rules(&compiled, &format!(".{}", class)));
        if !self.sheet.contains(rule.as_str()) {
            self.sheet.push_str(rule);
        }
        class
    }
}

/// Flattens a map to the text its class name is hashed from: every key
/// followed by its value, nested blocks inline.
pub fn flatten(map: &CssMap) -> String {
    fn write(map: &CssMap, out: &mut String) {
        for (key, value) in map {
            out.push_str(key);
            match value {
                CssValue::Declaration(text) => out.push_str(text),
                CssValue::Block(inner) => write(inner, out),
            }
        }
    }

    let mut out = String::new();
    write(map, &mut out);
    out
}

/// 32-bit multiplicative hash over UTF-16 code units.
pub fn class_hash(text: &str) -> u32 {
    text.encode_utf16()
        .fold(11u32, |hash, unit| hash.wrapping_mul(101).wrapping_add(u32::from(unit)))
}

/// Converts a camelCase property to kebab-case. Custom properties (`--x`)
/// are kept as written.
pub fn property_name(key: &str) -> String {
    if key.starts_with("--") {
        return key.to_string();
    }
    let mut out = String::with_capacity(key.len() + 4);
    for ch in key.chars() {
        if ch.is_ascii_uppercase() {
            out.push('-');
        }
        out.extend(ch.to_lowercase());
    }
    out
}

/// Expands a nested selector against every comma-separated parent selector.
///
/// `&` stands for the parent; a key without `&` is a descendant selector.
pub fn nest_selector(parent: &str, key: &str) -> String {
    if parent.is_empty() {
        return key.to_string();
    }
    PARENT_SELECTOR
        .replace_all(parent, |outer: &Captures| {
            let sel = &outer[0];
            NESTED_SELECTOR
                .replace_all(key, |inner: &Captures| {
                    let part = &inner[0];
                    if part.contains('&') {
                        part.replace('&', sel)
                    } else {
                        format!("{} {}", sel, part)
                    }
                })
                .into_owned()
        })
        .into_owned()
}

/// Serializes a map to CSS rules under `selector`.
///
/// Declarations are grouped into one rule ahead of the nested blocks.
/// `@import` lines go first, `@font-face` is written without the selector,
/// `@keyframes` frames are written without the selector, and any other
/// at-rule wraps its inner rules.
pub fn compile_rules(map: &CssMap, selector: &str) -> String {
    let mut outer = String::new();
    let mut blocks = String::new();
    let mut current = String::new();

    for (key, value) in map {
        match (key.strip_prefix('@'), value) {
            (Some(_), CssValue::Declaration(text)) => {
                outer.push_str(&format!("{} {};", key, text));
            }
            (Some(rule), CssValue::Block(inner)) => match rule.chars().next() {
                Some('f') => blocks.push_str(&compile_rules(inner, key)),
                Some('k') => {
                    blocks.push_str(&format!("{}{{{}}}", key, compile_rules(inner, "")));
                }
                _ => {
                    blocks.push_str(&format!("{}{{{}}}", key, compile_rules(inner, selector)));
                }
            },
            (None, CssValue::Block(inner)) => {
                blocks.push_str(&compile_rules(inner, &nest_selector(selector, key)));
            }
            (None, CssValue::Declaration(text)) => {
                current.push_str(&property_name(key));
                current.push(':');
                current.push_str(text);
                current.push(';');
            }
        }
    }

    if !selector.is_empty() && !current.is_empty() {
        outer.push_str(&format!("{}{{{}}}", selector, current));
    } else {
        outer.push_str(&current);
    }
    outer.push_str(&blocks);
    outer
}
