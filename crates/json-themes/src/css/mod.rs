//! CSS property maps.
//!
//! Every resolver in this crate produces a [`CssMap`]: an insertion-ordered map
//! whose values are either a declaration (`color: red`) or a nested block keyed
//! by a selector (`&:hover`) or an at-rule (`@supports ...`). Order is part of
//! the contract: the style engine hashes and serializes maps in order, so two
//! maps with the same entries in a different order are different styles.
//!
//! Maps are combined with [`merge`], which mirrors the object deep merge used
//! across the pipeline: keys keep the position of their first appearance,
//! nested blocks merge recursively, and anything else is last-writer-wins.

mod selector;

use indexmap::map::Entry;
use indexmap::IndexMap;
use serde::Serialize;

pub use selector::{sort_by_specificity, specificity, State, SELECTION_SELECTOR};

/// An ordered map of CSS keys to declarations or nested blocks.
pub type CssMap = IndexMap<String, CssValue>;

/// A single entry value in a [`CssMap`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum CssValue {
    /// A property value, emitted as `key:value;`.
    Declaration(String),
    /// A nested selector or at-rule block.
    Block(CssMap),
}

impl CssValue {
    /// Returns the declaration text, if this is a declaration.
    pub fn as_declaration(&self) -> Option<&str> {
        match self {
            CssValue::Declaration(value) => Some(value),
            CssValue::Block(_) => None,
        }
    }

    /// Returns the nested map, if this is a block.
    pub fn as_block(&self) -> Option<&CssMap> {
        match self {
            CssValue::Block(map) => Some(map),
            CssValue::Declaration(_) => None,
        }
    }
}

impl From<&str> for CssValue {
    fn from(value: &str) -> Self {
        CssValue::Declaration(value.to_string())
    }
}

impl From<String> for CssValue {
    fn from(value: String) -> Self {
        CssValue::Declaration(value)
    }
}

impl From<CssMap> for CssValue {
    fn from(map: CssMap) -> Self {
        CssValue::Block(map)
    }
}

/// Deep-merges `overlay` into `base`.
pub fn merge_into(base: &mut CssMap, overlay: CssMap) {
    for (key, value) in overlay {
        match base.entry(key) {
            Entry::Occupied(mut slot) => match (slot.get_mut(), value) {
                (CssValue::Block(existing), CssValue::Block(incoming)) => {
                    merge_into(existing, incoming)
                }
                (current, value) => *current = value,
            },
            Entry::Vacant(slot) => {
                slot.insert(value);
            }
        }
    }
}

/// Deep-merges a sequence of maps left to right.
pub fn merge<I>(maps: I) -> CssMap
where
    I: IntoIterator<Item = CssMap>,
{
    let mut merged = CssMap::new();
    for map in maps {
        merge_into(&mut merged, map);
    }
    merged
}

/// Builds a map holding a single declaration.
pub fn declaration(key: &str, value: impl Into<String>) -> CssMap {
    let mut map = CssMap::new();
    map.insert(key.to_string(), CssValue::Declaration(value.into()));
    map
}

/// Builds a map holding a single nested block.
pub fn block(selector: &str, inner: CssMap) -> CssMap {
    let mut map = CssMap::new();
    map.insert(selector.to_string(), CssValue::Block(inner));
    map
}
