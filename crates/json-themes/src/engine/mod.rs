//! Style engines: CSS property maps in, class names out.
//!
//! The compiler never writes CSS itself. It hands each composed box to a
//! [`StyleEngine`] and keeps the class name it gets back. An engine must be
//! deterministic (structurally equal input yields the same class name) and
//! must inject the rules of each distinct class at most once.
//!
//! [`Stylesheet`] is the bundled engine. It hashes the maps into a prefixed
//! class name and collects the generated rules into one sheet that callers
//! drain with [`Stylesheet::extract_css`].

mod sheet;

pub use sheet::{
    class_hash, compile_rules, flatten, nest_selector, property_name, Stylesheet,
    DEFAULT_CLASS_PREFIX,
};

use crate::css::CssMap;

/// Turns ordered CSS property maps into a class name.
pub trait StyleEngine {
    /// Returns the class name for `maps`, registering its rules if needed.
    ///
    /// Later maps override earlier ones key by key at the top level.
    fn emit_class(&mut self, maps: &[CssMap]) -> String;
}

impl<E: StyleEngine + ?Sized> StyleEngine for &mut E {
    fn emit_class(&mut self, maps: &[CssMap]) -> String {
        (**self).emit_class(maps)
    }
}
