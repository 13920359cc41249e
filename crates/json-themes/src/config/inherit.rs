//! `basedOn` inheritance between theme configurations.
//!
//! A config may name a base config by its `name`. The base is looked up in a
//! caller-supplied pool, resolved the same way (so chains work), and then the
//! derived config is deep-merged on top of it.
//!
//! # Merge strategy
//!
//! The merge is recursive with last-writer-wins on scalars and concatenation
//! on arrays, with one exception: when both sides define one of
//! [`REPLACED_KEYS`], the derived value replaces the base value wholesale.
//! A derived theme can thus restyle a box or set completely instead of
//! accreting stray inherited fields.

use serde_json::{Map, Value};

use crate::error::{CycleKind, Result, ThemeError};

/// Top-level keys every config must declare.
pub const REQUIRED_KEYS: [&str; 5] = ["name", "components", "version", "globals", "sets"];

/// Keys whose values are replaced, never merged, when both sides define them.
pub const REPLACED_KEYS: [&str; 4] = ["theming", "colorSet", "borderSet", "fontSet"];

/// How two values at the same position are combined.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MergeStrategy {
    /// Objects merge key by key, arrays concatenate, scalars take the override.
    Recursive,
    /// The override replaces the base entirely.
    Replace,
}

/// Picks the merge strategy for the value at `path`.
pub fn strategy_for<S: AsRef<str>>(path: &[S]) -> MergeStrategy {
    match path.last() {
        Some(key) if REPLACED_KEYS.contains(&key.as_ref()) => MergeStrategy::Replace,
        _ => MergeStrategy::Recursive,
    }
}

/// Checks that `config` declares every key in [`REQUIRED_KEYS`].
///
/// An empty `name` counts as missing.
pub fn validate(config: &Value) -> Result<()> {
    let object = config.as_object();
    let missing: Vec<String> = REQUIRED_KEYS
        .iter()
        .filter(|key| match object.and_then(|o| o.get(**key)) {
            None => true,
            Some(Value::String(text)) if **key == "name" => text.is_empty(),
            Some(_) => false,
        })
        .map(|key| key.to_string())
        .collect();

    if missing.is_empty() {
        return Ok(());
    }

    let name = config
        .get("name")
        .and_then(Value::as_str)
        .filter(|name| !name.is_empty())
        .unwrap_or("config")
        .to_string();
    Err(ThemeError::InvalidConfig { name, missing })
}

/// Validates `config` and merges it onto its `basedOn` chain from `pool`.
///
/// A `basedOn` name missing from the pool is logged and ignored.
pub fn resolve_inheritance(config: &Value, pool: &[Value]) -> Result<Value> {
    let mut chain = Vec::new();
    resolve_based_on(config, pool, &mut chain)
}

fn resolve_based_on(config: &Value, pool: &[Value], chain: &mut Vec<String>) -> Result<Value> {
    validate(config)?;

    let name = config_name(config).to_string();
    if chain.contains(&name) {
        chain.push(name);
        return Err(ThemeError::CycleDetected {
            kind: CycleKind::BasedOn,
            path: std::mem::take(chain),
        });
    }

    let base_name = match config.get("basedOn").and_then(Value::as_str) {
        Some(base) if !base.is_empty() => base,
        _ => return Ok(config.clone()),
    };

    let Some(base) = pool.iter().find(|c| config_name(c) == base_name) else {
        tracing::warn!(
            theme = %name,
            based_on = %base_name,
            "base theme not found in pool, using the theme as is"
        );
        return Ok(config.clone());
    };

    chain.push(name);
    let resolved_base = resolve_based_on(base, pool, chain)?;
    chain.pop();

    Ok(merge_configs(resolved_base, config.clone()))
}

fn config_name(config: &Value) -> &str {
    config.get("name").and_then(Value::as_str).unwrap_or_default()
}

/// Deep-merges `overlay` onto `base` using [`strategy_for`] at every key.
pub fn merge_configs(base: Value, overlay: Value) -> Value {
    merge_values(base, overlay, &mut Vec::new(), strategy_for)
}

/// Deep-merges `overlay` onto `base` with [`MergeStrategy::Recursive`] everywhere.
pub fn deep_merge(base: Value, overlay: Value) -> Value {
    merge_values(base, overlay, &mut Vec::new(), |_| MergeStrategy::Recursive)
}

type Policy = fn(&[String]) -> MergeStrategy;

fn merge_values(base: Value, overlay: Value, path: &mut Vec<String>, policy: Policy) -> Value {
    if policy(path) == MergeStrategy::Replace {
        return overlay;
    }

    match (base, overlay) {
        (Value::Object(base), Value::Object(overlay)) => {
            Value::Object(merge_objects(base, overlay, path, policy))
        }
        (Value::Array(mut base), Value::Array(overlay)) => {
            base.extend(overlay);
            Value::Array(base)
        }
        (_, overlay) => overlay,
    }
}

fn merge_objects(
    mut base: Map<String, Value>,
    overlay: Map<String, Value>,
    path: &mut Vec<String>,
    policy: Policy,
) -> Map<String, Value> {
    for (key, value) in overlay {
        // Taking the old value leaves the key in place, so it keeps its position.
        let merged = match base.get_mut(&key).map(Value::take) {
            Some(existing) => {
                path.push(key.clone());
                let merged = merge_values(existing, value, path, policy);
                path.pop();
                merged
            }
            None => value,
        };
        base.insert(key, merged);
    }
    base
}
