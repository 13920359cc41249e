//! Integration tests compiling the example theme end to end.

use json_themes::{
    resolve_component, ConfigPool, CycleKind, Format, StyleEngine, Stylesheet, ThemeError,
    ThemeManager, ThemingConfig,
};
use serde_json::{json, Value};

const EXAMPLE: &str = include_str!("fixtures/example.json");
const EXAMPLE_CSS: &str = include_str!("fixtures/example.css");
const DARK: &str = include_str!("fixtures/dark.yaml");

fn example() -> Value {
    serde_json::from_str(EXAMPLE).unwrap()
}

fn example_config() -> ThemingConfig {
    ThemingConfig::from_value(example()).unwrap()
}

fn default_class(engine: &mut impl StyleEngine, name: &str, config: &ThemingConfig) -> String {
    resolve_component(name, config, engine)
        .unwrap()
        .variant("default")
        .unwrap()
        .class_name
        .clone()
}

// =============================================================================
// Compiled CSS
// =============================================================================

#[test]
fn test_example_component_css() {
    let config = example_config();
    let mut sheet = Stylesheet::new();

    let class = default_class(&mut sheet, "Test", &config);
    let css = sheet.extract_css();

    assert_eq!(class, "go2817175552");
    assert_eq!(css, EXAMPLE_CSS.trim_end());
    assert!(css.contains(&class));
}

#[test]
fn test_mixed_variables() {
    let config = example_config();
    let mut sheet = Stylesheet::new();

    let class = default_class(&mut sheet, "MixedVar", &config);
    let css = sheet.extract_css();

    assert!(css.contains(&class));
    assert!(css.contains("color:#cc6655aa"));
    assert!(css.contains("background:#cc6655aa"));
    assert!(css.contains("0 0 1rem #cc6655aa"));
}

#[test]
fn test_equal_styles_share_a_class() {
    let config = example_config();
    let mut sheet = Stylesheet::new();

    let a = default_class(&mut sheet, "CompA", &config);
    let b = default_class(&mut sheet, "CompB", &config);
    let css = sheet.extract_css();

    assert_eq!(a, b);
    assert!(css.contains(&a));
    assert_eq!(css.matches(&format!(".{}{{", a)).count(), 1);
}

#[test]
fn test_compile_is_deterministic() {
    let config = example_config();

    let mut first = Stylesheet::new();
    let mut second = Stylesheet::new();
    let a = resolve_component("Test", &config, &mut first).unwrap();
    let b = resolve_component("Test", &config, &mut second).unwrap();

    assert_eq!(a, b);
    assert_eq!(first.extract_css(), second.extract_css());
}

// =============================================================================
// Theme manager
// =============================================================================

#[test]
fn test_manager_compiles_every_component() {
    let mut manager = ThemeManager::new();
    let theme = manager.load(example(), &[]).unwrap();

    let names: Vec<_> = theme.components.iter().map(|c| c.component.as_str()).collect();
    assert_eq!(names, vec!["Test", "CompA", "CompB", "MixedVar"]);
    assert_eq!(
        theme.variant("Test", "default").unwrap().class_name,
        "go2817175552"
    );
    assert_eq!(
        theme.variant("CompA", "default").unwrap().default_props,
        json!({})
    );
}

#[test]
fn test_manager_reports_missing_keys() {
    let mut config = example();
    config.as_object_mut().unwrap().remove("sets");
    config.as_object_mut().unwrap().remove("globals");

    let err = ThemeManager::new().load(config, &[]).unwrap_err();
    assert_eq!(
        err,
        ThemeError::InvalidConfig {
            name: "Example".to_string(),
            missing: vec!["globals".to_string(), "sets".to_string()],
        }
    );
}

#[test]
fn test_manager_rejects_null() {
    let err = ThemeManager::new().load(Value::Null, &[]).unwrap_err();
    assert_eq!(err, ThemeError::NoConfig);
}

// =============================================================================
// Inheritance
// =============================================================================

#[test]
fn test_derived_theme_from_pool() {
    let mut pool = ConfigPool::new();
    pool.add(example());
    let dark = json_themes::parse_config_str(DARK, Format::Yaml).unwrap();

    let mut manager = ThemeManager::new();
    let theme = manager.load_with_pool(dark, &pool).unwrap();
    assert_eq!(theme.name, "Dark");
    assert_eq!(theme.config.based_on.as_deref(), Some("Example"));

    let comp_a = theme.component("CompA").unwrap();
    let names: Vec<_> = comp_a.variants.iter().map(|v| v.variant.as_str()).collect();
    assert_eq!(names, vec!["default", "outlined"]);

    let outlined = comp_a.variant("outlined").unwrap();
    assert!(!outlined.class_name.is_empty());
    assert!(outlined.parts.contains_key("icon"));
    assert_eq!(outlined.default_props, json!({ "size": "#eee" }));

    let css = manager.engine_mut().extract_css();
    assert!(css.contains("background:#111;"));
    assert!(css.contains("border-style:solid;"));
    assert!(!css.contains("background:black;"));
}

#[test]
fn test_derived_theme_keeps_base_components() {
    let dark = json_themes::parse_config_str(DARK, Format::Yaml).unwrap();

    let mut manager = ThemeManager::new();
    let theme = manager.load(dark, &[example()]).unwrap();
    assert!(theme.component("Test").is_some());
    assert!(theme.component("MixedVar").is_some());
}

#[test]
fn test_based_on_cycle() {
    let mut a = example();
    a["name"] = json!("A");
    a["basedOn"] = json!("B");
    let mut b = example();
    b["name"] = json!("B");
    b["basedOn"] = json!("A");

    let err = ThemeManager::new().load(a.clone(), &[a, b]).unwrap_err();
    match err {
        ThemeError::CycleDetected { kind, path } => {
            assert_eq!(kind, CycleKind::BasedOn);
            assert_eq!(path, vec!["A", "B", "A"]);
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn test_missing_base_uses_theme_as_is() {
    let mut config = example();
    config["basedOn"] = json!("Nowhere");

    let mut manager = ThemeManager::new();
    let theme = manager.load(config, &[]).unwrap();
    assert_eq!(theme.components.len(), 4);
}
