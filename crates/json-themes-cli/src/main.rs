//! json-themes - compile theme configurations from the command line.
//!
//! ```text
//! json-themes compile theme.yaml --pool themes/ --format css
//! json-themes check theme.json --pool themes/
//! ```

use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use json_themes::{parse_config_str, CompileOptions, ConfigPool, Format, ThemeManager};
use serde_json::Value;
use tracing_subscriber::EnvFilter;

/// Compile declarative JSON/YAML themes into class names and CSS.
#[derive(Parser)]
#[command(name = "json-themes", version, about)]
struct Cli {
    /// Log debug output (overridden by RUST_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Compile every component of a theme
    Compile {
        #[command(flatten)]
        input: ThemeInput,

        /// What to print
        #[arg(long, value_enum, default_value_t = OutputFormat::Json)]
        format: OutputFormat,

        /// Prefix of generated class names
        #[arg(long, default_value = json_themes::DEFAULT_CLASS_PREFIX)]
        prefix: String,
    },
    /// Validate a theme and list its components
    Check {
        #[command(flatten)]
        input: ThemeInput,
    },
}

#[derive(Args)]
struct ThemeInput {
    /// Theme file (.json, .yaml or .yml)
    theme: PathBuf,

    /// Directory of base themes for `basedOn` (repeatable)
    #[arg(long = "pool", value_name = "DIR")]
    pools: Vec<PathBuf>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    /// Compiled components as JSON
    Json,
    /// The generated stylesheet
    Css,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let stdout = std::io::stdout();
    run(cli.command, &mut stdout.lock())
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn run(command: Command, out: &mut impl Write) -> Result<()> {
    match command {
        Command::Compile {
            input,
            format,
            prefix,
        } => {
            let (theme, pool) = input.load()?;
            let mut manager = ThemeManager::with_options(CompileOptions {
                class_prefix: prefix,
            });
            let loaded = manager.load_with_pool(theme, &pool)?;
            match format {
                OutputFormat::Json => {
                    serde_json::to_writer_pretty(&mut *out, &loaded.components)?;
                    writeln!(out)?;
                }
                OutputFormat::Css => {
                    writeln!(out, "{}", manager.engine_mut().extract_css())?;
                }
            }
        }
        Command::Check { input } => {
            let (theme, pool) = input.load()?;
            let mut manager = ThemeManager::new();
            let loaded = manager.load_with_pool(theme, &pool)?;
            writeln!(out, "{} ({} components)", loaded.name, loaded.components.len())?;
            for component in &loaded.components {
                let variants: Vec<_> =
                    component.variants.iter().map(|v| v.variant.as_str()).collect();
                writeln!(out, "  {}: {}", component.component, variants.join(", "))?;
            }
        }
    }
    Ok(())
}

impl ThemeInput {
    fn load(&self) -> Result<(Value, ConfigPool)> {
        tracing::debug!(theme = %self.theme.display(), pools = self.pools.len(), "loading theme");
        let theme = read_theme(&self.theme)?;
        let mut pool = ConfigPool::new();
        for dir in &self.pools {
            pool.add_dir(dir)
                .with_context(|| format!("failed to load pool {}", dir.display()))?;
        }
        Ok((theme, pool))
    }
}

fn read_theme(path: &Path) -> Result<Value> {
    let Some(format) = Format::from_path(path) else {
        bail!(
            "unsupported theme file {} (expected .json, .yaml or .yml)",
            path.display()
        );
    };
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    parse_config_str(&text, format).with_context(|| format!("failed to parse {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    const BASE: &str = r#"{
        "name": "Base",
        "version": "1.0.0",
        "globals": { "fg": "white" },
        "sets": {},
        "components": {
            "Label": { "default": { "theming": { "colorSet": { "foreground": "$$fg" } } } }
        }
    }"#;

    const CHILD: &str = "name: Child\nbasedOn: Base\nversion: 1.0.0\nglobals:\n  fg: black\nsets: {}\ncomponents: {}\n";

    fn setup() -> (TempDir, PathBuf) {
        let dir = TempDir::new().unwrap();
        let pool = dir.path().join("pool");
        fs::create_dir(&pool).unwrap();
        fs::write(pool.join("base.json"), BASE).unwrap();
        fs::write(dir.path().join("child.yaml"), CHILD).unwrap();
        (dir, pool)
    }

    fn run_to_string(command: Command) -> Result<String> {
        let mut out = Vec::new();
        run(command, &mut out)?;
        Ok(String::from_utf8(out).unwrap())
    }

    #[test]
    fn test_cli_parses() {
        use clap::CommandFactory;
        Cli::command().debug_assert();

        let cli = Cli::try_parse_from([
            "json-themes", "compile", "t.json", "--pool", "a", "--pool", "b", "--format", "css",
        ])
        .unwrap();
        match cli.command {
            Command::Compile { input, format, prefix } => {
                assert_eq!(input.pools.len(), 2);
                assert_eq!(format, OutputFormat::Css);
                assert_eq!(prefix, "go");
            }
            Command::Check { .. } => panic!("expected compile"),
        }
    }

    #[test]
    fn test_compile_css_with_pool() {
        let (dir, pool) = setup();
        let css = run_to_string(Command::Compile {
            input: ThemeInput {
                theme: dir.path().join("child.yaml"),
                pools: vec![pool],
            },
            format: OutputFormat::Css,
            prefix: "th".to_string(),
        })
        .unwrap();

        assert!(css.starts_with(".th"));
        assert!(css.contains("color:black;"));
    }

    #[test]
    fn test_compile_json() {
        let (dir, pool) = setup();
        let json = run_to_string(Command::Compile {
            input: ThemeInput {
                theme: dir.path().join("child.yaml"),
                pools: vec![pool],
            },
            format: OutputFormat::Json,
            prefix: "go".to_string(),
        })
        .unwrap();

        let value: Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value[0]["component"], "Label");
        assert_eq!(value[0]["variants"][0]["variant"], "default");
    }

    #[test]
    fn test_check_lists_components() {
        let (_dir, pool) = setup();
        let output = run_to_string(Command::Check {
            input: ThemeInput {
                theme: pool.join("base.json"),
                pools: Vec::new(),
            },
        })
        .unwrap();
        assert_eq!(output, "Base (1 components)\n  Label: default\n");
    }

    #[test]
    fn test_unsupported_extension() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("theme.toml");
        fs::write(&path, "").unwrap();
        let err = read_theme(&path).unwrap_err();
        assert!(err.to_string().contains("unsupported theme file"));
    }

    #[test]
    fn test_invalid_theme_is_reported() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("broken.json");
        fs::write(&path, r#"{ "name": "Broken" }"#).unwrap();

        let err = run_to_string(Command::Check {
            input: ThemeInput {
                theme: path,
                pools: Vec::new(),
            },
        })
        .unwrap_err();
        assert!(err.downcast_ref::<json_themes::ThemeError>().is_some());
    }
}
