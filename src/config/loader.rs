//! Configuration loading and discovery for `factory.toml`
//!
//! Provides functions to find, load, and merge configuration.

use super::schema::{DefaultsConfig, FactoryConfig};
use crate::models::ThemeConfig;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// File name searched for during discovery
pub const CONFIG_FILE_NAME: &str = "factory.toml";

/// Configuration loading error
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ConfigError {
    /// File I/O error
    #[error("Failed to read config: {0}")]
    Io(#[from] std::io::Error),
    /// TOML parsing error
    #[error("Failed to parse factory.toml: {0}")]
    Parse(#[from] toml::de::Error),
    /// Validation error
    #[error("Config validation failed:\n{}", .0.iter().map(|e| format!("  - {}", e)).collect::<Vec<_>>().join("\n"))]
    Validation(Vec<String>),
    #[error("Theme '{name}' not found. Available themes: {}", .available.join(", "))]
    UnknownTheme { name: String, available: Vec<String> },
}

/// CLI arguments that can override config values
#[derive(Debug, Default, Clone)]
pub struct CliOverrides {
    pub output_dir: Option<PathBuf>,
    pub resolution: Option<u32>,
    pub theme: Option<String>,
    pub num_creatures: Option<usize>,
    pub num_variants: Option<u32>,
    pub frames_per_animation: Option<usize>,
    pub sheet_spacing: Option<u32>,
    pub preview_scale: Option<u32>,
}

/// Find factory.toml by walking up from the current working directory.
///
/// Search order:
/// 1. Walk up from current directory looking for factory.toml
/// 2. Check XDG_CONFIG_HOME/pixel-factory/factory.toml (or ~/.config/...)
pub fn find_config() -> Option<PathBuf> {
    if let Ok(cwd) = env::current_dir() {
        if let Some(path) = find_config_from(cwd) {
            return Some(path);
        }
    }

    find_xdg_config()
}

/// Find factory.toml in the XDG config directory.
pub fn find_xdg_config() -> Option<PathBuf> {
    let xdg_config = env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .or_else(|_| env::var("HOME").map(|h| PathBuf::from(h).join(".config")))
        .ok()?;

    let config_path = xdg_config.join("pixel-factory").join(CONFIG_FILE_NAME);
    config_path.exists().then_some(config_path)
}

/// Find factory.toml by walking up from a specific directory.
pub fn find_config_from(start: PathBuf) -> Option<PathBuf> {
    let mut current = start;

    loop {
        let config_path = current.join(CONFIG_FILE_NAME);
        if config_path.exists() {
            return Some(config_path);
        }

        if !current.pop() {
            return None;
        }
    }
}

/// Load configuration from a factory.toml file.
///
/// If a path is provided, loads from that file. Otherwise, uses
/// [`find_config`] to locate one. With no config file at all the built-in
/// defaults are returned.
///
/// ```ignore
/// let config = load_config(None)?;
/// let theme = config.theme(&config.defaults.theme)?;
/// ```
pub fn load_config(path: Option<&Path>) -> Result<FactoryConfig, ConfigError> {
    let config_path = match path {
        Some(p) => Some(p.to_path_buf()),
        None => find_config(),
    };

    match config_path {
        Some(p) => {
            log::debug!("loading config from {}", p.display());
            load_config_file(&p)
        }
        None => Ok(default_config()),
    }
}

/// Load configuration from a specific file path.
fn load_config_file(path: &Path) -> Result<FactoryConfig, ConfigError> {
    let contents = fs::read_to_string(path)?;
    parse_config(&contents)
}

/// Parse and validate configuration text.
pub fn parse_config(contents: &str) -> Result<FactoryConfig, ConfigError> {
    let config: FactoryConfig = toml::from_str(contents)?;

    let errors = config.validate();
    if !errors.is_empty() {
        return Err(ConfigError::Validation(errors.into_iter().map(|e| e.to_string()).collect()));
    }

    Ok(config)
}

/// Configuration used when no factory.toml is found.
///
/// Built-in themes only; the output directory honors
/// `PIXEL_FACTORY_OUTPUT_DIR`.
pub fn default_config() -> FactoryConfig {
    FactoryConfig { defaults: DefaultsConfig::default(), themes: Default::default() }
}

/// Merge CLI overrides into a configuration.
///
/// CLI arguments take precedence over config file values.
pub fn merge_cli_overrides(config: &mut FactoryConfig, overrides: &CliOverrides) {
    let defaults = &mut config.defaults;

    if let Some(ref dir) = overrides.output_dir {
        defaults.output_dir = dir.clone();
    }
    if let Some(ref theme) = overrides.theme {
        defaults.theme = theme.clone();
    }
    if let Some(resolution) = overrides.resolution {
        defaults.resolution = resolution;
    }
    if let Some(count) = overrides.num_creatures {
        defaults.num_creatures = count;
    }
    if let Some(variants) = overrides.num_variants {
        defaults.num_variants = variants;
    }
    if let Some(frames) = overrides.frames_per_animation {
        defaults.frames_per_animation = frames;
    }
    if let Some(spacing) = overrides.sheet_spacing {
        defaults.sheet_spacing = spacing;
    }
    if let Some(scale) = overrides.preview_scale {
        defaults.preview_scale = scale;
    }
}

impl FactoryConfig {
    /// Look up a resolved theme by name.
    pub fn theme(&self, name: &str) -> Result<ThemeConfig, ConfigError> {
        self.resolved_themes()
            .remove(name)
            .ok_or_else(|| ConfigError::UnknownTheme {
                name: name.to_string(),
                available: self.theme_names(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;
    use std::io::Write;
    use tempfile::TempDir;

    fn write_config(dir: &Path, contents: &[u8]) -> PathBuf {
        let config_path = dir.join(CONFIG_FILE_NAME);
        File::create(&config_path)
            .expect("should create config file")
            .write_all(contents)
            .expect("should write config content");
        config_path
    }

    #[test]
    fn test_find_config_in_current_dir() {
        let temp = TempDir::new().expect("should create temp dir");
        let config_path = write_config(temp.path(), b"[defaults]\nresolution = 16");

        let found = find_config_from(temp.path().to_path_buf());
        assert_eq!(found, Some(config_path));
    }

    #[test]
    fn test_find_config_in_parent_dir() {
        let temp = TempDir::new().expect("should create temp dir");
        let config_path = write_config(temp.path(), b"[defaults]\nresolution = 16");

        let subdir = temp.path().join("packs").join("forest");
        fs::create_dir_all(&subdir).expect("should create subdirectories");

        let found = find_config_from(subdir);
        assert_eq!(found, Some(config_path));
    }

    #[test]
    fn test_find_config_not_found() {
        let temp = TempDir::new().expect("should create temp dir");
        assert_eq!(find_config_from(temp.path().to_path_buf()), None);
    }

    #[test]
    fn test_load_config_from_file() {
        let temp = TempDir::new().expect("should create temp dir");
        let config_path = write_config(
            temp.path(),
            br##"
[defaults]
resolution = 16
num_creatures = 3
theme = "ocean_creatures"

[themes.lava]
base_description = "molten rock creature"
mood_adjectives = ["fierce"]
base_color = "#ff5722"
"##,
        );

        let config = load_config(Some(&config_path)).expect("should load valid config");
        assert_eq!(config.defaults.resolution, 16);
        assert_eq!(config.defaults.num_creatures, 3);
        assert_eq!(config.defaults.theme, "ocean_creatures");
        assert!(config.themes.contains_key("lava"));

        let lava = config.theme("lava").expect("should resolve configured theme");
        assert_eq!(lava.base_color, image::Rgba([0xff, 0x57, 0x22, 255]));
    }

    #[test]
    fn test_load_config_missing_file() {
        let temp = TempDir::new().expect("should create temp dir");
        let result = load_config(Some(&temp.path().join("nonexistent.toml")));
        assert!(matches!(result, Err(ConfigError::Io(_))));
    }

    #[test]
    fn test_load_config_invalid_toml() {
        let temp = TempDir::new().expect("should create temp dir");
        let config_path = write_config(temp.path(), b"this is not valid toml {{{");

        let result = load_config(Some(&config_path));
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_load_config_validation_error() {
        let temp = TempDir::new().expect("should create temp dir");
        let config_path = write_config(temp.path(), b"[defaults]\nresolution = 2\nnum_variants = 0\n");

        match load_config(Some(&config_path)) {
            Err(ConfigError::Validation(errors)) => assert_eq!(errors.len(), 2),
            other => panic!("expected validation error, got {:?}", other),
        }
    }

    #[test]
    fn test_unknown_theme_lists_available() {
        let config = default_config();
        let err = config.theme("space_pirates").unwrap_err();
        let message = err.to_string();
        assert!(message.contains("space_pirates"));
        assert!(message.contains("cute_forest"));
        assert!(message.contains("robot_aliens"));
    }

    #[test]
    fn test_default_config() {
        let config = default_config();
        assert!(config.is_valid());
        assert_eq!(config.theme_names().len(), 4);
        assert!(config.theme("dark_dungeon").is_ok());
    }

    #[test]
    fn test_merge_cli_overrides_single() {
        let mut config = default_config();
        let overrides = CliOverrides { resolution: Some(64), ..Default::default() };

        merge_cli_overrides(&mut config, &overrides);
        assert_eq!(config.defaults.resolution, 64);
        assert_eq!(config.defaults.num_creatures, 10);
    }

    #[test]
    fn test_merge_cli_overrides_multiple() {
        let mut config = default_config();
        let overrides = CliOverrides {
            output_dir: Some(PathBuf::from("dist")),
            theme: Some("robot_aliens".to_string()),
            num_creatures: Some(2),
            num_variants: Some(5),
            frames_per_animation: Some(6),
            sheet_spacing: Some(1),
            preview_scale: Some(2),
            ..Default::default()
        };

        merge_cli_overrides(&mut config, &overrides);
        let defaults = &config.defaults;
        assert_eq!(defaults.output_dir, PathBuf::from("dist"));
        assert_eq!(defaults.theme, "robot_aliens");
        assert_eq!(defaults.num_creatures, 2);
        assert_eq!(defaults.num_variants, 5);
        assert_eq!(defaults.frames_per_animation, 6);
        assert_eq!(defaults.sheet_spacing, 1);
        assert_eq!(defaults.preview_scale, 2);
        assert!(config.is_valid());
    }
}
