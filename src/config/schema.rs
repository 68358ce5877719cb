//! Configuration schema types for `factory.toml`
//!
//! Defines the structure and validation rules for generation defaults and
//! user-defined themes.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::env;
use std::path::PathBuf;

use super::themes::builtin_themes;
use crate::color::{parse_color, ColorError};
use crate::generator::MIN_RESOLUTION;
use crate::models::ThemeConfig;

/// Environment variable that overrides the default output directory
pub const OUTPUT_DIR_ENV: &str = "PIXEL_FACTORY_OUTPUT_DIR";

/// Default settings for pack generation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DefaultsConfig {
    /// Root directory packs are written under
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
    /// Square sprite size in pixels
    #[serde(default = "default_resolution")]
    pub resolution: u32,
    /// Theme used when none is given on the command line
    #[serde(default = "default_theme")]
    pub theme: String,
    #[serde(default = "default_num_creatures")]
    pub num_creatures: usize,
    /// Color variants per creature, including the base
    #[serde(default = "default_num_variants")]
    pub num_variants: u32,
    #[serde(default = "default_frames_per_animation")]
    pub frames_per_animation: usize,
    /// Pixels between cells in sprite sheets
    #[serde(default)]
    pub sheet_spacing: u32,
    /// Upscale factor for the pack preview image
    #[serde(default = "default_preview_scale")]
    pub preview_scale: u32,
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            output_dir: default_output_dir(),
            resolution: default_resolution(),
            theme: default_theme(),
            num_creatures: default_num_creatures(),
            num_variants: default_num_variants(),
            frames_per_animation: default_frames_per_animation(),
            sheet_spacing: 0,
            preview_scale: default_preview_scale(),
        }
    }
}

fn default_output_dir() -> PathBuf {
    output_dir_or(env::var(OUTPUT_DIR_ENV).ok())
}

/// Output directory from an optional environment value, falling back to `output`.
pub(crate) fn output_dir_or(value: Option<String>) -> PathBuf {
    match value {
        Some(dir) if !dir.trim().is_empty() => PathBuf::from(dir),
        _ => PathBuf::from("output"),
    }
}

fn default_resolution() -> u32 {
    32
}

fn default_theme() -> String {
    "cute_forest".to_string()
}

fn default_num_creatures() -> usize {
    10
}

fn default_num_variants() -> u32 {
    2
}

fn default_frames_per_animation() -> usize {
    crate::models::DEFAULT_FRAMES_PER_ANIMATION
}

fn default_preview_scale() -> u32 {
    8
}

/// A theme as written in `factory.toml`. Colors are still strings here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThemeEntry {
    #[serde(default)]
    pub description: String,
    pub base_description: String,
    #[serde(default)]
    pub mood_adjectives: Vec<String>,
    #[serde(default)]
    pub color_palette_hints: Vec<String>,
    #[serde(default = "default_background_color")]
    pub background_color: String,
    #[serde(default = "default_base_color")]
    pub base_color: String,
}

fn default_background_color() -> String {
    "#1a1a1a".to_string()
}

fn default_base_color() -> String {
    "#ff7043".to_string()
}

impl ThemeEntry {
    /// Parse the entry's colors and produce a [`ThemeConfig`] named `name`.
    pub fn resolve(&self, name: &str) -> Result<ThemeConfig, ColorError> {
        Ok(ThemeConfig {
            name: name.to_string(),
            description: self.description.clone(),
            base_description: self.base_description.clone(),
            mood_adjectives: self.mood_adjectives.clone(),
            color_palette_hints: self.color_palette_hints.clone(),
            background_color: parse_color(&self.background_color)?,
            base_color: parse_color(&self.base_color)?,
        })
    }
}

/// Complete factory.toml configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FactoryConfig {
    #[serde(default)]
    pub defaults: DefaultsConfig,
    /// Extra or overriding themes, keyed by theme name
    #[serde(default)]
    pub themes: BTreeMap<String, ThemeEntry>,
}

/// Configuration validation error
#[derive(Debug, Clone)]
pub struct ConfigValidationError {
    /// Path to the invalid field (e.g., "themes.swamp.base_color")
    pub field: String,
    pub message: String,
}

impl std::fmt::Display for ConfigValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "factory.toml: '{}' {}", self.field, self.message)
    }
}

impl FactoryConfig {
    /// Validate the configuration and return any errors
    pub fn validate(&self) -> Vec<ConfigValidationError> {
        let mut errors = Vec::new();
        let mut push = |field: String, message: String| {
            errors.push(ConfigValidationError { field, message });
        };

        let defaults = &self.defaults;
        if defaults.resolution < MIN_RESOLUTION {
            push(
                "defaults.resolution".to_string(),
                format!("must be at least {}", MIN_RESOLUTION),
            );
        }
        for (field, value) in [
            ("defaults.num_creatures", defaults.num_creatures),
            ("defaults.num_variants", defaults.num_variants as usize),
            ("defaults.frames_per_animation", defaults.frames_per_animation),
            ("defaults.preview_scale", defaults.preview_scale as usize),
        ] {
            if value == 0 {
                push(field.to_string(), "must be a positive integer".to_string());
            }
        }

        for (name, entry) in &self.themes {
            if name.trim().is_empty() {
                push("themes".to_string(), "theme names must be non-empty".to_string());
            }
            if entry.base_description.trim().is_empty() {
                push(
                    format!("themes.{}.base_description", name),
                    "must be a non-empty string".to_string(),
                );
            }
            for (field, value) in
                [("background_color", &entry.background_color), ("base_color", &entry.base_color)]
            {
                if let Err(e) = parse_color(value) {
                    push(format!("themes.{}.{}", name, field), format!("is not a color: {}", e));
                }
            }
        }

        if !self.theme_names().contains(&defaults.theme) {
            push("defaults.theme".to_string(), format!("unknown theme '{}'", defaults.theme));
        }

        errors
    }

    /// Check if validation passed
    pub fn is_valid(&self) -> bool {
        self.validate().is_empty()
    }

    /// All theme names, built-in and configured, sorted.
    pub fn theme_names(&self) -> Vec<String> {
        let mut names: Vec<String> = builtin_themes().into_keys().collect();
        for name in self.themes.keys() {
            if !names.contains(name) {
                names.push(name.clone());
            }
        }
        names.sort();
        names
    }

    /// Built-in themes with configured themes layered on top.
    ///
    /// Entries whose colors do not parse are skipped; [`validate`](Self::validate)
    /// reports them.
    pub fn resolved_themes(&self) -> BTreeMap<String, ThemeConfig> {
        let mut themes = builtin_themes();
        for (name, entry) in &self.themes {
            if let Ok(theme) = entry.resolve(name) {
                themes.insert(name.clone(), theme);
            }
        }
        themes
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_config_parse() {
        let config: FactoryConfig = toml::from_str("").unwrap();
        assert_eq!(config.defaults.resolution, 32);
        assert_eq!(config.defaults.theme, "cute_forest");
        assert_eq!(config.defaults.num_creatures, 10);
        assert_eq!(config.defaults.num_variants, 2);
        assert_eq!(config.defaults.frames_per_animation, 4);
        assert_eq!(config.defaults.sheet_spacing, 0);
        assert_eq!(config.defaults.preview_scale, 8);
        assert!(config.themes.is_empty());
        assert!(config.is_valid());
    }

    #[test]
    fn test_full_config_parse() {
        let toml = r##"
[defaults]
output_dir = "packs"
resolution = 64
theme = "swamp"
num_creatures = 3
num_variants = 4
frames_per_animation = 6
sheet_spacing = 2
preview_scale = 4

[themes.swamp]
description = "Murky bog dwellers"
base_description = "slimy swamp creature"
mood_adjectives = ["grumpy", "slow"]
color_palette_hints = ["green and brown"]
background_color = "#203020"
base_color = "olive"
"##;
        let config: FactoryConfig = toml::from_str(toml).unwrap();
        assert_eq!(config.defaults.output_dir, PathBuf::from("packs"));
        assert_eq!(config.defaults.resolution, 64);
        assert_eq!(config.defaults.num_variants, 4);
        assert_eq!(config.defaults.sheet_spacing, 2);
        assert!(config.is_valid(), "{:?}", config.validate());

        let themes = config.resolved_themes();
        let swamp = &themes["swamp"];
        assert_eq!(swamp.base_color, image::Rgba([128, 128, 0, 255]));
        assert_eq!(swamp.background_color, image::Rgba([0x20, 0x30, 0x20, 255]));
        assert_eq!(themes.len(), 5);
    }

    #[test]
    fn test_theme_entry_defaults() {
        let toml = r#"
[themes.plain]
base_description = "plain creature"
"#;
        let config: FactoryConfig = toml::from_str(toml).unwrap();
        let entry = &config.themes["plain"];
        assert_eq!(entry.background_color, "#1a1a1a");
        assert!(entry.mood_adjectives.is_empty());
        assert!(entry.resolve("plain").is_ok());
    }

    #[test]
    fn test_override_builtin_theme() {
        let toml = r##"
[themes.cute_forest]
base_description = "tiny moss sprite"
base_color = "#00ff00"
"##;
        let config: FactoryConfig = toml::from_str(toml).unwrap();
        let themes = config.resolved_themes();
        assert_eq!(themes.len(), 4);
        assert_eq!(themes["cute_forest"].base_description, "tiny moss sprite");
        assert_eq!(themes["cute_forest"].base_color, image::Rgba([0, 255, 0, 255]));
    }

    #[test]
    fn test_validation_small_resolution() {
        let mut config = FactoryConfig::default();
        config.defaults.resolution = 4;
        let errors = config.validate();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].field, "defaults.resolution");
    }

    #[test]
    fn test_validation_zero_counts() {
        let mut config = FactoryConfig::default();
        config.defaults.num_creatures = 0;
        config.defaults.num_variants = 0;
        config.defaults.frames_per_animation = 0;
        config.defaults.preview_scale = 0;
        assert_eq!(config.validate().len(), 4);
    }

    #[test]
    fn test_validation_unknown_default_theme() {
        let mut config = FactoryConfig::default();
        config.defaults.theme = "nowhere".to_string();
        let errors = config.validate();
        assert_eq!(errors.len(), 1);
        assert!(errors[0].to_string().contains("nowhere"));
    }

    #[test]
    fn test_validation_bad_theme_entry() {
        let toml = r#"
[themes.broken]
base_description = ""
base_color = "not-a-color"
"#;
        let config: FactoryConfig = toml::from_str(toml).unwrap();
        let fields: Vec<String> = config.validate().into_iter().map(|e| e.field).collect();
        assert!(fields.contains(&"themes.broken.base_description".to_string()));
        assert!(fields.contains(&"themes.broken.base_color".to_string()));
        assert!(!config.resolved_themes().contains_key("broken"));
    }

    #[test]
    fn test_theme_names_sorted_and_merged() {
        let toml = r#"
[themes.aardvark]
base_description = "digger"
"#;
        let config: FactoryConfig = toml::from_str(toml).unwrap();
        assert_eq!(
            config.theme_names(),
            vec!["aardvark", "cute_forest", "dark_dungeon", "ocean_creatures", "robot_aliens"]
        );
    }

    #[test]
    fn test_output_dir_fallback() {
        assert_eq!(output_dir_or(None), PathBuf::from("output"));
        assert_eq!(output_dir_or(Some("  ".to_string())), PathBuf::from("output"));
        assert_eq!(output_dir_or(Some("/tmp/packs".to_string())), PathBuf::from("/tmp/packs"));
    }
}
