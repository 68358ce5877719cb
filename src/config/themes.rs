//! Built-in themes

use image::Rgba;
use std::collections::BTreeMap;

use crate::models::ThemeConfig;

/// Names of the themes that ship with the binary.
pub const BUILTIN_THEME_NAMES: [&str; 4] =
    ["cute_forest", "dark_dungeon", "robot_aliens", "ocean_creatures"];

fn words(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

fn theme(
    name: &str,
    description: &str,
    base_description: &str,
    moods: &[&str],
    hints: &[&str],
    background: [u8; 3],
    base: [u8; 3],
) -> ThemeConfig {
    ThemeConfig {
        name: name.to_string(),
        description: description.to_string(),
        base_description: base_description.to_string(),
        mood_adjectives: words(moods),
        color_palette_hints: words(hints),
        background_color: Rgba([background[0], background[1], background[2], 255]),
        base_color: Rgba([base[0], base[1], base[2], 255]),
    }
}

/// The built-in themes keyed by name.
pub fn builtin_themes() -> BTreeMap<String, ThemeConfig> {
    [
        theme(
            "cute_forest",
            "Adorable forest creatures",
            "cute small forest animal creature",
            &["friendly", "cheerful", "playful", "curious", "happy"],
            &["green and brown", "orange and yellow", "blue and white", "pink and purple", "red and brown"],
            [0x2d, 0x50, 0x16],
            [0x8b, 0xc3, 0x4a],
        ),
        theme(
            "dark_dungeon",
            "Menacing dungeon monsters",
            "dark dungeon monster creature",
            &["menacing", "sinister", "aggressive", "fierce", "intimidating"],
            &["dark purple and black", "red and black", "green and brown", "gray and dark blue", "brown and orange"],
            [0x1a, 0x0d, 0x1a],
            [0x7b, 0x1f, 0xa2],
        ),
        theme(
            "robot_aliens",
            "Robotic alien beings",
            "small robot alien creature",
            &["mechanical", "futuristic", "sleek", "advanced", "technological"],
            &["silver and blue", "gold and red", "green and black", "cyan and white", "purple and pink"],
            [0x0d, 0x1a, 0x26],
            [0x02, 0x88, 0xd1],
        ),
        theme(
            "ocean_creatures",
            "Aquatic sea creatures",
            "small sea creature ocean animal",
            &["flowing", "graceful", "mysterious", "colorful", "peaceful"],
            &["blue and cyan", "orange and yellow", "purple and pink", "green and teal", "red and orange"],
            [0x0a, 0x24, 0x63],
            [0x26, 0xa6, 0x9a],
        ),
    ]
    .into_iter()
    .map(|t| (t.name.clone(), t))
    .collect()
}
