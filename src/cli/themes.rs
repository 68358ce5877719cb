//! Themes command implementation

use std::path::Path;
use std::process::ExitCode;

use crate::color::to_hex;

use super::{load_factory_config, EXIT_SUCCESS};

/// How many moods and color hints to show per theme
const PREVIEW_ITEMS: usize = 3;

/// Execute the themes command
pub fn run_themes(config: Option<&Path>) -> ExitCode {
    let config = match load_factory_config(config) {
        Ok(config) => config,
        Err(code) => return code,
    };

    println!("Available Themes:");
    for (name, theme) in config.resolved_themes() {
        let marker = if name == config.defaults.theme { " (default)" } else { "" };
        println!();
        println!("{}{}", name, marker);
        println!("  Description: {}", theme.description);
        println!("  Base:        {}", theme.base_description);
        println!("  Moods:       {}", first_items(&theme.mood_adjectives));
        println!("  Colors:      {}", first_items(&theme.color_palette_hints));
        println!("  Base color:  {}", to_hex(theme.base_color));
    }

    ExitCode::from(EXIT_SUCCESS)
}

fn first_items(items: &[String]) -> String {
    items.iter().take(PREVIEW_ITEMS).cloned().collect::<Vec<_>>().join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_items() {
        let items: Vec<String> = ["a", "b", "c", "d"].iter().map(|s| s.to_string()).collect();
        assert_eq!(first_items(&items), "a, b, c");
        assert_eq!(first_items(&items[..1]), "a");
        assert_eq!(first_items(&[]), "");
    }
}
