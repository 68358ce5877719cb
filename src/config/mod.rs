//! Configuration for pixel-factory
//!
//! `factory.toml` supplies generation defaults and extra themes; the four
//! built-in themes are always available and can be overridden by name.

pub mod loader;
pub mod schema;
mod themes;

pub use loader::*;
pub use schema::*;
pub use themes::{builtin_themes, BUILTIN_THEME_NAMES};
