//! # rp-ui
//!
//! Presentation settings for the dashboard shell.

pub mod theme;

pub use theme::{Theme, ThemeColors, ThemePreferences, ThemeStylesheet, THEME_KEY};
