use std::sync::Arc;

use askama::Template;
use serde::{Deserialize, Serialize};
use tracing::warn;

use rp_core::KeyValueStore;

/// Store key holding the chosen theme as JSON.
pub const THEME_KEY: &str = "rusty_press_theme";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThemeColors {
    pub primary: String,
    pub secondary: String,
    pub accent: String,
    pub background: String,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Theme {
    pub name: String,
    pub colors: ThemeColors,
}

impl Theme {
    fn palette(name: &str, [primary, secondary, accent, background, text]: [&str; 5]) -> Self {
        Self {
            name: name.into(),
            colors: ThemeColors {
                primary: primary.into(),
                secondary: secondary.into(),
                accent: accent.into(),
                background: background.into(),
                text: text.into(),
            },
        }
    }

    pub fn default_theme() -> Self {
        Self::palette("Default", ["#0073aa", "#23282d", "#ffb900", "#f1f1f1", "#23282d"])
    }

    pub fn dark() -> Self {
        Self::palette("Dark", ["#00a0d2", "#1a1a1a", "#ffd700", "#121212", "#ffffff"])
    }

    pub fn light() -> Self {
        Self::palette("Light", ["#2271b1", "#1d2327", "#ff6b6b", "#ffffff", "#1d2327"])
    }

    /// The built-in palettes, Default first.
    pub fn available() -> Vec<Theme> {
        vec![Self::default_theme(), Self::dark(), Self::light()]
    }

    pub fn stylesheet(&self) -> ThemeStylesheet<'_> {
        let c = &self.colors;
        ThemeStylesheet {
            vars: vec![
                ("primary", c.primary.as_str()),
                ("secondary", c.secondary.as_str()),
                ("accent", c.accent.as_str()),
                ("background", c.background.as_str()),
                ("text", c.text.as_str()),
            ],
        }
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::default_theme()
    }
}

/// CSS custom properties for a theme, one `--theme-<key>` per color.
#[derive(Template)]
#[template(
    source = ":root {
{%- for (key, value) in vars %}
  --theme-{{ key }}: {{ value }};
{%- endfor %}
}",
    ext = "css"
)]
pub struct ThemeStylesheet<'a> {
    pub vars: Vec<(&'static str, &'a str)>,
}

/// The persisted theme choice, kept in the same store as the collections.
#[derive(Clone)]
pub struct ThemePreferences {
    store: Arc<dyn KeyValueStore>,
}

impl ThemePreferences {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    /// The saved theme, or Default when none is saved or it cannot be read.
    pub async fn current(&self) -> Theme {
        match self.store.get_item(THEME_KEY).await {
            Ok(Some(raw)) => serde_json::from_str(&raw).unwrap_or_else(|err| {
                warn!(error = %err, "unreadable theme preference, using default");
                Theme::default()
            }),
            Ok(None) => Theme::default(),
            Err(err) => {
                warn!(error = %err, "theme preference unavailable, using default");
                Theme::default()
            }
        }
    }

    pub async fn set(&self, theme: &Theme) -> anyhow::Result<()> {
        let raw = serde_json::to_string(theme)?;
        self.store.set_item(THEME_KEY, &raw).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rp_core::MockKeyValueStore;
    use std::sync::Mutex;

    #[test]
    fn stylesheet_lists_every_color() {
        let css = Theme::dark().stylesheet().render().unwrap();
        assert!(css.starts_with(":root {"));
        assert!(css.contains("--theme-primary: #00a0d2;"));
        assert!(css.contains("--theme-text: #ffffff;"));
        assert_eq!(css.matches("--theme-").count(), 5);
    }

    #[tokio::test]
    async fn garbage_preference_falls_back_to_default() {
        let mut store = MockKeyValueStore::new();
        store
            .expect_get_item()
            .returning(|_| Ok(Some("{not a theme".to_string())));
        let prefs = ThemePreferences::new(Arc::new(store));

        assert_eq!(prefs.current().await, Theme::default_theme());
    }

    #[tokio::test]
    async fn saved_theme_is_read_back() {
        let saved = Arc::new(Mutex::new(None::<String>));
        let mut store = MockKeyValueStore::new();
        let sink = Arc::clone(&saved);
        store.expect_set_item().returning(move |key, value| {
            assert_eq!(key, THEME_KEY);
            *sink.lock().unwrap() = Some(value.to_string());
            Ok(())
        });
        let source = Arc::clone(&saved);
        store
            .expect_get_item()
            .returning(move |_| Ok(source.lock().unwrap().clone()));
        let prefs = ThemePreferences::new(Arc::new(store));

        prefs.set(&Theme::light()).await.unwrap();
        assert_eq!(prefs.current().await.name, "Light");
    }
}
