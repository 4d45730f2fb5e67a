//! Widget configuration surface.
//!
//! Every knob has a default; user-supplied overrides merge on top,
//! field by field, so a host page only specifies what it changes.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Default webhook route.
pub const DEFAULT_ROUTE: &str = "general";

/// Default typewriter speed in milliseconds per character.
pub const DEFAULT_TYPING_INTERVAL_MS: u64 = 25;

/// Default apex domain allow-listed for CTA link extraction.
pub const DEFAULT_ALLOWED_DOMAIN: &str = "spanmor.com.au";

/// Which side of the page the widget docks to.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DockPosition {
    Left,
    #[default]
    Right,
}

/// Branding strings and images shown in the widget header and welcome.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Branding {
    pub title: String,
    pub subtitle: String,
    /// Fixed welcome message synthesized locally when a conversation
    /// starts; no network call is made for it.
    pub welcome_text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub logo_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar_url: Option<String>,
}

impl Default for Branding {
    fn default() -> Self {
        Self {
            title: "Chat with us".to_string(),
            subtitle: "We usually reply in a few minutes".to_string(),
            welcome_text: "Hi! How can we help you today?".to_string(),
            logo_url: None,
            avatar_url: None,
        }
    }
}

/// The four theme colors the widget uses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Theme {
    pub primary: String,
    pub secondary: String,
    pub background: String,
    pub text: String,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            primary: "#0f766e".to_string(),
            secondary: "#134e4a".to_string(),
            background: "#ffffff".to_string(),
            text: "#1f2937".to_string(),
        }
    }
}

/// A quick-reply shortcut: a short button label and the text it sends.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuickReply {
    pub label: String,
    pub text: String,
}

/// Full widget configuration with defaults for every field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct WidgetConfig {
    /// Route string forwarded in every webhook envelope.
    pub route: String,
    /// Typewriter speed, milliseconds per character (minimum 1).
    pub typing_interval_ms: u64,
    /// Apex domain allow-listed for CTA link extraction.
    pub allowed_domain: String,
    pub branding: Branding,
    pub theme: Theme,
    pub position: DockPosition,
    pub quick_replies: Vec<QuickReply>,
}

impl Default for WidgetConfig {
    fn default() -> Self {
        Self {
            route: DEFAULT_ROUTE.to_string(),
            typing_interval_ms: DEFAULT_TYPING_INTERVAL_MS,
            allowed_domain: DEFAULT_ALLOWED_DOMAIN.to_string(),
            branding: Branding::default(),
            theme: Theme::default(),
            position: DockPosition::default(),
            quick_replies: Vec::new(),
        }
    }
}

impl WidgetConfig {
    /// Typing interval clamped to at least one millisecond per character.
    pub fn typing_interval(&self) -> Duration {
        Duration::from_millis(self.typing_interval_ms.max(1))
    }
}

/// Partial configuration supplied by the host page.
///
/// Unset fields keep their defaults; set fields win.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct WidgetOverrides {
    pub route: Option<String>,
    pub typing_interval_ms: Option<u64>,
    pub allowed_domain: Option<String>,
    pub branding: Option<BrandingOverrides>,
    pub theme: Option<ThemeOverrides>,
    pub position: Option<DockPosition>,
    pub quick_replies: Option<Vec<QuickReply>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BrandingOverrides {
    pub title: Option<String>,
    pub subtitle: Option<String>,
    pub welcome_text: Option<String>,
    pub logo_url: Option<String>,
    pub avatar_url: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ThemeOverrides {
    pub primary: Option<String>,
    pub secondary: Option<String>,
    pub background: Option<String>,
    pub text: Option<String>,
}

impl WidgetOverrides {
    /// Merges these overrides on top of `base`.
    pub fn apply(self, mut base: WidgetConfig) -> WidgetConfig {
        if let Some(route) = self.route {
            base.route = route;
        }
        if let Some(interval) = self.typing_interval_ms {
            base.typing_interval_ms = interval.max(1);
        }
        if let Some(domain) = self.allowed_domain {
            base.allowed_domain = domain;
        }
        if let Some(branding) = self.branding {
            if let Some(title) = branding.title {
                base.branding.title = title;
            }
            if let Some(subtitle) = branding.subtitle {
                base.branding.subtitle = subtitle;
            }
            if let Some(welcome_text) = branding.welcome_text {
                base.branding.welcome_text = welcome_text;
            }
            if let Some(logo_url) = branding.logo_url {
                base.branding.logo_url = Some(logo_url);
            }
            if let Some(avatar_url) = branding.avatar_url {
                base.branding.avatar_url = Some(avatar_url);
            }
        }
        if let Some(theme) = self.theme {
            if let Some(primary) = theme.primary {
                base.theme.primary = primary;
            }
            if let Some(secondary) = theme.secondary {
                base.theme.secondary = secondary;
            }
            if let Some(background) = theme.background {
                base.theme.background = background;
            }
            if let Some(text) = theme.text {
                base.theme.text = text;
            }
        }
        if let Some(position) = self.position {
            base.position = position;
        }
        if let Some(quick_replies) = self.quick_replies {
            base.quick_replies = quick_replies;
        }
        base
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = WidgetConfig::default();
        assert_eq!(config.route, "general");
        assert_eq!(config.typing_interval_ms, DEFAULT_TYPING_INTERVAL_MS);
        assert_eq!(config.position, DockPosition::Right);
        assert!(config.quick_replies.is_empty());
    }

    #[test]
    fn test_typing_interval_clamped_to_one_ms() {
        let config = WidgetConfig {
            typing_interval_ms: 0,
            ..WidgetConfig::default()
        };
        assert_eq!(config.typing_interval(), Duration::from_millis(1));
    }

    #[test]
    fn test_overrides_merge_under_defaults() {
        let overrides: WidgetOverrides = serde_json::from_str(
            r#"{
                "route": "quotes",
                "branding": { "title": "Spanmor Decking" },
                "position": "left"
            }"#,
        )
        .unwrap();

        let config = overrides.apply(WidgetConfig::default());
        assert_eq!(config.route, "quotes");
        assert_eq!(config.branding.title, "Spanmor Decking");
        // Unset fields keep defaults.
        assert_eq!(config.branding.welcome_text, "Hi! How can we help you today?");
        assert_eq!(config.position, DockPosition::Left);
        assert_eq!(config.theme, Theme::default());
    }

    #[test]
    fn test_quick_replies_deserialize_camel_case() {
        let overrides: WidgetOverrides = serde_json::from_str(
            r#"{ "quickReplies": [ { "label": "Get a quote", "text": "I need a quote" } ] }"#,
        )
        .unwrap();
        let config = overrides.apply(WidgetConfig::default());
        assert_eq!(config.quick_replies.len(), 1);
        assert_eq!(config.quick_replies[0].text, "I need a quote");
    }
}
