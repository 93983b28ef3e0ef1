//! Map a [`StyleProfile`] onto design-system kit settings.
//!
//! This only builds the settings object a kit would be updated with. It
//! never persists anything.

use crate::sizes::css_selector;
use crate::types::{ColorRole, StyleProfile};
use serde_json::{json, Map, Value};
use std::hash::Hasher;

/// Kit settings keyed by setting name.
pub type KitSettings = Map<String, Value>;

/// Ranked colors beyond the role colors become custom colors, up to this.
pub const MAX_CUSTOM_COLORS: usize = 6;

/// Build kit settings from a profile. Errored profiles map to nothing.
pub fn build_kit_settings(profile: &StyleProfile) -> KitSettings {
    let mut settings = KitSettings::new();
    if !profile.is_actionable() {
        return settings;
    }

    let mut role_colors: Vec<String> = Vec::new();
    for (index, role) in ColorRole::ALL.into_iter().enumerate() {
        let color = profile
            .labeled_colors
            .get(role)
            .or_else(|| profile.colors.get(index).map(String::as_str));
        if let Some(color) = color {
            settings.insert(
                format!("global_colors-{}", role.as_str()),
                json!({ "color": color }),
            );
            role_colors.push(color.to_ascii_lowercase());
        }
    }

    let custom: Vec<Value> = profile
        .colors
        .iter()
        .filter(|c| !role_colors.contains(&c.to_ascii_lowercase()))
        .take(MAX_CUSTOM_COLORS)
        .enumerate()
        .map(|(i, color)| {
            json!({
                "_id": custom_color_id(color),
                "title": format!("Custom Color {}", i + 1),
                "color": color,
            })
        })
        .collect();
    if !custom.is_empty() {
        settings.insert("custom_colors".to_string(), Value::Array(custom));
    }

    let typography = [
        (0, "primary"),
        (0, "text"),
        (1, "secondary"),
        (2, "accent"),
    ];
    for (index, slot) in typography {
        if let Some(font) = profile.fonts.get(index) {
            settings.insert(
                format!("global_typography-{slot}_typography_font_family"),
                Value::String(font.clone()),
            );
        }
    }

    let rules: Vec<String> = profile
        .font_sizes
        .iter_set()
        .map(|(role, size)| format!("{} {{ font-size: {size}; }}", css_selector(role)))
        .collect();
    if !rules.is_empty() {
        settings.insert("custom_css".to_string(), Value::String(rules.join("\n")));
    }

    settings
}

/// Stable 8-hex-char id for a custom color.
fn custom_color_id(color: &str) -> String {
    let mut hasher = fnv::FnvHasher::default();
    hasher.write(color.to_ascii_lowercase().as_bytes());
    format!("{:016x}", hasher.finish())[..8].to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{FontSizes, LabeledColors};

    fn profile() -> StyleProfile {
        StyleProfile {
            colors: ["#ffffff", "#222222", "#ff6600", "#0077cc", "#eeeeee", "#00aa55"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            labeled_colors: LabeledColors {
                primary: Some("#0077cc".to_string()),
                secondary: Some("#ffffff".to_string()),
                text: Some("#222222".to_string()),
                accent: Some("#ff6600".to_string()),
            },
            fonts: vec!["Inter".to_string(), "Lora".to_string()],
            font_sizes: FontSizes {
                base: Some("16px".to_string()),
                h1: Some("2rem".to_string()),
                ..Default::default()
            },
            error: None,
        }
    }

    #[test]
    fn test_role_colors_from_labels() {
        let settings = build_kit_settings(&profile());
        assert_eq!(settings["global_colors-primary"]["color"], "#0077cc");
        assert_eq!(settings["global_colors-text"]["color"], "#222222");
        assert_eq!(settings["global_colors-accent"]["color"], "#ff6600");
    }

    #[test]
    fn test_role_colors_fall_back_to_rank_position() {
        let mut p = profile();
        p.labeled_colors = LabeledColors::default();
        let settings = build_kit_settings(&p);
        assert_eq!(settings["global_colors-primary"]["color"], "#ffffff");
        assert_eq!(settings["global_colors-accent"]["color"], "#0077cc");
    }

    #[test]
    fn test_custom_colors_exclude_role_colors() {
        let settings = build_kit_settings(&profile());
        let custom = settings["custom_colors"].as_array().unwrap();
        let colors: Vec<&str> = custom.iter().map(|c| c["color"].as_str().unwrap()).collect();
        assert_eq!(colors, vec!["#eeeeee", "#00aa55"]);
        assert_eq!(custom[0]["title"], "Custom Color 1");
        assert_eq!(custom[0]["_id"].as_str().unwrap().len(), 8);
        assert_eq!(custom[0]["_id"], custom_color_id("#EEEEEE"));
    }

    #[test]
    fn test_typography_and_css() {
        let settings = build_kit_settings(&profile());
        assert_eq!(settings["global_typography-primary_typography_font_family"], "Inter");
        assert_eq!(settings["global_typography-text_typography_font_family"], "Inter");
        assert_eq!(settings["global_typography-secondary_typography_font_family"], "Lora");
        assert!(!settings.contains_key("global_typography-accent_typography_font_family"));
        assert_eq!(
            settings["custom_css"],
            "body { font-size: 16px; }\nh1 { font-size: 2rem; }"
        );
    }

    #[test]
    fn test_errored_profile_maps_to_nothing() {
        let p = StyleProfile {
            error: Some("HTTP 500".to_string()),
            ..Default::default()
        };
        assert!(build_kit_settings(&p).is_empty());
    }
}
