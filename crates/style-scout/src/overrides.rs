//! Caller-supplied corrections merged into a finished profile.

use crate::color::parse_color;
use crate::sizes::is_valid_font_size;
use crate::types::{ColorRole, SizeRole, StyleProfile};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::warn;

/// Maximum fonts a profile carries after overrides.
const MAX_FONTS: usize = 3;

/// Manual overrides for a profile, typically edited by a person after
/// previewing the automatic result.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProfileOverrides {
    pub labeled_colors: BTreeMap<ColorRole, String>,
    pub font_sizes: BTreeMap<SizeRole, String>,
    /// Families placed ahead of the detected ones.
    pub fonts: Vec<String>,
}

impl ProfileOverrides {
    pub fn is_empty(&self) -> bool {
        self.labeled_colors.is_empty() && self.font_sizes.is_empty() && self.fonts.is_empty()
    }

    /// Merge into `profile`. Errored profiles are returned untouched.
    ///
    /// Colors are stored as canonical hex and sizes must pass the font-size
    /// whitelist; anything else is skipped with a warning.
    pub fn apply(&self, mut profile: StyleProfile) -> StyleProfile {
        if !profile.is_actionable() {
            return profile;
        }

        for (role, value) in &self.labeled_colors {
            match parse_color(value) {
                Some(rgb) => profile.labeled_colors.set(*role, Some(rgb.to_hex())),
                None => warn!("ignoring {} color override '{value}'", role.as_str()),
            }
        }

        for (role, value) in &self.font_sizes {
            let value = value.trim();
            if is_valid_font_size(value) {
                profile.font_sizes.set(*role, Some(value.to_string()));
            } else {
                warn!("ignoring {} font-size override '{value}'", role.as_str());
            }
        }

        if !self.fonts.is_empty() {
            let mut fonts: Vec<String> = Vec::new();
            for font in self.fonts.iter().map(|f| f.trim()).chain(profile.fonts.iter().map(String::as_str)) {
                if !font.is_empty() && !fonts.iter().any(|f| f == font) {
                    fonts.push(font.to_string());
                }
            }
            fonts.truncate(MAX_FONTS);
            profile.fonts = fonts;
        }

        profile
    }
}
