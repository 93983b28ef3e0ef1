//! Core data types for style profiles.

use serde::{Deserialize, Serialize};

/// A semantic slot a color can be assigned to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorRole {
    Primary,
    Secondary,
    Text,
    Accent,
}

impl ColorRole {
    /// All roles in kit order.
    pub const ALL: [ColorRole; 4] = [
        ColorRole::Primary,
        ColorRole::Secondary,
        ColorRole::Text,
        ColorRole::Accent,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ColorRole::Primary => "primary",
            ColorRole::Secondary => "secondary",
            ColorRole::Text => "text",
            ColorRole::Accent => "accent",
        }
    }
}

/// A typography slot a font size can be assigned to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SizeRole {
    Base,
    H1,
    H2,
    H3,
    H4,
    H5,
    H6,
    Cta,
}

impl SizeRole {
    pub const ALL: [SizeRole; 8] = [
        SizeRole::Base,
        SizeRole::H1,
        SizeRole::H2,
        SizeRole::H3,
        SizeRole::H4,
        SizeRole::H5,
        SizeRole::H6,
        SizeRole::Cta,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            SizeRole::Base => "base",
            SizeRole::H1 => "h1",
            SizeRole::H2 => "h2",
            SizeRole::H3 => "h3",
            SizeRole::H4 => "h4",
            SizeRole::H5 => "h5",
            SizeRole::H6 => "h6",
            SizeRole::Cta => "cta",
        }
    }

    /// Heading role for a level in `1..=6`.
    pub fn heading(level: u8) -> Option<SizeRole> {
        match level {
            1 => Some(SizeRole::H1),
            2 => Some(SizeRole::H2),
            3 => Some(SizeRole::H3),
            4 => Some(SizeRole::H4),
            5 => Some(SizeRole::H5),
            6 => Some(SizeRole::H6),
            _ => None,
        }
    }
}

/// Colors assigned to semantic roles. Any role may be unset.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LabeledColors {
    pub primary: Option<String>,
    pub secondary: Option<String>,
    pub text: Option<String>,
    pub accent: Option<String>,
}

impl LabeledColors {
    pub fn get(&self, role: ColorRole) -> Option<&str> {
        match role {
            ColorRole::Primary => self.primary.as_deref(),
            ColorRole::Secondary => self.secondary.as_deref(),
            ColorRole::Text => self.text.as_deref(),
            ColorRole::Accent => self.accent.as_deref(),
        }
    }

    pub fn set(&mut self, role: ColorRole, value: Option<String>) {
        let slot = match role {
            ColorRole::Primary => &mut self.primary,
            ColorRole::Secondary => &mut self.secondary,
            ColorRole::Text => &mut self.text,
            ColorRole::Accent => &mut self.accent,
        };
        *slot = value;
    }

    /// Whether `color` is already assigned to any role (case-insensitive).
    pub fn contains(&self, color: &str) -> bool {
        ColorRole::ALL
            .iter()
            .filter_map(|role| self.get(*role))
            .any(|assigned| assigned.eq_ignore_ascii_case(color))
    }
}

/// Raw CSS font-size values keyed by typography slot.
///
/// Serialized with every key present so consumers see `null` for slots
/// the page never declared.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FontSizes {
    pub base: Option<String>,
    pub h1: Option<String>,
    pub h2: Option<String>,
    pub h3: Option<String>,
    pub h4: Option<String>,
    pub h5: Option<String>,
    pub h6: Option<String>,
    pub cta: Option<String>,
}

impl FontSizes {
    pub fn get(&self, role: SizeRole) -> Option<&str> {
        match role {
            SizeRole::Base => self.base.as_deref(),
            SizeRole::H1 => self.h1.as_deref(),
            SizeRole::H2 => self.h2.as_deref(),
            SizeRole::H3 => self.h3.as_deref(),
            SizeRole::H4 => self.h4.as_deref(),
            SizeRole::H5 => self.h5.as_deref(),
            SizeRole::H6 => self.h6.as_deref(),
            SizeRole::Cta => self.cta.as_deref(),
        }
    }

    pub fn set(&mut self, role: SizeRole, value: Option<String>) {
        let slot = match role {
            SizeRole::Base => &mut self.base,
            SizeRole::H1 => &mut self.h1,
            SizeRole::H2 => &mut self.h2,
            SizeRole::H3 => &mut self.h3,
            SizeRole::H4 => &mut self.h4,
            SizeRole::H5 => &mut self.h5,
            SizeRole::H6 => &mut self.h6,
            SizeRole::Cta => &mut self.cta,
        };
        *slot = value;
    }

    /// Iterate over the slots that carry a value, in role order.
    pub fn iter_set(&self) -> impl Iterator<Item = (SizeRole, &str)> + '_ {
        SizeRole::ALL
            .into_iter()
            .filter_map(move |role| self.get(role).map(|value| (role, value)))
    }
}

/// The result of analyzing one web page.
///
/// When `error` is set every other field is empty and the profile is
/// not actionable.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StyleProfile {
    /// Canonical `#rrggbb` colors, most representative first.
    pub colors: Vec<String>,
    pub labeled_colors: LabeledColors,
    /// Font family names, most frequent first.
    pub fonts: Vec<String>,
    pub font_sizes: FontSizes,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl StyleProfile {
    /// Build the empty, non-actionable profile for a failed analysis.
    pub fn failed(err: &AnalyzeError) -> Self {
        Self {
            error: Some(err.to_string()),
            ..Self::default()
        }
    }

    pub fn is_actionable(&self) -> bool {
        self.error.is_none()
    }
}

/// Errors that abort an analysis.
#[derive(thiserror::Error, Debug)]
pub enum AnalyzeError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Fetch failed: {0}")]
    FetchFailure(String),

    #[error("HTTP {0}")]
    HttpError(u16),

    #[error("Unsupported content-type: {0}")]
    UnsupportedContentType(String),

    #[error("Unexpected error while analyzing page")]
    Unexpected,
}

/// Convenience result type.
pub type AnalyzeResult<T> = Result<T, AnalyzeError>;
