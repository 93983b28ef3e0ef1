//! JSON envelope printed by `style-scout analyze`.

use serde::Serialize;
use style_scout::{build_kit_settings, KitSettings, StyleProfile};

#[derive(Debug, Serialize)]
pub struct AnalyzeResponse {
    pub ok: bool,
    pub analysis: StyleProfile,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub preview: Option<KitSettings>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl AnalyzeResponse {
    /// Wrap a finished profile. A failed profile carries its error as the
    /// message and never gets a preview.
    pub fn from_profile(analysis: StyleProfile, with_preview: bool) -> Self {
        match analysis.error.clone() {
            Some(message) => Self {
                ok: false,
                analysis,
                preview: None,
                message: Some(message),
            },
            None => {
                let preview = with_preview.then(|| build_kit_settings(&analysis));
                Self {
                    ok: true,
                    analysis,
                    preview,
                    message: None,
                }
            }
        }
    }

    pub fn to_json(&self, compact: bool) -> serde_json::Result<String> {
        if compact {
            serde_json::to_string(self)
        } else {
            serde_json::to_string_pretty(self)
        }
    }
}
