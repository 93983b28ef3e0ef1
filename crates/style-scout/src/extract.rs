//! Regex-based style signal extraction from raw HTML and CSS text.
//!
//! This is a best-effort heuristic scan, not a CSS parser. Untrusted pages
//! are full of minor non-conformance, so every pattern degrades to "no
//! match" rather than failing the analysis.

use crate::types::{FontSizes, SizeRole};
use fnv::FnvHashMap;
use regex::Regex;
use std::sync::OnceLock;

/// Everything the extractor pulls from one corpus.
#[derive(Debug, Clone, Default)]
pub struct Signals {
    /// Lowercased color literals in first-seen order.
    pub colors: Vec<String>,
    /// Font family names, one per declaration or Google Fonts link.
    pub fonts: Vec<String>,
    /// First raw `font-size` value per selector slot, unvalidated.
    pub font_sizes: FontSizes,
    pub css_vars: CssVars,
    /// Raw `body` background value, with one level of `var()` resolved.
    pub background: Option<String>,
}

/// CSS custom properties, split by what their value looks like.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CssVars {
    /// `(name, value)` pairs whose value is a color literal.
    pub colors: Vec<(String, String)>,
    /// `(name, value)` pairs whose value is a length or size function.
    pub sizes: Vec<(String, String)>,
}

/// How a custom property value was classified.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VarKind {
    Color,
    Size,
}

/// Custom property values by name, first definition wins.
pub type CustomProperties = FnvHashMap<String, String>;

/// Scan a corpus for every style signal.
pub fn extract(corpus: &str) -> Signals {
    let mut font_sizes = FontSizes::default();
    for role in SizeRole::ALL {
        font_sizes.set(role, extract_font_size(corpus, role));
    }
    let properties = custom_properties(corpus);

    Signals {
        colors: extract_colors(corpus),
        fonts: fonts_with(corpus, &properties),
        font_sizes,
        css_vars: extract_css_vars(corpus),
        background: body_background_with(corpus, &properties),
    }
}

fn color_literal_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(
            r"(?i)#(?:[0-9a-f]{3}){1,2}\b|rgba?\(\s*\d{1,3}%?\s*,\s*\d{1,3}%?\s*,\s*\d{1,3}%?(?:\s*,\s*(?:0|1|0?\.\d+|1\.0+|\d{1,3}%))?\s*\)",
        )
        .expect("color literal regex is valid")
    })
}

/// Hex and `rgb()`/`rgba()` literals, lowercased, in source order.
pub fn extract_colors(corpus: &str) -> Vec<String> {
    color_literal_re()
        .find_iter(corpus)
        .map(|m| m.as_str().to_ascii_lowercase())
        .collect()
}

fn font_family_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?i)font-family\s*:\s*([^;{}]+)[;}]").expect("font-family regex is valid")
    })
}

fn google_fonts_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r#"(?i)https?://fonts\.googleapis\.com/css2?\?family=([^"'&\s)<>]+)"#)
            .expect("google fonts regex is valid")
    })
}

/// Font family names from declarations and Google Fonts links.
///
/// Declarations contribute their first family. A `var(--x)` family is
/// resolved one level against the corpus; CSS-wide keywords are skipped.
pub fn extract_fonts(corpus: &str) -> Vec<String> {
    fonts_with(corpus, &custom_properties(corpus))
}

fn fonts_with(corpus: &str, properties: &CustomProperties) -> Vec<String> {
    let mut fonts = Vec::new();

    for caps in font_family_re().captures_iter(corpus) {
        let Some(value) = caps.get(1) else {
            continue;
        };
        let value = strip_important(value.as_str());
        let family = if value.starts_with("var(") {
            var_reference(value).and_then(|name| properties.get(name).cloned())
        } else {
            Some(value.to_string())
        };
        if let Some(name) = family.as_deref().and_then(first_family) {
            fonts.push(name);
        }
    }

    for caps in google_fonts_re().captures_iter(corpus) {
        let Some(family) = caps.get(1) else {
            continue;
        };
        let name = family.as_str().split(':').next().unwrap_or("");
        let name = name.replace('+', " ").replace("%20", " ");
        let name = name.trim();
        if !name.is_empty() {
            fonts.push(name.to_string());
        }
    }

    fonts
}

fn first_family(value: &str) -> Option<String> {
    let first = value.split(',').next()?;
    let name = first.trim_matches(|c: char| c.is_whitespace() || c == '"' || c == '\'');
    if name.is_empty() || name.starts_with("var(") {
        return None;
    }
    if matches!(
        name.to_ascii_lowercase().as_str(),
        "inherit" | "initial" | "unset" | "revert" | "revert-layer"
    ) {
        return None;
    }
    Some(name.to_string())
}

/// Selector alternatives that feed each font-size slot.
fn selector_pattern(role: SizeRole) -> &'static str {
    match role {
        SizeRole::Base => r"html|:root|body",
        SizeRole::H1 => "h1",
        SizeRole::H2 => "h2",
        SizeRole::H3 => "h3",
        SizeRole::H4 => "h4",
        SizeRole::H5 => "h5",
        SizeRole::H6 => "h6",
        SizeRole::Cta => r"button|\.btn|\.button|\.cta",
    }
}

/// Regex matching a declaration block whose selector list contains one of
/// `selectors`, capturing the first value of `property` inside it.
fn block_property_regex(selectors: &str, property: &str) -> Regex {
    let pattern = format!(
        r"(?i)(?:^|[\s,}}>])(?:{selectors})\s*(?:,[^{{}}]*)?\{{(?:[^}}]*?[;\s])?{property}\s*:\s*([^;}}]+)"
    );
    Regex::new(&pattern).expect("block property regex is valid")
}

fn font_size_regexes() -> &'static [(SizeRole, Regex)] {
    static RES: OnceLock<Vec<(SizeRole, Regex)>> = OnceLock::new();
    RES.get_or_init(|| {
        SizeRole::ALL
            .into_iter()
            .map(|role| (role, block_property_regex(selector_pattern(role), "font-size")))
            .collect()
    })
}

/// First raw `font-size` declared for the selectors behind `role`.
pub fn extract_font_size(corpus: &str, role: SizeRole) -> Option<String> {
    let (_, re) = font_size_regexes().iter().find(|(r, _)| *r == role)?;
    let caps = re.captures(corpus)?;
    let value = strip_important(caps.get(1)?.as_str());
    (!value.is_empty()).then(|| value.to_string())
}

fn custom_property_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(--[A-Za-z0-9_-]+)\s*:\s*([^;{}]+)[;}]").expect("custom property regex is valid")
    })
}

fn size_value_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(
            r"(?i)^(?:-?(?:\d+(?:\.\d+)?|\.\d+)(?:px|rem|em|%|pt|vw|vh|vmin|vmax|ch|ex)|(?:clamp|calc|var|min|max)\(.*\))$",
        )
        .expect("size value regex is valid")
    })
}

/// Classify a custom property value, or `None` if it is neither a color
/// nor a size.
pub fn classify_var_value(value: &str) -> Option<VarKind> {
    let lower = value.trim().to_ascii_lowercase();
    if lower.starts_with('#') || lower.starts_with("rgb") {
        return Some(VarKind::Color);
    }
    if size_value_re().is_match(&lower) {
        return Some(VarKind::Size);
    }
    None
}

/// Collect `--name: value` custom properties in source order.
pub fn extract_css_vars(corpus: &str) -> CssVars {
    let mut vars = CssVars::default();
    for caps in custom_property_re().captures_iter(corpus) {
        let (Some(name), Some(value)) = (caps.get(1), caps.get(2)) else {
            continue;
        };
        let value = strip_important(value.as_str());
        let entry = (name.as_str().to_string(), value.to_string());
        match classify_var_value(value) {
            Some(VarKind::Color) => vars.colors.push(entry),
            Some(VarKind::Size) => vars.sizes.push(entry),
            None => {}
        }
    }
    vars
}

fn body_background_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| block_property_regex("body", "background(?:-color)?"))
}

/// The `body` background declaration, resolving one level of `var()`.
///
/// An unresolvable reference comes back as the raw `var(...)` text.
pub fn resolve_body_background(corpus: &str) -> Option<String> {
    body_background_with(corpus, &custom_properties(corpus))
}

fn body_background_with(corpus: &str, properties: &CustomProperties) -> Option<String> {
    let caps = body_background_re().captures(corpus)?;
    let value = strip_important(caps.get(1)?.as_str());
    if value.is_empty() {
        return None;
    }
    if value.starts_with("var(") {
        if let Some(resolved) = var_reference(value).and_then(|name| properties.get(name)) {
            return Some(resolved.clone());
        }
    }
    Some(value.to_string())
}

fn var_reference_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^var\(\s*(--[A-Za-z0-9_-]+)").expect("var reference regex is valid")
    })
}

/// The property name inside a `var(--name ...)` reference.
fn var_reference(value: &str) -> Option<&str> {
    var_reference_re()
        .captures(value)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

/// Every custom property defined in the corpus, in one pass.
///
/// `--brand` only matches as a whole name, never inside `x--brand`.
pub fn custom_properties(corpus: &str) -> CustomProperties {
    let mut properties = CustomProperties::default();
    for caps in custom_property_re().captures_iter(corpus) {
        let (Some(name), Some(value)) = (caps.get(1), caps.get(2)) else {
            continue;
        };
        let boundary_ok = corpus[..name.start()]
            .chars()
            .next_back()
            .map_or(true, |c| !(c.is_ascii_alphanumeric() || c == '-' || c == '_'));
        let value = strip_important(value.as_str());
        if boundary_ok && !value.is_empty() {
            properties
                .entry(name.as_str().to_string())
                .or_insert_with(|| value.to_string());
        }
    }
    properties
}

fn strip_important(value: &str) -> &str {
    let trimmed = value.trim();
    match trimmed.to_ascii_lowercase().find("!important") {
        Some(idx) => trimmed[..idx].trim_end(),
        None => trimmed,
    }
}
