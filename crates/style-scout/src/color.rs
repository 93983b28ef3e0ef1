//! Color parsing, canonical encoding, and perceptual metrics.
//!
//! Every color literal the extractor finds ends up here. Literals are
//! parsed into an [`Rgb`] triplet, mostly-transparent colors are dropped,
//! and the survivors are re-encoded as lowercase `#rrggbb`. Ranking collapses
//! colors that sit within a small RGB distance of a color already kept.

use crate::rank::rank_by_frequency;
use fnv::FnvHashMap;
use regex::Regex;
use std::sync::OnceLock;

/// Colors with an alpha strictly below this are overlay noise.
pub const MIN_ALPHA: f32 = 0.5;

/// Alpha at or above which a color counts as opaque for text selection.
pub const OPAQUE_ALPHA: f32 = 0.8;

/// Euclidean RGB distance under which two colors are the same swatch.
pub const NEAR_DUPLICATE_DISTANCE: f64 = 20.0;

/// An sRGB color with an optional alpha channel.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    /// `None` when the literal carried no alpha.
    pub alpha: Option<f32>,
}

impl Rgb {
    pub fn new(r: u8, g: u8, b: u8) -> Self {
        Self {
            r,
            g,
            b,
            alpha: None,
        }
    }

    /// Canonical lowercase `#rrggbb`.
    pub fn to_hex(&self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }

    fn channels(&self) -> [f64; 3] {
        [
            self.r as f64 / 255.0,
            self.g as f64 / 255.0,
            self.b as f64 / 255.0,
        ]
    }

    /// Weighted luminance over gamma-encoded channels, in `[0, 1]`.
    pub fn luminance(&self) -> f64 {
        let [r, g, b] = self.channels();
        0.2126 * r + 0.7152 * g + 0.0722 * b
    }

    /// WCAG relative luminance over linearized sRGB channels.
    pub fn relative_luminance(&self) -> f64 {
        let linear = |c: f64| {
            if c <= 0.03928 {
                c / 12.92
            } else {
                ((c + 0.055) / 1.055).powf(2.4)
            }
        };
        let [r, g, b] = self.channels();
        0.2126 * linear(r) + 0.7152 * linear(g) + 0.0722 * linear(b)
    }

    /// `(max - min) / max` over the RGB channels; 0 for black.
    pub fn saturation(&self) -> f64 {
        let [r, g, b] = self.channels();
        let max = r.max(g).max(b);
        let min = r.min(g).min(b);
        if max == 0.0 {
            return 0.0;
        }
        (max - min) / max
    }

    /// WCAG contrast ratio, always `>= 1`.
    pub fn contrast_ratio(&self, other: &Rgb) -> f64 {
        let a = self.relative_luminance();
        let b = other.relative_luminance();
        let (lighter, darker) = if a >= b { (a, b) } else { (b, a) };
        (lighter + 0.05) / (darker + 0.05)
    }

    /// Euclidean distance in RGB space (max ≈ 441.7).
    pub fn distance(&self, other: &Rgb) -> f64 {
        let dr = self.r as f64 - other.r as f64;
        let dg = self.g as f64 - other.g as f64;
        let db = self.b as f64 - other.b as f64;
        (dr * dr + dg * dg + db * db).sqrt()
    }

    /// Opaque enough to be used as a text color. Unknown alpha counts.
    pub fn is_opaque(&self) -> bool {
        self.alpha.map_or(true, |a| a >= OPAQUE_ALPHA)
    }
}

fn rgb_function_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(
            r"^rgba?\(\s*([^,()\s]+)\s*,\s*([^,()\s]+)\s*,\s*([^,()\s]+)\s*(?:,\s*([^,()\s]+)\s*)?\)$",
        )
        .expect("rgb function regex is valid")
    })
}

/// Parse a hex or `rgb()`/`rgba()` color literal.
///
/// Returns `None` for anything that is not a well-formed color.
pub fn parse_color(raw: &str) -> Option<Rgb> {
    let literal = raw.trim().to_ascii_lowercase();
    if let Some(hex) = literal.strip_prefix('#') {
        return parse_hex(hex);
    }
    if literal.starts_with("rgb") {
        return parse_rgb_function(&literal);
    }
    None
}

fn parse_hex(hex: &str) -> Option<Rgb> {
    if !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
        return None;
    }
    let byte = |s: &str| u8::from_str_radix(s, 16).ok();
    match hex.len() {
        3 => {
            let digit = |i: usize| byte(&hex[i..i + 1]).map(|v| v * 17);
            Some(Rgb::new(digit(0)?, digit(1)?, digit(2)?))
        }
        6 => Some(Rgb::new(
            byte(&hex[0..2])?,
            byte(&hex[2..4])?,
            byte(&hex[4..6])?,
        )),
        _ => None,
    }
}

fn parse_rgb_function(literal: &str) -> Option<Rgb> {
    let caps = rgb_function_re().captures(literal)?;
    let r = parse_channel(caps.get(1)?.as_str())?;
    let g = parse_channel(caps.get(2)?.as_str())?;
    let b = parse_channel(caps.get(3)?.as_str())?;
    let alpha = match caps.get(4) {
        Some(m) => Some(parse_alpha(m.as_str())?),
        None => None,
    };
    Some(Rgb { r, g, b, alpha })
}

fn parse_channel(value: &str) -> Option<u8> {
    let scaled = match value.strip_suffix('%') {
        Some(percent) => percent.parse::<f64>().ok()? / 100.0 * 255.0,
        None => value.parse::<f64>().ok()?,
    };
    if !scaled.is_finite() {
        return None;
    }
    Some(scaled.round().clamp(0.0, 255.0) as u8)
}

fn parse_alpha(value: &str) -> Option<f32> {
    let alpha = match value.strip_suffix('%') {
        Some(percent) => percent.parse::<f32>().ok()? / 100.0,
        None => value.parse::<f32>().ok()?,
    };
    if !alpha.is_finite() {
        return None;
    }
    Some(alpha.clamp(0.0, 1.0))
}

/// Canonical hex for a literal, or `None` if it is unparsable or too
/// transparent to be a theme color.
pub fn canonicalize(raw: &str) -> Option<String> {
    let rgb = parse_color(raw)?;
    if rgb.alpha.is_some_and(|a| a < MIN_ALPHA) {
        return None;
    }
    Some(rgb.to_hex())
}

/// Canonicalize raw literals and collapse near-duplicates, first one wins.
pub fn normalize(raw: &[String]) -> Vec<String> {
    let canonical: Vec<String> = raw.iter().filter_map(|c| canonicalize(c)).collect();
    suppress_near_duplicates(&canonical)
}

/// Greedy, order-dependent near-duplicate suppression.
pub fn suppress_near_duplicates(colors: &[String]) -> Vec<String> {
    let mut kept: Vec<(String, Rgb)> = Vec::new();
    for color in colors {
        let Some(rgb) = parse_color(color) else {
            continue;
        };
        if kept
            .iter()
            .any(|(_, k)| k.distance(&rgb) < NEAR_DUPLICATE_DISTANCE)
        {
            continue;
        }
        kept.push((rgb.to_hex(), rgb));
    }
    kept.into_iter().map(|(hex, _)| hex).collect()
}

/// Rank raw color literals by frequency and return at most `limit`
/// distinct canonical colors.
///
/// Counting happens over every canonical occurrence before near-duplicate
/// suppression, so a frequent color shadows its rarer neighbours.
pub fn rank_colors(raw: &[String], limit: usize) -> Vec<String> {
    let occurrences: Vec<String> = raw.iter().filter_map(|c| canonicalize(c)).collect();
    let ranked = rank_by_frequency(&occurrences, usize::MAX);
    let mut distinct = suppress_near_duplicates(&ranked);
    distinct.truncate(limit);
    distinct
}

/// Strongest alpha seen for each canonical color among `raw` literals.
///
/// Literals without an alpha channel count as fully opaque.
pub fn strongest_alpha(raw: &[String]) -> FnvHashMap<String, f32> {
    let mut alphas: FnvHashMap<String, f32> = FnvHashMap::default();
    for literal in raw {
        let Some(rgb) = parse_color(literal) else {
            continue;
        };
        let alpha = rgb.alpha.unwrap_or(1.0);
        if alpha < MIN_ALPHA {
            continue;
        }
        let entry = alphas.entry(rgb.to_hex()).or_insert(alpha);
        *entry = entry.max(alpha);
    }
    alphas
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_parse_short_hex_doubles_digits() {
        assert_eq!(parse_color("#f60"), Some(Rgb::new(0xff, 0x66, 0x00)));
        assert_eq!(canonicalize("#FFF").as_deref(), Some("#ffffff"));
    }

    #[test]
    fn test_parse_rgb_and_rgba() {
        assert_eq!(
            canonicalize("rgb(255, 102, 0)").as_deref(),
            Some("#ff6600")
        );
        let c = parse_color("rgba(0,0,0,0.9)").unwrap();
        assert_eq!(c.alpha, Some(0.9));
        assert!(c.is_opaque());
    }

    #[test]
    fn test_percent_channels_and_clamping() {
        assert_eq!(
            canonicalize("rgb(100%, 0%, 50%)").as_deref(),
            Some("#ff0080")
        );
        assert_eq!(canonicalize("rgb(300, 0, 0)").as_deref(), Some("#ff0000"));
    }

    #[test]
    fn test_invalid_literals_dropped() {
        for bad in ["#ggg", "#12345", "rgb(1,2)", "red", "", "rgb(a,b,c)"] {
            assert_eq!(canonicalize(bad), None, "{bad} should not parse");
        }
    }

    #[test]
    fn test_canonical_form_is_seven_lowercase_chars() {
        for raw in ["#ABC", "#a1B2c3", "rgba(12, 34, 56, 1)", "RGB(0,0,0)"] {
            let hex = canonicalize(raw).unwrap();
            assert_eq!(hex.len(), 7);
            assert!(hex.starts_with('#'));
            assert_eq!(hex, hex.to_lowercase());
        }
    }

    #[test]
    fn test_transparent_colors_discarded() {
        assert_eq!(canonicalize("rgba(0,0,0,0.1)"), None);
        assert_eq!(canonicalize("rgba(0,0,0,0)"), None);
        assert_eq!(canonicalize("rgba(0,0,0,.5)").as_deref(), Some("#000000"));
    }

    #[test]
    fn test_near_duplicates_collapse_first_wins() {
        let kept = normalize(&strings(&["#ff0000", "#fe0101"]));
        assert_eq!(kept, strings(&["#ff0000"]));
        let kept = normalize(&strings(&["#fe0101", "#ff0000", "#0000ff"]));
        assert_eq!(kept, strings(&["#fe0101", "#0000ff"]));
    }

    #[test]
    fn test_rank_is_frequency_stable() {
        let raw = strings(&["#aaa", "#aaa", "#00f", "#aaa", "#00f", "#f00"]);
        assert_eq!(
            rank_colors(&raw, 12),
            strings(&["#aaaaaa", "#0000ff", "#ff0000"])
        );
    }

    #[test]
    fn test_rank_merges_case_variants_and_truncates() {
        let raw = strings(&["#FF0000", "#ff0000", "#00ff00", "#0000ff"]);
        assert_eq!(rank_colors(&raw, 2), strings(&["#ff0000", "#00ff00"]));
    }

    #[test]
    fn test_half_percent_rounds_up() {
        assert_eq!(canonicalize("rgb(50%, 50%, 50%)").as_deref(), Some("#808080"));
        assert_eq!(canonicalize("rgb(20%, 40%, 60%)").as_deref(), Some("#336699"));
    }

    #[test]
    fn test_strongest_alpha_per_color() {
        let raw = strings(&["rgba(0,0,0,0.6)", "rgba(0, 0, 0, 0.7)", "#ff0000", "rgba(255,0,0,.55)", "rgba(0,0,255,0.2)"]);
        let alphas = strongest_alpha(&raw);
        assert_eq!(alphas.get("#000000"), Some(&0.7));
        assert_eq!(alphas.get("#ff0000"), Some(&1.0));
        assert_eq!(alphas.get("#0000ff"), None);
    }

    #[test]
    fn test_metrics() {
        let white = Rgb::new(255, 255, 255);
        let black = Rgb::new(0, 0, 0);
        assert!((white.contrast_ratio(&black) - 21.0).abs() < 1e-9);
        assert!((white.contrast_ratio(&white) - 1.0).abs() < 1e-9);
        assert_eq!(black.saturation(), 0.0);
        assert!((Rgb::new(255, 0, 0).saturation() - 1.0).abs() < 1e-9);
        assert!((white.luminance() - 1.0).abs() < 1e-9);
        assert!((Rgb::new(255, 0, 0).distance(&Rgb::new(254, 1, 1)) - 3f64.sqrt()).abs() < 1e-9);
    }
}
