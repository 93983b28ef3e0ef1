//! Assign ranked colors to semantic roles.
//!
//! Heuristics run first: text by contrast against the page background
//! (or darkest when there is none), accent by saturation, then primary and
//! secondary from whatever is left in rank order. Custom properties named
//! after a role override the heuristics afterwards.

use crate::color::{parse_color, Rgb, OPAQUE_ALPHA};
use crate::extract::CssVars;
use crate::types::{ColorRole, FontSizes, LabeledColors, SizeRole};
use fnv::FnvHashMap;
use regex::Regex;
use std::cmp::Ordering;
use std::sync::OnceLock;

/// Minimum saturation for a color to be considered an accent.
pub const ACCENT_MIN_SATURATION: f64 = 0.2;

/// Label `colors` (rank order) against an optional raw background value.
///
/// Pure: the same inputs always produce the same labels.
pub fn label(colors: &[String], background: Option<&str>) -> LabeledColors {
    label_with_alpha(colors, background, &FnvHashMap::default())
}

/// Like [`label`], with the strongest alpha each canonical color was
/// written with. Colors whose alpha stays below [`OPAQUE_ALPHA`] are never
/// picked as text; colors missing from `alphas` count as opaque.
pub fn label_with_alpha(
    colors: &[String],
    background: Option<&str>,
    alphas: &FnvHashMap<String, f32>,
) -> LabeledColors {
    let parsed: Vec<(&String, Rgb)> = colors
        .iter()
        .filter_map(|c| parse_color(c).map(|rgb| (c, rgb)))
        .collect();
    let background = background.and_then(parse_color);

    let text = pick_text(&parsed, background.as_ref(), alphas);
    let accent = pick_accent(&parsed);

    let mut remaining = colors.iter().filter(|c| {
        let taken = |role: &Option<String>| role.as_deref().is_some_and(|r| r.eq_ignore_ascii_case(c));
        !taken(&text) && !taken(&accent)
    });
    let primary = remaining.next().or_else(|| colors.first()).cloned();
    let secondary = remaining.next().or_else(|| colors.get(1)).cloned();

    LabeledColors {
        primary,
        secondary,
        text,
        accent,
    }
}

fn pick_text(
    parsed: &[(&String, Rgb)],
    background: Option<&Rgb>,
    alphas: &FnvHashMap<String, f32>,
) -> Option<String> {
    let mut candidates: Vec<&(&String, Rgb)> = parsed
        .iter()
        .filter(|(hex, rgb)| {
            rgb.is_opaque()
                && alphas
                    .get(hex.to_ascii_lowercase().as_str())
                    .map_or(true, |a| *a >= OPAQUE_ALPHA)
        })
        .collect();

    match background {
        Some(bg) => candidates.sort_by(|a, b| {
            b.1.contrast_ratio(bg)
                .partial_cmp(&a.1.contrast_ratio(bg))
                .unwrap_or(Ordering::Equal)
        }),
        None => candidates.sort_by(|a, b| {
            a.1.luminance()
                .partial_cmp(&b.1.luminance())
                .unwrap_or(Ordering::Equal)
        }),
    }

    candidates.first().map(|(hex, _)| hex.to_string())
}

fn pick_accent(parsed: &[(&String, Rgb)]) -> Option<String> {
    let saturated: Vec<&(&String, Rgb)> = parsed
        .iter()
        .filter(|(_, rgb)| rgb.saturation() >= ACCENT_MIN_SATURATION)
        .collect();
    let mut candidates = if saturated.is_empty() {
        parsed.iter().collect()
    } else {
        saturated
    };

    candidates.sort_by(|a, b| {
        b.1.saturation()
            .partial_cmp(&a.1.saturation())
            .unwrap_or(Ordering::Equal)
            .then_with(|| {
                a.1.luminance()
                    .partial_cmp(&b.1.luminance())
                    .unwrap_or(Ordering::Equal)
            })
    });

    candidates.first().map(|(hex, _)| hex.to_string())
}

/// Which color role a custom property name speaks for, if any.
pub fn color_role_for_property(name: &str) -> Option<ColorRole> {
    let name = name.to_ascii_lowercase();
    if name.contains("primary") {
        Some(ColorRole::Primary)
    } else if name.contains("secondary") {
        Some(ColorRole::Secondary)
    } else if name.contains("accent") || name.contains("brand") {
        Some(ColorRole::Accent)
    } else if name.contains("text") {
        Some(ColorRole::Text)
    } else {
        None
    }
}

fn heading_name_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?:^|[^a-z0-9])h([1-6])(?:$|[^0-9])").expect("heading name regex is valid")
    })
}

/// Which font-size slot a custom property name speaks for, if any.
pub fn size_role_for_property(name: &str) -> Option<SizeRole> {
    let name = name.to_ascii_lowercase();
    if let Some(caps) = heading_name_re().captures(&name) {
        let level = caps.get(1)?.as_str().parse::<u8>().ok()?;
        return SizeRole::heading(level);
    }
    if name.contains("cta") || name.contains("button") || name.contains("btn") {
        return Some(SizeRole::Cta);
    }
    if name.contains("base") || name.contains("body") || name.contains("root") {
        return Some(SizeRole::Base);
    }
    None
}

/// Overwrite heuristic labels with role-named color properties.
///
/// The first definition of a role in source order wins. Values are stored
/// as canonical hex; unparsable values are ignored.
pub fn apply_color_overrides(labels: &mut LabeledColors, vars: &CssVars) {
    let mut seen: Vec<ColorRole> = Vec::new();
    for (name, value) in &vars.colors {
        let Some(role) = color_role_for_property(name) else {
            continue;
        };
        if seen.contains(&role) {
            continue;
        }
        let Some(rgb) = parse_color(value) else {
            continue;
        };
        labels.set(role, Some(rgb.to_hex()));
        seen.push(role);
    }
}

/// Overwrite selector-derived font sizes with slot-named size properties.
///
/// The first definition of a slot in source order wins.
pub fn apply_size_overrides(sizes: &mut FontSizes, vars: &CssVars) {
    let mut seen: Vec<SizeRole> = Vec::new();
    for (name, value) in &vars.sizes {
        let Some(role) = size_role_for_property(name) else {
            continue;
        };
        if seen.contains(&role) {
            continue;
        }
        sizes.set(role, Some(value.clone()));
        seen.push(role);
    }
}
