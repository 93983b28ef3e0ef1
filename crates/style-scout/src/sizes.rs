//! Syntactic whitelist for font-size values.

use crate::types::{FontSizes, SizeRole};
use regex::Regex;
use std::sync::OnceLock;

fn font_size_value_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(
            r"(?i)^(?:(?:\d+(?:\.\d+)?|\.\d+)(?:px|rem|em|%|pt|vw|vh|vmin|vmax|ch|ex)|(?:clamp|calc|min|max|var)\([^;{}<>]*\))$",
        )
        .expect("font size value regex is valid")
    })
}

/// Whether `value` looks like a usable CSS font-size.
///
/// Accepts a positive number with a unit, or a `clamp()`, `calc()`,
/// `min()`, `max()` or `var()` expression. Keywords like `larger` are
/// rejected.
pub fn is_valid_font_size(value: &str) -> bool {
    font_size_value_re().is_match(value.trim())
}

/// Drop every slot whose value fails the whitelist.
pub fn sanitize_font_sizes(sizes: FontSizes) -> FontSizes {
    let mut clean = FontSizes::default();
    for (role, value) in sizes.iter_set() {
        let value = value.trim();
        if is_valid_font_size(value) {
            clean.set(role, Some(value.to_string()));
        }
    }
    clean
}

/// CSS selector a size slot is applied to in generated rules.
pub fn css_selector(role: SizeRole) -> &'static str {
    match role {
        SizeRole::Base => "body",
        SizeRole::H1 => "h1",
        SizeRole::H2 => "h2",
        SizeRole::H3 => "h3",
        SizeRole::H4 => "h4",
        SizeRole::H5 => "h5",
        SizeRole::H6 => "h6",
        SizeRole::Cta => "button, .btn",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_whitelist() {
        for ok in ["16px", "1.25rem", ".875em", "62.5%", "clamp(1rem, 2vw, 3rem)", "calc(1rem + 2px)", "var(--fs)"] {
            assert!(is_valid_font_size(ok), "{ok} should pass");
        }
        for bad in ["larger", "16", "-2px", "1rem}body{x", "expression(alert(1))", ""] {
            assert!(!is_valid_font_size(bad), "{bad} should fail");
        }
    }

    #[test]
    fn test_sanitize_drops_invalid_slots() {
        let sizes = FontSizes {
            base: Some("medium".to_string()),
            h1: Some(" 2rem ".to_string()),
            ..Default::default()
        };
        let clean = sanitize_font_sizes(sizes);
        assert_eq!(clean.base, None);
        assert_eq!(clean.h1.as_deref(), Some("2rem"));
    }
}
