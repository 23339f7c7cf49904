//! Element color resolution.

use crate::backend::Color;
use crate::variables::VariableStore;

/// Resolve a color field: `$var` holding `r,g,b`, or `#rrggbb` hex.
/// Empty or malformed values fall back to `default`.
pub fn resolve_color(spec: &str, store: &VariableStore, default: Color) -> Color {
    let spec = spec.trim();
    if spec.is_empty() {
        return default;
    }
    if let Some(name) = spec.strip_prefix('$') {
        let value = store.resolve(name);
        return parse_rgb_triple(&value).unwrap_or_else(|| {
            log::warn!("Variable '{name}' is not an r,g,b color: '{value}'");
            default
        });
    }
    parse_hex_color(spec).unwrap_or_else(|| {
        log::warn!("Invalid color '{spec}'");
        default
    })
}

/// `"r,g,b"` with each channel `0..=255`.
pub fn parse_rgb_triple(s: &str) -> Option<Color> {
    let mut parts = s.split(',').map(|p| p.trim().parse::<u8>());
    let (r, g, b) = (parts.next()?.ok()?, parts.next()?.ok()?, parts.next()?.ok()?);
    if parts.next().is_some() {
        return None;
    }
    Some(Color::rgb(r, g, b))
}

/// `#rrggbb`, or `rrggbb` without the hash.
pub fn parse_hex_color(s: &str) -> Option<Color> {
    let s = s.strip_prefix('#').unwrap_or(s);
    if s.len() != 6 || !s.is_ascii() {
        return None;
    }
    let r = u8::from_str_radix(&s[0..2], 16).ok()?;
    let g = u8::from_str_radix(&s[2..4], 16).ok()?;
    let b = u8::from_str_radix(&s[4..6], 16).ok()?;
    Some(Color::rgb(r, g, b))
}

/// Apply an element's `opacity` to a background color.
pub fn with_opacity(color: Color, opacity: Option<f32>) -> Color {
    match opacity {
        Some(o) => color.with_alpha((o.clamp(0.0, 1.0) * f32::from(color.a)).round() as u8),
        None => color,
    }
}
