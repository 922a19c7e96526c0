//! Color value handling for series recoloring.
//!
//! Renderables report colors as whatever their engine stores: `#rrggbb`,
//! `#rgb`, `rgb(r,g,b)`, `rgba(r,g,b,a)` or a CSS name. The format panel
//! edits everything as a 6-digit lowercase hex string.

/// Fallback shown when a color cannot be parsed.
pub const FALLBACK_HEX: &str = "#000000";

/// Normalize any supported color representation to `#rrggbb`.
/// Unparseable input yields [`FALLBACK_HEX`].
pub fn normalize_to_hex(val: &str) -> String {
    parse_rgb(val)
        .map(|(r, g, b)| format!("#{:02x}{:02x}{:02x}", r, g, b))
        .unwrap_or_else(|| FALLBACK_HEX.to_string())
}

/// Convert a hex color to `rgba(r,g,b,alpha)`. Unparseable input is treated
/// as black.
pub fn with_alpha(hex: &str, alpha: f32) -> String {
    let (r, g, b) = parse_rgb(hex).unwrap_or((0, 0, 0));
    format!("rgba({},{},{},{})", r, g, b, alpha)
}

/// Parse a color string into its RGB components.
pub fn parse_rgb(val: &str) -> Option<(u8, u8, u8)> {
    let val = val.trim();
    if val.is_empty() {
        return None;
    }
    if let Some(hex) = val.strip_prefix('#') {
        return parse_hex(hex);
    }
    let lower = val.to_ascii_lowercase();
    if let Some(inner) = lower
        .strip_prefix("rgba(")
        .or_else(|| lower.strip_prefix("rgb("))
    {
        let inner = inner.strip_suffix(')').unwrap_or(inner);
        let parts: Vec<&str> = inner.split(',').map(|s| s.trim()).collect();
        if parts.len() < 3 {
            return None;
        }
        let channel = |s: &str| -> Option<u8> {
            let v = s.parse::<f32>().ok()?;
            Some(v.round().clamp(0.0, 255.0) as u8)
        };
        return Some((channel(parts[0])?, channel(parts[1])?, channel(parts[2])?));
    }
    named(&lower).and_then(|hex| parse_hex(&hex[1..]))
}

fn parse_hex(hex: &str) -> Option<(u8, u8, u8)> {
    if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }
    match hex.len() {
        // #rgb / #rgba shorthand
        3 | 4 => {
            let d = |i: usize| u8::from_str_radix(&hex[i..i + 1], 16).ok().map(|v| v * 17);
            Some((d(0)?, d(1)?, d(2)?))
        }
        // #rrggbb / #rrggbbaa
        6 | 8 => {
            let d = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
            Some((d(0)?, d(2)?, d(4)?))
        }
        _ => None,
    }
}

fn named(val: &str) -> Option<&'static str> {
    let hex = match val {
        "white" => "#ffffff",
        "black" => "#000000",
        "red" => "#ff0000",
        "green" => "#008000",
        "blue" => "#0000ff",
        "yellow" => "#ffff00",
        "orange" => "#ffa500",
        "cyan" => "#00ffff",
        "magenta" => "#ff00ff",
        "lightblue" => "#add8e6",
        "darkgreen" => "#006400",
        "gray" | "grey" => "#808080",
        "lightgray" | "lightgrey" => "#d3d3d3",
        "darkgray" | "darkgrey" => "#a9a9a9",
        "brown" => "#a52a2a",
        "purple" => "#800080",
        "pink" => "#ffc0cb",
        "lime" => "#00ff00",
        "navy" => "#000080",
        "teal" => "#008080",
        "olive" => "#808000",
        "maroon" => "#800000",
        "silver" => "#c0c0c0",
        _ => return None,
    };
    Some(hex)
}
