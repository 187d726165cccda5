/// Map a symbolic color name to its hex value.
#[must_use]
pub fn named_color(name: &str) -> Option<&'static str> {
    let hex = match name {
        "brightgreen" | "success" => "#4c1",
        "green" => "#97ca00",
        "yellow" => "#dfb317",
        "yellowgreen" => "#a4a61d",
        "orange" | "important" => "#fe7d37",
        "red" | "critical" => "#e05d44",
        "blue" | "informational" => "#007ec6",
        "grey" | "gray" => "#555555",
        "lightgrey" | "lightgray" | "inactive" => "#9f9f9f",
        _ => return None,
    };
    Some(hex)
}

/// Resolve a user-supplied color: palette names first, then `#`-prefixed
/// values as-is, otherwise treat the input as a hex code missing its `#`.
#[must_use]
pub fn resolve_color(color: &str) -> String {
    if let Some(hex) = named_color(color) {
        return hex.to_string();
    }
    if color.starts_with('#') {
        color.to_string()
    } else {
        format!("#{color}")
    }
}
