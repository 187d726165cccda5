use rand::Rng;
use rand::distr::Alphanumeric;
use std::fmt::Write as _;

use crate::badge::BadgeStyle;
use crate::errors::BadgeError;
use crate::svg::color::resolve_color;
use crate::svg::widths::segment_width;

pub const HEIGHT: u32 = 20;
const FONT_FAMILY: &str = "Verdana,Geneva,DejaVu Sans,sans-serif";
const ERROR_LABEL: &str = "badge";
const ERROR_COLOR: &str = "#e05d44";
const ERROR_LABEL_COLOR: &str = "#555555";

/// Geometry of a two-segment badge.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Layout {
    pub label_width: u32,
    pub value_width: u32,
    pub total_width: u32,
    pub height: u32,
    /// Center of the label text.
    pub label_x: u32,
    /// Center of the value text.
    pub value_x: u32,
    pub radius: u32,
    pub gradient: bool,
}

#[must_use]
pub fn layout(label: &str, value: &str, style: BadgeStyle) -> Layout {
    let label_width = segment_width(label);
    let value_width = segment_width(value);
    Layout {
        label_width,
        value_width,
        total_width: label_width.saturating_add(value_width),
        height: HEIGHT,
        label_x: label_width / 2,
        value_x: label_width.saturating_add(value_width / 2),
        radius: style.corner_radius(),
        gradient: style.has_gradient(),
    }
}

/// Degraded badges rendered in place of a value.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ErrorBadge {
    NotFound,
    RateLimited,
    Generic,
}

impl ErrorBadge {
    #[must_use]
    pub const fn message(self) -> &'static str {
        match self {
            ErrorBadge::NotFound => "not found",
            ErrorBadge::RateLimited => "rate limited",
            ErrorBadge::Generic => "error",
        }
    }

    /// Classify a failure; anything that is not a known upstream condition is generic.
    #[must_use]
    pub fn from_error(err: &BadgeError) -> Self {
        match err {
            BadgeError::NotFound(_) => ErrorBadge::NotFound,
            BadgeError::RateLimited => ErrorBadge::RateLimited,
            _ => ErrorBadge::Generic,
        }
    }
}

/// Escape the five XML-reserved characters.
#[must_use]
pub fn escape_xml(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(c),
        }
    }
    out
}

/// Short id scoping this render's gradient and clip path.
fn scope_id() -> String {
    rand::rng().sample_iter(&Alphanumeric).take(6).map(char::from).collect::<String>().to_ascii_lowercase()
}

/// Render a badge. Colors may be palette names, `#`-prefixed or bare hex codes.
#[must_use]
pub fn render(label: &str, value: &str, color: &str, label_color: &str, style: BadgeStyle) -> String {
    let geo = layout(label, value, style);
    let color = resolve_color(color);
    let label_color = resolve_color(label_color);
    let label = escape_xml(label);
    let value = escape_xml(value);
    let id = scope_id();
    let Layout { label_width: lw, value_width: vw, total_width: tw, height: h, label_x: lx, value_x: vx, radius: rx, .. } = geo;

    let mut svg = String::with_capacity(1024);
    // Writing into a String cannot fail.
    let _ = writeln!(
        svg,
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{tw}" height="{h}" role="img" aria-label="{label}: {value}">"#
    );
    let _ = writeln!(svg, "  <title>{label}: {value}</title>");
    svg.push_str("  <defs>\n");
    if geo.gradient {
        let _ = writeln!(
            svg,
            r##"    <linearGradient id="g{id}" x2="0" y2="100%">
      <stop offset="0" stop-color="#bbb" stop-opacity=".1"/>
      <stop offset="1" stop-opacity=".1"/>
    </linearGradient>"##
        );
    }
    let _ = writeln!(
        svg,
        r##"    <clipPath id="c{id}">
      <rect width="{tw}" height="{h}" rx="{rx}" fill="#fff"/>
    </clipPath>"##
    );
    svg.push_str("  </defs>\n");
    let _ = writeln!(svg, r#"  <g clip-path="url(#c{id})">"#);
    let _ = writeln!(svg, r#"    <rect width="{lw}" height="{h}" fill="{label_color}"/>"#);
    let _ = writeln!(svg, r#"    <rect x="{lw}" width="{vw}" height="{h}" fill="{color}"/>"#);
    if geo.gradient {
        let _ = writeln!(svg, r#"    <rect width="{tw}" height="{h}" fill="url(#g{id})"/>"#);
    }
    svg.push_str("  </g>\n");
    let _ = writeln!(
        svg,
        r##"  <g fill="#fff" text-anchor="middle" font-family="{FONT_FAMILY}" font-size="11">"##
    );
    for (x, text) in [(lx, &label), (vx, &value)] {
        let _ = writeln!(
            svg,
            r##"    <text x="{x}" y="15" fill="#010101" fill-opacity=".3" aria-hidden="true">{text}</text>"##
        );
        let _ = writeln!(svg, r#"    <text x="{x}" y="14">{text}</text>"#);
    }
    svg.push_str("  </g>\n</svg>");
    svg
}

/// Render a degraded badge. Never fails.
#[must_use]
pub fn render_error(kind: ErrorBadge) -> String {
    render(ERROR_LABEL, kind.message(), ERROR_COLOR, ERROR_LABEL_COLOR, BadgeStyle::Flat)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn attr<'a>(svg: &'a str, name: &str) -> &'a str {
        let needle = format!(" {name}=\"");
        let start = svg.find(&needle).map(|i| i + needle.len()).unwrap();
        let end = svg[start..].find('"').unwrap();
        &svg[start..start + end]
    }

    #[test]
    fn layout_centers_each_segment() {
        let geo = layout("stars", "1.2k", BadgeStyle::Flat);
        assert_eq!(geo.height, 20);
        assert_eq!(geo.total_width, geo.label_width + geo.value_width);
        assert_eq!(geo.label_x, geo.label_width / 2);
        assert_eq!(geo.value_x, geo.label_width + geo.value_width / 2);
    }

    #[test]
    fn style_controls_radius_and_gradient() {
        let flat = render("a", "b", "red", "grey", BadgeStyle::Flat);
        let square = render("a", "b", "red", "grey", BadgeStyle::FlatSquare);
        let rounded = render("a", "b", "red", "grey", BadgeStyle::Rounded);
        assert!(flat.contains("rx=\"3\"") && flat.contains("linearGradient"));
        assert!(square.contains("rx=\"0\"") && !square.contains("linearGradient"));
        assert!(rounded.contains("rx=\"10\"") && rounded.contains("linearGradient"));
    }

    #[test]
    fn dimensions_and_text_are_stable_across_renders() {
        let a = render("followers", "9.9k", "blue", "#555", BadgeStyle::Flat);
        let b = render("followers", "9.9k", "blue", "#555", BadgeStyle::Flat);
        assert_eq!(attr(&a, "width"), attr(&b, "width"));
        assert_eq!(attr(&a, "height"), "20");
        assert_eq!(attr(&a, "aria-label"), attr(&b, "aria-label"));
    }

    #[test]
    fn text_is_escaped() {
        let svg = render("<b>&'\"", "x", "red", "grey", BadgeStyle::Flat);
        assert!(svg.contains("&lt;b&gt;&amp;&apos;&quot;"));
        assert!(!svg.contains("<b>"));
    }

    #[test]
    fn error_badge_uses_fixed_label_and_colors() {
        let svg = render_error(ErrorBadge::RateLimited);
        assert!(svg.contains("badge: rate limited"));
        assert!(svg.contains("fill=\"#e05d44\""));
        assert!(svg.contains("fill=\"#555555\""));
        assert_eq!(ErrorBadge::from_error(&BadgeError::Timeout), ErrorBadge::Generic);
        assert_eq!(ErrorBadge::from_error(&BadgeError::NotFound("x".into())), ErrorBadge::NotFound);
    }
}
