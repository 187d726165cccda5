//! Badge rendering: glyph width table, color resolution and the SVG writer.
pub mod color;
pub mod render;
pub mod widths;

pub use color::resolve_color;
pub use render::{ErrorBadge, Layout, escape_xml, layout, render, render_error};
pub use widths::{measure_text, segment_width};
