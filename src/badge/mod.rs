//! Badge request model: the kinds of statistic a badge can show, the visual
//! styles, and parsing of inbound query parameters into a validated request.
pub mod kind;
pub mod request;

pub use kind::{BadgeKind, BadgeStyle};
pub use request::BadgeRequest;
