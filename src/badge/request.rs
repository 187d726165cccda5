use std::collections::HashMap;

use crate::badge::kind::{BadgeKind, BadgeStyle};
use crate::errors::BadgeError;
use crate::types::Identity;

/// Default color of the left (label) segment.
pub const DEFAULT_LABEL_COLOR: &str = "#555555";

/// A validated badge request.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BadgeRequest {
    pub kind: BadgeKind,
    pub identity: Identity,
    pub label: Option<String>,
    pub color: Option<String>,
    pub label_color: Option<String>,
    pub style: BadgeStyle,
    pub prefix: Option<String>,
    pub suffix: Option<String>,
}

impl BadgeRequest {
    /// Build a request from a path segment and its query parameters.
    ///
    /// # Errors
    /// `BadgeError::Validation` for an unknown kind or a missing/blank `username`.
    pub fn parse(kind_segment: &str, query: &HashMap<String, String>) -> Result<Self, BadgeError> {
        let kind: BadgeKind = kind_segment.parse()?;
        let identity = query.get("username").map(|s| s.trim()).unwrap_or_default();
        if identity.is_empty() {
            return Err(BadgeError::Validation("username is required".into()));
        }
        Ok(Self {
            kind,
            identity: identity.to_string(),
            label: query.get("label").cloned(),
            color: query.get("color").cloned(),
            label_color: query.get("labelColor").cloned(),
            style: BadgeStyle::parse_or_default(query.get("style").map(String::as_str)),
            prefix: query.get("prefix").cloned(),
            suffix: query.get("suffix").cloned(),
        })
    }

    /// Rendering parameters keyed by their query names; identity is excluded.
    #[must_use]
    pub fn render_params(&self) -> Vec<(&str, &str)> {
        let mut out = vec![("style", self.style.as_str())];
        let optional = [
            ("label", &self.label),
            ("color", &self.color),
            ("labelColor", &self.label_color),
            ("prefix", &self.prefix),
            ("suffix", &self.suffix),
        ];
        for (k, v) in optional {
            if let Some(v) = v {
                out.push((k, v.as_str()));
            }
        }
        out
    }

    #[must_use]
    pub fn label(&self) -> &str {
        self.label.as_deref().unwrap_or(self.kind.default_label())
    }

    #[must_use]
    pub fn color(&self) -> &str {
        self.color.as_deref().unwrap_or(self.kind.default_color())
    }

    #[must_use]
    pub fn label_color(&self) -> &str {
        self.label_color.as_deref().unwrap_or(DEFAULT_LABEL_COLOR)
    }

    /// Wrap a resolved value with the requested prefix and suffix.
    #[must_use]
    pub fn decorate(&self, value: &str) -> String {
        format!(
            "{}{}{}",
            self.prefix.as_deref().unwrap_or_default(),
            value,
            self.suffix.as_deref().unwrap_or_default()
        )
    }
}
