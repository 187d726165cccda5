use std::fmt;
use std::str::FromStr;

use crate::errors::BadgeError;

/// The statistic a badge displays.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum BadgeKind {
    ViewCount,
    Followers,
    Following,
    Repos,
    Gists,
    Created,
    Updated,
    Stars,
}

impl BadgeKind {
    pub const ALL: [BadgeKind; 8] = [
        BadgeKind::ViewCount,
        BadgeKind::Followers,
        BadgeKind::Following,
        BadgeKind::Repos,
        BadgeKind::Gists,
        BadgeKind::Created,
        BadgeKind::Updated,
        BadgeKind::Stars,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            BadgeKind::ViewCount => "view-count",
            BadgeKind::Followers => "followers",
            BadgeKind::Following => "following",
            BadgeKind::Repos => "repos",
            BadgeKind::Gists => "gists",
            BadgeKind::Created => "created",
            BadgeKind::Updated => "updated",
            BadgeKind::Stars => "stars",
        }
    }

    /// Computed from the local view counter rather than the upstream provider.
    #[must_use]
    pub const fn is_local(self) -> bool {
        matches!(self, BadgeKind::ViewCount)
    }

    /// The view count reflects live, cooldown-gated state and is never cached.
    #[must_use]
    pub const fn is_cacheable(self) -> bool {
        !self.is_local()
    }

    #[must_use]
    pub const fn default_label(self) -> &'static str {
        match self {
            BadgeKind::ViewCount => "profile views",
            BadgeKind::Followers => "followers",
            BadgeKind::Following => "following",
            BadgeKind::Repos => "repos",
            BadgeKind::Gists => "gists",
            BadgeKind::Created => "created",
            BadgeKind::Updated => "updated",
            BadgeKind::Stars => "stars",
        }
    }

    #[must_use]
    pub const fn default_color(self) -> &'static str {
        match self {
            BadgeKind::ViewCount => "#007ec6",
            BadgeKind::Followers => "#4c1",
            BadgeKind::Following => "#97ca00",
            BadgeKind::Repos => "#fe7d37",
            BadgeKind::Gists => "#dfb317",
            BadgeKind::Created | BadgeKind::Updated => "#9f9f9f",
            BadgeKind::Stars => "#dfb317",
        }
    }
}

impl fmt::Display for BadgeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BadgeKind {
    type Err = BadgeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            // `profile-views` is the route name older embeds still use
            "view-count" | "profile-views" => Ok(BadgeKind::ViewCount),
            "followers" => Ok(BadgeKind::Followers),
            "following" => Ok(BadgeKind::Following),
            "repos" => Ok(BadgeKind::Repos),
            "gists" => Ok(BadgeKind::Gists),
            "created" => Ok(BadgeKind::Created),
            "updated" => Ok(BadgeKind::Updated),
            "stars" => Ok(BadgeKind::Stars),
            other => Err(BadgeError::Validation(format!("unknown badge kind: {other}"))),
        }
    }
}

/// Visual style of the rendered badge.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum BadgeStyle {
    #[default]
    Flat,
    FlatSquare,
    Rounded,
}

impl BadgeStyle {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            BadgeStyle::Flat => "flat",
            BadgeStyle::FlatSquare => "flat-square",
            BadgeStyle::Rounded => "rounded",
        }
    }

    /// Lenient parse: anything unrecognised falls back to `flat`.
    #[must_use]
    pub fn parse_or_default(s: Option<&str>) -> Self {
        match s {
            Some("flat-square") => BadgeStyle::FlatSquare,
            Some("rounded") => BadgeStyle::Rounded,
            _ => BadgeStyle::Flat,
        }
    }

    #[must_use]
    pub const fn corner_radius(self) -> u32 {
        match self {
            BadgeStyle::FlatSquare => 0,
            BadgeStyle::Flat => 3,
            BadgeStyle::Rounded => 10,
        }
    }

    #[must_use]
    pub const fn has_gradient(self) -> bool {
        !matches!(self, BadgeStyle::FlatSquare)
    }
}

impl fmt::Display for BadgeStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kinds_round_trip_through_their_path_segment() {
        for kind in BadgeKind::ALL {
            assert_eq!(kind.as_str().parse::<BadgeKind>().unwrap(), kind);
        }
        assert_eq!("profile-views".parse::<BadgeKind>().unwrap(), BadgeKind::ViewCount);
    }

    #[test]
    fn unknown_kind_is_a_validation_error() {
        assert!(matches!("bogus".parse::<BadgeKind>(), Err(BadgeError::Validation(_))));
    }

    #[test]
    fn only_view_count_bypasses_the_cache() {
        let uncached: Vec<_> = BadgeKind::ALL.into_iter().filter(|k| !k.is_cacheable()).collect();
        assert_eq!(uncached, vec![BadgeKind::ViewCount]);
    }

    #[test]
    fn style_parsing_defaults_to_flat() {
        assert_eq!(BadgeStyle::parse_or_default(None), BadgeStyle::Flat);
        assert_eq!(BadgeStyle::parse_or_default(Some("plastic")), BadgeStyle::Flat);
        assert_eq!(BadgeStyle::parse_or_default(Some("rounded")), BadgeStyle::Rounded);
        assert_eq!(BadgeStyle::FlatSquare.corner_radius(), 0);
        assert!(!BadgeStyle::FlatSquare.has_gradient());
        assert!(BadgeStyle::Rounded.has_gradient());
    }
}
