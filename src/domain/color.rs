use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BoardColor {
    Primary,
    Secondary,
    Success,
    Warning,
    Error,
    Info,
}

impl BoardColor {
    pub fn as_str(&self) -> &'static str {
        match self {
            BoardColor::Primary => "primary",
            BoardColor::Secondary => "secondary",
            BoardColor::Success => "success",
            BoardColor::Warning => "warning",
            BoardColor::Error => "error",
            BoardColor::Info => "info",
        }
    }

    pub fn hex(&self) -> &'static str {
        match self {
            BoardColor::Primary => "#0066cc",
            BoardColor::Secondary => "#f1f2f4",
            BoardColor::Success => "#61bd4f",
            BoardColor::Warning => "#f2d600",
            BoardColor::Error => "#eb5a46",
            BoardColor::Info => "#026aa7",
        }
    }

    pub fn all() -> &'static [BoardColor] {
        &[
            BoardColor::Primary,
            BoardColor::Secondary,
            BoardColor::Success,
            BoardColor::Warning,
            BoardColor::Error,
            BoardColor::Info,
        ]
    }

    /// Parses a stored or submitted color name. Blank and unknown names yield `None`.
    pub fn parse_optional(value: Option<&str>) -> Option<BoardColor> {
        value
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .and_then(|v| v.parse().ok())
    }

    /// Color used to paint a board tile.
    pub fn for_board(stored: Option<&str>) -> BoardColor {
        Self::parse_optional(stored).unwrap_or(BoardColor::Primary)
    }
}

impl fmt::Display for BoardColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for BoardColor {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "primary" => Ok(BoardColor::Primary),
            "secondary" => Ok(BoardColor::Secondary),
            "success" => Ok(BoardColor::Success),
            "warning" => Ok(BoardColor::Warning),
            "error" => Ok(BoardColor::Error),
            "info" => Ok(BoardColor::Info),
            _ => Err(format!("Invalid board color: {}", s)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_known_names() {
        for color in BoardColor::all() {
            assert_eq!(color.as_str().parse::<BoardColor>(), Ok(*color));
        }
    }

    #[test]
    fn test_blank_and_unknown_are_none() {
        assert_eq!(BoardColor::parse_optional(None), None);
        assert_eq!(BoardColor::parse_optional(Some("   ")), None);
        assert_eq!(BoardColor::parse_optional(Some("magenta")), None);
        assert_eq!(
            BoardColor::parse_optional(Some(" success ")),
            Some(BoardColor::Success)
        );
    }

    #[test]
    fn test_tile_color_falls_back_to_primary() {
        assert_eq!(BoardColor::for_board(Some("nope")), BoardColor::Primary);
        assert_eq!(BoardColor::for_board(Some("info")).hex(), "#026aa7");
    }
}
