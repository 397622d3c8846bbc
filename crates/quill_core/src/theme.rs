//! Theme parameters consumed on every render.
//!
//! Only values validated here are interpolated into the generated stylesheet,
//! which keeps the template free of caller-controlled CSS.

use colors_transform::{Color, Rgb};
use serde::{Deserialize, Serialize};
use std::fmt;

/// How much lightness (in percent) the alternating table rows lose.
pub const DARKER_SHADE_PERCENT: f32 = 5.0;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ThemeError {
    #[error("invalid hex color: {0:?}")]
    InvalidHex(String),
}

/// A CSS hex color, `#rgb` or `#rrggbb`, kept exactly as supplied.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct HexColor(String);

impl HexColor {
    /// Parses a hex color.
    ///
    /// # Examples
    ///
    /// ```
    /// use quill_core::theme::HexColor;
    ///
    /// assert_eq!(HexColor::parse("#1E1E1E").unwrap().as_str(), "#1E1E1E");
    /// assert!(HexColor::parse("red").is_err());
    /// assert!(HexColor::parse("#12345").is_err());
    /// ```
    pub fn parse(s: &str) -> Result<Self, ThemeError> {
        let invalid = || ThemeError::InvalidHex(s.to_string());

        let digits = s.strip_prefix('#').ok_or_else(invalid)?;
        if !matches!(digits.len(), 3 | 6) || !digits.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(invalid());
        }

        Ok(Self(s.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    fn to_rgb(&self) -> Rgb {
        let digits = &self.0[1..];
        // Expand the shorthand form, `#abc` -> `#aabbcc`.
        let full = if digits.len() == 3 {
            digits.chars().flat_map(|c| [c, c]).collect::<String>()
        } else {
            digits.to_string()
        };

        // Infallible after `parse`, fall back to black just in case.
        Rgb::from_hex_str(&format!("#{full}"))
            .unwrap_or_else(|_| Rgb::from_tuple(&(0.0, 0.0, 0.0)))
    }

    /// Returns a darker shade of this color, as a `#rrggbb` string.
    ///
    /// The result only depends on `self`.
    pub fn darker(&self) -> HexColor {
        let shade = self.to_rgb().lighten(-DARKER_SHADE_PERCENT);
        Self(shade.to_css_hex_string())
    }
}

impl fmt::Display for HexColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Named colors of the active theme.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ThemePalette {
    pub background: HexColor,
    pub text: HexColor,
    pub code: HexColor,
}

impl Default for ThemePalette {
    fn default() -> Self {
        Self {
            background: HexColor("#ffffff".into()),
            text: HexColor("#24292e".into()),
            code: HexColor("#f6f8fa".into()),
        }
    }
}

impl ThemePalette {
    /// Background of every other table row.
    pub fn darker_background(&self) -> HexColor {
        self.background.darker()
    }
}

/// Everything the theme provider and the preferences contribute to a render.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Appearance {
    pub palette: ThemePalette,
    /// Let the host window draw the background.
    pub use_system_appearance: bool,
}

impl Appearance {
    pub fn body_background(&self) -> &str {
        if self.use_system_appearance {
            "transparent"
        } else {
            self.palette.background.as_str()
        }
    }
}

/// Writing direction hint for the document body.
///
/// Deserializes leniently through [`TextDirection::from_hint`], an unrecognized
/// value is natural.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", from = "String")]
pub enum TextDirection {
    #[default]
    Natural,
    RightToLeft,
}

impl From<String> for TextDirection {
    fn from(hint: String) -> Self {
        Self::from_hint(Some(&hint))
    }
}

impl TextDirection {
    /// Maps a free-form hint, anything but right-to-left is natural.
    ///
    /// ```
    /// use quill_core::theme::TextDirection;
    ///
    /// assert_eq!(TextDirection::from_hint(Some("RTL")), TextDirection::RightToLeft);
    /// assert_eq!(TextDirection::from_hint(Some("ltr")), TextDirection::Natural);
    /// assert_eq!(TextDirection::from_hint(None), TextDirection::Natural);
    /// ```
    pub fn from_hint(hint: Option<&str>) -> Self {
        match hint.map(|s| s.trim().to_ascii_lowercase()).as_deref() {
            Some("rtl") | Some("right-to-left") => Self::RightToLeft,
            _ => Self::Natural,
        }
    }

    /// Value of the `dir` attribute on `<body>`.
    pub fn html_dir(&self) -> &'static str {
        match self {
            Self::RightToLeft => "rtl",
            Self::Natural => "auto",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_hex_color() {
        assert!(HexColor::parse("#fff").is_ok());
        assert!(HexColor::parse("#A1b2C3").is_ok());

        for invalid in ["", "#", "fff", "#ffff", "#gggggg", "#fff; }", "transparent"] {
            assert_eq!(
                HexColor::parse(invalid),
                Err(ThemeError::InvalidHex(invalid.to_string()))
            );
        }
    }

    #[test]
    fn test_darker_is_deterministic() {
        let color = HexColor::parse("#808080").unwrap();
        assert_eq!(color.darker(), color.darker());
        assert_ne!(color.darker(), color);
        assert!(color.darker().as_str().starts_with('#'));
    }

    #[test]
    fn test_darker_shorthand_matches_full_form() {
        let short = HexColor::parse("#fff").unwrap();
        let full = HexColor::parse("#ffffff").unwrap();
        assert_eq!(short.darker(), full.darker());
    }

    #[test]
    fn test_body_background() {
        let mut appearance = Appearance::default();
        assert_eq!(appearance.body_background(), "#ffffff");

        appearance.use_system_appearance = true;
        assert_eq!(appearance.body_background(), "transparent");
    }

    #[test]
    fn test_html_dir() {
        assert_eq!(TextDirection::RightToLeft.html_dir(), "rtl");
        assert_eq!(TextDirection::Natural.html_dir(), "auto");
        assert_eq!(TextDirection::default().html_dir(), "auto");
        assert_eq!(
            TextDirection::from_hint(Some("right-to-left")).html_dir(),
            "rtl"
        );
        assert_eq!(TextDirection::from_hint(Some("")).html_dir(), "auto");
    }
}
