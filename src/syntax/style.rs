//! Style types for rendered text
//!
//! Colors are 24-bit RGB, read from `#rrggbb` hex strings. A RunStyle is
//! everything a document run needs besides its text.

use tracing::warn;

/// A 24-bit color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const BLACK: Rgb = Rgb::new(0, 0, 0);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parse `#rrggbb` (the `#` is optional)
    pub fn parse_hex(hex: &str) -> Option<Self> {
        let digits = hex.trim().strip_prefix('#').unwrap_or(hex.trim());
        if digits.len() != 6 || !digits.chars().all(|c| c.is_ascii_hexdigit()) {
            return None;
        }
        let channel = |i: usize| u8::from_str_radix(&digits[i..i + 2], 16).ok();
        Some(Self::new(channel(0)?, channel(2)?, channel(4)?))
    }

    /// Convert a resolved hex color, falling back to black
    ///
    /// Absent or empty input is black without complaint; malformed input is
    /// black with a warning.
    pub fn from_hex_or_black(hex: Option<&str>) -> Self {
        match hex.map(str::trim) {
            None | Some("") => Self::BLACK,
            Some(hex) => Self::parse_hex(hex).unwrap_or_else(|| {
                warn!("Invalid color code {:?}, using black", hex);
                Self::BLACK
            }),
        }
    }

    /// Uppercase hex digits without `#`, as WordprocessingML expects
    pub fn to_hex(&self) -> String {
        format!("{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }
}

/// Text style attributes of a document run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunStyle {
    /// Font family
    pub font: String,
    /// Font size in points
    pub size: u16,
    /// Bold text
    pub bold: bool,
    /// Foreground color
    pub color: Rgb,
}

impl RunStyle {
    /// Create a plain black style
    pub fn new(font: &str, size: u16) -> Self {
        Self {
            font: font.to_string(),
            size,
            bold: false,
            color: Rgb::BLACK,
        }
    }

    /// Builder: set foreground color
    pub fn with_color(mut self, color: Rgb) -> Self {
        self.color = color;
        self
    }

    /// Builder: set bold
    pub fn with_bold(mut self, bold: bool) -> Self {
        self.bold = bold;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_hex() {
        assert_eq!(Rgb::parse_hex("#05cbf7"), Some(Rgb::new(0x05, 0xcb, 0xf7)));
        assert_eq!(Rgb::parse_hex("FCBA03"), Some(Rgb::new(0xfc, 0xba, 0x03)));
        assert_eq!(Rgb::parse_hex("#fff"), None);
        assert_eq!(Rgb::parse_hex("#zzzzzz"), None);
        assert_eq!(Rgb::parse_hex("#ééé"), None);
    }

    #[test]
    fn test_signed_digits_are_rejected() {
        assert_eq!(Rgb::parse_hex("#+f+f+f"), None);
        assert_eq!(Rgb::parse_hex("-1-1-1"), None);
        assert_eq!(Rgb::from_hex_or_black(Some("#+f+f+f")), Rgb::BLACK);
    }

    #[test]
    fn test_black_fallback() {
        assert_eq!(Rgb::from_hex_or_black(None), Rgb::BLACK);
        assert_eq!(Rgb::from_hex_or_black(Some("")), Rgb::BLACK);
        assert_eq!(Rgb::from_hex_or_black(Some("not a color")), Rgb::BLACK);
        assert_eq!(Rgb::from_hex_or_black(Some("#E51D1D")), Rgb::new(0xe5, 0x1d, 0x1d));
    }

    #[test]
    fn test_to_hex() {
        assert_eq!(Rgb::new(0x5b, 0x9b, 0xd5).to_hex(), "5B9BD5");
        assert_eq!(Rgb::BLACK.to_hex(), "000000");
    }

    #[test]
    fn test_style_builders() {
        let style = RunStyle::new("Consolas", 9)
            .with_color(Rgb::new(1, 2, 3))
            .with_bold(true);
        assert_eq!(style.font, "Consolas");
        assert_eq!(style.size, 9);
        assert!(style.bold);
        assert_eq!(style.color, Rgb::new(1, 2, 3));
    }
}
