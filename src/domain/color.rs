use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    pub fn to_hex(self) -> HexColor {
        HexColor(format!("#{:02X}{:02X}{:02X}", self.r, self.g, self.b))
    }

    pub fn to_hsl(self) -> Hsl {
        rgb_to_hsl(self.r, self.g, self.b)
    }
}

/// Hue in degrees (0–359), saturation and lightness in percent (0–100).
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Hsl {
    pub h: u16,
    pub s: u8,
    pub l: u8,
}

/// A color in canonical form: `#` followed by six uppercase hex digits.
///
/// This is the only representation that is stored or compared. RGB and HSL
/// are derived from it on demand.
#[derive(Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct HexColor(String);

#[derive(Debug, Error)]
#[error("invalid color: {0:?} (expected #RRGGBB)")]
pub struct InvalidHexColor(pub String);

impl HexColor {
    pub fn parse(input: &str) -> Option<Self> {
        parse_hex(input).map(Rgb::to_hex)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn rgb(&self) -> Rgb {
        // Canonical strings always hold six hex digits.
        parse_hex(&self.0).unwrap_or(Rgb::new(0, 0, 0))
    }

    pub fn hsl(&self) -> Hsl {
        self.rgb().to_hsl()
    }
}

impl fmt::Display for HexColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for HexColor {
    type Error = InvalidHexColor;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        HexColor::parse(&value).ok_or(InvalidHexColor(value))
    }
}

impl From<HexColor> for String {
    fn from(value: HexColor) -> Self {
        value.0
    }
}

/// Parses `#RRGGBB` or `RRGGBB`, case-insensitive. Anything else is `None`.
pub fn parse_hex(input: &str) -> Option<Rgb> {
    let digits = input.strip_prefix('#').unwrap_or(input);
    let bytes = digits.as_bytes();
    if bytes.len() != 6 {
        return None;
    }

    let r = parse_hex_byte(bytes[0], bytes[1])?;
    let g = parse_hex_byte(bytes[2], bytes[3])?;
    let b = parse_hex_byte(bytes[4], bytes[5])?;
    Some(Rgb { r, g, b })
}

fn parse_hex_byte(hi: u8, lo: u8) -> Option<u8> {
    Some(hex_digit(hi)? << 4 | hex_digit(lo)?)
}

fn hex_digit(c: u8) -> Option<u8> {
    match c {
        b'0'..=b'9' => Some(c - b'0'),
        b'a'..=b'f' => Some(c - b'a' + 10),
        b'A'..=b'F' => Some(c - b'A' + 10),
        _ => None,
    }
}

pub fn rgb_to_hsl(r: u8, g: u8, b: u8) -> Hsl {
    let r = f64::from(r) / 255.0;
    let g = f64::from(g) / 255.0;
    let b = f64::from(b) / 255.0;

    let max = r.max(g).max(b);
    let min = r.min(g).min(b);
    let l = (max + min) / 2.0;

    let (h, s) = if max == min {
        (0.0, 0.0)
    } else {
        let d = max - min;
        let s = if l > 0.5 {
            d / (2.0 - max - min)
        } else {
            d / (max + min)
        };
        let h = if max == r {
            ((g - b) / d + if g < b { 6.0 } else { 0.0 }) / 6.0
        } else if max == g {
            ((b - r) / d + 2.0) / 6.0
        } else {
            ((r - g) / d + 4.0) / 6.0
        };
        (h, s)
    };

    // A hue just below a full turn rounds up to 360, which is the same angle as 0.
    let hue = (h * 360.0).round() as u16 % 360;
    Hsl {
        h: hue,
        s: (s * 100.0).round() as u8,
        l: (l * 100.0).round() as u8,
    }
}

pub fn format_rgb(rgb: Rgb) -> String {
    format!("rgb({}, {}, {})", rgb.r, rgb.g, rgb.b)
}

pub fn format_hsl(hsl: Hsl) -> String {
    format!("hsl({}, {}%, {}%)", hsl.h, hsl.s, hsl.l)
}

pub const CONTRAST_DARK: &str = "#000000";
pub const CONTRAST_LIGHT: &str = "#ffffff";

/// Text color to draw on top of `color`.
///
/// Heuristic, not a colorimetric standard: weighted channel average
/// `(0.299 R + 0.587 G + 0.114 B) / 255`, dark text above 0.5.
pub fn contrast_color(color: &HexColor) -> &'static str {
    let rgb = color.rgb();
    let luminance =
        (0.299 * f64::from(rgb.r) + 0.587 * f64::from(rgb.g) + 0.114 * f64::from(rgb.b)) / 255.0;
    if luminance > 0.5 {
        CONTRAST_DARK
    } else {
        CONTRAST_LIGHT
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_hex_accepts_optional_hash_and_any_case() {
        assert_eq!(parse_hex("#6366f1"), Some(Rgb::new(99, 102, 241)));
        assert_eq!(parse_hex("6366F1"), Some(Rgb::new(99, 102, 241)));
        assert_eq!(parse_hex("#AbCdEf"), Some(Rgb::new(0xAB, 0xCD, 0xEF)));
    }

    #[test]
    fn parse_hex_rejects_malformed_input() {
        for input in ["", "#", "#fff", "#12345", "#1234567", "##123456", "#12345g", " #123456", "#ééé"] {
            assert_eq!(parse_hex(input), None, "input {input:?}");
        }
    }

    #[test]
    fn canonical_form_survives_reserialization() {
        for input in ["#abcdef", "ABCDEF", "#00ff7f", "a0B1c2", "#FFFFFF", "000000"] {
            let canonical = HexColor::parse(input).expect("valid color");
            assert_eq!(canonical.rgb().to_hex(), canonical);
            assert_eq!(canonical.as_str(), format!("#{}", input.trim_start_matches('#').to_uppercase()));
        }
    }

    #[test]
    fn grays_have_no_hue_or_saturation() {
        for v in [0u8, 1, 64, 127, 128, 200, 255] {
            let hsl = rgb_to_hsl(v, v, v);
            assert_eq!(hsl.h, 0);
            assert_eq!(hsl.s, 0);
        }
        assert_eq!(rgb_to_hsl(255, 255, 255).l, 100);
        assert_eq!(rgb_to_hsl(0, 0, 0).l, 0);
    }

    #[test]
    fn converts_indigo_to_hsl() {
        assert_eq!(rgb_to_hsl(99, 102, 241), Hsl { h: 239, s: 84, l: 67 });
    }

    #[test]
    fn converts_primaries_to_hsl() {
        assert_eq!(rgb_to_hsl(255, 0, 0), Hsl { h: 0, s: 100, l: 50 });
        assert_eq!(rgb_to_hsl(0, 255, 0), Hsl { h: 120, s: 100, l: 50 });
        assert_eq!(rgb_to_hsl(0, 0, 255), Hsl { h: 240, s: 100, l: 50 });
        assert_eq!(rgb_to_hsl(255, 0, 255), Hsl { h: 300, s: 100, l: 50 });
    }

    #[test]
    fn red_branch_wraps_hue_when_blue_exceeds_green() {
        // (0 - 1) / 255 + 6 lands just under a full turn.
        assert_eq!(rgb_to_hsl(255, 0, 1).h, 0);
        assert_eq!(rgb_to_hsl(255, 0, 128).h, 330);
    }

    #[test]
    fn formats_rgb_and_hsl() {
        let color = HexColor::parse("#6366F1").expect("valid color");
        assert_eq!(format_rgb(color.rgb()), "rgb(99, 102, 241)");
        assert_eq!(format_hsl(color.hsl()), "hsl(239, 84%, 67%)");
    }

    #[test]
    fn contrast_picks_dark_text_on_light_colors() {
        let white = HexColor::parse("#FFFFFF").expect("valid color");
        let black = HexColor::parse("#000000").expect("valid color");
        assert_eq!(contrast_color(&white), "#000000");
        assert_eq!(contrast_color(&black), "#ffffff");
        let indigo = HexColor::parse("#6366F1").expect("valid color");
        assert_eq!(contrast_color(&indigo), "#ffffff");
        let yellow = HexColor::parse("#FFFF00").expect("valid color");
        assert_eq!(contrast_color(&yellow), "#000000");
    }

    #[test]
    fn serde_uses_canonical_string() {
        let color: HexColor = serde_json::from_str("\"#abcdef\"").expect("deserialize");
        assert_eq!(color.as_str(), "#ABCDEF");
        assert_eq!(serde_json::to_string(&color).expect("serialize"), "\"#ABCDEF\"");
        assert!(serde_json::from_str::<HexColor>("\"tomato\"").is_err());
    }
}
