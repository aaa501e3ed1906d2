//! Linear RGB color with sRGB hex conversion.

use thiserror::Error;

/// Rejected hex color input
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ColorParseError {
    #[error("expected 3 or 6 hex digits, got {0:?}")]
    Length(String),

    #[error("invalid hex digit in {0:?}")]
    Digit(String),
}

/// Color in linear RGB, the space the shader mixes in.
///
/// Hex strings are sRGB-encoded; they are decoded on the way in and
/// re-encoded on the way out.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Color {
    pub const fn new(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }

    /// Parse `#rrggbb`, `rrggbb`, `#rgb` or `rgb`.
    pub fn from_hex(hex: &str) -> Result<Self, ColorParseError> {
        let digits = hex.trim().trim_start_matches('#');
        if !digits.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(ColorParseError::Digit(hex.to_string()));
        }

        let rgb = match digits.len() {
            6 => {
                let channel = |i: usize| u8::from_str_radix(&digits[i..i + 2], 16);
                [channel(0), channel(2), channel(4)]
            }
            3 => {
                // #abc expands to #aabbcc
                let channel = |i: usize| u8::from_str_radix(&digits[i..i + 1], 16).map(|v| v * 17);
                [channel(0), channel(1), channel(2)]
            }
            _ => return Err(ColorParseError::Length(hex.to_string())),
        };

        match rgb {
            [Ok(r), Ok(g), Ok(b)] => Ok(Self::from_srgb_u8([r, g, b])),
            _ => Err(ColorParseError::Digit(hex.to_string())),
        }
    }

    /// Decode 8-bit sRGB channels
    pub fn from_srgb_u8(rgb: [u8; 3]) -> Self {
        let [r, g, b] = rgb.map(|c| srgb_to_linear(c as f32 / 255.0));
        Self { r, g, b }
    }

    /// Encode as 8-bit sRGB channels
    pub fn to_srgb_u8(self) -> [u8; 3] {
        [self.r, self.g, self.b].map(|c| (linear_to_srgb(c) * 255.0).round().clamp(0.0, 255.0) as u8)
    }

    /// Lowercase `#rrggbb`
    pub fn to_hex(self) -> String {
        let [r, g, b] = self.to_srgb_u8();
        format!("#{r:02x}{g:02x}{b:02x}")
    }

    pub fn to_array(self) -> [f32; 3] {
        [self.r, self.g, self.b]
    }
}

fn srgb_to_linear(c: f32) -> f32 {
    if c < 0.04045 {
        c * 0.0773993808
    } else {
        (c * 0.9478672986 + 0.0521327014).powf(2.4)
    }
}

fn linear_to_srgb(c: f32) -> f32 {
    if c < 0.0031308 {
        c * 12.92
    } else {
        1.055 * c.powf(0.41666) - 0.055
    }
}
