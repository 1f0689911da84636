//! RGB color value type with HSB conversion.
//!
//! Groupings carry a fill color and a font color. Rendering collaborators
//! consume these directly; the clustering palette generates them from HSB
//! coordinates, so the conversion lives here rather than in a UI layer.

use std::fmt;

use serde::{Deserialize, Serialize};

/// 24-bit RGB color.
///
/// # Example
///
/// ```
/// use dsm_core::types::Color;
///
/// let c = Color::new(255, 128, 0);
/// assert_eq!(c.to_hex(), "#ff8000");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Color {
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
}

impl Color {
    /// Opaque white.
    pub const WHITE: Color = Color { r: 255, g: 255, b: 255 };
    /// Opaque black.
    pub const BLACK: Color = Color { r: 0, g: 0, b: 0 };

    /// Create a color from raw channel values.
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Convert HSB coordinates to RGB.
    ///
    /// `hue` wraps modulo 1.0; `saturation` and `brightness` are clamped to
    /// `[0, 1]`. This is the standard hexcone model, matching what AWT-style
    /// toolkits produce for the same inputs.
    ///
    /// # Example
    ///
    /// ```
    /// use dsm_core::types::Color;
    ///
    /// // Zero saturation collapses to a gray of the given brightness.
    /// assert_eq!(Color::from_hsb(0.37, 0.0, 1.0), Color::WHITE);
    /// // Full-saturation primary at hue 0.
    /// assert_eq!(Color::from_hsb(0.0, 1.0, 1.0), Color::new(255, 0, 0));
    /// ```
    pub fn from_hsb(hue: f64, saturation: f64, brightness: f64) -> Self {
        let h = hue.rem_euclid(1.0);
        let s = saturation.clamp(0.0, 1.0);
        let v = brightness.clamp(0.0, 1.0);

        if s <= 0.0 {
            let g = (v * 255.0).round() as u8;
            return Self::new(g, g, g);
        }

        let h6 = h * 6.0;
        let sector = h6.floor() as u32 % 6;
        let f = h6 - h6.floor();
        let p = v * (1.0 - s);
        let q = v * (1.0 - s * f);
        let t = v * (1.0 - s * (1.0 - f));

        let (r, g, b) = match sector {
            0 => (v, t, p),
            1 => (q, v, p),
            2 => (p, v, t),
            3 => (p, q, v),
            4 => (t, p, v),
            _ => (v, p, q),
        };

        Self::new(
            (r * 255.0).round() as u8,
            (g * 255.0).round() as u8,
            (b * 255.0).round() as u8,
        )
    }

    /// Lowercase `#rrggbb` hex form.
    pub fn to_hex(&self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hsb_grayscale() {
        assert_eq!(Color::from_hsb(0.5, 0.0, 0.0), Color::BLACK);
        assert_eq!(Color::from_hsb(0.5, 0.0, 1.0), Color::WHITE);
    }

    #[test]
    fn test_hsb_primaries() {
        assert_eq!(Color::from_hsb(0.0, 1.0, 1.0), Color::new(255, 0, 0));
        assert_eq!(Color::from_hsb(1.0 / 3.0, 1.0, 1.0), Color::new(0, 255, 0));
        assert_eq!(Color::from_hsb(2.0 / 3.0, 1.0, 1.0), Color::new(0, 0, 255));
    }

    #[test]
    fn test_hsb_hue_wraps() {
        assert_eq!(Color::from_hsb(1.25, 1.0, 1.0), Color::from_hsb(0.25, 1.0, 1.0));
        assert_eq!(Color::from_hsb(-0.75, 1.0, 1.0), Color::from_hsb(0.25, 1.0, 1.0));
    }

    #[test]
    fn test_hex_round_trip_format() {
        let c = Color::new(18, 52, 86);
        assert_eq!(c.to_hex(), "#123456");
        assert_eq!(c.to_string(), "#123456");
    }
}
