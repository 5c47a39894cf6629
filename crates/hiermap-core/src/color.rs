//! Color representation and parsing of node color strings.

use serde::{Deserialize, Serialize};
use std::str::FromStr;
use thiserror::Error;

/// RGBA color with values in the range [0.0, 1.0].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Color {
    /// Red component [0.0, 1.0]
    pub r: f32,
    /// Green component [0.0, 1.0]
    pub g: f32,
    /// Blue component [0.0, 1.0]
    pub b: f32,
    /// Alpha component [0.0, 1.0]
    pub a: f32,
}

impl Color {
    /// Create a new color, clamping values to [0.0, 1.0].
    #[must_use]
    pub fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self {
            r: r.clamp(0.0, 1.0),
            g: g.clamp(0.0, 1.0),
            b: b.clamp(0.0, 1.0),
            a: a.clamp(0.0, 1.0),
        }
    }

    /// Create an opaque color from RGB values.
    #[must_use]
    pub fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self::new(r, g, b, 1.0)
    }

    /// Create an opaque color from 8-bit channels.
    #[must_use]
    pub fn rgb8(r: u8, g: u8, b: u8) -> Self {
        Self::rgb(f32::from(r) / 255.0, f32::from(g) / 255.0, f32::from(b) / 255.0)
    }

    /// Parse a hex color string (e.g., "#ff0000", "f00" or "ff000080").
    ///
    /// # Errors
    ///
    /// Returns an error if the string is not a valid hex color.
    pub fn from_hex(hex: &str) -> Result<Self, ColorParseError> {
        let hex = hex.trim_start_matches('#');
        if !hex.is_ascii() {
            return Err(ColorParseError::InvalidHex);
        }
        let channel = |s: &str| u8::from_str_radix(s, 16).map_err(|_| ColorParseError::InvalidHex);

        match hex.len() {
            3 => {
                let r = channel(&hex[0..1])?;
                let g = channel(&hex[1..2])?;
                let b = channel(&hex[2..3])?;
                Ok(Self::rgb8(r * 17, g * 17, b * 17))
            }
            6 => Ok(Self::rgb8(
                channel(&hex[0..2])?,
                channel(&hex[2..4])?,
                channel(&hex[4..6])?,
            )),
            8 => {
                let base = Self::rgb8(
                    channel(&hex[0..2])?,
                    channel(&hex[2..4])?,
                    channel(&hex[4..6])?,
                );
                let a = channel(&hex[6..8])?;
                Ok(base.with_alpha(f32::from(a) / 255.0))
            }
            _ => Err(ColorParseError::InvalidLength),
        }
    }

    /// Parse a CSS-style `rgb(r, g, b)` or `rgba(r, g, b, a)` string.
    fn from_css_function(s: &str) -> Result<Self, ColorParseError> {
        let (body, has_alpha) = if let Some(rest) = s.strip_prefix("rgba(") {
            (rest, true)
        } else if let Some(rest) = s.strip_prefix("rgb(") {
            (rest, false)
        } else {
            return Err(ColorParseError::UnknownFormat(s.to_string()));
        };
        let body = body
            .strip_suffix(')')
            .ok_or_else(|| ColorParseError::UnknownFormat(s.to_string()))?;
        let parts: Vec<&str> = body.split(',').map(str::trim).collect();
        let expected = if has_alpha { 4 } else { 3 };
        if parts.len() != expected {
            return Err(ColorParseError::InvalidComponents(s.to_string()));
        }

        let mut channels = [0.0f32; 3];
        for (slot, part) in channels.iter_mut().zip(&parts) {
            let v: f32 = part
                .parse()
                .map_err(|_| ColorParseError::InvalidComponents(s.to_string()))?;
            *slot = v / 255.0;
        }
        let alpha = if has_alpha {
            parts[3]
                .parse()
                .map_err(|_| ColorParseError::InvalidComponents(s.to_string()))?
        } else {
            1.0
        };
        Ok(Self::new(channels[0], channels[1], channels[2], alpha))
    }

    /// Return this color with a different alpha.
    #[must_use]
    pub fn with_alpha(self, a: f32) -> Self {
        Self::new(self.r, self.g, self.b, a)
    }

    /// Convert to hex string (RGB only).
    #[must_use]
    pub fn to_hex(&self) -> String {
        format!(
            "#{:02x}{:02x}{:02x}",
            (self.r * 255.0).round() as u8,
            (self.g * 255.0).round() as u8,
            (self.b * 255.0).round() as u8
        )
    }

    /// RGB channels widened for numeric interpolation.
    #[must_use]
    pub fn rgb_components(&self) -> [f64; 3] {
        [f64::from(self.r), f64::from(self.g), f64::from(self.b)]
    }

    /// Linear interpolation between two colors.
    #[must_use]
    pub fn lerp(&self, other: &Self, t: f32) -> Self {
        let t = t.clamp(0.0, 1.0);
        Self::new(
            self.r + (other.r - self.r) * t,
            self.g + (other.g - self.g) * t,
            self.b + (other.b - self.b) * t,
            self.a + (other.a - self.a) * t,
        )
    }

    /// Black color
    pub const BLACK: Self = Self {
        r: 0.0,
        g: 0.0,
        b: 0.0,
        a: 1.0,
    };
    /// White color
    pub const WHITE: Self = Self {
        r: 1.0,
        g: 1.0,
        b: 1.0,
        a: 1.0,
    };
    /// Neutral gray used when a node's color string cannot be parsed.
    pub const FALLBACK: Self = Self {
        r: 0.6,
        g: 0.6,
        b: 0.6,
        a: 1.0,
    };
}

impl Default for Color {
    fn default() -> Self {
        Self::FALLBACK
    }
}

impl FromStr for Color {
    type Err = ColorParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            return Err(ColorParseError::Empty);
        }
        if s.starts_with('#') {
            return Self::from_hex(s);
        }
        let lower = s.to_ascii_lowercase();
        if lower.starts_with("rgb") {
            return Self::from_css_function(&lower);
        }
        match lower.as_str() {
            "black" => Ok(Self::BLACK),
            "white" => Ok(Self::WHITE),
            "red" => Ok(Self::rgb8(255, 0, 0)),
            "green" => Ok(Self::rgb8(0, 128, 0)),
            "blue" => Ok(Self::rgb8(0, 0, 255)),
            "yellow" => Ok(Self::rgb8(255, 255, 0)),
            "orange" => Ok(Self::rgb8(255, 165, 0)),
            "purple" => Ok(Self::rgb8(128, 0, 128)),
            "gray" | "grey" => Ok(Self::rgb8(128, 128, 128)),
            "transparent" => Ok(Self::new(0.0, 0.0, 0.0, 0.0)),
            _ => Self::from_hex(&lower)
                .map_err(|_| ColorParseError::UnknownFormat(s.to_string())),
        }
    }
}

/// Error type for color parsing.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ColorParseError {
    /// Empty color string
    #[error("empty color string")]
    Empty,
    /// Invalid hex characters
    #[error("invalid hex characters")]
    InvalidHex,
    /// Invalid string length
    #[error("invalid hex string length (expected 3, 6 or 8)")]
    InvalidLength,
    /// Malformed `rgb()`/`rgba()` components
    #[error("invalid color components in '{0}'")]
    InvalidComponents(String),
    /// Not a recognized color notation
    #[error("unrecognized color '{0}'")]
    UnknownFormat(String),
}
