//! RGBA color values.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Error produced when parsing a hex color string.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("invalid hex color: {input}")]
pub struct ColorParseError {
    pub input: String,
}

/// An RGBA color. Entities store their display color as a value, not a
/// reference into a palette, so history snapshots stay self-contained.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const BLACK: Color = Color::rgb(0, 0, 0);
    pub const WHITE: Color = Color::rgb(255, 255, 255);
    pub const RED: Color = Color::rgb(230, 30, 30);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Parses `#rrggbb` or `#rrggbbaa` (leading `#` optional).
    pub fn from_hex(input: &str) -> Result<Self, ColorParseError> {
        let hex = input.strip_prefix('#').unwrap_or(input);
        let err = || ColorParseError {
            input: input.to_string(),
        };
        let byte = |range: std::ops::Range<usize>| {
            hex.get(range)
                .and_then(|s| u8::from_str_radix(s, 16).ok())
                .ok_or_else(err)
        };
        match hex.len() {
            6 => Ok(Color::rgb(byte(0..2)?, byte(2..4)?, byte(4..6)?)),
            8 => Ok(Color::rgba(
                byte(0..2)?,
                byte(2..4)?,
                byte(4..6)?,
                byte(6..8)?,
            )),
            _ => Err(err()),
        }
    }

    pub fn to_hex(&self) -> String {
        if self.a == 255 {
            format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
        } else {
            format!("#{:02x}{:02x}{:02x}{:02x}", self.r, self.g, self.b, self.a)
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}
