use anyhow::{anyhow, Result};
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// RGBA colour with 8 bits per channel. Serialises as a `#RRGGBB` hex string
/// (or `#RRGGBBAA` when not fully opaque), the form colours take everywhere
/// outside the paint buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const WHITE: Color = Color::rgb(0xFF, 0xFF, 0xFF);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 0xFF }
    }

    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Parses `#RRGGBB` or `#RRGGBBAA`, case insensitive. The leading `#` is
    /// required.
    pub fn from_hex(hex: &str) -> Result<Self> {
        let digits = hex
            .strip_prefix('#')
            .ok_or_else(|| anyhow!("colour `{hex}` is missing the leading `#`"))?;
        if digits.len() != 6 && digits.len() != 8 {
            return Err(anyhow!("colour `{hex}` must have 6 or 8 hex digits"));
        }
        let channel = |i: usize| -> Result<u8> {
            u8::from_str_radix(&digits[i..i + 2], 16)
                .map_err(|_| anyhow!("colour `{hex}` contains a non-hex digit"))
        };
        let a = if digits.len() == 8 { channel(6)? } else { 0xFF };
        Ok(Self {
            r: channel(0)?,
            g: channel(2)?,
            b: channel(4)?,
            a,
        })
    }

    pub fn to_hex(self) -> String {
        if self.a == 0xFF {
            format!("#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
        } else {
            format!("#{:02X}{:02X}{:02X}{:02X}", self.r, self.g, self.b, self.a)
        }
    }
}

impl Serialize for Color {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for Color {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Color::from_hex(&raw).map_err(D::Error::custom)
    }
}

/// A named swatch offered by the colour picker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaletteEntry {
    pub name: &'static str,
    pub color: Color,
}

/// The ten preset swatches, in picker order.
pub const PALETTE: [PaletteEntry; 10] = [
    PaletteEntry { name: "Red", color: Color::rgb(0xFF, 0x6B, 0x6B) },
    PaletteEntry { name: "Orange", color: Color::rgb(0xFF, 0xA5, 0x00) },
    PaletteEntry { name: "Yellow", color: Color::rgb(0xFF, 0xD9, 0x3D) },
    PaletteEntry { name: "Green", color: Color::rgb(0x6B, 0xCF, 0x7F) },
    PaletteEntry { name: "Blue", color: Color::rgb(0x4D, 0x96, 0xFF) },
    PaletteEntry { name: "Purple", color: Color::rgb(0xB0, 0x84, 0xCC) },
    PaletteEntry { name: "Pink", color: Color::rgb(0xFF, 0x69, 0xB4) },
    PaletteEntry { name: "Brown", color: Color::rgb(0x8B, 0x45, 0x13) },
    PaletteEntry { name: "Black", color: Color::rgb(0x2C, 0x2C, 0x2C) },
    PaletteEntry { name: "White", color: Color::rgb(0xFF, 0xFF, 0xFF) },
];

/// Brush widths offered by the size picker, thinnest first.
pub const BRUSH_WIDTHS: [u32; 4] = [2, 5, 10, 20];

/// Colour a fresh session starts with (the first palette swatch).
pub const DEFAULT_COLOR: Color = PALETTE[0].color;

/// Width a fresh session starts with.
pub const DEFAULT_WIDTH: u32 = BRUSH_WIDTHS[0];
