use serde::{Deserialize, Serialize};
use std::fmt;

/// An opaque color, one byte per channel.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Rgb {
        Rgb { r, g, b }
    }

    /// Build a color from a hexadecimal u32
    /// Example: 0x26CCFF - a light blue
    pub const fn from_hex(hex: u32) -> Rgb {
        let bytes: [u8; 4] = hex.to_be_bytes();

        Self::new(bytes[1], bytes[2], bytes[3])
    }

    pub fn with_alpha(self, alpha: f64) -> FillStyle {
        FillStyle { color: self, alpha }
    }
}

/// Parse a hex color such as `#ff5e7e` or `#f0a`.
///
/// Every character that is not a hex digit is ignored. Fewer than six
/// remaining digits are read as shorthand (`abc` -> `aabbcc`), and digits
/// that are still missing count as `0`, so any input maps to some color.
pub fn parse_color(value: &str) -> Rgb {
    let mut digits: Vec<u8> = value
        .chars()
        .filter_map(|c| c.to_digit(16))
        .map(|d| d as u8)
        .collect();

    if digits.len() < 6 {
        let at = |i: usize| digits.get(i).copied().unwrap_or(0);
        digits = vec![at(0), at(0), at(1), at(1), at(2), at(2)];
    }

    let byte = |i: usize| digits[i] << 4 | digits[i + 1];
    Rgb::new(byte(0), byte(2), byte(4))
}

/// A translucent fill, formatted the way a 2D canvas expects its `fillStyle`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FillStyle {
    pub color: Rgb,
    pub alpha: f64,
}

impl fmt::Display for FillStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Rgb { r, g, b } = self.color;
        write!(f, "rgba({}, {}, {}, {})", r, g, b, self.alpha)
    }
}

pub mod colors {
    //! The stock confetti palette.
    use super::Rgb;

    pub const SKY: Rgb = Rgb::from_hex(0x26ccff);
    pub const LAVENDER: Rgb = Rgb::from_hex(0xa25afd);
    pub const SALMON: Rgb = Rgb::from_hex(0xff5e7e);
    pub const LIME: Rgb = Rgb::from_hex(0x88ff5a);
    pub const LEMON: Rgb = Rgb::from_hex(0xfcff42);
    pub const TANGERINE: Rgb = Rgb::from_hex(0xffa62d);
    pub const FUCHSIA: Rgb = Rgb::from_hex(0xff36ff);

    /// Default `colors` option, in launch order.
    pub const PALETTE: [Rgb; 7] = [SKY, LAVENDER, SALMON, LIME, LEMON, TANGERINE, FUCHSIA];
}
