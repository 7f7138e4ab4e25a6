//! RGB565 colors as the panel expects them.

use embedded_graphics_core::pixelcolor::{Rgb565, raw::RawU16};
use embedded_graphics_core::prelude::RawData;

pub const BLACK: Rgb565 = Rgb565::new(0, 0, 0);
pub const WHITE: Rgb565 = Rgb565::new(31, 63, 31);
pub const RED: Rgb565 = Rgb565::new(31, 0, 0);
pub const GREEN: Rgb565 = Rgb565::new(0, 63, 0);
pub const BLUE: Rgb565 = Rgb565::new(0, 0, 31);
pub const CYAN: Rgb565 = Rgb565::new(0, 63, 31);
pub const MAGENTA: Rgb565 = Rgb565::new(31, 0, 31);
pub const YELLOW: Rgb565 = Rgb565::new(31, 63, 0);
/// 0xFC00
pub const ORANGE: Rgb565 = Rgb565::new(31, 32, 0);
/// 0x7BEF
pub const GRAY: Rgb565 = Rgb565::new(15, 31, 15);

/// Pack 8 bit per channel components, dropping the low bits.
pub const fn rgb(r: u8, g: u8, b: u8) -> Rgb565 {
    Rgb565::new(r >> 3, g >> 2, b >> 3)
}

/// Color from its packed 16 bit value.
pub fn from_raw(value: u16) -> Rgb565 {
    Rgb565::from(RawU16::new(value))
}

/// Packed 16 bit value of a color.
pub fn to_raw(color: Rgb565) -> u16 {
    RawU16::from(color).into_inner()
}

/// Bytes of one pixel on the wire (big-endian).
pub fn to_wire(color: Rgb565) -> [u8; 2] {
    to_raw(color).to_be_bytes()
}
