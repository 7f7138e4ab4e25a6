//! Fixed 5×7 monospace font and text drawing.
//!
//! Each glyph is five column bytes, bit `n` of a column is row `n` from the
//! top. Text cells are 6×8 pixels: one spacing column and one spacing row.

use embedded_graphics_core::pixelcolor::Rgb565;

use crate::graphics::{Canvas, misses};

pub const GLYPH_WIDTH: u8 = 5;
pub const GLYPH_HEIGHT: u8 = 7;
/// Horizontal advance per character, spacing column included.
pub const CHAR_ADVANCE: u8 = GLYPH_WIDTH + 1;
/// Vertical advance per line, spacing row included.
pub const LINE_ADVANCE: u8 = GLYPH_HEIGHT + 1;

/// Printable ASCII, 32 (space) through 127.
pub const FONT_5X7: [[u8; 5]; 96] = [
    [0x00, 0x00, 0x00, 0x00, 0x00], // space
    [0x00, 0x00, 0x5F, 0x00, 0x00], // !
    [0x00, 0x07, 0x00, 0x07, 0x00], // "
    [0x14, 0x7F, 0x14, 0x7F, 0x14], // #
    [0x24, 0x2A, 0x7F, 0x2A, 0x12], // $
    [0x23, 0x13, 0x08, 0x64, 0x62], // %
    [0x36, 0x49, 0x55, 0x22, 0x50], // &
    [0x00, 0x05, 0x03, 0x00, 0x00], // '
    [0x00, 0x1C, 0x22, 0x41, 0x00], // (
    [0x00, 0x41, 0x22, 0x1C, 0x00], // )
    [0x08, 0x2A, 0x1C, 0x2A, 0x08], // *
    [0x08, 0x08, 0x3E, 0x08, 0x08], // +
    [0x00, 0x50, 0x30, 0x00, 0x00], // ,
    [0x08, 0x08, 0x08, 0x08, 0x08], // -
    [0x00, 0x60, 0x60, 0x00, 0x00], // .
    [0x20, 0x10, 0x08, 0x04, 0x02], // /
    [0x3E, 0x51, 0x49, 0x45, 0x3E], // 0
    [0x00, 0x42, 0x7F, 0x40, 0x00], // 1
    [0x42, 0x61, 0x51, 0x49, 0x46], // 2
    [0x21, 0x41, 0x45, 0x4B, 0x31], // 3
    [0x18, 0x14, 0x12, 0x7F, 0x10], // 4
    [0x27, 0x45, 0x45, 0x45, 0x39], // 5
    [0x3C, 0x4A, 0x49, 0x49, 0x30], // 6
    [0x01, 0x71, 0x09, 0x05, 0x03], // 7
    [0x36, 0x49, 0x49, 0x49, 0x36], // 8
    [0x06, 0x49, 0x49, 0x29, 0x1E], // 9
    [0x00, 0x36, 0x36, 0x00, 0x00], // :
    [0x00, 0x56, 0x36, 0x00, 0x00], // ;
    [0x00, 0x08, 0x14, 0x22, 0x41], // <
    [0x14, 0x14, 0x14, 0x14, 0x14], // =
    [0x41, 0x22, 0x14, 0x08, 0x00], // >
    [0x02, 0x01, 0x51, 0x09, 0x06], // ?
    [0x32, 0x49, 0x79, 0x41, 0x3E], // @
    [0x7E, 0x11, 0x11, 0x11, 0x7E], // A
    [0x7F, 0x49, 0x49, 0x49, 0x36], // B
    [0x3E, 0x41, 0x41, 0x41, 0x22], // C
    [0x7F, 0x41, 0x41, 0x22, 0x1C], // D
    [0x7F, 0x49, 0x49, 0x49, 0x41], // E
    [0x7F, 0x09, 0x09, 0x01, 0x01], // F
    [0x3E, 0x41, 0x41, 0x51, 0x32], // G
    [0x7F, 0x08, 0x08, 0x08, 0x7F], // H
    [0x00, 0x41, 0x7F, 0x41, 0x00], // I
    [0x20, 0x40, 0x41, 0x3F, 0x01], // J
    [0x7F, 0x08, 0x14, 0x22, 0x41], // K
    [0x7F, 0x40, 0x40, 0x40, 0x40], // L
    [0x7F, 0x02, 0x04, 0x02, 0x7F], // M
    [0x7F, 0x04, 0x08, 0x10, 0x7F], // N
    [0x3E, 0x41, 0x41, 0x41, 0x3E], // O
    [0x7F, 0x09, 0x09, 0x09, 0x06], // P
    [0x3E, 0x41, 0x51, 0x21, 0x5E], // Q
    [0x7F, 0x09, 0x19, 0x29, 0x46], // R
    [0x46, 0x49, 0x49, 0x49, 0x31], // S
    [0x01, 0x01, 0x7F, 0x01, 0x01], // T
    [0x3F, 0x40, 0x40, 0x40, 0x3F], // U
    [0x1F, 0x20, 0x40, 0x20, 0x1F], // V
    [0x7F, 0x20, 0x18, 0x20, 0x7F], // W
    [0x63, 0x14, 0x08, 0x14, 0x63], // X
    [0x03, 0x04, 0x78, 0x04, 0x03], // Y
    [0x61, 0x51, 0x49, 0x45, 0x43], // Z
    [0x00, 0x00, 0x7F, 0x41, 0x41], // [
    [0x02, 0x04, 0x08, 0x10, 0x20], // backslash
    [0x41, 0x41, 0x7F, 0x00, 0x00], // ]
    [0x04, 0x02, 0x01, 0x02, 0x04], // ^
    [0x40, 0x40, 0x40, 0x40, 0x40], // _
    [0x00, 0x01, 0x02, 0x04, 0x00], // `
    [0x20, 0x54, 0x54, 0x54, 0x78], // a
    [0x7F, 0x48, 0x44, 0x44, 0x38], // b
    [0x38, 0x44, 0x44, 0x44, 0x20], // c
    [0x38, 0x44, 0x44, 0x48, 0x7F], // d
    [0x38, 0x54, 0x54, 0x54, 0x18], // e
    [0x08, 0x7E, 0x09, 0x01, 0x02], // f
    [0x08, 0x14, 0x54, 0x54, 0x3C], // g
    [0x7F, 0x08, 0x04, 0x04, 0x78], // h
    [0x00, 0x44, 0x7D, 0x40, 0x00], // i
    [0x20, 0x40, 0x44, 0x3D, 0x00], // j
    [0x00, 0x7F, 0x10, 0x28, 0x44], // k
    [0x00, 0x41, 0x7F, 0x40, 0x00], // l
    [0x7C, 0x04, 0x18, 0x04, 0x78], // m
    [0x7C, 0x08, 0x04, 0x04, 0x78], // n
    [0x38, 0x44, 0x44, 0x44, 0x38], // o
    [0x7C, 0x14, 0x14, 0x14, 0x08], // p
    [0x08, 0x14, 0x14, 0x18, 0x7C], // q
    [0x7C, 0x08, 0x04, 0x04, 0x08], // r
    [0x48, 0x54, 0x54, 0x54, 0x20], // s
    [0x04, 0x3F, 0x44, 0x40, 0x20], // t
    [0x3C, 0x40, 0x40, 0x20, 0x7C], // u
    [0x1C, 0x20, 0x40, 0x20, 0x1C], // v
    [0x3C, 0x40, 0x30, 0x40, 0x3C], // w
    [0x44, 0x28, 0x10, 0x28, 0x44], // x
    [0x0C, 0x50, 0x50, 0x50, 0x3C], // y
    [0x44, 0x64, 0x54, 0x4C, 0x44], // z
    [0x00, 0x08, 0x36, 0x41, 0x00], // {
    [0x00, 0x00, 0x7F, 0x00, 0x00], // |
    [0x00, 0x41, 0x36, 0x08, 0x00], // }
    [0x08, 0x08, 0x2A, 0x1C, 0x08], // ~
    [0x00, 0x00, 0x00, 0x00, 0x00], // DEL
];

/// Glyph for a character. Anything outside 32..=127 renders as '?'.
pub fn glyph(ch: char) -> &'static [u8; 5] {
    let code = match u32::from(ch) {
        code @ 32..=127 => code,
        _ => u32::from('?'),
    };
    &FONT_5X7[(code - 32) as usize]
}

#[maybe_async_cfg::maybe(
    sync(cfg(not(feature = "async")), self = "Text",),
    async(feature = "async", keep_self)
)]
/// Bitmap text on any [`Canvas`].
///
/// Passing the same color as foreground and background draws transparent
/// text: background pixels, spacing column included, are left untouched.
#[allow(async_fn_in_trait)]
pub trait Text: Canvas {
    async fn draw_char(
        &mut self,
        x: i32,
        y: i32,
        ch: char,
        color: Rgb565,
        bg: Rgb565,
        scale: u8,
    ) -> Result<(), Self::Error> {
        if scale == 0 {
            return Ok(());
        }
        let cell = (
            i64::from(x) + i64::from(CHAR_ADVANCE) * i64::from(scale) - 1,
            i64::from(y) + i64::from(GLYPH_HEIGHT) * i64::from(scale) - 1,
        );
        if misses(self.width(), self.height(), (x.into(), y.into()), cell) {
            return Ok(());
        }
        let size = i32::from(scale);
        let opaque = bg != color;

        for (col, &bits) in (0i32..).zip(glyph(ch)) {
            for row in 0..i32::from(GLYPH_HEIGHT) {
                let px = if bits & (1 << row) != 0 {
                    color
                } else if opaque {
                    bg
                } else {
                    continue;
                };

                if scale == 1 {
                    self.draw_pixel(x + col, y + row, px).await?;
                } else {
                    self.fill_rect(x + col * size, y + row * size, scale.into(), scale.into(), px)
                        .await?;
                }
            }
        }

        if opaque {
            let spacing_x = x + i32::from(GLYPH_WIDTH) * size;
            let height = u16::from(GLYPH_HEIGHT) * u16::from(scale);
            self.fill_rect(spacing_x, y, scale.into(), height, bg).await?;
        }
        Ok(())
    }

    /// Draw a string. `'\n'` returns to the starting column one line down;
    /// there is no wrapping.
    async fn draw_string(
        &mut self,
        x: i32,
        y: i32,
        text: &str,
        color: Rgb565,
        bg: Rgb565,
        scale: u8,
    ) -> Result<(), Self::Error> {
        let advance = i32::from(CHAR_ADVANCE) * i32::from(scale);
        let line_height = i32::from(LINE_ADVANCE) * i32::from(scale);
        let (mut cursor_x, mut cursor_y) = (x, y);

        for ch in text.chars() {
            if ch == '\n' {
                cursor_x = x;
                cursor_y = cursor_y.saturating_add(line_height);
            } else {
                self.draw_char(cursor_x, cursor_y, ch, color, bg, scale).await?;
                cursor_x = cursor_x.saturating_add(advance);
            }
        }
        Ok(())
    }
}

impl<C: Canvas + ?Sized> Text for C {}
