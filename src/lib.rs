#![no_std]

#[cfg(test)]
extern crate std;

mod fmt;

pub mod color;
pub mod font;
pub mod graphics;
pub mod instruction;
pub mod panel;
pub mod table;

#[cfg(test)]
mod mock;

use core::convert::Infallible;

pub use embedded_graphics_core::pixelcolor::Rgb565;
use embedded_hal::digital::{ErrorType, OutputPin};
#[cfg(not(feature = "async"))]
use embedded_hal::spi::SpiDevice;
#[cfg(feature = "async")]
use embedded_hal_async::spi::SpiDevice;

pub use font::Text;
pub use graphics::Canvas;
pub use instruction::Instruction;
pub use panel::{AddressWindow, PANEL_HEIGHT, PANEL_WIDTH, PanelState, Rotation};
pub use table::Table;

// Scratch buffer for one scanline at the widest rotation
pub const BUF_SIZE: usize = PANEL_WIDTH as usize * 2;

#[derive(Debug, Clone, Copy)]
pub struct Config {
    /// RGB subpixel order. The Mini TFT panel is BGR.
    pub rgb: bool,
    /// Send display inversion on during init. The Mini TFT panel needs it
    /// for true colors.
    pub inverted: bool,
    pub rotation: Rotation,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            rgb: false,
            inverted: true,
            rotation: Rotation::Landscape,
        }
    }
}

#[derive(Debug)]
pub enum Error<E = ()> {
    /// Communication error
    Comm(E),
    /// Pin setting error
    Pin(Infallible),
    /// Scratch buffer cannot hold one scanline
    Buffer { required: usize, available: usize },
}

/// Placeholder for boards without a controllable backlight.
pub struct NoBacklight;

impl ErrorType for NoBacklight {
    type Error = Infallible;
}

impl OutputPin for NoBacklight {
    fn set_low(&mut self) -> Result<(), Infallible> {
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Infallible> {
        Ok(())
    }
}

pub struct ST7735S<'b, SPI, DC, RST, BL, TIMER>
where
    SPI: SpiDevice,
    DC: OutputPin<Error = Infallible>,
    RST: OutputPin<Error = Infallible>,
    BL: OutputPin<Error = Infallible>,
    TIMER: Timer,
{
    spi: SPI,
    dc: DC,
    rst: RST,
    backlight: Option<BL>,
    config: Config,
    state: PanelState,
    buffer: &'b mut [u8],
    _timer: core::marker::PhantomData<TIMER>,
}

impl<'b, SPI, DC, RST, TIMER> ST7735S<'b, SPI, DC, RST, NoBacklight, TIMER>
where
    SPI: SpiDevice,
    DC: OutputPin<Error = Infallible>,
    RST: OutputPin<Error = Infallible>,
    TIMER: Timer,
{
    /// `buffer` holds one scanline at a time, [`BUF_SIZE`] covers every rotation.
    pub fn new(config: Config, spi: SPI, dc: DC, rst: RST, buffer: &'b mut [u8]) -> Self {
        Self {
            spi,
            dc,
            rst,
            backlight: None,
            config,
            state: PanelState::new(config.rotation, config.inverted),
            buffer,
            _timer: core::marker::PhantomData,
        }
    }

    /// Attach a backlight pin, switched on by [`ST7735S::init`].
    pub fn with_backlight<BL>(self, backlight: BL) -> ST7735S<'b, SPI, DC, RST, BL, TIMER>
    where
        BL: OutputPin<Error = Infallible>,
    {
        ST7735S {
            spi: self.spi,
            dc: self.dc,
            rst: self.rst,
            backlight: Some(backlight),
            config: self.config,
            state: self.state,
            buffer: self.buffer,
            _timer: core::marker::PhantomData,
        }
    }
}

impl<'b, SPI, DC, RST, BL, TIMER> ST7735S<'b, SPI, DC, RST, BL, TIMER>
where
    SPI: SpiDevice,
    DC: OutputPin<Error = Infallible>,
    RST: OutputPin<Error = Infallible>,
    BL: OutputPin<Error = Infallible>,
    TIMER: Timer,
{
    /// Logical width for the current rotation.
    pub fn width(&self) -> u16 {
        self.state.width()
    }

    /// Logical height for the current rotation.
    pub fn height(&self) -> u16 {
        self.state.height()
    }

    pub fn rotation(&self) -> Rotation {
        self.state.rotation()
    }

    pub fn is_inverted(&self) -> bool {
        self.state.inverted()
    }

    pub fn config(&self) -> Config {
        self.config
    }

    /// Give back the bus and pins.
    pub fn release(self) -> (SPI, DC, RST, Option<BL>) {
        (self.spi, self.dc, self.rst, self.backlight)
    }
}

#[maybe_async_cfg::maybe(
    sync(cfg(not(feature = "async")), self = "ST7735S",),
    async(feature = "async", keep_self)
)]
impl<'b, SPI, DC, RST, BL, E, TIMER> ST7735S<'b, SPI, DC, RST, BL, TIMER>
where
    SPI: SpiDevice<Error = E>,
    DC: OutputPin<Error = Infallible>,
    RST: OutputPin<Error = Infallible>,
    BL: OutputPin<Error = Infallible>,
    TIMER: Timer,
{
    /// Reset the panel and run the vendor init sequence. The delays are
    /// minimums required by the controller.
    pub async fn init(&mut self) -> Result<(), Error<E>> {
        info!(
            "ST7735S init: {}x{}, rotation {}",
            self.state.width(),
            self.state.height(),
            self.state.rotation().degrees()
        );

        if let Some(backlight) = self.backlight.as_mut() {
            backlight.set_high().map_err(Error::Pin)?;
            debug!("backlight on");
        }

        // Hardware reset first
        self.reset().await?;

        self.write_command(Instruction::SoftwareReset, &[]).await?;
        TIMER::delay_ms(150).await;
        self.write_command(Instruction::SleepOut, &[]).await?;
        TIMER::delay_ms(500).await;

        // Frame rate for normal, idle and partial mode
        self.write_command(Instruction::FrameRateControl1, &[0x01, 0x2C, 0x2D])
            .await?;
        self.write_command(Instruction::FrameRateControl2, &[0x01, 0x2C, 0x2D])
            .await?;
        self.write_command(
            Instruction::FrameRateControl3,
            &[0x01, 0x2C, 0x2D, 0x01, 0x2C, 0x2D],
        )
        .await?;
        self.write_command(Instruction::InversionControl, &[0x07]).await?;

        // Power sequence
        self.write_command(Instruction::PowerControl1, &[0xA2, 0x02, 0x84])
            .await?;
        self.write_command(Instruction::PowerControl2, &[0xC5]).await?;
        self.write_command(Instruction::PowerControl3, &[0x0A, 0x00])
            .await?;
        self.write_command(Instruction::PowerControl4, &[0x8A, 0x2A])
            .await?;
        self.write_command(Instruction::PowerControl5, &[0x8A, 0xEE])
            .await?;
        self.write_command(Instruction::VcomControl1, &[0x0E]).await?;

        let inversion = if self.config.inverted {
            Instruction::DisplayInversionOn
        } else {
            Instruction::DisplayInversionOff
        };
        self.write_command(inversion, &[]).await?;

        let madctl = self.state.madctl(self.config.rgb);
        self.write_command(Instruction::MemoryAccessControl, &[madctl])
            .await?;
        self.write_command(Instruction::PixelFormatSet, &[0x05]).await?; // 16-bit color

        // Gamma correction
        self.write_command(
            Instruction::PositiveGammaCorrection,
            &[
                0x02, 0x1C, 0x07, 0x12, 0x37, 0x32, 0x29, 0x2D, 0x29, 0x25, 0x2B, 0x39, 0x00, 0x01,
                0x03, 0x10,
            ],
        )
        .await?;
        self.write_command(
            Instruction::NegativeGammaCorrection,
            &[
                0x03, 0x1D, 0x07, 0x06, 0x2E, 0x2C, 0x29, 0x2D, 0x2E, 0x2E, 0x37, 0x3F, 0x00, 0x00,
                0x02, 0x10,
            ],
        )
        .await?;

        self.write_command(Instruction::NormalDisplayOn, &[]).await?;
        TIMER::delay_ms(10).await;
        self.write_command(Instruction::DisplayOn, &[]).await?;
        TIMER::delay_ms(100).await;

        info!("display on: {}x{}", self.state.width(), self.state.height());
        Ok(())
    }

    pub async fn reset(&mut self) -> Result<(), Error<E>> {
        self.rst.set_high().map_err(Error::Pin)?;
        TIMER::delay_ms(50).await;
        self.rst.set_low().map_err(Error::Pin)?;
        TIMER::delay_ms(100).await;
        self.rst.set_high().map_err(Error::Pin)?;
        TIMER::delay_ms(200).await; // Wait for the panel to leave reset

        Ok(())
    }

    pub async fn set_rotation(&mut self, rotation: Rotation) -> Result<(), Error<E>> {
        self.state.set_rotation(rotation);
        let madctl = self.state.madctl(self.config.rgb);
        self.write_command(Instruction::MemoryAccessControl, &[madctl])
            .await?;
        let (col_start, row_start) = self.state.offsets();
        debug!(
            "rotation {}: {}x{}, memory offset {},{}",
            rotation.degrees(),
            self.state.width(),
            self.state.height(),
            col_start,
            row_start
        );
        Ok(())
    }

    pub async fn invert(&mut self, inverted: bool) -> Result<(), Error<E>> {
        let instruction = if inverted {
            Instruction::DisplayInversionOn
        } else {
            Instruction::DisplayInversionOff
        };
        self.write_command(instruction, &[]).await?;
        self.state.set_inverted(inverted);
        Ok(())
    }

    /// Switch the backlight, if one is attached.
    pub async fn set_backlight(&mut self, on: bool) -> Result<(), Error<E>> {
        if let Some(backlight) = self.backlight.as_mut() {
            if on {
                backlight.set_high().map_err(Error::Pin)?;
            } else {
                backlight.set_low().map_err(Error::Pin)?;
            }
        }
        Ok(())
    }

    /// Write command with optional parameters
    async fn write_command(&mut self, instruction: Instruction, params: &[u8]) -> Result<(), Error<E>> {
        // Set DC low for command
        self.dc.set_low().map_err(Error::Pin)?;
        self.spi
            .write(&[instruction as u8])
            .await
            .map_err(Error::Comm)?;

        // Write parameters if any
        if !params.is_empty() {
            self.dc.set_high().map_err(Error::Pin)?;
            self.spi.write(params).await.map_err(Error::Comm)?;
        }
        Ok(())
    }

    /// Write raw pixel data to display (data mode)
    async fn write_raw_data(&mut self, data: &[u8]) -> Result<(), Error<E>> {
        self.dc.set_high().map_err(Error::Pin)?;
        self.spi.write(data).await.map_err(Error::Comm)
    }

    /// Set the address window in logical coordinates (inclusive) and start a
    /// memory write. The caller must then stream exactly
    /// `(ex - sx + 1) * (ey - sy + 1)` pixels, the controller does not check.
    pub async fn set_address_window(
        &mut self,
        sx: u16,
        sy: u16,
        ex: u16,
        ey: u16,
    ) -> Result<(), Error<E>> {
        let columns = self.state.column_range(sx, ex);
        let rows = self.state.row_range(sy, ey);

        self.write_command(Instruction::ColumnAddressSet, &columns)
            .await?;
        self.write_command(Instruction::RowAddressSet, &rows).await?;
        self.write_command(Instruction::MemoryWrite, &[]).await
    }

    async fn open_window(&mut self, window: AddressWindow) -> Result<(), Error<E>> {
        self.set_address_window(window.x0, window.y0, window.x1, window.y1)
            .await
    }

    /// Bytes needed for one scanline of `width` pixels, if the buffer has them.
    fn scanline(&self, width: u16) -> Result<usize, Error<E>> {
        let required = usize::from(width) * 2;
        let available = self.buffer.len();
        if required > available {
            error!(
                "scanline needs {} bytes, buffer holds {}",
                required, available
            );
            return Err(Error::Buffer {
                required,
                available,
            });
        }
        Ok(required)
    }

    /// Draw a single pixel. Off-screen coordinates are ignored.
    pub async fn draw_pixel(&mut self, x: i32, y: i32, color: Rgb565) -> Result<(), Error<E>> {
        if !self.state.contains(x, y) {
            return Ok(()); // Outside bounds
        }
        let (x, y) = (x as u16, y as u16);

        self.set_address_window(x, y, x, y).await?;
        self.write_raw_data(&color::to_wire(color)).await
    }

    /// Fill a rectangular area with a color, one buffered scanline per
    /// transfer. The rectangle is clipped to the panel.
    pub async fn fill_rect(
        &mut self,
        x: i32,
        y: i32,
        width: u16,
        height: u16,
        color: Rgb565,
    ) -> Result<(), Error<E>> {
        let Some(window) = self.state.clip(x, y, width, height) else {
            return Ok(()); // Nothing to draw
        };
        let line_len = self.scanline(window.width())?;

        self.open_window(window).await?;

        let color_bytes = color::to_wire(color);
        for pixel in self.buffer[..line_len].chunks_exact_mut(2) {
            pixel.copy_from_slice(&color_bytes);
        }

        debug_assert_eq!(
            (line_len / 2) as u32 * u32::from(window.height()),
            window.pixel_count()
        );

        // Memory write command is already sent in set_address_window
        self.dc.set_high().map_err(Error::Pin)?;
        for _ in 0..window.height() {
            self.spi
                .write(&self.buffer[..line_len])
                .await
                .map_err(Error::Comm)?;
        }
        Ok(())
    }

    /// Fill entire screen with a single color
    pub async fn fill_screen(&mut self, color: Rgb565) -> Result<(), Error<E>> {
        let (width, height) = (self.state.width(), self.state.height());
        self.fill_rect(0, 0, width, height, color).await
    }

    /// Blit a row-major image of `width` × `height` pixels. Parts outside the
    /// panel are dropped.
    pub async fn draw_image(
        &mut self,
        x: i32,
        y: i32,
        width: u16,
        height: u16,
        pixels: &[Rgb565],
    ) -> Result<(), Error<E>> {
        let stride = usize::from(width);
        let expected = stride * usize::from(height);
        if pixels.len() < expected {
            warn!("image needs {} pixels, got {}", expected, pixels.len());
            return Ok(());
        }

        let Some(window) = self.state.clip(x, y, width, height) else {
            return Ok(());
        };
        let line_len = self.scanline(window.width())?;

        self.open_window(window).await?;

        // Rows and columns clipped off the top and left are skipped in the source
        let first_col = (i32::from(window.x0) - x) as usize;
        let first_row = (i32::from(window.y0) - y) as usize;
        let visible = usize::from(window.width());
        debug_assert_eq!(
            (visible * usize::from(window.height())) as u32,
            window.pixel_count()
        );

        self.dc.set_high().map_err(Error::Pin)?;
        for row in 0..usize::from(window.height()) {
            let start = (first_row + row) * stride + first_col;
            let source = &pixels[start..start + visible];
            for (bytes, &pixel) in self.buffer[..line_len].chunks_exact_mut(2).zip(source) {
                bytes.copy_from_slice(&color::to_wire(pixel));
            }
            self.spi
                .write(&self.buffer[..line_len])
                .await
                .map_err(Error::Comm)?;
        }
        Ok(())
    }
}

#[maybe_async_cfg::maybe(
    sync(cfg(not(feature = "async")), keep_self),
    async(feature = "async", keep_self)
)]
impl<'b, SPI, DC, RST, BL, E, TIMER> Canvas for ST7735S<'b, SPI, DC, RST, BL, TIMER>
where
    SPI: SpiDevice<Error = E>,
    DC: OutputPin<Error = Infallible>,
    RST: OutputPin<Error = Infallible>,
    BL: OutputPin<Error = Infallible>,
    TIMER: Timer,
{
    type Error = Error<E>;

    fn width(&self) -> u16 {
        self.state.width()
    }

    fn height(&self) -> u16 {
        self.state.height()
    }

    async fn draw_pixel(&mut self, x: i32, y: i32, color: Rgb565) -> Result<(), Error<E>> {
        ST7735S::draw_pixel(self, x, y, color).await
    }

    async fn fill_rect(
        &mut self,
        x: i32,
        y: i32,
        width: u16,
        height: u16,
        color: Rgb565,
    ) -> Result<(), Error<E>> {
        ST7735S::fill_rect(self, x, y, width, height, color).await
    }
}

#[maybe_async_cfg::maybe(
    sync(cfg(not(feature = "async")), self = "Timer",),
    async(feature = "async", keep_self)
)]
/// Simplified timer trait for delay operations.
pub trait Timer {
    /// Delay for the specified number of milliseconds.
    async fn delay_ms(milliseconds: u64);
}

/// [`Timer`] backed by the embassy time driver.
#[cfg(feature = "embassy-time")]
pub struct EmbassyTimer;

#[cfg(all(feature = "embassy-time", feature = "async"))]
impl Timer for EmbassyTimer {
    async fn delay_ms(milliseconds: u64) {
        embassy_time::Timer::after_millis(milliseconds).await;
    }
}

#[cfg(all(feature = "embassy-time", not(feature = "async")))]
impl Timer for EmbassyTimer {
    fn delay_ms(milliseconds: u64) {
        embassy_time::block_for(embassy_time::Duration::from_millis(milliseconds));
    }
}
