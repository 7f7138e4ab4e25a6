//! Panel geometry: rotation, visible extents and the controller memory offsets.
//!
//! The ST7735S frame memory is 132×162 while the glass only shows 160×80 of it,
//! so every address sent to the controller is shifted by a per-rotation
//! column/row start. Nothing here touches the bus.

/// Physical width of the glass in landscape orientation.
pub const PANEL_WIDTH: u16 = 160;
/// Physical height of the glass in landscape orientation.
pub const PANEL_HEIGHT: u16 = 80;

/// MADCTL row address order.
pub const MADCTL_MY: u8 = 0x80;
/// MADCTL column address order.
pub const MADCTL_MX: u8 = 0x40;
/// MADCTL row/column exchange.
pub const MADCTL_MV: u8 = 0x20;
/// MADCTL vertical refresh order.
pub const MADCTL_ML: u8 = 0x10;
/// MADCTL BGR subpixel order.
pub const MADCTL_BGR: u8 = 0x08;

/// Hardware rotation, selected through MADCTL.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Rotation {
    /// 80×160
    Portrait = 0,
    /// 160×80
    Landscape = 1,
    /// 80×160, upside down
    PortraitSwapped = 2,
    /// 160×80, upside down
    LandscapeSwapped = 3,
}

impl Rotation {
    /// Orientation bits of MADCTL, without the color order bit.
    pub const fn madctl(self) -> u8 {
        match self {
            Rotation::Portrait => 0,
            Rotation::Landscape => MADCTL_MX | MADCTL_MV | MADCTL_ML,
            Rotation::PortraitSwapped => MADCTL_MY | MADCTL_MX,
            Rotation::LandscapeSwapped => MADCTL_MY | MADCTL_MV | MADCTL_ML,
        }
    }

    /// Whether rows and columns are exchanged.
    pub const fn is_landscape(self) -> bool {
        matches!(self, Rotation::Landscape | Rotation::LandscapeSwapped)
    }

    /// Get the next rotation in the cycle
    pub fn next(self) -> Self {
        Rotation::from(self as u8 + 1)
    }

    /// Get rotation angle in degrees for logging
    pub fn degrees(self) -> u16 {
        self as u16 * 90
    }
}

impl From<u8> for Rotation {
    /// Any value is accepted, taken modulo 4.
    fn from(value: u8) -> Self {
        match value % 4 {
            0 => Rotation::Portrait,
            1 => Rotation::Landscape,
            2 => Rotation::PortraitSwapped,
            _ => Rotation::LandscapeSwapped,
        }
    }
}

/// Inclusive rectangle about to receive a pixel stream, in logical coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AddressWindow {
    pub x0: u16,
    pub y0: u16,
    pub x1: u16,
    pub y1: u16,
}

impl AddressWindow {
    pub fn width(&self) -> u16 {
        self.x1 - self.x0 + 1
    }

    pub fn height(&self) -> u16 {
        self.y1 - self.y0 + 1
    }

    /// Number of pixels the controller expects after `MemoryWrite`.
    pub fn pixel_count(&self) -> u32 {
        u32::from(self.width()) * u32::from(self.height())
    }
}

/// Mutable geometry of the panel. Width, height and offsets always follow
/// the current rotation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PanelState {
    rotation: Rotation,
    col_start: u16,
    row_start: u16,
    width: u16,
    height: u16,
    inverted: bool,
}

impl PanelState {
    pub fn new(rotation: Rotation, inverted: bool) -> Self {
        let mut state = Self {
            rotation,
            col_start: 0,
            row_start: 0,
            width: 0,
            height: 0,
            inverted,
        };
        state.set_rotation(rotation);
        state
    }

    pub fn set_rotation(&mut self, rotation: Rotation) {
        // The 80 pixel edge sits 26 columns into the 132 wide frame memory,
        // the 160 pixel edge starts one row in.
        let (col_start, row_start, width, height) = if rotation.is_landscape() {
            (1, 26, PANEL_WIDTH, PANEL_HEIGHT)
        } else {
            (26, 1, PANEL_HEIGHT, PANEL_WIDTH)
        };
        self.rotation = rotation;
        self.col_start = col_start;
        self.row_start = row_start;
        self.width = width;
        self.height = height;
    }

    pub fn set_inverted(&mut self, inverted: bool) {
        self.inverted = inverted;
    }

    pub fn rotation(&self) -> Rotation {
        self.rotation
    }

    pub fn width(&self) -> u16 {
        self.width
    }

    pub fn height(&self) -> u16 {
        self.height
    }

    pub fn inverted(&self) -> bool {
        self.inverted
    }

    /// Offsets between logical coordinates and controller memory.
    pub fn offsets(&self) -> (u16, u16) {
        (self.col_start, self.row_start)
    }

    /// MADCTL parameter for the current rotation.
    pub fn madctl(&self, rgb: bool) -> u8 {
        if rgb {
            self.rotation.madctl()
        } else {
            self.rotation.madctl() | MADCTL_BGR
        }
    }

    pub fn contains(&self, x: i32, y: i32) -> bool {
        x >= 0 && y >= 0 && x < i32::from(self.width) && y < i32::from(self.height)
    }

    /// Clip a rectangle against the visible extents. Returns `None` when
    /// nothing of it is on the panel.
    pub fn clip(&self, x: i32, y: i32, width: u16, height: u16) -> Option<AddressWindow> {
        let x0 = x.max(0);
        let y0 = y.max(0);
        let x1 = x.saturating_add(i32::from(width)).min(i32::from(self.width)) - 1;
        let y1 = y.saturating_add(i32::from(height)).min(i32::from(self.height)) - 1;

        if x1 < x0 || y1 < y0 {
            return None;
        }

        Some(AddressWindow {
            x0: x0 as u16,
            y0: y0 as u16,
            x1: x1 as u16,
            y1: y1 as u16,
        })
    }

    /// Column address set parameters: start and end, big-endian, offset into
    /// frame memory.
    pub fn column_range(&self, x0: u16, x1: u16) -> [u8; 4] {
        address_range(x0.wrapping_add(self.col_start), x1.wrapping_add(self.col_start))
    }

    /// Row address set parameters: start and end, big-endian, offset into
    /// frame memory.
    pub fn row_range(&self, y0: u16, y1: u16) -> [u8; 4] {
        address_range(y0.wrapping_add(self.row_start), y1.wrapping_add(self.row_start))
    }
}

fn address_range(start: u16, end: u16) -> [u8; 4] {
    let [s_hi, s_lo] = start.to_be_bytes();
    let [e_hi, e_lo] = end.to_be_bytes();
    [s_hi, s_lo, e_hi, e_lo]
}
