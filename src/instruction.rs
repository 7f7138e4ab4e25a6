/// ST7735S command opcodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Instruction {
    /// No Operation (00h)
    Nop = 0x00,
    /// Software Reset (01h) - Restore registers to their defaults, needs 120ms+ before the next command
    SoftwareReset = 0x01,
    /// Read Display ID (04h) - Returns manufacturer and version information
    ReadDisplayId = 0x04,
    /// Read Display Status (09h) - Checks display operating state
    ReadDisplayStatus = 0x09,

    /// Sleep In (10h) - Enter low-power mode
    SleepIn = 0x10,
    /// Sleep Out (11h) - Exit low-power mode, booster needs time to settle
    SleepOut = 0x11,
    /// Partial Display Mode On (12h) - Enable regional refresh
    PartialModeOn = 0x12,
    /// Normal Display Mode On (13h) - Full-screen mode
    NormalDisplayOn = 0x13,

    /// Display Inversion Off (20h) - Disable color inversion
    DisplayInversionOff = 0x20,
    /// Display Inversion On (21h) - Enable color inversion
    DisplayInversionOn = 0x21,
    /// Gamma Set (26h) - Select one of the predefined gamma curves
    GammaSet = 0x26,
    /// Display Off (28h) - Disable panel output
    DisplayOff = 0x28,
    /// Display On (29h) - Enable panel output
    DisplayOn = 0x29,

    /// Column Address Set (2Ah) - Horizontal addressing bounds
    ColumnAddressSet = 0x2A,
    /// Row Address Set (2Bh) - Vertical addressing bounds
    RowAddressSet = 0x2B,
    /// Memory Write (2Ch) - Following data bytes go to the address window
    MemoryWrite = 0x2C,
    /// Memory Read (2Eh) - Read back frame memory
    MemoryRead = 0x2E,

    /// Partial Area (30h) - Rows covered by partial mode
    PartialArea = 0x30,
    /// Tearing Effect Line Off (34h)
    TearingEffectOff = 0x34,
    /// Tearing Effect Line On (35h) - Enable VSync output
    TearingEffectOn = 0x35,
    /// Memory Data Access Control (36h) - GRAM scan order and RGB/BGR
    MemoryAccessControl = 0x36,
    /// Idle Mode Off (38h)
    IdleModeOff = 0x38,
    /// Idle Mode On (39h) - 8 color mode
    IdleModeOn = 0x39,
    /// Interface Pixel Format (3Ah) - Color depth configuration
    PixelFormatSet = 0x3A,

    /// Frame Rate Control 1 (B1h) - Normal mode
    FrameRateControl1 = 0xB1,
    /// Frame Rate Control 2 (B2h) - Idle mode
    FrameRateControl2 = 0xB2,
    /// Frame Rate Control 3 (B3h) - Partial mode
    FrameRateControl3 = 0xB3,
    /// Display Inversion Control (B4h) - Dot/column inversion per mode
    InversionControl = 0xB4,

    /// Power Control 1 (C0h) - AVDD, GVDD
    PowerControl1 = 0xC0,
    /// Power Control 2 (C1h) - VGH, VGL
    PowerControl2 = 0xC1,
    /// Power Control 3 (C2h) - Op-amp current in normal mode
    PowerControl3 = 0xC2,
    /// Power Control 4 (C3h) - Op-amp current in idle mode
    PowerControl4 = 0xC3,
    /// Power Control 5 (C4h) - Op-amp current in partial mode
    PowerControl5 = 0xC4,
    /// VCOM Control 1 (C5h)
    VcomControl1 = 0xC5,

    /// Read ID1 (DAh)
    ReadId1 = 0xDA,
    /// Read ID2 (DBh)
    ReadId2 = 0xDB,
    /// Read ID3 (DCh)
    ReadId3 = 0xDC,

    /// Gamma '+' Polarity Correction (E0h)
    PositiveGammaCorrection = 0xE0,
    /// Gamma '-' Polarity Correction (E1h)
    NegativeGammaCorrection = 0xE1,
}
