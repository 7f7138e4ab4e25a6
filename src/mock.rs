//! Fake bus, pins and timer. Everything that reaches them lands in a
//! thread-local event log, one per test thread.

use core::cell::{Cell, RefCell};
use core::convert::Infallible;
use std::collections::BTreeMap;
use std::vec;
use std::vec::Vec;

use embedded_hal::digital::{self, OutputPin};
use embedded_hal::spi::{self, Operation};

use crate::instruction::Instruction;
use crate::{Config, NoBacklight, ST7735S, Timer};

pub type TestDisplay<'b> = ST7735S<'b, FakeSpi, DcPin, ResetPin, NoBacklight, FakeTimer>;

/// Fresh display on a cleared log.
pub fn display(config: Config, buffer: &mut [u8]) -> TestDisplay<'_> {
    clear();
    ST7735S::new(config, FakeSpi, DcPin, ResetPin, buffer)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// Byte written with DC low.
    Command(u8),
    /// One write with DC high.
    Data(Vec<u8>),
    Reset(bool),
    Backlight(bool),
    Delay(u64),
}

std::thread_local! {
    static EVENTS: RefCell<Vec<Event>> = const { RefCell::new(Vec::new()) };
    static DATA_MODE: Cell<bool> = const { Cell::new(false) };
}

fn record(event: Event) {
    EVENTS.with(|events| events.borrow_mut().push(event));
}

/// Forget everything recorded so far.
pub fn clear() {
    EVENTS.with(|events| events.borrow_mut().clear());
    DATA_MODE.with(|dc| dc.set(false));
}

/// Drain the log.
pub fn take() -> Vec<Event> {
    EVENTS.with(|events| events.take())
}

/// Replay address windows and pixel streams into frame memory, keyed by
/// controller (column, row).
pub fn frame(events: &[Event]) -> BTreeMap<(u16, u16), u16> {
    let column_set = Instruction::ColumnAddressSet as u8;
    let row_set = Instruction::RowAddressSet as u8;
    let memory_write = Instruction::MemoryWrite as u8;

    let mut memory = BTreeMap::new();
    let mut columns = (0u16, 0u16);
    let mut rows = (0u16, 0u16);
    let mut last_command = None;
    let mut cursor = None;

    for event in events {
        match event {
            Event::Command(opcode) => {
                last_command = Some(*opcode);
                cursor = (*opcode == memory_write).then_some((columns.0, rows.0));
            }
            Event::Data(bytes) => {
                if let Some((col, row)) = cursor.as_mut() {
                    for pixel in bytes.chunks_exact(2) {
                        memory.insert((*col, *row), u16::from_be_bytes([pixel[0], pixel[1]]));
                        if *col == columns.1 {
                            *col = columns.0;
                            *row += 1;
                        } else {
                            *col += 1;
                        }
                    }
                } else if last_command == Some(column_set) || last_command == Some(row_set) {
                    let range = (
                        u16::from_be_bytes([bytes[0], bytes[1]]),
                        u16::from_be_bytes([bytes[2], bytes[3]]),
                    );
                    if last_command == Some(column_set) {
                        columns = range;
                    } else {
                        rows = range;
                    }
                }
            }
            _ => {}
        }
    }
    memory
}

/// Events for one command and its parameters.
pub fn command(opcode: u8, params: &[u8]) -> Vec<Event> {
    let mut events = vec![Event::Command(opcode)];
    if !params.is_empty() {
        events.push(Event::Data(params.to_vec()));
    }
    events
}

/// Events for CASET, RASET and RAMWR with raw memory ranges.
pub fn window(columns: [u8; 4], rows: [u8; 4]) -> Vec<Event> {
    let mut events = command(0x2A, &columns);
    events.extend(command(0x2B, &rows));
    events.extend(command(0x2C, &[]));
    events
}

/// Everything `init` emits with the default config and a backlight pin.
pub fn init_sequence() -> Vec<Event> {
    let mut expected = vec![
        Event::Backlight(true),
        Event::Reset(true),
        Event::Delay(50),
        Event::Reset(false),
        Event::Delay(100),
        Event::Reset(true),
        Event::Delay(200),
        Event::Command(0x01),
        Event::Delay(150),
        Event::Command(0x11),
        Event::Delay(500),
    ];
    let commands: [(u8, &[u8]); 15] = [
        (0xB1, &[0x01, 0x2C, 0x2D]),
        (0xB2, &[0x01, 0x2C, 0x2D]),
        (0xB3, &[0x01, 0x2C, 0x2D, 0x01, 0x2C, 0x2D]),
        (0xB4, &[0x07]),
        (0xC0, &[0xA2, 0x02, 0x84]),
        (0xC1, &[0xC5]),
        (0xC2, &[0x0A, 0x00]),
        (0xC3, &[0x8A, 0x2A]),
        (0xC4, &[0x8A, 0xEE]),
        (0xC5, &[0x0E]),
        (0x21, &[]),
        (0x36, &[0x78]),
        (0x3A, &[0x05]),
        (
            0xE0,
            &[
                0x02, 0x1C, 0x07, 0x12, 0x37, 0x32, 0x29, 0x2D, 0x29, 0x25, 0x2B, 0x39, 0x00, 0x01,
                0x03, 0x10,
            ],
        ),
        (
            0xE1,
            &[
                0x03, 0x1D, 0x07, 0x06, 0x2E, 0x2C, 0x29, 0x2D, 0x2E, 0x2E, 0x37, 0x3F, 0x00, 0x00,
                0x02, 0x10,
            ],
        ),
    ];
    for (opcode, params) in commands {
        expected.extend(command(opcode, params));
    }
    expected.extend([
        Event::Command(0x13),
        Event::Delay(10),
        Event::Command(0x29),
        Event::Delay(100),
    ]);
    expected
}

pub struct FakeSpi;

impl spi::ErrorType for FakeSpi {
    type Error = Infallible;
}

fn record_writes(operations: &[Operation<'_, u8>]) {
    for operation in operations {
        if let Operation::Write(bytes) = operation {
            if DATA_MODE.with(Cell::get) {
                record(Event::Data(bytes.to_vec()));
            } else {
                bytes.iter().for_each(|&byte| record(Event::Command(byte)));
            }
        }
    }
}

#[cfg(feature = "async")]
impl embedded_hal_async::spi::SpiDevice for FakeSpi {
    async fn transaction(&mut self, operations: &mut [Operation<'_, u8>]) -> Result<(), Infallible> {
        record_writes(operations);
        Ok(())
    }
}

#[cfg(not(feature = "async"))]
impl spi::SpiDevice for FakeSpi {
    fn transaction(&mut self, operations: &mut [Operation<'_, u8>]) -> Result<(), Infallible> {
        record_writes(operations);
        Ok(())
    }
}

pub struct DcPin;

impl digital::ErrorType for DcPin {
    type Error = Infallible;
}

impl OutputPin for DcPin {
    fn set_low(&mut self) -> Result<(), Infallible> {
        DATA_MODE.with(|dc| dc.set(false));
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Infallible> {
        DATA_MODE.with(|dc| dc.set(true));
        Ok(())
    }
}

pub struct ResetPin;

impl digital::ErrorType for ResetPin {
    type Error = Infallible;
}

impl OutputPin for ResetPin {
    fn set_low(&mut self) -> Result<(), Infallible> {
        record(Event::Reset(false));
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Infallible> {
        record(Event::Reset(true));
        Ok(())
    }
}

pub struct BacklightPin;

impl digital::ErrorType for BacklightPin {
    type Error = Infallible;
}

impl OutputPin for BacklightPin {
    fn set_low(&mut self) -> Result<(), Infallible> {
        record(Event::Backlight(false));
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Infallible> {
        record(Event::Backlight(true));
        Ok(())
    }
}

pub struct FakeTimer;

#[cfg(feature = "async")]
impl Timer for FakeTimer {
    async fn delay_ms(milliseconds: u64) {
        record(Event::Delay(milliseconds));
    }
}

#[cfg(not(feature = "async"))]
impl Timer for FakeTimer {
    fn delay_ms(milliseconds: u64) {
        record(Event::Delay(milliseconds));
    }
}
