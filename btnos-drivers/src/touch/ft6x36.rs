//! FT6x36 capacitive touch controller (I2C)
//!
//! The FT6236/FT6336 family reports up to two touch points. The shell only
//! uses the first one.
//!
//! # Register map (first point)
//!
//! - `TD_STATUS` (0x02): number of touch points in the low nibble
//! - `P1_XH` (0x03): event flag in bits 7:6, X bits 11:8 in bits 3:0
//! - `P1_XL` (0x04): X bits 7:0
//! - `P1_YH` (0x05): touch id in bits 7:4, Y bits 11:8 in bits 3:0
//! - `P1_YL` (0x06): Y bits 7:0
//!
//! The five registers are read in a single write-read transaction.
//!
//! On the Core2 the panel is taller than the display and reports Y up to
//! 279; the rows below 240 are the three frame buttons.

use btnos_core::geometry::Point;
use btnos_core::traits::{TouchController, TouchError};
use embedded_hal::i2c::I2c;

/// Default 7-bit bus address
pub const DEFAULT_ADDRESS: u8 = 0x38;

/// FT6x36 register addresses
pub mod reg {
    /// Device mode
    pub const DEV_MODE: u8 = 0x00;
    /// Number of touch points
    pub const TD_STATUS: u8 = 0x02;
    /// Point 1 event flag and X high bits
    pub const P1_XH: u8 = 0x03;
    /// Point 1 X low bits
    pub const P1_XL: u8 = 0x04;
    /// Point 1 touch id and Y high bits
    pub const P1_YH: u8 = 0x05;
    /// Point 1 Y low bits
    pub const P1_YL: u8 = 0x06;
    /// Touch detection threshold
    pub const TH_GROUP: u8 = 0x80;
    /// Chip vendor id
    pub const CHIP_ID: u8 = 0xA3;
}

/// Event flag from `P1_XH`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TouchEvent {
    PressDown,
    LiftUp,
    Contact,
    NoEvent,
}

impl TouchEvent {
    pub const fn from_bits(xh: u8) -> Self {
        match xh >> 6 {
            0 => TouchEvent::PressDown,
            1 => TouchEvent::LiftUp,
            2 => TouchEvent::Contact,
            _ => TouchEvent::NoEvent,
        }
    }
}

/// Decode a `TD_STATUS..=P1_YL` block into the first touch point
///
/// Returns `Ok(None)` when nothing is touching the panel.
pub fn decode(raw: &[u8; 5]) -> Result<Option<Point>, TouchError> {
    let points = raw[0] & 0x0F;
    match points {
        0 => return Ok(None),
        1 | 2 => {}
        // 0x0F after power-up, before the first scan
        _ => return Err(TouchError::InvalidReport),
    }
    match TouchEvent::from_bits(raw[1]) {
        TouchEvent::PressDown | TouchEvent::Contact => {}
        TouchEvent::LiftUp | TouchEvent::NoEvent => return Ok(None),
    }
    let x = (u16::from(raw[1] & 0x0F) << 8) | u16::from(raw[2]);
    let y = (u16::from(raw[3] & 0x0F) << 8) | u16::from(raw[4]);
    Ok(Some(Point::new(x, y)))
}

/// FT6x36 driver
pub struct Ft6x36<I2C> {
    i2c: I2C,
    address: u8,
}

impl<I2C: I2c> Ft6x36<I2C> {
    /// Create a driver at the default address
    pub fn new(i2c: I2C) -> Self {
        Self::with_address(i2c, DEFAULT_ADDRESS)
    }

    pub fn with_address(i2c: I2C, address: u8) -> Self {
        Self { i2c, address }
    }

    /// Put the chip in working mode and set the detection threshold
    pub fn init(&mut self, threshold: u8) -> Result<(), TouchError> {
        self.write_reg(reg::DEV_MODE, 0)?;
        self.write_reg(reg::TH_GROUP, threshold)
    }

    pub fn chip_id(&mut self) -> Result<u8, TouchError> {
        let mut buf = [0u8; 1];
        self.i2c
            .write_read(self.address, &[reg::CHIP_ID], &mut buf)
            .map_err(|_| TouchError::Bus)?;
        Ok(buf[0])
    }

    pub fn release(self) -> I2C {
        self.i2c
    }

    fn write_reg(&mut self, reg: u8, value: u8) -> Result<(), TouchError> {
        self.i2c
            .write(self.address, &[reg, value])
            .map_err(|_| TouchError::Bus)
    }
}

impl<I2C: I2c> TouchController for Ft6x36<I2C> {
    fn read_point(&mut self) -> Result<Option<Point>, TouchError> {
        let mut raw = [0u8; 5];
        self.i2c
            .write_read(self.address, &[reg::TD_STATUS], &mut raw)
            .map_err(|_| TouchError::Bus)?;
        decode(&raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use embedded_hal::i2c::{ErrorKind, ErrorType, Operation};

    /// Register file behind a fake bus
    struct MockI2c {
        regs: [u8; 256],
        pointer: u8,
        fail: bool,
        last_address: u8,
    }

    impl MockI2c {
        fn new() -> Self {
            Self {
                regs: [0; 256],
                pointer: 0,
                fail: false,
                last_address: 0,
            }
        }

        fn touch(&mut self, flag: u8, x: u16, y: u16) {
            self.regs[2] = 1;
            self.regs[3] = (flag << 6) | ((x >> 8) as u8 & 0x0F);
            self.regs[4] = x as u8;
            self.regs[5] = (y >> 8) as u8 & 0x0F;
            self.regs[6] = y as u8;
        }
    }

    impl ErrorType for MockI2c {
        type Error = ErrorKind;
    }

    impl I2c for MockI2c {
        fn transaction(
            &mut self,
            address: u8,
            operations: &mut [Operation<'_>],
        ) -> Result<(), Self::Error> {
            if self.fail {
                return Err(ErrorKind::Other);
            }
            self.last_address = address;
            for op in operations {
                match op {
                    Operation::Write(bytes) => {
                        if let Some((first, rest)) = bytes.split_first() {
                            self.pointer = *first;
                            for (i, b) in rest.iter().enumerate() {
                                self.regs[usize::from(self.pointer) + i] = *b;
                            }
                        }
                    }
                    Operation::Read(buf) => {
                        let start = usize::from(self.pointer);
                        buf.copy_from_slice(&self.regs[start..start + buf.len()]);
                    }
                }
            }
            Ok(())
        }
    }

    #[test]
    fn test_no_touch() {
        let mut ft = Ft6x36::new(MockI2c::new());
        assert_eq!(ft.read_point(), Ok(None));
    }

    #[test]
    fn test_reads_first_point() {
        let mut i2c = MockI2c::new();
        i2c.touch(2, 300, 265);
        let mut ft = Ft6x36::new(i2c);
        assert_eq!(ft.read_point(), Ok(Some(Point::new(300, 265))));
        assert_eq!(ft.release().last_address, DEFAULT_ADDRESS);
    }

    #[test]
    fn test_lift_up_reads_as_no_contact() {
        let mut i2c = MockI2c::new();
        i2c.touch(1, 10, 10);
        let mut ft = Ft6x36::new(i2c);
        assert_eq!(ft.read_point(), Ok(None));
    }

    #[test]
    fn test_power_up_status_is_invalid() {
        let mut i2c = MockI2c::new();
        i2c.regs[2] = 0xFF;
        let mut ft = Ft6x36::new(i2c);
        assert_eq!(ft.read_point(), Err(TouchError::InvalidReport));
    }

    #[test]
    fn test_bus_error() {
        let mut i2c = MockI2c::new();
        i2c.fail = true;
        let mut ft = Ft6x36::new(i2c);
        assert_eq!(ft.read_point(), Err(TouchError::Bus));
    }

    #[test]
    fn test_init_writes_registers() {
        let mut ft = Ft6x36::new(MockI2c::new());
        ft.init(40).unwrap();
        let i2c = ft.release();
        assert_eq!(i2c.regs[reg::TH_GROUP as usize], 40);
        assert_eq!(i2c.regs[reg::DEV_MODE as usize], 0);
    }

    #[test]
    fn test_decode_event_flags() {
        assert_eq!(TouchEvent::from_bits(0x00), TouchEvent::PressDown);
        assert_eq!(TouchEvent::from_bits(0x45), TouchEvent::LiftUp);
        assert_eq!(TouchEvent::from_bits(0x80), TouchEvent::Contact);
        assert_eq!(TouchEvent::from_bits(0xC0), TouchEvent::NoEvent);
        assert_eq!(
            decode(&[1, 0x01, 0x2C, 0x00, 0x78]),
            Ok(Some(Point::new(300, 120)))
        );
    }
}
