//! A platform agnostic driver to interface with the MAX7219/MAX7221
//! (LED display driver) wired to seven-segment digits.
//!
//! This driver was built using [`embedded-hal`] traits. Blocking hosts use
//! [`MAX7219`] over a [`Connector`]; executor-driven hosts use
//! [`asynch::MAX7219`] over an [`embedded-hal-async`] SPI device.
//!
//! [`embedded-hal`]: https://docs.rs/embedded-hal/~1.0
//! [`embedded-hal-async`]: https://docs.rs/embedded-hal-async/~1.0

#![deny(unsafe_code)]
#![deny(warnings)]
#![no_std]

#[cfg(test)]
extern crate std;

pub mod asynch;
mod connectors;
mod font;

pub use crate::connectors::*;
pub use crate::font::encode;

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::OutputPin;
use embedded_hal::spi::SpiBus;

/// Intensity register value for the darkest setting.
pub const INTENSITY_MIN: u8 = 0x00;

/// Intensity register value for the mid-level default.
pub const INTENSITY_HALF: u8 = 0x08;

/// Intensity register value for the brightest setting.
pub const INTENSITY_MAX: u8 = 0x0F;

/// Milliseconds between marquee frames in [`MAX7219::sweep_string`].
const SWEEP_FRAME_MS: u32 = 250;

/// Possible command register values on the display chip.
#[derive(Clone, Copy)]
pub enum Command {
    Noop = 0x00,
    Digit0 = 0x01,
    Digit1 = 0x02,
    Digit2 = 0x03,
    Digit3 = 0x04,
    Digit4 = 0x05,
    Digit5 = 0x06,
    Digit6 = 0x07,
    Digit7 = 0x08,
    DecodeMode = 0x09,
    Intensity = 0x0A,
    ScanLimit = 0x0B,
    Shutdown = 0x0C,
    DisplayTest = 0x0F,
}

impl From<Command> for u8 {
    fn from(command: Command) -> u8 {
        command as u8
    }
}

/// Decode modes for BCD encoded input.
///
/// The decode-mode register takes one bit per digit (set = Code B decoding,
/// clear = raw segments); these are the mask values the datasheet names.
#[derive(Copy, Clone)]
pub enum DecodeMode {
    NoDecode = 0x00,
    CodeBDigit0 = 0x01,
    CodeBDigits3_0 = 0x0F,
    CodeBDigits7_0 = 0xFF,
}

impl From<DecodeMode> for u8 {
    fn from(mode: DecodeMode) -> u8 {
        mode as u8
    }
}

/// Code B data values for digits with decode mode enabled.
pub mod code_b {
    pub const DASH: u8 = 0x0A;
    pub const E: u8 = 0x0B;
    pub const H: u8 = 0x0C;
    pub const L: u8 = 0x0D;
    pub const P: u8 = 0x0E;
    pub const BLANK: u8 = 0x0F;
}

///
/// Error raised in case there was a communication error with the MAX7219
/// chip. The underlying HAL error is dropped at the connector seam.
///
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataError {
    /// An error occurred on the SPI bus.
    Spi,
    /// An error occurred setting a GPIO line.
    Pin,
}

///
/// Handles communication with a MAX7219 chip driving `NUM_DIGITS`
/// seven-segment digits.
///
/// The driver is write-only: the chip's configuration lives in the chip and
/// is never read back, so callers that need the current state track it
/// themselves. Digit positions are 1-indexed from the left, see
/// [`MAX7219::set_digit`].
///
pub struct MAX7219<CONN, const NUM_DIGITS: u8> {
    conn: CONN,
}

impl<CONN, const NUM_DIGITS: u8> MAX7219<CONN, NUM_DIGITS>
where
    CONN: Connector,
{
    ///
    /// Returns a new MAX7219 handler over the given connector.
    ///
    /// No chip-side writes occur; the display keeps whatever state it
    /// powered up with until [`MAX7219::default_init`] or explicit setter
    /// calls program it.
    ///
    pub fn new(conn: CONN) -> Self {
        MAX7219 { conn }
    }

    ///
    /// Programs the chip to a usable default state: decode mode off for
    /// all digits, scan limit covering all `NUM_DIGITS` digits, mid-level
    /// intensity, normal operation, and every digit blanked.
    ///
    /// Decode mode and scan limit are set before the chip is powered on,
    /// and blanking comes last so no garbage segments are briefly lit.
    ///
    /// # Errors
    ///
    /// * `DataError` - returned in case there was an error during
    ///   communication with the chip
    ///
    pub fn default_init(&mut self) -> Result<(), DataError> {
        self.set_decode_mode(DecodeMode::NoDecode)?;
        self.set_num_digits(NUM_DIGITS)?;
        self.set_intensity(INTENSITY_HALF)?;
        self.power_on()?;
        self.clear_display_raw()
    }

    ///
    /// Puts the display into normal operation. Digit data is unaffected.
    ///
    /// # Errors
    ///
    /// * `DataError` - returned in case there was an error during
    ///   communication with the chip
    ///
    pub fn power_on(&mut self) -> Result<(), DataError> {
        self.conn.write_register(Command::Shutdown.into(), 0x01)
    }

    ///
    /// Puts the display into shutdown mode. Register contents, including
    /// digit data, are retained.
    ///
    /// # Errors
    ///
    /// * `DataError` - returned in case there was an error during
    ///   communication with the chip
    ///
    pub fn power_off(&mut self) -> Result<(), DataError> {
        self.conn.write_register(Command::Shutdown.into(), 0x00)
    }

    ///
    /// Selects which digits use the chip's built-in Code B decoder.
    ///
    /// # Arguments
    ///
    /// * `digits` - one bit per digit (set = Code B, clear = raw
    ///   segments); accepts a [`DecodeMode`] or a raw mask
    ///
    /// # Errors
    ///
    /// * `DataError` - returned in case there was an error during
    ///   communication with the chip
    ///
    pub fn set_decode_mode(&mut self, digits: impl Into<u8>) -> Result<(), DataError> {
        self.conn
            .write_register(Command::DecodeMode.into(), digits.into())
    }

    ///
    /// Sets how many digits the chip actively multiplexes, encoded as
    /// `count - 1` in the scan-limit register.
    ///
    /// # Arguments
    ///
    /// * `count` - active digit count; the caller must keep it in `1..=8`,
    ///   no bounds check is performed and an out-of-range count produces
    ///   chip-defined behavior
    ///
    /// # Errors
    ///
    /// * `DataError` - returned in case there was an error during
    ///   communication with the chip
    ///
    pub fn set_num_digits(&mut self, count: u8) -> Result<(), DataError> {
        self.conn
            .write_register(Command::ScanLimit.into(), count - 1)
    }

    ///
    /// Sets the display brightness.
    ///
    /// # Arguments
    ///
    /// * `intensity` - intensity register value, `0x00` (darkest) to
    ///   `0x0F` (brightest)
    ///
    /// # Errors
    ///
    /// * `DataError` - returned in case there was an error during
    ///   communication with the chip
    ///
    pub fn set_intensity(&mut self, intensity: u8) -> Result<(), DataError> {
        self.conn
            .write_register(Command::Intensity.into(), intensity)
    }

    ///
    /// Maps a 1-indexed display position to its digit register address.
    ///
    /// The mapping is inverted: position 1 addresses the last physical
    /// digit, so "offset from the left" string printing lines up with the
    /// usual right-to-left digit wiring.
    ///
    pub const fn digit_address(position: u8) -> u8 {
        NUM_DIGITS - position + 1
    }

    ///
    /// Writes a value directly to the digit register for `position`.
    ///
    /// # Arguments
    ///
    /// * `position` - display position, 1 (leftmost) to `NUM_DIGITS`
    ///   (rightmost); the caller must keep it in range, no bounds check is
    ///   performed
    /// * `value` - raw segment mask, or a Code B value if the digit has
    ///   decoding enabled
    ///
    /// # Errors
    ///
    /// * `DataError` - returned in case there was an error during
    ///   communication with the chip
    ///
    pub fn set_digit(&mut self, position: u8, value: u8) -> Result<(), DataError> {
        self.conn.write_register(Self::digit_address(position), value)
    }

    ///
    /// Blanks every active digit using the Code B blank code. Only digits
    /// with decoding enabled render this as blank.
    ///
    /// # Errors
    ///
    /// * `DataError` - returned in case there was an error during
    ///   communication with the chip
    ///
    pub fn clear_display_code_b(&mut self) -> Result<(), DataError> {
        for digit in 1..=NUM_DIGITS {
            self.conn.write_register(digit, code_b::BLANK)?;
        }

        Ok(())
    }

    ///
    /// Blanks every active digit using the all-segments-off raw mask. Only
    /// digits with decoding disabled render this as blank.
    ///
    /// # Errors
    ///
    /// * `DataError` - returned in case there was an error during
    ///   communication with the chip
    ///
    pub fn clear_display_raw(&mut self) -> Result<(), DataError> {
        for digit in 1..=NUM_DIGITS {
            self.conn.write_register(digit, font::encode(' '))?;
        }

        Ok(())
    }

    ///
    /// Writes each character of `text` to consecutive positions starting
    /// at `offset`, encoding through the seven-segment font. Characters
    /// that would land past the last digit are silently dropped.
    ///
    /// # Arguments
    ///
    /// * `text` - the text to print; characters without a seven-segment
    ///   rendering come out blank
    /// * `offset` - position of the first character, 1 to `NUM_DIGITS`
    ///
    /// # Errors
    ///
    /// * `DataError` - returned in case there was an error during
    ///   communication with the chip
    ///
    pub fn print_string(&mut self, text: &str, mut offset: u8) -> Result<(), DataError> {
        for c in text.chars() {
            if offset > NUM_DIGITS {
                break;
            }
            self.set_digit(offset, font::encode(c))?;
            offset += 1;
        }

        Ok(())
    }

    ///
    /// Runs one full marquee pass: sweeps `text` in from the right edge,
    /// then scrolls it off to the left one character at a time, with a
    /// fixed delay and a full clear between frames. Blocks until the pass
    /// completes; loop it for a continuous marquee.
    ///
    /// # Arguments
    ///
    /// * `text` - the text to scroll
    /// * `delay` - delay provider used for the inter-frame wait
    ///
    /// # Errors
    ///
    /// * `DataError` - returned in case there was an error during
    ///   communication with the chip
    ///
    pub fn sweep_string<D: DelayNs>(&mut self, text: &str, delay: &mut D) -> Result<(), DataError> {
        for offset in (1..=NUM_DIGITS).rev() {
            self.print_string(text, offset)?;
            delay.delay_ms(SWEEP_FRAME_MS);
            self.clear_display_raw()?;
        }

        for (start, _) in text.char_indices().skip(1) {
            self.print_string(&text[start..], 1)?;
            delay.delay_ms(SWEEP_FRAME_MS);
            self.clear_display_raw()?;
        }

        Ok(())
    }

    /// Releases the connector.
    pub fn release(self) -> CONN {
        self.conn
    }
}

impl<DATA, CS, SCK, const NUM_DIGITS: u8> MAX7219<PinConnector<DATA, CS, SCK>, NUM_DIGITS>
where
    DATA: OutputPin,
    CS: OutputPin,
    SCK: OutputPin,
{
    ///
    /// Returns a new MAX7219 handler bit-banging three GPIO lines.
    ///
    /// # Arguments
    ///
    /// * `data` - the MOSI/DATA pin previously set to output mode
    /// * `cs` - the CS pin previously set to output mode
    /// * `sck` - the CLK pin previously set to output mode
    ///
    pub fn from_pins(data: DATA, cs: CS, sck: SCK) -> Self {
        MAX7219::new(PinConnector::new(data, cs, sck))
    }
}

impl<SPI, CS, const NUM_DIGITS: u8> MAX7219<SpiConnector<SPI, CS>, NUM_DIGITS>
where
    SPI: SpiBus<u8>,
    CS: OutputPin,
{
    ///
    /// Returns a new MAX7219 handler over a hardware SPI bus.
    ///
    /// # Arguments
    ///
    /// * `spi` - the SPI bus, configured for mode 0 at 10 MHz or less
    /// * `cs` - the CS pin previously set to output mode
    ///
    pub fn from_spi(spi: SPI, cs: CS) -> Self {
        MAX7219::new(SpiConnector::new(spi, cs))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use embedded_hal_mock::eh1::delay::NoopDelay;
    use embedded_hal_mock::eh1::digital::{Mock as PinMock, State, Transaction as PinTransaction};
    use embedded_hal_mock::eh1::spi::{Mock as SpiMock, Transaction as SpiTransaction};
    use std::vec;
    use std::vec::Vec;

    /// Expected SPI traffic for one framed register write.
    fn reg_write(register: u8, data: u8) -> Vec<SpiTransaction<u8>> {
        vec![
            SpiTransaction::write_vec(vec![register]),
            SpiTransaction::flush(),
            SpiTransaction::write_vec(vec![data]),
            SpiTransaction::flush(),
        ]
    }

    /// Expected CS line traffic for `count` framed register writes.
    fn cs_frames(count: usize) -> Vec<PinTransaction> {
        let mut frames = Vec::new();
        for _ in 0..count {
            frames.push(PinTransaction::set(State::Low));
            frames.push(PinTransaction::set(State::High));
        }
        frames
    }

    fn display<const NUM_DIGITS: u8>(
        spi_expect: &[SpiTransaction<u8>],
        writes: usize,
    ) -> MAX7219<SpiConnector<SpiMock<u8>, PinMock>, NUM_DIGITS> {
        let spi = SpiMock::new(spi_expect);
        let cs = PinMock::new(&cs_frames(writes));
        MAX7219::from_spi(spi, cs)
    }

    fn finish<const NUM_DIGITS: u8>(
        display: MAX7219<SpiConnector<SpiMock<u8>, PinMock>, NUM_DIGITS>,
    ) {
        let (mut spi, mut cs) = display.release().release();
        spi.done();
        cs.done();
    }

    #[test]
    fn power_on_writes_shutdown_register() {
        let mut display = display::<8>(&reg_write(0x0C, 0x01), 1);
        display.power_on().unwrap();
        finish(display);
    }

    #[test]
    fn power_off_writes_shutdown_register() {
        let mut display = display::<8>(&reg_write(0x0C, 0x00), 1);
        display.power_off().unwrap();
        finish(display);
    }

    #[test]
    fn scan_limit_is_count_minus_one() {
        for count in 1..=8u8 {
            let mut display = display::<8>(&reg_write(0x0B, count - 1), 1);
            display.set_num_digits(count).unwrap();
            finish(display);
        }
    }

    #[test]
    fn decode_mode_accepts_enum_and_raw_mask() {
        let mut display = display::<8>(
            &[reg_write(0x09, 0xFF), reg_write(0x09, 0x3C)].concat(),
            2,
        );
        display.set_decode_mode(DecodeMode::CodeBDigits7_0).unwrap();
        display.set_decode_mode(0x3Cu8).unwrap();
        finish(display);
    }

    #[test]
    fn intensity_writes_through() {
        let mut display = display::<8>(&reg_write(0x0A, INTENSITY_MAX), 1);
        display.set_intensity(INTENSITY_MAX).unwrap();
        finish(display);
    }

    #[test]
    fn digit_addressing_is_inverted() {
        type Eight = MAX7219<SpiConnector<SpiMock<u8>, PinMock>, 8>;
        assert_eq!(Eight::digit_address(1), 8);
        assert_eq!(Eight::digit_address(8), 1);

        // Positions 1 and NUM_DIGITS only coincide on a 1-digit display.
        type One = MAX7219<SpiConnector<SpiMock<u8>, PinMock>, 1>;
        assert_eq!(One::digit_address(1), 1);

        let mut display = display::<8>(
            &[reg_write(0x08, 0x55), reg_write(0x01, 0x55)].concat(),
            2,
        );
        display.set_digit(1, 0x55).unwrap();
        display.set_digit(8, 0x55).unwrap();
        finish(display);
    }

    #[test]
    fn clear_display_raw_blanks_every_digit() {
        let expected: Vec<SpiTransaction<u8>> = (1..=4u8)
            .flat_map(|digit| reg_write(digit, 0x00))
            .collect();
        let mut display = display::<4>(&expected, 4);
        display.clear_display_raw().unwrap();
        finish(display);
    }

    #[test]
    fn clear_display_code_b_uses_blank_code() {
        let expected: Vec<SpiTransaction<u8>> = (1..=4u8)
            .flat_map(|digit| reg_write(digit, code_b::BLANK))
            .collect();
        let mut display = display::<4>(&expected, 4);
        display.clear_display_code_b().unwrap();
        finish(display);
    }

    #[test]
    fn print_string_hello_writes_five_framed_digits() {
        // H E L L O at positions 1..=5 of an 8-digit display.
        let expected = [
            reg_write(8, 0x37),
            reg_write(7, 0x4F),
            reg_write(6, 0x0E),
            reg_write(5, 0x0E),
            reg_write(4, 0x7E),
        ]
        .concat();
        let mut display = display::<8>(&expected, 5);
        display.print_string("HELLO", 1).unwrap();
        finish(display);
    }

    #[test]
    fn print_string_truncates_at_last_digit() {
        // Offset equals the digit count: only 'A' lands, on the last digit.
        let mut display = display::<8>(&reg_write(1, 0x77), 1);
        display.print_string("AB", 8).unwrap();
        finish(display);
    }

    #[test]
    fn print_string_past_the_end_writes_nothing() {
        let mut display = display::<8>(&[], 0);
        display.print_string("AB", 9).unwrap();
        finish(display);
    }

    #[test]
    fn default_init_orders_config_before_power_and_blank() {
        let expected = [
            reg_write(0x09, 0x00),
            reg_write(0x0B, 0x07),
            reg_write(0x0A, INTENSITY_HALF),
            reg_write(0x0C, 0x01),
            reg_write(1, 0x00),
            reg_write(2, 0x00),
            reg_write(3, 0x00),
            reg_write(4, 0x00),
            reg_write(5, 0x00),
            reg_write(6, 0x00),
            reg_write(7, 0x00),
            reg_write(8, 0x00),
        ]
        .concat();
        let mut display = display::<8>(&expected, 12);
        display.default_init().unwrap();
        finish(display);
    }

    #[test]
    fn sweep_string_sweeps_in_then_scrolls_off() {
        // Two digits, "ab": frames are print at offset 2 (one digit fits),
        // print at offset 1 (both digits), then the "b" suffix at offset 1,
        // each followed by a full clear.
        let clear = [reg_write(1, 0x00), reg_write(2, 0x00)].concat();
        let expected = [
            reg_write(1, 0x7D), // 'a' at position 2
            clear.clone(),
            reg_write(2, 0x7D), // 'a' at position 1
            reg_write(1, 0x1F), // 'b' at position 2
            clear.clone(),
            reg_write(2, 0x1F), // 'b' at position 1
            clear,
        ]
        .concat();
        let mut display = display::<2>(&expected, 10);
        display.sweep_string("ab", &mut NoopDelay::new()).unwrap();
        finish(display);
    }
}
