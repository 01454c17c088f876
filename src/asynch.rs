//! Async variant of the driver, built on [`embedded-hal-async`] traits.
//!
//! Chip-select framing comes from the [`SpiDevice`] transaction contract,
//! so each register write is a single two-byte transaction on the device.
//!
//! [`embedded-hal-async`]: https://docs.rs/embedded-hal-async/~1.0

use embedded_hal_async::delay::DelayNs;
use embedded_hal_async::spi::SpiDevice;

use crate::{Command, DataError, DecodeMode, INTENSITY_HALF, SWEEP_FRAME_MS, code_b, font};

///
/// Handles communication with a MAX7219 chip driving `NUM_DIGITS`
/// seven-segment digits over an async SPI device.
///
/// Same write-only register surface as the blocking [`crate::MAX7219`];
/// see there for the digit addressing and bounds conventions.
///
pub struct MAX7219<SPI, const NUM_DIGITS: u8> {
    spi: SPI,
}

impl<SPI, const NUM_DIGITS: u8> MAX7219<SPI, NUM_DIGITS>
where
    SPI: SpiDevice,
{
    ///
    /// Returns a new MAX7219 handler over the given SPI device. No
    /// chip-side writes occur.
    ///
    /// # Arguments
    ///
    /// * `spi` - the SPI device, configured for mode 0 at 10 MHz or less
    ///
    pub fn new(spi: SPI) -> Self {
        MAX7219 { spi }
    }

    async fn write_register(&mut self, register: u8, data: u8) -> Result<(), DataError> {
        self.spi
            .write(&[register, data])
            .await
            .map_err(|_| DataError::Spi)
    }

    /// Programs the chip to a usable default state; see
    /// [`crate::MAX7219::default_init`].
    pub async fn default_init(&mut self) -> Result<(), DataError> {
        self.set_decode_mode(DecodeMode::NoDecode).await?;
        self.set_num_digits(NUM_DIGITS).await?;
        self.set_intensity(INTENSITY_HALF).await?;
        self.power_on().await?;
        self.clear_display_raw().await
    }

    /// Puts the display into normal operation.
    pub async fn power_on(&mut self) -> Result<(), DataError> {
        self.write_register(Command::Shutdown.into(), 0x01).await
    }

    /// Puts the display into shutdown mode; register contents are retained.
    pub async fn power_off(&mut self) -> Result<(), DataError> {
        self.write_register(Command::Shutdown.into(), 0x00).await
    }

    /// Selects which digits use the chip's built-in Code B decoder.
    pub async fn set_decode_mode(&mut self, digits: impl Into<u8>) -> Result<(), DataError> {
        self.write_register(Command::DecodeMode.into(), digits.into())
            .await
    }

    /// Sets the active digit count; the caller must keep it in `1..=8`.
    pub async fn set_num_digits(&mut self, count: u8) -> Result<(), DataError> {
        self.write_register(Command::ScanLimit.into(), count - 1)
            .await
    }

    /// Sets the display brightness, `0x00` (darkest) to `0x0F` (brightest).
    pub async fn set_intensity(&mut self, intensity: u8) -> Result<(), DataError> {
        self.write_register(Command::Intensity.into(), intensity)
            .await
    }

    /// Writes a value to the digit register for `position` (1-indexed from
    /// the left, caller-bounded; see [`crate::MAX7219::set_digit`]).
    pub async fn set_digit(&mut self, position: u8, value: u8) -> Result<(), DataError> {
        self.write_register(NUM_DIGITS - position + 1, value).await
    }

    /// Blanks every active digit using the Code B blank code.
    pub async fn clear_display_code_b(&mut self) -> Result<(), DataError> {
        for digit in 1..=NUM_DIGITS {
            self.write_register(digit, code_b::BLANK).await?;
        }

        Ok(())
    }

    /// Blanks every active digit using the all-segments-off raw mask.
    pub async fn clear_display_raw(&mut self) -> Result<(), DataError> {
        for digit in 1..=NUM_DIGITS {
            self.write_register(digit, font::encode(' ')).await?;
        }

        Ok(())
    }

    /// Prints `text` at consecutive positions starting at `offset`,
    /// truncating past the last digit.
    pub async fn print_string(&mut self, text: &str, mut offset: u8) -> Result<(), DataError> {
        for c in text.chars() {
            if offset > NUM_DIGITS {
                break;
            }
            self.set_digit(offset, font::encode(c)).await?;
            offset += 1;
        }

        Ok(())
    }

    /// Runs one full marquee pass of `text`; see
    /// [`crate::MAX7219::sweep_string`].
    pub async fn sweep_string<D: DelayNs>(
        &mut self,
        text: &str,
        delay: &mut D,
    ) -> Result<(), DataError> {
        for offset in (1..=NUM_DIGITS).rev() {
            self.print_string(text, offset).await?;
            delay.delay_ms(SWEEP_FRAME_MS).await;
            self.clear_display_raw().await?;
        }

        for (start, _) in text.char_indices().skip(1) {
            self.print_string(&text[start..], 1).await?;
            delay.delay_ms(SWEEP_FRAME_MS).await;
            self.clear_display_raw().await?;
        }

        Ok(())
    }

    /// Releases the SPI device.
    pub fn release(self) -> SPI {
        self.spi
    }
}
