//! Bus transports used to reach the MAX7219.

use embedded_hal::digital::OutputPin;
use embedded_hal::spi::SpiBus;

use crate::DataError;

/// Describes the interface used to connect to the MAX7219.
///
/// The chip latches a register write on the rising edge of chip-select, so
/// the select line must stay asserted for both bytes of a transaction and
/// be released between independent writes. [`Connector::write_register`]
/// provides exactly that framing; implementors supply the line handling and
/// the byte transfer, which blocks until the hardware reports completion.
pub trait Connector {
    /// Asserts the active-low chip-select line.
    fn select(&mut self) -> Result<(), DataError>;

    /// Releases the chip-select line, latching the pending transaction.
    fn deselect(&mut self) -> Result<(), DataError>;

    /// Clocks out one byte, MSB first, blocking until it is on the wire.
    fn transfer_byte(&mut self, byte: u8) -> Result<(), DataError>;

    ///
    /// Performs one framed register write: address byte then data byte
    /// under a single chip-select assertion.
    ///
    /// # Arguments
    ///
    /// * `register` - the register address on the chip to write to
    /// * `data` - the data byte value to write
    ///
    fn write_register(&mut self, register: u8, data: u8) -> Result<(), DataError> {
        self.select()?;
        self.transfer_byte(register)?;
        self.transfer_byte(data)?;
        self.deselect()
    }
}

/// Software-SPI connector bit-banging three GPIO outputs.
pub struct PinConnector<DATA, CS, SCK> {
    data: DATA,
    cs: CS,
    sck: SCK,
}

impl<DATA, CS, SCK> PinConnector<DATA, CS, SCK>
where
    DATA: OutputPin,
    CS: OutputPin,
    SCK: OutputPin,
{
    pub(crate) fn new(data: DATA, cs: CS, sck: SCK) -> Self {
        PinConnector { data, cs, sck }
    }

    #[cfg(test)]
    pub(crate) fn release(self) -> (DATA, CS, SCK) {
        (self.data, self.cs, self.sck)
    }
}

impl<DATA, CS, SCK> Connector for PinConnector<DATA, CS, SCK>
where
    DATA: OutputPin,
    CS: OutputPin,
    SCK: OutputPin,
{
    fn select(&mut self) -> Result<(), DataError> {
        self.cs.set_low().map_err(|_| DataError::Pin)
    }

    fn deselect(&mut self) -> Result<(), DataError> {
        self.cs.set_high().map_err(|_| DataError::Pin)
    }

    fn transfer_byte(&mut self, byte: u8) -> Result<(), DataError> {
        for i in 0..8 {
            if byte & (1 << (7 - i)) > 0 {
                self.data.set_high().map_err(|_| DataError::Pin)?;
            } else {
                self.data.set_low().map_err(|_| DataError::Pin)?;
            }

            // Data is sampled on the rising clock edge.
            self.sck.set_high().map_err(|_| DataError::Pin)?;
            self.sck.set_low().map_err(|_| DataError::Pin)?;
        }

        Ok(())
    }
}

/// Hardware-SPI connector with a separately driven chip-select pin.
///
/// Each byte is flushed before the transfer returns; a bus that never
/// completes blocks forever. Hosts that want a bounded wait instead
/// implement [`Connector`] over a timeout-aware bus of their own.
pub struct SpiConnector<SPI, CS> {
    spi: SPI,
    cs: CS,
}

impl<SPI, CS> SpiConnector<SPI, CS>
where
    SPI: SpiBus<u8>,
    CS: OutputPin,
{
    pub(crate) fn new(spi: SPI, cs: CS) -> Self {
        SpiConnector { spi, cs }
    }

    #[cfg(test)]
    pub(crate) fn release(self) -> (SPI, CS) {
        (self.spi, self.cs)
    }
}

impl<SPI, CS> Connector for SpiConnector<SPI, CS>
where
    SPI: SpiBus<u8>,
    CS: OutputPin,
{
    fn select(&mut self) -> Result<(), DataError> {
        self.cs.set_low().map_err(|_| DataError::Pin)
    }

    fn deselect(&mut self) -> Result<(), DataError> {
        self.cs.set_high().map_err(|_| DataError::Pin)
    }

    fn transfer_byte(&mut self, byte: u8) -> Result<(), DataError> {
        self.spi.write(&[byte]).map_err(|_| DataError::Spi)?;
        self.spi.flush().map_err(|_| DataError::Spi)
    }
}
