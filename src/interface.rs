//! Bus interface implementations for the ICM-42688-P
//!
//! This module provides implementations of the `device-driver` register
//! interface traits for I2C and SPI communication with the ICM-42688-P.
//! Both backends auto-increment the register address across multi-byte
//! transfers, which the burst sample read relies on.

use crate::I2C_ADDRESS_AD0_LOW;

use device_driver::RegisterInterface;

/// Longest payload a single `write_register` call sends
///
/// Both backends frame writes in a fixed stack buffer. Payload bytes past
/// this length are dropped, not sent.
pub const MAX_WRITE_LEN: usize = 32;

/// SPI read flag (bit 7 of the address byte)
const SPI_READ_FLAG: u8 = 0x80;

/// I2C interface for the ICM-42688-P
pub struct I2cInterface<I2C> {
    i2c: I2C,
    address: u8,
}

impl<I2C> I2cInterface<I2C> {
    /// Create a new I2C interface with the default address (0x68, AD0 pin LOW)
    ///
    /// # Example
    /// ```ignore
    /// let interface = I2cInterface::default(i2c);
    /// let mut imu = Icm42688pDriver::new(interface);
    /// ```
    pub const fn default(i2c: I2C) -> Self {
        Self {
            i2c,
            address: I2C_ADDRESS_AD0_LOW,
        }
    }

    /// Create a new I2C interface with the alternative address (0x69, AD0 pin HIGH)
    pub const fn alternative(i2c: I2C) -> Self {
        Self {
            i2c,
            address: crate::I2C_ADDRESS_AD0_HIGH,
        }
    }

    /// Create a new I2C interface with a custom device address
    ///
    /// # Arguments
    /// * `i2c` - The I2C peripheral
    /// * `address` - The 7-bit I2C device address
    pub const fn new(i2c: I2C, address: u8) -> Self {
        Self { i2c, address }
    }

    /// The 7-bit device address used for transfers
    pub const fn address(&self) -> u8 {
        self.address
    }

    /// Consume the interface and return the I2C peripheral
    pub fn release(self) -> I2C {
        self.i2c
    }
}

/// Prefix `data` with the register address, truncating to [`MAX_WRITE_LEN`] bytes.
///
/// Returns the number of payload bytes kept.
fn framed_write(address: u8, data: &[u8], buffer: &mut [u8; MAX_WRITE_LEN + 1]) -> usize {
    buffer[0] = address;
    let len = data.len().min(MAX_WRITE_LEN);
    buffer[1..=len].copy_from_slice(&data[..len]);
    len
}

impl<I2C, E> RegisterInterface for I2cInterface<I2C>
where
    I2C: embedded_hal::i2c::I2c<Error = E>,
{
    type Error = E;
    type AddressType = u8;

    fn read_register(
        &mut self,
        address: Self::AddressType,
        _size_bits: u32,
        read_data: &mut [u8],
    ) -> Result<(), Self::Error> {
        self.i2c.write_read(self.address, &[address], read_data)
    }

    /// Writes at most [`MAX_WRITE_LEN`] bytes of `write_data`
    fn write_register(
        &mut self,
        address: Self::AddressType,
        _size_bits: u32,
        write_data: &[u8],
    ) -> Result<(), Self::Error> {
        let mut buffer = [0u8; MAX_WRITE_LEN + 1];
        let len = framed_write(address, write_data, &mut buffer);
        self.i2c.write(self.address, &buffer[..=len])
    }
}

#[cfg(feature = "async")]
impl<I2C, E> device_driver::AsyncRegisterInterface for I2cInterface<I2C>
where
    I2C: embedded_hal_async::i2c::I2c<Error = E>,
{
    type Error = E;
    type AddressType = u8;

    async fn read_register(
        &mut self,
        address: Self::AddressType,
        _size_bits: u32,
        read_data: &mut [u8],
    ) -> Result<(), Self::Error> {
        self.i2c
            .write_read(self.address, &[address], read_data)
            .await
    }

    /// Writes at most [`MAX_WRITE_LEN`] bytes of `write_data`
    async fn write_register(
        &mut self,
        address: Self::AddressType,
        _size_bits: u32,
        write_data: &[u8],
    ) -> Result<(), Self::Error> {
        let mut buffer = [0u8; MAX_WRITE_LEN + 1];
        let len = framed_write(address, write_data, &mut buffer);
        self.i2c.write(self.address, &buffer[..=len]).await
    }
}

/// SPI interface for the ICM-42688-P
///
/// # Note on Chip Select
///
/// This interface uses the `SpiDevice` trait from `embedded-hal`, which manages
/// the chip select (CS) pin automatically. With `embedded-hal-bus` you would
/// typically create the device like:
/// ```ignore
/// let spi_device = embedded_hal_bus::spi::ExclusiveDevice::new(spi_bus, cs_pin, delay);
/// let interface = SpiInterface::new(spi_device);
/// ```
pub struct SpiInterface<SPI> {
    spi: SPI,
}

impl<SPI> SpiInterface<SPI> {
    /// Create a new SPI interface with the given SPI device
    pub const fn new(spi: SPI) -> Self {
        Self { spi }
    }

    /// Consume the interface and return the SPI device
    pub fn release(self) -> SPI {
        self.spi
    }
}

impl<SPI, E> RegisterInterface for SpiInterface<SPI>
where
    SPI: embedded_hal::spi::SpiDevice<Error = E>,
{
    type Error = E;
    type AddressType = u8;

    fn read_register(
        &mut self,
        address: Self::AddressType,
        _size_bits: u32,
        read_data: &mut [u8],
    ) -> Result<(), Self::Error> {
        let read_address = address | SPI_READ_FLAG;

        let mut operations = [
            embedded_hal::spi::Operation::Write(&[read_address]),
            embedded_hal::spi::Operation::Read(read_data),
        ];

        self.spi.transaction(&mut operations)
    }

    /// Writes at most [`MAX_WRITE_LEN`] bytes of `write_data`
    fn write_register(
        &mut self,
        address: Self::AddressType,
        _size_bits: u32,
        write_data: &[u8],
    ) -> Result<(), Self::Error> {
        let mut buffer = [0u8; MAX_WRITE_LEN + 1];
        let len = framed_write(address & !SPI_READ_FLAG, write_data, &mut buffer);
        self.spi.write(&buffer[..=len])
    }
}

#[cfg(feature = "async")]
impl<SPI, E> device_driver::AsyncRegisterInterface for SpiInterface<SPI>
where
    SPI: embedded_hal_async::spi::SpiDevice<Error = E>,
{
    type Error = E;
    type AddressType = u8;

    async fn read_register(
        &mut self,
        address: Self::AddressType,
        _size_bits: u32,
        read_data: &mut [u8],
    ) -> Result<(), Self::Error> {
        let read_address = address | SPI_READ_FLAG;

        let mut operations = [
            embedded_hal_async::spi::Operation::Write(&[read_address]),
            embedded_hal_async::spi::Operation::Read(read_data),
        ];

        self.spi.transaction(&mut operations).await
    }

    /// Writes at most [`MAX_WRITE_LEN`] bytes of `write_data`
    async fn write_register(
        &mut self,
        address: Self::AddressType,
        _size_bits: u32,
        write_data: &[u8],
    ) -> Result<(), Self::Error> {
        let mut buffer = [0u8; MAX_WRITE_LEN + 1];
        let len = framed_write(address & !SPI_READ_FLAG, write_data, &mut buffer);
        self.spi.write(&buffer[..=len]).await
    }
}
