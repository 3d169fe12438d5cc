#![no_std]
#![doc = include_str!("../README.md")]
#![warn(missing_docs)]

pub mod calibration;
pub mod device;
pub mod interface;
pub mod registers;
pub mod sensors;

// Re-export main types
pub use calibration::ImuCalibration;
pub use device::{Icm42688pDriver, RawSample};
pub use interface::{I2cInterface, SpiInterface};
pub use sensors::{
    AccelConfig, AccelData, AccelDataMps2, AccelDlpf, AccelMode, AccelOdr, AccelScale, GyroConfig,
    GyroData, GyroDataDps, GyroDataRps, GyroDlpf, GyroMode, GyroOdr, GyroScale, ImuData,
};

/// ICM-42688-P I2C address when AD0 pin is low (default: 0x68)
///
/// Use [`I2cInterface::default()`] for this configuration.
pub const I2C_ADDRESS_AD0_LOW: u8 = 0x68;

/// ICM-42688-P I2C address when AD0 pin is high (alternative: 0x69)
///
/// Use [`I2cInterface::alternative()`] for this configuration.
pub const I2C_ADDRESS_AD0_HIGH: u8 = 0x69;

/// Expected value of `WHO_AM_I` register
pub const WHO_AM_I_VALUE: u8 = 0x47;

/// Register group whose write-verify loop failed during configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigPhase {
    /// `PWR_MGMT0` (accelerometer and gyroscope mode)
    PowerMode,
    /// `ACCEL_CONFIG0` / `GYRO_CONFIG0` (full-scale range and output data rate)
    ScaleOdr,
    /// `GYRO_ACCEL_CONFIG0` (UI low-pass filter bandwidth)
    Filter,
}

/// Driver errors
#[derive(Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error<E> {
    /// Communication error with the device
    Bus(E),
    /// `WHO_AM_I` never matched within the retry budget (contains the last value read)
    Connection(u8),
    /// A configuration register never read back the written value
    ConfigWrite(ConfigPhase),
    /// Every burst read within the retry budget looked like an unfilled buffer
    SampleTimeout,
    /// Invalid configuration parameter
    InvalidConfig,
    /// The scale needed for this operation has not been configured yet
    NotConfigured,
}

impl<E> From<E> for Error<E> {
    fn from(error: E) -> Self {
        Self::Bus(error)
    }
}
