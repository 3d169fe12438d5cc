//! Sensor modules for the ICM-42688-P
//!
//! This module provides types, enums, and configuration structures for each sensor
//! in the ICM-42688-P:
//! - Accelerometer (3-axis)
//! - Gyroscope (3-axis)
//!
//! Conversions from raw counts to physical units live here and do no I/O.
//! All sensor operations are performed through methods on `Icm42688pDriver`.

pub mod accelerometer;
pub mod gyroscope;

// Re-export main types
pub use accelerometer::{
    AccelConfig, AccelData, AccelDataMps2, AccelDlpf, AccelMode, AccelOdr, AccelScale,
};
pub use gyroscope::{
    GyroConfig, GyroData, GyroDataDps, GyroDataRps, GyroDlpf, GyroMode, GyroOdr, GyroScale,
};

/// Standard gravity in m/s²
pub const STANDARD_GRAVITY: f32 = 9.80665;

/// Magnitude of the signed 16-bit output range
pub const FULL_SCALE_COUNTS: f32 = 32768.0;

/// One accelerometer + gyroscope reading in physical units
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ImuData {
    /// Acceleration in m/s²
    pub accel: AccelDataMps2,
    /// Angular velocity in °/s
    pub gyro: GyroDataDps,
}
