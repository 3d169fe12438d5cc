//! Accelerometer sensor types and configuration
//!
//! Provides types, enums, and conversion helpers for the ICM-42688-P's 3-axis accelerometer.

use super::{FULL_SCALE_COUNTS, STANDARD_GRAVITY};

/// Accelerometer power mode (`PWR_MGMT0[1:0]`)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum AccelMode {
    /// Accelerometer off
    Off = 0x00,
    /// Low-power mode (duty-cycled)
    LowPower = 0x02,
    /// Low-noise mode (continuous)
    #[default]
    LowNoise = 0x03,
}

/// Accelerometer full-scale range (`ACCEL_CONFIG0[7:5]`)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum AccelScale {
    /// ±16g range (least sensitive, most range)
    #[default]
    G16 = 0x00,
    /// ±8g range
    G8 = 0x01,
    /// ±4g range
    G4 = 0x02,
    /// ±2g range (most sensitive, least range)
    G2 = 0x03,
}

impl AccelScale {
    /// Get the maximum value in g
    #[must_use]
    pub const fn max_value(self) -> u8 {
        16 >> (self as u8)
    }

    /// Full-scale range in g, `16 / 2^code`
    #[must_use]
    pub fn full_scale_g(self) -> f32 {
        f32::from(self.max_value())
    }

    /// Raw counts corresponding to 1 g at this range (LSB/g)
    #[must_use]
    pub const fn counts_per_g(self) -> i32 {
        32768 / (self.max_value() as i32)
    }
}

/// Accelerometer output data rate (`ACCEL_CONFIG0[3:0]`)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum AccelOdr {
    /// 32 kHz (low-noise mode only)
    Hz32000 = 0x01,
    /// 16 kHz (low-noise mode only)
    Hz16000 = 0x02,
    /// 8 kHz (low-noise mode only)
    Hz8000 = 0x03,
    /// 4 kHz (low-noise mode only)
    Hz4000 = 0x04,
    /// 2 kHz (low-noise mode only)
    Hz2000 = 0x05,
    /// 1 kHz
    #[default]
    Hz1000 = 0x06,
    /// 200 Hz
    Hz200 = 0x07,
    /// 100 Hz
    Hz100 = 0x08,
    /// 50 Hz
    Hz50 = 0x09,
    /// 25 Hz
    Hz25 = 0x0A,
    /// 12.5 Hz
    Hz12_5 = 0x0B,
    /// 6.25 Hz (low-power mode only)
    Hz6_25 = 0x0C,
    /// 3.125 Hz (low-power mode only)
    Hz3_125 = 0x0D,
    /// 1.5625 Hz (low-power mode only)
    Hz1_5625 = 0x0E,
    /// 500 Hz
    Hz500 = 0x0F,
}

impl AccelOdr {
    /// Output data rate in Hz
    #[must_use]
    pub const fn hz(self) -> f32 {
        match self {
            Self::Hz32000 => 32000.0,
            Self::Hz16000 => 16000.0,
            Self::Hz8000 => 8000.0,
            Self::Hz4000 => 4000.0,
            Self::Hz2000 => 2000.0,
            Self::Hz1000 => 1000.0,
            Self::Hz200 => 200.0,
            Self::Hz100 => 100.0,
            Self::Hz50 => 50.0,
            Self::Hz25 => 25.0,
            Self::Hz12_5 => 12.5,
            Self::Hz6_25 => 6.25,
            Self::Hz3_125 => 3.125,
            Self::Hz1_5625 => 1.5625,
            Self::Hz500 => 500.0,
        }
    }
}

/// Accelerometer UI low-pass filter bandwidth (`GYRO_ACCEL_CONFIG0[7:4]`)
///
/// The bandwidth is expressed as a fraction of the output data rate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum AccelDlpf {
    /// ODR / 2
    #[default]
    OdrDiv2 = 0x00,
    /// ODR / 4
    OdrDiv4 = 0x01,
    /// ODR / 5
    OdrDiv5 = 0x02,
    /// ODR / 8
    OdrDiv8 = 0x03,
    /// ODR / 10
    OdrDiv10 = 0x04,
    /// ODR / 16
    OdrDiv16 = 0x05,
    /// ODR / 20
    OdrDiv20 = 0x06,
    /// ODR / 40
    OdrDiv40 = 0x07,
}

impl AccelDlpf {
    /// ODR divisor for this filter setting
    #[must_use]
    pub const fn divisor(self) -> u8 {
        match self {
            Self::OdrDiv2 => 2,
            Self::OdrDiv4 => 4,
            Self::OdrDiv5 => 5,
            Self::OdrDiv8 => 8,
            Self::OdrDiv10 => 10,
            Self::OdrDiv16 => 16,
            Self::OdrDiv20 => 20,
            Self::OdrDiv40 => 40,
        }
    }

    /// Filter bandwidth in Hz at the given output data rate
    #[must_use]
    pub fn bandwidth_hz(self, odr: AccelOdr) -> f32 {
        odr.hz() / f32::from(self.divisor())
    }
}

/// Accelerometer configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct AccelConfig {
    /// Power mode
    pub mode: AccelMode,
    /// Full-scale range
    pub scale: AccelScale,
    /// Output data rate
    pub odr: AccelOdr,
    /// UI low-pass filter bandwidth
    pub dlpf: AccelDlpf,
}

/// Accelerometer data (raw 16-bit values)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct AccelData {
    /// X-axis acceleration (raw)
    pub x: i16,
    /// Y-axis acceleration (raw)
    pub y: i16,
    /// Z-axis acceleration (raw)
    pub z: i16,
}

/// Accelerometer data in physical units (m/s²)
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct AccelDataMps2 {
    /// X-axis acceleration in m/s²
    pub x: f32,
    /// Y-axis acceleration in m/s²
    pub y: f32,
    /// Z-axis acceleration in m/s²
    pub z: f32,
}

impl AccelDataMps2 {
    /// Create from raw sensor values
    ///
    /// `physical = raw * 9.80665 * full_scale_g / 32768`
    ///
    /// # Arguments
    ///
    /// * `raw` - Offset-corrected raw counts
    /// * `full_scale_g` - Configured full-scale range in g (from [`AccelScale::full_scale_g`])
    #[must_use]
    pub fn from_raw(raw: AccelData, full_scale_g: f32) -> Self {
        let factor = STANDARD_GRAVITY * full_scale_g / FULL_SCALE_COUNTS;
        Self {
            x: f32::from(raw.x) * factor,
            y: f32::from(raw.y) * factor,
            z: f32::from(raw.z) * factor,
        }
    }

    /// Get the magnitude of the acceleration vector
    #[must_use]
    pub fn magnitude(&self) -> f32 {
        libm::sqrtf(self.x * self.x + self.y * self.y + self.z * self.z)
    }
}
