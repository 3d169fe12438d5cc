//! Gyroscope sensor types and configuration
//!
//! Provides types, enums, and conversion helpers for the ICM-42688-P's 3-axis gyroscope.

use super::FULL_SCALE_COUNTS;

/// Gyroscope power mode (`PWR_MGMT0[3:2]`)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum GyroMode {
    /// Gyroscope off
    Off = 0x00,
    /// Standby (drive running, no output)
    Standby = 0x01,
    /// Low-noise mode
    #[default]
    LowNoise = 0x03,
}

/// Gyroscope full-scale range (`GYRO_CONFIG0[7:5]`)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum GyroScale {
    /// ±2000 °/s
    #[default]
    Dps2000 = 0x00,
    /// ±1000 °/s
    Dps1000 = 0x01,
    /// ±500 °/s
    Dps500 = 0x02,
    /// ±250 °/s
    Dps250 = 0x03,
    /// ±125 °/s
    Dps125 = 0x04,
    /// ±62.5 °/s
    Dps62_5 = 0x05,
    /// ±31.25 °/s
    Dps31_25 = 0x06,
    /// ±15.625 °/s
    Dps15_625 = 0x07,
}

impl GyroScale {
    /// Full-scale range in °/s, `2000 / 2^code`
    #[must_use]
    pub fn full_scale_dps(self) -> f32 {
        2000.0 / f32::from(1u8 << (self as u8))
    }

    /// Sensitivity in LSB per °/s
    #[must_use]
    pub fn sensitivity(self) -> f32 {
        FULL_SCALE_COUNTS / self.full_scale_dps()
    }
}

/// Gyroscope output data rate (`GYRO_CONFIG0[3:0]`)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum GyroOdr {
    /// 32 kHz
    Hz32000 = 0x01,
    /// 16 kHz
    Hz16000 = 0x02,
    /// 8 kHz
    Hz8000 = 0x03,
    /// 4 kHz
    Hz4000 = 0x04,
    /// 2 kHz
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
    /// 500 Hz
    Hz500 = 0x0F,
}

impl GyroOdr {
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
            Self::Hz500 => 500.0,
        }
    }
}

/// Gyroscope UI low-pass filter bandwidth (`GYRO_ACCEL_CONFIG0[3:0]`)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum GyroDlpf {
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

impl GyroDlpf {
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
    pub fn bandwidth_hz(self, odr: GyroOdr) -> f32 {
        odr.hz() / f32::from(self.divisor())
    }
}

/// Gyroscope configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct GyroConfig {
    /// Power mode
    pub mode: GyroMode,
    /// Full-scale range
    pub scale: GyroScale,
    /// Output data rate
    pub odr: GyroOdr,
    /// UI low-pass filter bandwidth
    pub dlpf: GyroDlpf,
}

/// Gyroscope data (raw 16-bit values)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct GyroData {
    /// X-axis rotation (raw)
    pub x: i16,
    /// Y-axis rotation (raw)
    pub y: i16,
    /// Z-axis rotation (raw)
    pub z: i16,
}

/// Gyroscope data in degrees per second
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct GyroDataDps {
    /// X-axis angular velocity in °/s
    pub x: f32,
    /// Y-axis angular velocity in °/s
    pub y: f32,
    /// Z-axis angular velocity in °/s
    pub z: f32,
}

impl GyroDataDps {
    /// Create from raw sensor values
    ///
    /// `physical = raw * full_scale_dps / 32768`
    #[must_use]
    pub fn from_raw(raw: GyroData, full_scale_dps: f32) -> Self {
        let factor = full_scale_dps / FULL_SCALE_COUNTS;
        Self {
            x: f32::from(raw.x) * factor,
            y: f32::from(raw.y) * factor,
            z: f32::from(raw.z) * factor,
        }
    }

    /// Convert to radians per second
    #[must_use]
    pub fn to_radians(&self) -> GyroDataRps {
        GyroDataRps {
            x: self.x.to_radians(),
            y: self.y.to_radians(),
            z: self.z.to_radians(),
        }
    }
}

/// Gyroscope data in radians per second
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct GyroDataRps {
    /// X-axis angular velocity in rad/s
    pub x: f32,
    /// Y-axis angular velocity in rad/s
    pub y: f32,
    /// Z-axis angular velocity in rad/s
    pub z: f32,
}
