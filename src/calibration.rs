//! Static bias calibration
//!
//! Offsets are per-axis raw-count biases that the driver subtracts from every
//! corrected read. They are produced by averaging a run of samples taken while
//! the sensor sits level and still with its Z axis against gravity, so the
//! accelerometer Z offset also absorbs the expected 1 g reading.
//!
//! The accumulation arithmetic lives here so the blocking and async drivers
//! share it; the drivers only own the sampling loop.

use crate::device::RawSample;
use crate::sensors::{AccelData, GyroData};

/// Raw reads discarded before accumulation so the sensor can settle after a
/// configuration change
pub const CALIBRATION_SETTLE_READS: u16 = 100;

/// Pause between accumulated calibration samples, in microseconds
///
/// Keeps sampling slower than any output data rate of 1 kHz or above.
pub const CALIBRATION_SAMPLE_INTERVAL_US: u32 = 1_000;

/// Per-axis raw-count offsets for both sensors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ImuCalibration {
    /// Accelerometer X/Y/Z offsets (subtracted from raw values)
    pub accel_offset: [i16; 3],
    /// Gyroscope X/Y/Z offsets (subtracted from raw values)
    pub gyro_offset: [i16; 3],
}

impl ImuCalibration {
    /// Apply accelerometer offsets to a raw reading
    #[must_use]
    pub fn apply_accel(&self, raw: AccelData) -> AccelData {
        let [ox, oy, oz] = self.accel_offset;
        AccelData {
            x: raw.x.saturating_sub(ox),
            y: raw.y.saturating_sub(oy),
            z: raw.z.saturating_sub(oz),
        }
    }

    /// Apply gyroscope offsets to a raw reading
    #[must_use]
    pub fn apply_gyro(&self, raw: GyroData) -> GyroData {
        let [ox, oy, oz] = self.gyro_offset;
        GyroData {
            x: raw.x.saturating_sub(ox),
            y: raw.y.saturating_sub(oy),
            z: raw.z.saturating_sub(oz),
        }
    }

    /// Apply both sets of offsets to a raw sample
    #[must_use]
    pub fn apply(&self, raw: RawSample) -> RawSample {
        RawSample {
            accel: self.apply_accel(raw.accel),
            gyro: self.apply_gyro(raw.gyro),
        }
    }
}

/// Running per-axis sums of uncorrected samples
#[derive(Debug, Clone, Copy, Default)]
pub struct OffsetAccumulator {
    accel_sum: [i64; 3],
    gyro_sum: [i64; 3],
    count: u32,
}

impl OffsetAccumulator {
    /// Create an empty accumulator
    #[must_use]
    pub const fn new() -> Self {
        Self {
            accel_sum: [0; 3],
            gyro_sum: [0; 3],
            count: 0,
        }
    }

    /// Add one sample
    pub fn add(&mut self, sample: &RawSample) {
        let accel = [sample.accel.x, sample.accel.y, sample.accel.z];
        let gyro = [sample.gyro.x, sample.gyro.y, sample.gyro.z];
        for axis in 0..3 {
            self.accel_sum[axis] += i64::from(accel[axis]);
            self.gyro_sum[axis] += i64::from(gyro[axis]);
        }
        self.count += 1;
    }

    /// Number of samples accumulated so far
    #[must_use]
    pub const fn count(&self) -> u32 {
        self.count
    }

    /// Average the sums and remove `counts_per_g` from the Z accelerometer axis
    ///
    /// Averages truncate toward zero. Returns `None` if no samples were added.
    #[must_use]
    pub fn finish(&self, counts_per_g: i32) -> Option<ImuCalibration> {
        if self.count == 0 {
            return None;
        }
        let count = i64::from(self.count);
        // The mean of i16 samples always fits in i16
        #[allow(clippy::cast_possible_truncation)]
        let average = |sum: i64| (sum / count) as i16;

        let mut accel_offset = self.accel_sum.map(average);
        let gyro_offset = self.gyro_sum.map(average);

        let gravity = i16::try_from(counts_per_g).unwrap_or(i16::MAX);
        accel_offset[2] = accel_offset[2].saturating_sub(gravity);

        Some(ImuCalibration {
            accel_offset,
            gyro_offset,
        })
    }
}
