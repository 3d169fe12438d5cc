//! High-level driver API for the ICM-42688-P
//!
//! This module provides the device protocol: connection probing,
//! write-then-verify configuration, raw burst reads and calibration.
//!
//! Every retry in this module is bounded by an attempt count, never by
//! elapsed time, so the number of bus transactions an operation may issue is
//! fixed:
//!
//! | Operation                 | Attempts                     |
//! |---------------------------|------------------------------|
//! | `connect`                 | [`CONNECTION_ATTEMPTS`]      |
//! | each configuration write  | [`CONFIG_WRITE_ATTEMPTS`]    |
//! | `read_raw`                | [`SAMPLE_READ_ATTEMPTS`]     |

use crate::calibration::{ImuCalibration, OffsetAccumulator};
use crate::registers::{self, Bank0, SENSOR_DATA_LEN};
use crate::sensors::{
    AccelConfig, AccelData, AccelDataMps2, AccelScale, GyroConfig, GyroData, GyroDataDps,
    GyroScale, ImuData,
};
use crate::{ConfigPhase, Error};

// Blocking API imports
#[cfg(not(feature = "async"))]
use crate::WHO_AM_I_VALUE;
#[cfg(not(feature = "async"))]
use crate::calibration::{CALIBRATION_SAMPLE_INTERVAL_US, CALIBRATION_SETTLE_READS};
#[cfg(not(feature = "async"))]
use device_driver::RegisterInterface;

/// Maximum `WHO_AM_I` reads before [`Error::Connection`]
pub const CONNECTION_ATTEMPTS: u16 = 100;

/// Maximum write/read-back cycles per register before [`Error::ConfigWrite`]
pub const CONFIG_WRITE_ATTEMPTS: u16 = 100;

/// Maximum burst reads before [`Error::SampleTimeout`]
pub const SAMPLE_READ_ATTEMPTS: u16 = 200;

/// One raw accelerometer + gyroscope reading
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct RawSample {
    /// Accelerometer counts
    pub accel: AccelData,
    /// Gyroscope counts
    pub gyro: GyroData,
}

impl RawSample {
    /// Decode the 12-byte burst starting at `ACCEL_DATA_X1`
    ///
    /// Layout is accel X/Y/Z then gyro X/Y/Z, each a big-endian i16.
    #[must_use]
    pub const fn from_be_bytes(buf: &[u8; SENSOR_DATA_LEN]) -> Self {
        Self {
            accel: AccelData {
                x: i16::from_be_bytes([buf[0], buf[1]]),
                y: i16::from_be_bytes([buf[2], buf[3]]),
                z: i16::from_be_bytes([buf[4], buf[5]]),
            },
            gyro: GyroData {
                x: i16::from_be_bytes([buf[6], buf[7]]),
                y: i16::from_be_bytes([buf[8], buf[9]]),
                z: i16::from_be_bytes([buf[10], buf[11]]),
            },
        }
    }
}

/// True when the low bytes of the first three words are all zero
///
/// Such a burst is treated as a read that raced the output registers and is
/// retried. A genuine sample with those three bytes zero is indistinguishable
/// and gets retried as well.
const fn burst_not_landed(buf: &[u8; SENSOR_DATA_LEN]) -> bool {
    buf[1] == 0 && buf[3] == 0 && buf[5] == 0
}

/// Last-requested field values of the two shared registers
#[derive(Debug, Clone, Copy, Default)]
struct ShadowConfig {
    accel_mode: u8,
    gyro_mode: u8,
    accel_dlpf: u8,
    gyro_dlpf: u8,
}

impl ShadowConfig {
    const fn power_mode(&self) -> u8 {
        registers::pwr_mgmt0(self.accel_mode, self.gyro_mode)
    }

    const fn filter(&self) -> u8 {
        registers::gyro_accel_config0(self.accel_dlpf, self.gyro_dlpf)
    }
}

/// A single register value to be written and verified
#[derive(Debug, Clone, Copy)]
struct ConfigWrite {
    phase: ConfigPhase,
    register: Bank0,
    value: u8,
}

/// Main driver for the ICM-42688-P
///
/// The driver owns its transport. It is not internally synchronized; all
/// operations take `&mut self`.
pub struct Icm42688pDriver<I> {
    interface: I,
    // Last verified full-scale ranges
    accel_scale: Option<AccelScale>,
    gyro_scale: Option<GyroScale>,
    calibration: ImuCalibration,
    shadow: ShadowConfig,
}

impl<I> Icm42688pDriver<I> {
    /// Create a new driver instance
    ///
    /// No bus traffic happens here. Call [`connect`](Self::connect) to probe
    /// the device, then configure both sensors before reading physical units.
    pub const fn new(interface: I) -> Self {
        Self {
            interface,
            accel_scale: None,
            gyro_scale: None,
            calibration: ImuCalibration {
                accel_offset: [0; 3],
                gyro_offset: [0; 3],
            },
            shadow: ShadowConfig {
                accel_mode: 0,
                gyro_mode: 0,
                accel_dlpf: 0,
                gyro_dlpf: 0,
            },
        }
    }

    /// Consume the driver and return the underlying interface
    pub fn release(self) -> I {
        self.interface
    }

    /// Last verified accelerometer full-scale range
    #[must_use]
    pub const fn accel_scale(&self) -> Option<AccelScale> {
        self.accel_scale
    }

    /// Last verified gyroscope full-scale range
    #[must_use]
    pub const fn gyro_scale(&self) -> Option<GyroScale> {
        self.gyro_scale
    }

    /// Accelerometer full-scale range in g, or 0.0 before configuration
    #[must_use]
    pub fn accel_scale_value(&self) -> f32 {
        self.accel_scale.map_or(0.0, AccelScale::full_scale_g)
    }

    /// Gyroscope full-scale range in °/s, or 0.0 before configuration
    #[must_use]
    pub fn gyro_scale_value(&self) -> f32 {
        self.gyro_scale.map_or(0.0, GyroScale::full_scale_dps)
    }

    /// Get the current offsets
    #[must_use]
    pub const fn calibration(&self) -> &ImuCalibration {
        &self.calibration
    }

    /// Replace the offsets, e.g. with values saved from an earlier calibration
    ///
    /// The offsets are applied to all subsequent corrected readings.
    pub const fn set_calibration(&mut self, calibration: ImuCalibration) {
        self.calibration = calibration;
    }

    fn require_accel_scale<E>(&self) -> Result<AccelScale, Error<E>> {
        self.accel_scale.ok_or(Error::NotConfigured)
    }

    fn require_gyro_scale<E>(&self) -> Result<GyroScale, Error<E>> {
        self.gyro_scale.ok_or(Error::NotConfigured)
    }

    /// Record the accelerometer request and plan its three register writes
    fn accel_writes(&mut self, config: AccelConfig) -> [ConfigWrite; 3] {
        self.shadow.accel_mode = config.mode as u8;
        self.shadow.accel_dlpf = config.dlpf as u8;
        [
            ConfigWrite {
                phase: ConfigPhase::PowerMode,
                register: Bank0::PwrMgmt0,
                value: self.shadow.power_mode(),
            },
            ConfigWrite {
                phase: ConfigPhase::ScaleOdr,
                register: Bank0::AccelConfig0,
                value: registers::scale_odr(config.scale as u8, config.odr as u8),
            },
            ConfigWrite {
                phase: ConfigPhase::Filter,
                register: Bank0::GyroAccelConfig0,
                value: self.shadow.filter(),
            },
        ]
    }

    /// Record the gyroscope request and plan its three register writes
    fn gyro_writes(&mut self, config: GyroConfig) -> [ConfigWrite; 3] {
        self.shadow.gyro_mode = config.mode as u8;
        self.shadow.gyro_dlpf = config.dlpf as u8;
        [
            ConfigWrite {
                phase: ConfigPhase::PowerMode,
                register: Bank0::PwrMgmt0,
                value: self.shadow.power_mode(),
            },
            ConfigWrite {
                phase: ConfigPhase::ScaleOdr,
                register: Bank0::GyroConfig0,
                value: registers::scale_odr(config.scale as u8, config.odr as u8),
            },
            ConfigWrite {
                phase: ConfigPhase::Filter,
                register: Bank0::GyroAccelConfig0,
                value: self.shadow.filter(),
            },
        ]
    }

    fn to_physical(raw: RawSample, accel_scale: AccelScale, gyro_scale: GyroScale) -> ImuData {
        ImuData {
            accel: AccelDataMps2::from_raw(raw.accel, accel_scale.full_scale_g()),
            gyro: GyroDataDps::from_raw(raw.gyro, gyro_scale.full_scale_dps()),
        }
    }
}

#[cfg(not(feature = "async"))]
impl<I> Icm42688pDriver<I>
where
    I: RegisterInterface<AddressType = u8>,
{
    /// Probe the device by reading `WHO_AM_I`
    ///
    /// Selects bank 0, then reads up to [`CONNECTION_ATTEMPTS`] times with no
    /// delay in between and succeeds on the first read that returns
    /// [`WHO_AM_I_VALUE`].
    ///
    /// # Errors
    ///
    /// Returns [`Error::Connection`] with the last value read if no read
    /// matched, or [`Error::Bus`] if the transport fails.
    pub fn connect(&mut self) -> Result<(), Error<I::Error>> {
        self.select_bank0()?;

        let mut who_am_i = 0;
        for _ in 0..CONNECTION_ATTEMPTS {
            who_am_i = self.read_who_am_i()?;
            if who_am_i == WHO_AM_I_VALUE {
                #[cfg(feature = "defmt")]
                defmt::info!("ICM-42688-P detected");
                return Ok(());
            }
        }

        #[cfg(feature = "defmt")]
        defmt::warn!(
            "WHO_AM_I mismatch after {} reads: {=u8:#x}",
            CONNECTION_ATTEMPTS,
            who_am_i
        );
        Err(Error::Connection(who_am_i))
    }

    /// Read the `WHO_AM_I` register once
    ///
    /// Should return 0x47 for a valid ICM-42688-P
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails.
    pub fn read_who_am_i(&mut self) -> Result<u8, Error<I::Error>> {
        let mut buffer = [0u8; 1];
        self.interface
            .read_register(Bank0::WhoAmI.addr(), 8, &mut buffer)?;
        Ok(buffer[0])
    }

    /// Point the register map at user bank 0
    ///
    /// A single unverified write of 0 to `REG_BANK_SEL`. Every address this
    /// driver uses lives in bank 0.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Bus`] if the write fails.
    pub fn select_bank0(&mut self) -> Result<(), Error<I::Error>> {
        self.interface
            .write_register(Bank0::RegBankSel.addr(), 8, &[0])?;
        Ok(())
    }

    /// Configure the accelerometer
    ///
    /// Writes and verifies `PWR_MGMT0`, `ACCEL_CONFIG0` and
    /// `GYRO_ACCEL_CONFIG0` in that order. The gyroscope fields of the shared
    /// registers come from the last gyroscope request, not from the device.
    ///
    /// # Example
    ///
    /// ```ignore
    /// let accel_config = AccelConfig {
    ///     mode: AccelMode::LowNoise,
    ///     scale: AccelScale::G4,
    ///     odr: AccelOdr::Hz1000,
    ///     dlpf: AccelDlpf::OdrDiv4,
    /// };
    /// imu.configure_accelerometer(accel_config)?;
    /// ```
    ///
    /// # Errors
    ///
    /// Returns [`Error::ConfigWrite`] naming the register group that never
    /// read back correctly, or [`Error::Bus`]. The stored scale is only
    /// updated on success.
    pub fn configure_accelerometer(&mut self, config: AccelConfig) -> Result<(), Error<I::Error>> {
        for write in self.accel_writes(config) {
            self.write_verified(write)?;
        }
        self.accel_scale = Some(config.scale);
        Ok(())
    }

    /// Configure the gyroscope
    ///
    /// Writes and verifies `PWR_MGMT0`, `GYRO_CONFIG0` and
    /// `GYRO_ACCEL_CONFIG0` in that order.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ConfigWrite`] naming the register group that never
    /// read back correctly, or [`Error::Bus`]. The stored scale is only
    /// updated on success.
    pub fn configure_gyroscope(&mut self, config: GyroConfig) -> Result<(), Error<I::Error>> {
        for write in self.gyro_writes(config) {
            self.write_verified(write)?;
        }
        self.gyro_scale = Some(config.scale);
        Ok(())
    }

    fn write_verified(&mut self, write: ConfigWrite) -> Result<(), Error<I::Error>> {
        let address = write.register.addr();
        let mut readback = [0u8; 1];

        for _ in 0..CONFIG_WRITE_ATTEMPTS {
            self.interface.write_register(address, 8, &[write.value])?;
            self.interface.read_register(address, 8, &mut readback)?;
            if readback[0] == write.value {
                return Ok(());
            }

            #[cfg(feature = "defmt")]
            defmt::debug!(
                "Register {=u8:#x} read back {=u8:#x}, expected {=u8:#x}",
                address,
                readback[0],
                write.value
            );
        }

        #[cfg(feature = "defmt")]
        defmt::warn!("Write-verify exhausted for {}", write.phase);
        Err(Error::ConfigWrite(write.phase))
    }

    /// Read raw accelerometer and gyroscope data with offsets subtracted
    ///
    /// # Errors
    ///
    /// Returns [`Error::SampleTimeout`] if every burst within
    /// [`SAMPLE_READ_ATTEMPTS`] looked unfilled, or [`Error::Bus`].
    pub fn read_raw(&mut self) -> Result<RawSample, Error<I::Error>> {
        let raw = self.read_raw_uncorrected()?;
        Ok(self.calibration.apply(raw))
    }

    /// Read raw accelerometer and gyroscope data without applying offsets
    ///
    /// # Errors
    ///
    /// Same as [`read_raw`](Self::read_raw).
    pub fn read_raw_uncorrected(&mut self) -> Result<RawSample, Error<I::Error>> {
        let mut buffer = [0u8; SENSOR_DATA_LEN];
        for _ in 0..SAMPLE_READ_ATTEMPTS {
            self.interface
                .read_register(Bank0::AccelDataX1.addr(), 96, &mut buffer)?;
            if !burst_not_landed(&buffer) {
                return Ok(RawSample::from_be_bytes(&buffer));
            }
        }

        #[cfg(feature = "defmt")]
        defmt::warn!("No sample after {} burst reads", SAMPLE_READ_ATTEMPTS);
        Err(Error::SampleTimeout)
    }

    /// Read both sensors in physical units (m/s², °/s)
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotConfigured`] unless both sensors have been
    /// configured, otherwise the errors of [`read_raw`](Self::read_raw).
    pub fn read(&mut self) -> Result<ImuData, Error<I::Error>> {
        let accel_scale = self.require_accel_scale()?;
        let gyro_scale = self.require_gyro_scale()?;
        let raw = self.read_raw()?;
        Ok(Self::to_physical(raw, accel_scale, gyro_scale))
    }

    /// Read accelerometer data in m/s²
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotConfigured`] before the accelerometer has been
    /// configured, otherwise the errors of [`read_raw`](Self::read_raw).
    pub fn read_accelerometer(&mut self) -> Result<AccelDataMps2, Error<I::Error>> {
        let scale = self.require_accel_scale()?;
        let raw = self.read_raw()?;
        Ok(AccelDataMps2::from_raw(raw.accel, scale.full_scale_g()))
    }

    /// Read gyroscope data in °/s
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotConfigured`] before the gyroscope has been
    /// configured, otherwise the errors of [`read_raw`](Self::read_raw).
    pub fn read_gyroscope(&mut self) -> Result<GyroDataDps, Error<I::Error>> {
        let scale = self.require_gyro_scale()?;
        let raw = self.read_raw()?;
        Ok(GyroDataDps::from_raw(raw.gyro, scale.full_scale_dps()))
    }

    /// Calibrate accelerometer and gyroscope offsets
    ///
    /// The device must be level and stationary with its Z axis pointing up
    /// (gravity into the sensor). The procedure selects bank 0, discards
    /// [`CALIBRATION_SETTLE_READS`] reads (a settling read that times out is
    /// skipped, a bus error aborts), then averages `samples` uncorrected
    /// reads spaced [`CALIBRATION_SAMPLE_INTERVAL_US`] apart. The Z
    /// accelerometer offset has 1 g removed, so only the bias is subtracted
    /// and a level sensor reads zero on X/Y and +1 g on Z afterwards.
    ///
    /// The new offsets are applied to all subsequent corrected readings.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfig`] for zero samples,
    /// [`Error::NotConfigured`] before the accelerometer has been configured,
    /// or any read error. On error the previous offsets are kept.
    pub fn calibrate<D>(
        &mut self,
        samples: u16,
        delay: &mut D,
    ) -> Result<ImuCalibration, Error<I::Error>>
    where
        D: embedded_hal::delay::DelayNs,
    {
        if samples == 0 {
            return Err(Error::InvalidConfig);
        }
        let accel_scale = self.require_accel_scale()?;
        self.select_bank0()?;

        // Settling reads may time out while the output registers catch up
        for _ in 0..CALIBRATION_SETTLE_READS {
            match self.read_raw_uncorrected() {
                Ok(_) | Err(Error::SampleTimeout) => {}
                Err(error) => return Err(error),
            }
        }

        let mut accumulator = OffsetAccumulator::new();
        for _ in 0..samples {
            let sample = self.read_raw_uncorrected()?;
            accumulator.add(&sample);
            delay.delay_us(CALIBRATION_SAMPLE_INTERVAL_US);
        }

        let calibration = accumulator
            .finish(accel_scale.counts_per_g())
            .ok_or(Error::InvalidConfig)?;

        #[cfg(feature = "defmt")]
        defmt::info!("Calibration complete: {}", calibration);

        self.calibration = calibration;
        Ok(calibration)
    }
}

// ============================================================================
// Async API
// ============================================================================

#[cfg(feature = "async")]
impl<I> Icm42688pDriver<I>
where
    I: device_driver::AsyncRegisterInterface<AddressType = u8>,
{
    /// Probe the device by reading `WHO_AM_I`
    ///
    /// Selects bank 0, then reads up to [`CONNECTION_ATTEMPTS`] times with no
    /// delay in between.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Connection`] with the last value read if no read
    /// matched, or [`Error::Bus`] if the transport fails.
    pub async fn connect(&mut self) -> Result<(), Error<I::Error>> {
        self.select_bank0().await?;

        let mut who_am_i = 0;
        for _ in 0..CONNECTION_ATTEMPTS {
            who_am_i = self.read_who_am_i().await?;
            if who_am_i == crate::WHO_AM_I_VALUE {
                #[cfg(feature = "defmt")]
                defmt::info!("ICM-42688-P detected");
                return Ok(());
            }
        }

        #[cfg(feature = "defmt")]
        defmt::warn!(
            "WHO_AM_I mismatch after {} reads: {=u8:#x}",
            CONNECTION_ATTEMPTS,
            who_am_i
        );
        Err(Error::Connection(who_am_i))
    }

    /// Read the `WHO_AM_I` register once
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails.
    pub async fn read_who_am_i(&mut self) -> Result<u8, Error<I::Error>> {
        let mut buffer = [0u8; 1];
        self.interface
            .read_register(Bank0::WhoAmI.addr(), 8, &mut buffer)
            .await?;
        Ok(buffer[0])
    }

    /// Point the register map at user bank 0
    ///
    /// # Errors
    ///
    /// Returns [`Error::Bus`] if the write fails.
    pub async fn select_bank0(&mut self) -> Result<(), Error<I::Error>> {
        self.interface
            .write_register(Bank0::RegBankSel.addr(), 8, &[0])
            .await?;
        Ok(())
    }

    /// Configure the accelerometer
    ///
    /// # Errors
    ///
    /// Returns [`Error::ConfigWrite`] naming the register group that never
    /// read back correctly, or [`Error::Bus`].
    pub async fn configure_accelerometer(
        &mut self,
        config: AccelConfig,
    ) -> Result<(), Error<I::Error>> {
        for write in self.accel_writes(config) {
            self.write_verified(write).await?;
        }
        self.accel_scale = Some(config.scale);
        Ok(())
    }

    /// Configure the gyroscope
    ///
    /// # Errors
    ///
    /// Returns [`Error::ConfigWrite`] naming the register group that never
    /// read back correctly, or [`Error::Bus`].
    pub async fn configure_gyroscope(&mut self, config: GyroConfig) -> Result<(), Error<I::Error>> {
        for write in self.gyro_writes(config) {
            self.write_verified(write).await?;
        }
        self.gyro_scale = Some(config.scale);
        Ok(())
    }

    async fn write_verified(&mut self, write: ConfigWrite) -> Result<(), Error<I::Error>> {
        let address = write.register.addr();
        let mut readback = [0u8; 1];

        for _ in 0..CONFIG_WRITE_ATTEMPTS {
            self.interface
                .write_register(address, 8, &[write.value])
                .await?;
            self.interface
                .read_register(address, 8, &mut readback)
                .await?;
            if readback[0] == write.value {
                return Ok(());
            }

            #[cfg(feature = "defmt")]
            defmt::debug!(
                "Register {=u8:#x} read back {=u8:#x}, expected {=u8:#x}",
                address,
                readback[0],
                write.value
            );
        }

        #[cfg(feature = "defmt")]
        defmt::warn!("Write-verify exhausted for {}", write.phase);
        Err(Error::ConfigWrite(write.phase))
    }

    /// Read raw accelerometer and gyroscope data with offsets subtracted
    ///
    /// # Errors
    ///
    /// Returns [`Error::SampleTimeout`] or [`Error::Bus`].
    pub async fn read_raw(&mut self) -> Result<RawSample, Error<I::Error>> {
        let raw = self.read_raw_uncorrected().await?;
        Ok(self.calibration.apply(raw))
    }

    /// Read raw accelerometer and gyroscope data without applying offsets
    ///
    /// # Errors
    ///
    /// Returns [`Error::SampleTimeout`] or [`Error::Bus`].
    pub async fn read_raw_uncorrected(&mut self) -> Result<RawSample, Error<I::Error>> {
        let mut buffer = [0u8; SENSOR_DATA_LEN];
        for _ in 0..SAMPLE_READ_ATTEMPTS {
            self.interface
                .read_register(Bank0::AccelDataX1.addr(), 96, &mut buffer)
                .await?;
            if !burst_not_landed(&buffer) {
                return Ok(RawSample::from_be_bytes(&buffer));
            }
        }

        #[cfg(feature = "defmt")]
        defmt::warn!("No sample after {} burst reads", SAMPLE_READ_ATTEMPTS);
        Err(Error::SampleTimeout)
    }

    /// Read both sensors in physical units (m/s², °/s)
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotConfigured`] unless both sensors have been
    /// configured, otherwise the errors of [`read_raw`](Self::read_raw).
    pub async fn read(&mut self) -> Result<ImuData, Error<I::Error>> {
        let accel_scale = self.require_accel_scale()?;
        let gyro_scale = self.require_gyro_scale()?;
        let raw = self.read_raw().await?;
        Ok(Self::to_physical(raw, accel_scale, gyro_scale))
    }

    /// Read accelerometer data in m/s²
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotConfigured`] before the accelerometer has been
    /// configured, otherwise the errors of [`read_raw`](Self::read_raw).
    pub async fn read_accelerometer(&mut self) -> Result<AccelDataMps2, Error<I::Error>> {
        let scale = self.require_accel_scale()?;
        let raw = self.read_raw().await?;
        Ok(AccelDataMps2::from_raw(raw.accel, scale.full_scale_g()))
    }

    /// Read gyroscope data in °/s
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotConfigured`] before the gyroscope has been
    /// configured, otherwise the errors of [`read_raw`](Self::read_raw).
    pub async fn read_gyroscope(&mut self) -> Result<GyroDataDps, Error<I::Error>> {
        let scale = self.require_gyro_scale()?;
        let raw = self.read_raw().await?;
        Ok(GyroDataDps::from_raw(raw.gyro, scale.full_scale_dps()))
    }

    /// Calibrate accelerometer and gyroscope offsets
    ///
    /// Selects bank 0 and discards
    /// [`CALIBRATION_SETTLE_READS`](crate::calibration::CALIBRATION_SETTLE_READS)
    /// reads (timeouts skipped, bus errors abort), then averages `samples` uncorrected reads with an awaited
    /// 1 ms delay after each. The Z accelerometer offset has 1 g removed.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfig`] for zero samples,
    /// [`Error::NotConfigured`] before the accelerometer has been configured,
    /// or any read error. On error the previous offsets are kept.
    pub async fn calibrate<D>(
        &mut self,
        samples: u16,
        delay: &mut D,
    ) -> Result<ImuCalibration, Error<I::Error>>
    where
        D: embedded_hal_async::delay::DelayNs,
    {
        use crate::calibration::{CALIBRATION_SAMPLE_INTERVAL_US, CALIBRATION_SETTLE_READS};

        if samples == 0 {
            return Err(Error::InvalidConfig);
        }
        let accel_scale = self.require_accel_scale()?;
        self.select_bank0().await?;

        for _ in 0..CALIBRATION_SETTLE_READS {
            match self.read_raw_uncorrected().await {
                Ok(_) | Err(Error::SampleTimeout) => {}
                Err(error) => return Err(error),
            }
        }

        let mut accumulator = OffsetAccumulator::new();
        for _ in 0..samples {
            let sample = self.read_raw_uncorrected().await?;
            accumulator.add(&sample);
            delay.delay_us(CALIBRATION_SAMPLE_INTERVAL_US).await;
        }

        let calibration = accumulator
            .finish(accel_scale.counts_per_g())
            .ok_or(Error::InvalidConfig)?;

        #[cfg(feature = "defmt")]
        defmt::info!("Calibration complete: {}", calibration);

        self.calibration = calibration;
        Ok(calibration)
    }
}
