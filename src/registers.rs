//! Register map for the ICM-42688-P (user bank 0)
//!
//! Only the registers the driver touches are listed. Two of them,
//! `PWR_MGMT0` and `GYRO_ACCEL_CONFIG0`, hold settings for both the
//! accelerometer and the gyroscope. They are always written as a whole byte
//! built by [`pwr_mgmt0`] / [`gyro_accel_config0`] from the driver's shadow
//! copies, never read-modify-written from the live register.
//!
//! ## Bit layout
//! - `PWR_MGMT0`: `[3:2]` `GYRO_MODE`, `[1:0]` `ACCEL_MODE`
//! - `GYRO_CONFIG0` / `ACCEL_CONFIG0`: `[7:5]` `FS_SEL`, `[3:0]` `ODR`
//! - `GYRO_ACCEL_CONFIG0`: `[7:4]` `ACCEL_UI_FILT_BW`, `[3:0]` `GYRO_UI_FILT_BW`

/// Bank 0 register addresses
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum Bank0 {
    /// `ACCEL_DATA_X1` - first byte of the 12-byte accel/gyro burst
    AccelDataX1 = 0x1F,
    /// `PWR_MGMT0` - accelerometer and gyroscope power modes
    PwrMgmt0 = 0x4E,
    /// `GYRO_CONFIG0` - gyroscope full-scale range and ODR
    GyroConfig0 = 0x4F,
    /// `ACCEL_CONFIG0` - accelerometer full-scale range and ODR
    AccelConfig0 = 0x50,
    /// `GYRO_CONFIG1` - gyroscope filter order (not written by the driver)
    GyroConfig1 = 0x51,
    /// `GYRO_ACCEL_CONFIG0` - accelerometer and gyroscope UI filter bandwidth
    GyroAccelConfig0 = 0x52,
    /// `WHO_AM_I` - device identity
    WhoAmI = 0x75,
    /// `REG_BANK_SEL` - user bank select, mirrored in every bank
    RegBankSel = 0x76,
}

impl Bank0 {
    /// Register address
    #[must_use]
    pub const fn addr(self) -> u8 {
        self as u8
    }
}

/// Number of bytes in one accel + gyro burst (six big-endian i16 words)
pub const SENSOR_DATA_LEN: usize = 12;

const ACCEL_MODE_MASK: u8 = 0x03;
const GYRO_MODE_SHIFT: u8 = 2;
const GYRO_MODE_MASK: u8 = 0x03;

const FS_SEL_SHIFT: u8 = 5;
const FS_SEL_MASK: u8 = 0x07;
const ODR_MASK: u8 = 0x0F;

const ACCEL_FILT_SHIFT: u8 = 4;
const FILT_MASK: u8 = 0x0F;

/// Merge accelerometer and gyroscope mode fields into a `PWR_MGMT0` value
#[must_use]
pub const fn pwr_mgmt0(accel_mode: u8, gyro_mode: u8) -> u8 {
    ((gyro_mode & GYRO_MODE_MASK) << GYRO_MODE_SHIFT) | (accel_mode & ACCEL_MODE_MASK)
}

/// Build a `GYRO_CONFIG0` / `ACCEL_CONFIG0` value from scale and ODR codes
#[must_use]
pub const fn scale_odr(fs_sel: u8, odr: u8) -> u8 {
    ((fs_sel & FS_SEL_MASK) << FS_SEL_SHIFT) | (odr & ODR_MASK)
}

/// Merge accelerometer and gyroscope filter fields into a `GYRO_ACCEL_CONFIG0` value
#[must_use]
pub const fn gyro_accel_config0(accel_filt: u8, gyro_filt: u8) -> u8 {
    ((accel_filt & FILT_MASK) << ACCEL_FILT_SHIFT) | (gyro_filt & FILT_MASK)
}
