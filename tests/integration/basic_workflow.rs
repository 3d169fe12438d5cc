//! Integration tests for basic workflow scenarios

use crate::common::mock_interface::{GYRO_ACCEL_CONFIG0, PWR_MGMT0, WHO_AM_I};
use crate::common::test_utils::{MockDelay, assert_float_eq};
use crate::common::{create_mock_driver, default_accel_config, default_gyro_config};
use icm42688p::sensors::{AccelScale, GyroScale};

#[test]
fn test_complete_workflow() {
    let (mut driver, interface) = create_mock_driver();

    // Device needs a few reads before it answers
    interface.delay_who_am_i(3);
    driver.connect().unwrap();
    assert_eq!(interface.read_count(WHO_AM_I), 4);

    driver.configure_accelerometer(default_accel_config()).unwrap();
    driver.configure_gyroscope(default_gyro_config()).unwrap();

    // Both sensors in low-noise mode with their filters at ODR/4
    assert_eq!(interface.get_register(PWR_MGMT0), 0x0F);
    assert_eq!(interface.get_register(GYRO_ACCEL_CONFIG0), 0x11);

    // Level and still, with some bias on every axis
    interface.set_sample([120, -80, 2048 + 60], [15, -25, 5]);
    let calibration = driver.calibrate(50, &mut MockDelay::default()).unwrap();
    assert_eq!(calibration.accel_offset, [120, -80, 60]);
    assert_eq!(calibration.gyro_offset, [15, -25, 5]);

    // Rotate at ~90 °/s around Z
    interface.set_sample([120 + 2048, -80, 2048 + 60], [15, -25, 5 + 1475]);
    let data = driver.read().unwrap();

    assert_float_eq(data.accel.x, 9.80665, 1e-3);
    assert_float_eq(data.accel.y, 0.0, 1e-6);
    assert_float_eq(data.accel.z, 9.80665, 1e-3);
    assert_float_eq(data.gyro.x, 0.0, 1e-6);
    assert_float_eq(data.gyro.z, 1475.0 * 2000.0 / 32768.0, 1e-3);
}

#[test]
fn test_reconfigure_changes_conversion() {
    let (mut driver, interface) = create_mock_driver();
    driver.connect().unwrap();

    let mut accel = default_accel_config();
    let mut gyro = default_gyro_config();
    driver.configure_accelerometer(accel).unwrap();
    driver.configure_gyroscope(gyro).unwrap();

    interface.set_sample([4096, 1, 1], [4096, 0, 0]);
    let wide = driver.read().unwrap();

    accel.scale = AccelScale::G4;
    gyro.scale = GyroScale::Dps500;
    driver.configure_accelerometer(accel).unwrap();
    driver.configure_gyroscope(gyro).unwrap();
    let narrow = driver.read().unwrap();

    assert_float_eq(wide.accel.x, 2.0 * 9.80665, 1e-3);
    assert_float_eq(narrow.accel.x, 0.5 * 9.80665, 1e-3);
    assert_float_eq(wide.gyro.x, 250.0, 1e-3);
    assert_float_eq(narrow.gyro.x, 62.5, 1e-3);
}

#[test]
fn test_restore_stored_calibration() {
    let (mut driver, interface) = create_mock_driver();
    driver.configure_accelerometer(default_accel_config()).unwrap();
    driver.configure_gyroscope(default_gyro_config()).unwrap();

    interface.set_sample([10, 20, 2048 + 30], [1, 2, 3]);
    let stored = driver.calibrate(10, &mut MockDelay::default()).unwrap();

    // A fresh driver on the same bus picks the offsets back up
    let interface = driver.release();
    let mut driver = icm42688p::Icm42688pDriver::new(interface);
    driver.configure_accelerometer(default_accel_config()).unwrap();
    driver.configure_gyroscope(default_gyro_config()).unwrap();
    driver.set_calibration(stored);

    let raw = driver.read_raw().unwrap();
    assert_eq!([raw.accel.x, raw.accel.y, raw.accel.z], [0, 0, 2048]);
    assert_eq!([raw.gyro.x, raw.gyro.y, raw.gyro.z], [0, 0, 0]);
}
