//! Unit tests for write-then-verify sensor configuration

use crate::common::mock_interface::{
    ACCEL_CONFIG0, GYRO_ACCEL_CONFIG0, GYRO_CONFIG0, Operation, PWR_MGMT0,
};
use crate::common::{create_mock_driver, default_accel_config, default_gyro_config};
use icm42688p::device::CONFIG_WRITE_ATTEMPTS;
use icm42688p::sensors::{
    AccelConfig, AccelDlpf, AccelMode, AccelOdr, AccelScale, GyroConfig, GyroDlpf, GyroMode,
    GyroOdr, GyroScale,
};
use icm42688p::{ConfigPhase, Error};

const ACCEL_MODES: [AccelMode; 3] = [AccelMode::Off, AccelMode::LowPower, AccelMode::LowNoise];
const ACCEL_SCALES: [AccelScale; 4] = [
    AccelScale::G16,
    AccelScale::G8,
    AccelScale::G4,
    AccelScale::G2,
];
const ACCEL_ODRS: [AccelOdr; 15] = [
    AccelOdr::Hz32000,
    AccelOdr::Hz16000,
    AccelOdr::Hz8000,
    AccelOdr::Hz4000,
    AccelOdr::Hz2000,
    AccelOdr::Hz1000,
    AccelOdr::Hz200,
    AccelOdr::Hz100,
    AccelOdr::Hz50,
    AccelOdr::Hz25,
    AccelOdr::Hz12_5,
    AccelOdr::Hz6_25,
    AccelOdr::Hz3_125,
    AccelOdr::Hz1_5625,
    AccelOdr::Hz500,
];
const ACCEL_DLPFS: [AccelDlpf; 8] = [
    AccelDlpf::OdrDiv2,
    AccelDlpf::OdrDiv4,
    AccelDlpf::OdrDiv5,
    AccelDlpf::OdrDiv8,
    AccelDlpf::OdrDiv10,
    AccelDlpf::OdrDiv16,
    AccelDlpf::OdrDiv20,
    AccelDlpf::OdrDiv40,
];

const GYRO_MODES: [GyroMode; 3] = [GyroMode::Off, GyroMode::Standby, GyroMode::LowNoise];
const GYRO_SCALES: [GyroScale; 8] = [
    GyroScale::Dps2000,
    GyroScale::Dps1000,
    GyroScale::Dps500,
    GyroScale::Dps250,
    GyroScale::Dps125,
    GyroScale::Dps62_5,
    GyroScale::Dps31_25,
    GyroScale::Dps15_625,
];
const GYRO_ODRS: [GyroOdr; 12] = [
    GyroOdr::Hz32000,
    GyroOdr::Hz16000,
    GyroOdr::Hz8000,
    GyroOdr::Hz4000,
    GyroOdr::Hz2000,
    GyroOdr::Hz1000,
    GyroOdr::Hz200,
    GyroOdr::Hz100,
    GyroOdr::Hz50,
    GyroOdr::Hz25,
    GyroOdr::Hz12_5,
    GyroOdr::Hz500,
];
const GYRO_DLPFS: [GyroDlpf; 8] = [
    GyroDlpf::OdrDiv2,
    GyroDlpf::OdrDiv4,
    GyroDlpf::OdrDiv5,
    GyroDlpf::OdrDiv8,
    GyroDlpf::OdrDiv10,
    GyroDlpf::OdrDiv16,
    GyroDlpf::OdrDiv20,
    GyroDlpf::OdrDiv40,
];

#[test]
fn test_configure_accelerometer_register_values() {
    let (mut driver, interface) = create_mock_driver();

    driver.configure_accelerometer(default_accel_config()).unwrap();

    // LowNoise (3), gyro still off
    assert_eq!(interface.writes_to(PWR_MGMT0), vec![0x03]);
    // G16 (0) << 5 | 1 kHz (0x06)
    assert_eq!(interface.writes_to(ACCEL_CONFIG0), vec![0x06]);
    // ODR/4 (1) in the accel nibble
    assert_eq!(interface.writes_to(GYRO_ACCEL_CONFIG0), vec![0x10]);
    assert!(interface.writes_to(GYRO_CONFIG0).is_empty());

    assert_eq!(driver.accel_scale(), Some(AccelScale::G16));
    assert!((driver.accel_scale_value() - 16.0).abs() < f32::EPSILON);
}

#[test]
fn test_configure_gyroscope_register_values() {
    let (mut driver, interface) = create_mock_driver();

    let config = GyroConfig {
        mode: GyroMode::Standby,
        scale: GyroScale::Dps250,
        odr: GyroOdr::Hz200,
        dlpf: GyroDlpf::OdrDiv40,
    };
    driver.configure_gyroscope(config).unwrap();

    assert_eq!(interface.writes_to(PWR_MGMT0), vec![0x04]);
    assert_eq!(interface.writes_to(GYRO_CONFIG0), vec![0x67]);
    assert_eq!(interface.writes_to(GYRO_ACCEL_CONFIG0), vec![0x07]);
    assert!(interface.writes_to(ACCEL_CONFIG0).is_empty());

    assert!((driver.gyro_scale_value() - 250.0).abs() < f32::EPSILON);
}

#[test]
fn test_phase_order_is_power_scale_filter() {
    let (mut driver, interface) = create_mock_driver();

    driver.configure_accelerometer(default_accel_config()).unwrap();

    let written: Vec<u8> = interface
        .operations()
        .iter()
        .filter_map(|op| match op {
            Operation::Write { address, .. } => Some(*address),
            Operation::Read { .. } => None,
        })
        .collect();
    assert_eq!(written, vec![PWR_MGMT0, ACCEL_CONFIG0, GYRO_ACCEL_CONFIG0]);
}

#[test]
fn test_each_write_is_read_back() {
    let (mut driver, interface) = create_mock_driver();

    driver.configure_gyroscope(default_gyro_config()).unwrap();

    let ops = interface.operations();
    assert_eq!(ops.len(), 6);
    for pair in ops.chunks(2) {
        match (&pair[0], &pair[1]) {
            (Operation::Write { address: w, .. }, Operation::Read { address: r, len }) => {
                assert_eq!(w, r);
                assert_eq!(*len, 1);
            }
            other => panic!("Expected write followed by read, got {:?}", other),
        }
    }
}

#[test]
fn test_all_accel_combinations_verify_first_time() {
    let (mut driver, interface) = create_mock_driver();

    for mode in ACCEL_MODES {
        for scale in ACCEL_SCALES {
            for odr in ACCEL_ODRS {
                for dlpf in ACCEL_DLPFS {
                    interface.clear_operations();
                    let config = AccelConfig {
                        mode,
                        scale,
                        odr,
                        dlpf,
                    };
                    driver.configure_accelerometer(config).unwrap();

                    assert_eq!(interface.write_count(PWR_MGMT0), 1);
                    assert_eq!(interface.write_count(ACCEL_CONFIG0), 1);
                    assert_eq!(interface.write_count(GYRO_ACCEL_CONFIG0), 1);
                    assert_eq!(driver.accel_scale(), Some(scale));
                }
            }
        }
    }
}

#[test]
fn test_all_gyro_combinations_verify_first_time() {
    let (mut driver, interface) = create_mock_driver();

    for mode in GYRO_MODES {
        for scale in GYRO_SCALES {
            for odr in GYRO_ODRS {
                for dlpf in GYRO_DLPFS {
                    interface.clear_operations();
                    let config = GyroConfig {
                        mode,
                        scale,
                        odr,
                        dlpf,
                    };
                    driver.configure_gyroscope(config).unwrap();

                    assert_eq!(interface.write_count(PWR_MGMT0), 1);
                    assert_eq!(interface.write_count(GYRO_CONFIG0), 1);
                    assert_eq!(interface.write_count(GYRO_ACCEL_CONFIG0), 1);
                    assert_eq!(driver.gyro_scale(), Some(scale));
                }
            }
        }
    }
}

#[test]
fn test_power_mode_rejected() {
    let (mut driver, interface) = create_mock_driver();

    interface.reject_writes_to(PWR_MGMT0);

    let result = driver.configure_accelerometer(default_accel_config());
    assert!(matches!(
        result,
        Err(Error::ConfigWrite(ConfigPhase::PowerMode))
    ));

    // Exactly the retry budget, and later phases never start
    assert_eq!(
        interface.write_count(PWR_MGMT0),
        usize::from(CONFIG_WRITE_ATTEMPTS)
    );
    assert_eq!(interface.read_count(PWR_MGMT0), 100);
    assert_eq!(interface.write_count(ACCEL_CONFIG0), 0);
    assert_eq!(interface.write_count(GYRO_ACCEL_CONFIG0), 0);
}

#[test]
fn test_scale_odr_rejected() {
    let (mut driver, interface) = create_mock_driver();

    interface.reject_writes_to(ACCEL_CONFIG0);

    let result = driver.configure_accelerometer(default_accel_config());
    assert!(matches!(
        result,
        Err(Error::ConfigWrite(ConfigPhase::ScaleOdr))
    ));
    assert_eq!(interface.write_count(PWR_MGMT0), 1);
    assert_eq!(interface.write_count(ACCEL_CONFIG0), 100);
    assert_eq!(interface.write_count(GYRO_ACCEL_CONFIG0), 0);
}

#[test]
fn test_filter_rejected() {
    let (mut driver, interface) = create_mock_driver();

    interface.reject_writes_to(GYRO_ACCEL_CONFIG0);

    let result = driver.configure_gyroscope(default_gyro_config());
    assert!(matches!(result, Err(Error::ConfigWrite(ConfigPhase::Filter))));
    assert_eq!(interface.write_count(PWR_MGMT0), 1);
    assert_eq!(interface.write_count(GYRO_CONFIG0), 1);
    assert_eq!(interface.write_count(GYRO_ACCEL_CONFIG0), 100);
}

#[test]
fn test_gyro_scale_odr_rejected() {
    let (mut driver, interface) = create_mock_driver();

    interface.reject_writes_to(GYRO_CONFIG0);

    let result = driver.configure_gyroscope(default_gyro_config());
    assert!(matches!(
        result,
        Err(Error::ConfigWrite(ConfigPhase::ScaleOdr))
    ));
    assert_eq!(interface.write_count(GYRO_CONFIG0), 100);
    assert!(driver.gyro_scale().is_none());
}

#[test]
fn test_failed_configuration_keeps_previous_scale() {
    let (mut driver, interface) = create_mock_driver();

    driver.configure_accelerometer(default_accel_config()).unwrap();
    assert_eq!(driver.accel_scale(), Some(AccelScale::G16));

    interface.reject_writes_to(GYRO_ACCEL_CONFIG0);

    let mut config = default_accel_config();
    config.scale = AccelScale::G2;
    assert!(driver.configure_accelerometer(config).is_err());

    assert_eq!(driver.accel_scale(), Some(AccelScale::G16));
    assert!((driver.accel_scale_value() - 16.0).abs() < f32::EPSILON);
}

#[test]
fn test_shared_registers_use_shadow_not_live_value() {
    let (mut driver, interface) = create_mock_driver();

    // Accel: LowNoise (3), ODR/4 (1)
    driver.configure_accelerometer(default_accel_config()).unwrap();

    // Someone else clobbers the live registers
    interface.set_register(PWR_MGMT0, 0x00);
    interface.set_register(GYRO_ACCEL_CONFIG0, 0x00);
    interface.clear_operations();

    let config = GyroConfig {
        mode: GyroMode::LowNoise,
        scale: GyroScale::Dps500,
        odr: GyroOdr::Hz1000,
        dlpf: GyroDlpf::OdrDiv8,
    };
    driver.configure_gyroscope(config).unwrap();

    // Accel fields come back from the shadow copy
    assert_eq!(interface.writes_to(PWR_MGMT0), vec![0x0F]);
    assert_eq!(interface.writes_to(GYRO_ACCEL_CONFIG0), vec![0x13]);

    // The shared register is written before it is ever read
    assert!(matches!(
        interface.operations().first(),
        Some(Operation::Write {
            address: PWR_MGMT0,
            ..
        })
    ));
}

#[test]
fn test_accel_after_gyro_preserves_gyro_fields() {
    let (mut driver, interface) = create_mock_driver();

    let gyro = GyroConfig {
        mode: GyroMode::Standby,
        dlpf: GyroDlpf::OdrDiv20,
        ..default_gyro_config()
    };
    driver.configure_gyroscope(gyro).unwrap();
    interface.clear_operations();

    let accel = AccelConfig {
        mode: AccelMode::LowPower,
        dlpf: AccelDlpf::OdrDiv2,
        ..default_accel_config()
    };
    driver.configure_accelerometer(accel).unwrap();

    assert_eq!(interface.writes_to(PWR_MGMT0), vec![0x06]);
    assert_eq!(interface.writes_to(GYRO_ACCEL_CONFIG0), vec![0x06]);
}

#[test]
fn test_configure_twice_is_idempotent() {
    let (mut driver, _interface) = create_mock_driver();

    let mut config = default_accel_config();
    config.scale = AccelScale::G4;

    driver.configure_accelerometer(config).unwrap();
    let first = driver.accel_scale_value();

    driver.configure_accelerometer(config).unwrap();
    let second = driver.accel_scale_value();

    assert!((first - 4.0).abs() < f32::EPSILON);
    assert!((first - second).abs() < f32::EPSILON);

    driver.configure_gyroscope(default_gyro_config()).unwrap();
    let first = driver.gyro_scale_value();
    driver.configure_gyroscope(default_gyro_config()).unwrap();
    assert!((first - driver.gyro_scale_value()).abs() < f32::EPSILON);
}
