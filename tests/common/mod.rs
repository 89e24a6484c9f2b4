#![allow(dead_code)]

pub use lis3dh::*;

pub use embedded_hal::i2c::ErrorKind as BusError;
use embedded_hal_mock as hal;
pub use hal::eh1::i2c::{Mock as I2cMock, Transaction as I2cTrans};

pub const DEV_ADDR: u8 = 0b001_1000;

/// 1 g at ±2 g, high resolution: 1000 digits left-justified
pub const ONE_G: [u8; 2] = [0x80, 0x3E];
/// -1 g at ±2 g, high resolution
pub const MINUS_ONE_G: [u8; 2] = [0x80, 0xC1];
pub const ZERO: [u8; 2] = [0x00, 0x00];

pub fn trans_who_am_i() -> I2cTrans {
    I2cTrans::write_read(DEV_ADDR, vec![0x0F], vec![0b0011_0011])
}

/// CTRL_REG1 and CTRL_REG4 read-modify-write starting from the power-on values
pub fn trans_ctrl_regs(ctrl1: u8, ctrl4: u8) -> Vec<I2cTrans> {
    vec![
        I2cTrans::write_read(DEV_ADDR, vec![0x20], vec![0b0000_0111]),
        I2cTrans::write(DEV_ADDR, vec![0x20, ctrl1]),
        I2cTrans::write_read(DEV_ADDR, vec![0x23], vec![0b0000_0000]),
        I2cTrans::write(DEV_ADDR, vec![0x23, ctrl4]),
    ]
}

/// CLICK_CFG armed with `cfg`, threshold latched
pub fn trans_click(cfg: u8, ths: u8) -> Vec<I2cTrans> {
    vec![
        I2cTrans::write(DEV_ADDR, vec![0x38, cfg]),
        I2cTrans::write(DEV_ADDR, vec![0x3A, 0x80 | ths]),
        I2cTrans::write(DEV_ADDR, vec![0x3B, 15]),
        I2cTrans::write(DEV_ADDR, vec![0x3C, 20]),
        I2cTrans::write(DEV_ADDR, vec![0x3D, 50]),
    ]
}

pub fn trans_click_off() -> I2cTrans {
    I2cTrans::write(DEV_ADDR, vec![0x38, 0x00])
}

pub fn trans_freefall(ths: u8) -> Vec<I2cTrans> {
    vec![
        I2cTrans::write_read(DEV_ADDR, vec![0x24], vec![0b0000_0000]),
        I2cTrans::write(DEV_ADDR, vec![0x24, 0b0000_1000]),
        I2cTrans::write(DEV_ADDR, vec![0x30, 0b1001_0101]),
        I2cTrans::write(DEV_ADDR, vec![0x32, ths]),
        I2cTrans::write(DEV_ADDR, vec![0x33, 3]),
    ]
}

pub fn trans_freefall_off() -> I2cTrans {
    I2cTrans::write(DEV_ADDR, vec![0x30, 0x00])
}

/// Setup of the default configuration without detectors
pub fn trans_setup_default() -> Vec<I2cTrans> {
    let mut trans = vec![trans_who_am_i()];
    // 100 Hz, all axes; BDU, high resolution
    trans.extend(trans_ctrl_regs(0b0101_0111, 0b1000_1000));
    trans.push(trans_click_off());
    trans.push(trans_freefall_off());
    trans
}

/// Setup of the default configuration with single-click detection
pub fn trans_setup_tap() -> Vec<I2cTrans> {
    let mut trans = vec![trans_who_am_i()];
    trans.extend(trans_ctrl_regs(0b0101_0111, 0b1000_1000));
    trans.extend(trans_click(0b0001_0101, 40));
    trans.push(trans_freefall_off());
    trans
}

/// Burst read of OUT_X_L..OUT_Z_H
pub fn trans_accel(x: [u8; 2], y: [u8; 2], z: [u8; 2]) -> I2cTrans {
    I2cTrans::write_read(DEV_ADDR, vec![0x80 | 0x28], vec![x[0], x[1], y[0], y[1], z[0], z[1]])
}

pub fn trans_accel_err() -> I2cTrans {
    trans_accel(ZERO, ZERO, ZERO).with_error(BusError::Other)
}

pub fn trans_click_src(src: u8) -> I2cTrans {
    I2cTrans::write_read(DEV_ADDR, vec![0x39], vec![src])
}

pub fn trans_int1_src(src: u8) -> I2cTrans {
    I2cTrans::write_read(DEV_ADDR, vec![0x31], vec![src])
}

pub fn assert_approx(actual: f32, expected: f32) {
    assert!(
        (actual - expected).abs() < 0.01,
        "{} is not close to {}",
        actual,
        expected
    );
}
