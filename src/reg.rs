#![allow(non_upper_case_globals)]

use cast::f32;
use num_derive::FromPrimitive;

/// I2C slave address
pub const I2C_SAD: u8 = 0b001_1000;

pub const I2C_SUB_MULTI: u8 = 0b1000_0000;

/// Register mapping
#[allow(dead_code)]
#[allow(non_camel_case_types)]
#[derive(Copy, Clone, Debug)]
pub enum Register {
    STATUS_REG_AUX = 0x07,
    WHO_AM_I = 0x0F,
    CTRL_REG0 = 0x1E,
    TEMP_CFG_REG = 0x1F,
    CTRL_REG1 = 0x20,
    CTRL_REG2 = 0x21,
    CTRL_REG3 = 0x22,
    CTRL_REG4 = 0x23,
    CTRL_REG5 = 0x24,
    CTRL_REG6 = 0x25,
    REFERENCE = 0x26,
    STATUS_REG = 0x27,
    OUT_X_L = 0x28,
    OUT_X_H = 0x29,
    OUT_Y_L = 0x2A,
    OUT_Y_H = 0x2B,
    OUT_Z_L = 0x2C,
    OUT_Z_H = 0x2D,
    FIFO_CTRL_REG = 0x2E,
    FIFO_SRC_REG = 0x2F,
    INT1_CFG = 0x30,
    INT1_SRC = 0x31,
    INT1_THS = 0x32,
    INT1_DURATION = 0x33,
    INT2_CFG = 0x34,
    INT2_SRC = 0x35,
    INT2_THS = 0x36,
    INT2_DURATION = 0x37,
    CLICK_CFG = 0x38,
    CLICK_SRC = 0x39,
    CLICK_THS = 0x3A,
    TIME_LIMIT = 0x3B,
    TIME_LATENCY = 0x3C,
    TIME_WINDOW = 0x3D,
    ACT_THS = 0x3E,
    ACT_DUR = 0x3F,
}

impl Register {
    /// Get register address
    pub fn addr(self) -> u8 {
        self as u8
    }
}

// === WHO_AM_I (0Fh) ===

/// WHO_AM_I device identification register
pub const DEVICE_ID: u8 = 0b0011_0011;

// === CTRL_REG1 (20h) ===

pub const ODR_MASK: u8 = 0b1111_0000;

/// Output data rate,
/// discriminants are the `ODR` field of `CTRL_REG1`
#[derive(Copy, Clone, Debug, PartialEq, Eq, FromPrimitive)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DataRate {
    /// 1 Hz
    Hz1 = 0b0001,
    /// 10 Hz
    Hz10 = 0b0010,
    /// 25 Hz
    Hz25 = 0b0011,
    /// 50 Hz
    Hz50 = 0b0100,
    /// 100 Hz
    Hz100 = 0b0101,
    /// 200 Hz
    Hz200 = 0b0110,
    /// 400 Hz
    Hz400 = 0b0111,
}

/// Low-power 1.620 kHz
pub const ODR_HIGH_RATE0: u8 = 0b1000;
/// Normal 1.344 kHz, low-power 5.376 kHz
pub const ODR_HIGH_RATE1: u8 = 0b1001;

impl DataRate {
    /// `ODR` field, already shifted into place
    pub(crate) fn bits(self) -> u8 {
        (self as u8) << 4
    }

    /// Sampling frequency in Hz
    pub fn hz(self) -> f32 {
        match self {
            Self::Hz1 => 1.0,
            Self::Hz10 => 10.0,
            Self::Hz25 => 25.0,
            Self::Hz50 => 50.0,
            Self::Hz100 => 100.0,
            Self::Hz200 => 200.0,
            Self::Hz400 => 400.0,
        }
    }
}

pub const LPen: u8 = 0b0000_1000;
pub const Zen: u8 = 0b0000_0100;
pub const Yen: u8 = 0b0000_0010;
pub const Xen: u8 = 0b0000_0001;

/// Every `CTRL_REG1` bit owned by the driver
pub const CTRL_REG1_FIELDS: u8 = ODR_MASK | LPen | Zen | Yen | Xen;

/// `CTRL_REG1` content for the given rate and resolution, all axes enabled
pub fn ctrl_reg1_bits(odr: DataRate, res: Resolution) -> u8 {
    odr.bits() | res.ctrl_reg1_bits() | Xen | Yen | Zen
}

// === CTRL_REG4 (23h) ===

pub const BDU: u8 = 0b1000_0000;

pub const FS_MASK: u8 = 0b0011_0000;

/// Full-scale selection,
/// discriminants are the `FS` field of `CTRL_REG4`
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Range {
    /// ±2 g
    G2 = 0b00,
    /// ±4 g
    G4 = 0b01,
    /// ±8 g
    G8 = 0b10,
    /// ±16 g
    G16 = 0b11,
}

impl Range {
    /// `FS` field, already shifted into place
    pub(crate) fn bits(self) -> u8 {
        (self as u8) << 4
    }

    /// g/digit in high-resolution mode (12-bit)
    fn sensitivity(self) -> f32 {
        match self {
            Self::G2 => 0.001,
            Self::G4 => 0.002,
            Self::G8 => 0.004,
            Self::G16 => 0.012,
        }
    }

    /// Left-justified output register value to g
    pub(crate) fn convert_out_i16tof32(self, res: Resolution, val: i16) -> f32 {
        // each dropped bit doubles the weight of one digit
        let shift = res.shift();
        let sens = self.sensitivity() * f32(1u16 << (shift - 4));
        f32(val >> shift) * sens
    }

    /// Click threshold, `CLICK_THS` LSB is full-scale / 128 (≈0.63 g)
    pub(crate) fn click_ths(self) -> u8 {
        match self {
            Self::G2 => 40,
            Self::G4 => 20,
            Self::G8 => 10,
            Self::G16 => 5,
        }
    }

    /// Freefall threshold, `INT1_THS` LSB is full-scale / 128 (≈350 mg)
    pub(crate) fn freefall_ths(self) -> u8 {
        match self {
            Self::G2 => 22,
            Self::G4 => 11,
            Self::G8 => 6,
            Self::G16 => 3,
        }
    }
}

pub const HR: u8 = 0b0000_1000;

/// Every `CTRL_REG4` bit owned by the driver
pub const CTRL_REG4_FIELDS: u8 = BDU | FS_MASK | HR;

/// `CTRL_REG4` content for the given range and resolution, block data update on
pub fn ctrl_reg4_bits(fs: Range, res: Resolution) -> u8 {
    BDU | fs.bits() | res.ctrl_reg4_bits()
}

/// Operating mode,
/// `CTRL_REG1`: `LPen` bit, `CTRL_REG4`: `HR` bit
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Resolution {
    /// Low-power mode (8-bit data output)
    LowPower,
    /// Normal mode (10-bit data output)
    Normal,
    /// High-resolution mode (12-bit data output)
    HighResolution,
}

impl Resolution {
    fn ctrl_reg1_bits(self) -> u8 {
        match self {
            Self::LowPower => LPen,
            Self::Normal | Self::HighResolution => 0,
        }
    }

    fn ctrl_reg4_bits(self) -> u8 {
        match self {
            Self::HighResolution => HR,
            Self::LowPower | Self::Normal => 0,
        }
    }

    /// Right shift of the left-justified output
    fn shift(self) -> u32 {
        match self {
            Self::HighResolution => 4,
            Self::Normal => 6,
            Self::LowPower => 8,
        }
    }
}

// === CTRL_REG5 (24h) ===

pub const LIR_INT1: u8 = 0b0000_1000;

// === INT1_CFG (30h) ===

/// AND combination of interrupt events
pub const AOI_AND: u8 = 0b1000_0000;

pub const ZLIE: u8 = 0b0001_0000;
pub const YLIE: u8 = 0b0000_0100;
pub const XLIE: u8 = 0b0000_0001;

// === INT1_SRC (31h), CLICK_SRC (39h) ===

pub const IA: u8 = 0b0100_0000;

// === INT1_THS (32h) ===

pub const THS_MASK: u8 = 0b0111_1111;

// === INT1_DURATION (33h) ===

pub const D_MASK: u8 = 0b0111_1111;

/// Samples (1/ODR) the freefall condition has to hold
pub const FREEFALL_DURATION: u8 = 3;

// === CLICK_CFG (38h) ===

pub const ZD: u8 = 0b0010_0000;
pub const ZS: u8 = 0b0001_0000;
pub const YD: u8 = 0b0000_1000;
pub const YS: u8 = 0b0000_0100;
pub const XD: u8 = 0b0000_0010;
pub const XS: u8 = 0b0000_0001;

// === CLICK_SRC (39h) ===

pub const DClick: u8 = 0b0010_0000;
pub const SClick: u8 = 0b0001_0000;

// === CLICK_THS (3Ah) ===

pub const LIR_Click: u8 = 0b1000_0000;

// === TIME_LIMIT (3Bh), TIME_LATENCY (3Ch), TIME_WINDOW (3Dh) ===

pub const TLI_MASK: u8 = 0b0111_1111;

/// Maximum click duration (1/ODR)
pub const CLICK_TIME_LIMIT: u8 = 15;
/// Dead time after the first click (1/ODR)
pub const CLICK_TIME_LATENCY: u8 = 20;
/// Window for the second click of a double click (1/ODR)
pub const CLICK_TIME_WINDOW: u8 = 50;
