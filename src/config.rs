//! Device configuration

use core::time::Duration;

use crate::reg::{DataRate, Range, Resolution, I2C_SAD};

/// Possible slave addresses
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SlaveAddr {
    /// Default slave address
    #[default]
    Default,
    /// Alternative slave address providing bit value for `SA0`
    Alternative(bool),
}

impl SlaveAddr {
    pub(crate) fn addr(self) -> u8 {
        match self {
            SlaveAddr::Default => I2C_SAD,
            SlaveAddr::Alternative(sa0) => I2C_SAD | sa0 as u8,
        }
    }
}

/// Configuration the driver is constructed with.
///
/// It is copied into the driver and never changes afterwards.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Config {
    /// I²C slave address
    pub address: SlaveAddr,
    /// Full-scale range
    pub range: Range,
    /// Output data rate
    pub data_rate: DataRate,
    /// Operating mode
    pub resolution: Resolution,
    /// Period the scheduler calls [`update`](crate::Lis3dh::update) with
    pub update_interval: Duration,
    /// Low-pass filter weight of a new sample, `None` publishes samples as read
    pub smoothing: Option<f32>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            address: SlaveAddr::Default,
            range: Range::G2,
            data_rate: DataRate::Hz100,
            resolution: Resolution::HighResolution,
            update_interval: Duration::from_secs(10),
            smoothing: None,
        }
    }
}

impl Config {
    /// Smoothing weight if it is usable, i.e. in `(0, 1]`
    pub(crate) fn smoothing_alpha(&self) -> Option<f32> {
        self.smoothing.filter(|a| *a > 0.0 && *a <= 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = Config::default();
        assert_eq!(config.address.addr(), 0x18);
        assert_eq!(config.range, Range::G2);
        assert_eq!(config.data_rate, DataRate::Hz100);
        assert_eq!(config.resolution, Resolution::HighResolution);
        assert_eq!(config.update_interval, Duration::from_secs(10));
        assert_eq!(config.smoothing, None);
    }

    #[test]
    fn alternative_address() {
        assert_eq!(SlaveAddr::Alternative(false).addr(), 0x18);
        assert_eq!(SlaveAddr::Alternative(true).addr(), 0x19);
    }

    #[test]
    fn smoothing_bounds() {
        let mut config = Config::default();
        for &(alpha, usable) in [(0.5, true), (1.0, true), (0.0, false), (1.5, false), (-0.1, false)].iter() {
            config.smoothing = Some(alpha);
            assert_eq!(config.smoothing_alpha().is_some(), usable);
        }
        config.smoothing = Some(f32::NAN);
        assert_eq!(config.smoothing_alpha(), None);
    }
}
