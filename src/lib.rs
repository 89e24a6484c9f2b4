//! Platform-agnostic LIS3DH accelerometer driver which uses I2C via
//! [embedded-hal] and implements the [`Accelerometer` trait][trait]
//! from the `accelerometer` crate.
//!
//! On top of plain register access the driver runs a polling cycle:
//! [`Lis3dh::setup`] identifies and configures the chip once, after which
//! [`Lis3dh::update`] is called at [`Config::update_interval`] and pushes
//! acceleration and orientation to the registered sinks and fires the
//! tap, double tap, freefall and orientation triggers.
//!
//! ```no_run
//! # fn demo<I2C: embedded_hal::i2c::I2c>(i2c: I2C) {
//! use lis3dh::{Axis, Config, Event, Lis3dh};
//!
//! let mut on_z = |g: f32| log::info!("z = {}", g);
//! let mut on_tap = || log::info!("tap");
//!
//! let mut dev = Lis3dh::new(i2c, Config::default());
//! dev.set_acceleration_sink(Axis::Z, &mut on_z);
//! dev.set_trigger(Event::Tap, &mut on_tap);
//! if dev.setup().is_ok() {
//!     loop {
//!         dev.update();
//!         // wait for dev.update_interval()
//!     }
//! }
//! # }
//! ```
//!
//! [embedded-hal]: https://docs.rs/embedded-hal
//! [trait]: https://docs.rs/accelerometer/latest/accelerometer/trait.Accelerometer.html
//!

#![deny(missing_docs)]
#![no_std]
#![forbid(unsafe_code)]

mod config;
mod hooks;
mod orientation;
mod reg;

use core::fmt::Debug;
use core::time::Duration;

pub use accelerometer::vector::{F32x3, I16x3};
pub use accelerometer::{Accelerometer, Error, ErrorKind, RawAccelerometer};
use cast::u16;
use embedded_hal as hal;
use hal::i2c::{ErrorType, I2c};
use num_traits::FromPrimitive;

use crate::hooks::{Armed, Hooks, Latched};
use crate::reg::*;

pub use crate::config::{Config, SlaveAddr};
pub use crate::hooks::{Axis, Event, OrientationPlane, TextSink, Trigger, ValueSink};
pub use crate::orientation::{Orientation, OrientationXy, OrientationZ, ORIENTATION_THRESHOLD};
pub use crate::reg::{DataRate, Range, Resolution};

/// Standard gravity, m/s² per g
pub const GRAVITY_EARTH: f32 = 9.806_65;

/// Driver life cycle
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum State {
    /// Constructed, [`Lis3dh::setup`] not called yet
    Uninitialized,
    /// Set up, polls are served
    Ready,
    /// Setup failed, polls are ignored for good
    Disabled,
}

/// `LIS3DH` driver
pub struct Lis3dh<'a, I2C> {
    /// The concrete I²C device implementation
    i2c: I2C,
    /// The I²C device slave address
    addr: u8,
    config: Config,
    state: State,
    hooks: Hooks<'a>,
    armed: Armed,
    /// Orientation of the last successful poll
    last_orientation: Option<Orientation>,
    /// Low-pass filter state, in g
    filtered: Option<F32x3>,
    /// Last poll failed
    warning: bool,
}

impl<'a, I2C, E> Lis3dh<'a, I2C>
where
    I2C: I2c + ErrorType<Error = E>,
    E: Debug,
{
    /// Create a new `LIS3DH` driver from the given `I2C` peripheral,
    /// the bus is not touched before [`setup`](Self::setup)
    pub fn new(i2c: I2C, config: Config) -> Self {
        Self {
            i2c,
            addr: config.address.addr(),
            config,
            state: State::Uninitialized,
            hooks: Hooks::default(),
            armed: Armed::default(),
            last_orientation: None,
            filtered: None,
            warning: false,
        }
    }

    /// Destroy driver instance, return `I2C` bus instance
    pub fn destroy(self) -> I2C {
        self.i2c
    }

    /// Sink for the acceleration of `axis` in m/s²
    pub fn set_acceleration_sink(&mut self, axis: Axis, sink: ValueSink<'a>) {
        self.hooks.set_acceleration(axis, sink);
    }

    /// Sink for the orientation label of `plane`
    pub fn set_orientation_sink(&mut self, plane: OrientationPlane, sink: TextSink<'a>) {
        self.hooks.set_orientation(plane, sink);
    }

    /// Trigger for `event`.
    ///
    /// Hardware detection for tap, double tap and freefall is armed by
    /// [`setup`](Self::setup) only for triggers registered before it.
    pub fn set_trigger(&mut self, event: Event, trigger: Trigger<'a>) {
        self.hooks.set_trigger(event, trigger);
    }

    /// Configuration the driver was created with
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Period [`update`](Self::update) is expected to be called with
    pub fn update_interval(&self) -> Duration {
        self.config.update_interval
    }

    /// Current life cycle state
    pub fn state(&self) -> State {
        self.state
    }

    /// Setup succeeded
    pub fn is_ready(&self) -> bool {
        self.state == State::Ready
    }

    /// The last poll failed on the bus
    pub fn has_warning(&self) -> bool {
        self.warning
    }

    /// Orientation decoded by the last successful poll
    pub fn last_orientation(&self) -> Option<Orientation> {
        self.last_orientation
    }

    /// `WHO_AM_I` register
    pub fn get_device_id(&mut self) -> Result<u8, Error<E>> {
        self.read_reg(Register::WHO_AM_I).map_err(Into::into)
    }

    /// One-time initialization: checks the device identity, programs
    /// range, data rate and resolution, and arms the detectors of the
    /// registered triggers.
    ///
    /// Any failure leaves the driver [`State::Disabled`] for good.
    pub fn setup(&mut self) -> Result<(), Error<E>> {
        if self.state != State::Uninitialized {
            ErrorKind::Mode.err()?;
        }

        match self.configure() {
            Ok(()) => {
                self.state = State::Ready;
                log::debug!(
                    "LIS3DH at {:#04x} ready: {:?}, {:?}, {:?}",
                    self.addr,
                    self.config.range,
                    self.config.data_rate,
                    self.config.resolution
                );
                Ok(())
            }
            Err(e) => {
                self.state = State::Disabled;
                log::error!("LIS3DH at {:#04x} disabled: {:?}", self.addr, e);
                Err(e)
            }
        }
    }

    fn configure(&mut self) -> Result<(), Error<E>> {
        // Ensure we have the correct device ID
        let id = self.get_device_id()?;
        if id != DEVICE_ID {
            log::debug!("WHO_AM_I returned {:#04x}, expected {:#04x}", id, DEVICE_ID);
            ErrorKind::Device.err()?;
        }

        if self.config.smoothing.is_some() && self.config.smoothing_alpha().is_none() {
            log::warn!(
                "smoothing {:?} outside (0, 1], publishing unfiltered",
                self.config.smoothing
            );
        }

        let Config {
            range,
            data_rate,
            resolution,
            ..
        } = self.config;
        self.modify_reg(Register::CTRL_REG1, |v| {
            (v & !CTRL_REG1_FIELDS) | ctrl_reg1_bits(data_rate, resolution)
        })?;
        self.modify_reg(Register::CTRL_REG4, |v| {
            (v & !CTRL_REG4_FIELDS) | ctrl_reg4_bits(range, resolution)
        })?;

        let armed = Armed::requested(&self.hooks);
        self.configure_click(armed)?;
        self.configure_freefall(armed)?;
        self.armed = armed;
        Ok(())
    }

    /// `CLICK_CFG`, `CLICK_THS`, `TIME_LIMIT`, `TIME_LATENCY`, `TIME_WINDOW`
    fn configure_click(&mut self, armed: Armed) -> Result<(), E> {
        if !armed.click() {
            return self.write_reg(Register::CLICK_CFG, 0x00);
        }

        let mut cfg = 0;
        if armed.single_click {
            cfg |= XS | YS | ZS;
        }
        if armed.double_click {
            cfg |= XD | YD | ZD;
        }
        self.write_reg(Register::CLICK_CFG, cfg)?;
        // latched until CLICK_SRC is read
        let ths = LIR_Click | (self.config.range.click_ths() & THS_MASK);
        self.write_reg(Register::CLICK_THS, ths)?;
        self.write_reg(Register::TIME_LIMIT, CLICK_TIME_LIMIT & TLI_MASK)?;
        self.write_reg(Register::TIME_LATENCY, CLICK_TIME_LATENCY)?;
        self.write_reg(Register::TIME_WINDOW, CLICK_TIME_WINDOW)?;
        Ok(())
    }

    /// `CTRL_REG5`: `LIR_INT1`, `INT1_CFG`, `INT1_THS`, `INT1_DURATION`
    fn configure_freefall(&mut self, armed: Armed) -> Result<(), E> {
        if !armed.freefall {
            return self.write_reg(Register::INT1_CFG, 0x00);
        }

        // latched until INT1_SRC is read
        self.reg_set_bits(Register::CTRL_REG5, LIR_INT1)?;
        // all axes low at the same time
        self.write_reg(Register::INT1_CFG, AOI_AND | XLIE | YLIE | ZLIE)?;
        let ths = self.config.range.freefall_ths() & THS_MASK;
        self.write_reg(Register::INT1_THS, ths)?;
        self.write_reg(Register::INT1_DURATION, FREEFALL_DURATION & D_MASK)?;
        Ok(())
    }

    /// Periodic poll.
    ///
    /// Does nothing unless [`setup`](Self::setup) succeeded. A bus fault
    /// skips the whole poll: nothing is published or fired and the next
    /// poll starts over.
    pub fn update(&mut self) {
        if self.state != State::Ready {
            return;
        }

        match self.poll() {
            Ok(()) => {
                if self.warning {
                    log::info!("LIS3DH at {:#04x} responding again", self.addr);
                    self.warning = false;
                }
            }
            Err(e) => {
                if self.warning {
                    log::debug!("poll failed: {:?}", e);
                } else {
                    log::warn!("LIS3DH at {:#04x} poll failed: {:?}", self.addr, e);
                    self.warning = true;
                }
            }
        }
    }

    fn poll(&mut self) -> Result<(), Error<E>> {
        // every read first, so a failure leaves the consumers untouched
        let accel = if self.hooks.wants_axes() {
            Some(self.accel_norm()?)
        } else {
            None
        };
        let click_src = if self.armed.click() {
            self.read_reg(Register::CLICK_SRC)?
        } else {
            0
        };
        let int1_src = if self.armed.freefall {
            self.read_reg(Register::INT1_SRC)?
        } else {
            0
        };

        if let Some(accel) = accel {
            let accel = self.smooth(accel);
            log::trace!("acceleration: {} {} {} g", accel.x, accel.y, accel.z);
            for &axis in Axis::ALL.iter() {
                let g = match axis {
                    Axis::X => accel.x,
                    Axis::Y => accel.y,
                    Axis::Z => accel.z,
                };
                self.hooks.publish_acceleration(axis, g * GRAVITY_EARTH);
            }
            self.report_orientation(Orientation::from_g(accel.x, accel.y, accel.z));
        }

        let latched = Latched::decode(click_src, int1_src);
        if latched.tap {
            self.hooks.fire(Event::Tap);
        }
        if latched.double_tap {
            self.hooks.fire(Event::DoubleTap);
        }
        if latched.freefall {
            self.hooks.fire(Event::Freefall);
        }
        Ok(())
    }

    /// Labels every poll, trigger only on change
    fn report_orientation(&mut self, orientation: Orientation) {
        self.hooks
            .publish_orientation(OrientationPlane::Xy, orientation.xy.as_str());
        self.hooks
            .publish_orientation(OrientationPlane::Z, orientation.z.as_str());

        let changed = matches!(self.last_orientation, Some(last) if last != orientation);
        self.last_orientation = Some(orientation);
        if changed {
            self.hooks.fire(Event::Orientation);
        }
    }

    fn smooth(&mut self, accel: F32x3) -> F32x3 {
        let alpha = match self.config.smoothing_alpha() {
            Some(alpha) => alpha,
            None => return accel,
        };
        let lpf = |new: f32, old: f32| alpha * new + (1.0 - alpha) * old;
        let out = match self.filtered {
            Some(prev) => F32x3::new(
                lpf(accel.x, prev.x),
                lpf(accel.y, prev.y),
                lpf(accel.z, prev.z),
            ),
            None => accel,
        };
        self.filtered = Some(out);
        out
    }

    /// Log the configuration and the registered consumers
    pub fn log_config(&self) {
        log::info!("LIS3DH:");
        log::info!("  Address: {:#04x}", self.addr);
        log::info!("  State: {:?}", self.state);
        log::info!("  Range: {:?}", self.config.range);
        log::info!("  Data Rate: {:?}", self.config.data_rate);
        log::info!("  Resolution: {:?}", self.config.resolution);
        log::info!("  Update Interval: {:?}", self.config.update_interval);
        if let Some(alpha) = self.config.smoothing_alpha() {
            log::info!("  Smoothing: {}", alpha);
        }
        for &axis in Axis::ALL.iter() {
            if self.hooks.has_acceleration(axis) {
                log::info!("  Acceleration {:?}", axis);
            }
        }
        for &plane in [OrientationPlane::Xy, OrientationPlane::Z].iter() {
            if self.hooks.has_orientation(plane) {
                log::info!("  Orientation {:?}", plane);
            }
        }
        for &event in [
            Event::Tap,
            Event::DoubleTap,
            Event::Freefall,
            Event::Orientation,
        ]
        .iter()
        {
            if self.hooks.has_trigger(event) {
                log::info!("  On {:?}", event);
            }
        }
    }

    #[inline]
    fn read_reg(&mut self, reg: Register) -> Result<u8, E> {
        let mut buf = [0u8];
        self.i2c.write_read(self.addr, &[reg.addr()], &mut buf)?;
        Ok(buf[0])
    }

    #[inline]
    fn read_regs(&mut self, reg: Register, buffer: &mut [u8]) -> Result<(), E> {
        self.i2c
            .write_read(self.addr, &[reg.addr() | I2C_SUB_MULTI], buffer)
    }

    #[inline]
    fn write_reg(&mut self, reg: Register, val: u8) -> Result<(), E> {
        self.i2c.write(self.addr, &[reg.addr(), val])
    }

    #[inline]
    fn modify_reg<F>(&mut self, reg: Register, f: F) -> Result<(), E>
    where
        F: FnOnce(u8) -> u8,
    {
        let r = self.read_reg(reg)?;
        self.write_reg(reg, f(r))?;
        Ok(())
    }

    #[inline]
    fn reg_set_bits(&mut self, reg: Register, bits: u8) -> Result<(), E> {
        self.modify_reg(reg, |v| v | bits)
    }
}

impl<'a, I2C, E> RawAccelerometer<I16x3> for Lis3dh<'a, I2C>
where
    I2C: I2c + ErrorType<Error = E>,
    E: Debug,
{
    type Error = E;

    /// Get acceleration reading from the accelerometer,
    /// left-justified, all three axes in one burst
    fn accel_raw(&mut self) -> Result<I16x3, Error<E>> {
        let mut buf = [0u8; 6];
        self.read_regs(Register::OUT_X_L, &mut buf)?;

        Ok(I16x3::new(
            (u16(buf[0]) + (u16(buf[1]) << 8)) as i16,
            (u16(buf[2]) + (u16(buf[3]) << 8)) as i16,
            (u16(buf[4]) + (u16(buf[5]) << 8)) as i16,
        ))
    }
}

impl<'a, I2C, E> Accelerometer for Lis3dh<'a, I2C>
where
    I2C: I2c + ErrorType<Error = E>,
    E: Debug,
{
    type Error = E;

    /// Get normalized ±g reading from the accelerometer
    fn accel_norm(&mut self) -> Result<F32x3, Error<E>> {
        let acc_raw: I16x3 = self.accel_raw()?;
        let Config {
            range, resolution, ..
        } = self.config;

        Ok(F32x3::new(
            range.convert_out_i16tof32(resolution, acc_raw.x),
            range.convert_out_i16tof32(resolution, acc_raw.y),
            range.convert_out_i16tof32(resolution, acc_raw.z),
        ))
    }

    /// Get sample rate of accelerometer in Hz
    fn sample_rate(&mut self) -> Result<f32, Error<Self::Error>> {
        let creg1 = self.read_reg(Register::CTRL_REG1)?;
        let odr = creg1 >> 4;
        let rate = match DataRate::from_u8(odr) {
            Some(rate) => rate.hz(),
            None if odr == ODR_HIGH_RATE0 => 1620.0,
            None if odr == ODR_HIGH_RATE1 => {
                if creg1 & LPen == 0 {
                    1344.0
                } else {
                    5376.0
                }
            }
            // power-down
            None => 0.0,
        };
        Ok(rate)
    }
}
