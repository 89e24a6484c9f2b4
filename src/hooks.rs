//! Value sinks and event triggers the driver reports to

use crate::reg::{DClick, SClick, IA};

/// Numeric sink, receives acceleration in m/s²
pub type ValueSink<'a> = &'a mut dyn FnMut(f32);

/// Text sink, receives an orientation label
pub type TextSink<'a> = &'a mut dyn FnMut(&str);

/// Event trigger
pub type Trigger<'a> = &'a mut dyn FnMut();

/// Acceleration axis
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Axis {
    /// X axis
    X,
    /// Y axis
    Y,
    /// Z axis
    Z,
}

/// Orientation text channel
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum OrientationPlane {
    /// XY plane, see [`OrientationXy`](crate::OrientationXy)
    Xy,
    /// Z axis, see [`OrientationZ`](crate::OrientationZ)
    Z,
}

/// Detected event
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Event {
    /// Single click
    Tap,
    /// Double click
    DoubleTap,
    /// All axes below the freefall threshold
    Freefall,
    /// Orientation differs from the previous poll
    Orientation,
}

impl Axis {
    pub(crate) const ALL: [Axis; 3] = [Axis::X, Axis::Y, Axis::Z];
}

/// Registered consumers, one slot per axis, plane and event
#[derive(Default)]
pub(crate) struct Hooks<'a> {
    acceleration: [Option<ValueSink<'a>>; 3],
    orientation: [Option<TextSink<'a>>; 2],
    triggers: [Option<Trigger<'a>>; 4],
}

impl<'a> Hooks<'a> {
    pub fn set_acceleration(&mut self, axis: Axis, sink: ValueSink<'a>) {
        self.acceleration[axis as usize] = Some(sink);
    }

    pub fn set_orientation(&mut self, plane: OrientationPlane, sink: TextSink<'a>) {
        self.orientation[plane as usize] = Some(sink);
    }

    pub fn set_trigger(&mut self, event: Event, trigger: Trigger<'a>) {
        self.triggers[event as usize] = Some(trigger);
    }

    pub fn has_acceleration(&self, axis: Axis) -> bool {
        self.acceleration[axis as usize].is_some()
    }

    pub fn has_orientation(&self, plane: OrientationPlane) -> bool {
        self.orientation[plane as usize].is_some()
    }

    pub fn has_trigger(&self, event: Event) -> bool {
        self.triggers[event as usize].is_some()
    }

    /// Whether anything consumes the axis data
    pub fn wants_axes(&self) -> bool {
        self.acceleration.iter().any(Option::is_some)
            || self.orientation.iter().any(Option::is_some)
            || self.has_trigger(Event::Orientation)
    }

    pub fn publish_acceleration(&mut self, axis: Axis, value: f32) {
        if let Some(sink) = &mut self.acceleration[axis as usize] {
            sink(value);
        }
    }

    pub fn publish_orientation(&mut self, plane: OrientationPlane, label: &str) {
        if let Some(sink) = &mut self.orientation[plane as usize] {
            sink(label);
        }
    }

    pub fn fire(&mut self, event: Event) {
        if let Some(trigger) = &mut self.triggers[event as usize] {
            log::debug!("{:?} detected", event);
            trigger();
        }
    }
}

/// Hardware detectors armed during setup
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub(crate) struct Armed {
    pub single_click: bool,
    pub double_click: bool,
    pub freefall: bool,
}

impl Armed {
    pub fn requested(hooks: &Hooks<'_>) -> Self {
        Self {
            single_click: hooks.has_trigger(Event::Tap),
            double_click: hooks.has_trigger(Event::DoubleTap),
            freefall: hooks.has_trigger(Event::Freefall),
        }
    }

    pub fn click(&self) -> bool {
        self.single_click || self.double_click
    }
}

/// Latched interrupt flags of one poll,
/// the source registers clear on read so every flag covers exactly one poll
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub(crate) struct Latched {
    pub tap: bool,
    pub double_tap: bool,
    pub freefall: bool,
}

impl Latched {
    /// `CLICK_SRC` and `INT1_SRC` decoded,
    /// a double click never also counts as a single one
    pub fn decode(click_src: u8, int1_src: u8) -> Self {
        let click = (click_src & IA) != 0;
        let double_tap = click && (click_src & DClick) != 0;
        Self {
            tap: click && !double_tap && (click_src & SClick) != 0,
            double_tap,
            freefall: (int1_src & IA) != 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn click_decode() {
        assert_eq!(Latched::decode(0x00, 0x00), Latched::default());
        // SClick without IA
        assert_eq!(Latched::decode(0x10, 0x00), Latched::default());

        let single = Latched::decode(0x50, 0x00);
        assert!(single.tap && !single.double_tap && !single.freefall);

        let double = Latched::decode(0x60, 0x00);
        assert!(!double.tap && double.double_tap);

        // both latched, double wins
        let both = Latched::decode(0x70, 0x00);
        assert!(!both.tap && both.double_tap);
    }

    #[test]
    fn freefall_decode() {
        assert!(Latched::decode(0x00, 0x55).freefall);
        assert!(!Latched::decode(0x00, 0x15).freefall);
    }

    #[test]
    fn slots() {
        let mut x = |_: f32| {};
        let mut tap = || {};
        let mut hooks = Hooks::default();
        assert!(!hooks.wants_axes());
        assert_eq!(Armed::requested(&hooks), Armed::default());

        hooks.set_acceleration(Axis::Z, &mut x);
        assert!(hooks.has_acceleration(Axis::Z));
        assert!(!hooks.has_acceleration(Axis::X));
        assert!(hooks.wants_axes());

        hooks.set_trigger(Event::DoubleTap, &mut tap);
        let armed = Armed::requested(&hooks);
        assert!(armed.click() && armed.double_click && !armed.single_click);
    }

    #[test]
    fn orientation_trigger_needs_axes() {
        let mut changed = || {};
        let mut hooks = Hooks::default();
        hooks.set_trigger(Event::Orientation, &mut changed);
        assert!(hooks.wants_axes());
        assert!(!hooks.has_orientation(OrientationPlane::Xy));
    }
}
