//! Orientation derived from the gravity vector

use core::fmt;

use num_traits::float::FloatCore;

/// Minimum axis magnitude in g for an axis to count as pointing somewhere
pub const ORIENTATION_THRESHOLD: f32 = 0.4;

/// Orientation in the XY plane
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum OrientationXy {
    /// Neither X nor Y carries gravity, also the fallback for unusable samples
    Flat,
    /// +Y up
    PortraitUpright,
    /// -Y up
    PortraitUpsideDown,
    /// -X up
    LandscapeLeft,
    /// +X up
    LandscapeRight,
}

/// Orientation of the Z axis
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum OrientationZ {
    /// Face up
    Upwards,
    /// Face down
    Downwards,
    /// Standing on an edge, or no usable sample
    Sideways,
}

/// Combined orientation
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Orientation {
    /// XY plane
    pub xy: OrientationXy,
    /// Z axis
    pub z: OrientationZ,
}

impl OrientationXy {
    /// Text label
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Flat => "Flat",
            Self::PortraitUpright => "Portrait Upright",
            Self::PortraitUpsideDown => "Portrait Upside Down",
            Self::LandscapeLeft => "Landscape Left",
            Self::LandscapeRight => "Landscape Right",
        }
    }
}

impl OrientationZ {
    /// Text label
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Upwards => "Upwards looking",
            Self::Downwards => "Downwards looking",
            Self::Sideways => "Sideways",
        }
    }
}

impl fmt::Display for OrientationXy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for OrientationZ {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Orientation {
    /// Decode from acceleration in g (any unit works as long as all three agree,
    /// but the threshold is in g)
    pub fn from_g(x: f32, y: f32, z: f32) -> Self {
        Self {
            xy: decode_xy(x, y),
            z: decode_z(z),
        }
    }
}

fn decode_xy(x: f32, y: f32) -> OrientationXy {
    let ax = FloatCore::abs(x);
    let ay = FloatCore::abs(y);
    // written so that NaN ends up flat
    if !(ax >= ORIENTATION_THRESHOLD || ay >= ORIENTATION_THRESHOLD) {
        OrientationXy::Flat
    } else if ax > ay {
        if x > 0.0 {
            OrientationXy::LandscapeRight
        } else {
            OrientationXy::LandscapeLeft
        }
    } else if y > 0.0 {
        OrientationXy::PortraitUpright
    } else {
        OrientationXy::PortraitUpsideDown
    }
}

fn decode_z(z: f32) -> OrientationZ {
    if z >= ORIENTATION_THRESHOLD {
        OrientationZ::Upwards
    } else if z <= -ORIENTATION_THRESHOLD {
        OrientationZ::Downwards
    } else {
        OrientationZ::Sideways
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lying_flat() {
        let o = Orientation::from_g(0.0, 0.0, 1.0);
        assert_eq!(o.xy, OrientationXy::Flat);
        assert_eq!(o.z, OrientationZ::Upwards);

        let o = Orientation::from_g(0.1, -0.2, -1.0);
        assert_eq!(o.xy, OrientationXy::Flat);
        assert_eq!(o.z, OrientationZ::Downwards);
    }

    #[test]
    fn standing() {
        assert_eq!(decode_xy(0.0, 1.0), OrientationXy::PortraitUpright);
        assert_eq!(decode_xy(0.1, -0.9), OrientationXy::PortraitUpsideDown);
        assert_eq!(decode_xy(1.0, 0.2), OrientationXy::LandscapeRight);
        assert_eq!(decode_xy(-0.7, 0.5), OrientationXy::LandscapeLeft);
        assert_eq!(decode_z(0.1), OrientationZ::Sideways);
    }

    #[test]
    fn tie_is_portrait() {
        assert_eq!(decode_xy(0.7, 0.7), OrientationXy::PortraitUpright);
        assert_eq!(decode_xy(-0.7, -0.7), OrientationXy::PortraitUpsideDown);
    }

    #[test]
    fn unusable_sample_falls_back() {
        let o = Orientation::from_g(f32::NAN, f32::NAN, f32::NAN);
        assert_eq!(o.xy, OrientationXy::Flat);
        assert_eq!(o.z, OrientationZ::Sideways);
    }

    #[test]
    fn labels() {
        assert_eq!(OrientationXy::Flat.as_str(), "Flat");
        assert_eq!(OrientationXy::LandscapeLeft.as_str(), "Landscape Left");
        assert_eq!(OrientationZ::Downwards.as_str(), "Downwards looking");
    }
}
