use crate::foundation::error::{MetaloopError, MetaloopResult};

pub use glam::DVec3 as Vec3;

/// Absolute frame index on the scene timeline. The host timeline starts at frame 1.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
pub struct FrameIndex(pub u64);

impl FrameIndex {
    /// First frame of every generated loop.
    pub const FIRST: Self = Self(1);

    pub fn as_f64(self) -> f64 {
        self.0 as f64
    }
}

/// Frames-per-second represented as a rational `num/den`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Fps {
    /// Numerator (frames).
    pub num: u32,
    /// Denominator (seconds), must be non-zero.
    pub den: u32,
}

impl Fps {
    /// Create a validated FPS value.
    pub fn new(num: u32, den: u32) -> MetaloopResult<Self> {
        if den == 0 {
            return Err(MetaloopError::validation("Fps den must be > 0"));
        }
        if num == 0 {
            return Err(MetaloopError::validation("Fps num must be > 0"));
        }
        Ok(Self { num, den })
    }

    /// Whole-number frame rate.
    pub fn whole(num: u32) -> MetaloopResult<Self> {
        Self::new(num, 1)
    }
}

/// One of the three principal axes; the index matches host channel indices.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Axis {
    X,
    Y,
    Z,
}

impl Axis {
    pub const ALL: [Axis; 3] = [Axis::X, Axis::Y, Axis::Z];

    pub fn index(self) -> usize {
        match self {
            Self::X => 0,
            Self::Y => 1,
            Self::Z => 2,
        }
    }
}

/// Translation, per-axis rotation (radians) and scale of a placed object.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Transform {
    pub translation: Vec3,
    pub rotation: Vec3,
    pub scale: Vec3,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            translation: Vec3::ZERO,
            rotation: Vec3::ZERO,
            scale: Vec3::ONE,
        }
    }
}

impl Transform {
    pub fn at(translation: Vec3) -> Self {
        Self {
            translation,
            ..Self::default()
        }
    }

    pub fn rotation_on(&self, axis: Axis) -> f64 {
        self.rotation[axis.index()]
    }

    pub fn set_rotation_on(&mut self, axis: Axis, radians: f64) {
        self.rotation[axis.index()] = radians;
    }

    pub fn scale_on(&self, axis: Axis) -> f64 {
        self.scale[axis.index()]
    }

    /// Multiply the scale on one axis, leaving the other two untouched.
    pub fn scale_axis_by(&mut self, axis: Axis, factor: f64) {
        self.scale[axis.index()] *= factor;
    }
}

/// Output image dimensions in pixels.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Resolution {
    pub width: u32,
    pub height: u32,
}

impl Resolution {
    pub fn square(side: u32) -> Self {
        Self {
            width: side,
            height: side,
        }
    }
}
