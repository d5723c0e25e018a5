use crate::foundation::{
    core::{Axis, FrameIndex},
    error::{MetaloopError, MetaloopResult},
};

/// Animated scalar channel a curve drives on its host object.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "kind", content = "axis", rename_all = "snake_case")]
pub enum Channel {
    /// One Euler rotation component, radians.
    Rotation(Axis),
    /// Path-follower evaluation time, frames along the guide curve.
    EvalTime,
}

/// Behaviour outside the keyed frame range.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Extrapolation {
    /// Freeze at the nearest endpoint value.
    Hold,
    /// Keep the slope of the nearest keyed segment.
    Linear,
}

#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Keyframe {
    pub frame: FrameIndex,
    pub value: f64,
}

/// Ordered keyframes for one channel, interpolated linearly between keys.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct AnimationCurve {
    channel: Channel,
    keys: Vec<Keyframe>, // strictly increasing frames, len >= 2
    extrapolation: Extrapolation,
}

impl AnimationCurve {
    pub fn new(
        channel: Channel,
        keys: Vec<Keyframe>,
        extrapolation: Extrapolation,
    ) -> MetaloopResult<Self> {
        if keys.len() < 2 {
            return Err(MetaloopError::validation(
                "animation curve needs at least two keyframes",
            ));
        }
        if let Some(w) = keys.windows(2).find(|w| w[0].frame >= w[1].frame) {
            return Err(MetaloopError::InvalidFrameRange {
                start: w[0].frame.0,
                end: w[1].frame.0,
            });
        }
        Ok(Self {
            channel,
            keys,
            extrapolation,
        })
    }

    pub fn channel(&self) -> Channel {
        self.channel
    }

    pub fn keys(&self) -> &[Keyframe] {
        &self.keys
    }

    pub fn extrapolation(&self) -> Extrapolation {
        self.extrapolation
    }

    pub fn first(&self) -> Keyframe {
        self.keys[0]
    }

    pub fn last(&self) -> Keyframe {
        self.keys[self.keys.len() - 1]
    }

    /// Value at a (possibly fractional) frame. A NaN frame samples to NaN.
    pub fn sample(&self, frame: f64) -> f64 {
        if frame.is_nan() {
            return f64::NAN;
        }
        let first = self.first();
        let last = self.last();

        if frame <= first.frame.as_f64() {
            return match self.extrapolation {
                Extrapolation::Hold => first.value,
                Extrapolation::Linear => segment_value(&self.keys[0], &self.keys[1], frame),
            };
        }
        if frame >= last.frame.as_f64() {
            let n = self.keys.len();
            return match self.extrapolation {
                Extrapolation::Hold => last.value,
                Extrapolation::Linear => segment_value(&self.keys[n - 2], &self.keys[n - 1], frame),
            };
        }

        let idx = self.keys.partition_point(|k| k.frame.as_f64() <= frame);
        segment_value(&self.keys[idx - 1], &self.keys[idx], frame)
    }
}

fn segment_value(a: &Keyframe, b: &Keyframe, frame: f64) -> f64 {
    let span = b.frame.as_f64() - a.frame.as_f64();
    let t = (frame - a.frame.as_f64()) / span;
    a.value + (b.value - a.value) * t
}
