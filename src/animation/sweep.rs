//! Two-key rotation sweeps and path-follower timing curves.
//!
//! A two-key curve with linear extrapolation is constant angular velocity; when the end frame is
//! the loop length and the angle a multiple of 360 degrees the loop closes seamlessly.

use rand::Rng;

use crate::{
    animation::curve::{AnimationCurve, Channel, Extrapolation, Keyframe},
    foundation::{
        core::{Axis, FrameIndex, Transform},
        error::{MetaloopError, MetaloopResult},
    },
};

#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RotationDirection {
    Clockwise,
    CounterClockwise,
}

impl RotationDirection {
    pub fn from_clockwise(clockwise: bool) -> Self {
        if clockwise {
            Self::Clockwise
        } else {
            Self::CounterClockwise
        }
    }

    /// Fair coin flip between the two directions.
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self::from_clockwise(rng.gen_range(0..=1) == 1)
    }

    fn sign(self) -> f64 {
        match self {
            Self::Clockwise => -1.0,
            Self::CounterClockwise => 1.0,
        }
    }
}

/// Sweep `axis` of `target` by `total_angle_deg` between two frames.
///
/// The start key holds the target's current angle on that axis; afterwards the target carries the
/// end angle, so a second sweep on the same transform continues from where this one stopped.
pub fn build_rotation_sweep(
    target: &mut Transform,
    axis: Axis,
    total_angle_deg: f64,
    start_frame: FrameIndex,
    end_frame: FrameIndex,
    direction: RotationDirection,
    extrapolation: Extrapolation,
) -> MetaloopResult<AnimationCurve> {
    if end_frame <= start_frame {
        return Err(MetaloopError::InvalidFrameRange {
            start: start_frame.0,
            end: end_frame.0,
        });
    }

    let current = target.rotation_on(axis);
    let end_value = current + direction.sign() * total_angle_deg.to_radians();
    target.set_rotation_on(axis, end_value);

    AnimationCurve::new(
        Channel::Rotation(axis),
        vec![
            Keyframe {
                frame: start_frame,
                value: current,
            },
            Keyframe {
                frame: end_frame,
                value: end_value,
            },
        ],
        extrapolation,
    )
}

/// One full turn about `axis` between `start_frame` and `end_frame`.
pub fn build_360_sweep(
    target: &mut Transform,
    axis: Axis,
    start_frame: FrameIndex,
    end_frame: FrameIndex,
    direction: RotationDirection,
    extrapolation: Extrapolation,
) -> MetaloopResult<AnimationCurve> {
    build_rotation_sweep(
        target,
        axis,
        360.0,
        start_frame,
        end_frame,
        direction,
        extrapolation,
    )
}

/// Evaluation-time curve for a path follower: `duration` frames of travel from `start_frame`,
/// continuing linearly so a cyclic guide is lapped once per `duration`.
pub fn follow_path_curve(start_frame: FrameIndex, duration: u64) -> MetaloopResult<AnimationCurve> {
    let end_frame = FrameIndex(start_frame.0.saturating_add(duration));
    if end_frame <= start_frame {
        return Err(MetaloopError::InvalidFrameRange {
            start: start_frame.0,
            end: end_frame.0,
        });
    }
    AnimationCurve::new(
        Channel::EvalTime,
        vec![
            Keyframe {
                frame: start_frame,
                value: 0.0,
            },
            Keyframe {
                frame: end_frame,
                value: duration as f64,
            },
        ],
        Extrapolation::Linear,
    )
}

#[cfg(test)]
mod tests {
    use std::f64::consts::{PI, TAU};

    use rand::{SeedableRng, rngs::StdRng};

    use super::*;

    fn sweep(theta0: f64, direction: RotationDirection) -> AnimationCurve {
        let mut t = Transform::default();
        t.set_rotation_on(Axis::X, theta0);
        build_360_sweep(
            &mut t,
            Axis::X,
            FrameIndex(1),
            FrameIndex(360),
            direction,
            Extrapolation::Linear,
        )
        .unwrap()
    }

    #[test]
    fn counter_clockwise_adds_full_turn() {
        for theta0 in [0.0, 0.5, -2.0, PI] {
            let c = sweep(theta0, RotationDirection::CounterClockwise);
            assert_eq!(c.keys().len(), 2);
            assert_eq!(c.first(), Keyframe { frame: FrameIndex(1), value: theta0 });
            assert_eq!(c.last().frame, FrameIndex(360));
            assert!((c.last().value - (theta0 + TAU)).abs() < 1e-12);
        }
    }

    #[test]
    fn clockwise_subtracts_full_turn() {
        let c = sweep(0.25, RotationDirection::Clockwise);
        assert!((c.last().value - (0.25 - TAU)).abs() < 1e-12);
        assert_eq!(c.channel(), Channel::Rotation(Axis::X));
    }

    #[test]
    fn repeated_sweeps_compose() {
        let mut t = Transform::default();
        let a = build_rotation_sweep(
            &mut t,
            Axis::Z,
            90.0,
            FrameIndex(1),
            FrameIndex(10),
            RotationDirection::CounterClockwise,
            Extrapolation::Hold,
        )
        .unwrap();
        let b = build_rotation_sweep(
            &mut t,
            Axis::Z,
            90.0,
            FrameIndex(10),
            FrameIndex(20),
            RotationDirection::CounterClockwise,
            Extrapolation::Hold,
        )
        .unwrap();
        assert_eq!(b.first().value, a.last().value);
        assert!((t.rotation_on(Axis::Z) - PI).abs() < 1e-12);
        assert_eq!(t.rotation_on(Axis::X), 0.0);
    }

    #[test]
    fn inverted_or_empty_range_fails() {
        for (start, end) in [(10, 10), (10, 9), (1, 0)] {
            let mut t = Transform::default();
            let res = build_rotation_sweep(
                &mut t,
                Axis::Y,
                45.0,
                FrameIndex(start),
                FrameIndex(end),
                RotationDirection::Clockwise,
                Extrapolation::Linear,
            );
            assert!(matches!(res, Err(MetaloopError::InvalidFrameRange { .. })));
            assert_eq!(t, Transform::default(), "failed sweep must not touch target");
        }
    }

    #[test]
    fn linear_full_turn_loops_seamlessly() {
        // Frames 1..=360 then 361.. repeat the same orientation modulo a full turn.
        let c = sweep(0.0, RotationDirection::CounterClockwise);
        let period = 360.0 - 1.0;
        for f in [1.0, 37.5, 200.0] {
            let wrapped = (c.sample(f + period) - c.sample(f)).rem_euclid(TAU);
            assert!(wrapped < 1e-9 || (TAU - wrapped) < 1e-9);
        }
    }

    #[test]
    fn hold_freezes_past_end() {
        let mut t = Transform::default();
        let c = build_360_sweep(
            &mut t,
            Axis::Y,
            FrameIndex(1),
            FrameIndex(100),
            RotationDirection::Clockwise,
            Extrapolation::Hold,
        )
        .unwrap();
        assert_eq!(c.sample(500.0), c.last().value);
    }

    #[test]
    fn follow_path_covers_duration() {
        let c = follow_path_curve(FrameIndex(1), 360).unwrap();
        assert_eq!(c.sample(1.0), 0.0);
        assert_eq!(c.sample(361.0), 360.0);
        assert_eq!(c.extrapolation(), Extrapolation::Linear);
        assert!(follow_path_curve(FrameIndex(1), 0).is_err());
    }

    #[test]
    fn random_direction_hits_both_sides() {
        let mut rng = StdRng::seed_from_u64(3);
        let draws: Vec<_> = (0..64).map(|_| RotationDirection::random(&mut rng)).collect();
        assert!(draws.contains(&RotationDirection::Clockwise));
        assert!(draws.contains(&RotationDirection::CounterClockwise));
    }
}
