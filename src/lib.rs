//! Metaloop generates the parameters of a short looping metaball animation.
//!
//! Given a seed, it decides what a 3D host should create (camera, area light, background ring,
//! a cluster of metaballs riding revolving elliptical paths) and how each of those moves over one
//! loop. The result is a [`SceneDescription`]: plain data that can be serialized or replayed into
//! any [`SceneHost`].
//!
//! - Seed a generator with [`Seed`] (clock or explicit value)
//! - Compose with [`generate_scene`] / [`compose_scene`]
//! - Hand the result to a host with [`SceneDescription::replay`]
#![forbid(unsafe_code)]

pub mod animation;
pub mod color;
pub mod config;
pub mod foundation;
pub mod host;
pub mod placement;
pub mod scene;
pub mod seed;

pub use animation::{
    curve::{AnimationCurve, Channel, Extrapolation, Keyframe},
    sweep::{RotationDirection, build_360_sweep, build_rotation_sweep, follow_path_curve},
};
pub use color::{
    LinearRgb, LinearRgba, PALETTE, hex_to_linear_rgb, hex_to_linear_rgba, linear_to_srgb,
    random_palette_color, srgb_to_linear,
};
pub use config::LoopConfig;
pub use foundation::core::{Axis, Fps, FrameIndex, Resolution, Transform, Vec3};
pub use foundation::error::{MetaloopError, MetaloopResult};
pub use host::{HostHandle, HostOp, RecordingHost, SceneHost};
pub use placement::{
    Centerpiece, CenterpieceElement, PathId, PathSpec, ReflectiveMaterial, ScaleBias,
    plan_centerpiece, plan_centerpiece_element, plan_path_spec, random_orientation,
};
pub use scene::composer::{compose_scene, compose_timed_scene, generate_batch, generate_scene};
pub use scene::model::SceneDescription;
pub use seed::{SceneRng, Seed, seed_from_clock, seed_from_value};
