//! Randomised placement of the centerpiece: guide paths, the metaballs riding them, and the one
//! material they all share.
//!
//! Each element moves through `Planned -> PathBound -> Animated` exactly once; the typestates
//! below make the order a compile-time property.

use std::{ops::Range, sync::Arc};

use rand::Rng;

use crate::{
    animation::{
        curve::{AnimationCurve, Extrapolation},
        sweep::{RotationDirection, build_360_sweep, follow_path_curve},
    },
    color::{LinearRgba, random_palette_color},
    foundation::{
        core::{Axis, FrameIndex, Transform, Vec3},
        error::{MetaloopError, MetaloopResult},
    },
};

/// Bounds of the path bias factor and the element scale factor. Both ends are exclusive: a draw
/// landing exactly on `start` is redrawn, see [`draw_scale_factor`].
pub const SCALE_FACTOR_RANGE: Range<f64> = 0.05..0.5;

/// Paths revolve about this axis over the loop.
pub const PATH_SWEEP_AXIS: Axis = Axis::X;

pub const PATH_RADIUS: f64 = 1.0;
pub const METABALL_RENDER_RESOLUTION: f64 = 0.05;
pub const DEFAULT_METABALL_COUNT: usize = 10;
/// Upper bound on elements per centerpiece.
pub const MAX_METABALL_COUNT: usize = 1_000;

/// Index of a path inside its [`Centerpiece`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(transparent)]
pub struct PathId(pub usize);

/// Non-uniform scale applied to one horizontal axis of a guide circle.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize)]
pub struct ScaleBias {
    pub axis: Axis,
    pub factor: f64,
}

/// Closed circular guide curve, squashed into an ellipse and slowly revolving.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct PathSpec {
    pub id: PathId,
    pub radius: f64,
    pub cyclic: bool,
    /// Orientation baked into the rest pose; never animated.
    pub rest_rotation: Vec3,
    pub transform: Transform,
    pub scale_bias: ScaleBias,
    pub rotation: AnimationCurve,
    /// Frames a follower takes for one lap.
    pub duration: u64,
}

#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct ReflectiveMaterial {
    pub name: String,
    pub color: LinearRgba,
    pub roughness: f64,
    pub specular: f64,
}

impl ReflectiveMaterial {
    pub fn metaball(color: LinearRgba) -> Self {
        Self {
            name: "material.reflective.metaball".to_owned(),
            color,
            roughness: 0.1,
            specular: 0.5,
        }
    }
}

/// Follow-path binding: position is driven by traversal of `target` over `duration` frames.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct FollowPath {
    pub target: PathId,
    pub duration: u64,
    pub eval_time: AnimationCurve,
}

#[derive(Clone, Debug, serde::Serialize)]
pub struct CenterpieceElement {
    pub path: PathId,
    pub transform: Transform,
    pub scale_factor: f64,
    pub render_resolution: f64,
    pub follow: FollowPath,
    #[serde(skip)]
    pub material: Arc<ReflectiveMaterial>,
}

/// Element with its scale drawn, not yet attached to a path.
#[derive(Clone, Copy, Debug)]
pub struct PlannedElement {
    scale_factor: f64,
}

/// Element attached to a guide path, not yet animated along it.
#[derive(Clone, Copy, Debug)]
pub struct PathBoundElement {
    scale_factor: f64,
    path: PathId,
    duration: u64,
}

impl PlannedElement {
    pub fn draw<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self {
            scale_factor: draw_scale_factor(rng),
        }
    }

    pub fn bind(self, path: &PathSpec) -> PathBoundElement {
        PathBoundElement {
            scale_factor: self.scale_factor,
            path: path.id,
            duration: path.duration,
        }
    }
}

impl PathBoundElement {
    /// Start the follower at the first frame so it laps once per `duration`.
    pub fn animate(self, material: Arc<ReflectiveMaterial>) -> MetaloopResult<CenterpieceElement> {
        let eval_time = follow_path_curve(FrameIndex::FIRST, self.duration)?;
        Ok(CenterpieceElement {
            path: self.path,
            transform: Transform {
                scale: Vec3::splat(self.scale_factor),
                ..Transform::default()
            },
            scale_factor: self.scale_factor,
            render_resolution: METABALL_RENDER_RESOLUTION,
            follow: FollowPath {
                target: self.path,
                duration: self.duration,
                eval_time,
            },
            material,
        })
    }
}

/// Paths, elements and the single material instance bound to all of them.
#[derive(Clone, Debug, serde::Serialize)]
pub struct Centerpiece {
    pub paths: Vec<PathSpec>,
    pub elements: Vec<CenterpieceElement>,
    pub material: Arc<ReflectiveMaterial>,
}

impl Centerpiece {
    pub fn path(&self, id: PathId) -> Option<&PathSpec> {
        self.paths.get(id.0)
    }

    /// `true` when every element points at the group material instance.
    pub fn shares_one_material(&self) -> bool {
        self.elements
            .iter()
            .all(|e| Arc::ptr_eq(&e.material, &self.material))
    }
}

/// Uniform draw from the open interval `(0.05, 0.5)`.
pub fn draw_scale_factor<R: Rng + ?Sized>(rng: &mut R) -> f64 {
    loop {
        let factor = rng.gen_range(SCALE_FACTOR_RANGE);
        if factor > SCALE_FACTOR_RANGE.start {
            return factor;
        }
    }
}

/// Three independent uniform angles in `[0, 360)` degrees, returned in radians.
pub fn random_orientation<R: Rng + ?Sized>(rng: &mut R) -> Transform {
    let mut angle = || rng.gen_range(0.0..360.0_f64).to_radians();
    let rotation = Vec3::new(angle(), angle(), angle());
    Transform {
        rotation,
        ..Transform::default()
    }
}

pub fn plan_path_spec<R: Rng + ?Sized>(
    rng: &mut R,
    id: PathId,
    total_frames: u64,
) -> MetaloopResult<PathSpec> {
    let mut transform = Transform::default();
    let direction = RotationDirection::random(rng);
    let rotation = build_360_sweep(
        &mut transform,
        PATH_SWEEP_AXIS,
        FrameIndex::FIRST,
        FrameIndex(total_frames),
        direction,
        Extrapolation::Linear,
    )?;

    let rest_rotation = random_orientation(rng).rotation;

    let axis = if rng.gen_range(0..=1) == 1 {
        Axis::X
    } else {
        Axis::Y
    };
    let factor = draw_scale_factor(rng);
    transform.scale_axis_by(axis, factor);

    tracing::debug!(path = id.0, ?direction, ?axis, factor, "planned path");

    Ok(PathSpec {
        id,
        radius: PATH_RADIUS,
        cyclic: true,
        rest_rotation,
        transform,
        scale_bias: ScaleBias { axis, factor },
        rotation,
        duration: total_frames,
    })
}

pub fn plan_centerpiece_element<R: Rng + ?Sized>(
    rng: &mut R,
    path: &PathSpec,
    material: &Arc<ReflectiveMaterial>,
) -> MetaloopResult<CenterpieceElement> {
    let element = PlannedElement::draw(rng)
        .bind(path)
        .animate(Arc::clone(material))?;
    tracing::debug!(path = path.id.0, scale = element.scale_factor, "planned element");
    Ok(element)
}

/// `count` independently randomised path/element pairs sharing one reflective material.
pub fn plan_centerpiece<R: Rng + ?Sized>(
    rng: &mut R,
    total_frames: u64,
    count: usize,
) -> MetaloopResult<Centerpiece> {
    if count == 0 {
        return Err(MetaloopError::validation("metaball count must be > 0"));
    }
    if count > MAX_METABALL_COUNT {
        return Err(MetaloopError::validation(format!(
            "metaball count must be <= {MAX_METABALL_COUNT}, got {count}"
        )));
    }

    let material = Arc::new(ReflectiveMaterial::metaball(random_palette_color(rng)?));

    let mut paths = Vec::with_capacity(count);
    let mut elements = Vec::with_capacity(count);
    for i in 0..count {
        let path = plan_path_spec(rng, PathId(i), total_frames)?;
        elements.push(plan_centerpiece_element(rng, &path, &material)?);
        paths.push(path);
    }

    Ok(Centerpiece {
        paths,
        elements,
        material,
    })
}
