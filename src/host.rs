//! Boundary to the 3D content-creation host.
//!
//! The generator never talks to a host directly; a finished [`SceneDescription`] is replayed
//! into any [`SceneHost`] implementation. Handles are opaque to this crate.

use std::sync::Arc;

use crate::{
    animation::curve::{AnimationCurve, Channel, Extrapolation, Keyframe},
    foundation::{
        core::{Transform, Vec3},
        error::MetaloopResult,
    },
    placement::{PathId, PathSpec, ReflectiveMaterial},
    scene::model::{
        AreaLight, BackgroundRing, CameraSpec, EmissiveMaterial, GlareEffect, SceneDescription,
    },
};

/// Opaque object/material handle issued by a host.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize)]
#[serde(transparent)]
pub struct HostHandle(pub u64);

/// Primitives a host must offer for a scene to be built.
///
/// Calls arrive in the order of [`SceneDescription::replay`]; every handle passed back in was
/// previously returned by the same host.
pub trait SceneHost {
    /// Frame range, frame rate, render/output settings and world colour.
    fn configure_scene(&mut self, scene: &SceneDescription) -> MetaloopResult<()>;

    fn create_camera(&mut self, camera: &CameraSpec) -> MetaloopResult<HostHandle>;
    fn create_empty(&mut self, name: &str, location: Vec3) -> MetaloopResult<HostHandle>;
    fn create_area_light(&mut self, light: &AreaLight) -> MetaloopResult<HostHandle>;
    fn create_curve(&mut self, path: &PathSpec) -> MetaloopResult<HostHandle>;
    fn create_metaball(&mut self, render_resolution: f64) -> MetaloopResult<HostHandle>;
    fn create_ring(&mut self, ring: &BackgroundRing) -> MetaloopResult<HostHandle>;

    fn set_transform(&mut self, object: HostHandle, transform: &Transform) -> MetaloopResult<()>;
    /// Fold `rotation` into the object's rest pose.
    fn bake_rotation(&mut self, object: HostHandle, rotation: Vec3) -> MetaloopResult<()>;
    fn insert_keyframes(
        &mut self,
        object: HostHandle,
        curve: &AnimationCurve,
    ) -> MetaloopResult<()>;

    /// Orient `object` toward `target` for the whole timeline.
    fn track_to(&mut self, object: HostHandle, target: HostHandle) -> MetaloopResult<()>;
    /// Drive `object`'s position by traversal of `path`, timed by `eval_time`.
    fn follow_path(
        &mut self,
        object: HostHandle,
        path: HostHandle,
        eval_time: &AnimationCurve,
    ) -> MetaloopResult<()>;

    fn create_emissive_material(
        &mut self,
        material: &EmissiveMaterial,
    ) -> MetaloopResult<HostHandle>;
    fn create_reflective_material(
        &mut self,
        material: &ReflectiveMaterial,
    ) -> MetaloopResult<HostHandle>;
    fn attach_material(&mut self, object: HostHandle, material: HostHandle) -> MetaloopResult<()>;

    fn add_glare(&mut self, glare: &GlareEffect) -> MetaloopResult<()>;
}

impl SceneDescription {
    /// Build this scene on `host`. Stops at the first host error.
    #[tracing::instrument(skip_all, fields(elements = self.centerpiece.elements.len()))]
    pub fn replay<H: SceneHost + ?Sized>(&self, host: &mut H) -> MetaloopResult<()> {
        host.configure_scene(self)?;

        let camera = host.create_camera(&self.camera)?;
        let track = &self.camera.track_to;
        let target = host.create_empty(&track.name, track.location)?;
        host.track_to(camera, target)?;

        let mut curves = Vec::with_capacity(self.centerpiece.paths.len());
        for path in &self.centerpiece.paths {
            let curve = host.create_curve(path)?;
            host.insert_keyframes(curve, &path.rotation)?;
            host.bake_rotation(curve, path.rest_rotation)?;
            host.set_transform(curve, &path.transform)?;
            curves.push(curve);
        }

        // One host material per distinct shared instance.
        let mut materials: Vec<(Arc<ReflectiveMaterial>, HostHandle)> = Vec::new();
        for element in &self.centerpiece.elements {
            let PathId(idx) = element.follow.target;
            let Some(&path) = curves.get(idx) else {
                return Err(crate::MetaloopError::validation(format!(
                    "element references missing path {idx}"
                )));
            };

            let ball = host.create_metaball(element.render_resolution)?;
            host.set_transform(ball, &element.transform)?;
            host.follow_path(ball, path, &element.follow.eval_time)?;

            let material = match materials
                .iter()
                .find(|(m, _)| Arc::ptr_eq(m, &element.material))
            {
                Some(&(_, handle)) => handle,
                None => {
                    let handle = host.create_reflective_material(&element.material)?;
                    materials.push((Arc::clone(&element.material), handle));
                    handle
                }
            };
            host.attach_material(ball, material)?;
        }

        if let Some(ring) = &self.background {
            let obj = host.create_ring(ring)?;
            host.set_transform(obj, &ring.transform)?;
            let material = host.create_emissive_material(&ring.material)?;
            host.attach_material(obj, material)?;
        }

        host.create_area_light(&self.light)?;

        if let Some(glare) = &self.glare {
            host.add_glare(glare)?;
        }

        Ok(())
    }
}

/// One recorded host call.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum HostOp {
    ConfigureScene {
        first_frame: u64,
        last_frame: u64,
        fps: u32,
    },
    CreateCamera {
        handle: HostHandle,
        lens_mm: f64,
    },
    CreateEmpty {
        handle: HostHandle,
        name: String,
    },
    CreateAreaLight {
        handle: HostHandle,
    },
    CreateCurve {
        handle: HostHandle,
        path: PathId,
        duration: u64,
    },
    CreateMetaball {
        handle: HostHandle,
    },
    CreateRing {
        handle: HostHandle,
    },
    SetTransform {
        object: HostHandle,
        transform: Transform,
    },
    BakeRotation {
        object: HostHandle,
        rotation: Vec3,
    },
    InsertKeyframes {
        object: HostHandle,
        channel: Channel,
        keys: Vec<Keyframe>,
        extrapolation: Extrapolation,
    },
    TrackTo {
        object: HostHandle,
        target: HostHandle,
    },
    FollowPath {
        object: HostHandle,
        path: HostHandle,
        duration: u64,
    },
    CreateEmissiveMaterial {
        handle: HostHandle,
        name: String,
    },
    CreateReflectiveMaterial {
        handle: HostHandle,
        name: String,
    },
    AttachMaterial {
        object: HostHandle,
        material: HostHandle,
    },
    AddGlare {
        size: u32,
        threshold: f64,
    },
}

/// Host that only records calls, for tests and script dumps.
#[derive(Debug, Default)]
pub struct RecordingHost {
    next: u64,
    ops: Vec<HostOp>,
}

impl RecordingHost {
    pub fn new() -> Self {
        Self::default()
    }

    /// Recorded calls in order.
    pub fn ops(&self) -> &[HostOp] {
        &self.ops
    }

    pub fn into_ops(self) -> Vec<HostOp> {
        self.ops
    }

    fn issue(&mut self) -> HostHandle {
        self.next += 1;
        HostHandle(self.next)
    }
}

impl SceneHost for RecordingHost {
    fn configure_scene(&mut self, scene: &SceneDescription) -> MetaloopResult<()> {
        self.ops.push(HostOp::ConfigureScene {
            first_frame: scene.frame_start.0,
            last_frame: scene.frame_end.0,
            fps: scene.fps.num,
        });
        Ok(())
    }

    fn create_camera(&mut self, camera: &CameraSpec) -> MetaloopResult<HostHandle> {
        let handle = self.issue();
        self.ops.push(HostOp::CreateCamera {
            handle,
            lens_mm: camera.lens_mm,
        });
        Ok(handle)
    }

    fn create_empty(&mut self, name: &str, _location: Vec3) -> MetaloopResult<HostHandle> {
        let handle = self.issue();
        self.ops.push(HostOp::CreateEmpty {
            handle,
            name: name.to_owned(),
        });
        Ok(handle)
    }

    fn create_area_light(&mut self, _light: &AreaLight) -> MetaloopResult<HostHandle> {
        let handle = self.issue();
        self.ops.push(HostOp::CreateAreaLight { handle });
        Ok(handle)
    }

    fn create_curve(&mut self, path: &PathSpec) -> MetaloopResult<HostHandle> {
        let handle = self.issue();
        self.ops.push(HostOp::CreateCurve {
            handle,
            path: path.id,
            duration: path.duration,
        });
        Ok(handle)
    }

    fn create_metaball(&mut self, _render_resolution: f64) -> MetaloopResult<HostHandle> {
        let handle = self.issue();
        self.ops.push(HostOp::CreateMetaball { handle });
        Ok(handle)
    }

    fn create_ring(&mut self, _ring: &BackgroundRing) -> MetaloopResult<HostHandle> {
        let handle = self.issue();
        self.ops.push(HostOp::CreateRing { handle });
        Ok(handle)
    }

    fn set_transform(&mut self, object: HostHandle, transform: &Transform) -> MetaloopResult<()> {
        self.ops.push(HostOp::SetTransform {
            object,
            transform: *transform,
        });
        Ok(())
    }

    fn bake_rotation(&mut self, object: HostHandle, rotation: Vec3) -> MetaloopResult<()> {
        self.ops.push(HostOp::BakeRotation { object, rotation });
        Ok(())
    }

    fn insert_keyframes(
        &mut self,
        object: HostHandle,
        curve: &AnimationCurve,
    ) -> MetaloopResult<()> {
        self.ops.push(HostOp::InsertKeyframes {
            object,
            channel: curve.channel(),
            keys: curve.keys().to_vec(),
            extrapolation: curve.extrapolation(),
        });
        Ok(())
    }

    fn track_to(&mut self, object: HostHandle, target: HostHandle) -> MetaloopResult<()> {
        self.ops.push(HostOp::TrackTo { object, target });
        Ok(())
    }

    fn follow_path(
        &mut self,
        object: HostHandle,
        path: HostHandle,
        eval_time: &AnimationCurve,
    ) -> MetaloopResult<()> {
        let duration = eval_time.last().frame.0 - eval_time.first().frame.0;
        self.ops.push(HostOp::FollowPath {
            object,
            path,
            duration,
        });
        Ok(())
    }

    fn create_emissive_material(
        &mut self,
        material: &EmissiveMaterial,
    ) -> MetaloopResult<HostHandle> {
        let handle = self.issue();
        self.ops.push(HostOp::CreateEmissiveMaterial {
            handle,
            name: material.name.clone(),
        });
        Ok(handle)
    }

    fn create_reflective_material(
        &mut self,
        material: &ReflectiveMaterial,
    ) -> MetaloopResult<HostHandle> {
        let handle = self.issue();
        self.ops.push(HostOp::CreateReflectiveMaterial {
            handle,
            name: material.name.clone(),
        });
        Ok(handle)
    }

    fn attach_material(&mut self, object: HostHandle, material: HostHandle) -> MetaloopResult<()> {
        self.ops.push(HostOp::AttachMaterial { object, material });
        Ok(())
    }

    fn add_glare(&mut self, glare: &GlareEffect) -> MetaloopResult<()> {
        self.ops.push(HostOp::AddGlare {
            size: glare.size,
            threshold: glare.threshold,
        });
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{config::LoopConfig, scene::composer::generate_scene, seed::Seed};

    fn replayed(cfg: &LoopConfig) -> Vec<HostOp> {
        let scene = generate_scene(Seed(31), cfg).unwrap();
        let mut host = RecordingHost::new();
        scene.replay(&mut host).unwrap();
        host.into_ops()
    }

    #[test]
    fn scene_is_configured_first_and_camera_tracks_target() {
        let ops = replayed(&LoopConfig::default());
        assert_eq!(
            ops[0],
            HostOp::ConfigureScene {
                first_frame: 1,
                last_frame: 360,
                fps: 30
            }
        );
        assert!(matches!(ops[1], HostOp::CreateCamera { lens_mm, .. } if lens_mm == 70.0));
        assert!(matches!(
            &ops[2],
            HostOp::CreateEmpty { name, .. } if name == "empty.tracker-target.camera"
        ));
        assert_eq!(
            ops[3],
            HostOp::TrackTo {
                object: HostHandle(1),
                target: HostHandle(2)
            }
        );
    }

    #[test]
    fn shared_material_is_created_once_and_attached_to_every_ball() {
        let ops = replayed(&LoopConfig::default());
        let reflective: Vec<HostHandle> = ops
            .iter()
            .filter_map(|op| match op {
                HostOp::CreateReflectiveMaterial { handle, .. } => Some(*handle),
                _ => None,
            })
            .collect();
        assert_eq!(reflective.len(), 1);

        let balls: Vec<HostHandle> = ops
            .iter()
            .filter_map(|op| match op {
                HostOp::CreateMetaball { handle } => Some(*handle),
                _ => None,
            })
            .collect();
        assert_eq!(balls.len(), 10);
        for ball in balls {
            assert!(ops.contains(&HostOp::AttachMaterial {
                object: ball,
                material: reflective[0]
            }));
        }
    }

    #[test]
    fn every_ball_follows_a_curve_for_the_whole_loop() {
        let ops = replayed(&LoopConfig::default());
        let curves: Vec<HostHandle> = ops
            .iter()
            .filter_map(|op| match op {
                HostOp::CreateCurve { handle, duration, .. } => {
                    assert_eq!(*duration, 360);
                    Some(*handle)
                }
                _ => None,
            })
            .collect();
        let follows: Vec<_> = ops
            .iter()
            .filter_map(|op| match op {
                HostOp::FollowPath { path, duration, .. } => Some((*path, *duration)),
                _ => None,
            })
            .collect();
        assert_eq!(follows.len(), curves.len());
        for (path, duration) in follows {
            assert!(curves.contains(&path));
            assert_eq!(duration, 360);
        }
    }

    #[test]
    fn optional_parts_are_skipped() {
        let ops = replayed(&LoopConfig {
            include_background: false,
            include_glow: false,
            ..LoopConfig::default()
        });
        assert!(!ops.iter().any(|op| matches!(op, HostOp::CreateRing { .. })));
        assert!(!ops.iter().any(|op| matches!(op, HostOp::AddGlare { .. })));
        assert!(matches!(ops.last(), Some(HostOp::CreateAreaLight { .. })));
    }

    #[test]
    fn glare_is_last_when_enabled() {
        let ops = replayed(&LoopConfig::default());
        assert_eq!(
            ops.last(),
            Some(&HostOp::AddGlare {
                size: 7,
                threshold: 0.2
            })
        );
    }
}
