use std::path::PathBuf;

use crate::{
    color::{LinearRgb, LinearRgba},
    foundation::core::{Fps, FrameIndex, Resolution, Transform, Vec3},
    placement::Centerpiece,
    seed::Seed,
};

/// Everything the host needs to build and render one animation loop.
#[derive(Clone, Debug, serde::Serialize)]
pub struct SceneDescription {
    pub seed: Option<Seed>,
    pub fps: Fps,
    pub total_frames: u64,
    pub frame_start: FrameIndex,
    pub frame_end: FrameIndex,
    pub render: RenderSettings,
    pub world_color: LinearRgba,
    pub camera: CameraSpec,
    pub light: AreaLight,
    pub background: Option<BackgroundRing>,
    pub glare: Option<GlareEffect>,
    pub centerpiece: Centerpiece,
}

impl SceneDescription {
    pub fn to_json_pretty(&self) -> crate::MetaloopResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RenderEngine {
    Cycles,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RenderDevice {
    Gpu,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum OutputFormat {
    /// FFmpeg video, MPEG-4 container.
    FfmpegMpeg4,
}

/// Opaque render configuration forwarded to the host as-is.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct RenderSettings {
    pub engine: RenderEngine,
    pub device: RenderDevice,
    pub samples: u32,
    pub view_look: String,
    pub resolution: Resolution,
    pub output_path: PathBuf,
    pub output_format: OutputFormat,
}

/// Empty object a track-to constraint aims at.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct TrackTarget {
    pub name: String,
    pub location: Vec3,
}

#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct CameraSpec {
    pub transform: Transform,
    pub lens_mm: f64,
    pub passepartout_alpha: f64,
    /// Orientation is driven by this target, not by `transform.rotation`.
    pub track_to: TrackTarget,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LightShape {
    Disk,
}

#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct AreaLight {
    pub location: Vec3,
    pub radius: f64,
    pub energy: f64,
    pub shape: LightShape,
    pub color: LinearRgb,
}

#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct EmissiveMaterial {
    pub name: String,
    pub color: LinearRgba,
    pub strength: f64,
}

/// Thin emissive torus framing the centerpiece.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct BackgroundRing {
    pub transform: Transform,
    pub major_radius: f64,
    pub minor_radius: f64,
    pub material: EmissiveMaterial,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum GlareKind {
    FogGlow,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum GlareQuality {
    High,
}

/// Post-process glow applied between the render layer and the composite output.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct GlareEffect {
    pub kind: GlareKind,
    pub size: u32,
    pub quality: GlareQuality,
    pub threshold: f64,
}
