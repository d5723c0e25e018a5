use rayon::prelude::*;

use crate::{
    color::{hex_to_linear_rgba, random_palette_color},
    config::LoopConfig,
    foundation::{
        core::{FrameIndex, Resolution, Transform, Vec3},
        error::MetaloopResult,
    },
    placement::plan_centerpiece,
    scene::model::{
        AreaLight, BackgroundRing, CameraSpec, EmissiveMaterial, GlareEffect, GlareKind,
        GlareQuality, LightShape, OutputFormat, RenderDevice, RenderEngine, RenderSettings,
        SceneDescription, TrackTarget,
    },
    seed::{SceneRng, Seed},
};

const CAMERA_LOCATION: Vec3 = Vec3::new(0.0, 0.0, 7.0);
const LIGHT_LOCATION: Vec3 = Vec3::new(0.0, 0.0, 2.0);
const BACKGROUND_LOCATION: Vec3 = Vec3::new(0.0, 0.0, -2.0);
const WORLD_COLOR: &str = "#000000";

/// Compose one loop from an already-seeded generator.
///
/// Draw order is fixed (light, background, centerpiece) so the same generator state always yields
/// the same scene. The returned description has no seed attached; see [`generate_scene`].
#[tracing::instrument(skip(rng, config), fields(fps = config.fps, seconds = config.loop_seconds))]
pub fn compose_scene(rng: &mut SceneRng, config: &LoopConfig) -> MetaloopResult<SceneDescription> {
    config.validate()?;
    let fps = config.fps_value()?;
    let total_frames = config.total_frames();

    let camera = camera();
    let light = area_light(rng)?;
    let background = if config.include_background {
        Some(background_ring(rng)?)
    } else {
        None
    };
    let glare = config.include_glow.then(fog_glow);
    let centerpiece = plan_centerpiece(rng, total_frames, config.metaball_count)?;

    tracing::debug!(
        total_frames,
        elements = centerpiece.elements.len(),
        "composed scene"
    );

    Ok(SceneDescription {
        seed: None,
        fps,
        total_frames,
        frame_start: FrameIndex::FIRST,
        frame_end: FrameIndex(total_frames),
        render: render_settings(config),
        world_color: hex_to_linear_rgba(WORLD_COLOR, 1.0)?,
        camera,
        light,
        background,
        glare,
        centerpiece,
    })
}

/// [`compose_scene`] with default settings at the given timing.
pub fn compose_timed_scene(
    rng: &mut SceneRng,
    fps: u32,
    loop_seconds: u32,
) -> MetaloopResult<SceneDescription> {
    let config = LoopConfig {
        fps,
        loop_seconds,
        ..LoopConfig::default()
    };
    compose_scene(rng, &config)
}

/// Seed a fresh generator from `seed` and compose, recording the seed in the output.
#[tracing::instrument(skip_all, fields(%seed))]
pub fn generate_scene(seed: Seed, config: &LoopConfig) -> MetaloopResult<SceneDescription> {
    let mut rng = seed.rng();
    let mut scene = compose_scene(&mut rng, config)?;
    scene.seed = Some(seed);
    Ok(scene)
}

/// `count` loops; loop `i` uses `base_seed + i` and `loop_index = i`.
///
/// Each loop owns its generator, so the parallel result equals sequential generation.
pub fn generate_batch(
    base_seed: Seed,
    config: &LoopConfig,
    count: u32,
) -> MetaloopResult<Vec<SceneDescription>> {
    (0..count)
        .into_par_iter()
        .map(|i| {
            let cfg = LoopConfig {
                loop_index: i,
                ..config.clone()
            };
            generate_scene(base_seed.offset(u64::from(i)), &cfg)
        })
        .collect()
}

fn camera() -> CameraSpec {
    CameraSpec {
        transform: Transform::at(CAMERA_LOCATION),
        lens_mm: 70.0,
        passepartout_alpha: 0.9,
        track_to: TrackTarget {
            name: "empty.tracker-target.camera".to_owned(),
            location: Vec3::ZERO,
        },
    }
}

fn area_light(rng: &mut SceneRng) -> MetaloopResult<AreaLight> {
    Ok(AreaLight {
        location: LIGHT_LOCATION,
        radius: 1.0,
        energy: 100.0,
        shape: LightShape::Disk,
        color: random_palette_color(rng)?.rgb(),
    })
}

fn background_ring(rng: &mut SceneRng) -> MetaloopResult<BackgroundRing> {
    Ok(BackgroundRing {
        transform: Transform::at(BACKGROUND_LOCATION),
        major_radius: 3.0,
        minor_radius: 0.02,
        material: EmissiveMaterial {
            name: "material.emission.background".to_owned(),
            color: random_palette_color(rng)?,
            strength: 30.0,
        },
    })
}

fn fog_glow() -> GlareEffect {
    GlareEffect {
        kind: GlareKind::FogGlow,
        size: 7,
        quality: GlareQuality::High,
        threshold: 0.2,
    }
}

fn render_settings(config: &LoopConfig) -> RenderSettings {
    RenderSettings {
        engine: RenderEngine::Cycles,
        device: RenderDevice::Gpu,
        samples: 1024,
        view_look: "AgX - Very High Contrast".to_owned(),
        resolution: Resolution::square(1080),
        output_path: config.output_path(),
        output_format: OutputFormat::FfmpegMpeg4,
    }
}
