use std::path::{Path, PathBuf};

use anyhow::Context as _;

use crate::{
    foundation::{
        core::Fps,
        error::{MetaloopError, MetaloopResult},
    },
    placement::{DEFAULT_METABALL_COUNT, MAX_METABALL_COUNT},
    seed::Seed,
};

/// Generation settings. Every field has a default, so a config file only lists overrides.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LoopConfig {
    pub fps: u32,
    pub loop_seconds: u32,
    pub metaball_count: usize,
    pub include_background: bool,
    pub include_glow: bool,
    pub project_name: String,
    /// Number of this loop within a project; used in the output file name.
    pub loop_index: u32,
    pub output_root: PathBuf,
    /// Fixed seed; `None` seeds from the clock.
    pub seed: Option<Seed>,
}

impl Default for LoopConfig {
    fn default() -> Self {
        Self {
            fps: 30,
            loop_seconds: 12,
            metaball_count: DEFAULT_METABALL_COUNT,
            include_background: true,
            include_glow: true,
            project_name: "ProjecT".to_owned(),
            loop_index: 0,
            output_root: PathBuf::from("/tmp"),
            seed: None,
        }
    }
}

impl LoopConfig {
    pub fn from_json_str(s: &str) -> MetaloopResult<Self> {
        let cfg: Self = serde_json::from_str(s)?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn load(path: &Path) -> MetaloopResult<Self> {
        let s = std::fs::read_to_string(path)
            .with_context(|| format!("read config '{}'", path.display()))?;
        Self::from_json_str(&s)
    }

    pub fn validate(&self) -> MetaloopResult<()> {
        self.fps_value()?;
        if self.loop_seconds == 0 {
            return Err(MetaloopError::validation("loop_seconds must be > 0"));
        }
        if self.total_frames() < 2 {
            return Err(MetaloopError::validation(
                "loop must span at least two frames",
            ));
        }
        if self.metaball_count == 0 {
            return Err(MetaloopError::validation("metaball_count must be > 0"));
        }
        if self.metaball_count > MAX_METABALL_COUNT {
            return Err(MetaloopError::validation(format!(
                "metaball_count must be <= {MAX_METABALL_COUNT}"
            )));
        }
        if self.project_name.trim().is_empty() {
            return Err(MetaloopError::validation("project_name must be non-empty"));
        }
        Ok(())
    }

    pub fn fps_value(&self) -> MetaloopResult<Fps> {
        Fps::whole(self.fps)
    }

    pub fn total_frames(&self) -> u64 {
        u64::from(self.fps) * u64::from(self.loop_seconds)
    }

    /// `{output_root}/project_{project_name}/loop_{loop_index}.mp4`
    pub fn output_path(&self) -> PathBuf {
        self.output_root
            .join(format!("project_{}", self.project_name))
            .join(format!("loop_{}.mp4", self.loop_index))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_describe_a_twelve_second_loop() {
        let cfg = LoopConfig::default();
        cfg.validate().unwrap();
        assert_eq!(cfg.total_frames(), 360);
        assert_eq!(
            cfg.output_path(),
            PathBuf::from("/tmp/project_ProjecT/loop_0.mp4")
        );
    }

    #[test]
    fn partial_json_keeps_defaults() {
        let cfg = LoopConfig::from_json_str(r#"{ "fps": 24, "seed": 99 }"#).unwrap();
        assert_eq!(cfg.fps, 24);
        assert_eq!(cfg.seed, Some(Seed(99)));
        assert_eq!(cfg.loop_seconds, 12);
        assert!(cfg.include_glow);
    }

    #[test]
    fn rejects_unknown_fields_and_bad_values() {
        assert!(matches!(
            LoopConfig::from_json_str(r#"{ "fsp": 24 }"#),
            Err(MetaloopError::Serde(_))
        ));
        assert!(LoopConfig::from_json_str(r#"{ "fps": 0 }"#).is_err());
        assert!(LoopConfig::from_json_str(r#"{ "loop_seconds": 0 }"#).is_err());
        assert!(LoopConfig::from_json_str(r#"{ "metaball_count": 0 }"#).is_err());
        assert!(LoopConfig::from_json_str(r#"{ "project_name": " " }"#).is_err());
    }

    #[test]
    fn oversized_metaball_count_is_rejected() {
        let cfg = LoopConfig {
            metaball_count: usize::MAX,
            ..LoopConfig::default()
        };
        assert!(matches!(cfg.validate(), Err(MetaloopError::Validation(_))));

        let json = format!(r#"{{ "metaball_count": {} }}"#, MAX_METABALL_COUNT + 1);
        assert!(LoopConfig::from_json_str(&json).is_err());
        let json = format!(r#"{{ "metaball_count": {MAX_METABALL_COUNT} }}"#);
        assert!(LoopConfig::from_json_str(&json).is_ok());
    }

    #[test]
    fn one_frame_loop_is_rejected() {
        let cfg = LoopConfig {
            fps: 1,
            loop_seconds: 1,
            ..LoopConfig::default()
        };
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn missing_file_reports_path() {
        let err = LoopConfig::load(Path::new("/definitely/not/here.json")).unwrap_err();
        assert!(err.to_string().contains("/definitely/not/here.json"));
    }
}
