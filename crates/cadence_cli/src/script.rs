//! Animation script handling
//!
//! A script is a TOML file describing a target transform, playback settings
//! and the steps of one sequence.

use anyhow::{Context, Result};
use cadence_animation::{
    Easing, FinishPolicy, Group, Sequence, SharedTransform, Step, Transform, Tween, Wait,
};
use glam::Vec3;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Top-level script (e.g. `bounce.toml`)
#[derive(Debug, Deserialize, Serialize)]
pub struct Script {
    #[serde(default)]
    pub playback: PlaybackConfig,
    #[serde(default)]
    pub target: TargetConfig,
    pub steps: Vec<StepConfig>,
}

/// Fixed-rate playback settings
#[derive(Debug, Deserialize, Serialize)]
pub struct PlaybackConfig {
    /// Frames per second used to derive the per-frame delta
    #[serde(default = "default_fps")]
    pub fps: f32,
    /// Abort if the sequence is still running after this many frames
    #[serde(default = "default_max_frames")]
    pub max_frames: u32,
    /// Emit one sample every N frames
    #[serde(default = "default_sample_every")]
    pub sample_every: u32,
}

fn default_fps() -> f32 {
    60.0
}

fn default_max_frames() -> u32 {
    100_000
}

fn default_sample_every() -> u32 {
    1
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        Self {
            fps: default_fps(),
            max_frames: default_max_frames(),
            sample_every: default_sample_every(),
        }
    }
}

/// Initial state of the animated transform
#[derive(Debug, Deserialize, Serialize)]
pub struct TargetConfig {
    #[serde(default)]
    pub position: [f32; 3],
    #[serde(default = "default_scale")]
    pub scale: [f32; 3],
}

fn default_scale() -> [f32; 3] {
    [1.0; 3]
}

impl Default for TargetConfig {
    fn default() -> Self {
        Self {
            position: [0.0; 3],
            scale: default_scale(),
        }
    }
}

impl TargetConfig {
    pub fn to_transform(&self) -> Transform {
        Transform::new(Vec3::from_array(self.position), Vec3::from_array(self.scale))
    }
}

/// One step of the sequence, tagged by `kind`
#[derive(Debug, Deserialize, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum StepConfig {
    MoveTo {
        to: [f32; 3],
        duration: f32,
        #[serde(default = "default_easing")]
        easing: String,
    },
    ScaleTo {
        to: [f32; 3],
        duration: f32,
        #[serde(default = "default_easing")]
        easing: String,
    },
    Wait {
        duration: f32,
    },
    Group {
        #[serde(default = "default_policy")]
        policy: String,
        steps: Vec<StepConfig>,
    },
}

fn default_easing() -> String {
    "linear".to_string()
}

fn default_policy() -> String {
    "all".to_string()
}

impl StepConfig {
    /// Build the runtime step animating `target`
    pub fn build(&self, target: &SharedTransform) -> Result<Box<dyn Step>> {
        let step: Box<dyn Step> = match self {
            StepConfig::MoveTo {
                to,
                duration,
                easing,
            } => Box::new(Tween::move_to(
                target,
                Vec3::from_array(*to),
                *duration,
                easing.parse::<Easing>()?,
            )?),
            StepConfig::ScaleTo {
                to,
                duration,
                easing,
            } => Box::new(Tween::scale_to(
                target,
                Vec3::from_array(*to),
                *duration,
                easing.parse::<Easing>()?,
            )?),
            StepConfig::Wait { duration } => Box::new(Wait::new(*duration)?),
            StepConfig::Group { policy, steps } => {
                let mut group = Group::new(policy.parse::<FinishPolicy>()?);
                for (i, child) in steps.iter().enumerate() {
                    let child = child
                        .build(target)
                        .with_context(|| format!("group child {}", i))?;
                    group.push(child);
                }
                anyhow::ensure!(!group.is_empty(), "group has no steps");
                Box::new(group)
            }
        };
        Ok(step)
    }
}

impl Script {
    /// Load a script from a TOML file
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            anyhow::bail!(
                "No script found at {}. Run `cadence init {}` to create one.",
                path.display(),
                path.display()
            );
        }

        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;

        Self::from_toml(&content).with_context(|| format!("Failed to parse {}", path.display()))
    }

    /// Parse and validate a script from TOML text
    pub fn from_toml(content: &str) -> Result<Self> {
        let script: Script = toml::from_str(content)?;
        script.validate()?;
        Ok(script)
    }

    fn validate(&self) -> Result<()> {
        anyhow::ensure!(
            self.playback.fps.is_finite() && self.playback.fps > 0.0,
            "playback.fps must be > 0 (got {})",
            self.playback.fps
        );
        anyhow::ensure!(
            self.playback.sample_every > 0,
            "playback.sample_every must be at least 1"
        );
        anyhow::ensure!(!self.steps.is_empty(), "script has no steps");
        Ok(())
    }

    /// Build the sequence for `target`, validating every step
    pub fn build(&self, target: &SharedTransform) -> Result<Sequence> {
        let mut sequence = Sequence::new(target);
        for (i, step) in self.steps.iter().enumerate() {
            let step = step
                .build(target)
                .with_context(|| format!("step {}", i))?;
            sequence.push(step);
        }
        Ok(sequence)
    }
}

/// Script written by `cadence init`
pub const SAMPLE_SCRIPT: &str = r#"# Cadence animation script

[playback]
fps = 60.0
sample_every = 6

[target]
position = [0.0, 0.0, 0.0]
scale = [1.0, 1.0, 1.0]

[[steps]]
kind = "move_to"
to = [0.0, 2.0, 0.0]
duration = 0.5
easing = "ease_out_cubic"

[[steps]]
kind = "wait"
duration = 0.25

[[steps]]
kind = "group"
policy = "all"
steps = [
    { kind = "move_to", to = [0.0, 0.0, 0.0], duration = 0.75, easing = "ease_out_bounce" },
    { kind = "scale_to", to = [1.5, 0.5, 1.0], duration = 0.25, easing = "ease_out_back" },
]

[[steps]]
kind = "scale_to"
to = [1.0, 1.0, 1.0]
duration = 0.3
easing = "ease_in_out_sine"
"#;
