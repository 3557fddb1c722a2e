//! Headless fixed-rate playback

use anyhow::{Context, Result};
use cadence_animation::{Driver, Transform};
use serde::Serialize;
use tracing::{debug, info};

use crate::script::Script;

/// Transform state captured after a frame
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Sample {
    pub frame: u32,
    pub time: f32,
    pub position: [f32; 3],
    pub scale: [f32; 3],
}

impl Sample {
    fn capture(frame: u32, time: f32, transform: &Transform) -> Self {
        Self {
            frame,
            time,
            position: transform.position.to_array(),
            scale: transform.scale.to_array(),
        }
    }
}

/// Outcome of a full playback
#[derive(Clone, Debug, PartialEq)]
pub struct PlaybackReport {
    pub frames: u32,
    pub elapsed: f32,
    pub final_state: Transform,
}

/// Play `script` to completion at its configured frame rate.
///
/// `emit` receives every `sample_every`-th frame and always the last one.
pub fn play<F>(script: &Script, fps_override: Option<f32>, mut emit: F) -> Result<PlaybackReport>
where
    F: FnMut(&Sample) -> Result<()>,
{
    let fps = fps_override.unwrap_or(script.playback.fps);
    anyhow::ensure!(fps.is_finite() && fps > 0.0, "fps must be > 0 (got {})", fps);
    let dt = 1.0 / fps;

    let target = script.target.to_transform().shared();
    let mut driver = Driver::new();
    let id = script.build(&target)?.start(&mut driver)?;
    info!(fps, steps = script.steps.len(), "playback started");

    let mut frame = 0;
    let mut elapsed = 0.0;
    let mut last_emitted = None;

    while driver.get(id).is_some_and(|s| !s.is_finished()) {
        if frame >= script.playback.max_frames {
            anyhow::bail!(
                "sequence still running after {} frames",
                script.playback.max_frames
            );
        }

        if let Some((_, err)) = driver.tick(dt).into_iter().next() {
            return Err(err).with_context(|| format!("frame {}", frame + 1));
        }
        frame += 1;
        elapsed += dt;

        if frame % script.playback.sample_every == 0 {
            emit(&Sample::capture(frame, elapsed, &target.borrow()))?;
            last_emitted = Some(frame);
        }
    }

    let final_state = *target.borrow();
    if last_emitted != Some(frame) {
        emit(&Sample::capture(frame, elapsed, &final_state))?;
    }

    // Lets the driver drop the finished sequence
    driver.tick(dt);
    debug!(remaining = driver.len(), "driver drained");

    Ok(PlaybackReport {
        frames: frame,
        elapsed,
        final_state,
    })
}
