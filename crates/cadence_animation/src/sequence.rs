//! Sequences of steps
//!
//! A sequence runs its steps one at a time. When a step finishes partway
//! through a frame, the unused part of that frame is kept as spare time and
//! added to the next step's first update. Chained steps therefore add up to
//! their exact combined duration no matter how the frames are sliced.
//!
//! # Example
//!
//! ```
//! use cadence_animation::{Driver, Easing, Sequence, Transform};
//! use glam::Vec3;
//!
//! # fn main() -> cadence_animation::Result<()> {
//! let mut driver = Driver::new();
//! let target = Transform::default().shared();
//!
//! Sequence::with(&target)
//!     .move_to(Vec3::new(0.0, 2.0, 0.0), 0.5, Easing::EaseOutCubic)?
//!     .wait(0.25)?
//!     .scale_to(Vec3::splat(2.0), 0.5, Easing::EaseOutBack)?
//!     .start(&mut driver)?;
//!
//! // Once per frame
//! driver.tick(1.0 / 60.0);
//! # Ok(())
//! # }
//! ```

use glam::Vec3;
use tracing::{debug, trace};

use crate::driver::{Driver, SequenceId};
use crate::easing::Easing;
use crate::error::{AnimationError, Result};
use crate::group::{FinishPolicy, Group};
use crate::interpolate::Interpolate;
use crate::property::{Property, SharedTransform, TransformProperty};
use crate::step::{Step, Tween, Wait};

/// An ordered chain of steps bound to a target transform
pub struct Sequence {
    target: SharedTransform,
    steps: Vec<Box<dyn Step>>,
    index: usize,
    /// Index of the step whose `start()` has run for this activation
    active: Option<usize>,
    spare_time: f32,
    finished: bool,
}

impl Sequence {
    pub fn new(target: &SharedTransform) -> Self {
        Self {
            target: SharedTransform::clone(target),
            steps: Vec::new(),
            index: 0,
            active: None,
            spare_time: 0.0,
            finished: false,
        }
    }

    /// Alias for [`Sequence::new`]
    pub fn with(target: &SharedTransform) -> Self {
        Self::new(target)
    }

    // ========================================================================
    // Builder
    // ========================================================================

    /// Move the bound transform's position to `to`
    pub fn move_to(self, to: Vec3, duration: f32, easing: Easing) -> Result<Self> {
        let property = TransformProperty::position(&self.target);
        self.value_to(property, to, duration, easing)
    }

    /// Scale the bound transform to `to`
    pub fn scale_to(self, to: Vec3, duration: f32, easing: Easing) -> Result<Self> {
        let property = TransformProperty::scale(&self.target);
        self.value_to(property, to, duration, easing)
    }

    /// Tween any property towards `to`
    pub fn value_to<T, P>(self, property: P, to: T, duration: f32, easing: Easing) -> Result<Self>
    where
        T: Interpolate + 'static,
        P: Property<T> + 'static,
    {
        let tween = Tween::new(property, to, duration, easing)?;
        Ok(self.add_step(tween))
    }

    /// Do nothing for `duration` seconds
    pub fn wait(self, duration: f32) -> Result<Self> {
        let wait = Wait::new(duration)?;
        Ok(self.add_step(wait))
    }

    /// Run the steps added by `build` concurrently under `policy`
    pub fn group<F>(self, policy: FinishPolicy, build: F) -> Result<Self>
    where
        F: FnOnce(Group, &SharedTransform) -> Result<Group>,
    {
        let group = build(Group::new(policy), &self.target)?;
        if group.is_empty() {
            return Err(AnimationError::EmptyGroup);
        }
        Ok(self.add_step(group))
    }

    pub fn add_step<S: Step + 'static>(mut self, step: S) -> Self {
        self.push(Box::new(step));
        self
    }

    /// Append an already boxed step
    pub fn push(&mut self, step: Box<dyn Step>) {
        self.steps.push(step);
    }

    // ========================================================================
    // Playback
    // ========================================================================

    /// Rewind to the first step and register with `driver`.
    pub fn start(mut self, driver: &mut Driver) -> Result<SequenceId> {
        self.reset()?;
        Ok(driver.register(self))
    }

    /// Rewind to the first step without registering anywhere.
    ///
    /// Every step is stopped, including one interrupted halfway, and steps
    /// are restarted lazily as the sequence reaches them.
    pub fn reset(&mut self) -> Result<()> {
        if self.steps.is_empty() {
            return Err(AnimationError::EmptySequence);
        }
        for step in self.steps.iter_mut() {
            step.stop();
        }
        self.index = 0;
        self.active = None;
        self.spare_time = 0.0;
        self.finished = false;
        debug!(steps = self.steps.len(), "sequence reset");
        Ok(())
    }

    /// Advance by one frame of `dt` seconds.
    ///
    /// When a step finishes with part of the frame left over, the following
    /// steps are started and fed the remainder within this same call, until
    /// the time is used up or the last step finishes. A step that finished
    /// exactly on a frame boundary is moved past on the next call.
    pub fn update(&mut self, dt: f32) -> Result<()> {
        if self.finished {
            return Err(AnimationError::AlreadyFinished);
        }
        if self.steps.is_empty() {
            return Err(AnimationError::EmptySequence);
        }

        self.activate_current()?;

        if self.steps[self.index].is_finished()? {
            self.index += 1;
            if self.index >= self.steps.len() {
                self.finish();
                return Ok(());
            }
            trace!(index = self.index, spare = self.spare_time, "advancing");
            self.activate_current()?;
        }

        let mut budget = self.spare_time + dt.max(0.0);
        loop {
            let is_last = self.index + 1 == self.steps.len();
            let current = &mut self.steps[self.index];
            self.spare_time = current.update(budget)?;

            if !current.is_finished()? {
                return Ok(());
            }
            if is_last {
                self.finish();
                return Ok(());
            }
            if self.spare_time <= 0.0 {
                return Ok(());
            }

            budget = std::mem::take(&mut self.spare_time);
            self.index += 1;
            trace!(index = self.index, spare = budget, "rolling over");
            self.activate_current()?;
        }
    }

    fn activate_current(&mut self) -> Result<()> {
        if self.active != Some(self.index) {
            self.steps[self.index].start()?;
            self.active = Some(self.index);
        }
        Ok(())
    }

    fn finish(&mut self) {
        self.finished = true;
        self.index = self.steps.len() - 1;
        debug!(spare = self.spare_time, "sequence finished");
    }

    // ========================================================================
    // Queries
    // ========================================================================

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// Index of the step currently running
    pub fn current_index(&self) -> usize {
        self.index
    }

    /// Time left over by the last finished step, not yet given to a step
    pub fn spare_time(&self) -> f32 {
        self.spare_time
    }

    /// Sum of the nominal durations of all steps
    pub fn duration(&self) -> f32 {
        self.steps.iter().map(|s| s.duration()).sum()
    }

    pub fn target(&self) -> &SharedTransform {
        &self.target
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::property::{CellProperty, Transform};
    use std::cell::Cell;
    use std::rc::Rc;

    fn target() -> SharedTransform {
        Transform::default().shared()
    }

    #[test]
    fn test_builder_appends_steps() {
        let t = target();
        let seq = Sequence::with(&t)
            .move_to(Vec3::X, 1.0, Easing::Linear)
            .unwrap()
            .wait(0.5)
            .unwrap()
            .scale_to(Vec3::splat(2.0), 0.25, Easing::EaseOut)
            .unwrap();

        assert_eq!(seq.len(), 3);
        assert_eq!(seq.duration(), 1.75);
        assert!(!seq.is_finished());
    }

    #[test]
    fn test_builder_rejects_bad_duration() {
        let t = target();
        assert_eq!(
            Sequence::new(&t).wait(0.0).err(),
            Some(AnimationError::InvalidDuration(0.0))
        );
        assert_eq!(
            Sequence::new(&t)
                .move_to(Vec3::ONE, -1.0, Easing::Linear)
                .err(),
            Some(AnimationError::InvalidDuration(-1.0))
        );
    }

    #[test]
    fn test_empty_sequence_errors() {
        let t = target();
        let mut seq = Sequence::new(&t);
        assert_eq!(seq.reset(), Err(AnimationError::EmptySequence));
        assert_eq!(seq.update(0.1), Err(AnimationError::EmptySequence));

        let mut driver = Driver::new();
        assert_eq!(
            Sequence::new(&t).start(&mut driver).err(),
            Some(AnimationError::EmptySequence)
        );
        assert!(driver.is_empty());
    }

    #[test]
    fn test_spare_time_feeds_next_step() {
        let t = target();
        let mut seq = Sequence::new(&t)
            .wait(1.0)
            .unwrap()
            .move_to(Vec3::new(8.0, 0.0, 0.0), 2.0, Easing::Linear)
            .unwrap();
        seq.reset().unwrap();

        // Wait finishes with 0.5 left over, which the tween gets right away
        seq.update(1.5).unwrap();
        assert_eq!(seq.current_index(), 1);
        assert_eq!(seq.spare_time(), 0.0);
        assert_eq!(t.borrow().position, Vec3::new(2.0, 0.0, 0.0));

        seq.update(0.5).unwrap();
        assert_eq!(t.borrow().position, Vec3::new(4.0, 0.0, 0.0));
    }

    #[test]
    fn test_boundary_frame_moves_on_next_update() {
        let t = target();
        let mut seq = Sequence::new(&t)
            .wait(1.0)
            .unwrap()
            .move_to(Vec3::new(8.0, 0.0, 0.0), 2.0, Easing::Linear)
            .unwrap();
        seq.reset().unwrap();

        seq.update(1.0).unwrap();
        assert_eq!(seq.current_index(), 0);
        assert_eq!(t.borrow().position, Vec3::ZERO);

        seq.update(1.0).unwrap();
        assert_eq!(seq.current_index(), 1);
        assert_eq!(t.borrow().position, Vec3::new(4.0, 0.0, 0.0));
    }

    #[test]
    fn test_one_frame_crosses_every_step() {
        let t = target();
        let mut seq = Sequence::new(&t)
            .wait(1.0)
            .unwrap()
            .wait(1.0)
            .unwrap();

        seq.reset().unwrap();
        seq.update(2.0).unwrap();
        assert!(seq.is_finished());
        assert_eq!(seq.spare_time(), 0.0);

        seq.reset().unwrap();
        seq.update(0.5).unwrap();
        seq.update(1.5).unwrap();
        assert!(seq.is_finished());
        assert_eq!(seq.current_index(), 1);
    }

    #[test]
    fn test_last_step_finishes_sequence() {
        let t = target();
        let mut seq = Sequence::new(&t)
            .move_to(Vec3::new(2.0, 0.0, 0.0), 1.0, Easing::Linear)
            .unwrap();
        seq.reset().unwrap();

        seq.update(0.5).unwrap();
        assert!(!seq.is_finished());
        seq.update(0.75).unwrap();
        assert!(seq.is_finished());
        assert_eq!(seq.spare_time(), 0.25);
        assert_eq!(t.borrow().position, Vec3::new(2.0, 0.0, 0.0));
    }

    #[test]
    fn test_update_after_finish_fails() {
        let t = target();
        let mut seq = Sequence::new(&t).wait(0.5).unwrap();
        seq.reset().unwrap();
        seq.update(1.0).unwrap();
        assert!(seq.is_finished());
        assert_eq!(seq.update(0.1), Err(AnimationError::AlreadyFinished));
    }

    #[test]
    fn test_reset_restarts_from_scratch() {
        let t = target();
        let value = Rc::new(Cell::new(0.0f32));
        let mut seq = Sequence::new(&t)
            .value_to(CellProperty::new(&value), 1.0, 1.0, Easing::Linear)
            .unwrap();

        seq.reset().unwrap();
        seq.update(1.0).unwrap();
        assert!(seq.is_finished());
        assert_eq!(value.get(), 1.0);

        // Second run starts from the current value
        value.set(3.0);
        seq.reset().unwrap();
        seq.update(0.5).unwrap();
        assert_eq!(value.get(), 2.0);
        assert!(!seq.is_finished());
    }

    #[test]
    fn test_group_step_inside_sequence() {
        let t = target();
        let mut seq = Sequence::new(&t)
            .group(FinishPolicy::All, |group, target| {
                Ok(group
                    .add_step(Tween::move_to(target, Vec3::X, 1.0, Easing::Linear)?)
                    .add_step(Tween::scale_to(target, Vec3::splat(3.0), 2.0, Easing::Linear)?))
            })
            .unwrap()
            .wait(1.0)
            .unwrap();
        assert_eq!(seq.duration(), 3.0);
        seq.reset().unwrap();

        seq.update(1.0).unwrap();
        assert_eq!(t.borrow().position, Vec3::X);
        assert_eq!(t.borrow().scale, Vec3::splat(2.0));

        // Group hands back no spare time even though it overshoots
        seq.update(1.5).unwrap();
        assert_eq!(seq.current_index(), 0);
        assert_eq!(seq.spare_time(), 0.0);
        assert_eq!(t.borrow().scale, Vec3::splat(3.0));

        seq.update(0.5).unwrap();
        assert_eq!(seq.current_index(), 1);
        assert!(!seq.is_finished());
        seq.update(0.5).unwrap();
        assert!(seq.is_finished());
    }

    #[test]
    fn test_reset_during_group_restarts_cleanly() {
        let t = target();
        let mut seq = Sequence::new(&t)
            .group(FinishPolicy::All, |group, target| {
                Ok(group.add_step(Tween::move_to(target, Vec3::X, 1.0, Easing::Linear)?))
            })
            .unwrap();
        seq.reset().unwrap();
        seq.update(0.5).unwrap();

        seq.reset().unwrap();
        seq.update(0.5).unwrap();
        assert!(!seq.is_finished());
        seq.update(0.5).unwrap();
        assert!(seq.is_finished());
        assert_eq!(t.borrow().position, Vec3::X);
    }

    #[test]
    fn test_empty_group_is_rejected() {
        let t = target();
        assert_eq!(
            Sequence::new(&t).group(FinishPolicy::Any, |g, _| Ok(g)).err(),
            Some(AnimationError::EmptyGroup)
        );
    }
}
