//! Steps: the atomic units of a sequence
//!
//! A step is started once per activation, then fed elapsed time until it
//! reports finished. `update` consumes at most the time the step still needs
//! and hands back the rest, which lets a [`Sequence`](crate::Sequence) carry
//! the remainder into the next step.

use glam::Vec3;

use crate::easing::Easing;
use crate::error::{check_duration, AnimationError, Result};
use crate::interpolate::Interpolate;
use crate::property::{Property, SharedTransform, TransformProperty};

/// Start/update/finish contract shared by every animatable unit
pub trait Step {
    /// Capture initial state and rewind the step's clock.
    fn start(&mut self) -> Result<()>;

    /// Advance by `dt` seconds, returning the part of `dt` not needed to
    /// reach the end of the step.
    fn update(&mut self, dt: f32) -> Result<f32>;

    fn is_finished(&self) -> Result<bool>;

    /// Nominal duration in seconds
    fn duration(&self) -> f32;

    /// Drop back to the never-started state.
    ///
    /// Called when an owning sequence rewinds, so a step interrupted halfway
    /// can be started again.
    fn stop(&mut self) {}
}

impl<S: Step + ?Sized> Step for Box<S> {
    fn start(&mut self) -> Result<()> {
        (**self).start()
    }

    fn update(&mut self, dt: f32) -> Result<f32> {
        (**self).update(dt)
    }

    fn is_finished(&self) -> Result<bool> {
        (**self).is_finished()
    }

    fn duration(&self) -> f32 {
        (**self).duration()
    }

    fn stop(&mut self) {
        (**self).stop()
    }
}

/// Running time of a timed step, capped at its duration
#[derive(Clone, Copy, Debug)]
struct StepClock {
    duration: f32,
    elapsed: f32,
}

impl StepClock {
    fn new(duration: f32) -> Result<Self> {
        Ok(Self {
            duration: check_duration(duration)?,
            elapsed: 0.0,
        })
    }

    fn rewind(&mut self) {
        self.elapsed = 0.0;
    }

    /// Consume up to the remaining time and return the excess
    fn advance(&mut self, dt: f32) -> f32 {
        // Negative or NaN deltas never move the clock backwards
        let dt = dt.max(0.0);
        let remaining = (self.duration - self.elapsed).max(0.0);
        if dt >= remaining {
            // Snap so rounding can never leave a sliver of the step unplayed
            self.elapsed = self.duration;
            dt - remaining
        } else {
            self.elapsed += dt;
            0.0
        }
    }

    fn progress(&self) -> f32 {
        self.elapsed / self.duration
    }

    fn is_finished(&self) -> bool {
        self.elapsed >= self.duration
    }
}

/// A step that only lets time pass
#[derive(Clone, Debug)]
pub struct Wait {
    clock: StepClock,
    started: bool,
}

impl Wait {
    pub fn new(duration: f32) -> Result<Self> {
        Ok(Self {
            clock: StepClock::new(duration)?,
            started: false,
        })
    }

    /// Time consumed since the last `start()`
    pub fn elapsed(&self) -> f32 {
        self.clock.elapsed
    }
}

impl Step for Wait {
    fn start(&mut self) -> Result<()> {
        self.clock.rewind();
        self.started = true;
        Ok(())
    }

    fn update(&mut self, dt: f32) -> Result<f32> {
        if !self.started {
            return Err(AnimationError::NotStarted);
        }
        Ok(self.clock.advance(dt))
    }

    fn is_finished(&self) -> Result<bool> {
        Ok(self.clock.is_finished())
    }

    fn duration(&self) -> f32 {
        self.clock.duration
    }

    fn stop(&mut self) {
        self.clock.rewind();
        self.started = false;
    }
}

/// Eased interpolation of a property towards a target value
///
/// The starting value is read from the property on `start()`, so the same
/// tween animates from wherever the value happens to be when it activates.
pub struct Tween<T, P> {
    property: P,
    to: T,
    from: Option<T>,
    easing: Easing,
    clock: StepClock,
}

/// Tween over one channel of a shared transform
pub type TransformTween = Tween<Vec3, TransformProperty>;

impl<T, P> Tween<T, P>
where
    T: Interpolate,
    P: Property<T>,
{
    pub fn new(property: P, to: T, duration: f32, easing: Easing) -> Result<Self> {
        Ok(Self {
            property,
            to,
            from: None,
            easing,
            clock: StepClock::new(duration)?,
        })
    }

    pub fn target(&self) -> T {
        self.to
    }

    /// Value captured by the last `start()`, if any
    pub fn from(&self) -> Option<T> {
        self.from
    }

    pub fn easing(&self) -> Easing {
        self.easing
    }

    /// Time consumed since the last `start()`
    pub fn elapsed(&self) -> f32 {
        self.clock.elapsed
    }
}

impl Tween<Vec3, TransformProperty> {
    /// Move the transform's position to `to`
    pub fn move_to(
        target: &SharedTransform,
        to: Vec3,
        duration: f32,
        easing: Easing,
    ) -> Result<Self> {
        Self::new(TransformProperty::position(target), to, duration, easing)
    }

    /// Scale the transform to `to`
    pub fn scale_to(
        target: &SharedTransform,
        to: Vec3,
        duration: f32,
        easing: Easing,
    ) -> Result<Self> {
        Self::new(TransformProperty::scale(target), to, duration, easing)
    }
}

impl<T, P> Step for Tween<T, P>
where
    T: Interpolate,
    P: Property<T>,
{
    fn start(&mut self) -> Result<()> {
        self.clock.rewind();
        self.from = Some(self.property.get());
        Ok(())
    }

    fn update(&mut self, dt: f32) -> Result<f32> {
        let from = self.from.ok_or(AnimationError::NotStarted)?;
        let excess = self.clock.advance(dt);
        let weight = self.easing.apply(self.clock.progress());
        self.property.set(from.lerp(&self.to, weight));
        Ok(excess)
    }

    fn is_finished(&self) -> Result<bool> {
        Ok(self.clock.is_finished())
    }

    fn duration(&self) -> f32 {
        self.clock.duration
    }

    fn stop(&mut self) {
        self.clock.rewind();
        self.from = None;
    }
}
