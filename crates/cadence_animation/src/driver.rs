//! Sequence driver
//!
//! Owns every running sequence and advances them once per frame. The
//! embedding application creates one driver and passes it to whatever
//! starts sequences; there is no global instance.

use slotmap::{new_key_type, SlotMap};
use tracing::{debug, warn};

use crate::error::AnimationError;
use crate::sequence::Sequence;

new_key_type! {
    pub struct SequenceId;
}

/// Ticks all registered sequences
///
/// Single-threaded: sequences write through `Rc` handles, so the driver is
/// neither `Send` nor `Sync`.
pub struct Driver {
    sequences: SlotMap<SequenceId, Sequence>,
}

impl Driver {
    pub fn new() -> Self {
        Self {
            sequences: SlotMap::with_key(),
        }
    }

    /// Take ownership of a sequence that is ready to play.
    ///
    /// Prefer [`Sequence::start`], which rewinds the sequence first.
    pub fn register(&mut self, sequence: Sequence) -> SequenceId {
        let id = self.sequences.insert(sequence);
        debug!(?id, active = self.sequences.len(), "sequence registered");
        id
    }

    /// Remove a sequence before it finishes
    pub fn cancel(&mut self, id: SequenceId) -> Option<Sequence> {
        let removed = self.sequences.remove(id);
        if removed.is_some() {
            debug!(?id, "sequence cancelled");
        }
        removed
    }

    /// Advance every sequence by `dt` seconds.
    ///
    /// Sequences that finished on an earlier tick are dropped without being
    /// updated again. A sequence whose update fails is dropped as well, and
    /// its error is returned to the caller. The returned `Vec` only
    /// allocates when something failed.
    pub fn tick(&mut self, dt: f32) -> Vec<(SequenceId, AnimationError)> {
        let mut failures = Vec::new();

        self.sequences.retain(|id, sequence| {
            if sequence.is_finished() {
                debug!(?id, "sequence removed");
                return false;
            }
            match sequence.update(dt) {
                Ok(()) => true,
                Err(err) => {
                    warn!(?id, %err, "sequence failed, removing");
                    failures.push((id, err));
                    false
                }
            }
        });

        failures
    }

    pub fn contains(&self, id: SequenceId) -> bool {
        self.sequences.contains_key(id)
    }

    pub fn get(&self, id: SequenceId) -> Option<&Sequence> {
        self.sequences.get(id)
    }

    pub fn get_mut(&mut self, id: SequenceId) -> Option<&mut Sequence> {
        self.sequences.get_mut(id)
    }

    /// Check if any registered sequence is still running
    pub fn has_active(&self) -> bool {
        self.sequences.values().any(|s| !s.is_finished())
    }

    /// Iterate over all registered sequences
    pub fn iter(&self) -> impl Iterator<Item = (SequenceId, &Sequence)> {
        self.sequences.iter()
    }

    /// Number of registered sequences, including finished ones not yet removed
    pub fn len(&self) -> usize {
        self.sequences.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sequences.is_empty()
    }
}

impl Default for Driver {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::easing::Easing;
    use crate::group::FinishPolicy;
    use crate::property::Transform;
    use crate::step::Wait;
    use glam::Vec3;

    #[test]
    fn test_register_and_remove_when_finished() {
        let mut driver = Driver::new();
        let target = Transform::default().shared();
        let id = Sequence::new(&target)
            .wait(0.5)
            .unwrap()
            .start(&mut driver)
            .unwrap();

        assert!(driver.contains(id));
        assert!(driver.has_active());

        assert!(driver.tick(0.5).is_empty());
        // Finished, but removal happens on the next pass
        assert!(driver.get(id).unwrap().is_finished());
        assert!(!driver.has_active());
        assert_eq!(driver.len(), 1);

        assert!(driver.tick(0.1).is_empty());
        assert!(!driver.contains(id));
        assert!(driver.is_empty());
    }

    #[test]
    fn test_ticks_all_sequences() {
        let mut driver = Driver::new();
        let a = Transform::default().shared();
        let b = Transform::default().shared();

        Sequence::new(&a)
            .move_to(Vec3::new(4.0, 0.0, 0.0), 1.0, Easing::Linear)
            .unwrap()
            .start(&mut driver)
            .unwrap();
        Sequence::new(&b)
            .scale_to(Vec3::splat(5.0), 2.0, Easing::Linear)
            .unwrap()
            .start(&mut driver)
            .unwrap();

        driver.tick(0.5);
        assert_eq!(a.borrow().position, Vec3::new(2.0, 0.0, 0.0));
        assert_eq!(b.borrow().scale, Vec3::splat(2.0));
        assert_eq!(driver.len(), 2);
    }

    #[test]
    fn test_cancel() {
        let mut driver = Driver::new();
        let target = Transform::default().shared();
        let id = Sequence::new(&target)
            .move_to(Vec3::ONE, 1.0, Easing::Linear)
            .unwrap()
            .start(&mut driver)
            .unwrap();

        driver.tick(0.25);
        let cancelled = driver.cancel(id).unwrap();
        assert!(!cancelled.is_finished());
        assert!(driver.cancel(id).is_none());

        driver.tick(0.25);
        assert_eq!(target.borrow().position, Vec3::splat(0.25));
    }

    #[test]
    fn test_restart_after_cancel_mid_group() {
        let mut driver = Driver::new();
        let target = Transform::default().shared();
        let id = Sequence::new(&target)
            .group(FinishPolicy::All, |group, _| Ok(group.add_step(Wait::new(1.0)?)))
            .unwrap()
            .start(&mut driver)
            .unwrap();
        driver.tick(0.5);

        let sequence = driver.cancel(id).unwrap();
        let id = sequence.start(&mut driver).unwrap();
        assert!(driver.tick(0.25).is_empty());
        assert!(driver.contains(id));

        assert!(driver.tick(0.75).is_empty());
        assert!(driver.get(id).unwrap().is_finished());
    }

    #[test]
    fn test_failed_sequence_is_reported_and_dropped() {
        let mut driver = Driver::new();
        let target = Transform::default().shared();

        // Registered without reset(): a freshly built sequence is still playable
        let ok = driver.register(Sequence::new(&target).wait(1.0).unwrap());
        let empty = driver.register(Sequence::new(&target));

        let failures = driver.tick(0.1);
        assert_eq!(failures, vec![(empty, AnimationError::EmptySequence)]);
        assert!(driver.contains(ok));
        assert!(!driver.contains(empty));
    }
}
