//! Concurrent groups of steps
//!
//! A group runs all of its children side by side and is itself a [`Step`],
//! so groups nest inside sequences and other groups.
//!
//! Every child receives the same `dt` each update. Children do not pool
//! spare time with each other, and a group never hands time back to its
//! parent: `update` always returns zero excess.

use smallvec::SmallVec;
use std::fmt;
use std::str::FromStr;

use crate::error::{AnimationError, Result};
use crate::step::Step;

/// When a group counts as finished
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum FinishPolicy {
    /// The first child added has finished
    First,
    /// At least one child has finished
    Any,
    /// Every child has finished
    #[default]
    All,
}

impl FromStr for FinishPolicy {
    type Err = AnimationError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "first" => Ok(FinishPolicy::First),
            "any" => Ok(FinishPolicy::Any),
            "all" => Ok(FinishPolicy::All),
            _ => Err(AnimationError::UnknownFinishPolicy(s.to_string())),
        }
    }
}

impl fmt::Display for FinishPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FinishPolicy::First => "first",
            FinishPolicy::Any => "any",
            FinishPolicy::All => "all",
        };
        f.write_str(name)
    }
}

/// Steps running concurrently under a [`FinishPolicy`]
pub struct Group {
    steps: SmallVec<[Box<dyn Step>; 4]>,
    policy: FinishPolicy,
    started: bool,
}

impl Group {
    pub fn new(policy: FinishPolicy) -> Self {
        Self {
            steps: SmallVec::new(),
            policy,
            started: false,
        }
    }

    /// Builder: add a child step
    pub fn add_step<S: Step + 'static>(mut self, step: S) -> Self {
        self.push(Box::new(step));
        self
    }

    /// Add an already boxed child step
    pub fn push(&mut self, step: Box<dyn Step>) {
        self.steps.push(step);
    }

    pub fn policy(&self) -> FinishPolicy {
        self.policy
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }
}

impl Step for Group {
    /// Start every child in insertion order.
    ///
    /// Fails with `AlreadyStarted` while the group is still running; a group
    /// that has finished may be started again.
    fn start(&mut self) -> Result<()> {
        if self.steps.is_empty() {
            return Err(AnimationError::EmptyGroup);
        }
        if self.started && !self.is_finished()? {
            return Err(AnimationError::AlreadyStarted);
        }
        for step in self.steps.iter_mut() {
            step.start()?;
        }
        self.started = true;
        Ok(())
    }

    fn update(&mut self, dt: f32) -> Result<f32> {
        if !self.started {
            return Err(AnimationError::NotStarted);
        }
        for step in self.steps.iter_mut() {
            step.update(dt)?;
        }
        Ok(0.0)
    }

    fn is_finished(&self) -> Result<bool> {
        let Some(first) = self.steps.first() else {
            return Err(AnimationError::EmptyGroup);
        };
        match self.policy {
            FinishPolicy::First => first.is_finished(),
            FinishPolicy::Any => {
                for step in &self.steps {
                    if step.is_finished()? {
                        return Ok(true);
                    }
                }
                Ok(false)
            }
            FinishPolicy::All => {
                for step in &self.steps {
                    if !step.is_finished()? {
                        return Ok(false);
                    }
                }
                Ok(true)
            }
        }
    }

    /// First: the first child's duration. Any: the shortest. All: the longest.
    fn duration(&self) -> f32 {
        let durations = self.steps.iter().map(|s| s.duration());
        match self.policy {
            FinishPolicy::First => self.steps.first().map_or(0.0, |s| s.duration()),
            FinishPolicy::Any => durations.reduce(f32::min).unwrap_or(0.0),
            FinishPolicy::All => durations.reduce(f32::max).unwrap_or(0.0),
        }
    }

    fn stop(&mut self) {
        for step in self.steps.iter_mut() {
            step.stop();
        }
        self.started = false;
    }
}
