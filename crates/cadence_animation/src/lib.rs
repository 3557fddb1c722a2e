//! Cadence Animation
//!
//! Frame-driven tweening: eased property interpolation, chained sequences
//! and concurrent groups, advanced by an externally supplied delta time.
//!
//! # Features
//!
//! - **Tweens**: Interpolate any [`Interpolate`] value through a [`Property`] handle
//! - **Sequences**: Run steps back to back with exact carry-over of spare frame time
//! - **Groups**: Run steps side by side, finishing on the first, any or all children
//! - **Easing Presets**: Polynomial, sine, back, bounce, elastic and cubic bezier curves
//! - **Driver**: Explicit per-frame owner of all running sequences

pub mod driver;
pub mod easing;
pub mod error;
pub mod group;
pub mod interpolate;
pub mod property;
pub mod sequence;
pub mod step;

pub use driver::{Driver, SequenceId};
pub use easing::Easing;
pub use error::{AnimationError, Result};
pub use group::{FinishPolicy, Group};
pub use interpolate::Interpolate;
pub use property::{
    CellProperty, FnProperty, Property, SharedTransform, Transform, TransformChannel,
    TransformProperty,
};
pub use sequence::Sequence;
pub use step::{Step, TransformTween, Tween, Wait};
