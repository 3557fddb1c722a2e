//! Property accessors
//!
//! A tween never owns the value it animates. It reads the starting value and
//! writes every interpolated frame through a [`Property`] handle supplied at
//! construction. The handle is the only writer of that value while the tween
//! runs.

use glam::Vec3;
use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::Rc;

/// Read/write access to an external animated value
pub trait Property<T> {
    fn get(&self) -> T;
    fn set(&mut self, value: T);
}

/// Property backed by a getter/setter closure pair
pub struct FnProperty<G, S> {
    getter: G,
    setter: S,
}

impl<G, S> FnProperty<G, S> {
    pub fn new(getter: G, setter: S) -> Self {
        Self { getter, setter }
    }
}

impl<T, G, S> Property<T> for FnProperty<G, S>
where
    G: Fn() -> T,
    S: FnMut(T),
{
    fn get(&self) -> T {
        (self.getter)()
    }

    fn set(&mut self, value: T) {
        (self.setter)(value)
    }
}

impl<G, S> fmt::Debug for FnProperty<G, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnProperty").finish_non_exhaustive()
    }
}

/// Property over a shared `Cell`, for plain scalars owned by the caller
#[derive(Clone)]
pub struct CellProperty<T>(Rc<Cell<T>>);

impl<T> CellProperty<T> {
    pub fn new(cell: &Rc<Cell<T>>) -> Self {
        Self(Rc::clone(cell))
    }
}

impl<T: Copy> Property<T> for CellProperty<T> {
    fn get(&self) -> T {
        self.0.get()
    }

    fn set(&mut self, value: T) {
        self.0.set(value)
    }
}

/// Position and scale of an animated object
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Transform {
    pub position: Vec3,
    pub scale: Vec3,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            scale: Vec3::ONE,
        }
    }
}

impl Transform {
    pub fn new(position: Vec3, scale: Vec3) -> Self {
        Self { position, scale }
    }

    /// Wrap in a shared handle that sequences and the embedding app both hold
    pub fn shared(self) -> SharedTransform {
        Rc::new(RefCell::new(self))
    }
}

/// Transform shared between the embedding application and its sequences
pub type SharedTransform = Rc<RefCell<Transform>>;

/// Which field of a [`Transform`] a [`TransformProperty`] addresses
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TransformChannel {
    Position,
    Scale,
}

/// Property handle for one channel of a shared [`Transform`]
#[derive(Clone, Debug)]
pub struct TransformProperty {
    target: SharedTransform,
    channel: TransformChannel,
}

impl TransformProperty {
    pub fn new(target: &SharedTransform, channel: TransformChannel) -> Self {
        Self {
            target: Rc::clone(target),
            channel,
        }
    }

    pub fn position(target: &SharedTransform) -> Self {
        Self::new(target, TransformChannel::Position)
    }

    pub fn scale(target: &SharedTransform) -> Self {
        Self::new(target, TransformChannel::Scale)
    }

    pub fn channel(&self) -> TransformChannel {
        self.channel
    }
}

impl Property<Vec3> for TransformProperty {
    fn get(&self) -> Vec3 {
        let transform = self.target.borrow();
        match self.channel {
            TransformChannel::Position => transform.position,
            TransformChannel::Scale => transform.scale,
        }
    }

    fn set(&mut self, value: Vec3) {
        let mut transform = self.target.borrow_mut();
        match self.channel {
            TransformChannel::Position => transform.position = value,
            TransformChannel::Scale => transform.scale = value,
        }
    }
}
