use std::any::{Any, TypeId};

use crate::{Dep, State, Updater};

/// What a derived compute reads. Computes without dependencies are caches
/// that only commands write to.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ComputeDeps {
    pub states: Vec<TypeId>,
    pub computes: Vec<TypeId>,
}

impl ComputeDeps {
    pub fn none() -> Self {
        Self::default()
    }

    pub fn state<T: State>(mut self) -> Self {
        self.states.push(TypeId::of::<T>());
        self
    }

    pub fn compute<T: Compute>(mut self) -> Self {
        self.computes.push(TypeId::of::<T>());
        self
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty() && self.computes.is_empty()
    }
}

pub trait Compute: Any + Send {
    fn deps(&self) -> ComputeDeps;

    /// Recalculate from `deps`, publishing the new value through `updater`.
    /// Called on the UI thread whenever a dependency changed.
    fn compute(&self, deps: Dep<'_>, updater: Updater);

    fn as_any(&self) -> &dyn Any;

    fn as_any_mut(&mut self) -> &mut dyn Any;

    fn assign_box(&mut self, new_self: Box<dyn Any + Send>);

    fn snapshot(&self) -> Option<Box<dyn Any + Send>> {
        None
    }
}
