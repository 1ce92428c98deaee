use std::any::{Any, TypeId, type_name};
use std::collections::BTreeMap;

use crate::{Compute, State};

/// Owned copies of every snapshot-capable state and compute, taken when a
/// command is flushed. Commands read inputs from here instead of the live
/// context.
#[derive(Default)]
pub struct CommandSnapshot {
    states: BTreeMap<TypeId, Box<dyn Any + Send>>,
    computes: BTreeMap<TypeId, Box<dyn Any + Send>>,
}

impl CommandSnapshot {
    pub(crate) fn capture<'a>(
        states: impl Iterator<Item = (&'a TypeId, &'a Box<dyn State>)>,
        computes: impl Iterator<Item = (&'a TypeId, &'a Box<dyn Compute>)>,
    ) -> Self {
        Self {
            states: states
                .filter_map(|(id, s)| s.snapshot().map(|snap| (*id, snap)))
                .collect(),
            computes: computes
                .filter_map(|(id, c)| c.snapshot().map(|snap| (*id, snap)))
                .collect(),
        }
    }

    pub fn try_state<T: State>(&self) -> Option<&T> {
        self.states
            .get(&TypeId::of::<T>())
            .and_then(|boxed| boxed.downcast_ref::<T>())
    }

    pub fn try_compute<T: Compute>(&self) -> Option<&T> {
        self.computes
            .get(&TypeId::of::<T>())
            .and_then(|boxed| boxed.downcast_ref::<T>())
    }

    /// # Panics
    /// Panics if `T` is unregistered or does not implement `snapshot`.
    pub fn state<T: State>(&self) -> &T {
        self.try_state::<T>()
            .unwrap_or_else(|| panic!("State snapshot for {} is missing", type_name::<T>()))
    }

    /// # Panics
    /// Panics if `T` is unregistered or does not implement `snapshot`.
    pub fn compute<T: Compute>(&self) -> &T {
        self.try_compute::<T>()
            .unwrap_or_else(|| panic!("Compute snapshot for {} is missing", type_name::<T>()))
    }
}
