use std::{
    any::{TypeId, type_name},
    collections::BTreeMap,
};

use crate::{Compute, State};

/// Read-only view over the registered states and computes, handed to
/// [`Compute::compute`].
pub struct Dep<'a> {
    states: &'a BTreeMap<TypeId, Box<dyn State>>,
    computes: &'a BTreeMap<TypeId, Box<dyn Compute>>,
}

impl<'a> Dep<'a> {
    pub(crate) fn new(
        states: &'a BTreeMap<TypeId, Box<dyn State>>,
        computes: &'a BTreeMap<TypeId, Box<dyn Compute>>,
    ) -> Self {
        Self { states, computes }
    }

    /// # Panics
    /// Panics if `T` was never registered.
    pub fn get_state_ref<T: State>(&self) -> &'a T {
        self.states
            .get(&TypeId::of::<T>())
            .and_then(|s| s.as_any().downcast_ref::<T>())
            .unwrap_or_else(|| panic!("State {} is not registered", type_name::<T>()))
    }

    /// # Panics
    /// Panics if `T` was never registered.
    pub fn get_compute_ref<T: Compute>(&self) -> &'a T {
        self.computes
            .get(&TypeId::of::<T>())
            .and_then(|c| c.as_any().downcast_ref::<T>())
            .unwrap_or_else(|| panic!("Compute {} is not registered", type_name::<T>()))
    }
}
