use std::any::{Any, type_name};

use log::warn;

/// A value owned by [`crate::StateCtx`] and mutated only on the UI thread.
///
/// States that commands need to read must return a clone from
/// [`State::snapshot`]; everything else can keep the default.
pub trait State: Any + Send {
    fn as_any(&self) -> &dyn Any;

    fn as_any_mut(&mut self) -> &mut dyn Any;

    /// Replace `self` with a boxed value of the same concrete type.
    fn assign_box(&mut self, new_self: Box<dyn Any + Send>);

    fn snapshot(&self) -> Option<Box<dyn Any + Send>> {
        None
    }
}

/// Shared body for [`State::assign_box`] and [`crate::Compute::assign_box`].
pub fn assign_impl<T: Any>(target: &mut T, new_self: Box<dyn Any + Send>) {
    match new_self.downcast::<T>() {
        Ok(value) => *target = *value,
        Err(_) => warn!("Ignoring assignment to {}: type mismatch", type_name::<T>()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Default, Clone, PartialEq, Eq)]
    struct Counter(u32);

    impl State for Counter {
        fn as_any(&self) -> &dyn Any {
            self
        }

        fn as_any_mut(&mut self) -> &mut dyn Any {
            self
        }

        fn assign_box(&mut self, new_self: Box<dyn Any + Send>) {
            assign_impl(self, new_self);
        }
    }

    #[test]
    fn assign_replaces_matching_type() {
        let mut counter = Counter(1);
        counter.assign_box(Box::new(Counter(5)));
        assert_eq!(counter, Counter(5));
    }

    #[test]
    fn assign_ignores_other_types() {
        let mut counter = Counter(1);
        counter.assign_box(Box::new("not a counter"));
        assert_eq!(counter, Counter(1));
        assert!(counter.snapshot().is_none());
    }
}
