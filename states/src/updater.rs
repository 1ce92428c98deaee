use std::any::{Any, TypeId, type_name};

use flume::Sender;
use log::{trace, warn};

use crate::TaskId;

type ApplyFn = Box<dyn FnOnce(&mut dyn Any) + Send>;

pub(crate) enum UpdateMsg {
    Assign(Box<dyn Any + Send>),
    Apply(ApplyFn),
}

/// One queued write, applied by [`crate::StateCtx::sync_computes`].
pub(crate) struct Envelope {
    pub(crate) target: TypeId,
    pub(crate) origin: Option<TaskId>,
    pub(crate) msg: UpdateMsg,
}

/// Sends writes for states and computes back to the owning context.
///
/// An updater handed to a command carries that run's [`TaskId`]; once a newer
/// run of the same command is dispatched its writes are discarded.
#[derive(Clone)]
pub struct Updater {
    send: Sender<Envelope>,
    origin: Option<TaskId>,
}

impl Updater {
    pub(crate) fn new(send: Sender<Envelope>) -> Self {
        Self { send, origin: None }
    }

    pub(crate) fn for_task(&self, task: TaskId) -> Self {
        Self {
            send: self.send.clone(),
            origin: Some(task),
        }
    }

    pub fn origin(&self) -> Option<TaskId> {
        self.origin
    }

    /// Replace the registered value of type `T`.
    pub fn set<T: Any + Send>(&self, value: T) {
        self.push::<T>(UpdateMsg::Assign(Box::new(value)));
    }

    /// Mutate the registered value of type `T` in place.
    pub fn update<T: Any + Send>(&self, f: impl FnOnce(&mut T) + Send + 'static) {
        let apply: ApplyFn = Box::new(move |any: &mut dyn Any| match any.downcast_mut::<T>() {
            Some(value) => f(value),
            None => warn!("Ignoring update for {}: type mismatch", type_name::<T>()),
        });
        self.push::<T>(UpdateMsg::Apply(apply));
    }

    fn push<T: Any>(&self, msg: UpdateMsg) {
        trace!("Queue update for {}", type_name::<T>());
        let envelope = Envelope {
            target: TypeId::of::<T>(),
            origin: self.origin,
            msg,
        };
        if self.send.send(envelope).is_err() {
            warn!(
                "Dropping update for {}: state context is gone",
                type_name::<T>()
            );
        }
    }
}
