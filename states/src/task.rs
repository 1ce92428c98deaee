//! Identity and cancellation for command runs.
//!
//! Every flush of a command gets a [`TaskId`] made of the command's `TypeId`
//! and a generation counter. Starting a new run cancels the previous run's
//! [`TaskHandle`], and the context ignores updates whose generation is no
//! longer the latest.

use std::any::TypeId;

use tokio_util::sync::CancellationToken;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TaskId {
    type_id: TypeId,
    generation: u64,
}

impl TaskId {
    pub fn new(type_id: TypeId, generation: u64) -> Self {
        Self {
            type_id,
            generation,
        }
    }

    pub fn type_id(&self) -> TypeId {
        self.type_id
    }

    /// Higher values belong to more recently started runs.
    pub fn generation(&self) -> u64 {
        self.generation
    }
}

/// A running command's id plus its cancellation token.
///
/// Cancellation is cooperative: the command decides where to observe it,
/// usually with `tokio::select!` on `token.cancelled()` around its request.
#[derive(Debug, Clone)]
pub struct TaskHandle {
    id: TaskId,
    cancel_token: CancellationToken,
}

impl TaskHandle {
    pub fn new(id: TaskId, cancel_token: CancellationToken) -> Self {
        Self { id, cancel_token }
    }

    pub fn id(&self) -> TaskId {
        self.id
    }

    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel_token.clone()
    }

    pub fn cancel(&self) {
        self.cancel_token.cancel();
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel_token.is_cancelled()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn task_id_distinguishes_generation_and_type() {
        let type_id = TypeId::of::<String>();

        assert_eq!(TaskId::new(type_id, 1), TaskId::new(type_id, 1));
        assert_ne!(TaskId::new(type_id, 1), TaskId::new(type_id, 2));
        assert_ne!(TaskId::new(type_id, 1), TaskId::new(TypeId::of::<i32>(), 1));
        assert!(TaskId::new(type_id, 2).generation() > TaskId::new(type_id, 1).generation());
    }

    #[test]
    fn cloned_handles_share_cancellation() {
        let handle = TaskHandle::new(TaskId::new(TypeId::of::<String>(), 1), CancellationToken::new());
        let other = handle.clone();
        let token = handle.cancellation_token();

        assert!(!other.is_cancelled());
        handle.cancel();

        assert!(other.is_cancelled());
        assert!(token.is_cancelled());
    }
}
