use std::{any::Any, future::Future, pin::Pin};

use tokio_util::sync::CancellationToken;

use crate::{CommandSnapshot, Updater};

pub type CommandFuture = Pin<Box<dyn Future<Output = ()> + Send>>;

/// An async side effect. Each flush gets a fresh snapshot, an updater tagged
/// with the run's generation, and a token cancelled when a newer run of the
/// same command starts.
pub trait Command: Any + Send + Sync {
    fn run(&self, snap: CommandSnapshot, updater: Updater, cancel: CancellationToken)
    -> CommandFuture;
}
