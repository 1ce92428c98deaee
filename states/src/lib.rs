//! A small reactive state runtime for immediate-mode UIs.
//!
//! * [`State`]: plain values owned by the UI thread.
//! * [`Compute`]: derived values recomputed when their dependencies change,
//!   or caches that only [`Command`]s write to.
//! * [`Command`]: async side effects that read a [`CommandSnapshot`] and write
//!   back through an [`Updater`].
//!
//! [`StateCtx`] ties them together; call [`StateCtx::sync_computes`] at the
//! start of a frame and [`StateCtx::flush_commands`] at the end.

mod command;
mod compute;
mod ctx;
mod dep;
mod error;
mod graph;
mod snapshot;
mod state;
mod state_sync_status;
mod task;
mod updater;

pub use command::{Command, CommandFuture};
pub use compute::{Compute, ComputeDeps};
pub use ctx::StateCtx;
pub use dep::Dep;
pub use error::Error;
pub use graph::{DepRoute, Graph, TopologyError};
pub use snapshot::CommandSnapshot;
pub use state::{State, assign_impl};
pub use state_sync_status::StateSyncStatus;
pub use task::{TaskHandle, TaskId};
pub use updater::Updater;

pub use tokio_util::sync::CancellationToken;
