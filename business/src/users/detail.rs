//! Detail query for the selected user. Enabled only while `Location` has a
//! selection.

use std::any::Any;

use log::{debug, error, info};
use userdesk_states::{
    CancellationToken, Command, CommandFuture, CommandSnapshot, Compute, ComputeDeps, Dep,
    StateCtx, Updater, assign_impl,
};
use ustr::Ustr;

use crate::BusinessConfig;
use crate::route::Location;
use crate::users::api;
use crate::users::model::User;
use crate::users::query::{QueryCache, RequestFailed};

#[derive(Debug, Clone, Default)]
pub struct UserDetailCompute {
    pub cache: QueryCache<Ustr, User>,
}

impl UserDetailCompute {
    /// The loaded user, if it is the one with `id`.
    pub fn user(&self, id: Ustr) -> Option<&User> {
        self.cache.data().filter(|user| user.id == id)
    }
}

impl Compute for UserDetailCompute {
    fn deps(&self) -> ComputeDeps {
        ComputeDeps::none()
    }

    fn compute(&self, _deps: Dep<'_>, _updater: Updater) {}

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

#[derive(Debug, Default)]
pub struct FetchUserDetailCommand;

impl Command for FetchUserDetailCommand {
    fn run(&self, snap: CommandSnapshot, updater: Updater, cancel: CancellationToken) -> CommandFuture {
        let selected = snap.state::<Location>().users.user_id;
        let api_url = snap.state::<BusinessConfig>().api_url();

        Box::pin(async move {
            let Some(id) = selected else {
                debug!("FetchUserDetailCommand: no selection, skipping");
                return;
            };
            info!("FetchUserDetailCommand: fetching user {id}");

            let result = tokio::select! {
                () = cancel.cancelled() => {
                    debug!("FetchUserDetailCommand: superseded, stopping");
                    return;
                }
                result = api::get_user(&api_url, &id) => result,
            };

            let result = result
                .map_err(|err| {
                    error!("FetchUserDetailCommand: user {id}: {err}");
                    RequestFailed::from(&err)
                })
                .and_then(|user| {
                    if user.id == id {
                        Ok(user)
                    } else {
                        error!("FetchUserDetailCommand: asked for {id}, got {}", user.id);
                        Err(RequestFailed::default())
                    }
                });
            updater.update::<UserDetailCompute>(move |compute| compute.cache.resolve(&id, result));
        })
    }
}

/// Keeps the detail cache in line with the selection: fetches when a user is
/// selected and the cache is missing or stale, resets when nothing is.
pub fn ensure_user_detail(ctx: &mut StateCtx) {
    let selected = ctx.state::<Location>().users.user_id;
    let cache = &ctx.compute::<UserDetailCompute>().cache;

    match selected {
        Some(id) if cache.needs_fetch(&id) => {
            ctx.update_compute::<UserDetailCompute>(|compute| compute.cache.begin(id));
            ctx.enqueue_command::<FetchUserDetailCommand>();
        }
        None if cache.key.is_some() => {
            ctx.update_compute::<UserDetailCompute>(|compute| compute.cache.reset());
        }
        _ => {}
    }
}

pub fn invalidate_user_detail(updater: &Updater) {
    updater.update::<UserDetailCompute>(|compute| compute.cache.invalidate());
}
