//! Paged user list query.
//!
//! `ensure_user_list` is called every frame the list is visible. It marks the
//! cache as loading and enqueues [`FetchUserListCommand`] when the page
//! changed or the cache was invalidated by a mutation.

use std::any::Any;

use log::{debug, error, info};
use userdesk_states::{
    CancellationToken, Command, CommandFuture, CommandSnapshot, Compute, ComputeDeps, Dep, State,
    StateCtx, Updater, assign_impl,
};

use crate::BusinessConfig;
use crate::config::{DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE};
use crate::users::api;
use crate::users::model::UserList;
use crate::users::query::{QueryCache, RequestFailed};

/// Which page of users to show.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UserListInput {
    pub limit: u32,
    pub offset: u64,
}

impl Default for UserListInput {
    fn default() -> Self {
        Self::with_page_size(DEFAULT_PAGE_SIZE)
    }
}

impl UserListInput {
    pub fn with_page_size(limit: u32) -> Self {
        Self {
            limit: limit.clamp(1, MAX_PAGE_SIZE),
            offset: 0,
        }
    }

    pub fn has_prev(&self) -> bool {
        self.offset > 0
    }

    pub fn has_next(&self, total: u64) -> bool {
        self.offset + u64::from(self.limit) < total
    }

    pub fn prev_page(&mut self) {
        self.offset = self.offset.saturating_sub(u64::from(self.limit));
    }

    pub fn next_page(&mut self, total: u64) {
        if self.has_next(total) {
            self.offset += u64::from(self.limit);
        }
    }

    /// One-based page number and page count for `total` users.
    pub fn page_of(&self, total: u64) -> (u64, u64) {
        let limit = u64::from(self.limit);
        (self.offset / limit + 1, total.div_ceil(limit).max(1))
    }

    /// Moves back to the last page when `total` shrank below the offset.
    fn clamp_to(&mut self, total: u64) -> bool {
        if self.offset == 0 || self.offset < total {
            return false;
        }
        let limit = u64::from(self.limit);
        self.offset = total.saturating_sub(1) / limit * limit;
        true
    }
}

impl State for UserListInput {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }

    fn assign_box(&mut self, new_self: Box<dyn Any + Send>) {
        assign_impl(self, new_self);
    }

    fn snapshot(&self) -> Option<Box<dyn Any + Send>> {
        Some(Box::new(*self))
    }
}

#[derive(Debug, Clone, Default)]
pub struct UserListCompute {
    pub cache: QueryCache<UserListInput, UserList>,
}

impl Compute for UserListCompute {
    fn deps(&self) -> ComputeDeps {
        ComputeDeps::none()
    }

    // Written by `FetchUserListCommand` only.
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
pub struct FetchUserListCommand;

impl Command for FetchUserListCommand {
    fn run(&self, snap: CommandSnapshot, updater: Updater, cancel: CancellationToken) -> CommandFuture {
        let input = *snap.state::<UserListInput>();
        let api_url = snap.state::<BusinessConfig>().api_url();

        Box::pin(async move {
            info!(
                "FetchUserListCommand: limit={} offset={}",
                input.limit, input.offset
            );

            let result = tokio::select! {
                () = cancel.cancelled() => {
                    debug!("FetchUserListCommand: superseded, stopping");
                    return;
                }
                result = api::list_users(&api_url, input.limit, input.offset) => result,
            };

            let result = match result {
                Ok(list) => {
                    info!(
                        "FetchUserListCommand: {} of {} users",
                        list.users.len(),
                        list.total
                    );
                    Ok(list)
                }
                Err(err) => {
                    error!("FetchUserListCommand: {err}");
                    Err(RequestFailed::from(&err))
                }
            };

            updater.update::<UserListCompute>(move |compute| compute.cache.resolve(&input, result));
        })
    }
}

/// Starts a fetch when the current page is missing or stale.
pub fn ensure_user_list(ctx: &mut StateCtx) {
    let mut input = *ctx.state::<UserListInput>();

    let total = ctx
        .compute::<UserListCompute>()
        .cache
        .data()
        .map(|list| list.total);
    if let Some(total) = total
        && input.clamp_to(total)
    {
        debug!("Page past the end, moving to offset {}", input.offset);
        ctx.update::<UserListInput>(|current| *current = input);
    }

    if ctx.compute::<UserListCompute>().cache.needs_fetch(&input) {
        ctx.update_compute::<UserListCompute>(|compute| compute.cache.begin(input));
        ctx.enqueue_command::<FetchUserListCommand>();
    }
}

/// Marks the list stale so the next `ensure_user_list` refetches it.
pub fn invalidate_user_list(updater: &Updater) {
    updater.update::<UserListCompute>(|compute| compute.cache.invalidate());
}
