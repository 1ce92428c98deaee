//! Create, update and delete.
//!
//! The `submit_*` helpers store the request in [`UserMutationInput`], flag the
//! mutation as pending so controls disable in the same frame, and enqueue the
//! command. On success a command invalidates the cached queries and moves the
//! users search state along: create hides the form, update leaves edit mode,
//! delete drops the selection.

use std::any::Any;

use log::{error, info};
use userdesk_states::{
    CancellationToken, Command, CommandFuture, CommandSnapshot, Compute, ComputeDeps, Dep, State,
    StateCtx, Updater, assign_impl,
};
use ustr::Ustr;

use crate::BusinessConfig;
use crate::route::Location;
use crate::users::api;
use crate::users::detail::invalidate_user_detail;
use crate::users::list::invalidate_user_list;
use crate::users::model::{CreateUserRequest, UpdateUserRequest};
use crate::users::query::{MutationStatus, RequestFailed};

/// Requests waiting for (or being processed by) the mutation commands.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserMutationInput {
    pub create: Option<CreateUserRequest>,
    pub update: Option<(Ustr, UpdateUserRequest)>,
    pub delete: Option<Ustr>,
}

impl State for UserMutationInput {
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
        Some(Box::new(self.clone()))
    }
}

macro_rules! mutation_compute {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Default, PartialEq, Eq)]
        pub struct $name {
            pub status: MutationStatus,
        }

        impl $name {
            pub fn with_status(status: MutationStatus) -> Self {
                Self { status }
            }
        }

        impl Compute for $name {
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
    };
}

mutation_compute!(
    /// Status of the last create.
    CreateUserCompute
);
mutation_compute!(
    /// Status of the last update.
    UpdateUserCompute
);
mutation_compute!(
    /// Status of the last delete.
    DeleteUserCompute
);

pub fn submit_create(ctx: &mut StateCtx, request: CreateUserRequest) {
    ctx.update::<UserMutationInput>(|input| input.create = Some(request));
    ctx.update_compute::<CreateUserCompute>(|c| c.status = MutationStatus::Pending);
    ctx.enqueue_command::<CreateUserCommand>();
}

pub fn submit_update(ctx: &mut StateCtx, id: Ustr, request: UpdateUserRequest) {
    ctx.update::<UserMutationInput>(|input| input.update = Some((id, request)));
    ctx.update_compute::<UpdateUserCompute>(|c| c.status = MutationStatus::Pending);
    ctx.enqueue_command::<UpdateUserCommand>();
}

pub fn submit_delete(ctx: &mut StateCtx, id: Ustr) {
    ctx.update::<UserMutationInput>(|input| input.delete = Some(id));
    ctx.update_compute::<DeleteUserCompute>(|c| c.status = MutationStatus::Pending);
    ctx.enqueue_command::<DeleteUserCommand>();
}

/// Clears a finished create so a reopened form starts without old feedback.
pub fn reset_create(ctx: &mut StateCtx) {
    if !ctx.compute::<CreateUserCompute>().status.is_pending() {
        ctx.update_compute::<CreateUserCompute>(|c| c.status = MutationStatus::Idle);
    }
}

pub fn reset_update(ctx: &mut StateCtx) {
    if !ctx.compute::<UpdateUserCompute>().status.is_pending() {
        ctx.update_compute::<UpdateUserCompute>(|c| c.status = MutationStatus::Idle);
    }
}

#[derive(Debug, Default)]
pub struct CreateUserCommand;

impl Command for CreateUserCommand {
    fn run(&self, snap: CommandSnapshot, updater: Updater, _cancel: CancellationToken) -> CommandFuture {
        let request = snap.state::<UserMutationInput>().create.clone();
        let api_url = snap.state::<BusinessConfig>().api_url();

        Box::pin(async move {
            let Some(request) = request else {
                info!("CreateUserCommand: nothing to create, skipping");
                return;
            };

            info!("CreateUserCommand: creating user");
            match api::create_user(&api_url, &request.trimmed()).await {
                Ok(()) => {
                    info!("CreateUserCommand: user created");
                    updater.set(CreateUserCompute::with_status(MutationStatus::Success));
                    invalidate_user_list(&updater);
                    updater.update::<Location>(|location| location.users.hide_create());
                }
                Err(err) => {
                    error!("CreateUserCommand: {err}");
                    let status = MutationStatus::Error(RequestFailed::from(&err));
                    updater.set(CreateUserCompute::with_status(status));
                }
            }
        })
    }
}

#[derive(Debug, Default)]
pub struct UpdateUserCommand;

impl Command for UpdateUserCommand {
    fn run(&self, snap: CommandSnapshot, updater: Updater, _cancel: CancellationToken) -> CommandFuture {
        let pending = snap.state::<UserMutationInput>().update.clone();
        let api_url = snap.state::<BusinessConfig>().api_url();

        Box::pin(async move {
            let Some((id, request)) = pending else {
                info!("UpdateUserCommand: nothing to update, skipping");
                return;
            };

            info!("UpdateUserCommand: updating user {id}");
            match api::update_user(&api_url, &id, &request).await {
                Ok(()) => {
                    info!("UpdateUserCommand: user {id} updated");
                    updater.set(UpdateUserCompute::with_status(MutationStatus::Success));
                    invalidate_user_list(&updater);
                    invalidate_user_detail(&updater);
                    updater.update::<Location>(|location| location.users.cancel_edit());
                }
                Err(err) => {
                    error!("UpdateUserCommand: user {id}: {err}");
                    let status = MutationStatus::Error(RequestFailed::from(&err));
                    updater.set(UpdateUserCompute::with_status(status));
                }
            }
        })
    }
}

#[derive(Debug, Default)]
pub struct DeleteUserCommand;

impl Command for DeleteUserCommand {
    fn run(&self, snap: CommandSnapshot, updater: Updater, _cancel: CancellationToken) -> CommandFuture {
        let target = snap.state::<UserMutationInput>().delete;
        let api_url = snap.state::<BusinessConfig>().api_url();

        Box::pin(async move {
            let Some(id) = target else {
                info!("DeleteUserCommand: nothing to delete, skipping");
                return;
            };

            info!("DeleteUserCommand: deleting user {id}");
            match api::delete_user(&api_url, &id).await {
                Ok(()) => {
                    info!("DeleteUserCommand: user {id} deleted");
                    updater.set(DeleteUserCompute::with_status(MutationStatus::Success));
                    invalidate_user_list(&updater);
                    updater.update::<Location>(|location| location.users.clear_selection());
                }
                Err(err) => {
                    error!("DeleteUserCommand: user {id}: {err}");
                    let status = MutationStatus::Error(RequestFailed::from(&err));
                    updater.set(DeleteUserCompute::with_status(status));
                }
            }
        })
    }
}
