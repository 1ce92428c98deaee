//! The users feature: API calls, cached queries, mutations and the derived
//! view mode of the users page.

pub mod api;
pub mod detail;
pub mod list;
pub mod model;
pub mod mutations;
pub mod query;
pub mod view;

use userdesk_states::StateCtx;

use crate::BusinessConfig;
use crate::route::Location;

pub use api::UsersApiError;
pub use detail::{FetchUserDetailCommand, UserDetailCompute, ensure_user_detail};
pub use list::{FetchUserListCommand, UserListCompute, UserListInput, ensure_user_list};
pub use model::{CreateUserRequest, UpdateUserRequest, User, UserList, ValidationError};
pub use mutations::{
    CreateUserCommand, CreateUserCompute, DeleteUserCommand, DeleteUserCompute, UpdateUserCommand,
    UpdateUserCompute, UserMutationInput, reset_create, reset_update, submit_create, submit_delete,
    submit_update,
};
pub use query::{FetchStatus, MutationStatus, QueryCache, RequestFailed};
pub use view::{UsersViewCompute, ViewMode};

/// Registers config, location and everything the users page needs.
pub fn register_users(ctx: &mut StateCtx, config: BusinessConfig, location: Location) {
    ctx.add_state(UserListInput::with_page_size(config.page_size));
    ctx.add_state(config);
    ctx.add_state(location);
    ctx.add_state(UserMutationInput::default());

    ctx.record_compute(UserListCompute::default());
    ctx.record_compute(UserDetailCompute::default());
    ctx.record_compute(CreateUserCompute::default());
    ctx.record_compute(UpdateUserCompute::default());
    ctx.record_compute(DeleteUserCompute::default());
    ctx.record_compute(UsersViewCompute::default());

    ctx.record_command(FetchUserListCommand);
    ctx.record_command(FetchUserDetailCommand);
    ctx.record_command(CreateUserCommand);
    ctx.record_command(UpdateUserCommand);
    ctx.record_command(DeleteUserCommand);
}
