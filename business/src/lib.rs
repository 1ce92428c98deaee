//! Business layer of userdesk: configuration, HTTP plumbing, client-side
//! routing and the users feature, expressed as states, computes and commands
//! for `userdesk_states::StateCtx`.

pub mod config;
pub mod http;
pub mod route;
pub mod users;

#[cfg(all(test, not(target_arch = "wasm32")))]
mod test_utils;

pub use config::BusinessConfig;
pub use route::{Location, Route, UsersSearch};
pub use users::register_users;
