//! One page per [`Route`](userdesk_business::Route):
//! - `home_page`: welcome text and a shortcut to the users page
//! - `users_page`: list, detail, create/edit forms and delete confirmation
//! - `about_page`: what the app is built with

mod about_page;
mod home_page;
mod users_page;

pub use about_page::about_page;
pub use home_page::home_page;
pub use users_page::{UsersPageState, users_page};
