mod nav;
mod user_create_form;
mod user_detail;
mod user_edit_form;
mod user_list;
mod user_list_item;

#[cfg(test)]
pub(crate) mod test_support;

use chrono::{DateTime, Local, Utc};

pub use nav::nav_bar;
pub use user_create_form::{CreateUserForm, user_create_form};
pub use user_detail::{UserDetailEvent, user_detail};
pub use user_edit_form::{EditFormEvent, EditUserForm, user_edit_form};
pub use user_list::{UserListProps, user_list};
pub use user_list_item::{UserListEvent, user_list_item};

/// Server timestamps are shown in the viewer's local time.
pub(crate) fn local_time(timestamp: DateTime<Utc>) -> String {
    timestamp
        .with_timezone(&Local)
        .format("%Y-%m-%d %H:%M:%S")
        .to_string()
}
