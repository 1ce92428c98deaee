use egui::Ui;
use userdesk_business::users::{RequestFailed, User};
use ustr::Ustr;

use super::user_list_item::{UserListEvent, user_list_item};
use crate::utils::colors::COLOR_RED;

/// Everything [`user_list`] renders. Borrowed from the list query.
#[derive(Debug, Clone, Copy, Default)]
pub struct UserListProps<'a> {
    pub users: Option<&'a [User]>,
    pub total: Option<u64>,
    pub is_loading: bool,
    pub error: Option<&'a RequestFailed>,
    pub selected: Option<Ustr>,
    pub is_deleting: bool,
}

/// Renders the users with their loading, error and empty states.
pub fn user_list(ui: &mut Ui, props: UserListProps<'_>) -> Option<UserListEvent> {
    let mut event = None;

    ui.heading("User List");
    ui.add_space(8.0);

    if props.is_loading {
        ui.horizontal(|ui| {
            ui.spinner();
            ui.label("Loading users...");
        });
    }

    if let Some(error) = props.error {
        ui.colored_label(
            COLOR_RED,
            format!("Error: {}", error.message_or("Failed to load users")),
        );
    }

    match props.users {
        Some(users) if !users.is_empty() => {
            for user in users {
                let is_selected = props.selected == Some(user.id);
                if let Some(reported) = user_list_item(ui, user, is_selected, props.is_deleting) {
                    event = Some(reported);
                }
                ui.add_space(4.0);
            }
        }
        _ if !props.is_loading => {
            ui.weak("No users found. Create one to get started!");
        }
        _ => {}
    }

    if let Some(total) = props.total {
        ui.add_space(8.0);
        ui.weak(format!("Total users: {total}"));
    }

    event
}
