//! Edit form for the selected user.

use egui::{Button, Grid, RichText, TextEdit, Ui};
use userdesk_business::users::model::NAME_MAX_CHARS;
use userdesk_business::users::{MutationStatus, UpdateUserRequest, User, ValidationError};
use ustr::Ustr;

use super::local_time;
use crate::utils::colors::{COLOR_GREEN, COLOR_RED};

/// Draft of an update. Bound to one user id and re-seeded from the user
/// whenever a different one is passed in.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EditUserForm {
    pub user_id: Option<Ustr>,
    pub name: String,
    pub email: String,
    pub invalid: Option<ValidationError>,
}

impl EditUserForm {
    pub fn seed(&mut self, user: &User) {
        if self.user_id == Some(user.id) {
            return;
        }
        *self = Self {
            user_id: Some(user.id),
            name: user.name.clone(),
            email: user.email.clone(),
            invalid: None,
        };
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditFormEvent {
    Submit(Ustr, UpdateUserRequest),
    Cancel,
}

pub fn user_edit_form(
    ui: &mut Ui,
    form: &mut EditUserForm,
    user: &User,
    status: &MutationStatus,
) -> Option<EditFormEvent> {
    form.seed(user);
    let is_pending = status.is_pending();
    let mut event = None;

    Grid::new("user_edit_form")
        .num_columns(2)
        .spacing([12.0, 8.0])
        .show(ui, |ui| {
            ui.weak("ID");
            ui.label(RichText::new(user.id.as_str()).monospace());
            ui.end_row();

            ui.label("Name");
            ui.add(TextEdit::singleline(&mut form.name).char_limit(NAME_MAX_CHARS));
            ui.end_row();

            ui.label("Email");
            ui.add(TextEdit::singleline(&mut form.email));
            ui.end_row();

            ui.weak("Created At");
            ui.label(local_time(user.created_at));
            ui.end_row();

            ui.weak("Updated At");
            ui.label(local_time(user.updated_at));
            ui.end_row();
        });

    if let Some(invalid) = form.invalid {
        ui.colored_label(COLOR_RED, invalid.to_string());
    }

    ui.add_space(8.0);

    ui.horizontal(|ui| {
        let label = if is_pending { "Updating..." } else { "Update" };
        if ui.add_enabled(!is_pending, Button::new(label)).clicked() {
            // Blank fields stay untouched on the server.
            let request = UpdateUserRequest::from_fields(&form.name, &form.email);
            match request.validate() {
                Ok(()) => {
                    form.invalid = None;
                    event = Some(EditFormEvent::Submit(user.id, request));
                }
                Err(invalid) => form.invalid = Some(invalid),
            }
        }

        if ui.add_enabled(!is_pending, Button::new("Cancel")).clicked() {
            event = Some(EditFormEvent::Cancel);
        }
    });

    match status {
        MutationStatus::Error(failed) => {
            ui.colored_label(
                COLOR_RED,
                format!("Error: {}", failed.message_or("Failed to update user")),
            );
        }
        MutationStatus::Success => {
            ui.colored_label(COLOR_GREEN, "User updated successfully!");
        }
        MutationStatus::Idle | MutationStatus::Pending => {}
    }

    event
}
