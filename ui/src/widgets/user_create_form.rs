//! Create form. Owns its draft; the page decides when to clear it.

use egui::{Button, Grid, TextEdit, Ui};
use userdesk_business::users::{CreateUserRequest, MutationStatus, ValidationError};
use userdesk_business::users::model::NAME_MAX_CHARS;

use crate::utils::colors::{COLOR_GREEN, COLOR_RED};

/// Draft of a new user plus the last client-side validation failure.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CreateUserForm {
    pub name: String,
    pub email: String,
    pub invalid: Option<ValidationError>,
}

impl CreateUserForm {
    pub fn clear(&mut self) {
        *self = Self::default();
    }

    fn request(&self) -> CreateUserRequest {
        CreateUserRequest {
            name: self.name.clone(),
            email: self.email.clone(),
        }
    }
}

/// Renders the draft inputs and the submit row.
///
/// Returns the draft when Create is clicked and it passes validation. The
/// draft is left as is; feedback comes from `status`.
pub fn user_create_form(
    ui: &mut Ui,
    form: &mut CreateUserForm,
    status: &MutationStatus,
) -> Option<CreateUserRequest> {
    let is_pending = status.is_pending();

    Grid::new("user_create_form")
        .num_columns(2)
        .spacing([12.0, 8.0])
        .show(ui, |ui| {
            ui.label("Name");
            ui.add(
                TextEdit::singleline(&mut form.name)
                    .char_limit(NAME_MAX_CHARS)
                    .hint_text("Jane Doe"),
            );
            ui.end_row();

            ui.label("Email");
            ui.add(TextEdit::singleline(&mut form.email).hint_text("jane@example.com"));
            ui.end_row();
        });

    if let Some(invalid) = form.invalid {
        ui.colored_label(COLOR_RED, invalid.to_string());
    }

    ui.add_space(8.0);

    let mut submitted = None;
    ui.horizontal(|ui| {
        let label = if is_pending { "Creating..." } else { "Create" };
        if ui.add_enabled(!is_pending, Button::new(label)).clicked() {
            let request = form.request();
            match request.validate() {
                Ok(()) => {
                    form.invalid = None;
                    submitted = Some(request);
                }
                Err(invalid) => form.invalid = Some(invalid),
            }
        }

        match status {
            MutationStatus::Error(failed) => {
                ui.colored_label(
                    COLOR_RED,
                    format!("Error: {}", failed.message_or("Failed to create user")),
                );
            }
            MutationStatus::Success => {
                ui.colored_label(COLOR_GREEN, "User created successfully!");
            }
            MutationStatus::Idle | MutationStatus::Pending => {}
        }
    });

    submitted
}
