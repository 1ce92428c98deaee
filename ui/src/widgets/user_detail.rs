use egui::{Button, Grid, RichText, Ui};
use userdesk_business::users::User;
use ustr::Ustr;

use super::local_time;
use crate::utils::colors::COLOR_RED;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UserDetailEvent {
    Edit,
    Delete(Ustr),
}

/// Read-only view of one user with Edit and Delete actions.
pub fn user_detail(ui: &mut Ui, user: &User, is_deleting: bool) -> Option<UserDetailEvent> {
    let mut event = None;

    Grid::new("user_detail_fields")
        .num_columns(2)
        .spacing([16.0, 8.0])
        .show(ui, |ui| {
            ui.weak("ID");
            ui.label(RichText::new(user.id.as_str()).monospace());
            ui.end_row();

            ui.weak("Name");
            ui.label(RichText::new(&user.name).strong());
            ui.end_row();

            ui.weak("Email");
            ui.label(&user.email);
            ui.end_row();

            ui.weak("Created At");
            ui.label(local_time(user.created_at));
            ui.end_row();

            ui.weak("Updated At");
            ui.label(local_time(user.updated_at));
            ui.end_row();
        });

    ui.add_space(12.0);

    ui.horizontal(|ui| {
        if ui.button("Edit").clicked() {
            event = Some(UserDetailEvent::Edit);
        }

        let label = if is_deleting {
            "Deleting..."
        } else {
            "Delete User"
        };
        let delete = Button::new(RichText::new(label).color(COLOR_RED));
        if ui.add_enabled(!is_deleting, delete).clicked() {
            event = Some(UserDetailEvent::Delete(user.id));
        }
    });

    event
}
