//! One row of the user list.

use egui::{
    Align, Button, CursorIcon, Frame, Label, Layout, Margin, RichText, Sense, Stroke, Ui, UiBuilder,
};
use userdesk_business::users::User;
use ustr::Ustr;

use crate::utils::colors::{COLOR_RED, COLOR_SELECTED};

/// What the user did with a list row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UserListEvent {
    Select(Ustr),
    Delete(Ustr),
}

/// Renders a user as a framed row: name and email on the left, a Delete
/// button on the right.
///
/// Clicking anywhere on the row selects the user. The Delete button sits on
/// top of the row, only ever reports [`UserListEvent::Delete`] and is
/// disabled while `is_deleting`.
pub fn user_list_item(
    ui: &mut Ui,
    user: &User,
    is_selected: bool,
    is_deleting: bool,
) -> Option<UserListEvent> {
    let stroke = if is_selected {
        Stroke::new(1.5, COLOR_SELECTED)
    } else {
        ui.visuals().widgets.noninteractive.bg_stroke
    };
    let fill = if is_selected {
        ui.visuals().faint_bg_color
    } else {
        ui.visuals().panel_fill
    };

    // The row senses clicks below its children, so the Delete button keeps
    // its own.
    let row = ui.scope_builder(
        UiBuilder::new()
            .id_salt(("user_row", user.id))
            .sense(Sense::click()),
        |ui| {
            Frame::NONE
                .stroke(stroke)
                .fill(fill)
                .corner_radius(4.0)
                .inner_margin(Margin::symmetric(10, 8))
                .show(ui, |ui| {
                    ui.set_width(ui.available_width());
                    ui.horizontal(|ui| {
                        let mut event = None;

                        ui.vertical(|ui| {
                            let name = ui
                                .selectable_label(is_selected, RichText::new(&user.name).strong());
                            if name.clicked() {
                                event = Some(UserListEvent::Select(user.id));
                            }
                            ui.add(Label::new(RichText::new(&user.email).weak()).selectable(false));
                        });

                        ui.with_layout(Layout::right_to_left(Align::Center), |ui| {
                            let delete =
                                Button::new(RichText::new("Delete").color(COLOR_RED).small());
                            if ui.add_enabled(!is_deleting, delete).clicked() {
                                event = Some(UserListEvent::Delete(user.id));
                            }
                        });

                        event
                    })
                    .inner
                })
                .inner
        },
    );

    let response = row.response.on_hover_cursor(CursorIcon::PointingHand);
    row.inner.or_else(|| {
        response
            .clicked()
            .then_some(UserListEvent::Select(user.id))
    })
}
