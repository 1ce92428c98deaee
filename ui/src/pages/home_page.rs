use egui::{Response, RichText, Ui};
use userdesk_business::Route;

/// Landing page. Returns [`Route::Users`] when the shortcut is clicked.
pub fn home_page(ui: &mut Ui) -> (Response, Option<Route>) {
    let mut navigate = None;

    let response = ui
        .vertical_centered(|ui| {
            ui.add_space(16.0);
            ui.heading(RichText::new("Welcome to User Management App").size(28.0));
            ui.label("Create, browse, edit and delete users against a REST backend.");
            ui.add_space(16.0);

            if ui.button("Manage users").clicked() {
                navigate = Some(Route::Users);
            }

            ui.add_space(24.0);
            ui.heading("Getting Started");
            ui.label("Point API_BASE_URL at the backend, then open the Users page.");
            ui.label("Selections and open forms are kept in the address, so links can be shared.");
        })
        .response;

    (response, navigate)
}
