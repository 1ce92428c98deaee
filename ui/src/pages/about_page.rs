use egui::{Response, Ui};

const FEATURES: [&str; 4] = [
    "Paged user list with selection kept in the address",
    "Create, edit and delete with inline feedback",
    "Typed REST client with server error messages",
    "Native and web builds from one codebase",
];

pub fn about_page(ui: &mut Ui) -> Response {
    ui.vertical(|ui| {
        ui.heading("About");
        ui.weak("Learn more about this project");
        ui.add_space(12.0);

        ui.strong("Project Overview");
        ui.label("A user management client for the /api/v1/users REST endpoints.");
        ui.add_space(8.0);

        ui.strong("Key Features");
        for feature in FEATURES {
            ui.label(format!("• {feature}"));
        }
        ui.add_space(12.0);

        powered_by_egui_and_eframe(ui);
    })
    .response
}

fn powered_by_egui_and_eframe(ui: &mut Ui) {
    ui.horizontal(|ui| {
        ui.spacing_mut().item_spacing.x = 0.0;
        ui.label("Powered by ");
        ui.hyperlink_to("egui", "https://github.com/emilk/egui");
        ui.label(" and ");
        ui.hyperlink_to(
            "eframe",
            "https://github.com/emilk/egui/tree/master/crates/eframe",
        );
        ui.label(".");
    });
}

#[cfg(test)]
mod about_page_test {
    use egui_kittest::Harness;
    use kittest::Queryable;

    #[test]
    fn test_about_page_lists_features() {
        let harness = Harness::new_ui(|ui| {
            super::about_page(ui);
        });

        assert!(harness.query_by_label("About").is_some());
        assert!(harness.query_by_label("Key Features").is_some());
        assert_eq!(
            harness.query_all_by_label_contains("•").count(),
            super::FEATURES.len()
        );
        assert!(harness.query_by_label("egui").is_some());
    }
}
