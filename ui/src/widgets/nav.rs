use egui::{RichText, Ui};
use userdesk_business::Route;

/// Top navigation: app title plus one link per route. Returns the route that
/// was clicked, if any.
pub fn nav_bar(ui: &mut Ui, current: Route) -> Option<Route> {
    let mut clicked = None;

    ui.horizontal(|ui| {
        ui.label(RichText::new("User Management App").strong());
        ui.add_space(16.0);

        for route in Route::ALL {
            if ui
                .selectable_label(route == current, route.title())
                .clicked()
                && route != current
            {
                clicked = Some(route);
            }
        }
    });

    clicked
}

#[cfg(test)]
mod nav_bar_tests {
    use egui_kittest::Harness;
    use kittest::Queryable;

    use super::*;

    #[test]
    fn test_nav_links_exist() {
        let harness = Harness::new_ui(|ui| {
            nav_bar(ui, Route::Home);
        });

        for route in Route::ALL {
            assert!(
                harness.query_by_label(route.title()).is_some(),
                "{} link should exist",
                route.title()
            );
        }
    }

    #[test]
    fn test_clicking_link_reports_route() {
        let mut harness = Harness::new_ui_state(
            |ui, route: &mut Route| {
                if let Some(next) = nav_bar(ui, *route) {
                    *route = next;
                }
            },
            Route::Home,
        );

        harness.get_by_label("About").click();
        harness.step();

        assert_eq!(*harness.state(), Route::About);
    }
}
