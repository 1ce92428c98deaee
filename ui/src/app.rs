use std::time::Duration;

use log::{debug, info};
use userdesk_business::{Location, Route};

use crate::pages;
use crate::state::State;
use crate::utils::location::{self, LocationSync};
use crate::widgets;

/// Repaint interval while requests are in flight, so results show up without
/// waiting for input.
const POLL_INTERVAL: Duration = Duration::from_millis(50);

pub struct UserDeskApp {
    state: State,
    location_sync: LocationSync,
}

impl UserDeskApp {
    /// Called once before the first frame.
    pub fn new(state: State) -> Self {
        let location_sync = LocationSync::new(state.ctx.state::<Location>());
        Self {
            state,
            location_sync,
        }
    }

    pub fn state(&self) -> &State {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut State {
        &mut self.state
    }

    fn navigate(&mut self, route: Route) {
        info!("Navigating to {}", route.path());
        self.state
            .ctx
            .update::<Location>(|location| location.navigate(route));
    }

    #[cfg(target_arch = "wasm32")]
    fn follow_browser(&mut self) {
        if let Some(href) = location::browser::href()
            && let Some(adopted) = self.location_sync.external(&href)
        {
            info!("Address changed to {href}");
            self.state
                .ctx
                .update::<Location>(|location| *location = adopted);
        }
    }

    fn publish_location(&mut self) {
        let Some(href) = self
            .location_sync
            .changed(self.state.ctx.state::<Location>())
        else {
            return;
        };
        debug!("Location is now {href}");
        #[cfg(target_arch = "wasm32")]
        location::browser::push(&href);
    }
}

impl eframe::App for UserDeskApp {
    /// Called each time the UI needs repainting, which may be many times per second.
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        #[cfg(target_arch = "wasm32")]
        self.follow_browser();

        // Apply finished requests before rendering
        self.state.ctx.sync_computes();

        let current = self.state.ctx.state::<Location>().route;
        let mut navigate_to = None;

        egui::TopBottomPanel::top("top_panel").show(ctx, |ui| {
            egui::MenuBar::new().ui(ui, |ui| {
                navigate_to = widgets::nav_bar(ui, current);
            });
        });

        egui::CentralPanel::default().show(ctx, |ui| {
            egui::ScrollArea::vertical().show(ui, |ui| match current {
                Route::Home => {
                    if let (_, Some(route)) = pages::home_page(ui) {
                        navigate_to = Some(route);
                    }
                }
                Route::Users => {
                    pages::users_page(&mut self.state, ui);
                }
                Route::About => {
                    pages::about_page(ui);
                }
            });
        });

        if let Some(route) = navigate_to {
            self.navigate(route);
        }
        self.publish_location();

        // Run background jobs
        self.state.ctx.flush_commands();
        if self.state.ctx.task_count() > 0 {
            ctx.request_repaint_after(POLL_INTERVAL);
        }
    }

    fn save(&mut self, storage: &mut dyn eframe::Storage) {
        location::persist(storage, self.state.ctx.state::<Location>());
    }
}
