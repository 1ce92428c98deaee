//! Keeps [`Location`] outside the app in step with the one inside: eframe
//! storage on native, the address bar on the web.

use log::debug;
use userdesk_business::Location;

/// eframe storage key of the last visited href.
pub const LOCATION_KEY: &str = "userdesk_location";

/// The location saved by the previous run, if any.
pub fn restore(storage: Option<&dyn eframe::Storage>) -> Option<Location> {
    let href: String = eframe::get_value(storage?, LOCATION_KEY)?;
    debug!("Restoring location {href}");
    Some(Location::parse(&href))
}

pub fn persist(storage: &mut dyn eframe::Storage, location: &Location) {
    eframe::set_value(storage, LOCATION_KEY, &location.to_href());
}

/// Remembers the last href written out so unchanged frames cost nothing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LocationSync {
    last_href: String,
}

impl LocationSync {
    pub fn new(location: &Location) -> Self {
        Self {
            last_href: location.to_href(),
        }
    }

    /// The new href when `location` differs from the one last seen.
    pub fn changed(&mut self, location: &Location) -> Option<String> {
        let href = location.to_href();
        if href == self.last_href {
            return None;
        }
        self.last_href.clone_from(&href);
        Some(href)
    }

    /// Adopts an href that changed outside the app, e.g. browser back.
    pub fn external(&mut self, href: &str) -> Option<Location> {
        let location = Location::parse(href);
        let normalized = location.to_href();
        if normalized == self.last_href {
            return None;
        }
        self.last_href = normalized;
        Some(location)
    }
}

#[cfg(target_arch = "wasm32")]
pub mod browser {
    //! `window.location` and the History API.

    use log::warn;
    use userdesk_business::Location;
    use wasm_bindgen::JsValue;

    pub fn origin() -> Option<String> {
        web_sys::window()?.location().origin().ok()
    }

    /// Path and query of the address bar.
    pub fn href() -> Option<String> {
        let location = web_sys::window()?.location();
        let path = location.pathname().ok()?;
        let search = location.search().ok()?;
        Some(format!("{path}{search}"))
    }

    pub fn current() -> Option<Location> {
        href().map(|href| Location::parse(&href))
    }

    pub fn push(href: &str) {
        let Some(window) = web_sys::window() else {
            return;
        };
        match window.history() {
            Ok(history) => {
                if let Err(err) = history.push_state_with_url(&JsValue::NULL, "", Some(href)) {
                    warn!("pushState {href} failed: {err:?}");
                }
            }
            Err(err) => warn!("No history API: {err:?}"),
        }
    }
}
