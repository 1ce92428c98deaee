//! Client-side routing.
//!
//! [`Location`] is the single source of truth for which page is shown and,
//! on the users page, which user is selected, whether it is being edited and
//! whether the create form is open. It round-trips through an href such as
//! `/users?userId=42&isEdit=true` so it survives refreshes and navigation.

use std::any::Any;

use log::debug;
use userdesk_states::{State, assign_impl};
use ustr::Ustr;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Route {
    #[default]
    Home,
    Users,
    About,
}

impl Route {
    pub const ALL: [Self; 3] = [Self::Home, Self::Users, Self::About];

    pub fn path(self) -> &'static str {
        match self {
            Self::Home => "/",
            Self::Users => "/users",
            Self::About => "/about",
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            Self::Home => "Home",
            Self::Users => "Users",
            Self::About => "About",
        }
    }

    fn from_path(path: &str) -> Option<Self> {
        match path.trim_end_matches('/') {
            "" => Some(Self::Home),
            "/users" => Some(Self::Users),
            "/about" => Some(Self::About),
            _ => None,
        }
    }
}

/// Search parameters of the users route.
///
/// Invariant: `is_edit` implies `user_id.is_some()`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UsersSearch {
    pub user_id: Option<Ustr>,
    pub show_create: bool,
    pub is_edit: bool,
}

impl UsersSearch {
    /// Selects a user in view mode.
    pub fn select(&mut self, id: Ustr) {
        self.user_id = Some(id);
        self.is_edit = false;
    }

    /// No-op without a selection.
    pub fn start_edit(&mut self) {
        self.is_edit = self.user_id.is_some();
    }

    pub fn cancel_edit(&mut self) {
        self.is_edit = false;
    }

    pub fn toggle_create(&mut self) {
        self.show_create = !self.show_create;
    }

    pub fn hide_create(&mut self) {
        self.show_create = false;
    }

    pub fn clear_selection(&mut self) {
        self.user_id = None;
        self.is_edit = false;
    }

    fn from_pairs<'a>(pairs: impl Iterator<Item = (&'a str, &'a str)>) -> Self {
        let mut search = Self::default();
        let mut wants_edit = false;

        for (key, value) in pairs {
            match key {
                "userId" => {
                    let value = value.trim();
                    if value.is_empty() {
                        debug!("Dropping empty userId search param");
                    } else {
                        search.user_id = Some(Ustr::from(value));
                    }
                }
                "showCreate" => match parse_flag(value) {
                    Some(flag) => search.show_create = flag,
                    None => debug!("Dropping malformed showCreate={value:?}"),
                },
                "isEdit" => match parse_flag(value) {
                    Some(flag) => wants_edit = flag,
                    None => debug!("Dropping malformed isEdit={value:?}"),
                },
                _ => debug!("Ignoring unknown search param {key:?}"),
            }
        }

        search.is_edit = wants_edit && search.user_id.is_some();
        search
    }

    fn to_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        if let Some(id) = self.user_id {
            pairs.push(("userId", id.to_string()));
        }
        if self.show_create {
            pairs.push(("showCreate", "true".to_owned()));
        }
        if self.is_edit && self.user_id.is_some() {
            pairs.push(("isEdit", "true".to_owned()));
        }
        pairs
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value {
        "true" => Some(true),
        "false" => Some(false),
        _ => None,
    }
}

/// The current route plus its search state.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Location {
    pub route: Route,
    /// Only meaningful on [`Route::Users`]; kept while visiting other pages.
    pub users: UsersSearch,
}

impl Location {
    pub fn users(search: UsersSearch) -> Self {
        Self {
            route: Route::Users,
            users: search,
        }
    }

    /// Parses a path with optional query, or a full URL. Unknown paths fall
    /// back to the home page and invalid search params are dropped.
    pub fn parse(href: &str) -> Self {
        let Ok(base) = reqwest::Url::parse("http://localhost/") else {
            return Self::default();
        };
        let url = match reqwest::Url::options().base_url(Some(&base)).parse(href) {
            Ok(url) => url,
            Err(err) => {
                debug!("Cannot parse location {href:?}: {err}");
                return Self::default();
            }
        };

        let Some(route) = Route::from_path(url.path()) else {
            debug!("Unknown path {:?}, showing home", url.path());
            return Self::default();
        };

        let users = if route == Route::Users {
            let pairs: Vec<(String, String)> = url.query_pairs().into_owned().collect();
            UsersSearch::from_pairs(pairs.iter().map(|(k, v)| (k.as_str(), v.as_str())))
        } else {
            UsersSearch::default()
        };

        Self { route, users }
    }

    pub fn to_href(&self) -> String {
        let path = self.route.path();
        if self.route != Route::Users {
            return path.to_owned();
        }

        let pairs = self.users.to_pairs();
        if pairs.is_empty() {
            return path.to_owned();
        }

        let mut query = reqwest::Url::parse("http://localhost/").map_or_else(
            |_| String::new(),
            |mut url| {
                url.query_pairs_mut().extend_pairs(&pairs);
                url.query().unwrap_or_default().to_owned()
            },
        );
        query.insert(0, '?');
        format!("{path}{query}")
    }

    pub fn navigate(&mut self, route: Route) {
        self.route = route;
    }
}

impl State for Location {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }

    fn assign_box(&mut self, new_self: Box<dyn Any + Send>) {
        assign_impl(self, new_self);
    }

    fn snapshot(&self) -> Option<Box<dyn Any + Send>> {
        Some(Box::new(self.clone()))
    }
}
