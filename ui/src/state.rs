use log::{error, warn};
use userdesk_business::{BusinessConfig, Location, register_users};
use userdesk_states::StateCtx;

use crate::pages::UsersPageState;

/// The main application state.
pub struct State {
    /// The state context for business logic.
    pub ctx: StateCtx,
    /// Drafts and the pending delete confirmation of the users page.
    pub users_page: UsersPageState,
}

impl Default for State {
    fn default() -> Self {
        Self::from_env(Location::default())
    }
}

impl State {
    /// Configuration from `API_BASE_URL`/`PAGE_SIZE`, defaults when invalid.
    pub fn from_env(location: Location) -> Self {
        let config = BusinessConfig::from_env().unwrap_or_else(|err| {
            warn!("Ignoring invalid configuration: {err:#}");
            BusinessConfig::default()
        });
        Self::new(config, location)
    }

    pub fn new(config: BusinessConfig, location: Location) -> Self {
        let mut ctx = StateCtx::new();
        register_users(&mut ctx, config, location);
        if let Err(err) = ctx.verify_deps() {
            error!("Compute graph is invalid: {err}");
        }
        ctx.sync_computes();

        Self {
            ctx,
            users_page: UsersPageState::default(),
        }
    }

    pub fn test(base_url: String) -> Self {
        Self::new(BusinessConfig::new(base_url), Location::default())
    }
}
