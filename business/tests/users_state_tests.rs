//! Unit tests for the users state types through the public API.

use userdesk_business::users::{
    FetchStatus, MutationStatus, QueryCache, RequestFailed, UpdateUserRequest, UserListInput,
    UsersViewCompute, ViewMode,
};
use userdesk_business::{BusinessConfig, Location, Route, UsersSearch, register_users};
use userdesk_states::StateCtx;
use ustr::Ustr;

fn registered(location: Location) -> StateCtx {
    let mut ctx = StateCtx::new();
    register_users(
        &mut ctx,
        BusinessConfig::new("http://127.0.0.1:9"),
        location,
    );
    ctx.sync_computes();
    ctx
}

/// Tests for the derived view mode
mod view_mode_tests {
    use super::*;

    #[test]
    fn test_view_mode_without_selection() {
        let ctx = registered(Location::default());
        assert_eq!(ctx.compute::<UsersViewCompute>().mode, ViewMode::NoSelection);
    }

    #[test]
    fn test_view_mode_follows_location_updates() {
        let mut ctx = registered(Location::users(UsersSearch::default()));

        ctx.update::<Location>(|location| location.users.select(Ustr::from("42")));
        ctx.sync_computes();
        assert_eq!(
            ctx.compute::<UsersViewCompute>().mode,
            ViewMode::Viewing(Ustr::from("42"))
        );

        ctx.update::<Location>(|location| location.users.clear_selection());
        ctx.sync_computes();
        assert_eq!(ctx.compute::<UsersViewCompute>().mode, ViewMode::NoSelection);
    }

    #[test]
    fn test_edit_flag_without_loaded_detail_stays_viewing() {
        let ctx = registered(Location::parse("/users?userId=9&isEdit=true"));
        assert_eq!(
            ctx.compute::<UsersViewCompute>().mode,
            ViewMode::Viewing(Ustr::from("9"))
        );
        assert_eq!(ctx.compute::<UsersViewCompute>().mode.selected(), Some(Ustr::from("9")));
    }
}

/// Tests for registration defaults
mod registration_tests {
    use super::*;

    #[test]
    fn test_register_users_passes_location_through() {
        let ctx = registered(Location::parse("/about"));
        assert_eq!(ctx.state::<Location>().route, Route::About);
    }

    #[test]
    fn test_register_users_uses_configured_page_size() {
        let mut ctx = StateCtx::new();
        let mut config = BusinessConfig::new("http://127.0.0.1:9");
        config.page_size = 25;
        register_users(&mut ctx, config, Location::default());

        assert_eq!(ctx.state::<UserListInput>().limit, 25);
        assert_eq!(ctx.state::<UserListInput>().offset, 0);
    }

    #[test]
    fn test_registered_graph_has_no_cycles() {
        let ctx = registered(Location::default());
        assert!(ctx.verify_deps().is_ok());
    }
}

/// Tests for the query cache
mod query_cache_tests {
    use super::*;

    #[test]
    fn test_error_is_not_refetched_until_invalidated() {
        let mut cache: QueryCache<u32, String> = QueryCache::default();
        cache.begin(1);
        cache.resolve(&1, Err(RequestFailed::new("boom")));

        assert_eq!(cache.status, FetchStatus::Error(RequestFailed::new("boom")));
        assert!(!cache.needs_fetch(&1));

        cache.invalidate();
        assert!(cache.needs_fetch(&1));
    }

    #[test]
    fn test_mutation_status_default_is_idle() {
        let status = MutationStatus::default();
        assert!(!status.is_pending());
        assert!(!status.is_success());
        assert!(status.error().is_none());
    }

    #[test]
    fn test_request_failed_falls_back_without_message() {
        let failed = RequestFailed::default();
        assert_eq!(failed.message_or("Failed to load users"), "Failed to load users");
    }
}

/// Tests for the update request built from edit fields
mod update_request_tests {
    use super::*;

    #[test]
    fn test_blank_fields_are_omitted() {
        let request = UpdateUserRequest::from_fields("  ", "jane@example.com");
        assert_eq!(request.name, None);
        assert_eq!(request.email.as_deref(), Some("jane@example.com"));
        assert!(!request.is_empty());
    }

    #[test]
    fn test_all_blank_is_empty() {
        assert!(UpdateUserRequest::from_fields("", "").is_empty());
    }
}
