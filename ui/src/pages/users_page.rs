//! Users page.
//!
//! Selection, edit mode and create-form visibility are read from
//! [`Location`]; the widgets only report events. Events are collected while
//! rendering and applied afterwards, so every mutation of the context happens
//! in one place at the end of the frame.

use egui::{Align2, Button, Frame, Margin, Response, RichText, Ui, Window};
use log::debug;
use userdesk_business::Location;
use userdesk_business::users::{
    CreateUserCompute, CreateUserRequest, DeleteUserCompute, FetchStatus, UpdateUserCompute,
    UpdateUserRequest,
    UserDetailCompute, UserListCompute, UserListInput, UsersViewCompute, ViewMode,
    ensure_user_detail, ensure_user_list, reset_create, reset_update, submit_create,
    submit_delete, submit_update,
};
use userdesk_states::StateCtx;
use ustr::Ustr;

use crate::state::State;
use crate::utils::colors::{COLOR_AMBER, COLOR_RED};
use crate::widgets::{
    CreateUserForm, EditFormEvent, EditUserForm, UserDetailEvent, UserListEvent, UserListProps,
    user_create_form, user_detail, user_edit_form, user_list,
};

/// Page-local UI state that does not belong in the address.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UsersPageState {
    pub create_form: CreateUserForm,
    pub edit_form: EditUserForm,
    /// User waiting for the delete confirmation.
    pub pending_delete: Option<Ustr>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum PageAction {
    ToggleCreate,
    Refresh,
    Select(Ustr),
    AskDelete(Ustr),
    ConfirmDelete(Ustr),
    CancelDelete,
    StartEdit,
    CancelEdit,
    Create(CreateUserRequest),
    Update(Ustr, UpdateUserRequest),
    PrevPage,
    NextPage(u64),
}

/// Renders the users page and queues whatever fetches and mutations it needs.
/// The caller flushes the queued commands.
pub fn users_page(state: &mut State, ui: &mut Ui) -> Response {
    let State { ctx, users_page } = state;

    ensure_user_list(ctx);
    ensure_user_detail(ctx);
    ctx.sync_computes();

    let mut action = None;
    let response = ui
        .vertical(|ui| {
            render_header(ctx, ui, &mut action);

            if ctx.state::<Location>().users.show_create {
                card(ui, |ui| {
                    ui.heading("Create New User");
                    ui.add_space(8.0);
                    let status = &ctx.compute::<CreateUserCompute>().status;
                    if let Some(request) = user_create_form(ui, &mut users_page.create_form, status)
                    {
                        action = Some(PageAction::Create(request));
                    }
                });
                ui.add_space(12.0);
            }

            ui.columns(2, |columns| {
                card(&mut columns[0], |ui| render_list(ctx, ui, &mut action));
                card(&mut columns[1], |ui| {
                    render_detail(ctx, &mut users_page.edit_form, ui, &mut action);
                });
            });
        })
        .response;

    if let Some(id) = users_page.pending_delete {
        render_delete_confirmation(id, ui, &mut action);
    }

    if !matches!(ctx.compute::<UsersViewCompute>().mode, ViewMode::Editing(_)) {
        users_page.edit_form.reset();
    }

    if let Some(action) = action {
        apply(ctx, users_page, action);
    }

    response
}

fn card(ui: &mut Ui, add_contents: impl FnOnce(&mut Ui)) {
    Frame::group(ui.style())
        .inner_margin(Margin::same(12))
        .show(ui, |ui| {
            ui.set_width(ui.available_width());
            add_contents(ui);
        });
}

fn render_header(ctx: &StateCtx, ui: &mut Ui, action: &mut Option<PageAction>) {
    ui.heading("Users");
    ui.weak("Manage your users here.");
    ui.add_space(8.0);

    let show_create = ctx.state::<Location>().users.show_create;
    let is_fetching = ctx.compute::<UserListCompute>().cache.is_fetching();

    ui.horizontal(|ui| {
        let label = if show_create { "Hide Form" } else { "Create User" };
        if ui.button(label).clicked() {
            *action = Some(PageAction::ToggleCreate);
        }
        if ui.add_enabled(!is_fetching, Button::new("Refresh")).clicked() {
            *action = Some(PageAction::Refresh);
        }
    });
    ui.add_space(12.0);
}

fn render_list(ctx: &StateCtx, ui: &mut Ui, action: &mut Option<PageAction>) {
    let cache = &ctx.compute::<UserListCompute>().cache;
    let list = cache.data();

    let props = UserListProps {
        users: list.map(|list| list.users.as_slice()),
        total: list.map(|list| list.total),
        is_loading: cache.is_loading(),
        error: cache.error(),
        selected: ctx.state::<Location>().users.user_id,
        is_deleting: ctx.compute::<DeleteUserCompute>().status.is_pending(),
    };

    match user_list(ui, props) {
        Some(UserListEvent::Select(id)) => *action = Some(PageAction::Select(id)),
        Some(UserListEvent::Delete(id)) => *action = Some(PageAction::AskDelete(id)),
        None => {}
    }

    let input = ctx.state::<UserListInput>();
    if let Some(total) = list.map(|list| list.total)
        && total > u64::from(input.limit)
    {
        ui.add_space(8.0);
        ui.horizontal(|ui| {
            if ui
                .add_enabled(input.has_prev(), Button::new("Previous"))
                .clicked()
            {
                *action = Some(PageAction::PrevPage);
            }
            let (page, pages) = input.page_of(total);
            ui.label(format!("Page {page} of {pages}"));
            if ui
                .add_enabled(input.has_next(total), Button::new("Next"))
                .clicked()
            {
                *action = Some(PageAction::NextPage(total));
            }
        });
    }
}

fn render_detail(
    ctx: &StateCtx,
    edit_form: &mut EditUserForm,
    ui: &mut Ui,
    action: &mut Option<PageAction>,
) {
    ui.heading("User Details");
    ui.add_space(8.0);

    let mode = ctx.compute::<UsersViewCompute>().mode;
    let Some(id) = mode.selected() else {
        ui.weak("Select a user to view details.");
        return;
    };

    let detail = ctx.compute::<UserDetailCompute>();
    let Some(user) = detail.user(id) else {
        match &detail.cache.status {
            FetchStatus::Idle | FetchStatus::Loading => {
                ui.horizontal(|ui| {
                    ui.spinner();
                    ui.label("Loading user...");
                });
            }
            FetchStatus::Error(failed) => {
                ui.colored_label(
                    COLOR_RED,
                    format!("Error: {}", failed.message_or("Failed to load user")),
                );
            }
            // Answered, but not with the selected user.
            FetchStatus::Loaded => {
                ui.colored_label(COLOR_RED, "Error: Failed to load user");
            }
        }
        return;
    };

    if let ViewMode::Editing(_) = mode {
        let status = &ctx.compute::<UpdateUserCompute>().status;
        match user_edit_form(ui, edit_form, user, status) {
            Some(EditFormEvent::Submit(id, request)) => {
                *action = Some(PageAction::Update(id, request));
            }
            Some(EditFormEvent::Cancel) => *action = Some(PageAction::CancelEdit),
            None => {}
        }
    } else {
        let is_deleting = ctx.compute::<DeleteUserCompute>().status.is_pending();
        match user_detail(ui, user, is_deleting) {
            Some(UserDetailEvent::Edit) => *action = Some(PageAction::StartEdit),
            Some(UserDetailEvent::Delete(id)) => *action = Some(PageAction::AskDelete(id)),
            None => {}
        }
    }
}

fn render_delete_confirmation(id: Ustr, ui: &mut Ui, action: &mut Option<PageAction>) {
    let mut open = true;

    Window::new("Confirm Delete")
        .open(&mut open)
        .collapsible(false)
        .resizable(false)
        .anchor(Align2::CENTER_CENTER, [0.0, 0.0])
        .show(ui.ctx(), |ui| {
            ui.colored_label(COLOR_AMBER, "⚠ Warning");
            ui.add_space(4.0);
            ui.label("Are you sure you want to delete this user?");
            ui.label("This action cannot be undone.");
            ui.add_space(12.0);

            ui.horizontal(|ui| {
                if ui
                    .button(RichText::new("Yes, delete").color(COLOR_RED))
                    .clicked()
                {
                    *action = Some(PageAction::ConfirmDelete(id));
                }
                if ui.button("Keep user").clicked() {
                    *action = Some(PageAction::CancelDelete);
                }
            });
        });

    if !open {
        *action = Some(PageAction::CancelDelete);
    }
}

fn apply(ctx: &mut StateCtx, page: &mut UsersPageState, action: PageAction) {
    debug!("Users page action: {action:?}");

    match action {
        PageAction::ToggleCreate => {
            if !ctx.state::<Location>().users.show_create {
                page.create_form.clear();
                reset_create(ctx);
            }
            ctx.update::<Location>(|location| location.users.toggle_create());
        }
        PageAction::Refresh => {
            ctx.update_compute::<UserListCompute>(|compute| compute.cache.invalidate());
            ctx.update_compute::<UserDetailCompute>(|compute| compute.cache.invalidate());
        }
        PageAction::Select(id) => {
            ctx.update::<Location>(|location| location.users.select(id));
        }
        PageAction::AskDelete(id) => page.pending_delete = Some(id),
        PageAction::ConfirmDelete(id) => {
            page.pending_delete = None;
            submit_delete(ctx, id);
        }
        PageAction::CancelDelete => page.pending_delete = None,
        PageAction::StartEdit => {
            reset_update(ctx);
            ctx.update::<Location>(|location| location.users.start_edit());
        }
        PageAction::CancelEdit => {
            ctx.update::<Location>(|location| location.users.cancel_edit());
        }
        PageAction::Create(request) => submit_create(ctx, request),
        PageAction::Update(id, request) => submit_update(ctx, id, request),
        PageAction::PrevPage => ctx.update::<UserListInput>(UserListInput::prev_page),
        PageAction::NextPage(total) => {
            ctx.update::<UserListInput>(|input| input.next_page(total));
        }
    }
}

#[cfg(test)]
mod users_page_tests {
    use egui_kittest::Harness;
    use kittest::Queryable;
    use userdesk_business::UsersSearch;
    use userdesk_business::users::{MutationStatus, QueryCache, RequestFailed, User, UserList};

    use super::*;
    use crate::widgets::test_support::user;

    /// A state with nothing registered to the network; caches are filled by
    /// hand and commands are never flushed.
    fn offline_state(location: Location, users: Vec<User>) -> State {
        let mut state = State::test("http://127.0.0.1:9".to_owned());
        state.ctx.update::<Location>(|current| *current = location);

        let input = *state.ctx.state::<UserListInput>();
        let total = users.len() as u64;
        state.ctx.update_compute::<UserListCompute>(|compute| {
            compute.cache = QueryCache {
                key: Some(input),
                data: Some(UserList { users, total }),
                status: FetchStatus::Loaded,
                stale: false,
            };
        });
        state.ctx.sync_computes();
        state
    }

    fn with_detail(state: &mut State, user: User) {
        state.ctx.update_compute::<UserDetailCompute>(|compute| {
            compute.cache = QueryCache {
                key: Some(user.id),
                data: Some(user),
                status: FetchStatus::Loaded,
                stale: false,
            };
        });
        state.ctx.sync_computes();
    }

    fn harness<'a>(state: State) -> Harness<'a, State> {
        Harness::new_ui_state(
            |ui, state: &mut State| {
                users_page(state, ui);
            },
            state,
        )
    }

    fn selected(id: &str, is_edit: bool) -> Location {
        Location::users(UsersSearch {
            user_id: Some(Ustr::from(id)),
            show_create: false,
            is_edit,
        })
    }

    #[test]
    fn test_empty_list() {
        let harness = harness(offline_state(Location::users(UsersSearch::default()), vec![]));

        assert!(harness.query_by_label_contains("No users found").is_some());
        assert!(harness.query_by_label("Total users: 0").is_some());
        assert!(
            harness
                .query_by_label("Select a user to view details.")
                .is_some()
        );
    }

    #[test]
    fn test_selecting_user_updates_location() {
        let users = vec![
            user("1", "John Doe", "john@example.com"),
            user("2", "Jane Smith", "jane@example.com"),
        ];
        let mut harness = harness(offline_state(Location::users(UsersSearch::default()), users));

        harness.get_by_label("Jane Smith").click();
        harness.step();

        let location = harness.state().ctx.state::<Location>();
        assert_eq!(location.users.user_id, Some(Ustr::from("2")));
        assert_eq!(location.to_href(), "/users?userId=2");
    }

    #[test]
    fn test_create_button_toggles_form() {
        let mut harness = harness(offline_state(Location::users(UsersSearch::default()), vec![]));
        assert!(harness.query_by_label("Create New User").is_none());

        harness.get_by_label("Create User").click();
        harness.step();
        harness.step();

        assert!(harness.state().ctx.state::<Location>().users.show_create);
        assert!(harness.query_by_label("Create New User").is_some());

        harness.get_by_label("Hide Form").click();
        harness.step();
        assert!(!harness.state().ctx.state::<Location>().users.show_create);
    }

    #[test]
    fn test_create_submission_marks_pending() {
        let location = Location::users(UsersSearch {
            show_create: true,
            ..UsersSearch::default()
        });
        let mut state = offline_state(location, vec![]);
        state.users_page.create_form.name = "John Doe".to_owned();
        state.users_page.create_form.email = "john@example.com".to_owned();
        let mut harness = harness(state);

        harness.get_by_label("Create").click();
        harness.step();
        harness.step();

        assert!(
            harness
                .state()
                .ctx
                .compute::<CreateUserCompute>()
                .status
                .is_pending()
        );
        assert!(harness.query_by_label("Creating...").is_some());
    }

    #[test]
    fn test_list_delete_asks_for_confirmation() {
        let users = vec![user("7", "John Doe", "john@example.com")];
        let mut harness = harness(offline_state(Location::users(UsersSearch::default()), users));

        harness.get_by_label("Delete").click();
        harness.step();
        harness.step();

        assert_eq!(
            harness.state().users_page.pending_delete,
            Some(Ustr::from("7"))
        );
        assert_eq!(
            harness.state().ctx.state::<Location>().users.user_id,
            None,
            "Delete must not select the row"
        );
        assert!(
            harness
                .query_by_label("Are you sure you want to delete this user?")
                .is_some()
        );
        assert!(
            !harness
                .state()
                .ctx
                .compute::<DeleteUserCompute>()
                .status
                .is_pending(),
            "nothing is deleted before confirmation"
        );
    }

    #[test]
    fn test_confirming_delete_submits_and_cancel_does_not() {
        let users = vec![user("7", "John Doe", "john@example.com")];
        let mut state = offline_state(Location::users(UsersSearch::default()), users);
        state.users_page.pending_delete = Some(Ustr::from("7"));
        let mut harness = harness(state);

        harness.get_by_label("Keep user").click();
        harness.step();
        assert_eq!(harness.state().users_page.pending_delete, None);
        assert_eq!(
            harness.state().ctx.compute::<DeleteUserCompute>().status,
            MutationStatus::Idle
        );

        harness.state_mut().users_page.pending_delete = Some(Ustr::from("7"));
        harness.step();
        harness.step();
        harness.get_by_label("Yes, delete").click();
        harness.step();

        assert!(
            harness
                .state()
                .ctx
                .compute::<DeleteUserCompute>()
                .status
                .is_pending()
        );
    }

    #[test]
    fn test_selected_user_detail_and_edit_transition() {
        let john = user("123", "John Doe", "john@example.com");
        let mut state = offline_state(selected("123", false), vec![john.clone()]);
        with_detail(&mut state, john);
        let mut harness = harness(state);

        assert!(harness.query_by_label("Delete User").is_some());

        harness.get_by_label("Edit").click();
        harness.step();
        harness.step();

        assert!(harness.state().ctx.state::<Location>().users.is_edit);
        assert_eq!(
            harness.state().ctx.compute::<UsersViewCompute>().mode,
            ViewMode::Editing(Ustr::from("123"))
        );
        assert!(harness.query_by_label("Update").is_some());

        harness.get_by_label("Cancel").click();
        harness.step();
        assert!(!harness.state().ctx.state::<Location>().users.is_edit);
    }

    #[test]
    fn test_detail_error_is_shown() {
        let mut state = offline_state(selected("9", false), vec![]);
        state.ctx.update_compute::<UserDetailCompute>(|compute| {
            compute.cache.begin(Ustr::from("9"));
            compute
                .cache
                .resolve(&Ustr::from("9"), Err(RequestFailed::new("user not found")));
        });
        let harness = harness(state);

        assert!(harness.query_by_label("Error: user not found").is_some());
    }

    #[test]
    fn test_detail_for_another_user_is_an_error() {
        let mut state = offline_state(selected("9", false), vec![]);
        state.ctx.update_compute::<UserDetailCompute>(|compute| {
            compute.cache = QueryCache {
                key: Some(Ustr::from("9")),
                data: Some(user("8", "John Doe", "john@example.com")),
                status: FetchStatus::Loaded,
                stale: false,
            };
        });
        state.ctx.sync_computes();
        let harness = harness(state);

        assert!(harness.query_by_label("Error: Failed to load user").is_some());
        assert!(harness.query_by_label("Loading user...").is_none());
        assert!(harness.query_by_label("john@example.com").is_none());
    }

    #[test]
    fn test_pagination_controls() {
        let users = (0..10)
            .map(|i| user(&i.to_string(), &format!("User {i}"), &format!("user{i}@example.com")))
            .collect();
        let mut state = offline_state(Location::users(UsersSearch::default()), users);
        state.ctx.update_compute::<UserListCompute>(|compute| {
            if let Some(list) = compute.cache.data.as_mut() {
                list.total = 25;
            }
        });
        let mut harness = harness(state);

        assert!(harness.query_by_label("Page 1 of 3").is_some());

        harness.get_by_label("Next").click();
        harness.step();

        assert_eq!(harness.state().ctx.state::<UserListInput>().offset, 10);
    }
}
