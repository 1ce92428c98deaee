use std::any::Any;

use userdesk_states::{Compute, ComputeDeps, Dep, Updater, assign_impl};
use ustr::Ustr;

use crate::route::Location;
use crate::users::detail::UserDetailCompute;

/// What the detail pane of the users page shows.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ViewMode {
    #[default]
    NoSelection,
    Viewing(Ustr),
    Editing(Ustr),
}

impl ViewMode {
    pub fn selected(self) -> Option<Ustr> {
        match self {
            Self::NoSelection => None,
            Self::Viewing(id) | Self::Editing(id) => Some(id),
        }
    }
}

/// Reconciles the URL search state with the fetched detail. `isEdit` only
/// takes effect once the selected user has loaded.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UsersViewCompute {
    pub mode: ViewMode,
}

impl Compute for UsersViewCompute {
    fn deps(&self) -> ComputeDeps {
        ComputeDeps::none()
            .state::<Location>()
            .compute::<UserDetailCompute>()
    }

    fn compute(&self, deps: Dep<'_>, updater: Updater) {
        let search = &deps.get_state_ref::<Location>().users;
        let detail = deps.get_compute_ref::<UserDetailCompute>();

        let mode = match search.user_id {
            None => ViewMode::NoSelection,
            Some(id) if search.is_edit && detail.user(id).is_some() => ViewMode::Editing(id),
            Some(id) => ViewMode::Viewing(id),
        };

        if mode != self.mode {
            updater.set(Self { mode });
        }
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }

    fn assign_box(&mut self, new_self: Box<dyn Any + Send>) {
        assign_impl(self, new_self);
    }
}
