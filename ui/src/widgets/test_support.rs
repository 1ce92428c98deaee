//! Fixtures shared by the widget and page tests.

use chrono::{TimeZone, Utc};
use userdesk_business::users::User;
use ustr::Ustr;

pub(crate) fn user(id: &str, name: &str, email: &str) -> User {
    let timestamp = Utc
        .with_ymd_and_hms(2024, 1, 1, 12, 0, 0)
        .single()
        .unwrap_or_default();
    User {
        id: Ustr::from(id),
        name: name.to_owned(),
        email: email.to_owned(),
        created_at: timestamp,
        updated_at: timestamp,
    }
}
