//! Request/response cache primitives shared by the users queries and
//! mutations.

use crate::users::api::UsersApiError;

/// A failed request as the UI sees it: an optional server message.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestFailed {
    pub message: Option<String>,
}

impl RequestFailed {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: Some(message.into()),
        }
    }

    pub fn message_or<'a>(&'a self, fallback: &'a str) -> &'a str {
        self.message.as_deref().unwrap_or(fallback)
    }
}

impl From<&UsersApiError> for RequestFailed {
    fn from(err: &UsersApiError) -> Self {
        Self {
            message: err.user_message().map(str::to_owned),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum FetchStatus {
    #[default]
    Idle,
    Loading,
    Loaded,
    Error(RequestFailed),
}

/// Cached result of a keyed query.
///
/// Data from the previous fetch of the same key stays visible while a
/// refetch is in flight.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryCache<K, T> {
    pub key: Option<K>,
    pub data: Option<T>,
    pub status: FetchStatus,
    /// Set by invalidation; the next read triggers a refetch.
    pub stale: bool,
}

impl<K, T> Default for QueryCache<K, T> {
    fn default() -> Self {
        Self {
            key: None,
            data: None,
            status: FetchStatus::Idle,
            stale: false,
        }
    }
}

impl<K: PartialEq, T> QueryCache<K, T> {
    pub fn needs_fetch(&self, key: &K) -> bool {
        if self.status == FetchStatus::Loading && self.key.as_ref() == Some(key) {
            return false;
        }
        self.stale || self.key.as_ref() != Some(key)
    }

    pub fn begin(&mut self, key: K) {
        if self.key.as_ref() != Some(&key) {
            self.data = None;
        }
        self.key = Some(key);
        self.status = FetchStatus::Loading;
        self.stale = false;
    }

    /// Stores a result. Ignored when the cache has moved on to another key.
    pub fn resolve(&mut self, key: &K, result: Result<T, RequestFailed>) {
        if self.key.as_ref() != Some(key) {
            return;
        }
        match result {
            Ok(data) => {
                self.data = Some(data);
                self.status = FetchStatus::Loaded;
            }
            Err(failed) => {
                self.data = None;
                self.status = FetchStatus::Error(failed);
            }
        }
    }

    pub fn invalidate(&mut self) {
        self.stale = true;
    }

    pub fn reset(&mut self) {
        *self = Self {
            key: None,
            data: None,
            status: FetchStatus::Idle,
            stale: false,
        };
    }

    pub fn data(&self) -> Option<&T> {
        self.data.as_ref()
    }

    /// Loading with nothing to show yet.
    pub fn is_loading(&self) -> bool {
        self.status == FetchStatus::Loading && self.data.is_none()
    }

    pub fn is_fetching(&self) -> bool {
        self.status == FetchStatus::Loading
    }

    pub fn error(&self) -> Option<&RequestFailed> {
        match &self.status {
            FetchStatus::Error(failed) => Some(failed),
            FetchStatus::Idle | FetchStatus::Loading | FetchStatus::Loaded => None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum MutationStatus {
    #[default]
    Idle,
    Pending,
    Success,
    Error(RequestFailed),
}

impl MutationStatus {
    pub fn is_pending(&self) -> bool {
        matches!(self, Self::Pending)
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success)
    }

    pub fn error(&self) -> Option<&RequestFailed> {
        match self {
            Self::Error(failed) => Some(failed),
            Self::Idle | Self::Pending | Self::Success => None,
        }
    }
}
