//! Request functions for `/api/v1/users`.
//!
//! Pure network IO: no state plumbing here. Commands call these and map the
//! results into compute updates.

use thiserror::Error;

use crate::http::{Client, HttpError, Response};
use crate::users::model::{CreateUserRequest, ErrorBody, UpdateUserRequest, User, UserList};

#[derive(Debug, Clone, Error)]
pub enum UsersApiError {
    #[error(transparent)]
    Transport(#[from] HttpError),
    #[error("API returned status {status}{}", message_suffix(.message))]
    Status {
        status: u16,
        message: Option<String>,
    },
    #[error("Failed to decode {what}: {reason}")]
    Decode { what: &'static str, reason: String },
}

impl UsersApiError {
    /// The message worth showing to a user, if the server sent one.
    pub fn user_message(&self) -> Option<&str> {
        match self {
            Self::Status { message, .. } => message.as_deref(),
            Self::Transport(_) | Self::Decode { .. } => None,
        }
    }
}

pub type ApiResult<T> = Result<T, UsersApiError>;

fn message_suffix(message: &Option<String>) -> String {
    message
        .as_deref()
        .map(|message| format!(": {message}"))
        .unwrap_or_default()
}

fn check(response: Response, expected: &[u16]) -> ApiResult<Response> {
    if expected.contains(&response.status) {
        return Ok(response);
    }
    let message = response
        .json::<ErrorBody>()
        .ok()
        .map(|body| body.message)
        .filter(|message| !message.trim().is_empty());
    Err(UsersApiError::Status {
        status: response.status,
        message,
    })
}

fn decode<T: serde::de::DeserializeOwned>(response: &Response, what: &'static str) -> ApiResult<T> {
    response.json().map_err(|err| UsersApiError::Decode {
        what,
        reason: err.to_string(),
    })
}

fn encode_error(err: &serde_json::Error) -> UsersApiError {
    UsersApiError::Decode {
        what: "request body",
        reason: err.to_string(),
    }
}

/// GET `/users?limit&offset`
pub async fn list_users(api_url: &str, limit: u32, offset: u64) -> ApiResult<UserList> {
    let response = Client::get(format!("{api_url}/users"))
        .query("limit", limit)
        .query("offset", offset)
        .send()
        .await?;

    let response = check(response, &[200])?;
    decode(&response, "user list")
}

/// GET `/users/{id}`
pub async fn get_user(api_url: &str, id: &str) -> ApiResult<User> {
    let response = Client::get(format!("{api_url}/users")).segment(id).send().await?;

    let response = check(response, &[200])?;
    decode(&response, "user")
}

/// POST `/users`, answered with 201 and no body.
pub async fn create_user(api_url: &str, request: &CreateUserRequest) -> ApiResult<()> {
    let response = Client::post(format!("{api_url}/users"))
        .json(request)
        .map_err(|err| encode_error(&err))?
        .send()
        .await?;

    check(response, &[200, 201]).map(|_| ())
}

/// PUT `/users/{id}`, answered with 204.
pub async fn update_user(api_url: &str, id: &str, request: &UpdateUserRequest) -> ApiResult<()> {
    let response = Client::put(format!("{api_url}/users"))
        .segment(id)
        .json(request)
        .map_err(|err| encode_error(&err))?
        .send()
        .await?;

    check(response, &[200, 204]).map(|_| ())
}

/// DELETE `/users/{id}`, answered with 204.
pub async fn delete_user(api_url: &str, id: &str) -> ApiResult<()> {
    let response = Client::delete(format!("{api_url}/users")).segment(id).send().await?;

    check(response, &[200, 204]).map(|_| ())
}
