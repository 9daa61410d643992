#![allow(non_snake_case)]

use axum::extract::rejection::JsonRejection;
use axum::http::{StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use axum::Json;

use serde::Serialize;

use crate::store::StoreError;

pub type Payload<T> = Result<(StatusCode, Json<Success<T>>), Error>;

pub async fn handler404(path: Uri) -> Error {
    Error::InvalidPath(format!("Invalid path: {}", path))
}

pub fn Fine<V>(message: &'static str, value: V) -> Payload<V>
where
    V: Serialize,
{
    Ok((StatusCode::OK, Json(Success::of(message, value))))
}

pub fn Created<V>(message: &'static str, value: V) -> Payload<V>
where
    V: Serialize,
{
    Ok((StatusCode::CREATED, Json(Success::of(message, value))))
}

#[derive(Debug, Clone, Serialize)]
pub struct Success<V> {
    success: bool,
    message: &'static str,
    #[serde(flatten)]
    value: V,
}

impl<V: Serialize> Success<V> {
    pub fn of(message: &'static str, value: V) -> Self {
        Self {
            success: true,
            message,
            value,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Failure {
    success: bool,
    message: String,
}

/// Every failure a request can end in.
///
/// Domain variants carry their user-facing message. `Duplicate` and `Schema`
/// come out of the store and validation layers and get their message from
/// [`Error::translate`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    #[error("{0}")]
    Validation(String),
    #[error("{0}")]
    Conflict(String),
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    InvalidPath(String),
    #[error("{0}")]
    Internal(String),
    #[error("duplicate value for `{field}`")]
    Duplicate { field: String },
    #[error("{}", .0.join(", "))]
    Schema(Vec<String>),
    #[error("{message}")]
    Unknown { message: String },
}

impl Error {
    pub fn validation<S: Into<String>>(msg: S) -> Error {
        Error::Validation(msg.into())
    }

    pub fn unknown<S: Into<String>>(msg: S) -> Error {
        Error::Unknown {
            message: msg.into(),
        }
    }

    /// Maps the error onto the status code and message sent to the client.
    pub fn translate(&self) -> (StatusCode, String) {
        match self {
            // unknown records are reported as a bad request, only routes 404
            Error::Validation(message) | Error::Conflict(message) | Error::NotFound(message) => {
                (StatusCode::BAD_REQUEST, message.clone())
            }
            Error::InvalidPath(message) => (StatusCode::NOT_FOUND, message.clone()),
            Error::Internal(message) => (StatusCode::INTERNAL_SERVER_ERROR, message.clone()),
            Error::Duplicate { field } => {
                let message = match field.as_str() {
                    "email" => "Email ID already exists.".to_string(),
                    "student_id" => "Student ID already exists.".to_string(),
                    other => format!("A duplicate value was entered for the field: {}.", other),
                };
                (StatusCode::BAD_REQUEST, message)
            }
            Error::Schema(messages) => (StatusCode::BAD_REQUEST, messages.join(", ")),
            Error::Unknown { message } if message.trim().is_empty() => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Internal Server Error".to_string(),
            ),
            Error::Unknown { message } => (StatusCode::INTERNAL_SERVER_ERROR, message.clone()),
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let (status, message) = self.translate();
        if status.is_server_error() {
            log::error!("Request failed with {}: {}", status, message);
        }
        (
            status,
            Json(Failure {
                success: false,
                message,
            }),
        )
            .into_response()
    }
}

impl From<StoreError> for Error {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Duplicate { field } => Error::Duplicate { field },
            StoreError::Backend(message) => Error::Unknown { message },
        }
    }
}

impl From<JsonRejection> for Error {
    fn from(rejection: JsonRejection) -> Self {
        Error::Validation(rejection.to_string())
    }
}
