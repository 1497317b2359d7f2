// Digital Library - storage core and REST backend
// Copyright (C) 2025 Henning Berge
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the
// GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License
// along with this program. If not, see <https://www.gnu.org/licenses/>.


//! HTTP error mapping
//!
//! Storage errors keep their status semantics (404, 409, 504, 500) but only
//! not-found and timeout errors are echoed verbatim. Conflicts and backend
//! failures get a fixed message; the full error goes to the log.

use axum::{
    extract::rejection::{JsonRejection, PathRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

use crate::error::LibraryError;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("{0}")]
    Library(#[from] LibraryError),
    /// Malformed path, query or body
    #[error("{0}")]
    BadRequest(String),
}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Library(e) => match e {
                LibraryError::NotFound { .. } => StatusCode::NOT_FOUND,
                LibraryError::Conflict { .. } => StatusCode::CONFLICT,
                LibraryError::Timeout { .. } => StatusCode::GATEWAY_TIMEOUT,
                _ => StatusCode::INTERNAL_SERVER_ERROR,
            },
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
        }
    }

    /// Text sent to the client, without driver messages
    pub fn public_message(&self) -> String {
        match self {
            ApiError::BadRequest(reason) => reason.clone(),
            ApiError::Library(e) => match e {
                LibraryError::NotFound { .. } | LibraryError::Timeout { .. } => e.to_string(),
                LibraryError::Conflict {
                    entity,
                    operation,
                    key,
                    ..
                } => format!("can't {operation} {entity} {key}: key constraint violated"),
                _ => "internal storage error".to_string(),
            },
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        tracing::error!(status = status.as_u16(), error = %self, "request failed");

        let body = Json(ErrorBody {
            error: self.public_message(),
        });
        (status, body).into_response()
    }
}

pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn conflict() -> LibraryError {
        LibraryError::Conflict {
            entity: "book",
            operation: "post",
            key: "10".into(),
            message: "UNIQUE constraint failed: books.id".into(),
        }
    }

    #[test]
    fn test_status_mapping() {
        let status = |e: LibraryError| ApiError::from(e).status();

        assert_eq!(status(LibraryError::not_found("user", 1)), StatusCode::NOT_FOUND);
        assert_eq!(status(conflict()), StatusCode::CONFLICT);
        assert_eq!(
            status(LibraryError::Timeout {
                entity: "book",
                operation: "get",
                after: Duration::from_secs(1),
            }),
            StatusCode::GATEWAY_TIMEOUT
        );
        assert_eq!(
            status(LibraryError::store("book", "get", sqlx::Error::PoolClosed)),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            ApiError::BadRequest("bad id".into()).status(),
            StatusCode::BAD_REQUEST
        );
    }

    #[test]
    fn test_public_message_hides_driver_text() {
        let message = ApiError::from(conflict()).public_message();
        assert_eq!(message, "can't post book 10: key constraint violated");
        assert!(!message.contains("UNIQUE"));

        let message =
            ApiError::from(LibraryError::store("book", "get", sqlx::Error::PoolClosed))
                .public_message();
        assert_eq!(message, "internal storage error");

        let message = ApiError::from(LibraryError::not_found("user", 1)).public_message();
        assert_eq!(message, "user with key 1 not found");
    }
}
