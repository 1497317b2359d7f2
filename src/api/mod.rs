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


//! REST adapter over [`Storage`]
//!
//! Everything lives under `/api`. Handlers only translate between HTTP and
//! the storage facade; status codes come from [`error::ApiError`].

pub mod authors;
pub mod books;
pub mod error;
pub mod extract;
pub mod users;

use std::sync::Arc;

use axum::{http::StatusCode, Router};
use serde::Deserialize;
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};

use crate::config::HttpServerOptions;
use crate::storage::Storage;

/// `?cascade=true` on DELETE removes dependent junction rows too
#[derive(Debug, Default, Deserialize)]
pub struct DeleteParams {
    #[serde(default)]
    pub cascade: bool,
}

pub fn app_router(storage: Arc<Storage>, options: &HttpServerOptions) -> Router {
    let api = Router::new()
        .merge(users::router())
        .merge(books::router())
        .merge(authors::router());

    Router::new()
        .nest("/api", api)
        .with_state(storage)
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            options.timeout(),
        ))
        .layer(TraceLayer::new_for_http())
}
