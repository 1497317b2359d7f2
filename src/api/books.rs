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


//! `/book` routes

use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};

use super::{
    error::ApiResult,
    extract::{JsonBody, PathParam, QueryParams},
    DeleteParams,
};
use crate::storage::{Book, Storage};

async fn get_book(
    PathParam(id): PathParam<i64>,
    State(storage): State<Arc<Storage>>,
) -> ApiResult<Json<Book>> {
    let book = storage.get_book(id).await?;
    tracing::debug!(id, "book fetched");
    Ok(Json(book))
}

async fn create_book(
    State(storage): State<Arc<Storage>>,
    JsonBody(book): JsonBody<Book>,
) -> ApiResult<(StatusCode, Json<Book>)> {
    storage.post_book(&book).await?;
    tracing::debug!(id = book.id, "book created");
    Ok((StatusCode::CREATED, Json(book)))
}

async fn update_book(
    State(storage): State<Arc<Storage>>,
    JsonBody(book): JsonBody<Book>,
) -> ApiResult<StatusCode> {
    storage.put_book(&book).await?;
    tracing::debug!(id = book.id, "book updated");
    Ok(StatusCode::NO_CONTENT)
}

async fn delete_book(
    PathParam(id): PathParam<i64>,
    QueryParams(params): QueryParams<DeleteParams>,
    State(storage): State<Arc<Storage>>,
) -> ApiResult<StatusCode> {
    if params.cascade {
        storage.delete_book_cascade(id).await?;
    } else {
        storage.delete_book(id).await?;
    }
    tracing::debug!(id, cascade = params.cascade, "book deleted");
    Ok(StatusCode::NO_CONTENT)
}

pub fn router() -> Router<Arc<Storage>> {
    Router::new()
        .route("/book", post(create_book).put(update_book))
        .route("/book/{id}", get(get_book).delete(delete_book))
}
