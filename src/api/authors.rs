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


//! `/author` routes, including the books an author wrote

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
use crate::storage::{Author, Authorship, Book, Storage};

async fn get_author(
    PathParam(id): PathParam<i64>,
    State(storage): State<Arc<Storage>>,
) -> ApiResult<Json<Author>> {
    let author = storage.get_author(id).await?;
    tracing::debug!(id, "author fetched");
    Ok(Json(author))
}

async fn create_author(
    State(storage): State<Arc<Storage>>,
    JsonBody(author): JsonBody<Author>,
) -> ApiResult<(StatusCode, Json<Author>)> {
    storage.post_author(&author).await?;
    tracing::debug!(id = author.id, "author created");
    Ok((StatusCode::CREATED, Json(author)))
}

async fn update_author(
    State(storage): State<Arc<Storage>>,
    JsonBody(author): JsonBody<Author>,
) -> ApiResult<StatusCode> {
    storage.put_author(&author).await?;
    tracing::debug!(id = author.id, "author updated");
    Ok(StatusCode::NO_CONTENT)
}

async fn delete_author(
    PathParam(id): PathParam<i64>,
    QueryParams(params): QueryParams<DeleteParams>,
    State(storage): State<Arc<Storage>>,
) -> ApiResult<StatusCode> {
    if params.cascade {
        storage.delete_author_cascade(id).await?;
    } else {
        storage.delete_author(id).await?;
    }
    tracing::debug!(id, cascade = params.cascade, "author deleted");
    Ok(StatusCode::NO_CONTENT)
}

async fn get_books(
    PathParam(id): PathParam<i64>,
    State(storage): State<Arc<Storage>>,
) -> ApiResult<Json<Vec<Book>>> {
    let books = storage.get_author_books(id).await?;
    Ok(Json(books))
}

async fn add_book(
    PathParam((author_id, book_id)): PathParam<(i64, i64)>,
    State(storage): State<Arc<Storage>>,
) -> ApiResult<StatusCode> {
    storage
        .post_authorship(&Authorship { author_id, book_id })
        .await?;
    Ok(StatusCode::CREATED)
}

async fn remove_book(
    PathParam((author_id, book_id)): PathParam<(i64, i64)>,
    State(storage): State<Arc<Storage>>,
) -> ApiResult<StatusCode> {
    storage.delete_authorship(author_id, book_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub fn router() -> Router<Arc<Storage>> {
    Router::new()
        .route("/author", post(create_author).put(update_author))
        .route("/author/{id}", get(get_author).delete(delete_author))
        .route("/author/{id}/books", get(get_books))
        .route(
            "/author/{id}/books/{book_id}",
            post(add_book).delete(remove_book),
        )
}
