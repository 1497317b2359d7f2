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


//! `/user` routes
//!
//! A user's favorites and reviews hang off `/user/{id}`. Reviews are
//! created and updated through `/review` with the full body, since both
//! keys travel in it.

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
use crate::storage::{
    Author, Book, BookReview, FavoriteAuthor, FavoriteBook, Storage, User,
};

async fn get_user(
    PathParam(id): PathParam<i64>,
    State(storage): State<Arc<Storage>>,
) -> ApiResult<Json<User>> {
    let user = storage.get_user(id).await?;
    tracing::debug!(id, "user fetched");
    Ok(Json(user))
}

async fn create_user(
    State(storage): State<Arc<Storage>>,
    JsonBody(user): JsonBody<User>,
) -> ApiResult<(StatusCode, Json<User>)> {
    storage.post_user(&user).await?;
    tracing::debug!(id = user.id, "user created");
    Ok((StatusCode::CREATED, Json(user)))
}

async fn update_user(
    State(storage): State<Arc<Storage>>,
    JsonBody(user): JsonBody<User>,
) -> ApiResult<StatusCode> {
    storage.put_user(&user).await?;
    tracing::debug!(id = user.id, "user updated");
    Ok(StatusCode::NO_CONTENT)
}

async fn delete_user(
    PathParam(id): PathParam<i64>,
    QueryParams(params): QueryParams<DeleteParams>,
    State(storage): State<Arc<Storage>>,
) -> ApiResult<StatusCode> {
    if params.cascade {
        storage.delete_user_cascade(id).await?;
    } else {
        storage.delete_user(id).await?;
    }
    tracing::debug!(id, cascade = params.cascade, "user deleted");
    Ok(StatusCode::NO_CONTENT)
}

async fn get_favorite_books(
    PathParam(id): PathParam<i64>,
    State(storage): State<Arc<Storage>>,
) -> ApiResult<Json<Vec<Book>>> {
    let books = storage.get_user_favorite_books(id).await?;
    Ok(Json(books))
}

async fn add_favorite_book(
    PathParam((user_id, book_id)): PathParam<(i64, i64)>,
    State(storage): State<Arc<Storage>>,
) -> ApiResult<StatusCode> {
    storage
        .post_favorite_book(&FavoriteBook { user_id, book_id })
        .await?;
    Ok(StatusCode::CREATED)
}

async fn remove_favorite_book(
    PathParam((user_id, book_id)): PathParam<(i64, i64)>,
    State(storage): State<Arc<Storage>>,
) -> ApiResult<StatusCode> {
    storage.delete_favorite_book(user_id, book_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn get_favorite_authors(
    PathParam(id): PathParam<i64>,
    State(storage): State<Arc<Storage>>,
) -> ApiResult<Json<Vec<Author>>> {
    let authors = storage.get_user_favorite_authors(id).await?;
    Ok(Json(authors))
}

async fn add_favorite_author(
    PathParam((user_id, author_id)): PathParam<(i64, i64)>,
    State(storage): State<Arc<Storage>>,
) -> ApiResult<StatusCode> {
    storage
        .post_favorite_author(&FavoriteAuthor { user_id, author_id })
        .await?;
    Ok(StatusCode::CREATED)
}

async fn remove_favorite_author(
    PathParam((user_id, author_id)): PathParam<(i64, i64)>,
    State(storage): State<Arc<Storage>>,
) -> ApiResult<StatusCode> {
    storage.delete_favorite_author(user_id, author_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn get_reviews(
    PathParam(id): PathParam<i64>,
    State(storage): State<Arc<Storage>>,
) -> ApiResult<Json<Vec<BookReview>>> {
    let reviews = storage.get_user_book_reviews(id).await?;
    Ok(Json(reviews))
}

async fn get_review(
    PathParam((user_id, book_id)): PathParam<(i64, i64)>,
    State(storage): State<Arc<Storage>>,
) -> ApiResult<Json<BookReview>> {
    let review = storage.get_book_review(user_id, book_id).await?;
    Ok(Json(review))
}

async fn delete_review(
    PathParam((user_id, book_id)): PathParam<(i64, i64)>,
    State(storage): State<Arc<Storage>>,
) -> ApiResult<StatusCode> {
    storage.delete_book_review(user_id, book_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn create_review(
    State(storage): State<Arc<Storage>>,
    JsonBody(review): JsonBody<BookReview>,
) -> ApiResult<(StatusCode, Json<BookReview>)> {
    storage.post_book_review(&review).await?;
    Ok((StatusCode::CREATED, Json(review)))
}

async fn update_review(
    State(storage): State<Arc<Storage>>,
    JsonBody(review): JsonBody<BookReview>,
) -> ApiResult<StatusCode> {
    storage.put_book_review(&review).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub fn router() -> Router<Arc<Storage>> {
    Router::new()
        .route("/user", post(create_user).put(update_user))
        .route("/user/{id}", get(get_user).delete(delete_user))
        .route("/user/{id}/books", get(get_favorite_books))
        .route(
            "/user/{id}/books/{book_id}",
            post(add_favorite_book).delete(remove_favorite_book),
        )
        .route("/user/{id}/authors", get(get_favorite_authors))
        .route(
            "/user/{id}/authors/{author_id}",
            post(add_favorite_author).delete(remove_favorite_author),
        )
        .route("/user/{id}/reviews", get(get_reviews))
        .route(
            "/user/{id}/reviews/{book_id}",
            get(get_review).delete(delete_review),
        )
        .route("/review", post(create_review).put(update_review))
}
