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


//! Storage facade
//!
//! [`Storage`] owns the pool and exposes every repository and composite
//! query under the names the HTTP layer uses (`get_*`, `post_*`, `put_*`,
//! `delete_*`). It is cheap to clone; clones share the same pool.
//!
//! When a query timeout is configured every call is bounded by it and fails
//! with `Timeout` once it elapses. The in-flight query is dropped.

use crate::config::StorageOptions;
use crate::error::{LibraryError, Result};
use crate::storage::models::*;
use crate::storage::queries::{
    AUTHOR, AUTHORSHIP, BOOK, BOOK_REVIEW, FAVORITE_AUTHOR, FAVORITE_BOOK, USER,
};
use crate::storage::{cascade, composite, connection, queries, schema};
use sqlx::AnyPool;
use std::future::Future;
use std::time::Duration;

/// Ready-to-use storage handle
#[derive(Debug, Clone)]
pub struct Storage {
    pool: AnyPool,
    query_timeout: Option<Duration>,
}

impl Storage {
    /// Open the configured backend and make sure every table exists
    ///
    /// # Errors
    /// - `UnknownBackend` / `Connection` if the backend can't be opened
    /// - `Schema` if a table can't be created
    pub async fn init(options: &StorageOptions) -> Result<Self> {
        let pool = connection::open(options).await?;
        schema::ensure_schema(&pool).await?;

        Ok(Self {
            pool,
            query_timeout: options.query_timeout(),
        })
    }

    /// Create in-memory SQLite storage for testing
    pub async fn new_in_memory() -> Result<Self> {
        Self::init(&StorageOptions::in_memory()).await
    }

    /// Replace the per-call timeout
    pub fn with_query_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.query_timeout = timeout;
        self
    }

    /// Get reference to the connection pool
    pub fn pool(&self) -> &AnyPool {
        &self.pool
    }

    pub fn query_timeout(&self) -> Option<Duration> {
        self.query_timeout
    }

    /// Close the pool and wait for connections to be released
    pub async fn close(self) {
        self.pool.close().await;
    }

    async fn bounded<T>(
        &self,
        entity: &'static str,
        operation: &'static str,
        call: impl Future<Output = Result<T>>,
    ) -> Result<T> {
        match self.query_timeout {
            Some(after) => tokio::time::timeout(after, call)
                .await
                .map_err(|_| LibraryError::Timeout {
                    entity,
                    operation,
                    after,
                })?,
            None => call.await,
        }
    }

    // ========================================================================
    // USERS
    // ========================================================================

    pub async fn get_user(&self, id: i64) -> Result<User> {
        self.bounded(USER, "get", queries::get_user(&self.pool, id)).await
    }

    pub async fn post_user(&self, user: &User) -> Result<()> {
        self.bounded(USER, "post", queries::insert_user(&self.pool, user)).await
    }

    pub async fn put_user(&self, user: &User) -> Result<()> {
        self.bounded(USER, "put", queries::update_user(&self.pool, user)).await
    }

    pub async fn delete_user(&self, id: i64) -> Result<()> {
        self.bounded(USER, "delete", queries::delete_user(&self.pool, id)).await
    }

    /// Delete a user together with their favorites and reviews
    pub async fn delete_user_cascade(&self, id: i64) -> Result<()> {
        self.bounded(USER, "delete", cascade::delete_user_cascade(&self.pool, id))
            .await
    }

    pub async fn get_user_favorite_books(&self, user_id: i64) -> Result<Vec<Book>> {
        self.bounded(
            FAVORITE_BOOK,
            "get",
            composite::favorite_books_of(&self.pool, user_id),
        )
        .await
    }

    pub async fn get_user_favorite_authors(&self, user_id: i64) -> Result<Vec<Author>> {
        self.bounded(
            FAVORITE_AUTHOR,
            "get",
            composite::favorite_authors_of(&self.pool, user_id),
        )
        .await
    }

    pub async fn get_user_book_reviews(&self, user_id: i64) -> Result<Vec<BookReview>> {
        self.bounded(
            BOOK_REVIEW,
            "get",
            composite::book_reviews_of(&self.pool, user_id),
        )
        .await
    }

    // ========================================================================
    // BOOKS
    // ========================================================================

    pub async fn get_book(&self, id: i64) -> Result<Book> {
        self.bounded(BOOK, "get", queries::get_book(&self.pool, id)).await
    }

    pub async fn post_book(&self, book: &Book) -> Result<()> {
        self.bounded(BOOK, "post", queries::insert_book(&self.pool, book)).await
    }

    pub async fn put_book(&self, book: &Book) -> Result<()> {
        self.bounded(BOOK, "put", queries::update_book(&self.pool, book)).await
    }

    pub async fn delete_book(&self, id: i64) -> Result<()> {
        self.bounded(BOOK, "delete", queries::delete_book(&self.pool, id)).await
    }

    /// Delete a book together with its reviews, authorships and favorites
    pub async fn delete_book_cascade(&self, id: i64) -> Result<()> {
        self.bounded(BOOK, "delete", cascade::delete_book_cascade(&self.pool, id))
            .await
    }

    // ========================================================================
    // AUTHORS
    // ========================================================================

    pub async fn get_author(&self, id: i64) -> Result<Author> {
        self.bounded(AUTHOR, "get", queries::get_author(&self.pool, id)).await
    }

    pub async fn post_author(&self, author: &Author) -> Result<()> {
        self.bounded(AUTHOR, "post", queries::insert_author(&self.pool, author))
            .await
    }

    pub async fn put_author(&self, author: &Author) -> Result<()> {
        self.bounded(AUTHOR, "put", queries::update_author(&self.pool, author))
            .await
    }

    pub async fn delete_author(&self, id: i64) -> Result<()> {
        self.bounded(AUTHOR, "delete", queries::delete_author(&self.pool, id))
            .await
    }

    /// Delete an author together with their authorships and favorites
    pub async fn delete_author_cascade(&self, id: i64) -> Result<()> {
        self.bounded(AUTHOR, "delete", cascade::delete_author_cascade(&self.pool, id))
            .await
    }

    pub async fn get_author_books(&self, author_id: i64) -> Result<Vec<Book>> {
        self.bounded(
            AUTHORSHIP,
            "get",
            composite::books_by_author(&self.pool, author_id),
        )
        .await
    }

    // ========================================================================
    // BOOK REVIEWS
    // ========================================================================

    pub async fn get_book_review(&self, user_id: i64, book_id: i64) -> Result<BookReview> {
        self.bounded(
            BOOK_REVIEW,
            "get",
            queries::get_book_review(&self.pool, user_id, book_id),
        )
        .await
    }

    pub async fn post_book_review(&self, review: &BookReview) -> Result<()> {
        self.bounded(
            BOOK_REVIEW,
            "post",
            queries::insert_book_review(&self.pool, review),
        )
        .await
    }

    pub async fn put_book_review(&self, review: &BookReview) -> Result<()> {
        self.bounded(
            BOOK_REVIEW,
            "put",
            queries::update_book_review(&self.pool, review),
        )
        .await
    }

    pub async fn delete_book_review(&self, user_id: i64, book_id: i64) -> Result<()> {
        self.bounded(
            BOOK_REVIEW,
            "delete",
            queries::delete_book_review(&self.pool, user_id, book_id),
        )
        .await
    }

    // ========================================================================
    // AUTHORSHIPS
    // ========================================================================

    pub async fn get_authorship(&self, author_id: i64, book_id: i64) -> Result<Authorship> {
        self.bounded(
            AUTHORSHIP,
            "get",
            queries::get_authorship(&self.pool, author_id, book_id),
        )
        .await
    }

    pub async fn post_authorship(&self, authorship: &Authorship) -> Result<()> {
        self.bounded(
            AUTHORSHIP,
            "post",
            queries::insert_authorship(&self.pool, authorship),
        )
        .await
    }

    pub async fn delete_authorship(&self, author_id: i64, book_id: i64) -> Result<()> {
        self.bounded(
            AUTHORSHIP,
            "delete",
            queries::delete_authorship(&self.pool, author_id, book_id),
        )
        .await
    }

    // ========================================================================
    // FAVORITES
    // ========================================================================

    pub async fn get_favorite_book(&self, user_id: i64, book_id: i64) -> Result<FavoriteBook> {
        self.bounded(
            FAVORITE_BOOK,
            "get",
            queries::get_favorite_book(&self.pool, user_id, book_id),
        )
        .await
    }

    pub async fn post_favorite_book(&self, favorite: &FavoriteBook) -> Result<()> {
        self.bounded(
            FAVORITE_BOOK,
            "post",
            queries::insert_favorite_book(&self.pool, favorite),
        )
        .await
    }

    pub async fn delete_favorite_book(&self, user_id: i64, book_id: i64) -> Result<()> {
        self.bounded(
            FAVORITE_BOOK,
            "delete",
            queries::delete_favorite_book(&self.pool, user_id, book_id),
        )
        .await
    }

    pub async fn get_favorite_author(
        &self,
        user_id: i64,
        author_id: i64,
    ) -> Result<FavoriteAuthor> {
        self.bounded(
            FAVORITE_AUTHOR,
            "get",
            queries::get_favorite_author(&self.pool, user_id, author_id),
        )
        .await
    }

    pub async fn post_favorite_author(&self, favorite: &FavoriteAuthor) -> Result<()> {
        self.bounded(
            FAVORITE_AUTHOR,
            "post",
            queries::insert_favorite_author(&self.pool, favorite),
        )
        .await
    }

    pub async fn delete_favorite_author(&self, user_id: i64, author_id: i64) -> Result<()> {
        self.bounded(
            FAVORITE_AUTHOR,
            "delete",
            queries::delete_favorite_author(&self.pool, user_id, author_id),
        )
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_new_in_memory() {
        let db = Storage::new_in_memory()
            .await
            .expect("Failed to create in-memory storage");
        assert!(db.query_timeout().is_none());
        assert!(db.get_user(1).await.unwrap_err().is_not_found());
    }

    #[tokio::test]
    async fn test_init_reads_timeout_from_options() {
        let options = StorageOptions {
            query_timeout_secs: Some(3),
            ..StorageOptions::in_memory()
        };
        let db = Storage::init(&options).await.unwrap();
        assert_eq!(db.query_timeout(), Some(Duration::from_secs(3)));
    }

    #[tokio::test]
    async fn test_init_unknown_backend_is_fatal() {
        let options = StorageOptions {
            db: "postgres".to_string(),
            ..StorageOptions::in_memory()
        };
        let err = Storage::init(&options).await.unwrap_err();
        assert!(err.is_fatal());
    }

    #[tokio::test]
    async fn test_clones_share_pool() {
        let db = Storage::new_in_memory().await.unwrap();
        let other = db.clone();

        db.post_author(&Author::new(1, "Shared")).await.unwrap();
        assert_eq!(other.get_author(1).await.unwrap().full_name, "Shared");
    }

    #[tokio::test]
    async fn test_call_times_out_when_pool_is_busy() {
        let db = Storage::new_in_memory()
            .await
            .unwrap()
            .with_query_timeout(Some(Duration::from_millis(50)));

        // In-memory storage has exactly one connection
        let _held = db.pool().acquire().await.unwrap();

        let err = db.get_book(1).await.unwrap_err();
        assert!(matches!(
            err,
            LibraryError::Timeout {
                entity: "book",
                operation: "get",
                ..
            }
        ));
    }

    #[tokio::test]
    async fn test_favorites_through_facade() {
        let db = Storage::new_in_memory().await.unwrap();
        db.post_user(&User::new(1, "Ada", "Lovelace", Role::User)).await.unwrap();
        db.post_author(&Author::new(5, "Author")).await.unwrap();
        db.post_favorite_author(&FavoriteAuthor { user_id: 1, author_id: 5 })
            .await
            .unwrap();

        assert_eq!(
            db.get_favorite_author(1, 5).await.unwrap(),
            FavoriteAuthor { user_id: 1, author_id: 5 }
        );
        assert_eq!(db.get_user_favorite_authors(1).await.unwrap().len(), 1);

        db.delete_favorite_author(1, 5).await.unwrap();
        assert!(db.get_user_favorite_authors(1).await.unwrap().is_empty());
    }
}
