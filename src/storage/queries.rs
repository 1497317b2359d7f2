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


//! Entity repositories
//!
//! One group of functions per table. Every function is a single round trip
//! against the pool.
//!
//! # Contract
//! - `insert_*` fails with `Conflict` on a duplicate key or a violated
//!   foreign key
//! - `get_*` fails with `NotFound` when no row matches
//! - `update_*` is a plain `UPDATE` by key and fails with `NotFound` when no
//!   row matched; it never inserts
//! - `delete_*` succeeds even when nothing was deleted
//!
//! Placeholders are `?`, which both SQLite and MySQL understand.

use crate::error::{LibraryError, Result};
use crate::storage::models::*;
use sqlx::any::AnyQueryResult;
use sqlx::AnyPool;

pub(crate) const USER: &str = "user";
pub(crate) const BOOK: &str = "book";
pub(crate) const AUTHOR: &str = "author";
pub(crate) const BOOK_REVIEW: &str = "book review";
pub(crate) const AUTHORSHIP: &str = "authorship";
pub(crate) const FAVORITE_BOOK: &str = "favorite book";
pub(crate) const FAVORITE_AUTHOR: &str = "favorite author";

/// Turn a zero-row UPDATE into `NotFound`
fn require_match(
    result: AnyQueryResult,
    entity: &'static str,
    key: impl ToString,
) -> Result<()> {
    if result.rows_affected() == 0 {
        return Err(LibraryError::not_found(entity, key));
    }
    Ok(())
}

// ============================================================================
// USER QUERIES
// ============================================================================

/// Insert a new user
pub async fn insert_user(pool: &AnyPool, user: &User) -> Result<()> {
    sqlx::query(
        r#"
        INSERT INTO users (id, first_name, second_name, role)
        VALUES (?, ?, ?, ?)
        "#,
    )
    .bind(user.id)
    .bind(&user.first_name)
    .bind(&user.second_name)
    .bind(user.role.as_i64())
    .execute(pool)
    .await
    .map_err(|e| LibraryError::from_write(USER, "post", user.id, e))?;

    Ok(())
}

/// Find user by ID
pub async fn get_user(pool: &AnyPool, id: i64) -> Result<User> {
    sqlx::query_as::<_, User>(
        "SELECT id, first_name, second_name, role FROM users WHERE id = ?",
    )
    .bind(id)
    .fetch_optional(pool)
    .await
    .map_err(|e| LibraryError::store(USER, "get", e))?
    .ok_or_else(|| LibraryError::not_found(USER, id))
}

/// Update an existing user
pub async fn update_user(pool: &AnyPool, user: &User) -> Result<()> {
    let result = sqlx::query(
        r#"
        UPDATE users SET
            first_name = ?, second_name = ?, role = ?
        WHERE id = ?
        "#,
    )
    .bind(&user.first_name)
    .bind(&user.second_name)
    .bind(user.role.as_i64())
    .bind(user.id)
    .execute(pool)
    .await
    .map_err(|e| LibraryError::from_write(USER, "put", user.id, e))?;

    require_match(result, USER, user.id)
}

/// Delete a user
pub async fn delete_user(pool: &AnyPool, id: i64) -> Result<()> {
    sqlx::query("DELETE FROM users WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await
        .map_err(|e| LibraryError::from_write(USER, "delete", id, e))?;

    Ok(())
}

// ============================================================================
// BOOK QUERIES
// ============================================================================

/// Insert a new book
pub async fn insert_book(pool: &AnyPool, book: &Book) -> Result<()> {
    sqlx::query(
        r#"
        INSERT INTO books (id, isbn, title, year, publisher)
        VALUES (?, ?, ?, ?, ?)
        "#,
    )
    .bind(book.id)
    .bind(&book.isbn)
    .bind(&book.title)
    .bind(book.year)
    .bind(&book.publisher)
    .execute(pool)
    .await
    .map_err(|e| LibraryError::from_write(BOOK, "post", book.id, e))?;

    Ok(())
}

/// Find book by ID
pub async fn get_book(pool: &AnyPool, id: i64) -> Result<Book> {
    sqlx::query_as::<_, Book>(
        "SELECT id, isbn, title, year, publisher FROM books WHERE id = ?",
    )
    .bind(id)
    .fetch_optional(pool)
    .await
    .map_err(|e| LibraryError::store(BOOK, "get", e))?
    .ok_or_else(|| LibraryError::not_found(BOOK, id))
}

/// Update an existing book
pub async fn update_book(pool: &AnyPool, book: &Book) -> Result<()> {
    let result = sqlx::query(
        r#"
        UPDATE books SET
            isbn = ?, title = ?, year = ?, publisher = ?
        WHERE id = ?
        "#,
    )
    .bind(&book.isbn)
    .bind(&book.title)
    .bind(book.year)
    .bind(&book.publisher)
    .bind(book.id)
    .execute(pool)
    .await
    .map_err(|e| LibraryError::from_write(BOOK, "put", book.id, e))?;

    require_match(result, BOOK, book.id)
}

/// Delete a book
pub async fn delete_book(pool: &AnyPool, id: i64) -> Result<()> {
    sqlx::query("DELETE FROM books WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await
        .map_err(|e| LibraryError::from_write(BOOK, "delete", id, e))?;

    Ok(())
}

// ============================================================================
// AUTHOR QUERIES
// ============================================================================

/// Insert a new author
pub async fn insert_author(pool: &AnyPool, author: &Author) -> Result<()> {
    sqlx::query("INSERT INTO authors (id, full_name) VALUES (?, ?)")
        .bind(author.id)
        .bind(&author.full_name)
        .execute(pool)
        .await
        .map_err(|e| LibraryError::from_write(AUTHOR, "post", author.id, e))?;

    Ok(())
}

/// Find author by ID
pub async fn get_author(pool: &AnyPool, id: i64) -> Result<Author> {
    sqlx::query_as::<_, Author>("SELECT id, full_name FROM authors WHERE id = ?")
        .bind(id)
        .fetch_optional(pool)
        .await
        .map_err(|e| LibraryError::store(AUTHOR, "get", e))?
        .ok_or_else(|| LibraryError::not_found(AUTHOR, id))
}

/// Update an existing author
pub async fn update_author(pool: &AnyPool, author: &Author) -> Result<()> {
    let result = sqlx::query("UPDATE authors SET full_name = ? WHERE id = ?")
        .bind(&author.full_name)
        .bind(author.id)
        .execute(pool)
        .await
        .map_err(|e| LibraryError::from_write(AUTHOR, "put", author.id, e))?;

    require_match(result, AUTHOR, author.id)
}

/// Delete an author
pub async fn delete_author(pool: &AnyPool, id: i64) -> Result<()> {
    sqlx::query("DELETE FROM authors WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await
        .map_err(|e| LibraryError::from_write(AUTHOR, "delete", id, e))?;

    Ok(())
}

// ============================================================================
// BOOK REVIEW QUERIES
// ============================================================================

/// Insert a new book review
pub async fn insert_book_review(pool: &AnyPool, review: &BookReview) -> Result<()> {
    sqlx::query(
        r#"
        INSERT INTO book_reviews (user_id, book_id, rating)
        VALUES (?, ?, ?)
        "#,
    )
    .bind(review.user_id)
    .bind(review.book_id)
    .bind(review.rating)
    .execute(pool)
    .await
    .map_err(|e| {
        LibraryError::from_write(
            BOOK_REVIEW,
            "post",
            pair_key(review.user_id, review.book_id),
            e,
        )
    })?;

    Ok(())
}

/// Find a user's review of a book
pub async fn get_book_review(pool: &AnyPool, user_id: i64, book_id: i64) -> Result<BookReview> {
    sqlx::query_as::<_, BookReview>(
        r#"
        SELECT user_id, book_id, rating FROM book_reviews
        WHERE user_id = ? AND book_id = ?
        "#,
    )
    .bind(user_id)
    .bind(book_id)
    .fetch_optional(pool)
    .await
    .map_err(|e| LibraryError::store(BOOK_REVIEW, "get", e))?
    .ok_or_else(|| LibraryError::not_found(BOOK_REVIEW, pair_key(user_id, book_id)))
}

/// Change the rating of an existing review
pub async fn update_book_review(pool: &AnyPool, review: &BookReview) -> Result<()> {
    let key = pair_key(review.user_id, review.book_id);
    let result = sqlx::query(
        r#"
        UPDATE book_reviews SET rating = ?
        WHERE user_id = ? AND book_id = ?
        "#,
    )
    .bind(review.rating)
    .bind(review.user_id)
    .bind(review.book_id)
    .execute(pool)
    .await
    .map_err(|e| LibraryError::from_write(BOOK_REVIEW, "put", &key, e))?;

    require_match(result, BOOK_REVIEW, key)
}

/// Delete a book review
pub async fn delete_book_review(pool: &AnyPool, user_id: i64, book_id: i64) -> Result<()> {
    sqlx::query("DELETE FROM book_reviews WHERE user_id = ? AND book_id = ?")
        .bind(user_id)
        .bind(book_id)
        .execute(pool)
        .await
        .map_err(|e| {
            LibraryError::from_write(BOOK_REVIEW, "delete", pair_key(user_id, book_id), e)
        })?;

    Ok(())
}

// ============================================================================
// AUTHORSHIP QUERIES
// ============================================================================

/// Link an author to a book
pub async fn insert_authorship(pool: &AnyPool, authorship: &Authorship) -> Result<()> {
    sqlx::query("INSERT INTO authorships (author_id, book_id) VALUES (?, ?)")
        .bind(authorship.author_id)
        .bind(authorship.book_id)
        .execute(pool)
        .await
        .map_err(|e| {
            LibraryError::from_write(
                AUTHORSHIP,
                "post",
                pair_key(authorship.author_id, authorship.book_id),
                e,
            )
        })?;

    Ok(())
}

/// Find an authorship link
pub async fn get_authorship(pool: &AnyPool, author_id: i64, book_id: i64) -> Result<Authorship> {
    sqlx::query_as::<_, Authorship>(
        r#"
        SELECT author_id, book_id FROM authorships
        WHERE author_id = ? AND book_id = ?
        "#,
    )
    .bind(author_id)
    .bind(book_id)
    .fetch_optional(pool)
    .await
    .map_err(|e| LibraryError::store(AUTHORSHIP, "get", e))?
    .ok_or_else(|| LibraryError::not_found(AUTHORSHIP, pair_key(author_id, book_id)))
}

/// Remove an authorship link
pub async fn delete_authorship(pool: &AnyPool, author_id: i64, book_id: i64) -> Result<()> {
    sqlx::query("DELETE FROM authorships WHERE author_id = ? AND book_id = ?")
        .bind(author_id)
        .bind(book_id)
        .execute(pool)
        .await
        .map_err(|e| {
            LibraryError::from_write(AUTHORSHIP, "delete", pair_key(author_id, book_id), e)
        })?;

    Ok(())
}

// ============================================================================
// FAVORITE BOOK QUERIES
// ============================================================================

/// Mark a book as a user's favorite
pub async fn insert_favorite_book(pool: &AnyPool, favorite: &FavoriteBook) -> Result<()> {
    sqlx::query("INSERT INTO favorite_books (user_id, book_id) VALUES (?, ?)")
        .bind(favorite.user_id)
        .bind(favorite.book_id)
        .execute(pool)
        .await
        .map_err(|e| {
            LibraryError::from_write(
                FAVORITE_BOOK,
                "post",
                pair_key(favorite.user_id, favorite.book_id),
                e,
            )
        })?;

    Ok(())
}

/// Find a favorite book entry
pub async fn get_favorite_book(pool: &AnyPool, user_id: i64, book_id: i64) -> Result<FavoriteBook> {
    sqlx::query_as::<_, FavoriteBook>(
        r#"
        SELECT user_id, book_id FROM favorite_books
        WHERE user_id = ? AND book_id = ?
        "#,
    )
    .bind(user_id)
    .bind(book_id)
    .fetch_optional(pool)
    .await
    .map_err(|e| LibraryError::store(FAVORITE_BOOK, "get", e))?
    .ok_or_else(|| LibraryError::not_found(FAVORITE_BOOK, pair_key(user_id, book_id)))
}

/// Remove a favorite book entry
pub async fn delete_favorite_book(pool: &AnyPool, user_id: i64, book_id: i64) -> Result<()> {
    sqlx::query("DELETE FROM favorite_books WHERE user_id = ? AND book_id = ?")
        .bind(user_id)
        .bind(book_id)
        .execute(pool)
        .await
        .map_err(|e| {
            LibraryError::from_write(FAVORITE_BOOK, "delete", pair_key(user_id, book_id), e)
        })?;

    Ok(())
}

// ============================================================================
// FAVORITE AUTHOR QUERIES
// ============================================================================

/// Mark an author as a user's favorite
pub async fn insert_favorite_author(pool: &AnyPool, favorite: &FavoriteAuthor) -> Result<()> {
    sqlx::query("INSERT INTO favorite_authors (user_id, author_id) VALUES (?, ?)")
        .bind(favorite.user_id)
        .bind(favorite.author_id)
        .execute(pool)
        .await
        .map_err(|e| {
            LibraryError::from_write(
                FAVORITE_AUTHOR,
                "post",
                pair_key(favorite.user_id, favorite.author_id),
                e,
            )
        })?;

    Ok(())
}

/// Find a favorite author entry
pub async fn get_favorite_author(
    pool: &AnyPool,
    user_id: i64,
    author_id: i64,
) -> Result<FavoriteAuthor> {
    sqlx::query_as::<_, FavoriteAuthor>(
        r#"
        SELECT user_id, author_id FROM favorite_authors
        WHERE user_id = ? AND author_id = ?
        "#,
    )
    .bind(user_id)
    .bind(author_id)
    .fetch_optional(pool)
    .await
    .map_err(|e| LibraryError::store(FAVORITE_AUTHOR, "get", e))?
    .ok_or_else(|| LibraryError::not_found(FAVORITE_AUTHOR, pair_key(user_id, author_id)))
}

/// Remove a favorite author entry
pub async fn delete_favorite_author(pool: &AnyPool, user_id: i64, author_id: i64) -> Result<()> {
    sqlx::query("DELETE FROM favorite_authors WHERE user_id = ? AND author_id = ?")
        .bind(user_id)
        .bind(author_id)
        .execute(pool)
        .await
        .map_err(|e| {
            LibraryError::from_write(FAVORITE_AUTHOR, "delete", pair_key(user_id, author_id), e)
        })?;

    Ok(())
}
