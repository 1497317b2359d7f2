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


//! Cascading deletes
//!
//! Removes an entity together with every junction row that references it.
//! All steps run in one transaction; if any step fails the transaction is
//! dropped uncommitted and nothing is removed.

use crate::error::{LibraryError, Result};
use crate::storage::queries::{AUTHOR, BOOK, USER};
use crate::storage::schema;
use sqlx::AnyPool;

/// (table, key column) pairs, children before the owner row
type Steps = &'static [(&'static str, &'static str)];

const USER_STEPS: Steps = &[
    (schema::FAVORITE_BOOKS, "user_id"),
    (schema::FAVORITE_AUTHORS, "user_id"),
    (schema::BOOK_REVIEWS, "user_id"),
    (schema::USERS, "id"),
];

const BOOK_STEPS: Steps = &[
    (schema::FAVORITE_BOOKS, "book_id"),
    (schema::BOOK_REVIEWS, "book_id"),
    (schema::AUTHORSHIPS, "book_id"),
    (schema::BOOKS, "id"),
];

const AUTHOR_STEPS: Steps = &[
    (schema::FAVORITE_AUTHORS, "author_id"),
    (schema::AUTHORSHIPS, "author_id"),
    (schema::AUTHORS, "id"),
];

async fn run_cascade(pool: &AnyPool, entity: &'static str, id: i64, steps: Steps) -> Result<()> {
    let mut tx = pool
        .begin()
        .await
        .map_err(|e| LibraryError::store(entity, "delete", e))?;

    for (table, column) in steps {
        let sql = format!("DELETE FROM {table} WHERE {column} = ?");
        let result = sqlx::query(&sql)
            .bind(id)
            .execute(&mut *tx)
            .await
            .map_err(|e| LibraryError::from_write(entity, "delete", id, e))?;

        tracing::debug!(entity, id, table, rows = result.rows_affected(), "cascade step");
    }

    tx.commit()
        .await
        .map_err(|e| LibraryError::store(entity, "delete", e))?;

    Ok(())
}

/// Delete a user with their favorites and reviews
pub async fn delete_user_cascade(pool: &AnyPool, user_id: i64) -> Result<()> {
    run_cascade(pool, USER, user_id, USER_STEPS).await
}

/// Delete a book with its reviews, authorships and favorite entries
pub async fn delete_book_cascade(pool: &AnyPool, book_id: i64) -> Result<()> {
    run_cascade(pool, BOOK, book_id, BOOK_STEPS).await
}

/// Delete an author with their authorships and favorite entries
pub async fn delete_author_cascade(pool: &AnyPool, author_id: i64) -> Result<()> {
    run_cascade(pool, AUTHOR, author_id, AUTHOR_STEPS).await
}
