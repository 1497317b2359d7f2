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


//! Composite queries
//!
//! Multi-row reads across a junction table. Each join query is described by
//! a [`JoinSpec`] and runs through the same scanning helper, so ordering and
//! error handling are identical for all of them.
//!
//! - An owner with no rows (or no owner at all) yields an empty list
//! - Rows come back ordered by the target's key, ascending
//! - A failure while scanning yields `Iteration` and no partial result

use crate::error::{LibraryError, Result};
use crate::storage::models::{Author, Book, BookReview};
use crate::storage::schema;
use futures_util::TryStreamExt;
use sqlx::any::AnyRow;
use sqlx::{AnyPool, FromRow};

const BOOK_COLUMNS: &[&str] = &["id", "isbn", "title", "year", "publisher"];
const AUTHOR_COLUMNS: &[&str] = &["id", "full_name"];

/// A "targets of owner via junction table" query
#[derive(Debug, Clone, Copy)]
pub struct JoinSpec {
    /// Name used in error context
    pub query: &'static str,
    pub join_table: &'static str,
    pub target_table: &'static str,
    /// Junction column holding the owner's key
    pub owner_column: &'static str,
    /// Junction column referencing `target_table.id`
    pub target_column: &'static str,
    /// Target columns to select, in `FromRow` field order
    pub columns: &'static [&'static str],
}

impl JoinSpec {
    pub fn sql(&self) -> String {
        let columns = self
            .columns
            .iter()
            .map(|c| format!("t.{c}"))
            .collect::<Vec<_>>()
            .join(", ");

        format!(
            "SELECT {columns} FROM {join} j \
             INNER JOIN {target} t ON t.id = j.{target_col} \
             WHERE j.{owner_col} = ? \
             ORDER BY t.id",
            join = self.join_table,
            target = self.target_table,
            target_col = self.target_column,
            owner_col = self.owner_column,
        )
    }
}

pub const FAVORITE_BOOKS_OF_USER: JoinSpec = JoinSpec {
    query: "favorite books",
    join_table: schema::FAVORITE_BOOKS,
    target_table: schema::BOOKS,
    owner_column: "user_id",
    target_column: "book_id",
    columns: BOOK_COLUMNS,
};

pub const FAVORITE_AUTHORS_OF_USER: JoinSpec = JoinSpec {
    query: "favorite authors",
    join_table: schema::FAVORITE_AUTHORS,
    target_table: schema::AUTHORS,
    owner_column: "user_id",
    target_column: "author_id",
    columns: AUTHOR_COLUMNS,
};

pub const BOOKS_OF_AUTHOR: JoinSpec = JoinSpec {
    query: "author books",
    join_table: schema::AUTHORSHIPS,
    target_table: schema::BOOKS,
    owner_column: "author_id",
    target_column: "book_id",
    columns: BOOK_COLUMNS,
};

/// Run a single-parameter query and collect every row
///
/// The whole result set is scanned before anything is returned.
async fn scan_all<T>(pool: &AnyPool, query: &'static str, sql: &str, owner_id: i64) -> Result<Vec<T>>
where
    T: for<'r> FromRow<'r, AnyRow> + Send + Unpin,
{
    let mut rows = sqlx::query_as::<_, T>(sql).bind(owner_id).fetch(pool);
    let mut items = Vec::new();

    while let Some(item) = rows
        .try_next()
        .await
        .map_err(|source| LibraryError::Iteration { query, source })?
    {
        items.push(item);
    }

    Ok(items)
}

/// Run a join query for one owner
pub async fn fetch_joined<T>(pool: &AnyPool, spec: &JoinSpec, owner_id: i64) -> Result<Vec<T>>
where
    T: for<'r> FromRow<'r, AnyRow> + Send + Unpin,
{
    scan_all(pool, spec.query, &spec.sql(), owner_id).await
}

/// Books the user marked as favorite
pub async fn favorite_books_of(pool: &AnyPool, user_id: i64) -> Result<Vec<Book>> {
    fetch_joined(pool, &FAVORITE_BOOKS_OF_USER, user_id).await
}

/// Authors the user marked as favorite
pub async fn favorite_authors_of(pool: &AnyPool, user_id: i64) -> Result<Vec<Author>> {
    fetch_joined(pool, &FAVORITE_AUTHORS_OF_USER, user_id).await
}

/// Books written by the author
pub async fn books_by_author(pool: &AnyPool, author_id: i64) -> Result<Vec<Book>> {
    fetch_joined(pool, &BOOKS_OF_AUTHOR, author_id).await
}

/// Every review the user wrote, ordered by book
pub async fn book_reviews_of(pool: &AnyPool, user_id: i64) -> Result<Vec<BookReview>> {
    scan_all(
        pool,
        "book reviews",
        "SELECT user_id, book_id, rating FROM book_reviews WHERE user_id = ? ORDER BY book_id",
        user_id,
    )
    .await
}
