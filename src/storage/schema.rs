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


//! Table initializer
//!
//! Creates every table with `CREATE TABLE IF NOT EXISTS`, so it is safe to
//! run on every startup. There is no migration tracking: the schema is
//! fixed and the statements are written in the subset of SQL that both
//! SQLite and MySQL accept.
//!
//! Parent tables come first. SQLite accepts a foreign key to a table that
//! doesn't exist yet, InnoDB does not.

use crate::error::{LibraryError, Result};
use sqlx::AnyPool;

pub const USERS: &str = "users";
pub const BOOKS: &str = "books";
pub const AUTHORS: &str = "authors";
pub const BOOK_REVIEWS: &str = "book_reviews";
pub const AUTHORSHIPS: &str = "authorships";
pub const FAVORITE_BOOKS: &str = "favorite_books";
pub const FAVORITE_AUTHORS: &str = "favorite_authors";

/// Table name and its DDL, in creation order
const TABLES: &[(&str, &str)] = &[
    (
        USERS,
        r#"
        CREATE TABLE IF NOT EXISTS users (
            id BIGINT NOT NULL PRIMARY KEY,
            first_name VARCHAR(255) NOT NULL,
            second_name VARCHAR(255) NOT NULL,
            role BIGINT NOT NULL  -- 1 = user, 2 = mod, 3 = admin
        )
        "#,
    ),
    (
        BOOKS,
        r#"
        CREATE TABLE IF NOT EXISTS books (
            id BIGINT NOT NULL PRIMARY KEY,
            isbn VARCHAR(255) NOT NULL,
            title VARCHAR(255) NOT NULL,
            year BIGINT NOT NULL,
            publisher VARCHAR(255) NOT NULL
        )
        "#,
    ),
    (
        AUTHORS,
        r#"
        CREATE TABLE IF NOT EXISTS authors (
            id BIGINT NOT NULL PRIMARY KEY,
            full_name VARCHAR(255) NOT NULL
        )
        "#,
    ),
    (
        BOOK_REVIEWS,
        r#"
        CREATE TABLE IF NOT EXISTS book_reviews (
            user_id BIGINT NOT NULL,
            book_id BIGINT NOT NULL,
            rating BIGINT NOT NULL,
            PRIMARY KEY (user_id, book_id),
            FOREIGN KEY (user_id) REFERENCES users (id),
            FOREIGN KEY (book_id) REFERENCES books (id)
        )
        "#,
    ),
    (
        AUTHORSHIPS,
        r#"
        CREATE TABLE IF NOT EXISTS authorships (
            author_id BIGINT NOT NULL,
            book_id BIGINT NOT NULL,
            PRIMARY KEY (author_id, book_id),
            FOREIGN KEY (author_id) REFERENCES authors (id),
            FOREIGN KEY (book_id) REFERENCES books (id)
        )
        "#,
    ),
    (
        FAVORITE_BOOKS,
        r#"
        CREATE TABLE IF NOT EXISTS favorite_books (
            user_id BIGINT NOT NULL,
            book_id BIGINT NOT NULL,
            PRIMARY KEY (user_id, book_id),
            FOREIGN KEY (user_id) REFERENCES users (id),
            FOREIGN KEY (book_id) REFERENCES books (id)
        )
        "#,
    ),
    (
        FAVORITE_AUTHORS,
        r#"
        CREATE TABLE IF NOT EXISTS favorite_authors (
            user_id BIGINT NOT NULL,
            author_id BIGINT NOT NULL,
            PRIMARY KEY (user_id, author_id),
            FOREIGN KEY (user_id) REFERENCES users (id),
            FOREIGN KEY (author_id) REFERENCES authors (id)
        )
        "#,
    ),
];

/// Names of all tables in creation order
pub fn table_names() -> impl Iterator<Item = &'static str> {
    TABLES.iter().map(|(name, _)| *name)
}

/// Ensure every table exists
///
/// Stops at the first table that can't be created.
pub async fn ensure_schema(pool: &AnyPool) -> Result<()> {
    for &(table, ddl) in TABLES {
        sqlx::query(ddl)
            .execute(pool)
            .await
            .map_err(|source| LibraryError::Schema { table, source })?;

        tracing::debug!(table, "table ensured");
    }

    Ok(())
}
