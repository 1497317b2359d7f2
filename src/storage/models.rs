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


//! Database models
//!
//! Row-shaped entities for every table. Field names match column names, so
//! each struct derives `FromRow` directly and serializes to the same JSON
//! the HTTP layer exchanges.
//!
//! # Design Notes
//! - Primary keys are supplied by the caller, never generated
//! - All integers are `i64` so both backends decode them the same way
//! - Many-to-many relationships use junction tables with composite keys

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use thiserror::Error;

// ============================================================================
// ENUMS
// ============================================================================

/// User role, stored as an integer column
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i64")]
#[repr(i64)]
pub enum Role {
    User = 1,
    Moderator = 2,
    Admin = 3,
}

/// Stored role value outside 1..=3
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("invalid role {0}, expected 1 (user), 2 (mod) or 3 (admin)")]
pub struct InvalidRole(pub i64);

impl Role {
    pub fn as_i64(self) -> i64 {
        self as i64
    }
}

impl TryFrom<i64> for Role {
    type Error = InvalidRole;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Role::User),
            2 => Ok(Role::Moderator),
            3 => Ok(Role::Admin),
            other => Err(InvalidRole(other)),
        }
    }
}

impl From<Role> for i64 {
    fn from(role: Role) -> Self {
        role.as_i64()
    }
}

// ============================================================================
// MAIN ENTITIES
// ============================================================================

/// Library user
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub first_name: String,
    pub second_name: String,
    #[sqlx(try_from = "i64")]
    pub role: Role,
}

impl User {
    pub fn new(id: i64, first_name: &str, second_name: &str, role: Role) -> Self {
        Self {
            id,
            first_name: first_name.to_string(),
            second_name: second_name.to_string(),
            role,
        }
    }
}

/// Book
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize, Deserialize)]
pub struct Book {
    pub id: i64,
    pub isbn: String,
    pub title: String,
    pub year: i64,
    pub publisher: String,
}

impl Book {
    pub fn new(id: i64, isbn: &str, title: &str, year: i64, publisher: &str) -> Self {
        Self {
            id,
            isbn: isbn.to_string(),
            title: title.to_string(),
            year,
            publisher: publisher.to_string(),
        }
    }
}

/// Author
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize, Deserialize)]
pub struct Author {
    pub id: i64,
    pub full_name: String,
}

impl Author {
    pub fn new(id: i64, full_name: &str) -> Self {
        Self {
            id,
            full_name: full_name.to_string(),
        }
    }
}

// ============================================================================
// JUNCTION TABLES
// ============================================================================

/// A user's rating of a book
///
/// Composite primary key: (user_id, book_id)
#[derive(Debug, Clone, Copy, PartialEq, Eq, FromRow, Serialize, Deserialize)]
pub struct BookReview {
    pub user_id: i64,
    pub book_id: i64,
    pub rating: i64,
}

/// Author <-> Book
///
/// Composite primary key: (author_id, book_id)
#[derive(Debug, Clone, Copy, PartialEq, Eq, FromRow, Serialize, Deserialize)]
pub struct Authorship {
    pub author_id: i64,
    pub book_id: i64,
}

/// User <-> Book favorite
///
/// Composite primary key: (user_id, book_id)
#[derive(Debug, Clone, Copy, PartialEq, Eq, FromRow, Serialize, Deserialize)]
pub struct FavoriteBook {
    pub user_id: i64,
    pub book_id: i64,
}

/// User <-> Author favorite
///
/// Composite primary key: (user_id, author_id)
#[derive(Debug, Clone, Copy, PartialEq, Eq, FromRow, Serialize, Deserialize)]
pub struct FavoriteAuthor {
    pub user_id: i64,
    pub author_id: i64,
}

/// Display form of a composite key, used in error context
pub(crate) fn pair_key(left: i64, right: i64) -> String {
    format!("({left}, {right})")
}
