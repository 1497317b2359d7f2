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


//! Database storage and models
//!
//! Persistence for the library catalogue on either SQLite or MySQL, through
//! one `sqlx::AnyPool`.
//!
//! # Layers
//! - `connection` - opens the pool for the configured backend
//! - `schema` - creates the tables
//! - `queries` - single-row CRUD per entity
//! - `composite` - ordered multi-row joins
//! - `cascade` - transactional multi-table deletes
//! - `database` - the [`Storage`] facade tying them together
//!
//! # Database Schema
//! - users, books, authors: keyed by caller-supplied `id`
//! - book_reviews: (user_id, book_id) with a rating
//! - authorships: (author_id, book_id)
//! - favorite_books: (user_id, book_id)
//! - favorite_authors: (user_id, author_id)
//!
//! # Usage Example
//! ```no_run
//! use digital_library::config::StorageOptions;
//! use digital_library::storage::{Book, FavoriteBook, Role, Storage, User};
//!
//! # async fn example() -> digital_library::Result<()> {
//! let storage = Storage::init(&StorageOptions::sqlite("./library.db")).await?;
//!
//! storage.post_user(&User::new(1, "Ada", "Lovelace", Role::User)).await?;
//! storage.post_book(&Book::new(10, "123", "T", 1990, "P")).await?;
//! storage.post_favorite_book(&FavoriteBook { user_id: 1, book_id: 10 }).await?;
//!
//! let favorites = storage.get_user_favorite_books(1).await?;
//! assert_eq!(favorites.len(), 1);
//! # Ok(())
//! # }
//! ```

pub mod cascade;
pub mod composite;
pub mod connection;
pub mod database;
pub mod models;
pub mod queries;
pub mod schema;

// Re-export commonly used types
pub use connection::BackendKind;
pub use database::Storage;
pub use models::{
    Author, Authorship, Book, BookReview, FavoriteAuthor, FavoriteBook, InvalidRole, Role, User,
};
