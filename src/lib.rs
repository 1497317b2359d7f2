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


//! Storage core and REST backend for a small library catalogue
//!
//! Users, books and authors plus the relations between them (reviews,
//! authorships, favorites), persisted on SQLite or MySQL.

pub mod config;
pub mod error;
pub mod logging;
pub mod storage;

#[cfg(feature = "server")]
pub mod api;

pub use error::{LibraryError, Result};
pub use storage::Storage;
