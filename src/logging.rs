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


//! Tracing subscriber setup
//!
//! | env     | format | default level |
//! |---------|--------|---------------|
//! | `local` | text   | debug         |
//! | `dev`   | json   | debug         |
//! | `prod`  | json   | info          |
//!
//! `RUST_LOG` overrides the default level.

use crate::error::{LibraryError, Result};
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

/// Log output format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Text,
    Json,
}

/// Resolved logger settings for an environment
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LogSettings {
    pub format: LogFormat,
    pub level: &'static str,
}

impl LogSettings {
    pub fn for_env(env: &str) -> Result<Self> {
        match env {
            "local" => Ok(Self {
                format: LogFormat::Text,
                level: "debug",
            }),
            "dev" => Ok(Self {
                format: LogFormat::Json,
                level: "debug",
            }),
            "prod" => Ok(Self {
                format: LogFormat::Json,
                level: "info",
            }),
            other => Err(LibraryError::config(format!(
                "can't init logger: invalid env {other} specified"
            ))),
        }
    }
}

/// Install the global subscriber for `env`
///
/// Must be called once, before the first log line.
pub fn init(env: &str) -> Result<()> {
    let settings = LogSettings::for_env(env)?;
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(settings.level));
    let registry = tracing_subscriber::registry().with(filter);

    let installed = match settings.format {
        LogFormat::Json => registry
            .with(fmt::layer().json().with_current_span(false))
            .try_init(),
        LogFormat::Text => registry
            .with(fmt::layer().with_target(true).with_line_number(true))
            .try_init(),
    };

    installed.map_err(|e| LibraryError::config(format!("can't init logger: {e}")))
}
