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


//! Application configuration
//!
//! Configuration is a YAML document with three sections: `environment`,
//! `storage` and `http_server`. The file path is taken from the `--config`
//! flag or, failing that, from the `DIGITAL_LIBRARY_CONFIG` environment
//! variable (a `.env` file in the working directory is honoured).
//!
//! # Example
//! ```yaml
//! environment:
//!   env: local
//! storage:
//!   db: sqlite
//!   sqlite_options:
//!     sqlite_path: ./data/library.db
//!     sqlite_foreign_keys: true
//! http_server:
//!   port: 5454
//! ```

use crate::error::{LibraryError, Result};
use serde::{Deserialize, Serialize};
use std::net::{SocketAddr, ToSocketAddrs};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Environment variable consulted when no `--config` flag is given
pub const CONFIG_PATH_ENV: &str = "DIGITAL_LIBRARY_CONFIG";

/// Top-level configuration document
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub environment: EnvironmentOptions,
    pub storage: StorageOptions,
    #[serde(default)]
    pub http_server: HttpServerOptions,
}

/// Deployment environment, selects the log format
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnvironmentOptions {
    #[serde(default = "default_env")]
    pub env: String,
}

impl Default for EnvironmentOptions {
    fn default() -> Self {
        Self { env: default_env() }
    }
}

/// Storage backend selection and backend-specific options
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StorageOptions {
    /// Backend name: `sqlite` or `mysql`
    pub db: String,

    /// Upper bound for a single storage call, in seconds
    #[serde(default)]
    pub query_timeout_secs: Option<u64>,

    #[serde(default)]
    pub sqlite_options: SqliteOptions,

    #[serde(default)]
    pub mysql_options: MySqlOptions,
}

impl StorageOptions {
    /// SQLite options for the given path with foreign keys enforced
    pub fn sqlite<P: Into<String>>(path: P) -> Self {
        Self {
            db: "sqlite".to_string(),
            query_timeout_secs: None,
            sqlite_options: SqliteOptions {
                path: path.into(),
                foreign_keys: true,
            },
            mysql_options: MySqlOptions::default(),
        }
    }

    /// In-memory SQLite store, mostly useful for tests
    pub fn in_memory() -> Self {
        Self::sqlite(":memory:")
    }

    pub fn query_timeout(&self) -> Option<Duration> {
        self.query_timeout_secs.map(Duration::from_secs)
    }
}

/// Embedded store options
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SqliteOptions {
    #[serde(rename = "sqlite_path", default)]
    pub path: String,

    /// Enforce declared foreign keys (`PRAGMA foreign_keys`)
    #[serde(rename = "sqlite_foreign_keys", default = "default_true")]
    pub foreign_keys: bool,
}

impl Default for SqliteOptions {
    fn default() -> Self {
        Self {
            path: String::new(),
            foreign_keys: true,
        }
    }
}

/// Networked store options
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MySqlOptions {
    #[serde(rename = "mysql_name", default)]
    pub name: String,
    #[serde(rename = "mysql_user", default)]
    pub user: String,
    #[serde(rename = "mysql_password", default)]
    pub password: String,
    #[serde(rename = "mysql_host", default = "default_host")]
    pub host: String,
    #[serde(rename = "mysql_port", default = "default_mysql_port")]
    pub port: u16,
    #[serde(rename = "mysql_max_conn_lifetime_secs", default = "default_conn_lifetime")]
    pub max_conn_lifetime_secs: u64,
    /// 0 leaves the pool size at the driver default
    #[serde(rename = "mysql_max_open_conns", default = "default_max_conns")]
    pub max_open_conns: u32,
}

impl Default for MySqlOptions {
    fn default() -> Self {
        Self {
            name: String::new(),
            user: String::new(),
            password: String::new(),
            host: default_host(),
            port: default_mysql_port(),
            max_conn_lifetime_secs: default_conn_lifetime(),
            max_open_conns: default_max_conns(),
        }
    }
}

impl MySqlOptions {
    pub fn max_conn_lifetime(&self) -> Duration {
        Duration::from_secs(self.max_conn_lifetime_secs)
    }
}

/// HTTP listener options
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpServerOptions {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_http_port")]
    pub port: u16,
    /// Per-request deadline enforced by the router
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

impl Default for HttpServerOptions {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_http_port(),
            timeout_secs: default_timeout(),
        }
    }
}

impl HttpServerOptions {
    /// Resolve `host:port` to a socket address
    pub fn listen_addr(&self) -> Result<SocketAddr> {
        (self.host.as_str(), self.port)
            .to_socket_addrs()?
            .next()
            .ok_or_else(|| {
                LibraryError::config(format!("can't resolve {}:{}", self.host, self.port))
            })
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

fn default_env() -> String {
    "local".to_string()
}

fn default_true() -> bool {
    true
}

fn default_host() -> String {
    "localhost".to_string()
}

fn default_mysql_port() -> u16 {
    3306
}

fn default_http_port() -> u16 {
    5454
}

fn default_conn_lifetime() -> u64 {
    180
}

fn default_max_conns() -> u32 {
    10
}

fn default_timeout() -> u64 {
    5
}

impl Config {
    /// Load configuration from the flag path or the environment
    ///
    /// # Errors
    /// Returns `LibraryError::Config` if:
    /// - Neither a flag path nor `DIGITAL_LIBRARY_CONFIG` is set
    /// - The file doesn't exist
    /// - The YAML can't be parsed
    pub fn load(flag_path: Option<PathBuf>) -> Result<Self> {
        dotenvy::dotenv().ok();

        let path = resolve_path(flag_path, std::env::var(CONFIG_PATH_ENV).ok())?;
        Self::from_file(&path)
    }

    /// Read and parse a configuration file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(LibraryError::config(format!(
                "file {} specified in config path doesn't exist",
                path.display()
            )));
        }

        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    /// Parse a configuration document
    pub fn from_yaml(content: &str) -> Result<Self> {
        let config: Config = serde_yaml::from_str(content)?;
        if config.storage.db.is_empty() {
            return Err(LibraryError::config("storage.db is required"));
        }
        Ok(config)
    }
}

/// Flag wins over the environment variable
fn resolve_path(flag_path: Option<PathBuf>, env_path: Option<String>) -> Result<PathBuf> {
    if let Some(path) = flag_path.filter(|p| !p.as_os_str().is_empty()) {
        return Ok(path);
    }
    if let Some(path) = env_path.filter(|p| !p.is_empty()) {
        return Ok(PathBuf::from(path));
    }
    Err(LibraryError::config(
        "config path wasn't specified neither as command-line flag nor as environment variable",
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const FULL_CONFIG: &str = r#"
environment:
  env: prod
storage:
  db: mysql
  query_timeout_secs: 3
  mysql_options:
    mysql_name: library
    mysql_user: root
    mysql_password: secret
    mysql_max_conn_lifetime_secs: 60
    mysql_max_open_conns: 20
    mysql_max_idle_conns: 5
http_server:
  host: 127.0.0.1
  port: 8080
"#;

    #[test]
    fn test_parse_full_config() {
        let config = Config::from_yaml(FULL_CONFIG).expect("Failed to parse config");

        assert_eq!(config.environment.env, "prod");
        assert_eq!(config.storage.db, "mysql");
        assert_eq!(config.storage.query_timeout(), Some(Duration::from_secs(3)));

        let mysql = &config.storage.mysql_options;
        assert_eq!(mysql.name, "library");
        assert_eq!(mysql.host, "localhost");
        assert_eq!(mysql.port, 3306);
        assert_eq!(mysql.max_conn_lifetime(), Duration::from_secs(60));
        assert_eq!(mysql.max_open_conns, 20);

        assert_eq!(config.http_server.port, 8080);
        assert_eq!(config.http_server.timeout_secs, 5);
    }

    #[test]
    fn test_defaults_applied() {
        let config = Config::from_yaml(
            "storage:\n  db: sqlite\n  sqlite_options:\n    sqlite_path: lib.db\n",
        )
        .unwrap();

        assert_eq!(config.environment.env, "local");
        assert_eq!(config.http_server.host, "localhost");
        assert_eq!(config.http_server.port, 5454);
        assert_eq!(config.storage.sqlite_options.path, "lib.db");
        assert!(config.storage.sqlite_options.foreign_keys);
        assert_eq!(config.storage.query_timeout(), None);
    }

    #[test]
    fn test_missing_db_is_rejected() {
        let err = Config::from_yaml("storage:\n  db: \"\"\n").unwrap_err();
        assert!(matches!(err, LibraryError::Config(_)));
    }

    #[test]
    fn test_resolve_path_prefers_flag() {
        let path = resolve_path(Some(PathBuf::from("a.yaml")), Some("b.yaml".into())).unwrap();
        assert_eq!(path, PathBuf::from("a.yaml"));

        let path = resolve_path(None, Some("b.yaml".into())).unwrap();
        assert_eq!(path, PathBuf::from("b.yaml"));

        assert!(resolve_path(None, None).is_err());
        assert!(resolve_path(Some(PathBuf::new()), Some(String::new())).is_err());
    }

    #[test]
    fn test_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(FULL_CONFIG.as_bytes()).unwrap();

        let config = Config::from_file(file.path()).expect("Failed to load config file");
        assert_eq!(config.storage.db, "mysql");

        let missing = Config::from_file("/definitely/not/here.yaml").unwrap_err();
        assert!(missing.to_string().contains("doesn't exist"));
    }

    #[test]
    fn test_listen_addr() {
        let opts = HttpServerOptions {
            host: "127.0.0.1".to_string(),
            port: 5454,
            ..Default::default()
        };
        assert_eq!(opts.listen_addr().unwrap().port(), 5454);
    }
}
