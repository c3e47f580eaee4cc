// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The Database Descriptor (spec.md §3): the output of discovery. Sensitive
//! fields travel in memory only — never serialized to disk except through
//! the dump tool's own credential channel (environment variable, not argv).

use std::path::PathBuf;

/// Which database engine a descriptor names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Engine {
    Sqlite,
    Postgres,
    Mysql,
    Mongo,
}

impl std::fmt::Display for Engine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Engine::Sqlite => "sqlite",
            Engine::Postgres => "postgres",
            Engine::Mysql => "mysql",
            Engine::Mongo => "mongo",
        })
    }
}

/// A discovered network-reachable database, local or remote (spec.md §3).
#[derive(Debug, Clone, PartialEq)]
pub struct NetworkDb {
    pub engine: Engine,
    pub host: String,
    pub port: u16,
    pub database: String,
    pub user: Option<String>,
    pub password: Option<String>,
    pub is_local: bool,
    pub source_url: Option<String>,
    pub require_ssl: bool,
}

/// A discovered Docker-hosted database (spec.md §3).
#[derive(Debug, Clone, PartialEq)]
pub struct DockerDb {
    pub container: String,
    pub engine: Engine,
    pub database: String,
    pub user: Option<String>,
    pub password: Option<String>,
}

/// Emitted by discovery: one of three shapes, per spec.md §3.
#[derive(Debug, Clone, PartialEq)]
pub enum DatabaseDescriptor {
    Sqlite { path: PathBuf },
    Network(NetworkDb),
    Docker(DockerDb),
}

impl DatabaseDescriptor {
    pub fn engine(&self) -> Engine {
        match self {
            DatabaseDescriptor::Sqlite { .. } => Engine::Sqlite,
            DatabaseDescriptor::Network(n) => n.engine,
            DatabaseDescriptor::Docker(d) => d.engine,
        }
    }

    /// The deduplication key: normalized `(engine, host, port, database)`
    /// (spec.md §4.6 "Deduplicate by normalized..."). SQLite dedups by its
    /// canonicalized path instead, since it has no host/port.
    pub fn dedup_key(&self) -> String {
        match self {
            DatabaseDescriptor::Sqlite { path } => {
                format!("sqlite|{}", path.to_string_lossy())
            }
            DatabaseDescriptor::Network(n) => {
                format!("{}|{}|{}|{}", n.engine, n.host.to_ascii_lowercase(), n.port, n.database)
            }
            DatabaseDescriptor::Docker(d) => {
                format!("{}|{}|0|{}", d.engine, d.container, d.database)
            }
        }
    }

    pub fn database_name(&self) -> &str {
        match self {
            DatabaseDescriptor::Sqlite { path } => {
                path.file_stem().and_then(|s| s.to_str()).unwrap_or("sqlite")
            }
            DatabaseDescriptor::Network(n) => &n.database,
            DatabaseDescriptor::Docker(d) => &d.database,
        }
    }
}

/// True if `host` normalizes to a loopback address (spec.md §4.6 "Mark each
/// descriptor `is_local`").
pub fn is_local_host(host: &str) -> bool {
    matches!(host.trim(), "localhost" | "127.0.0.1" | "::1" | "0.0.0.0")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_network(host: &str) -> NetworkDb {
        NetworkDb {
            engine: Engine::Postgres,
            host: host.into(),
            port: 5432,
            database: "app".into(),
            user: None,
            password: None,
            is_local: false,
            source_url: None,
            require_ssl: true,
        }
    }

    #[test]
    fn dedup_key_is_case_insensitive_on_host() {
        let a = DatabaseDescriptor::Network(sample_network("DB.Example.com"));
        let b = DatabaseDescriptor::Network(sample_network("db.example.com"));
        assert_eq!(a.dedup_key(), b.dedup_key());
    }

    #[test]
    fn recognizes_loopback_variants() {
        assert!(is_local_host("localhost"));
        assert!(is_local_host("127.0.0.1"));
        assert!(is_local_host("::1"));
        assert!(!is_local_host("db.example.com"));
    }
}
