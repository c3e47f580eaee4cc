// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Database discovery (spec.md §4.6): scans a project root for env files,
//! framework configs, connection URLs, and `docker-compose.yml` services,
//! emitting a deduplicated list of Database Descriptors.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use regex::Regex;
use walkdir::WalkDir;

use crate::descriptor::{is_local_host, DatabaseDescriptor, DockerDb, Engine, NetworkDb};

const MAX_SCAN_DEPTH: usize = 3;
const MAX_COMPOSE_DEPTH: usize = 2;

/// Discovers every database a project references, deduplicated by
/// normalized `(engine, host, port, database)` (spec.md §4.6).
pub fn discover(root: &Path) -> Vec<DatabaseDescriptor> {
    let mut found: Vec<DatabaseDescriptor> = Vec::new();

    for entry in WalkDir::new(root).max_depth(MAX_SCAN_DEPTH).into_iter().flatten() {
        let path = entry.path();
        if !entry.file_type().is_file() {
            continue;
        }
        let name = entry.file_name().to_string_lossy();
        if name.starts_with(".env") {
            if let Ok(contents) = std::fs::read_to_string(path) {
                found.extend(from_env_contents(&contents));
            }
        } else if name == "wp-config.php" {
            if let Ok(contents) = std::fs::read_to_string(path) {
                found.extend(from_php_defines(&contents));
            }
        } else if path.ends_with("config/database.yml") {
            if let Ok(contents) = std::fs::read_to_string(path) {
                found.extend(from_rails_database_yml(&contents));
            }
        } else if name == "application.properties" || name == "application.yml" {
            if let Ok(contents) = std::fs::read_to_string(path) {
                found.extend(from_spring_config(&contents, name.ends_with(".yml")));
            }
        }
    }

    for entry in WalkDir::new(root).max_depth(MAX_COMPOSE_DEPTH).into_iter().flatten() {
        let name = entry.file_name().to_string_lossy();
        if name == "docker-compose.yml" || name == "compose.yml" {
            if let Ok(contents) = std::fs::read_to_string(entry.path()) {
                found.extend(from_compose(&contents));
            }
        }
    }

    found.extend(scan_sqlite_files(root));

    dedup(found)
}

fn dedup(descriptors: Vec<DatabaseDescriptor>) -> Vec<DatabaseDescriptor> {
    let mut seen = std::collections::HashSet::new();
    let mut out = Vec::new();
    for d in descriptors {
        if seen.insert(d.dedup_key()) {
            out.push(d);
        }
    }
    out
}

/// `true` for placeholder values that aren't usable credentials (spec.md
/// §4.6 "Recognize values as placeholders ... and skip").
fn is_placeholder(value: &str) -> bool {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return true;
    }
    matches!(trimmed.to_ascii_lowercase().as_str(), "null" | "none" | "undefined")
}

/// `true` for values carrying unresolved shell/template interpolation
/// (spec.md §4.6 "Skip values that contain unresolved interpolation").
fn has_unresolved_interpolation(value: &str) -> bool {
    value.contains("${") || value.contains("$(") || (value.starts_with('$') && value.len() > 1)
}

fn usable(value: &str) -> bool {
    !is_placeholder(value) && !has_unresolved_interpolation(value)
}

fn strip_quotes(value: &str) -> &str {
    let v = value.trim();
    if v.len() >= 2 {
        let bytes = v.as_bytes();
        if (bytes[0] == b'"' && bytes[bytes.len() - 1] == b'"')
            || (bytes[0] == b'\'' && bytes[bytes.len() - 1] == b'\'')
        {
            return &v[1..v.len() - 1];
        }
    }
    v
}

/// Strips a trailing unquoted `# comment` from a shell-style `KEY=value`
/// line, per spec.md §4.6 "inline-comment stripping".
fn strip_inline_comment(value: &str) -> &str {
    let trimmed = value.trim();
    if trimmed.starts_with('"') || trimmed.starts_with('\'') {
        return trimmed;
    }
    match trimmed.find('#') {
        Some(idx) => trimmed[..idx].trim_end(),
        None => trimmed,
    }
}

fn parse_shell_env(contents: &str) -> HashMap<String, String> {
    let mut map = HashMap::new();
    for line in contents.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let line = line.strip_prefix("export ").unwrap_or(line);
        if let Some((key, value)) = line.split_once('=') {
            let value = strip_inline_comment(value);
            map.insert(key.trim().to_string(), strip_quotes(value).to_string());
        }
    }
    map
}

fn connection_url_regex() -> Regex {
    #[allow(clippy::unwrap_used)]
    Regex::new(
        r"(?i)^(postgres(?:ql)?(?:\+[a-z0-9]+)?|mysql2?|mariadb|mongodb(?:\+srv)?)://(?:([^:@/]+)(?::([^@/]*))?@)?([^:/?]+)(?::(\d+))?/([^?]+)(?:\?(.*))?$",
    )
    .unwrap()
}

/// Parses one connection URL, recognizing `sslmode` in the query string
/// (spec.md §4.6).
pub fn parse_connection_url(url: &str) -> Option<NetworkDb> {
    let re = connection_url_regex();
    let caps = re.captures(url.trim())?;
    let scheme = caps.get(1)?.as_str().to_ascii_lowercase();
    let engine = if scheme.starts_with("postgres") {
        Engine::Postgres
    } else if scheme.starts_with("mysql") || scheme == "mariadb" {
        Engine::Mysql
    } else if scheme.starts_with("mongodb") {
        Engine::Mongo
    } else {
        return None;
    };
    let user = caps.get(2).map(|m| m.as_str().to_string());
    let password = caps.get(3).map(|m| m.as_str().to_string());
    let host = caps.get(4)?.as_str().to_string();
    let default_port = match engine {
        Engine::Postgres => 5432,
        Engine::Mysql => 3306,
        Engine::Mongo => 27017,
        Engine::Sqlite => 0,
    };
    let port = caps.get(5).and_then(|m| m.as_str().parse().ok()).unwrap_or(default_port);
    let database = caps.get(6)?.as_str().to_string();
    let query = caps.get(7).map(|m| m.as_str()).unwrap_or("");
    let require_ssl = query.contains("sslmode=require");
    let is_local = is_local_host(&host);

    Some(NetworkDb {
        engine,
        host,
        port,
        database,
        user,
        password,
        is_local,
        source_url: Some(url.to_string()),
        require_ssl,
    })
}

/// Discrete env-prefix recognition per engine, plus the generic
/// Laravel-style `DB_CONNECTION` block (spec.md §4.6).
fn from_env_contents(contents: &str) -> Vec<DatabaseDescriptor> {
    let map = parse_shell_env(contents);
    let mut out = Vec::new();

    for (_, value) in map.iter() {
        if let Some(net) = parse_connection_url(value) {
            out.push(DatabaseDescriptor::Network(net));
        }
    }

    for (engine, prefixes, default_port) in [
        (Engine::Postgres, &["POSTGRES_", "PG_"][..], 5432u16),
        (Engine::Mysql, &["MYSQL_"][..], 3306),
        (Engine::Mongo, &["MONGO_", "MONGODB_"][..], 27017),
    ] {
        if let Some(net) = from_prefixed_block(&map, prefixes, engine, default_port) {
            out.push(DatabaseDescriptor::Network(net));
        }
    }

    if let Some(net) = from_laravel_block(&map) {
        out.push(DatabaseDescriptor::Network(net));
    }

    out
}

fn get_any(map: &HashMap<String, String>, prefixes: &[&str], suffix: &str) -> Option<String> {
    for prefix in prefixes {
        if let Some(v) = map.get(&format!("{prefix}{suffix}")) {
            if usable(v) {
                return Some(v.clone());
            }
        }
    }
    None
}

fn from_prefixed_block(
    map: &HashMap<String, String>,
    prefixes: &[&str],
    engine: Engine,
    default_port: u16,
) -> Option<NetworkDb> {
    let database = get_any(map, prefixes, "DB")
        .or_else(|| get_any(map, prefixes, "DATABASE"))
        .or_else(|| get_any(map, prefixes, "DBNAME"))?;
    let host = get_any(map, prefixes, "HOST").unwrap_or_else(|| "localhost".to_string());
    let port = get_any(map, prefixes, "PORT").and_then(|p| p.parse().ok()).unwrap_or(default_port);
    let user = get_any(map, prefixes, "USER").or_else(|| get_any(map, prefixes, "USERNAME"));
    let password = get_any(map, prefixes, "PASSWORD").or_else(|| get_any(map, prefixes, "PASS"));
    let is_local = is_local_host(&host);
    Some(NetworkDb { engine, host, port, database, user, password, is_local, source_url: None, require_ssl: false })
}

fn from_laravel_block(map: &HashMap<String, String>) -> Option<NetworkDb> {
    let connection = map.get("DB_CONNECTION").filter(|v| usable(v))?;
    let engine = match connection.to_ascii_lowercase().as_str() {
        "pgsql" | "postgres" | "postgresql" => Engine::Postgres,
        "mysql" | "mariadb" => Engine::Mysql,
        "mongodb" => Engine::Mongo,
        "sqlite" => return None, // handled by the sqlite file scan instead
        _ => return None,
    };
    let database = get_any(map, &["DB_"], "DATABASE")?;
    let host = get_any(map, &["DB_"], "HOST").unwrap_or_else(|| "localhost".to_string());
    let default_port = match engine {
        Engine::Postgres => 5432,
        Engine::Mysql => 3306,
        Engine::Mongo => 27017,
        Engine::Sqlite => 0,
    };
    let port = get_any(map, &["DB_"], "PORT").and_then(|p| p.parse().ok()).unwrap_or(default_port);
    let user = get_any(map, &["DB_"], "USERNAME").or_else(|| get_any(map, &["DB_"], "USER"));
    let password = get_any(map, &["DB_"], "PASSWORD");
    let is_local = is_local_host(&host);
    Some(NetworkDb { engine, host, port, database, user, password, is_local, source_url: None, require_ssl: false })
}

/// PHP `define('KEY', 'value')` parsing for `wp-config.php` (spec.md §4.6).
fn from_php_defines(contents: &str) -> Vec<DatabaseDescriptor> {
    #[allow(clippy::unwrap_used)]
    let re = Regex::new(r#"define\s*\(\s*['"]([A-Z_]+)['"]\s*,\s*['"]([^'"]*)['"]"#).unwrap();
    let mut map = HashMap::new();
    for caps in re.captures_iter(contents) {
        let key = caps[1].to_string();
        let value = caps[2].to_string();
        if usable(&value) {
            map.insert(key, value);
        }
    }
    let database = match map.get("DB_NAME") {
        Some(d) => d.clone(),
        None => return Vec::new(),
    };
    let host = map.get("DB_HOST").cloned().unwrap_or_else(|| "localhost".to_string());
    let user = map.get("DB_USER").cloned();
    let password = map.get("DB_PASSWORD").cloned();
    let is_local = is_local_host(&host);
    vec![DatabaseDescriptor::Network(NetworkDb {
        engine: Engine::Mysql,
        host,
        port: 3306,
        database,
        user,
        password,
        is_local,
        source_url: None,
        require_ssl: false,
    })]
}

/// Minimal `key: value` line extraction, sufficient for the flat top-level
/// shape Rails' `config/database.yml` and Spring's `application.yml` use
/// for database settings (no full YAML document model needed here).
fn flat_key_values(contents: &str) -> HashMap<String, String> {
    let mut map = HashMap::new();
    for line in contents.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        if let Some((key, value)) = line.split_once(':') {
            let value = strip_quotes(value.trim());
            if !value.is_empty() {
                map.insert(key.trim().trim_start_matches('-').trim().to_string(), value.to_string());
            }
        }
    }
    map
}

fn from_rails_database_yml(contents: &str) -> Vec<DatabaseDescriptor> {
    let map = flat_key_values(contents);
    let adapter = map.get("adapter").cloned().unwrap_or_default();
    let engine = match adapter.as_str() {
        "postgresql" | "postgres" => Engine::Postgres,
        "mysql2" | "mysql" => Engine::Mysql,
        "sqlite3" => return Vec::new(), // handled by the sqlite file scan
        _ => return Vec::new(),
    };
    let database = match map.get("database") {
        Some(d) if usable(d) => d.clone(),
        _ => return Vec::new(),
    };
    let host = map.get("host").cloned().unwrap_or_else(|| "localhost".to_string());
    let default_port = if engine == Engine::Postgres { 5432 } else { 3306 };
    let port = map.get("port").and_then(|p| p.parse().ok()).unwrap_or(default_port);
    let user = map.get("username").cloned();
    let password = map.get("password").filter(|v| usable(v)).cloned();
    let is_local = is_local_host(&host);
    vec![DatabaseDescriptor::Network(NetworkDb {
        engine,
        host,
        port,
        database,
        user,
        password,
        is_local,
        source_url: None,
        require_ssl: false,
    })]
}

fn from_spring_config(contents: &str, _is_yaml: bool) -> Vec<DatabaseDescriptor> {
    let map = flat_key_values(contents);
    let url_key = map.get("spring.datasource.url").or_else(|| map.get("url"));
    let Some(raw_url) = url_key else { return Vec::new() };
    // Spring uses `jdbc:postgresql://host:port/db` — strip the `jdbc:` prefix
    // before the normal connection-URL parser applies.
    let url = raw_url.strip_prefix("jdbc:").unwrap_or(raw_url);
    match parse_connection_url(url) {
        Some(mut net) => {
            net.user = map.get("spring.datasource.username").cloned().or(net.user);
            net.password = map
                .get("spring.datasource.password")
                .filter(|v| usable(v))
                .cloned()
                .or(net.password);
            vec![DatabaseDescriptor::Network(net)]
        }
        None => Vec::new(),
    }
}

const COMPOSE_IMAGES: &[(&str, Engine, u16)] = &[
    ("postgres", Engine::Postgres, 5432),
    ("mysql", Engine::Mysql, 3306),
    ("mariadb", Engine::Mysql, 3306),
    ("mongo", Engine::Mongo, 27017),
];

/// Extracts DB-like services from a `docker-compose.yml`/`compose.yml`
/// document using the same flat-line scanner as the YAML-ish config files
/// above — sufficient for the conventional two-space service block shape
/// these manifests use in practice (spec.md §4.6).
fn from_compose(contents: &str) -> Vec<DatabaseDescriptor> {
    let mut out = Vec::new();
    let mut current_image: Option<(Engine, u16)> = None;
    let mut current_container: Option<String> = None;
    let mut env: HashMap<String, String> = HashMap::new();

    let flush = |out: &mut Vec<DatabaseDescriptor>,
                 image: &Option<(Engine, u16)>,
                 container: &Option<String>,
                 env: &HashMap<String, String>| {
        if let Some((engine, _port)) = image {
            let database = match engine {
                Engine::Postgres => get_any(env, &["POSTGRES_"], "DB")
                    .or_else(|| get_any(env, &["POSTGRES_"], "DATABASE"))
                    .unwrap_or_else(|| "postgres".to_string()),
                Engine::Mysql => get_any(env, &["MYSQL_"], "DATABASE").unwrap_or_else(|| "mysql".to_string()),
                Engine::Mongo => get_any(env, &["MONGO_INITDB_"], "DATABASE")
                    .unwrap_or_else(|| "admin".to_string()),
                Engine::Sqlite => return,
            };
            let user = match engine {
                Engine::Postgres => get_any(env, &["POSTGRES_"], "USER"),
                Engine::Mysql => get_any(env, &["MYSQL_"], "USER"),
                Engine::Mongo => get_any(env, &["MONGO_INITDB_ROOT_"], "USERNAME"),
                Engine::Sqlite => None,
            };
            let password = match engine {
                Engine::Postgres => get_any(env, &["POSTGRES_"], "PASSWORD"),
                Engine::Mysql => get_any(env, &["MYSQL_"], "PASSWORD").or_else(|| get_any(env, &["MYSQL_"], "ROOT_PASSWORD")),
                Engine::Mongo => get_any(env, &["MONGO_INITDB_ROOT_"], "PASSWORD"),
                Engine::Sqlite => None,
            };
            out.push(DatabaseDescriptor::Docker(DockerDb {
                container: container.clone().unwrap_or_else(|| "unnamed".to_string()),
                engine: *engine,
                database,
                user,
                password,
            }));
        }
    };

    for line in contents.lines() {
        let trimmed = line.trim_start().trim_end();
        if trimmed.is_empty() {
            continue;
        }
        if let Some(rest) = trimmed.strip_prefix("image:") {
            // New service block starting — flush the previous one.
            flush(&mut out, &current_image, &current_container, &env);
            env.clear();
            current_container = None;
            let image_name = strip_quotes(rest.trim());
            current_image = COMPOSE_IMAGES
                .iter()
                .find(|(prefix, _, _)| image_name.starts_with(prefix))
                .map(|(_, engine, port)| (*engine, *port));
        } else if let Some(rest) = trimmed.strip_prefix("container_name:") {
            current_container = Some(strip_quotes(rest.trim()).to_string());
        } else if let Some((key, value)) = trimmed.trim_start_matches('-').trim().split_once('=') {
            if key.chars().all(|c| c.is_ascii_uppercase() || c == '_') {
                env.insert(key.to_string(), strip_quotes(value).to_string());
            }
        }
    }
    flush(&mut out, &current_image, &current_container, &env);

    out
}

const SQLITE_HEADER: &[u8] = b"SQLite format 3\0";

fn scan_sqlite_files(root: &Path) -> Vec<DatabaseDescriptor> {
    let mut out = Vec::new();
    for entry in WalkDir::new(root).max_depth(MAX_SCAN_DEPTH).into_iter().flatten() {
        if !entry.file_type().is_file() {
            continue;
        }
        let path = entry.path();
        let ext_matches = matches!(
            path.extension().and_then(|e| e.to_str()),
            Some("db") | Some("sqlite") | Some("sqlite3")
        );
        if ext_matches && verify_sqlite_header(path) {
            out.push(DatabaseDescriptor::Sqlite { path: path.to_path_buf() });
        }
    }
    out
}

fn verify_sqlite_header(path: &Path) -> bool {
    use std::io::Read;
    let Ok(mut file) = std::fs::File::open(path) else { return false };
    let mut buf = [0u8; 16];
    if file.read_exact(&mut buf).is_err() {
        return false;
    }
    buf == SQLITE_HEADER
}

/// Shared by callers that also want the original path, not just a bool.
pub fn sqlite_paths(root: &Path) -> Vec<PathBuf> {
    scan_sqlite_files(root)
        .into_iter()
        .filter_map(|d| match d {
            DatabaseDescriptor::Sqlite { path } => Some(path),
            _ => None,
        })
        .collect()
}

#[cfg(test)]
#[path = "discovery_tests.rs"]
mod tests;
