// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Per-engine dump mechanics (spec.md §4.6 "Dump mechanics"). Every dump
//! runs under a wall-clock timeout, writes gzip-compressed output, and is
//! verified (decompress-test, non-empty) before being counted successful.
//! Passwords travel via environment variable to the child process, never
//! argv.

use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Duration;

use flate2::write::GzEncoder;
use flate2::Compression;
use tokio::io::AsyncReadExt;
use tokio::process::Command;

use crate::descriptor::{DatabaseDescriptor, Engine, NetworkDb};
use crate::error::DbError;

const DEFAULT_DUMP_TIMEOUT: Duration = Duration::from_secs(120);

/// Result of one successful dump.
pub struct DumpOutput {
    pub path: PathBuf,
    pub bytes_written: u64,
}

async fn tool_path(name: &str) -> Result<(), DbError> {
    let output = Command::new("which").arg(name).stdout(Stdio::null()).stderr(Stdio::null()).status().await;
    match output {
        Ok(status) if status.success() => Ok(()),
        _ => Err(DbError::ToolMissing { tool: tool_static_name(name) }),
    }
}

fn tool_static_name(name: &str) -> &'static str {
    match name {
        "pg_dump" => "pg_dump",
        "mysqldump" => "mysqldump",
        "mongodump" => "mongodump",
        "docker" => "docker",
        _ => "unknown",
    }
}

async fn run_with_timeout(mut cmd: Command, timeout: Duration) -> Result<Vec<u8>, DbError> {
    cmd.stdout(Stdio::piped()).stderr(Stdio::piped());
    let mut child = cmd.spawn().map_err(DbError::Io)?;
    let mut stdout = child.stdout.take().ok_or_else(|| DbError::DumpFailed("no stdout".into()))?;
    let mut buf = Vec::new();

    let read_fut = stdout.read_to_end(&mut buf);
    let wait_fut = child.wait();

    let result = tokio::time::timeout(timeout, async {
        let (_read_result, status) = tokio::join!(read_fut, wait_fut);
        status
    })
    .await;

    match result {
        Ok(Ok(status)) if status.success() => Ok(buf),
        Ok(Ok(status)) => Err(DbError::DumpFailed(format!("exited with {status}"))),
        Ok(Err(e)) => Err(DbError::Io(e)),
        Err(_) => {
            let _ = child.kill().await;
            Err(DbError::Timeout { secs: timeout.as_secs() })
        }
    }
}

fn gzip_to_file(dest: &Path, data: &[u8]) -> Result<u64, DbError> {
    let file = std::fs::File::create(dest)?;
    let mut encoder = GzEncoder::new(file, Compression::default());
    encoder.write_all(data)?;
    encoder.finish()?;
    Ok(std::fs::metadata(dest)?.len())
}

/// Decompress-test + non-empty check (spec.md §4.6, §4.5 step 10). Deletes
/// the artifact on failure.
pub fn verify_and_cleanup_on_failure(path: &Path) -> Result<(), DbError> {
    let verified = (|| -> Result<(), DbError> {
        let file = std::fs::File::open(path)?;
        let mut decoder = flate2::read::GzDecoder::new(file);
        let mut out = Vec::new();
        std::io::Read::read_to_end(&mut decoder, &mut out)?;
        if out.is_empty() {
            return Err(DbError::VerificationFailed);
        }
        Ok(())
    })();
    if verified.is_err() {
        let _ = std::fs::remove_file(path);
    }
    verified
}

/// Dumps one descriptor to `dest_dir`, returning the compressed artifact's
/// path and size. `timeout` defaults to 120s (spec.md §4.6's connection
/// timeout default) when `None`.
pub async fn dump(
    descriptor: &DatabaseDescriptor,
    dest_dir: &Path,
    pid: u32,
    timeout: Option<Duration>,
) -> Result<DumpOutput, DbError> {
    std::fs::create_dir_all(dest_dir)?;
    let timeout = timeout.unwrap_or(DEFAULT_DUMP_TIMEOUT);
    let stamp = crate::timestamp_now();

    match descriptor {
        DatabaseDescriptor::Sqlite { path } => dump_sqlite(path, dest_dir, &stamp, pid),
        DatabaseDescriptor::Network(net) => dump_network(net, dest_dir, &stamp, pid, timeout).await,
        DatabaseDescriptor::Docker(docker_db) => {
            dump_docker(docker_db, dest_dir, &stamp, pid, timeout).await
        }
    }
}

fn dump_sqlite(source: &Path, dest_dir: &Path, stamp: &str, pid: u32) -> Result<DumpOutput, DbError> {
    let db_name = source.file_stem().and_then(|s| s.to_str()).unwrap_or("sqlite");
    let tmp_backup = dest_dir.join(format!("sqlite_{db_name}_{stamp}_{pid}.db.tmp"));
    {
        let src_conn = rusqlite::Connection::open(source)?;
        let mut dst_conn = rusqlite::Connection::open(&tmp_backup)?;
        let backup = rusqlite::backup::Backup::new(&src_conn, &mut dst_conn)?;
        backup.run_to_completion(5, Duration::from_millis(250), None)?;
        let _ = src_conn;
    }
    let raw = std::fs::read(&tmp_backup)?;
    let _ = std::fs::remove_file(&tmp_backup);
    let dest = dest_dir.join(format!("sqlite_{db_name}_{stamp}_{pid}.db.gz"));
    let bytes_written = gzip_to_file(&dest, &raw)?;
    verify_and_cleanup_on_failure(&dest)?;
    Ok(DumpOutput { path: dest, bytes_written })
}

async fn dump_network(
    net: &NetworkDb,
    dest_dir: &Path,
    stamp: &str,
    pid: u32,
    timeout: Duration,
) -> Result<DumpOutput, DbError> {
    let (tool, raw) = match net.engine {
        Engine::Postgres => {
            tool_path("pg_dump").await?;
            let mut cmd = Command::new("pg_dump");
            cmd.arg("-h").arg(&net.host).arg("-p").arg(net.port.to_string());
            cmd.arg("-U").arg(net.user.as_deref().unwrap_or("postgres"));
            cmd.arg("-d").arg(&net.database);
            if net.require_ssl {
                cmd.env("PGSSLMODE", "require");
            }
            if let Some(password) = &net.password {
                cmd.env("PGPASSWORD", password);
            }
            ("pg_dump", run_with_timeout(cmd, timeout).await?)
        }
        Engine::Mysql => {
            tool_path("mysqldump").await?;
            let mut cmd = Command::new("mysqldump");
            cmd.arg("-h").arg(&net.host).arg("-P").arg(net.port.to_string());
            cmd.arg("-u").arg(net.user.as_deref().unwrap_or("root"));
            if let Some(password) = &net.password {
                cmd.env("MYSQL_PWD", password);
            }
            cmd.arg(&net.database);
            ("mysqldump", run_with_timeout(cmd, timeout).await?)
        }
        Engine::Mongo => {
            tool_path("mongodump").await?;
            let mut cmd = Command::new("mongodump");
            cmd.arg("--host").arg(format!("{}:{}", net.host, net.port));
            cmd.arg("--db").arg(&net.database);
            cmd.arg("--archive");
            if let Some(user) = &net.user {
                cmd.arg("--username").arg(user);
            }
            if let Some(password) = &net.password {
                cmd.env("MONGODUMP_PASSWORD", password);
                cmd.arg("--password").arg("$MONGODUMP_PASSWORD");
            }
            ("mongodump", run_with_timeout(cmd, timeout).await?)
        }
        Engine::Sqlite => unreachable!("NetworkDb never carries Engine::Sqlite"),
    };

    let ext = if tool == "mongodump" { "archive" } else { "sql" };
    let dest = dest_dir.join(format!("{}_{}_{stamp}_{pid}.{ext}.gz", net.engine, net.database));
    let bytes_written = gzip_to_file(&dest, &raw)?;
    verify_and_cleanup_on_failure(&dest)?;
    Ok(DumpOutput { path: dest, bytes_written })
}

async fn dump_docker(
    docker_db: &crate::descriptor::DockerDb,
    dest_dir: &Path,
    stamp: &str,
    pid: u32,
    timeout: Duration,
) -> Result<DumpOutput, DbError> {
    tool_path("docker").await?;
    let (tool_in_container, args): (&str, Vec<String>) = match docker_db.engine {
        Engine::Postgres => (
            "pg_dump",
            vec!["-U".into(), docker_db.user.clone().unwrap_or_else(|| "postgres".into()), "-d".into(), docker_db.database.clone()],
        ),
        Engine::Mysql => (
            "mysqldump",
            vec!["-u".into(), docker_db.user.clone().unwrap_or_else(|| "root".into()), docker_db.database.clone()],
        ),
        Engine::Mongo => ("mongodump", vec!["--db".into(), docker_db.database.clone(), "--archive".into()]),
        Engine::Sqlite => unreachable!("DockerDb never carries Engine::Sqlite"),
    };

    let mut cmd = Command::new("docker");
    cmd.arg("exec");
    if let Some(password) = &docker_db.password {
        let env_var = match docker_db.engine {
            Engine::Postgres => "PGPASSWORD",
            Engine::Mysql => "MYSQL_PWD",
            _ => "DB_PASSWORD",
        };
        cmd.arg("-e").arg(format!("{env_var}={password}"));
    }
    cmd.arg(&docker_db.container).arg(tool_in_container).args(&args);
    let raw = run_with_timeout(cmd, timeout).await?;

    let ext = if tool_in_container == "mongodump" { "archive" } else { "sql" };
    let dest =
        dest_dir.join(format!("{}_{}_{stamp}_{pid}.{ext}.gz", docker_db.engine, docker_db.database));
    let bytes_written = gzip_to_file(&dest, &raw)?;
    verify_and_cleanup_on_failure(&dest)?;
    Ok(DumpOutput { path: dest, bytes_written })
}

#[cfg(test)]
#[path = "dump_tests.rs"]
mod tests;
