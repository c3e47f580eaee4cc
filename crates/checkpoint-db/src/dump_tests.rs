// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use crate::descriptor::DatabaseDescriptor;

fn seed_sqlite(path: &Path) {
    let conn = rusqlite::Connection::open(path).unwrap();
    conn.execute("CREATE TABLE t (id INTEGER PRIMARY KEY, name TEXT)", []).unwrap();
    conn.execute("INSERT INTO t (name) VALUES ('a'), ('b')", []).unwrap();
}

#[tokio::test]
async fn sqlite_dump_produces_a_verified_gzip_artifact() {
    let dir = tempfile::tempdir().unwrap();
    let source = dir.path().join("app.sqlite3");
    seed_sqlite(&source);

    let dest_dir = dir.path().join("out");
    let descriptor = DatabaseDescriptor::Sqlite { path: source };
    let output = dump(&descriptor, &dest_dir, 1234, None).await.unwrap();

    assert!(output.path.exists());
    assert!(output.bytes_written > 0);
    assert!(verify_and_cleanup_on_failure(&output.path).is_ok());
    assert!(output.path.exists(), "successful verification should not delete the artifact");
}

#[test]
fn verification_deletes_a_corrupt_artifact() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("bad.sql.gz");
    std::fs::write(&path, b"not actually gzip data").unwrap();

    let result = verify_and_cleanup_on_failure(&path);
    assert!(result.is_err());
    assert!(!path.exists());
}
