// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Optional encryption (spec.md §4.5 step 9): wraps a final artifact with an
//! age recipient loaded from a key file. Encrypted files adopt an `.age`
//! suffix and are verified by re-reading the stream header, not by a full
//! round-trip decrypt (no identity/private key is available here — only a
//! public recipient).

use std::io::Write;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use age::x25519::Recipient;

use crate::error::ExecutorError;

const AGE_HEADER_MAGIC: &[u8] = b"age-encryption.org/v1";

/// Encrypts `source` in place for `recipient`, producing `<source>.age` and
/// removing the plaintext original. Returns the encrypted file's path.
pub fn encrypt_file(source: &Path, recipient_key_file: &Path) -> Result<PathBuf, ExecutorError> {
    let recipient = load_recipient(recipient_key_file)?;
    let plaintext = std::fs::read(source)?;

    let encryptor = age::Encryptor::with_recipients(vec![Box::new(recipient)])
        .ok_or_else(|| ExecutorError::Encryption("no recipients provided".into()))?;

    let mut encrypted = Vec::new();
    {
        let mut writer = encryptor
            .wrap_output(&mut encrypted)
            .map_err(|e| ExecutorError::Encryption(e.to_string()))?;
        writer.write_all(&plaintext)?;
        writer.finish().map_err(|e| ExecutorError::Encryption(e.to_string()))?;
    }

    let dest = append_age_suffix(source);
    std::fs::write(&dest, &encrypted)?;
    verify_header(&dest)?;
    std::fs::remove_file(source)?;
    Ok(dest)
}

/// Reads the recipient key file and parses its first non-comment,
/// non-blank line as an age X25519 recipient (`age1...`).
fn load_recipient(recipient_key_file: &Path) -> Result<Recipient, ExecutorError> {
    let contents = std::fs::read_to_string(recipient_key_file)?;
    let line = contents
        .lines()
        .map(str::trim)
        .find(|line| !line.is_empty() && !line.starts_with('#'))
        .ok_or_else(|| ExecutorError::Encryption("key file has no recipient line".into()))?;
    Recipient::from_str(line).map_err(|e| ExecutorError::Encryption(e.to_string()))
}

fn append_age_suffix(path: &Path) -> PathBuf {
    let mut name = path.as_os_str().to_os_string();
    name.push(".age");
    PathBuf::from(name)
}

fn verify_header(path: &Path) -> Result<(), ExecutorError> {
    let mut file = std::fs::File::open(path)?;
    let mut buf = vec![0u8; AGE_HEADER_MAGIC.len()];
    std::io::Read::read_exact(&mut file, &mut buf)?;
    if buf != AGE_HEADER_MAGIC {
        let _ = std::fs::remove_file(path);
        return Err(ExecutorError::Encryption("encrypted artifact missing age header".into()));
    }
    Ok(())
}

#[cfg(test)]
#[path = "encryption_tests.rs"]
mod tests;
