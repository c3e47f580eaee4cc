// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Wire format encoding/decoding for the status socket.
//!
//! Wire format: 4-byte length prefix (big-endian) + JSON payload.

use checkpoint_core::error::{Categorized, ErrorCategory};
use serde::{de::DeserializeOwned, Serialize};
use thiserror::Error;
use tokio::io::{AsyncReadExt, AsyncWriteExt};

use crate::{Query, Response};

/// Errors that can occur while framing or transporting a message.
#[derive(Debug, Error)]
pub enum ProtocolError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("message too large: {size} bytes (max {max})")]
    MessageTooLarge { size: usize, max: usize },

    #[error("connection closed")]
    ConnectionClosed,

    #[error("timeout waiting for peer")]
    Timeout,
}

impl Categorized for ProtocolError {
    fn category(&self) -> ErrorCategory {
        match self {
            ProtocolError::Io(_) => ErrorCategory::File,
            ProtocolError::Json(_) => ErrorCategory::Conf,
            ProtocolError::MessageTooLarge { .. } => ErrorCategory::Capability,
            ProtocolError::ConnectionClosed | ProtocolError::Timeout => ErrorCategory::Net,
        }
    }

    fn code(&self) -> u16 {
        match self {
            ProtocolError::Io(_) => 1,
            ProtocolError::Json(_) => 2,
            ProtocolError::MessageTooLarge { .. } => 3,
            ProtocolError::ConnectionClosed => 4,
            ProtocolError::Timeout => 5,
        }
    }
}

/// Status-socket messages are small (a handful of fields per project); 1 MiB
/// is generous headroom and keeps a misbehaving peer from exhausting memory.
pub const MAX_MESSAGE_SIZE: usize = 1024 * 1024;

/// Default timeout for one request/response round trip.
pub const DEFAULT_TIMEOUT: std::time::Duration = std::time::Duration::from_secs(5);

/// Encode a message to JSON bytes (without the length prefix). Pair with
/// [`write_message`] to get the full wire format.
pub fn encode<T: Serialize>(msg: &T) -> Result<Vec<u8>, ProtocolError> {
    let json = serde_json::to_vec(msg)?;
    if json.len() > MAX_MESSAGE_SIZE {
        return Err(ProtocolError::MessageTooLarge { size: json.len(), max: MAX_MESSAGE_SIZE });
    }
    Ok(json)
}

/// Decode a message from its JSON payload.
pub fn decode<T: DeserializeOwned>(bytes: &[u8]) -> Result<T, ProtocolError> {
    Ok(serde_json::from_slice(bytes)?)
}

/// Read one length-prefixed message from an async reader.
pub async fn read_message<R: AsyncReadExt + Unpin>(reader: &mut R) -> Result<Vec<u8>, ProtocolError> {
    let mut len_buf = [0u8; 4];
    match reader.read_exact(&mut len_buf).await {
        Ok(_) => {}
        Err(e) if e.kind() == std::io::ErrorKind::UnexpectedEof => {
            return Err(ProtocolError::ConnectionClosed);
        }
        Err(e) => return Err(ProtocolError::Io(e)),
    }
    let len = u32::from_be_bytes(len_buf) as usize;
    if len > MAX_MESSAGE_SIZE {
        return Err(ProtocolError::MessageTooLarge { size: len, max: MAX_MESSAGE_SIZE });
    }

    let mut buf = vec![0u8; len];
    reader.read_exact(&mut buf).await?;
    Ok(buf)
}

/// Write one length-prefixed message to an async writer.
pub async fn write_message<W: AsyncWriteExt + Unpin>(writer: &mut W, data: &[u8]) -> Result<(), ProtocolError> {
    let len = data.len();
    if len > MAX_MESSAGE_SIZE {
        return Err(ProtocolError::MessageTooLarge { size: len, max: MAX_MESSAGE_SIZE });
    }
    writer.write_all(&(len as u32).to_be_bytes()).await?;
    writer.write_all(data).await?;
    writer.flush().await?;
    Ok(())
}

/// Read a [`Query`] with a timeout, for the watcher side of the socket.
pub async fn read_query<R: AsyncReadExt + Unpin>(
    reader: &mut R,
    timeout: std::time::Duration,
) -> Result<Query, ProtocolError> {
    let bytes = tokio::time::timeout(timeout, read_message(reader)).await.map_err(|_| ProtocolError::Timeout)??;
    decode(&bytes)
}

/// Write a [`Response`] with a timeout, for the watcher side of the socket.
pub async fn write_response<W: AsyncWriteExt + Unpin>(
    writer: &mut W,
    response: &Response,
    timeout: std::time::Duration,
) -> Result<(), ProtocolError> {
    let data = encode(response)?;
    tokio::time::timeout(timeout, write_message(writer, &data)).await.map_err(|_| ProtocolError::Timeout)?
}

/// Write a [`Query`] with a timeout, for the CLI side of the socket.
pub async fn write_query<W: AsyncWriteExt + Unpin>(
    writer: &mut W,
    query: &Query,
    timeout: std::time::Duration,
) -> Result<(), ProtocolError> {
    let data = encode(query)?;
    tokio::time::timeout(timeout, write_message(writer, &data)).await.map_err(|_| ProtocolError::Timeout)?
}

/// Read a [`Response`] with a timeout, for the CLI side of the socket.
pub async fn read_response<R: AsyncReadExt + Unpin>(
    reader: &mut R,
    timeout: std::time::Duration,
) -> Result<Response, ProtocolError> {
    let bytes = tokio::time::timeout(timeout, read_message(reader)).await.map_err(|_| ProtocolError::Timeout)??;
    decode(&bytes)
}

#[cfg(test)]
#[path = "wire_tests.rs"]
mod tests;
