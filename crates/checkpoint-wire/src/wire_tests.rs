// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Wire format tests: length-prefix framing and JSON encoding.

use super::*;
use checkpoint_core::{ProjectId, WatcherBackendKind};
use crate::response::WatcherStatusPayload;

#[test]
fn encode_returns_json_without_length_prefix() {
    let response = Response::Pong;
    let encoded = encode(&response).expect("encode failed");

    let json_str = std::str::from_utf8(&encoded).expect("should be valid UTF-8");
    assert!(json_str.starts_with('{'), "should be JSON object: {}", json_str);
}

#[tokio::test]
async fn read_write_message_roundtrip() {
    let original = b"hello world";

    let mut buffer = Vec::new();
    write_message(&mut buffer, original).await.expect("write failed");
    assert_eq!(buffer.len(), 4 + original.len());

    let mut cursor = std::io::Cursor::new(buffer);
    let read_back = read_message(&mut cursor).await.expect("read failed");
    assert_eq!(read_back, original);
}

#[tokio::test]
async fn write_message_adds_a_big_endian_length_prefix() {
    let data = b"test data";

    let mut buffer = Vec::new();
    write_message(&mut buffer, data).await.expect("write failed");

    let len = u32::from_be_bytes([buffer[0], buffer[1], buffer[2], buffer[3]]) as usize;
    assert_eq!(len, data.len());
    assert_eq!(&buffer[4..], data);
}

#[tokio::test]
async fn oversized_message_is_rejected_before_it_is_written() {
    let data = vec![0u8; MAX_MESSAGE_SIZE + 1];
    let mut buffer = Vec::new();
    let err = write_message(&mut buffer, &data).await.unwrap_err();
    assert!(matches!(err, ProtocolError::MessageTooLarge { .. }));
    assert!(buffer.is_empty());
}

#[tokio::test]
async fn stream_closed_before_the_length_prefix_reports_connection_closed() {
    let mut cursor = std::io::Cursor::new(vec![0u8, 0]);
    let err = read_message(&mut cursor).await.unwrap_err();
    assert!(matches!(err, ProtocolError::ConnectionClosed));
}

#[tokio::test]
async fn query_and_response_round_trip_over_a_duplex_stream() {
    let (mut client, mut server) = tokio::io::duplex(4096);

    let project_id = ProjectId::from_string("prj-roundtrip".to_string());
    let query = Query::WatcherStatus { project_id };
    write_query(&mut client, &query, DEFAULT_TIMEOUT).await.expect("write query");
    let received = read_query(&mut server, DEFAULT_TIMEOUT).await.expect("read query");
    assert_eq!(received, query);

    let status = WatcherStatusPayload {
        project_id: match received {
            Query::WatcherStatus { project_id } => project_id,
            _ => unreachable!("only variant sent"),
        },
        backend: WatcherBackendKind::Polling,
        paused: false,
        pending_changes: 0,
        quiet_timer_armed: false,
        last_backup: None,
    };
    let response = Response::WatcherStatus { status };
    write_response(&mut server, &response, DEFAULT_TIMEOUT).await.expect("write response");
    let received_response = read_response(&mut client, DEFAULT_TIMEOUT).await.expect("read response");
    assert_eq!(received_response, response);
}

#[tokio::test]
async fn read_query_times_out_when_no_bytes_arrive() {
    let (_client, mut server) = tokio::io::duplex(16);
    let err = read_query(&mut server, std::time::Duration::from_millis(20)).await.unwrap_err();
    assert!(matches!(err, ProtocolError::Timeout));
}
