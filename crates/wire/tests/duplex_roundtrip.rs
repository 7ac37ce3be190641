// SPDX-License-Identifier: MIT

//! End-to-end framing + XML round trip over an in-memory duplex stream.

use fbrt_core::ConfigId;
use fbrt_wire::{build_status_response, decode_frame, parse_request, read_frame, write_response, Command};

#[tokio::test]
async fn request_frame_round_trips_through_a_duplex_socket() {
    let (mut client, mut server) = tokio::io::duplex(4096);

    let config_id = "config_1";
    let xml = r#"<Request ID="42" Action="START"/>"#;
    let mut frame = vec![0u8];
    frame.extend_from_slice(&(config_id.len() as u16).to_be_bytes());
    frame.extend_from_slice(config_id.as_bytes());
    frame.extend_from_slice(&[0, 0, 0]);
    frame.extend_from_slice(xml.as_bytes());

    tokio::io::AsyncWriteExt::write_all(&mut client, &frame)
        .await
        .unwrap();

    let received = read_frame(&mut server).await.unwrap().unwrap();
    assert_eq!(received.config_id, Some(ConfigId::new(config_id)));

    let request = parse_request(&received.payload).unwrap();
    assert_eq!(request.command, Command::Start);

    let response = build_status_response(&request.id, None);
    write_response(&mut server, response.as_bytes()).await.unwrap();

    let mut readback = vec![0u8; response.len()];
    tokio::io::AsyncReadExt::read_exact(&mut client, &mut readback)
        .await
        .unwrap();
    assert_eq!(readback, response.as_bytes());
}

#[test]
fn decode_frame_matches_parse_request_for_general_requests() {
    let mut bytes = vec![0u8, 0, 0, 0, 0, 0];
    bytes.extend_from_slice(b"<Request ID=\"1\" Action=\"STOP\"/>");
    let frame = decode_frame(&bytes).unwrap();
    assert_eq!(frame.config_id, None);
    let request = parse_request(&frame.payload).unwrap();
    assert_eq!(request.command, Command::Stop);
}
