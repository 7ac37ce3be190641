// SPDX-License-Identifier: MIT

//! Byte-level frame header parsing.
//!
//! Layout:
//! - byte 0: message kind (opaque tag, passed through uninterpreted).
//! - bytes 1-2 (big-endian u16): `config_id_size`.
//! - if `config_id_size == 0`: bytes 3-5 reserved, XML payload starts at 6
//!   (a *general* request, not targeting any Configuration).
//! - else: bytes 3..3+size are the UTF-8 config_id, three reserved bytes
//!   follow, XML payload starts at `3 + config_id_size + 3`.
//!
//! Each accepted read is treated as exactly one frame — reads are chunked
//! up to 2048 bytes and the protocol presumes well-formed single-frame
//! arrivals.

use crate::error::ProtocolFrameError;
use fbrt_core::ConfigId;

pub const MAX_READ_SIZE: usize = 2048;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    pub kind: u8,
    /// `None` for a general request (config_id_size == 0).
    pub config_id: Option<ConfigId>,
    pub payload: String,
}

/// Strips the `&apos;`/`&quote;` sequences 4diac is known to emit, a quirk
/// in its XML serializer rather than valid entity escaping.
pub fn sanitize(payload: &str) -> String {
    payload.replace("&apos;", "").replace("&quote;", "")
}

pub fn decode_frame(bytes: &[u8]) -> Result<Frame, ProtocolFrameError> {
    if bytes.len() < 6 {
        return Err(ProtocolFrameError::TooShort { len: bytes.len() });
    }
    let kind = bytes[0];
    let config_id_size = u16::from_be_bytes([bytes[1], bytes[2]]) as usize;

    if config_id_size == 0 {
        let payload = sanitize(&String::from_utf8(bytes[6..].to_vec())?);
        return Ok(Frame {
            kind,
            config_id: None,
            payload,
        });
    }

    let id_end = 3 + config_id_size;
    let payload_start = id_end + 3;
    if bytes.len() < payload_start {
        return Err(ProtocolFrameError::TooShort { len: bytes.len() });
    }
    let config_id = String::from_utf8(bytes[3..id_end].to_vec())?;
    let payload = sanitize(&String::from_utf8(bytes[payload_start..].to_vec())?);
    Ok(Frame {
        kind,
        config_id: Some(ConfigId::new(config_id)),
        payload,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn build_general(xml: &str) -> Vec<u8> {
        let mut buf = vec![0u8, 0, 0, 0, 0, 0];
        buf.extend_from_slice(xml.as_bytes());
        buf
    }

    fn build_scoped(config_id: &str, xml: &str) -> Vec<u8> {
        let mut buf = vec![0u8];
        buf.extend_from_slice(&(config_id.len() as u16).to_be_bytes());
        buf.extend_from_slice(config_id.as_bytes());
        buf.extend_from_slice(&[0, 0, 0]);
        buf.extend_from_slice(xml.as_bytes());
        buf
    }

    #[test]
    fn general_request_has_no_config_id() {
        let frame = decode_frame(&build_general("<Request/>")).unwrap();
        assert_eq!(frame.config_id, None);
        assert_eq!(frame.payload, "<Request/>");
    }

    #[test]
    fn scoped_request_carries_config_id() {
        let frame = decode_frame(&build_scoped("config_1", "<Request/>")).unwrap();
        assert_eq!(frame.config_id, Some(ConfigId::new("config_1")));
        assert_eq!(frame.payload, "<Request/>");
    }

    #[test]
    fn sanitizes_service_symbols() {
        let frame = decode_frame(&build_general("<Request Name=\"it&apos;s\"/>")).unwrap();
        assert_eq!(frame.payload, "<Request Name=\"its\"/>");
    }

    #[test]
    fn too_short_is_an_error() {
        assert!(matches!(
            decode_frame(&[0, 0]),
            Err(ProtocolFrameError::TooShort { .. })
        ));
    }
}
