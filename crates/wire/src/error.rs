// SPDX-License-Identifier: MIT

use thiserror::Error;

/// `ProtocolFrameError`: the connection is dropped and the
/// error logged. Never converted into `fbrt_core::Error` — by the time a
/// frame fails to parse there is no config_id to attach a per-request
/// response to.
#[derive(Debug, Error)]
pub enum ProtocolFrameError {
    #[error("io error on connection: {0}")]
    Io(#[from] std::io::Error),

    #[error("frame too short: {len} bytes")]
    TooShort { len: usize },

    #[error("payload is not valid utf-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),

    #[error("xml parse error: {0}")]
    Xml(#[from] quick_xml::Error),

    #[error("xml attribute error: {0}")]
    Attr(#[from] quick_xml::events::attributes::AttrError),

    #[error("<Request> is missing its mandatory {0} attribute")]
    MissingAttribute(&'static str),

    #[error("unrecognized Action/child-tag combination: {action}/{child}")]
    UnrecognizedCommand { action: String, child: String },

    #[error("<Request> has no Action attribute")]
    MissingAction,
}
