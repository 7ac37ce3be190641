// SPDX-License-Identifier: MIT

#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! fbrt-wire: frame header parsing, the `<Request>`/`<Response>` XML
//! grammar, and async read/write helpers.

pub mod error;
pub mod frame;
pub mod io;
pub mod request;
pub mod response;

pub use error::ProtocolFrameError;
pub use frame::{decode_frame, sanitize, Frame, MAX_READ_SIZE};
pub use io::{read_frame, write_response};
pub use request::{extract_request_id, parse_request, Command, Request};
pub use response::{build_read_response, build_status_response, WatchGroup, WatchPortSamples};
