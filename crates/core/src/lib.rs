// SPDX-License-Identifier: MIT

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! fbrt-core: data model for the function-block runtime host.
//!
//! Ports, values, connections, names, the shared error taxonomy, and the
//! testable clock abstraction used by every other crate in the workspace.

pub mod clock;
pub mod connection;
pub mod error;
pub mod macros;
pub mod names;
pub mod port;
pub mod value;
pub mod watch;

pub use clock::{Clock, FakeClock, SystemClock};
pub use connection::split_port_ref;
pub use error::Error;
pub use names::{ConfigId, FbName, TypeName, COLD_EVENT_NAME, START_FB_NAME};
pub use port::{EventPortState, PortDescriptor, PortKind, VarPortState};
pub use value::{convert_type, ConvertError, DataType, Value};
pub use watch::{WatchBuffer, WatchSample};
