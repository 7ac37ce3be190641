// SPDX-License-Identifier: MIT

#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! fbrt-runtime: FB instances, the per-FB execution loop, and the
//! Configuration graph that owns them.

pub mod configuration;
pub mod error;
pub mod fb_instance;
pub mod port_group;
pub mod worker;

pub use configuration::{Configuration, PortSnapshot};
pub use error::{ConfigurationError, WorkerError};
pub use fb_instance::{FbHandle, InboundEdge, ResolvedEdge};
pub use port_group::PortGroup;
