// SPDX-License-Identifier: MIT

#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! fbrt-behavior: the `Behavior` trait, the named-factory registry that
//! stands in for dynamic reload, and the hot-reload watcher.

pub mod behavior;
pub mod builtin;
pub mod error;
pub mod loader;
pub mod registry;
pub mod reload;

pub use behavior::{Behavior, BehaviorFactory};
pub use error::BehaviorLoadError;
pub use loader::BehaviorLoader;
pub use registry::BehaviorRegistry;
pub use reload::{spawn_reload_watcher, BehaviorHandle};
