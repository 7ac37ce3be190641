// SPDX-License-Identifier: MIT

#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! fbrt-typedef: type registry + `.fbt` definition loader.

pub mod definition;
pub mod error;
pub mod registry;

pub use definition::{parse_fbt, FbDefinition};
pub use error::{DefinitionError, RegistryError};
pub use registry::TypeRegistry;
