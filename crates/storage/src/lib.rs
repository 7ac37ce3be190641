// SPDX-License-Identifier: MIT

#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! fbrt-storage: the `data_model.fboot` deployment log.

pub mod error;
pub mod fboot;

pub use error::FbootError;
pub use fboot::{should_persist, FbootEntry, FbootLog};
