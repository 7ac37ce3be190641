// SPDX-License-Identifier: MIT

//! Name newtypes.
//!
//! FB names and type names come from the deployment XML, not from a local
//! generator, so these carry no prefix or random suffix — just a thin
//! wrapper with the same ergonomics as an id type that does generate one.

use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::fmt;

macro_rules! define_name {
    ($name:ident) => {
        #[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub struct $name(pub String);

        impl $name {
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<String> for $name {
            fn from(s: String) -> Self {
                Self(s)
            }
        }

        impl From<&str> for $name {
            fn from(s: &str) -> Self {
                Self(s.to_string())
            }
        }

        impl PartialEq<str> for $name {
            fn eq(&self, other: &str) -> bool {
                self.0 == other
            }
        }

        impl PartialEq<&str> for $name {
            fn eq(&self, other: &&str) -> bool {
                self.0 == *other
            }
        }

        impl Borrow<str> for $name {
            fn borrow(&self) -> &str {
                &self.0
            }
        }
    };
}

define_name!(FbName);
define_name!(TypeName);
define_name!(ConfigId);

/// The distinguished resource FB name that boots a Configuration's network.
pub const START_FB_NAME: &str = "START";

/// The event name `START` emits once on boot, fanned out to wire-connected
/// `INIT` inputs.
pub const COLD_EVENT_NAME: &str = "COLD";
