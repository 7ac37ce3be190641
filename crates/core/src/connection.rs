// SPDX-License-Identifier: MIT

//! Port reference parsing for directed edges between ports.
//!
//! The edge itself — `(source FB, source port) -> (destination FB,
//! destination port)` — is represented downstream in `fbrt-runtime` as
//! `ResolvedEdge`/`InboundEdge`, pre-resolved to an `Arc<FbHandle>` rather
//! than carried as names here; this module only owns the `fb.port` string
//! grammar both that crate and the wire protocol parse against.

/// Split a `fb.port` reference on the *last* `.`, tolerating dots inside the
/// FB name itself.
pub fn split_port_ref(reference: &str) -> Option<(&str, &str)> {
    reference.rsplit_once('.')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_on_last_dot() {
        assert_eq!(split_port_ref("A.B.EO0"), Some(("A.B", "EO0")));
        assert_eq!(split_port_ref("E_SWITCH_1.EI"), Some(("E_SWITCH_1", "EI")));
    }

    #[test]
    fn no_dot_is_none() {
        assert_eq!(split_port_ref("justaname"), None);
    }
}
