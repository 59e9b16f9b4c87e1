//! Top-level tools reachable as `shulker <name>`.

pub mod fox;
pub mod wp;

use crate::registry::Source;

/// Every top-level command source.
pub fn sources() -> Vec<Source> {
    vec![fox::source(), wp::source()]
}
