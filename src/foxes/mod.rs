//! Commands available inside the fox shell.

pub mod adc;

use crate::registry::Source;

/// Every fox command source.
pub fn sources() -> Vec<Source> {
    vec![adc::source()]
}
