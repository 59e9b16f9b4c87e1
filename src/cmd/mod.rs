//! CLI command implementations.
//!
//! Each submodule owns one or more related `Commands` variants:
//!
//! | Module          | Commands handled                 |
//! |-----------------|----------------------------------|
//! | `tools`         | `List`, `External` (forwarding)  |
//! | `status`        | `Status`                         |
//! | `config`        | `Config`                         |

pub mod config;
pub mod status;
pub mod tools;

pub use config::cmd_config;
pub use status::cmd_status;
pub use tools::{cmd_forward, cmd_list};
