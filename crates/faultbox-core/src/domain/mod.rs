//! Domain types.
//!
//! These types represent the data the service manages, independent of any
//! infrastructure concerns (database, HTTP, etc.).

mod entity;
mod lifecycle;

pub use entity::{Entity, MAX_DESCRIPTION_LEN, MAX_NAME_LEN, NewEntity};
pub use lifecycle::{RestartInfo, StartRecord, format_uptime};
