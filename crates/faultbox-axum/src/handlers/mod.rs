//! HTTP request handlers for the Axum web server.
//!
//! Each submodule contains handlers for a specific API area.
//! Handlers are thin wrappers over `AppCore` and the runtime pieces in
//! `AxumContext`.

pub mod actuator;
pub mod docs;
pub mod entities;
pub mod scenarios;
