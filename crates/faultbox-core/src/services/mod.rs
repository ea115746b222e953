//! Core services - the application's business logic layer.
//!
//! Services orchestrate between ports (trait interfaces) and domain logic.
//! They don't know about concrete implementations.

mod app_core;
mod entity_service;
mod restart_monitor;

pub use app_core::AppCore;
pub use entity_service::EntityService;
pub use restart_monitor::RestartMonitor;

#[cfg(test)]
pub(crate) mod test_support;
