//! Shared application state type.

use crate::bootstrap::AxumContext;
use std::sync::Arc;

/// Application state shared across all handlers.
///
/// This is an Arc-wrapped `AxumContext` holding the core facade and the
/// runtime pieces the scenario and actuator handlers need.
pub type AppState = Arc<AxumContext>;
