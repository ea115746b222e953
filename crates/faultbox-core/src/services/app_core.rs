//! `AppCore` - the primary application facade.
//!
//! Adapters (HTTP, CLI) receive an `AppCore` instance and use it to access
//! all core functionality.

use chrono::{DateTime, Utc};

use crate::ports::Repos;

use super::{EntityService, RestartMonitor};

/// The core application facade.
///
/// Constructed at the adapter's composition root with concrete repository
/// implementations.
///
/// # Example
///
/// ```ignore
/// let repos = CoreFactory::build_repos(pool);
/// let core = AppCore::new(repos, Utc::now());
///
/// let entities = core.entities().get_all().await?;
/// ```
pub struct AppCore {
    entities: EntityService,
    restarts: RestartMonitor,
}

impl AppCore {
    /// Create a new `AppCore` for a process started at `started_at`.
    pub fn new(repos: Repos, started_at: DateTime<Utc>) -> Self {
        Self {
            entities: EntityService::new(repos.entities),
            restarts: RestartMonitor::new(repos.lifecycle, started_at),
        }
    }

    /// Access the entity service.
    pub const fn entities(&self) -> &EntityService {
        &self.entities
    }

    /// Access the restart monitor.
    pub const fn restarts(&self) -> &RestartMonitor {
        &self.restarts
    }
}
