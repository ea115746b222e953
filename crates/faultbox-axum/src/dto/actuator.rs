//! Actuator responses.

use serde::{Deserialize, Serialize};

pub const STATUS_UP: &str = "UP";
pub const STATUS_DOWN: &str = "DOWN";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComponentHealth {
    pub status: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthComponents {
    pub db: ComponentHealth,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub components: HealthComponents,
}

impl HealthResponse {
    /// Overall status follows the database component.
    pub fn from_db(db: Result<(), String>) -> Self {
        let (status, error) = match db {
            Ok(()) => (STATUS_UP, None),
            Err(e) => (STATUS_DOWN, Some(e)),
        };
        Self {
            status: status.to_string(),
            components: HealthComponents {
                db: ComponentHealth {
                    status: status.to_string(),
                    error,
                },
            },
        }
    }

    pub fn is_up(&self) -> bool {
        self.status == STATUS_UP
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppInfo {
    pub name: String,
    pub version: String,
    pub description: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InfoResponse {
    pub app: AppInfo,
}
