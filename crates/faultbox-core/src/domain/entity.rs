//! Entity domain types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::ports::CoreError;

/// Maximum length of an entity name, in characters.
pub const MAX_NAME_LEN: usize = 255;

/// Maximum length of an entity description, in characters.
pub const MAX_DESCRIPTION_LEN: usize = 4000;

/// An entity that exists in the system with a database ID.
///
/// Use `NewEntity` for entities that haven't been persisted yet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Entity {
    /// Database ID (always present for persisted entities).
    pub id: i64,
    /// Display name.
    pub name: String,
    /// Free-form description.
    pub description: Option<String>,
    /// UTC timestamp of insertion.
    pub created_at: DateTime<Utc>,
    /// UTC timestamp of the last update.
    pub updated_at: DateTime<Utc>,
}

/// Entity fields supplied by clients on create and update.
///
/// Updates replace both fields: a missing description clears the stored one.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewEntity {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
}

impl NewEntity {
    /// Create a new entity payload.
    pub fn new(name: impl Into<String>, description: Option<String>) -> Self {
        Self {
            name: name.into(),
            description,
        }
    }

    /// Validate and normalize the payload.
    ///
    /// The name is trimmed and must not be empty. A blank description
    /// becomes `None`.
    pub fn validate(self) -> Result<Self, CoreError> {
        let name = self.name.trim().to_string();
        if name.is_empty() {
            return Err(CoreError::Validation("name must not be blank".to_string()));
        }
        if name.chars().count() > MAX_NAME_LEN {
            return Err(CoreError::Validation(format!(
                "name must be at most {MAX_NAME_LEN} characters"
            )));
        }

        let description = self.description.filter(|d| !d.trim().is_empty());
        if let Some(ref d) = description {
            if d.chars().count() > MAX_DESCRIPTION_LEN {
                return Err(CoreError::Validation(format!(
                    "description must be at most {MAX_DESCRIPTION_LEN} characters"
                )));
            }
        }

        Ok(Self { name, description })
    }
}
