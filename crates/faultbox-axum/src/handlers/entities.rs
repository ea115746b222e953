//! Entity handlers - CRUD and search.

use axum::Json;
use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use faultbox_core::{Entity, NewEntity};
use serde::Deserialize;
use tracing::{Instrument, info, info_span};

use crate::error::HttpError;
use crate::state::AppState;

/// `GET /api/entities/search` query.
#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    pub name: String,
}

/// List all entities.
pub async fn list(State(state): State<AppState>) -> Result<Json<Vec<Entity>>, HttpError> {
    async {
        info!("GET /api/entities - Retrieving all entities");
        Ok::<_, HttpError>(Json(state.core.entities().get_all().await?))
    }
    .instrument(info_span!("get-all-entities-endpoint"))
    .await
}

/// Get a single entity by ID.
pub async fn get(
    State(state): State<AppState>,
    path: Result<Path<i64>, PathRejection>,
) -> Result<Json<Entity>, HttpError> {
    let Path(id) = path?;
    async {
        info!(id, "GET /api/entities/{{id}} - Retrieving entity by id");
        state
            .core
            .entities()
            .get_by_id(id)
            .await?
            .map(Json)
            .ok_or_else(|| HttpError::NotFound(format!("Entity {id} not found")))
    }
    .instrument(info_span!("get-entity-by-id-endpoint", id))
    .await
}

/// Create a new entity.
pub async fn create(
    State(state): State<AppState>,
    body: Result<Json<NewEntity>, JsonRejection>,
) -> Result<(StatusCode, Json<Entity>), HttpError> {
    let Json(req) = body?;
    async {
        info!(name = %req.name, "POST /api/entities - Creating new entity");
        let created = state.core.entities().create(req).await?;
        Ok::<_, HttpError>((StatusCode::CREATED, Json(created)))
    }
    .instrument(info_span!("create-entity-endpoint"))
    .await
}

/// Replace name and description of an existing entity.
pub async fn update(
    State(state): State<AppState>,
    path: Result<Path<i64>, PathRejection>,
    body: Result<Json<NewEntity>, JsonRejection>,
) -> Result<Json<Entity>, HttpError> {
    let Path(id) = path?;
    let Json(req) = body?;
    async {
        info!(id, "PUT /api/entities/{{id}} - Updating entity");
        Ok::<_, HttpError>(Json(state.core.entities().update(id, req).await?))
    }
    .instrument(info_span!("update-entity-endpoint", id))
    .await
}

/// Delete an entity.
pub async fn remove(
    State(state): State<AppState>,
    path: Result<Path<i64>, PathRejection>,
) -> Result<StatusCode, HttpError> {
    let Path(id) = path?;
    async {
        info!(id, "DELETE /api/entities/{{id}} - Deleting entity");
        state.core.entities().delete(id).await?;
        Ok::<_, HttpError>(StatusCode::NO_CONTENT)
    }
    .instrument(info_span!("delete-entity-endpoint", id))
    .await
}

/// Case-insensitive substring search on name.
pub async fn search(
    State(state): State<AppState>,
    query: Result<Query<SearchQuery>, QueryRejection>,
) -> Result<Json<Vec<Entity>>, HttpError> {
    let Query(SearchQuery { name }) = query?;
    async {
        info!(name = %name, "GET /api/entities/search - Searching entities");
        Ok::<_, HttpError>(Json(state.core.entities().search_by_name(&name).await?))
    }
    .instrument(info_span!("search-entities-endpoint"))
    .await
}

/// Entities that have a description.
pub async fn with_description(
    State(state): State<AppState>,
) -> Result<Json<Vec<Entity>>, HttpError> {
    async {
        info!("GET /api/entities/with-description - Retrieving described entities");
        Ok::<_, HttpError>(Json(state.core.entities().with_description().await?))
    }
    .instrument(info_span!("entities-with-description-endpoint"))
    .await
}
