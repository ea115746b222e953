//! OpenAPI 3.0 description of the HTTP surface.

use serde_json::{Map, Value, json};

use crate::handlers::scenarios::MAX_SECONDS;

fn seconds_param(default: u64, description: &str) -> Value {
    json!({
        "name": "seconds",
        "in": "query",
        "required": false,
        "description": description,
        "schema": { "type": "integer", "format": "int64", "minimum": 0, "maximum": MAX_SECONDS, "default": default }
    })
}

fn id_param(description: &str) -> Value {
    json!({
        "name": "id",
        "in": "path",
        "required": true,
        "description": description,
        "schema": { "type": "integer", "format": "int64" }
    })
}

fn json_response(description: &str, schema: &Value) -> Value {
    json!({
        "description": description,
        "content": { "application/json": { "schema": schema } }
    })
}

fn error_response(description: &str) -> Value {
    json_response(description, &json!({ "$ref": "#/components/schemas/Error" }))
}

fn string_map() -> Value {
    json!({ "type": "object", "additionalProperties": { "type": "string" } })
}

/// Build the document. `service_name` becomes part of the title.
pub fn document(service_name: &str) -> Value {
    let mut paths = Map::new();
    paths.extend(entity_paths());
    paths.extend(scenario_paths());
    paths.extend(actuator_paths());

    json!({
        "openapi": "3.0.3",
        "info": {
            "title": format!("{service_name} API"),
            "version": env!("CARGO_PKG_VERSION"),
            "description": "Entity CRUD plus scenarios that block, hang or load request workers",
            "contact": { "name": "K8s Lovers Korea", "url": "https://github.com/K8sLoversKorea" },
            "license": { "name": "MIT" }
        },
        "servers": [{ "url": "/", "description": "Default server" }],
        "tags": [
            { "name": "entities", "description": "Entity CRUD and search" },
            { "name": "scenarios", "description": "Worker blocking, hangs and CPU load" },
            { "name": "actuator", "description": "Health, info and restart monitoring" }
        ],
        "paths": paths,
        "components": { "schemas": schemas() }
    })
}

fn entity_paths() -> Map<String, Value> {
    let entity = json!({ "$ref": "#/components/schemas/Entity" });
    let entity_list = json!({ "type": "array", "items": entity });
    let new_entity_body = json!({
        "required": true,
        "content": { "application/json": { "schema": { "$ref": "#/components/schemas/NewEntity" } } }
    });

    let mut paths = Map::new();
    paths.insert(
        "/api/entities".into(),
        json!({
            "get": {
                "tags": ["entities"],
                "summary": "List all entities",
                "operationId": "getAllEntities",
                "responses": { "200": json_response("All entities", &entity_list) }
            },
            "post": {
                "tags": ["entities"],
                "summary": "Create an entity",
                "operationId": "createEntity",
                "requestBody": new_entity_body,
                "responses": {
                    "201": json_response("Created entity", &entity),
                    "400": error_response("Invalid entity")
                }
            }
        }),
    );
    paths.insert(
        "/api/entities/{id}".into(),
        json!({
            "get": {
                "tags": ["entities"],
                "summary": "Get an entity by id",
                "operationId": "getEntityById",
                "parameters": [id_param("Entity id")],
                "responses": {
                    "200": json_response("The entity", &entity),
                    "404": error_response("No such entity")
                }
            },
            "put": {
                "tags": ["entities"],
                "summary": "Replace name and description of an entity",
                "operationId": "updateEntity",
                "parameters": [id_param("Entity id")],
                "requestBody": new_entity_body,
                "responses": {
                    "200": json_response("Updated entity", &entity),
                    "400": error_response("Invalid entity"),
                    "404": error_response("No such entity")
                }
            },
            "delete": {
                "tags": ["entities"],
                "summary": "Delete an entity",
                "operationId": "deleteEntity",
                "parameters": [id_param("Entity id")],
                "responses": {
                    "204": { "description": "Deleted" },
                    "404": error_response("No such entity")
                }
            }
        }),
    );
    paths.insert(
        "/api/entities/search".into(),
        json!({
            "get": {
                "tags": ["entities"],
                "summary": "Search entities by name fragment",
                "operationId": "searchEntities",
                "parameters": [{
                    "name": "name",
                    "in": "query",
                    "required": true,
                    "description": "Case-insensitive name fragment",
                    "schema": { "type": "string" }
                }],
                "responses": {
                    "200": json_response("Matching entities", &entity_list),
                    "400": error_response("Missing name")
                }
            }
        }),
    );
    paths.insert(
        "/api/entities/with-description".into(),
        json!({
            "get": {
                "tags": ["entities"],
                "summary": "List entities that have a description",
                "operationId": "entitiesWithDescription",
                "responses": { "200": json_response("Described entities", &entity_list) }
            }
        }),
    );
    paths
}

/// A POST scenario taking `seconds` and answering with a string map.
fn scenario_post(summary: &str, operation_id: &str, seconds: Value, ok: &str) -> Value {
    json!({
        "post": {
            "tags": ["scenarios"],
            "summary": summary,
            "operationId": operation_id,
            "parameters": [seconds],
            "responses": {
                "200": json_response(ok, &string_map()),
                "400": error_response("Invalid seconds")
            }
        }
    })
}

fn scenario_paths() -> Map<String, Value> {
    let mut paths = Map::new();
    paths.insert(
        "/api/test/health".into(),
        json!({
            "get": {
                "tags": ["scenarios"],
                "summary": "Health check with service name and timestamp",
                "operationId": "scenarioHealth",
                "responses": { "200": json_response("Healthy", &string_map()) }
            }
        }),
    );
    paths.insert(
        "/api/test/block-thread".into(),
        scenario_post(
            "Block workers on a shared lock and exhaust the worker pool",
            "blockThread",
            seconds_param(30, "Seconds to hold the lock"),
            "Lock released",
        ),
    );
    paths.insert(
        "/api/test/hang".into(),
        scenario_post(
            "Hang the current worker",
            "hangThread",
            seconds_param(90, "Seconds to hang"),
            "Hang finished",
        ),
    );
    paths.insert(
        "/api/test/thread-status".into(),
        json!({
            "get": {
                "tags": ["scenarios"],
                "summary": "Thread, worker and lock status",
                "operationId": "threadStatus",
                "responses": { "200": json_response("Current status", &json!({ "type": "object" })) }
            }
        }),
    );
    paths.insert(
        "/api/test/cpu-intensive".into(),
        scenario_post(
            "Generate CPU load",
            "cpuIntensive",
            seconds_param(10, "Seconds of CPU load"),
            "Load finished",
        ),
    );
    paths
}

fn actuator_paths() -> Map<String, Value> {
    let mut paths = Map::new();
    paths.insert(
        "/actuator/health".into(),
        json!({
            "get": {
                "tags": ["actuator"],
                "summary": "Application and database health",
                "operationId": "actuatorHealth",
                "responses": {
                    "200": { "description": "UP" },
                    "503": { "description": "DOWN" }
                }
            }
        }),
    );
    paths.insert(
        "/actuator/info".into(),
        json!({
            "get": {
                "tags": ["actuator"],
                "summary": "Application name, version and description",
                "operationId": "actuatorInfo",
                "responses": { "200": { "description": "Application info" } }
            }
        }),
    );
    paths.insert(
        "/actuator/restart-monitor".into(),
        json!({
            "get": {
                "tags": ["actuator"],
                "summary": "Restart count and uptime",
                "operationId": "restartMonitor",
                "responses": {
                    "200": json_response("Restart info", &json!({ "$ref": "#/components/schemas/RestartInfo" }))
                }
            }
        }),
    );
    paths
}

fn schemas() -> Value {
    let name = json!({ "type": "string", "maxLength": faultbox_core::MAX_NAME_LEN });
    let description = json!({
        "type": "string",
        "nullable": true,
        "maxLength": faultbox_core::MAX_DESCRIPTION_LEN
    });

    json!({
        "Entity": {
            "type": "object",
            "required": ["id", "name", "createdAt", "updatedAt"],
            "properties": {
                "id": { "type": "integer", "format": "int64" },
                "name": name,
                "description": description,
                "createdAt": { "type": "string", "format": "date-time" },
                "updatedAt": { "type": "string", "format": "date-time" }
            }
        },
        "NewEntity": {
            "type": "object",
            "required": ["name"],
            "properties": { "name": name, "description": description }
        },
        "RestartInfo": {
            "type": "object",
            "properties": {
                "restartCount": { "type": "integer", "format": "int64" },
                "lastStartTime": { "type": "string", "nullable": true },
                "applicationReadyTime": { "type": "string", "nullable": true },
                "uptime": { "type": "string" },
                "currentTime": { "type": "string" }
            }
        },
        "Error": {
            "type": "object",
            "required": ["error", "status"],
            "properties": {
                "error": { "type": "string" },
                "status": { "type": "integer" }
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_lists_every_route() {
        let doc = document("faultbox");
        assert_eq!(doc["openapi"], "3.0.3");
        assert_eq!(doc["info"]["title"], "faultbox API");

        let paths = doc["paths"].as_object().unwrap();
        for path in [
            "/api/entities",
            "/api/entities/{id}",
            "/api/entities/search",
            "/api/entities/with-description",
            "/api/test/health",
            "/api/test/block-thread",
            "/api/test/hang",
            "/api/test/thread-status",
            "/api/test/cpu-intensive",
            "/actuator/health",
            "/actuator/info",
            "/actuator/restart-monitor",
        ] {
            assert!(paths.contains_key(path), "missing {path}");
        }
    }

    #[test]
    fn test_seconds_bounds_documented() {
        let doc = document("faultbox");
        let param = &doc["paths"]["/api/test/hang"]["post"]["parameters"][0];
        assert_eq!(param["schema"]["maximum"], MAX_SECONDS);
        assert_eq!(param["schema"]["default"], 90);
    }
}
