//! Generic resource endpoints
//!
//! - POST   /select      - create (plants only)
//! - GET    /all         - list
//! - GET    /<name>/:id  - get by id
//! - DELETE /delete/:id  - delete (plants only)

use crate::config::{EmptyListPolicy, HandlerSettings};
use crate::error::{ApiError, MessageResponse, Result};
use crate::model::{Institution, Plant, RecordId, Resource};
use crate::store::{Collection, StoreError};
use axum::{
    body::Bytes,
    extract::{Path, State},
    http::{header, HeaderMap, StatusCode},
    response::IntoResponse,
    routing::{delete, get, post},
    Json, Router,
};
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, error, info, warn};

pub struct ResourceState<R: Resource> {
    pub collection: Arc<dyn Collection<R>>,
    pub settings: HandlerSettings,
}

impl<R: Resource> ResourceState<R> {
    pub fn new(collection: Arc<dyn Collection<R>>, settings: HandlerSettings) -> Self {
        Self {
            collection,
            settings,
        }
    }
}

impl<R: Resource> Clone for ResourceState<R> {
    fn clone(&self) -> Self {
        Self {
            collection: self.collection.clone(),
            settings: self.settings,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct DataResponse<T> {
    pub data: T,
}

pub fn plant_routes(collection: Arc<dyn Collection<Plant>>, settings: HandlerSettings) -> Router {
    Router::new()
        .route("/select", post(create::<Plant>))
        .route("/all", get(list::<Plant>))
        .route(&item_path::<Plant>(), get(get_one::<Plant>))
        .route("/delete/:id", delete(remove::<Plant>))
        .with_state(ResourceState::new(collection, settings))
}

/// Institutions are created elsewhere; only the read surface is routed.
pub fn institution_routes(
    collection: Arc<dyn Collection<Institution>>,
    settings: HandlerSettings,
) -> Router {
    Router::new()
        .route("/all", get(list::<Institution>))
        .route(&item_path::<Institution>(), get(get_one::<Institution>))
        .with_state(ResourceState::new(collection, settings))
}

fn item_path<R: Resource>() -> String {
    format!("/{}/:id", R::SINGULAR)
}

pub async fn create<R: Resource>(
    State(state): State<ResourceState<R>>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<impl IntoResponse> {
    require_json(&headers)?;

    let draft: R::Draft =
        serde_json::from_slice(&body).map_err(|e| ApiError::InvalidBody(e.to_string()))?;

    match state.collection.create(draft).await {
        Ok(record) => {
            info!("Created {} {}", R::SINGULAR, record.id());
            Ok((StatusCode::CREATED, Json(DataResponse { data: record })))
        }
        Err(StoreError::UniqueViolation { constraint }) => {
            warn!(
                "Rejected duplicate {} {} (constraint {})",
                R::SINGULAR,
                R::UNIQUE_FIELD,
                constraint
            );
            Err(ApiError::Duplicate {
                label: R::LABEL,
                field: R::UNIQUE_FIELD,
            })
        }
        Err(e) => Err(store_failure::<R>(&state.settings, "create", e)),
    }
}

pub async fn list<R: Resource>(
    State(state): State<ResourceState<R>>,
) -> Result<Json<DataResponse<Vec<R>>>> {
    let records = state
        .collection
        .find_many()
        .await
        .map_err(|e| store_failure::<R>(&state.settings, "list", e))?;

    if records.is_empty() && state.settings.empty_list == EmptyListPolicy::NotFound {
        return Err(ApiError::NoneFound { plural: R::PLURAL });
    }

    debug!("Listed {} {}", records.len(), R::PLURAL);

    Ok(Json(DataResponse { data: records }))
}

pub async fn get_one<R: Resource>(
    State(state): State<ResourceState<R>>,
    Path(raw_id): Path<String>,
) -> Result<Json<DataResponse<R>>> {
    let Some(id) = parse_id(&raw_id) else {
        return Err(not_found::<R>(raw_id));
    };

    let record = state
        .collection
        .find_unique(id)
        .await
        .map_err(|e| store_failure::<R>(&state.settings, "get", e))?;

    match record {
        Some(record) => {
            debug!("Fetched {} {}", R::SINGULAR, id);
            Ok(Json(DataResponse { data: record }))
        }
        None => Err(not_found::<R>(raw_id)),
    }
}

/// Single conditional delete: the store reports whether a row went away,
/// so there is no window between an existence check and the removal.
pub async fn remove<R: Resource>(
    State(state): State<ResourceState<R>>,
    Path(raw_id): Path<String>,
) -> Result<Json<MessageResponse>> {
    let Some(id) = parse_id(&raw_id) else {
        return Err(not_found::<R>(raw_id));
    };

    let removed = state
        .collection
        .delete(id)
        .await
        .map_err(|e| store_failure::<R>(&state.settings, "delete", e))?;

    match removed {
        Some(_) => {
            info!("Deleted {} {}", R::SINGULAR, id);
            Ok(Json(MessageResponse::new(format!(
                "{} with the id: {} successfully deleted",
                R::LABEL,
                raw_id
            ))))
        }
        None => Err(not_found::<R>(raw_id)),
    }
}

fn require_json(headers: &HeaderMap) -> Result<()> {
    let content_type = headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok());

    match content_type {
        Some("application/json") => Ok(()),
        other => {
            debug!("Rejected create with content-type {:?}", other);
            Err(ApiError::InvalidContentType)
        }
    }
}

/// Ids that are not integers cannot match any record.
fn parse_id(raw: &str) -> Option<RecordId> {
    raw.trim().parse().ok()
}

fn not_found<R: Resource>(raw_id: String) -> ApiError {
    ApiError::NotFound {
        singular: R::SINGULAR,
        id: raw_id,
    }
}

fn store_failure<R: Resource>(settings: &HandlerSettings, op: &str, err: StoreError) -> ApiError {
    error!("Store {} failed for {}: {}", op, R::PLURAL, err);

    if settings.expose_store_errors {
        ApiError::Internal(err.to_string())
    } else {
        ApiError::Internal("Internal server error".to_string())
    }
}
