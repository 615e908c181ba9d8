use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use events::{Event, EventEnvelope};
use scenario_core::{
    AddSuiteItemRequest, CreateSuiteRequest, Suite, SuiteItem, UpdateSuiteRequest,
};
use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::error::AppError;
use crate::state::AppState;

#[utoipa::path(
    get,
    path = "/api/orgs/{org_id}/suites",
    params(("org_id" = Uuid, Path, description = "Organization ID")),
    responses((status = 200, description = "List suites", body = [Suite])),
    tag = "suites"
)]
pub async fn list_suites(
    State(state): State<AppState>,
    Path(org_id): Path<Uuid>,
) -> Result<Json<Vec<Suite>>, AppError> {
    let suites = state.suite_repository.find_all(org_id).await?;
    Ok(Json(suites))
}

#[utoipa::path(
    post,
    path = "/api/orgs/{org_id}/suites",
    params(("org_id" = Uuid, Path, description = "Organization ID")),
    request_body = CreateSuiteRequest,
    responses(
        (status = 201, description = "Suite created", body = Suite),
        (status = 400, description = "Invalid request")
    ),
    tag = "suites"
)]
pub async fn create_suite(
    State(state): State<AppState>,
    Path(org_id): Path<Uuid>,
    Json(payload): Json<CreateSuiteRequest>,
) -> Result<(StatusCode, Json<Suite>), AppError> {
    if payload.name.trim().is_empty() {
        return Err(AppError::BadRequest("Suite name cannot be empty".to_string()));
    }

    let suite = Suite::new(org_id, payload.name, payload.description);
    let created = state.suite_repository.create(&suite).await?;

    state
        .event_bus
        .publish(EventEnvelope::new(Event::SuiteCreated {
            suite_id: created.id,
            org_id,
        }));

    Ok((StatusCode::CREATED, Json(created)))
}

#[derive(Debug, Serialize, ToSchema)]
pub struct SuiteDetailResponse {
    pub suite: Suite,
    pub items: Vec<SuiteItem>,
}

#[utoipa::path(
    get,
    path = "/api/orgs/{org_id}/suites/{id}",
    params(
        ("org_id" = Uuid, Path, description = "Organization ID"),
        ("id" = Uuid, Path, description = "Suite ID")
    ),
    responses(
        (status = 200, description = "Suite with its items", body = SuiteDetailResponse),
        (status = 404, description = "Suite not found")
    ),
    tag = "suites"
)]
pub async fn get_suite(
    State(state): State<AppState>,
    Path((org_id, id)): Path<(Uuid, Uuid)>,
) -> Result<Json<SuiteDetailResponse>, AppError> {
    let suite = state.suite_repository.find_by_id(org_id, id).await?;

    match suite {
        Some(suite) => {
            let items = state.suite_repository.items_for_suite(suite.id).await?;
            Ok(Json(SuiteDetailResponse { suite, items }))
        }
        None => Err(AppError::NotFound(format!("Suite not found: {}", id))),
    }
}

#[utoipa::path(
    patch,
    path = "/api/orgs/{org_id}/suites/{id}",
    params(
        ("org_id" = Uuid, Path, description = "Organization ID"),
        ("id" = Uuid, Path, description = "Suite ID")
    ),
    request_body = UpdateSuiteRequest,
    responses(
        (status = 200, description = "Suite updated", body = Suite),
        (status = 404, description = "Suite not found")
    ),
    tag = "suites"
)]
pub async fn update_suite(
    State(state): State<AppState>,
    Path((org_id, id)): Path<(Uuid, Uuid)>,
    Json(payload): Json<UpdateSuiteRequest>,
) -> Result<Json<Suite>, AppError> {
    let updated = state.suite_repository.update(org_id, id, &payload).await?;

    match updated {
        Some(suite) => Ok(Json(suite)),
        None => Err(AppError::NotFound(format!("Suite not found: {}", id))),
    }
}

#[utoipa::path(
    delete,
    path = "/api/orgs/{org_id}/suites/{id}",
    params(
        ("org_id" = Uuid, Path, description = "Organization ID"),
        ("id" = Uuid, Path, description = "Suite ID")
    ),
    responses(
        (status = 204, description = "Suite deleted"),
        (status = 404, description = "Suite not found")
    ),
    tag = "suites"
)]
pub async fn delete_suite(
    State(state): State<AppState>,
    Path((org_id, id)): Path<(Uuid, Uuid)>,
) -> Result<StatusCode, AppError> {
    let deleted = state.suite_repository.delete(org_id, id).await?;

    if deleted {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::NotFound(format!("Suite not found: {}", id)))
    }
}

#[utoipa::path(
    post,
    path = "/api/orgs/{org_id}/suites/{id}/archive",
    params(
        ("org_id" = Uuid, Path, description = "Organization ID"),
        ("id" = Uuid, Path, description = "Suite ID")
    ),
    responses(
        (status = 200, description = "Suite archived", body = Suite),
        (status = 404, description = "Suite not found")
    ),
    tag = "suites"
)]
pub async fn archive_suite(
    State(state): State<AppState>,
    Path((org_id, id)): Path<(Uuid, Uuid)>,
) -> Result<Json<Suite>, AppError> {
    let archived = state.suite_repository.archive(org_id, id).await?;

    match archived {
        Some(suite) => {
            state
                .event_bus
                .publish(EventEnvelope::new(Event::SuiteArchived {
                    suite_id: suite.id,
                    org_id,
                }));
            Ok(Json(suite))
        }
        None => Err(AppError::NotFound(format!("Suite not found: {}", id))),
    }
}

#[utoipa::path(
    get,
    path = "/api/orgs/{org_id}/suites/{id}/items",
    params(
        ("org_id" = Uuid, Path, description = "Organization ID"),
        ("id" = Uuid, Path, description = "Suite ID")
    ),
    responses(
        (status = 200, description = "Suite items in order", body = [SuiteItem]),
        (status = 404, description = "Suite not found")
    ),
    tag = "suites"
)]
pub async fn list_suite_items(
    State(state): State<AppState>,
    Path((org_id, id)): Path<(Uuid, Uuid)>,
) -> Result<Json<Vec<SuiteItem>>, AppError> {
    let suite = state.suite_repository.find_by_id(org_id, id).await?;
    if suite.is_none() {
        return Err(AppError::NotFound(format!("Suite not found: {}", id)));
    }

    let items = state.suite_repository.items_for_suite(id).await?;
    Ok(Json(items))
}

#[utoipa::path(
    post,
    path = "/api/orgs/{org_id}/suites/{id}/items",
    params(
        ("org_id" = Uuid, Path, description = "Organization ID"),
        ("id" = Uuid, Path, description = "Suite ID")
    ),
    request_body = AddSuiteItemRequest,
    responses(
        (status = 201, description = "Item appended to the suite", body = SuiteItem),
        (status = 400, description = "Invalid request"),
        (status = 404, description = "Suite not found"),
        (status = 409, description = "Suite is archived")
    ),
    tag = "suites"
)]
pub async fn add_suite_item(
    State(state): State<AppState>,
    Path((org_id, id)): Path<(Uuid, Uuid)>,
    Json(payload): Json<AddSuiteItemRequest>,
) -> Result<(StatusCode, Json<SuiteItem>), AppError> {
    payload
        .validate()
        .map_err(|e| AppError::BadRequest(e.to_string()))?;

    let suite = state.suite_repository.find_by_id(org_id, id).await?;
    let Some(suite) = suite else {
        return Err(AppError::NotFound(format!("Suite not found: {}", id)));
    };
    if suite.is_archived() {
        return Err(AppError::Conflict(format!(
            "Cannot add items to archived suite: {}",
            id
        )));
    }

    let order_index = state.suite_repository.next_order_index(id).await?;
    let item = SuiteItem::new(
        id,
        order_index,
        payload.label,
        payload.simulation_id,
        payload.trigger_condition,
    );
    let created = state.suite_repository.add_item(&item).await?;

    Ok((StatusCode::CREATED, Json(created)))
}
