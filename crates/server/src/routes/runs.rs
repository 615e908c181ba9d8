use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use briefing::Briefing;
use events::{Event, EventEnvelope};
use orchestrator::AdvanceOutcome;
use scenario_core::{AbortRunRequest, Observation, RecordOutcomeRequest, SuiteRun, SuiteRunItem};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::error::AppError;
use crate::state::AppState;

#[utoipa::path(
    post,
    path = "/api/orgs/{org_id}/suites/{id}/runs",
    params(
        ("org_id" = Uuid, Path, description = "Organization ID"),
        ("id" = Uuid, Path, description = "Suite ID")
    ),
    responses(
        (status = 201, description = "Run started", body = SuiteRun),
        (status = 400, description = "Suite has no items"),
        (status = 404, description = "Suite not found"),
        (status = 409, description = "Suite is archived")
    ),
    tag = "runs"
)]
pub async fn start_run(
    State(state): State<AppState>,
    Path((org_id, id)): Path<(Uuid, Uuid)>,
) -> Result<(StatusCode, Json<SuiteRun>), AppError> {
    let run = state.run_service.start_run(org_id, id).await?;
    Ok((StatusCode::CREATED, Json(run)))
}

#[utoipa::path(
    get,
    path = "/api/orgs/{org_id}/suites/{id}/runs",
    params(
        ("org_id" = Uuid, Path, description = "Organization ID"),
        ("id" = Uuid, Path, description = "Suite ID")
    ),
    responses((status = 200, description = "Runs for the suite", body = [SuiteRun])),
    tag = "runs"
)]
pub async fn list_runs(
    State(state): State<AppState>,
    Path((org_id, id)): Path<(Uuid, Uuid)>,
) -> Result<Json<Vec<SuiteRun>>, AppError> {
    let runs = state.run_repository.find_all_for_suite(org_id, id).await?;
    Ok(Json(runs))
}

#[derive(Debug, Serialize, ToSchema)]
pub struct RunDetailResponse {
    pub run: SuiteRun,
    pub items: Vec<SuiteRunItem>,
}

#[utoipa::path(
    get,
    path = "/api/orgs/{org_id}/runs/{id}",
    params(
        ("org_id" = Uuid, Path, description = "Organization ID"),
        ("id" = Uuid, Path, description = "Run ID")
    ),
    responses(
        (status = 200, description = "Run with its item records", body = RunDetailResponse),
        (status = 404, description = "Run not found")
    ),
    tag = "runs"
)]
pub async fn get_run(
    State(state): State<AppState>,
    Path((org_id, id)): Path<(Uuid, Uuid)>,
) -> Result<Json<RunDetailResponse>, AppError> {
    let run = state.run_repository.find_by_id(org_id, id).await?;

    match run {
        Some(run) => {
            let items = state.run_repository.items_for_run(run.id).await?;
            Ok(Json(RunDetailResponse { run, items }))
        }
        None => Err(AppError::NotFound(format!("Run not found: {}", id))),
    }
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AdvanceOutcomeDto {
    Advanced { to_index: i64, skipped: Vec<i64> },
    Completed { skipped: Vec<i64> },
}

impl From<AdvanceOutcome> for AdvanceOutcomeDto {
    fn from(outcome: AdvanceOutcome) -> Self {
        match outcome {
            AdvanceOutcome::Advanced { to_index, skipped } => Self::Advanced { to_index, skipped },
            AdvanceOutcome::Completed { skipped } => Self::Completed { skipped },
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct AdvanceResponse {
    pub run: SuiteRun,
    pub outcome: AdvanceOutcomeDto,
}

#[utoipa::path(
    post,
    path = "/api/orgs/{org_id}/runs/{id}/advance",
    params(
        ("org_id" = Uuid, Path, description = "Organization ID"),
        ("id" = Uuid, Path, description = "Run ID")
    ),
    request_body = Observation,
    responses(
        (status = 200, description = "Run advanced or completed", body = AdvanceResponse),
        (status = 404, description = "Run not found"),
        (status = 409, description = "Run is not running")
    ),
    tag = "runs"
)]
pub async fn advance_run(
    State(state): State<AppState>,
    Path((org_id, id)): Path<(Uuid, Uuid)>,
    Json(observation): Json<Observation>,
) -> Result<Json<AdvanceResponse>, AppError> {
    let outcome = state
        .run_service
        .advance_run(org_id, id, &observation)
        .await?;

    let run = state
        .run_repository
        .find_by_id(org_id, id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Run not found: {}", id)))?;

    Ok(Json(AdvanceResponse {
        run,
        outcome: outcome.into(),
    }))
}

#[utoipa::path(
    post,
    path = "/api/orgs/{org_id}/runs/{id}/outcome",
    params(
        ("org_id" = Uuid, Path, description = "Organization ID"),
        ("id" = Uuid, Path, description = "Run ID")
    ),
    request_body = RecordOutcomeRequest,
    responses(
        (status = 200, description = "Outcome recorded for the current item", body = SuiteRunItem),
        (status = 404, description = "Run not found"),
        (status = 409, description = "Run is not running")
    ),
    tag = "runs"
)]
pub async fn record_outcome(
    State(state): State<AppState>,
    Path((org_id, id)): Path<(Uuid, Uuid)>,
    Json(payload): Json<RecordOutcomeRequest>,
) -> Result<Json<SuiteRunItem>, AppError> {
    let item = state
        .run_service
        .record_outcome(org_id, id, &payload)
        .await?;
    Ok(Json(item))
}

#[utoipa::path(
    post,
    path = "/api/orgs/{org_id}/runs/{id}/abort",
    params(
        ("org_id" = Uuid, Path, description = "Organization ID"),
        ("id" = Uuid, Path, description = "Run ID")
    ),
    request_body = AbortRunRequest,
    responses(
        (status = 200, description = "Run aborted", body = SuiteRun),
        (status = 400, description = "Missing abort reason"),
        (status = 404, description = "Run not found"),
        (status = 409, description = "Run already terminal")
    ),
    tag = "runs"
)]
pub async fn abort_run(
    State(state): State<AppState>,
    Path((org_id, id)): Path<(Uuid, Uuid)>,
    Json(payload): Json<AbortRunRequest>,
) -> Result<Json<SuiteRun>, AppError> {
    if payload.reason.trim().is_empty() {
        return Err(AppError::BadRequest(
            "Abort reason cannot be empty".to_string(),
        ));
    }

    let run = state
        .run_service
        .abort_run(org_id, id, &payload.reason)
        .await?;
    Ok(Json(run))
}

#[derive(Debug, Clone, Copy, Default, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum DebriefKind {
    #[default]
    Debrief,
    RiskMap,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct DebriefRequest {
    #[serde(default)]
    pub kind: DebriefKind,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct DebriefResponse {
    pub kind: String,
    pub content: String,
}

impl From<Briefing> for DebriefResponse {
    fn from(briefing: Briefing) -> Self {
        Self {
            kind: briefing.kind.as_str().to_string(),
            content: briefing.content,
        }
    }
}

#[utoipa::path(
    post,
    path = "/api/orgs/{org_id}/runs/{id}/debrief",
    params(
        ("org_id" = Uuid, Path, description = "Organization ID"),
        ("id" = Uuid, Path, description = "Run ID")
    ),
    request_body = DebriefRequest,
    responses(
        (status = 200, description = "Generated briefing", body = DebriefResponse),
        (status = 404, description = "Run not found"),
        (status = 500, description = "Briefing generation failed or not configured")
    ),
    tag = "runs"
)]
pub async fn generate_debrief(
    State(state): State<AppState>,
    Path((org_id, id)): Path<(Uuid, Uuid)>,
    Json(payload): Json<DebriefRequest>,
) -> Result<Json<DebriefResponse>, AppError> {
    let Some(generator) = &state.briefing_generator else {
        return Err(AppError::Internal(
            "Briefing generation is not configured".to_string(),
        ));
    };

    let run = state
        .run_repository
        .find_by_id(org_id, id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Run not found: {}", id)))?;
    let suite = state
        .suite_repository
        .find_by_id(org_id, run.suite_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Suite not found: {}", run.suite_id)))?;
    let items = state.suite_repository.items_for_suite(suite.id).await?;
    let run_items = state.run_repository.items_for_run(run.id).await?;

    let briefing = match payload.kind {
        DebriefKind::Debrief => {
            generator
                .generate_debrief(&suite, &run, &items, &run_items)
                .await?
        }
        DebriefKind::RiskMap => {
            generator
                .generate_risk_map(&suite, &run, &items, &run_items)
                .await?
        }
    };

    state
        .event_bus
        .publish(EventEnvelope::new(Event::BriefingGenerated {
            run_id: run.id,
            kind: briefing.kind.as_str().to_string(),
        }));

    Ok(Json(briefing.into()))
}
