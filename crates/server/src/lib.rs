pub mod config;
pub mod error;
pub mod routes;
pub mod state;

use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use state::AppState;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Scenario Suite API",
        version = "0.1.0",
        description = "API for scenario suite orchestration - trigger-gated crisis simulation runs"
    ),
    paths(
        routes::health_check,
        routes::list_suites,
        routes::create_suite,
        routes::get_suite,
        routes::update_suite,
        routes::delete_suite,
        routes::archive_suite,
        routes::list_suite_items,
        routes::add_suite_item,
        routes::start_run,
        routes::list_runs,
        routes::get_run,
        routes::advance_run,
        routes::record_outcome,
        routes::abort_run,
        routes::generate_debrief,
        routes::sse::events_stream,
    ),
    components(schemas(
        routes::HealthResponse,
        routes::SuiteDetailResponse,
        routes::RunDetailResponse,
        routes::AdvanceOutcomeDto,
        routes::AdvanceResponse,
        routes::DebriefKind,
        routes::DebriefRequest,
        routes::DebriefResponse,
        scenario_core::Suite,
        scenario_core::SuiteStatus,
        scenario_core::SuiteItem,
        scenario_core::CreateSuiteRequest,
        scenario_core::UpdateSuiteRequest,
        scenario_core::AddSuiteItemRequest,
        scenario_core::TriggerCondition,
        scenario_core::RiskLevel,
        scenario_core::Comparison,
        scenario_core::MatchMode,
        scenario_core::SentimentDirection,
        scenario_core::SentimentMagnitude,
        scenario_core::SentimentShift,
        scenario_core::Observation,
        scenario_core::SuiteRun,
        scenario_core::RunStatus,
        scenario_core::SuiteRunItem,
        scenario_core::RunItemStatus,
        scenario_core::RecordOutcomeRequest,
        scenario_core::AbortRunRequest,
    )),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "suites", description = "Suite and suite item management"),
        (name = "runs", description = "Suite run lifecycle"),
        (name = "events", description = "Real-time event streaming (SSE)"),
    )
)]
pub struct ApiDoc;

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api/openapi.json", ApiDoc::openapi()))
        .route("/health", get(routes::health_check))
        .route(
            "/api/orgs/{org_id}/suites",
            get(routes::list_suites).post(routes::create_suite),
        )
        .route(
            "/api/orgs/{org_id}/suites/{id}",
            get(routes::get_suite)
                .patch(routes::update_suite)
                .delete(routes::delete_suite),
        )
        .route(
            "/api/orgs/{org_id}/suites/{id}/archive",
            post(routes::archive_suite),
        )
        .route(
            "/api/orgs/{org_id}/suites/{id}/items",
            get(routes::list_suite_items).post(routes::add_suite_item),
        )
        .route(
            "/api/orgs/{org_id}/suites/{id}/runs",
            get(routes::list_runs).post(routes::start_run),
        )
        .route("/api/orgs/{org_id}/runs/{id}", get(routes::get_run))
        .route(
            "/api/orgs/{org_id}/runs/{id}/advance",
            post(routes::advance_run),
        )
        .route(
            "/api/orgs/{org_id}/runs/{id}/outcome",
            post(routes::record_outcome),
        )
        .route("/api/orgs/{org_id}/runs/{id}/abort", post(routes::abort_run))
        .route(
            "/api/orgs/{org_id}/runs/{id}/debrief",
            post(routes::generate_debrief),
        )
        .route("/api/events", get(routes::sse::events_stream))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
