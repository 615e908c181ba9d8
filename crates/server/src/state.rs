use briefing::BriefingGenerator;
use db::{RunRepository, SuiteRepository};
use events::EventBus;
use orchestrator::SuiteRunService;
use sqlx::SqlitePool;

#[derive(Clone)]
pub struct AppState {
    pub suite_repository: SuiteRepository,
    pub run_repository: RunRepository,
    pub run_service: SuiteRunService,
    pub event_bus: EventBus,
    pub briefing_generator: Option<BriefingGenerator>,
}

impl AppState {
    pub fn new(pool: SqlitePool, briefing_generator: Option<BriefingGenerator>) -> Self {
        let event_bus = EventBus::new();
        let suite_repository = SuiteRepository::new(pool.clone());
        let run_repository = RunRepository::new(pool);
        let run_service = SuiteRunService::new(
            suite_repository.clone(),
            run_repository.clone(),
            event_bus.clone(),
        );

        Self {
            suite_repository,
            run_repository,
            run_service,
            event_bus,
            briefing_generator,
        }
    }
}
