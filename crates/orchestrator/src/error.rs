use scenario_core::RunStatus;
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum OrchestratorError {
    #[error("Suite has no items: {0}")]
    EmptySuite(Uuid),

    #[error("Cannot start a run on archived suite: {0}")]
    ArchivedSuite(Uuid),

    #[error("Cannot advance {status} run: {run_id}", status = .status.as_str())]
    InvalidRunState { run_id: Uuid, status: RunStatus },

    #[error("Cannot abort {status} run: {run_id}", status = .status.as_str())]
    CannotAbort { run_id: Uuid, status: RunStatus },

    #[error("Suite not found: {0}")]
    SuiteNotFound(Uuid),

    #[error("Run not found: {0}")]
    RunNotFound(Uuid),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Database error: {0}")]
    Database(#[from] db::DbError),
}

pub type Result<T> = std::result::Result<T, OrchestratorError>;
