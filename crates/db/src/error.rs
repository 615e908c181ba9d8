use thiserror::Error;
use uuid::Uuid;

#[derive(Error, Debug)]
pub enum DbError {
    #[error("Database error: {0}")]
    Sqlx(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error("Suite not found: {0}")]
    SuiteNotFound(Uuid),

    #[error("Run not found: {0}")]
    RunNotFound(Uuid),
}
