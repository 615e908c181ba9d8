mod run_repository;
mod suite_repository;

pub use run_repository::RunRepository;
pub use suite_repository::SuiteRepository;
