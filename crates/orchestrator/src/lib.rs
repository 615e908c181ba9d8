//! Suite run orchestration: trigger-condition evaluation, the run state
//! machine, and the service that wires them to persistence and events.

pub mod condition;
pub mod error;
pub mod service;
pub mod state_machine;

pub use condition::evaluate;
pub use error::{OrchestratorError, Result};
pub use service::SuiteRunService;
pub use state_machine::{AdvanceOutcome, RunStateMachine};
