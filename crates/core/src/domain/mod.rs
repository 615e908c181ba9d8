mod condition;
mod run;
mod suite;

pub use condition::*;
pub use run::*;
pub use suite::*;
