mod run;
mod suite;

pub use run::*;
pub use suite::*;
