mod health;
mod runs;
mod suites;
pub mod sse;

pub use health::*;
pub use runs::*;
pub use suites::*;
