pub mod aggregate;
pub mod cases;
pub mod config;
pub mod evaluator;
pub mod invoke;
pub mod runner;
pub mod summary;

pub use aggregate::*;
pub use cases::*;
pub use config::*;
pub use evaluator::*;
pub use invoke::*;
pub use runner::*;
pub use summary::*;
