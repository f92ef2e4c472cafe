pub mod contract;
pub mod git;
pub mod types;

pub use git::*;
pub use types::*;
