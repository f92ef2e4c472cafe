pub mod report;
pub mod rule;
pub mod schema;
pub mod types;

pub use report::*;
pub use rule::*;
pub use schema::*;
pub use types::*;
