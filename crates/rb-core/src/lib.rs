pub mod case;
pub mod header;
pub mod ids;
pub mod lock;
pub mod model;
pub mod summary;
pub mod time;

pub use case::*;
pub use header::*;
pub use ids::*;
pub use lock::*;
pub use model::*;
pub use summary::*;
pub use time::*;
