pub mod error;
pub mod models;
pub mod provider;

// Boundary types at the crate root
pub use error::{ApiError, ApiResult};
pub use models::*;
pub use provider::TreeProvider;
