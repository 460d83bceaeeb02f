pub mod auth;
pub mod response;

pub use auth::PortalVisitor;
pub use response::{ApiResponse, ApiResult};
