pub mod auth;
pub mod response;

pub use auth::{context_middleware, SITE_HEADER};
pub use response::{ApiResponse, ApiResult};
