pub mod handlers;
pub mod rate_limit;
pub mod routes;

pub use rate_limit::{RateLimiter, RateLimits};
pub use routes::create_api_router;
