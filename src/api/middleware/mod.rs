pub mod auth;
pub mod catch_panic;
pub mod request_id;

pub use auth::{AuthMethod, AuthenticatedUser, UserAuth};
pub use catch_panic::CatchPanic;
pub use request_id::{RequestId, RequestIdMiddleware};
