pub mod auth;
pub mod health;
pub mod helpers;
pub mod links;
pub mod profile;
pub mod routes;
pub mod types;

pub use health::{AppStartTime, HealthService};
pub use routes::{api_routes, health_routes};
