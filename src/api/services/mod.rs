pub mod health;
pub mod info;

pub use health::{AppStartTime, HealthService, health_routes};
pub use info::{InfoService, info_routes};
