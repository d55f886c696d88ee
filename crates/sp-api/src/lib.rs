pub mod ai;
pub mod auth;
pub mod config;
pub mod error;
pub mod goal;
pub mod material;
pub mod metrics;
pub mod middleware;
pub mod plan;
pub mod profile;
pub mod router;
pub mod session;
pub mod state;
pub mod storage;
pub mod tracing;
pub mod validation;

pub use config::ApiConfig;
pub use state::ApiState;
