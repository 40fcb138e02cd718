pub mod config;
pub mod handler;
pub mod http;
pub mod logging;
pub mod protocol;

pub use config::{ConfigError, ServerConfig};
pub use handler::{CompatibilityService, HandlerError};
pub use http::{app, router, serve};
