//! Organisation dashboard analytics service library.

pub mod analytics;
pub mod backend;
pub mod config;
pub mod http;
pub mod lifecycle;
pub mod observability;

pub use config::AppConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
