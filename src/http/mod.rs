//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, middleware stack)
//!     → request.rs (assign / propagate x-request-id)
//!     → dash.rs (validate, authenticate, fetch analytics)
//!     → response.rs (error bodies)
//!     → Send to client
//! ```

pub mod dash;
pub mod request;
pub mod response;
pub mod server;

pub use dash::{AnalyticsRequest, DASH_ANALYTICS_PATH};
pub use request::{RequestIdExt, UuidRequestId, X_REQUEST_ID};
pub use response::ApiError;
pub use server::{build_router, AppState, Backends, HttpServer};
