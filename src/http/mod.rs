//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, trace spans)
//!     → forward.rs (scope check, credential, single upstream call)
//!     → request.rs (outbound header set)
//!     → response.rs (pass-through or plain-text 404/500)
//!     → Send to client
//! ```

pub mod forward;
pub mod request;
pub mod response;
pub mod server;

pub use forward::ForwardError;
pub use request::{outbound_headers, RequestIdExt, X_REQUEST_ID};
pub use server::{AppState, HttpServer};
