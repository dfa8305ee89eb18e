//! # account-store-api
//!
//! Shared API types for the account-store service.
//! This crate only depends on serde and chrono so it can be compiled for
//! WASM and reused by clients of the service (game server, admin tools).
//!
//! ## Features
//!
//! - Request DTOs (RegisterRequest, LoginRequest, TokenLoginRequest, etc.)
//! - Response DTOs (UserResponse, SessionResponse, etc.)
//! - Error response format (ErrorResponse)
//!
//! ## Example
//!
//! ```rust
//! use account_store_api::LoginRequest;
//!
//! let request = LoginRequest {
//!     login: "alice".to_string(),
//!     password: "hunter22".to_string(),
//!     remember: true,
//! };
//! assert!(request.remember);
//! ```

pub mod error;
pub mod requests;
pub mod responses;

// Re-exports for convenient access
pub use error::ErrorResponse;
pub use requests::*;
pub use responses::*;
