//! Centralized error handling for the Shutterlink application
//!
//! This module provides a comprehensive error handling system that unifies
//! error types across all application layers and provides consistent error
//! reporting and debugging capabilities.
//!
//! # Error Categories
//!
//! - **Validation Errors**: Upload rejections surfaced to the client as 400s
//! - **Not Found / Expired**: Image lifecycle errors mapped to 404 and 410
//! - **Storage Errors**: Blob store I/O failures
//! - **Encoding Errors**: QR code generation failures
//!
//! # Usage
//!
//! ```rust
//! use shutterlink::errors::{AppError, AppResult};
//!
//! async fn example_function() -> AppResult<String> {
//!     // Function can return any error type that converts to AppError
//!     Ok("success".to_string())
//! }
//! ```

pub mod types;

pub use types::*;

/// Convenience type alias for Results using AppError
pub type AppResult<T> = Result<T, AppError>;
