//! Pictura-Common: Shared types and utilities.
//!
//! This crate provides common functionality used across pictura:
//!
//! - **Typed IDs**: A type-safe wrapper for database-assigned image IDs
//! - **Path Utilities**: File name and extension helpers for uploads
//! - **Error Handling**: Common error types and result aliases
//!
//! # Examples
//!
//! ```
//! use pictura_common::{ImageId, Error, Result};
//! use pictura_common::paths::file_extension;
//!
//! let id = ImageId::from(42);
//! assert_eq!(id.to_string(), "42");
//!
//! assert_eq!(file_extension("holiday.jpeg"), Some("jpeg"));
//!
//! fn example() -> Result<()> {
//!     Err(Error::invalid_input("empty file name"))
//! }
//! ```

pub mod error;
pub mod ids;
pub mod paths;

pub use error::{Error, Result};
pub use ids::*;
