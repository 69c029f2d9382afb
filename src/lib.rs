//! Pictura - minimal self-hosted image gallery
//!
//! This library crate exposes the core functionality for integration testing.

pub mod config;
pub mod images;
pub mod server;
