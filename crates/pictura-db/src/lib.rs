//! Pictura-DB: Database schema, migrations, and query operations
//!
//! This crate provides database functionality for pictura using SQLite
//! with rusqlite and r2d2 connection pooling.
//!
//! # Modules
//!
//! - `migrations` - Database schema migrations
//! - `pool` - Connection pool management
//! - `models` - Rust models matching database schema
//! - `queries` - Database query operations
//!
//! # Example
//!
//! ```no_run
//! use pictura_db::models::NewImage;
//! use pictura_db::pool::{init_pool, get_conn};
//! use pictura_db::queries::images;
//!
//! let pool = init_pool("/var/lib/pictura/pictura.db").unwrap();
//! let conn = get_conn(&pool).unwrap();
//!
//! let image = images::insert_image(&conn, &NewImage {
//!     name: "cat.jpg".to_string(),
//!     path: "images/0f1e2d3c4b5a69788796a5b4c3d2e1f0.jpg".to_string(),
//!     size: 2048,
//! }).unwrap();
//! println!("Stored image {}", image.id);
//! ```

pub mod migrations;
pub mod models;
pub mod pool;
pub mod queries;
