//! Readshelf database layer.
//!
//! Provides SQLite connection management and schema migrations for the
//! durable key-value slot.
//!
//! # Usage
//!
//! ```no_run
//! use readshelf::database::Database;
//!
//! let db = Database::open("readshelf.db").expect("failed to open database");
//! let conn = db.connection();
//! ```

pub mod connection;
pub mod migrations;

pub use connection::Database;
