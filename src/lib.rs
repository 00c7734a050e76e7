//! Readshelf — client core for a browser-based reading library.
//!
//! Catalog access and browsing helpers, plus a per-device reading history
//! kept in a persistent key-value slot. The `readshelf-rpc` binary exposes
//! all of it to a UI shell over newline-delimited JSON-RPC.

pub mod app;
pub mod database;
pub mod managers;
pub mod platform;
pub mod rpc_handler;
pub mod services;
pub mod storage;
pub mod types;
