// Readshelf shared type definitions
// Each submodule defines types used across the library.

pub mod book;
pub mod errors;
pub mod history;
pub mod settings;
