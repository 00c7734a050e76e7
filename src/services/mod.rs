// Readshelf services
// Stateless or network-facing functionality: catalog access, listing helpers, filter vocabularies, settings.

pub mod browse;
pub mod catalog_client;
pub mod categories;
pub mod settings_engine;
