// Readshelf state managers
// Managers own persisted client state. The reading history is the only one.

pub mod history_manager;
