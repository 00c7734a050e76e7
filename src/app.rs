//! App Core for Readshelf.
//!
//! Wiring root: builds the one history slot, the history manager on top of
//! it, the catalog client and the settings engine, and hands them to the
//! pages (or the RPC bridge) that need them.

use std::path::Path;
use std::sync::Arc;

use tracing::{info, warn};

use crate::managers::history_manager::{HistoryManager, HistoryManagerTrait};
use crate::services::catalog_client::CatalogClient;
use crate::services::settings_engine::{SettingsEngine, SettingsEngineTrait};
use crate::storage::{KeyValueSlot, SqliteSlot};
use crate::types::book::Book;
use crate::types::errors::CatalogError;
use crate::types::history::{HistoryEntry, ViewedBook};

/// Slot handle shared between the history manager and anyone inspecting it.
pub type SharedSlot = Arc<dyn KeyValueSlot + Send + Sync>;

/// Central application struct holding the managers and services.
pub struct App {
    pub slot: SharedSlot,
    pub history: HistoryManager<SharedSlot>,
    pub catalog: CatalogClient,
    pub settings_engine: SettingsEngine,
}

impl App {
    /// Opens the history database at `db_path` and loads settings from
    /// `settings_path`, or from the platform config directory when `None`.
    pub fn open(
        db_path: impl AsRef<Path>,
        settings_path: Option<String>,
    ) -> Result<Self, Box<dyn std::error::Error>> {
        if let Some(parent) = db_path.as_ref().parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let slot: SharedSlot = Arc::new(SqliteSlot::open(db_path.as_ref())?);

        let mut settings_engine = SettingsEngine::new(settings_path);
        if let Err(e) = settings_engine.load() {
            warn!(error = %e, "using default settings");
        }

        Self::with_parts(slot, settings_engine)
    }

    /// Assembles an app from an already-built slot and settings engine.
    pub fn with_parts(
        slot: SharedSlot,
        settings_engine: SettingsEngine,
    ) -> Result<Self, Box<dyn std::error::Error>> {
        let settings = settings_engine.get_settings().clone();
        let catalog = CatalogClient::from_settings(&settings)
            .map_err(|e| format!("CatalogClient init failed: {}", e))?;
        let mut history = HistoryManager::new(slot.clone());
        history.set_capacity(settings.history_capacity);

        info!(api = %catalog.base_url(), capacity = history.capacity(), "readshelf initialised");

        Ok(Self {
            slot,
            history,
            catalog,
            settings_engine,
        })
    }

    /// Re-reads the current settings into the catalog client and history bound.
    pub fn apply_settings(&mut self) -> Result<(), CatalogError> {
        let settings = self.settings_engine.get_settings().clone();
        self.catalog = CatalogClient::from_settings(&settings)?;
        self.history.set_capacity(settings.history_capacity);
        Ok(())
    }

    /// Records that `book` was opened on this device.
    pub fn record_view(&mut self, book: &Book) -> Vec<HistoryEntry> {
        self.history.add(ViewedBook::from(book))
    }

    /// Detail page load: bump the view counter, fetch the detail and record
    /// it in the reading history. Nothing is recorded when the fetch fails.
    pub async fn open_book(&mut self, id: i64) -> Result<Book, CatalogError> {
        let book = load_for_reading(&self.catalog, id).await?;
        self.record_view(&book);
        Ok(book)
    }

    /// Reader page load: fetch and record, leaving the view counter alone.
    pub async fn read_book(&mut self, id: i64) -> Result<Book, CatalogError> {
        let book = self.catalog.get_book(id).await?;
        self.record_view(&book);
        Ok(book)
    }
}

/// Fetches a book for display while bumping its view counter. A failed bump
/// is logged and otherwise ignored.
pub async fn load_for_reading(catalog: &CatalogClient, id: i64) -> Result<Book, CatalogError> {
    let (bump, detail) = tokio::join!(catalog.increment_views(id), catalog.get_book(id));
    if let Err(e) = bump {
        warn!(error = %e, id, "failed to increment view count");
    }
    detail
}
