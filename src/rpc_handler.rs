//! RPC method handler for the Readshelf JSON-RPC protocol.
//!
//! Kept apart from `rpc_server.rs` so it can be unit-tested directly.
//! `handle_method` dispatches a call to the history manager, catalog client
//! or settings engine held by the `App`. The app lock is never held across
//! a network request.

use std::sync::{Mutex, MutexGuard};

use serde_json::{json, Value};

use crate::app::{load_for_reading, App};
use crate::managers::history_manager::HistoryManagerTrait;
use crate::services::browse::{self, SortOrder};
use crate::services::catalog_client::{CatalogClient, SearchQuery};
use crate::services::categories::{AUTHORS, CATEGORIES};
use crate::services::settings_engine::SettingsEngineTrait;
use crate::types::book::{Book, BookInput, BookUpload};
use crate::types::history::{BookId, ViewedBook};

fn lock(app: &Mutex<App>) -> Result<MutexGuard<'_, App>, String> {
    app.lock().map_err(|e| e.to_string())
}

fn param_str<'a>(params: &'a Value, key: &str) -> Option<&'a str> {
    params.get(key).and_then(|v| v.as_str())
}

fn param_book_id(params: &Value) -> Result<BookId, String> {
    let raw = params.get("id").cloned().ok_or("missing id")?;
    serde_json::from_value(raw).map_err(|e| format!("invalid id: {}", e))
}

fn param_catalog_id(params: &Value) -> Result<i64, String> {
    params
        .get("id")
        .and_then(|v| v.as_i64())
        .ok_or_else(|| "missing or non-numeric id".to_string())
}

/// Builds an upload from `{path, name, author, categories}`, reading the PDF
/// from the local file system.
async fn param_upload(params: &Value) -> Result<BookUpload, String> {
    let path = param_str(params, "path").ok_or("missing path")?;
    let file_name = std::path::Path::new(path)
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .ok_or_else(|| format!("not a file path: {}", path))?;
    let categories = match params.get("categories") {
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(|v| v.as_str().map(str::to_string))
            .collect(),
        Some(Value::String(joined)) => joined.split(',').map(str::to_string).collect(),
        _ => Vec::new(),
    };
    let pdf = tokio::fs::read(path)
        .await
        .map_err(|e| format!("cannot read {}: {}", path, e))?;

    Ok(BookUpload {
        name: param_str(params, "name").unwrap_or_default().to_string(),
        author: param_str(params, "author").unwrap_or_default().to_string(),
        categories,
        file_name,
        pdf,
    })
}

fn param_book_input(params: &Value) -> Result<BookInput, String> {
    serde_json::from_value(params.clone()).map_err(|e| format!("invalid book: {}", e))
}

fn to_json<T: serde::Serialize>(value: &T) -> Result<Value, String> {
    serde_json::to_value(value).map_err(|e| e.to_string())
}

/// Book JSON enriched with the URLs the UI needs to render it.
fn book_json(catalog: &CatalogClient, book: &Book) -> Result<Value, String> {
    let mut value = to_json(book)?;
    if let Value::Object(map) = &mut value {
        map.insert("thumbnailUrl".to_string(), json!(catalog.thumbnail_url(book)));
        map.insert("pdfUrl".to_string(), json!(catalog.pdf_url(book.id)));
    }
    Ok(value)
}

fn books_json(catalog: &CatalogClient, books: &[Book]) -> Result<Value, String> {
    books
        .iter()
        .map(|b| book_json(catalog, b))
        .collect::<Result<Vec<_>, _>>()
        .map(Value::Array)
}

/// Dispatch a JSON-RPC method call to the appropriate handler.
///
/// Returns `Ok(Value)` on success or `Err(String)` with an error message.
pub async fn handle_method(app: &Mutex<App>, method: &str, params: &Value) -> Result<Value, String> {
    match method {
        "ping" => Ok(json!({"pong": true})),

        // ─── History ───
        "history.list" => {
            let a = lock(app)?;
            to_json(&a.history.get())
        }
        "history.contains" => {
            let id = param_book_id(params)?;
            let a = lock(app)?;
            Ok(json!({"contains": a.history.contains(&id)}))
        }
        "history.record" => {
            let book: ViewedBook = serde_json::from_value(params.clone())
                .map_err(|e| format!("invalid book: {}", e))?;
            let mut a = lock(app)?;
            to_json(&a.history.add(book))
        }
        "history.remove" => {
            let id = param_book_id(params)?;
            let mut a = lock(app)?;
            to_json(&a.history.remove(&id))
        }
        "history.clear" => {
            let mut a = lock(app)?;
            to_json(&a.history.clear())
        }

        // ─── Catalog ───
        "book.open" => {
            let id = param_catalog_id(params)?;
            let catalog = lock(app)?.catalog.clone();
            let book = load_for_reading(&catalog, id)
                .await
                .map_err(|e| e.to_string())?;
            lock(app)?.record_view(&book);
            book_json(&catalog, &book)
        }
        "book.read" => {
            let id = param_catalog_id(params)?;
            let catalog = lock(app)?.catalog.clone();
            let book = catalog.get_book(id).await.map_err(|e| e.to_string())?;
            lock(app)?.record_view(&book);
            book_json(&catalog, &book)
        }
        "book.create" => {
            let input = param_book_input(params)?;
            let catalog = lock(app)?.catalog.clone();
            let book = catalog.create_book(&input).await.map_err(|e| e.to_string())?;
            book_json(&catalog, &book)
        }
        "book.update" => {
            let id = param_catalog_id(params)?;
            let input = param_book_input(params)?;
            let catalog = lock(app)?.catalog.clone();
            let book = catalog
                .update_book(id, &input)
                .await
                .map_err(|e| e.to_string())?;
            book_json(&catalog, &book)
        }
        "book.delete" => {
            let id = param_catalog_id(params)?;
            let catalog = lock(app)?.catalog.clone();
            catalog.delete_book(id).await.map_err(|e| e.to_string())?;
            Ok(json!({"ok": true}))
        }
        "book.upload" => {
            let upload = param_upload(params).await?;
            let catalog = lock(app)?.catalog.clone();
            let book = catalog.upload_book(&upload).await.map_err(|e| e.to_string())?;
            book_json(&catalog, &book)
        }
        "book.list" => {
            let catalog = lock(app)?.catalog.clone();
            let books = catalog.list_books().await.map_err(|e| e.to_string())?;
            books_json(&catalog, &books)
        }
        "book.home" => {
            let (catalog, limit) = {
                let a = lock(app)?;
                (a.catalog.clone(), a.settings_engine.get_settings().home_limit)
            };
            let books = catalog.list_books().await.map_err(|e| e.to_string())?;
            books_json(&catalog, &browse::home_page(&books, limit))
        }
        "book.trending" => {
            let (catalog, limit) = {
                let a = lock(app)?;
                (a.catalog.clone(), a.settings_engine.get_settings().trending_limit)
            };
            let books = catalog.list_books().await.map_err(|e| e.to_string())?;
            books_json(&catalog, &browse::trending(&books, limit))
        }
        "book.search" => {
            let query = SearchQuery {
                keyword: param_str(params, "keyword").map(str::to_string),
                category: param_str(params, "category").map(str::to_string),
                author: param_str(params, "author").map(str::to_string),
            };
            let sort = SortOrder::parse_optional(param_str(params, "sort"));
            let page = params.get("page").and_then(|v| v.as_u64()).unwrap_or(1) as usize;
            let (catalog, per_page) = {
                let a = lock(app)?;
                (a.catalog.clone(), a.settings_engine.get_settings().page_size)
            };

            let mut books = catalog.search(&query).await.map_err(|e| e.to_string())?;
            if let Some(order) = sort {
                browse::sort_books(&mut books, order);
            }
            let page = browse::paginate(&books, page, per_page);
            Ok(json!({
                "items": books_json(&catalog, &page.items)?,
                "page": page.page,
                "totalPages": page.total_pages,
                "totalItems": page.total_items,
            }))
        }
        "book.thumbnail_url" => {
            let book: Book = serde_json::from_value(params.clone())
                .map_err(|e| format!("invalid book: {}", e))?;
            let a = lock(app)?;
            Ok(json!({"url": a.catalog.thumbnail_url(&book)}))
        }
        "book.pdf_url" => {
            let id = param_catalog_id(params)?;
            let a = lock(app)?;
            Ok(json!({"url": a.catalog.pdf_url(id)}))
        }
        "categories.list" => Ok(json!({
            "categories": to_json(&CATEGORIES)?,
            "authors": to_json(&AUTHORS)?,
        })),

        // ─── Settings ───
        "settings.get" => {
            let a = lock(app)?;
            to_json(a.settings_engine.get_settings())
        }
        "settings.set" => {
            let key = param_str(params, "key").ok_or("missing key")?;
            let value = params.get("value").cloned().ok_or("missing value")?;
            let mut a = lock(app)?;
            a.settings_engine
                .set_value(key, value)
                .map_err(|e| e.to_string())?;
            a.apply_settings().map_err(|e| e.to_string())?;
            Ok(json!({"ok": true}))
        }

        _ => Err(format!("unknown method: {}", method)),
    }
}
