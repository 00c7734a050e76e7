//! Catalog Client for Readshelf.
//!
//! Thin async wrapper over the library backend's REST API: listing, lookup,
//! field searches, view counting, document/cover URLs and the write side
//! (create, update, delete, PDF upload). All requests go to `{base_url}/api`.

use std::time::Duration;

use reqwest::multipart::{Form, Part};
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::services::categories::{author_label, category_label};
use crate::types::book::{Book, BookInput, BookUpload};
use crate::types::errors::CatalogError;
use crate::types::settings::ReaderSettings;

/// How the search page narrows the catalog. Precedence: keyword, then
/// category, then author; with none set the whole catalog is listed.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchQuery {
    pub keyword: Option<String>,
    /// Category slug or label.
    pub category: Option<String>,
    /// Author slug or label.
    pub author: Option<String>,
}

/// Rewrites a path-shaped `NotFound` into one naming the book id.
fn not_found_as(id: i64) -> impl FnOnce(CatalogError) -> CatalogError {
    move |e| match e {
        CatalogError::NotFound(_) => CatalogError::NotFound(id.to_string()),
        other => other,
    }
}

impl SearchQuery {
    fn non_empty(value: &Option<String>) -> Option<&str> {
        value.as_deref().map(str::trim).filter(|v| !v.is_empty())
    }
}

/// REST client for the book catalog. Cheap to clone.
#[derive(Debug, Clone)]
pub struct CatalogClient {
    http: Client,
    base_url: String,
}

impl CatalogClient {
    /// Creates a client for `base_url` (the backend origin, without `/api`).
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, CatalogError> {
        let http = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| CatalogError::NetworkError(e.to_string()))?;
        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn from_settings(settings: &ReaderSettings) -> Result<Self, CatalogError> {
        Self::new(
            &settings.api_base_url,
            Duration::from_secs(settings.request_timeout_secs),
        )
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/api{}", self.base_url, path)
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, &str)],
    ) -> Result<T, CatalogError> {
        let url = self.endpoint(path);
        debug!(%url, "catalog GET");
        self.send_json(self.http.get(&url).query(query), path).await
    }

    async fn send(&self, request: RequestBuilder, path: &str) -> Result<Response, CatalogError> {
        let response = request
            .send()
            .await
            .map_err(|e| CatalogError::NetworkError(e.to_string()))?;
        Self::ensure_success(response, path)
    }

    async fn send_json<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
        path: &str,
    ) -> Result<T, CatalogError> {
        self.send(request, path)
            .await?
            .json::<T>()
            .await
            .map_err(|e| CatalogError::ParseError(e.to_string()))
    }

    fn ensure_success(response: Response, path: &str) -> Result<Response, CatalogError> {
        match response.status() {
            StatusCode::NOT_FOUND => Err(CatalogError::NotFound(path.to_string())),
            status if !status.is_success() => Err(CatalogError::HttpStatus(status.as_u16())),
            _ => Ok(response),
        }
    }

    /// All books in catalog order.
    pub async fn list_books(&self) -> Result<Vec<Book>, CatalogError> {
        self.get_json("/books", &[]).await
    }

    /// One book's detail.
    pub async fn get_book(&self, id: i64) -> Result<Book, CatalogError> {
        self.get_json(&format!("/books/{}", id), &[])
            .await
            .map_err(not_found_as(id))
    }

    pub async fn search_by_name(&self, name: &str) -> Result<Vec<Book>, CatalogError> {
        self.get_json("/books/search/name", &[("name", name)]).await
    }

    pub async fn search_by_author(&self, author: &str) -> Result<Vec<Book>, CatalogError> {
        self.get_json("/books/search/author", &[("author", author)]).await
    }

    pub async fn search_by_category(&self, category: &str) -> Result<Vec<Book>, CatalogError> {
        self.get_json("/books/search/category", &[("category", category)])
            .await
    }

    /// Matches name or author.
    pub async fn search_by_keyword(&self, keyword: &str) -> Result<Vec<Book>, CatalogError> {
        self.get_json("/books/search", &[("keyword", keyword)]).await
    }

    /// Runs the search the query selects; slugs are translated to labels.
    pub async fn search(&self, query: &SearchQuery) -> Result<Vec<Book>, CatalogError> {
        if let Some(keyword) = SearchQuery::non_empty(&query.keyword) {
            self.search_by_keyword(keyword).await
        } else if let Some(category) = SearchQuery::non_empty(&query.category) {
            self.search_by_category(category_label(category)).await
        } else if let Some(author) = SearchQuery::non_empty(&query.author) {
            self.search_by_author(author_label(author)).await
        } else {
            self.list_books().await
        }
    }

    /// Bumps the view counter and returns the updated book.
    pub async fn increment_views(&self, id: i64) -> Result<Book, CatalogError> {
        let path = format!("/books/{}/view", id);
        self.send_json(self.http.post(self.endpoint(&path)), &path)
            .await
            .map_err(not_found_as(id))
    }

    /// Downloads the book's document for in-place rendering.
    pub async fn fetch_pdf(&self, id: i64) -> Result<Vec<u8>, CatalogError> {
        let path = format!("/books/{}/pdf", id);
        let response = self
            .send(self.http.get(self.endpoint(&path)), &path)
            .await
            .map_err(not_found_as(id))?;
        let bytes = response
            .bytes()
            .await
            .map_err(|e| CatalogError::NetworkError(e.to_string()))?;
        Ok(bytes.to_vec())
    }

    /// Adds a catalog record without a document.
    pub async fn create_book(&self, book: &BookInput) -> Result<Book, CatalogError> {
        self.send_json(self.http.post(self.endpoint("/books")).json(book), "/books")
            .await
    }

    /// Replaces a record's fields and returns the stored book.
    pub async fn update_book(&self, id: i64, book: &BookInput) -> Result<Book, CatalogError> {
        let path = format!("/books/{}", id);
        self.send_json(self.http.put(self.endpoint(&path)).json(book), &path)
            .await
            .map_err(not_found_as(id))
    }

    pub async fn delete_book(&self, id: i64) -> Result<(), CatalogError> {
        let path = format!("/books/{}", id);
        self.send(self.http.delete(self.endpoint(&path)), &path)
            .await
            .map_err(not_found_as(id))?;
        debug!(id, "deleted book");
        Ok(())
    }

    /// Uploads a PDF with its metadata as `multipart/form-data`; the backend
    /// stores the file, renders a cover and returns the new record.
    pub async fn upload_book(&self, upload: &BookUpload) -> Result<Book, CatalogError> {
        upload.validate()?;

        let file = Part::bytes(upload.pdf.clone())
            .file_name(upload.file_name.clone())
            .mime_str("application/pdf")
            .map_err(|e| CatalogError::InvalidInput(e.to_string()))?;
        let form = Form::new()
            .part("pdfFile", file)
            .text("name", upload.name.trim().to_string())
            .text("author", upload.author.trim().to_string())
            .text("category", upload.category_field());

        let path = "/books/upload";
        debug!(name = %upload.name, bytes = upload.pdf.len(), "uploading book");
        self.send_json(self.http.post(self.endpoint(path)).multipart(form), path)
            .await
    }

    /// Cover URL, or `None` when the UI should show its placeholder.
    pub fn thumbnail_url(&self, book: &Book) -> Option<String> {
        book.has_cover()
            .then(|| self.endpoint(&format!("/thumbnails/book_{}.jpg", book.id)))
    }

    pub fn pdf_url(&self, id: i64) -> String {
        self.endpoint(&format!("/books/{}/pdf", id))
    }
}
