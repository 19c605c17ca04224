//! Shared fixtures for unit tests.

use std::{path::PathBuf, sync::Arc};

use axum::{
    body::{Body, to_bytes},
    http::{Method, Request, StatusCode, header},
};
use rust_xlsxwriter::Workbook;
use serde_json::Value;
use tower::ServiceExt;

use crate::{
    AppState, catalog::Catalog, config::Config, db, models::NewMovie, routes,
    spreadsheet::SheetRow,
};

pub async fn catalog() -> Catalog {
    let db = db::connect_and_migrate("sqlite::memory:").await.unwrap();
    Catalog::new(db)
}

pub async fn state() -> Arc<AppState> {
    let upload_dir = scratch_dir();
    let config = Config {
        addr: "127.0.0.1:0".parse().unwrap(),
        database_url: "sqlite::memory:".to_string(),
        upload_dir,
        cors_origin: "http://localhost:5173".to_string(),
        max_upload_bytes: 1024 * 1024,
    };
    Arc::new(AppState { config: Arc::new(config), catalog: catalog().await })
}

/// A fresh, empty directory under the system temp dir.
pub fn scratch_dir() -> PathBuf {
    let dir = std::env::temp_dir().join(format!("movie-catalog-{}", uuid::Uuid::new_v4()));
    std::fs::create_dir_all(&dir).unwrap();
    dir
}

pub fn new_movie(name: &str) -> NewMovie {
    NewMovie {
        movie_name: name.to_string(),
        description: format!("About {name}"),
        casting: "Someone".to_string(),
    }
}

pub fn sheet_row(
    row: usize,
    movie_name: Option<&str>,
    description: Option<&str>,
    casting: Option<&str>,
) -> SheetRow {
    SheetRow {
        row,
        movie_name: movie_name.map(str::to_string),
        description: description.map(str::to_string),
        casting: casting.map(str::to_string),
    }
}

/// Builds an `.xlsx` workbook with one sheet. Empty strings leave the cell blank.
pub fn workbook(rows: &[&[&str]]) -> Vec<u8> {
    let mut workbook = Workbook::new();
    {
        let sheet = workbook.add_worksheet();
        for (r, cells) in rows.iter().enumerate() {
            for (c, value) in cells.iter().enumerate() {
                if value.is_empty() {
                    continue;
                }
                sheet.write_string(r as u32, c as u16, *value).unwrap();
            }
        }
    }
    workbook.save_to_buffer().unwrap()
}

pub const BOUNDARY: &str = "movie-catalog-test-boundary";

/// Encodes a single-file `multipart/form-data` body.
pub fn multipart_body(field: &str, file_name: &str, contents: &[u8]) -> Vec<u8> {
    let mut body = Vec::new();
    body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
    body.extend_from_slice(
        format!("Content-Disposition: form-data; name=\"{field}\"; filename=\"{file_name}\"\r\n")
            .as_bytes(),
    );
    body.extend_from_slice(b"Content-Type: application/octet-stream\r\n\r\n");
    body.extend_from_slice(contents);
    body.extend_from_slice(format!("\r\n--{BOUNDARY}--\r\n").as_bytes());
    body
}

pub fn multipart_content_type() -> String {
    format!("multipart/form-data; boundary={BOUNDARY}")
}

pub fn dir_is_empty(dir: &std::path::Path) -> bool {
    std::fs::read_dir(dir).map(|mut entries| entries.next().is_none()).unwrap_or(true)
}

/// Runs one request through the full router and returns status and raw body.
pub async fn send(
    state: &Arc<AppState>,
    method: Method,
    uri: &str,
    content_type: Option<&str>,
    body: Vec<u8>,
) -> (StatusCode, Vec<u8>) {
    let response = send_raw(state, method, uri, content_type, body).await;
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, bytes.to_vec())
}

pub async fn send_raw(
    state: &Arc<AppState>,
    method: Method,
    uri: &str,
    content_type: Option<&str>,
    body: Vec<u8>,
) -> axum::response::Response {
    let mut request = Request::builder().method(method).uri(uri);
    if let Some(content_type) = content_type {
        request = request.header(header::CONTENT_TYPE, content_type);
    }
    routes::router(state.clone()).oneshot(request.body(Body::from(body)).unwrap()).await.unwrap()
}

pub async fn send_json(
    state: &Arc<AppState>,
    method: Method,
    uri: &str,
    json: Option<Value>,
) -> (StatusCode, Value) {
    let (status, bytes) = match json {
        Some(json) => {
            send(state, method, uri, Some("application/json"), serde_json::to_vec(&json).unwrap())
                .await
        },
        None => send(state, method, uri, None, Vec::new()).await,
    };
    (status, serde_json::from_slice(&bytes).unwrap_or(Value::Null))
}

pub async fn send_form(state: &Arc<AppState>, uri: &str, form: &str) -> axum::response::Response {
    send_raw(
        state,
        Method::POST,
        uri,
        Some("application/x-www-form-urlencoded"),
        form.as_bytes().to_vec(),
    )
    .await
}

pub async fn body_text(response: axum::response::Response) -> String {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}
