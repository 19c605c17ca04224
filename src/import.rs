use std::path::{Path, PathBuf};

use anyhow::Context;
use axum::extract::{Multipart, multipart::MultipartRejection};
use tokio::{fs::File, io::AsyncWriteExt};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::{
    catalog::Catalog,
    error::{AppError, AppResult},
    spreadsheet,
};

pub const FILE_FIELD: &str = "file";
pub const NO_FILE_UPLOADED: &str = "No file uploaded";

/// An uploaded file written to the staging directory.
///
/// The file is removed when this value is dropped.
#[derive(Debug)]
pub struct StagedUpload {
    path: PathBuf,
}

impl StagedUpload {
    fn new(dir: &Path) -> Self {
        Self { path: dir.join(format!("{}.upload", Uuid::new_v4())) }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for StagedUpload {
    fn drop(&mut self) {
        match std::fs::remove_file(&self.path) {
            Ok(()) => debug!(path = %self.path.display(), "staged upload removed"),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {},
            Err(err) => {
                warn!(path = %self.path.display(), error = %err, "failed to remove staged upload")
            },
        }
    }
}

/// Streams the `file` field of a multipart request into `dir`.
///
/// Returns `None` when the request carries no such field.
pub async fn stage_upload(
    mut multipart: Multipart,
    dir: &Path,
) -> AppResult<Option<StagedUpload>> {
    while let Some(mut field) = multipart.next_field().await? {
        if field.name() != Some(FILE_FIELD) {
            continue;
        }

        let staged = StagedUpload::new(dir);
        let mut file = File::create(staged.path())
            .await
            .with_context(|| format!("creating {}", staged.path().display()))?;

        let mut written = 0usize;
        while let Some(chunk) = field.chunk().await? {
            file.write_all(&chunk).await?;
            written += chunk.len();
        }
        file.flush().await?;

        debug!(
            path = %staged.path().display(),
            file_name = field.file_name().unwrap_or_default(),
            bytes = written,
            "upload staged"
        );
        return Ok(Some(staged));
    }

    Ok(None)
}

/// Parses a staged workbook and inserts its rows. The staged file is gone
/// once this returns, whatever the outcome.
pub async fn import_upload(catalog: &Catalog, upload: StagedUpload) -> AppResult<usize> {
    let bytes = tokio::fs::read(upload.path())
        .await
        .with_context(|| format!("reading {}", upload.path().display()))?;
    let rows = tokio::task::spawn_blocking(move || spreadsheet::read_bytes(bytes))
        .await
        .context("spreadsheet reader panicked")??;

    debug!(rows = rows.len(), "spreadsheet parsed");
    let imported = catalog.import(rows).await?;
    info!(imported, "spreadsheet imported");

    drop(upload);
    Ok(imported)
}

/// Stages the uploaded file from a multipart request and imports it.
///
/// A request that is not `multipart/form-data` carries no file either.
pub async fn import_multipart(
    catalog: &Catalog,
    multipart: Result<Multipart, MultipartRejection>,
    dir: &Path,
) -> AppResult<usize> {
    let multipart = multipart.map_err(|rejection| {
        debug!(reason = %rejection.body_text(), "upload is not multipart");
        AppError::BadRequest(NO_FILE_UPLOADED.to_string())
    })?;
    let upload = stage_upload(multipart, dir)
        .await?
        .ok_or_else(|| AppError::BadRequest(NO_FILE_UPLOADED.to_string()))?;
    import_upload(catalog, upload).await
}
