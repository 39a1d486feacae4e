use std::path::PathBuf;

use thiserror::Error;
use workshop_core::DocumentFormat;
use workshop_logging::workshop_info;

use crate::client::WorkshopApi;
use crate::filename::deterministic_filename;
use crate::persist::{AtomicFileWriter, PersistError};
use crate::types::ApiError;

#[derive(Debug, Error)]
pub enum DownloadError {
    #[error("download failed: {0}")]
    Api(#[from] ApiError),
    #[error("document is empty")]
    Empty,
    #[error("could not save document: {0}")]
    Persist(#[from] PersistError),
}

/// Fetches the business plan for a session and stores it in `writer`'s directory.
pub async fn download_document(
    api: &dyn WorkshopApi,
    writer: &AtomicFileWriter,
    session_id: &str,
    title: Option<&str>,
    format: DocumentFormat,
) -> Result<PathBuf, DownloadError> {
    let document = api.download_document(session_id, format).await?;
    if document.bytes.is_empty() {
        return Err(DownloadError::Empty);
    }
    let filename = deterministic_filename(title, session_id, format.extension());
    let path = writer.write(&filename, &document.bytes)?;
    workshop_info!(
        "saved {} ({} bytes) to {}",
        format.extension(),
        document.bytes.len(),
        path.display()
    );
    Ok(path)
}
