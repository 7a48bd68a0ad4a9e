use async_trait::async_trait;

use crate::application::ports::{FileLoader, FileLoaderError};
use crate::domain::StagedFile;

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// Reads `.txt` documents as UTF-8.
pub struct PlainTextAdapter;

#[async_trait]
impl FileLoader for PlainTextAdapter {
    async fn extract_text(
        &self,
        data: &[u8],
        file: &StagedFile,
    ) -> Result<String, FileLoaderError> {
        if file.extension().as_deref() != Some("txt") {
            return Err(FileLoaderError::UnsupportedKind(format!(
                "{} is not a plain-text file",
                file.filename
            )));
        }

        let data = data.strip_prefix(UTF8_BOM).unwrap_or(data);
        String::from_utf8(data.to_vec()).map_err(|e| {
            FileLoaderError::ExtractionFailed(format!("failed to read text file: {}", e))
        })
    }
}
