use async_trait::async_trait;

use crate::application::ports::{FileLoader, FileLoaderError};
use crate::domain::{InputKind, StagedFile};

/// Stands in for formats with no real extractor yet (image OCR, PDF and
/// office documents). Produces a short description of the upload so the
/// job still flows through the AI stage.
pub struct PlaceholderAdapter;

#[async_trait]
impl FileLoader for PlaceholderAdapter {
    async fn extract_text(
        &self,
        _data: &[u8],
        file: &StagedFile,
    ) -> Result<String, FileLoaderError> {
        let label = match file.kind {
            InputKind::Image => "Image",
            InputKind::Document => "Document",
            InputKind::Text => {
                return Err(FileLoaderError::UnsupportedKind(
                    "text input has no file to extract".to_string(),
                ));
            }
        };

        Ok(format!("{} content from file: {}", label, file.filename))
    }
}
