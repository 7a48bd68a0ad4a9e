use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;

use crate::application::ports::{FileLoader, FileLoaderError};
use crate::domain::{InputKind, StagedFile};

/// Dispatches to the loader registered for a file's extension, falling
/// back to the loader registered for its input kind.
pub struct CompositeFileLoader {
    by_kind: HashMap<InputKind, Arc<dyn FileLoader>>,
    by_extension: HashMap<String, Arc<dyn FileLoader>>,
}

impl CompositeFileLoader {
    pub fn new(adapters: Vec<(InputKind, Arc<dyn FileLoader>)>) -> Self {
        Self {
            by_kind: adapters.into_iter().collect(),
            by_extension: HashMap::new(),
        }
    }

    pub fn with_extension(mut self, extension: &str, adapter: Arc<dyn FileLoader>) -> Self {
        self.by_extension
            .insert(extension.trim_start_matches('.').to_ascii_lowercase(), adapter);
        self
    }

    fn resolve(&self, file: &StagedFile) -> Option<&Arc<dyn FileLoader>> {
        file.extension()
            .and_then(|ext| self.by_extension.get(&ext))
            .or_else(|| self.by_kind.get(&file.kind))
    }
}

#[async_trait]
impl FileLoader for CompositeFileLoader {
    async fn extract_text(
        &self,
        data: &[u8],
        file: &StagedFile,
    ) -> Result<String, FileLoaderError> {
        let adapter = self
            .resolve(file)
            .ok_or_else(|| FileLoaderError::UnsupportedKind(file.kind.as_str().to_string()))?;

        adapter.extract_text(data, file).await
    }
}
