use super::{InputKind, StoragePath};

/// An uploaded file that has been written to the staging store and is
/// waiting for the pipeline.
#[derive(Debug, Clone, PartialEq)]
pub struct StagedFile {
    pub path: StoragePath,
    pub filename: String,
    pub kind: InputKind,
    pub size_bytes: u64,
}

impl StagedFile {
    pub fn new(path: StoragePath, filename: String, kind: InputKind, size_bytes: u64) -> Self {
        Self {
            path,
            filename,
            kind,
            size_bytes,
        }
    }

    pub fn extension(&self) -> Option<String> {
        super::extension_of(&self.filename)
    }
}
