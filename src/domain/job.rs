use chrono::{DateTime, Utc};

use super::{InputKind, JobId, JobStatus, ProcessingResult, StagedFile};

#[derive(Debug, Clone, PartialEq)]
pub enum JobInput {
    Text(String),
    File(StagedFile),
}

impl JobInput {
    pub fn kind(&self) -> InputKind {
        match self {
            JobInput::Text(_) => InputKind::Text,
            JobInput::File(file) => file.kind,
        }
    }

    pub fn staged_file(&self) -> Option<&StagedFile> {
        match self {
            JobInput::File(file) => Some(file),
            JobInput::Text(_) => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Job {
    pub id: JobId,
    pub client_id: String,
    pub kind: InputKind,
    pub input: JobInput,
    pub status: JobStatus,
    pub result: Option<ProcessingResult>,
    pub error_message: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Job {
    pub fn new(client_id: String, input: JobInput) -> Self {
        let now = Utc::now();
        Self {
            id: JobId::new(),
            client_id,
            kind: input.kind(),
            input,
            status: JobStatus::Pending,
            result: None,
            error_message: None,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn is_terminal(&self) -> bool {
        self.status.is_terminal()
    }
}
