use thiserror::Error;

pub type CompileResult<T> = Result<T, CompileError>;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum CompileError {
    #[error("Invalid data for block '{id}' of kind '{kind}': {reason}")]
    InvalidBlockData {
        id: String,
        kind: String,
        reason: String,
    },

    #[error("Invalid template data while compiling block '{id}' of kind '{kind}': {reason}")]
    InvalidTemplateData {
        id: String,
        kind: String,
        reason: String,
    },

    #[error("Template error in block '{id}' of kind '{kind}': {reason}")]
    TemplateRender {
        id: String,
        kind: String,
        reason: String,
    },

    #[error("Invalid compile request: {0}")]
    InvalidRequest(String),

    #[error("Deserialization error: {0}")]
    DeserializationError(String),
}

impl CompileError {
    /// Identifier of the block that caused the error, if any
    pub fn block_id(&self) -> Option<&str> {
        match self {
            CompileError::InvalidBlockData { id, .. }
            | CompileError::InvalidTemplateData { id, .. }
            | CompileError::TemplateRender { id, .. } => Some(id),
            _ => None,
        }
    }

    /// Kind of the block that caused the error, if any
    pub fn block_kind(&self) -> Option<&str> {
        match self {
            CompileError::InvalidBlockData { kind, .. }
            | CompileError::InvalidTemplateData { kind, .. }
            | CompileError::TemplateRender { kind, .. } => Some(kind),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for CompileError {
    fn from(err: serde_json::Error) -> Self {
        CompileError::DeserializationError(err.to_string())
    }
}

impl From<serde_yaml::Error> for CompileError {
    fn from(err: serde_yaml::Error) -> Self {
        CompileError::DeserializationError(err.to_string())
    }
}
