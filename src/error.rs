use thiserror::Error;

#[derive(Error, Debug)]
pub enum MaintError {
    #[error("Command exited with status {0}")]
    CommandFailed(i32),

    #[error("Command not found: {0}")]
    CommandNotFound(String),

    #[error("Permission denied: {0}")]
    PermissionDenied(String),

    #[error("User cancelled")]
    UserCancelled,

    #[error("Interrupted by user")]
    Interrupted,

    #[error("Command timed out after {0}s")]
    TimedOut(u64),

    #[error("Unexpected error: {0}")]
    Unexpected(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Prompt error: {0}")]
    PromptError(String),

    #[error("Unknown tool: {0}")]
    UnknownTool(String),

    #[error("Invalid tool catalog: {0}")]
    InvalidCatalog(String),

    #[error("This operation must be run as root (try: sudo {0})")]
    NotRoot(String),
}

impl MaintError {
    /// 오케스트레이터가 전체 실행을 멈춰야 하는 에러인지 확인
    pub fn is_interrupt(&self) -> bool {
        matches!(self, MaintError::Interrupted)
    }
}

pub type Result<T> = std::result::Result<T, MaintError>;
