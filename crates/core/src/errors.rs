use thiserror::Error;

#[derive(Error, Debug)]
pub enum ScheduleError {
    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Request in flight: {0}")]
    Busy(String),

    #[error("Sync error: {0}")]
    Sync(#[from] eyre::Report),

    #[error("Internal error: {0}")]
    Internal(#[from] Box<dyn std::error::Error + Send + Sync>),
}

impl ScheduleError {
    pub(crate) fn validation(msg: impl Into<String>) -> Self {
        ScheduleError::Validation(msg.into())
    }
}

pub type ScheduleResult<T> = Result<T, ScheduleError>;
