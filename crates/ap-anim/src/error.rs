use thiserror::Error;

#[derive(Debug, Error)]
pub enum AnimError {
    #[error("roster parse error: {0}")]
    Roster(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type AnimResult<T> = Result<T, AnimError>;
