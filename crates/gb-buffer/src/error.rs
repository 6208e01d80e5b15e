use thiserror::Error;

#[derive(Debug, Error)]
pub enum BufferError {
    #[error("unexpected end of buffer: needed {needed} bytes, {available} available")]
    UnexpectedEof { needed: usize, available: usize },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type BufferResult<T> = Result<T, BufferError>;
