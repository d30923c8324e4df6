use thiserror::Error;

#[derive(Debug, Error)]
pub enum EventsError {
    #[error("event handler {handler} failed: {message}")]
    Handler { handler: String, message: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type EventsResult<T> = Result<T, EventsError>;
