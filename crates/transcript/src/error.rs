use thiserror::Error;

pub type Result<T> = std::result::Result<T, TranscriptError>;

#[derive(Error, Debug)]
pub enum TranscriptError {
    #[error("record {0} is not a JSON object")]
    NotAnObject(usize),

    #[error("record {0}: conversation turns must be an array")]
    TurnsNotArray(usize),
}
