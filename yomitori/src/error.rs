use thiserror::Error;

#[derive(Error, Debug)]
pub enum YomitoriError {
    #[error("Empty selection: the selected region has no area")]
    EmptySelection,

    #[error("Decode error: {0}")]
    Decode(String),

    #[error("Encode error: {0}")]
    Encode(String),

    #[error("OCR backend error ({status}): {body}")]
    Backend { status: u16, body: String },

    #[error("OCR backend returned no text")]
    EmptyResult,

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("A submission is already in flight")]
    SubmissionInFlight,

    #[error("Upload rejected: {0}")]
    Upload(String),

    #[error("Word store error: {0}")]
    Store(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, YomitoriError>;
