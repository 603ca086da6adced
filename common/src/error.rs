use async_openai::error::OpenAIError;
use thiserror::Error;
use tokio::task::JoinError;

// Core internal errors
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Database error: {0}")]
    Database(#[from] surrealdb::Error),
    #[error("OpenAI error: {0}")]
    OpenAI(#[from] OpenAIError),
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("Validation error: {0}")]
    Validation(String),
    #[error("Index out of range: {0}")]
    OutOfRange(String),
    #[error("Input exceeds size limit: {size} bytes (max {max})")]
    SizeExceeded { size: usize, max: usize },
    #[error("Generation error: {0}")]
    Generation(String),
    #[error("Inconsistent state: {0}")]
    InconsistentState(String),
    #[error("No questions could be generated: {0}")]
    NoQuestionsGenerated(String),
    #[error("Unsupported export format: {0}")]
    UnsupportedFormat(String),
    #[error("LLM parsing error: {0}")]
    LLMParsing(String),
    #[error("Task join error: {0}")]
    Join(#[from] JoinError),
    #[error("IoError: {0}")]
    Io(#[from] std::io::Error),
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("Anyhow error: {0}")]
    Anyhow(#[from] anyhow::Error),
}
