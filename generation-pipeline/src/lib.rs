#![allow(clippy::missing_docs_in_private_items)]

pub mod answer_generation;
pub mod chunker;
pub mod config;
pub mod ingest;
pub mod parser;
pub mod prompts;
pub mod question_generation;
pub mod services;

pub use answer_generation::AnswerGenerator;
pub use chunker::{split_text, ChunkSpan, ChunkingConfig};
pub use config::GenerationTuning;
pub use ingest::ingest_text;
pub use parser::{extract_string_array, ParseError};
pub use prompts::GenerationRequest;
pub use question_generation::{GenerationOutcome, QuestionGenerator};
pub use services::{GenerationService, OpenAiGenerationService};
