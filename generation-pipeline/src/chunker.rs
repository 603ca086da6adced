//! Boundary-aware text splitter.
//!
//! Splits a text into overlapping chunks addressed by character offsets.
//! Cuts prefer the nearest sentence terminator below the size limit so
//! chunks rarely end mid-sentence; the raw size cut is the fallback.
//! Offsets are character positions into the original text, half-open
//! `[start, end)`, so a chunk sequence can be re-derived or validated
//! against the source at any time.

use common::{
    error::AppError,
    utils::config::{AppConfig, DEFAULT_MAX_TEXT_BYTES},
};

/// Characters treated as sentence boundaries, covering both ASCII and
/// full-width CJK punctuation.
pub const SENTENCE_TERMINATORS: [char; 7] = ['.', '。', '!', '！', '?', '？', '\n'];

/// Extra iterations tolerated beyond the ideal `len / step` count before
/// the splitter assumes it is stuck and bails out.
const ITERATION_SAFETY_MARGIN: usize = 1_024;

#[derive(Debug, Clone)]
pub struct ChunkingConfig {
    /// Maximum chunk length in characters.
    pub max_chunk_size: usize,
    /// Characters shared between consecutive chunks. Must be smaller than
    /// `max_chunk_size`.
    pub overlap: usize,
    /// Inputs larger than this many bytes are rejected outright.
    pub max_text_bytes: usize,
}

impl Default for ChunkingConfig {
    fn default() -> Self {
        Self {
            max_chunk_size: 1_000,
            overlap: 100,
            max_text_bytes: DEFAULT_MAX_TEXT_BYTES,
        }
    }
}

impl ChunkingConfig {
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            max_chunk_size: config.max_chunk_size,
            overlap: config.chunk_overlap,
            max_text_bytes: config.max_text_bytes,
        }
    }
}

/// One produced chunk: the content slice plus its character offsets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChunkSpan {
    pub content: String,
    pub start_index: usize,
    pub end_index: usize,
    pub length: usize,
}

/// Splits `text` into an ordered, overlapping chunk sequence.
///
/// Deterministic and side-effect free: identical input and configuration
/// always produce identical output. Returns an empty sequence for empty
/// input.
pub fn split_text(text: &str, cfg: &ChunkingConfig) -> Result<Vec<ChunkSpan>, AppError> {
    if cfg.max_chunk_size == 0 {
        return Err(AppError::Validation(
            "max_chunk_size must be greater than zero".into(),
        ));
    }
    if cfg.overlap >= cfg.max_chunk_size {
        return Err(AppError::Validation(format!(
            "overlap of {} must be smaller than max_chunk_size of {}",
            cfg.overlap, cfg.max_chunk_size
        )));
    }
    if text.len() > cfg.max_text_bytes {
        return Err(AppError::SizeExceeded {
            size: text.len(),
            max: cfg.max_text_bytes,
        });
    }
    if text.is_empty() {
        return Ok(Vec::new());
    }

    // Character-indexed view: byte offset of every char, so spans can be
    // sliced without re-walking the string per chunk.
    let indexed: Vec<(usize, char)> = text.char_indices().collect();
    let total = indexed.len();
    let byte_at = |pos: usize| -> usize {
        if pos == total {
            text.len()
        } else {
            indexed[pos].0
        }
    };

    let step = cfg.max_chunk_size - cfg.overlap;
    let max_iterations = total / step.max(1) + ITERATION_SAFETY_MARGIN;

    let mut spans = Vec::new();
    let mut start = 0usize;
    let mut iterations = 0usize;

    while start < total {
        iterations += 1;
        if iterations > max_iterations {
            return Err(AppError::Validation(format!(
                "chunking exceeded the iteration budget of {max_iterations} for {total} characters"
            )));
        }

        let candidate = (start + cfg.max_chunk_size).min(total);
        let mut end = candidate;
        if candidate < total {
            // Walk back toward `start` looking for a sentence boundary;
            // keep the raw cut if none exists inside the window.
            let mut cut = candidate;
            while cut > start && !SENTENCE_TERMINATORS.contains(&indexed[cut].1) {
                cut -= 1;
            }
            if cut > start {
                end = cut;
            }
        }

        spans.push(ChunkSpan {
            content: text[byte_at(start)..byte_at(end)].to_string(),
            start_index: start,
            end_index: end,
            length: end - start,
        });

        if end == total {
            break;
        }
        // The `+ 1` floor guarantees forward progress even when the
        // overlap swallows the whole chunk.
        start = end.saturating_sub(cfg.overlap).max(start + 1);
    }

    Ok(spans)
}
