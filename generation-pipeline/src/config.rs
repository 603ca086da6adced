//! Runtime tuning for model calls.

/// Knobs for outbound generation requests that are deployment concerns
/// rather than stored settings.
#[derive(Debug, Clone)]
pub struct GenerationTuning {
    /// Hard deadline for a single model call, in seconds.
    pub request_timeout_secs: u64,
}

impl Default for GenerationTuning {
    fn default() -> Self {
        Self {
            request_timeout_secs: 60,
        }
    }
}
