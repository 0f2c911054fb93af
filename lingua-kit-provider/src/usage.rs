use serde::{Deserialize, Serialize};

/// Token accounting for a provider call.
///
/// Backends that report usage fill in real counts; backends that do not
/// (most dedicated MT APIs) return an estimate so cost aggregation still
/// works.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct TokenUsage {
    /// The number of input (prompt) tokens used.
    #[serde(default)]
    pub input_tokens: u64,

    /// The number of output (completion) tokens used.
    #[serde(default)]
    pub output_tokens: u64,
}

impl TokenUsage {
    pub fn new(input_tokens: u64, output_tokens: u64) -> Self {
        Self {
            input_tokens,
            output_tokens,
        }
    }

    /// Estimate for backends that do not expose usage: 0.3 tokens per
    /// character on both sides.
    pub fn estimated_from_chars(input_chars: usize, output_chars: usize) -> Self {
        Self {
            input_tokens: (input_chars as f64 * 0.3) as u64,
            output_tokens: (output_chars as f64 * 0.3) as u64,
        }
    }

    pub fn total(&self) -> u64 {
        self.input_tokens + self.output_tokens
    }

    /// Accumulates another call's usage into this one.
    pub fn add(&mut self, other: TokenUsage) {
        self.input_tokens += other.input_tokens;
        self.output_tokens += other.output_tokens;
    }
}
