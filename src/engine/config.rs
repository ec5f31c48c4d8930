use serde::{Deserialize, Serialize};

/// How equal-weight nodes are ordered in the merge queue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum TieBreak {
    /// Lower smallest symbol in the subtree is merged first.
    Symbol,
    /// Earlier queue insertion is merged first.
    Insertion,
}

/// What the decoder does with digits left over after the last full code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum TrailingBits {
    Reject,
    Drop,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub tie_break: TieBreak,
    pub trailing_bits: TrailingBits,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            tie_break: TieBreak::Symbol,
            trailing_bits: TrailingBits::Reject,
        }
    }
}
