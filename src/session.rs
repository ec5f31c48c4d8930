use anyhow::{bail, Context, Result};
use serde::Serialize;
use tracing::{debug, info};

use crate::engine::config::EngineConfig;
use crate::engine::huffman::{CodeTable, HuffmanTree};
use crate::engine::symbols::FrequencyTable;
use crate::engine::{decode, encode};
use crate::metrics::CodingStats;
use crate::proof::RoundTripProof;
use crate::utils::bits::BitString;

/// Everything derived from one input text before encoding.
#[derive(Debug)]
pub struct CodeBook {
    pub frequencies: FrequencyTable,
    pub tree: Option<HuffmanTree>,
    pub codes: CodeTable,
}

#[derive(Debug, Serialize)]
pub struct SessionReport {
    pub input: String,
    pub codes: CodeTable,
    pub encoded: BitString,
    pub decoded: String,
    pub prefix_free: bool,
    pub stats: CodingStats,
    pub proof: RoundTripProof,
    #[serde(skip)]
    pub tree: Option<HuffmanTree>,
}

/// Runs count, build, encode and decode in a single pass.
pub struct CodingSession {
    config: EngineConfig,
}

impl CodingSession {
    pub fn new(config: EngineConfig) -> Self {
        Self { config }
    }

    pub fn prepare(&self, text: &str) -> CodeBook {
        let frequencies = FrequencyTable::count(text);
        let tree = HuffmanTree::build(&frequencies, self.config.tie_break);
        let codes = CodeTable::from_tree(tree.as_ref());
        debug!(
            distinct = frequencies.len(),
            codes = codes.len(),
            tie_break = ?self.config.tie_break,
            "code table ready"
        );
        CodeBook { frequencies, tree, codes }
    }

    pub fn run(&self, text: &str) -> Result<SessionReport> {
        let book = self.prepare(text);
        if book.codes.is_empty() {
            debug!("empty input, nothing to encode");
        }

        let encoded = encode(text, &book.codes).context("encoding input")?;
        let decoded = decode(&encoded, book.tree.as_ref(), self.config.trailing_bits)
            .context("decoding encoded digits")?;

        let proof = RoundTripProof::verify(text, &decoded);
        if !proof.lossless {
            bail!(
                "round trip mismatch: input crc32 {:08x}, decoded crc32 {:08x}",
                proof.input_crc32,
                proof.decoded_crc32
            );
        }

        let prefix_free = book.codes.is_prefix_free();
        let stats = CodingStats::collect(text, &book.frequencies, &book.codes);
        info!(
            symbols = stats.total_symbols,
            bits = stats.encoded_bits,
            "round trip verified"
        );

        Ok(SessionReport {
            input: text.to_string(),
            codes: book.codes,
            encoded,
            decoded,
            prefix_free,
            stats,
            proof,
            tree: book.tree,
        })
    }

    /// Decode `digits` against the tree built from `reference`.
    pub fn decode_with(&self, reference: &str, digits: &str) -> Result<String> {
        let bits: BitString = digits.parse().context("parsing encoded digits")?;
        let book = self.prepare(reference);
        let decoded = decode(&bits, book.tree.as_ref(), self.config.trailing_bits)
            .context("decoding against reference text")?;
        Ok(decoded)
    }
}
