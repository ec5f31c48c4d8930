use serde::Serialize;

use crate::engine::huffman::CodeTable;
use crate::engine::symbols::FrequencyTable;

/// Baseline cost of one uncompressed byte.
pub const BITS_PER_BYTE: usize = 8;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CodingStats {
    pub total_symbols: usize,
    pub distinct_symbols: usize,
    pub encoded_bits: usize,
    pub baseline_bits: usize,
    pub compression_ratio: f64,
    pub average_code_length: f64,
    pub entropy_bits: f64,
    pub max_code_length: usize,
}

impl CodingStats {
    pub fn collect(text: &str, frequencies: &FrequencyTable, codes: &CodeTable) -> Self {
        let total_symbols = frequencies.total();

        let encoded_bits = codes
            .iter()
            .map(|(symbol, code)| frequencies.get(symbol).unwrap_or(0) * code.len())
            .sum::<usize>();
        let baseline_bits = text.len() * BITS_PER_BYTE;

        let entropy_bits = if frequencies.is_empty() {
            0.0
        } else {
            let total = total_symbols as f64;
            frequencies
                .iter()
                .map(|(_, count)| {
                    let p = count as f64 / total;
                    -p * p.log2()
                })
                .sum::<f64>()
        };

        Self {
            total_symbols,
            distinct_symbols: frequencies.len(),
            encoded_bits,
            baseline_bits,
            compression_ratio: if baseline_bits > 0 {
                encoded_bits as f64 / baseline_bits as f64
            } else {
                0.0
            },
            average_code_length: if total_symbols > 0 {
                encoded_bits as f64 / total_symbols as f64
            } else {
                0.0
            },
            entropy_bits,
            max_code_length: codes.iter().map(|(_, c)| c.len()).max().unwrap_or(0),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::config::TieBreak;
    use crate::engine::huffman::HuffmanTree;

    fn stats_for(text: &str) -> CodingStats {
        let frequencies = FrequencyTable::count(text);
        let tree = HuffmanTree::build(&frequencies, TieBreak::Symbol);
        CodingStats::collect(text, &frequencies, &CodeTable::from_tree(tree.as_ref()))
    }

    #[test]
    fn abracadabra_stats() {
        let stats = stats_for("abracadabra");
        assert_eq!(stats.total_symbols, 11);
        assert_eq!(stats.distinct_symbols, 5);
        assert_eq!(stats.encoded_bits, 23);
        assert_eq!(stats.baseline_bits, 88);
        assert_eq!(stats.max_code_length, 4);
        assert!(stats.average_code_length >= stats.entropy_bits);
        assert!(stats.average_code_length < stats.entropy_bits + 1.0);
    }

    #[test]
    fn empty_text_is_all_zero() {
        let stats = stats_for("");
        assert_eq!(stats.total_symbols, 0);
        assert_eq!(stats.encoded_bits, 0);
        assert_eq!(stats.compression_ratio, 0.0);
        assert_eq!(stats.entropy_bits, 0.0);
    }

    #[test]
    fn single_symbol_costs_one_bit_each() {
        let stats = stats_for("aaaa");
        assert_eq!(stats.encoded_bits, 4);
        assert_eq!(stats.average_code_length, 1.0);
        assert_eq!(stats.entropy_bits, 0.0);
    }
}
