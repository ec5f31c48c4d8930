use tracing::warn;

use crate::engine::config::TrailingBits;
use crate::engine::error::CodecError;
use crate::engine::huffman::{HuffmanNode, HuffmanTree};
use crate::utils::bits::{Bit, BitString};

/// Walk `tree` digit by digit, emitting a symbol at every leaf.
pub fn decode(
    bits: &BitString,
    tree: Option<&HuffmanTree>,
    trailing: TrailingBits,
) -> Result<String, CodecError> {
    if bits.is_empty() {
        return Ok(String::new());
    }

    let Some(tree) = tree else {
        return Err(CodecError::NoChild { position: 0 });
    };
    let root = tree.root();

    // Lone leaf: its only code is a single zero.
    if let HuffmanNode::Leaf { symbol, .. } = root {
        return bits
            .iter()
            .enumerate()
            .map(|(position, bit)| match bit {
                Bit::Zero => Ok(*symbol),
                Bit::One => Err(CodecError::NoChild { position }),
            })
            .collect();
    }

    let mut out = String::with_capacity(bits.len() / 2);
    let mut current = root;
    let mut pending = 0usize;

    for (position, bit) in bits.iter().enumerate() {
        current = current
            .child(bit)
            .ok_or(CodecError::NoChild { position })?;
        pending += 1;

        if let Some(symbol) = current.symbol() {
            out.push(symbol);
            current = root;
            pending = 0;
        }
    }

    if pending > 0 {
        match trailing {
            TrailingBits::Reject => return Err(CodecError::IncompleteCode { trailing: pending }),
            TrailingBits::Drop => warn!(trailing = pending, "dropping incomplete trailing code"),
        }
    }

    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::compressor::encode;
    use crate::engine::config::TieBreak;
    use crate::engine::huffman::CodeTable;
    use crate::engine::symbols::FrequencyTable;

    fn tree_for(text: &str) -> Option<HuffmanTree> {
        HuffmanTree::build(&FrequencyTable::count(text), TieBreak::Symbol)
    }

    fn round_trip(text: &str, tie_break: TieBreak) -> String {
        let tree = HuffmanTree::build(&FrequencyTable::count(text), tie_break);
        let table = CodeTable::from_tree(tree.as_ref());
        let bits = encode(text, &table).unwrap();
        decode(&bits, tree.as_ref(), TrailingBits::Reject).unwrap()
    }

    #[test]
    fn round_trips_assorted_texts() {
        let texts = [
            "",
            "a",
            "aaaa",
            "ab",
            "abracadabra",
            "hello, world",
            "  leading and trailing  ",
            "Съешь же ещё этих мягких французских булок",
            "emoji 🦀🦀 mixed in",
        ];
        for text in texts {
            for tie_break in [TieBreak::Symbol, TieBreak::Insertion] {
                assert_eq!(round_trip(text, tie_break), text);
            }
        }
    }

    #[test]
    fn empty_bits_without_tree_decode_to_empty() {
        let decoded = decode(&BitString::new(), None, TrailingBits::Reject).unwrap();
        assert_eq!(decoded, "");
    }

    #[test]
    fn bits_without_tree_are_malformed() {
        let bits: BitString = "01".parse().unwrap();
        let err = decode(&bits, None, TrailingBits::Reject).unwrap_err();
        assert_eq!(err, CodecError::NoChild { position: 0 });
    }

    #[test]
    fn single_leaf_tree_decodes_each_zero() {
        let tree = tree_for("aaaa");
        let bits: BitString = "0000".parse().unwrap();
        assert_eq!(decode(&bits, tree.as_ref(), TrailingBits::Reject).unwrap(), "aaaa");
    }

    #[test]
    fn single_leaf_tree_rejects_one_digit() {
        let tree = tree_for("aaaa");
        let bits: BitString = "001".parse().unwrap();
        let err = decode(&bits, tree.as_ref(), TrailingBits::Reject).unwrap_err();
        assert_eq!(err, CodecError::NoChild { position: 2 });
    }

    #[test]
    fn trailing_partial_code_is_rejected() {
        let tree = tree_for("aaabc");
        let bits: BitString = "1000".parse().unwrap();
        let err = decode(&bits, tree.as_ref(), TrailingBits::Reject).unwrap_err();
        assert_eq!(err, CodecError::IncompleteCode { trailing: 1 });
    }

    #[test]
    fn trailing_partial_code_can_be_dropped() {
        let tree = tree_for("aaabc");
        let bits: BitString = "1000".parse().unwrap();
        assert_eq!(decode(&bits, tree.as_ref(), TrailingBits::Drop).unwrap(), "ab");
    }

    #[test]
    fn decodes_against_known_codes() {
        let tree = tree_for("aaabc");
        let table = CodeTable::from_tree(tree.as_ref());
        assert_eq!(table.get('a').unwrap().to_string(), "1");
        assert_eq!(table.get('b').unwrap().to_string(), "00");
        assert_eq!(table.get('c').unwrap().to_string(), "01");

        let bits: BitString = "0110011".parse().unwrap();
        assert_eq!(decode(&bits, tree.as_ref(), TrailingBits::Reject).unwrap(), "cabaa");
    }
}
