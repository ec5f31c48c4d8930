use crate::engine::error::CodecError;
use crate::engine::huffman::CodeTable;
use crate::utils::bits::BitString;

/// Concatenate the code of every symbol of `text`, in order.
pub fn encode(text: &str, table: &CodeTable) -> Result<BitString, CodecError> {
    let mut bits = BitString::with_capacity(text.len());

    for (position, symbol) in text.chars().enumerate() {
        let code = table
            .get(symbol)
            .ok_or(CodecError::MissingCode { symbol, position })?;
        bits.extend(code);
    }

    Ok(bits)
}
