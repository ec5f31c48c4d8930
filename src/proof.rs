use serde::Serialize;

use crate::utils::crc::crc32;

/// Evidence that decoding reproduced the input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RoundTripProof {
    pub input_crc32: u32,
    pub decoded_crc32: u32,
    pub lossless: bool,
}

impl RoundTripProof {
    pub fn verify(input: &str, decoded: &str) -> Self {
        Self {
            input_crc32: crc32(input),
            decoded_crc32: crc32(decoded),
            lossless: input == decoded,
        }
    }
}
