pub mod config;
pub mod error;
pub mod symbols;
pub mod huffman;
pub mod compressor;
pub mod decompressor;

pub use compressor::*;
pub use decompressor::*;
