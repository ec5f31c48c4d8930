pub mod bits;
pub mod crc;
