//! Length-prefix frame codec.
//!
//! Every message on the wire, in both directions, is framed as:
//! `[ 4 bytes big-endian u32 payload length ][ length bytes payload ]`.
//! No magic number, no version byte, no checksum; TLS wraps the whole
//! stream below this framing.

/// Size of the length prefix in bytes.
pub const LEN_PREFIX_SIZE: usize = 4;

/// Default ceiling on a single frame's payload size (16 MiB).
///
/// A hostile length prefix would otherwise drive a multi-gigabyte
/// allocation before the first payload byte arrives.
pub const DEFAULT_MAX_FRAME_LEN: u32 = 16 * 1024 * 1024;

/// Encode a payload length as 4 big-endian bytes, most significant first.
pub fn encode_len(len: u32) -> [u8; LEN_PREFIX_SIZE] {
    len.to_be_bytes()
}

/// Decode a 4-byte big-endian length prefix. Exact inverse of
/// [`encode_len`] for every `u32` value.
pub fn decode_len(header: [u8; LEN_PREFIX_SIZE]) -> u32 {
    u32::from_be_bytes(header)
}
