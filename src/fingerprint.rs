//! Default content fingerprinting for stack implementations and tests.

use crate::document::Fingerprint;

pub const FINGERPRINT_HEX_LEN: usize = 16;

pub fn fingerprint_bytes(bytes: &[u8]) -> Fingerprint {
    let full_hex = blake3::hash(bytes).to_hex().to_string();
    shorten_hex(&full_hex)
}

pub fn fingerprint_text(text: &str) -> Fingerprint {
    fingerprint_bytes(text.as_bytes())
}

pub fn shorten_hex(full_hex: &str) -> String {
    let prefix_len = FINGERPRINT_HEX_LEN.min(full_hex.len());
    full_hex[..prefix_len].to_string()
}
