//! Lenient base-32 handling (RFC 4648 alphabet `A–Z2–7`).
//!
//! OTP secrets are typed or pasted by hand, so decoding is deliberately
//! permissive: case-insensitive, `=` padding and whitespace tolerated, and
//! any character outside the alphabet silently skipped. This is a parser,
//! not a validator — it never fails.

/// Decode a base-32 string into bytes, skipping everything that is not a
/// valid alphabet character. An input with no valid characters (including
/// the empty string) decodes to an empty vector.
pub fn decode_lenient(input: &str) -> Vec<u8> {
    let cleaned: String = input
        .chars()
        .map(|c| c.to_ascii_uppercase())
        .filter(|c| matches!(c, 'A'..='Z' | '2'..='7'))
        .collect();
    // Only alphabet characters remain, so the decode itself cannot fail;
    // trailing bits short of a full byte are dropped.
    ::base32::decode(::base32::Alphabet::Rfc4648 { padding: false }, &cleaned).unwrap_or_default()
}

/// Encode raw bytes to base-32 (uppercase, no padding).
pub fn encode(bytes: &[u8]) -> String {
    ::base32::encode(::base32::Alphabet::Rfc4648 { padding: false }, bytes)
}
