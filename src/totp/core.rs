//! Core OTP generation — RFC 4226 (HOTP) and RFC 6238 (TOTP).
//!
//! HMAC-SHA1 over the big-endian counter, dynamic truncation per
//! RFC 4226 §5.3, plus the time-step arithmetic the refresh loop is built
//! on. Everything here is a pure function of its arguments.

use hmac::{Hmac, Mac};
use sha1::Sha1;

use crate::totp::types::OtpError;

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  HOTP (RFC 4226)
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Compute an HOTP code for raw key bytes and a counter.
///
/// `digits` must be 6 or 8 (the parser only ever produces those). An empty
/// key is degenerate but legal: HMAC accepts it and a well-defined code
/// comes out. The only error is the HMAC primitive itself rejecting the
/// key, which indicates an environment defect rather than bad input.
pub fn hotp(secret: &[u8], counter: u64, digits: u8) -> Result<String, OtpError> {
    let mut mac = Hmac::<Sha1>::new_from_slice(secret).map_err(|_| OtpError::CryptoUnavailable)?;
    // RFC 4226 message: the counter as an 8-byte big-endian unsigned integer.
    mac.update(&counter.to_be_bytes());
    let digest = mac.finalize().into_bytes();

    // Dynamic truncation (RFC 4226 §5.3): the low nibble of the last digest
    // byte picks the offset; four bytes from there form a 31-bit value.
    let offset = (digest[19] & 0x0f) as usize;
    let binary = u32::from_be_bytes([
        digest[offset] & 0x7f,
        digest[offset + 1],
        digest[offset + 2],
        digest[offset + 3],
    ]);

    let code = binary % 10u32.pow(digits as u32);
    Ok(format!("{code:0>width$}", width = digits as usize))
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  TOTP (RFC 6238)
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Generate a TOTP code at an explicit unix timestamp.
pub fn totp_at(
    secret: &[u8],
    period: u32,
    digits: u8,
    unix_seconds: u64,
) -> Result<String, OtpError> {
    hotp(secret, time_step_at(unix_seconds, period), digits)
}

/// Time-step counter for a given unix timestamp.
pub fn time_step_at(unix_seconds: u64, period: u32) -> u64 {
    unix_seconds / period as u64
}

/// Seconds remaining in the time-step containing `unix_seconds`.
pub fn seconds_remaining_at(unix_seconds: u64, period: u32) -> u32 {
    let p = period as u64;
    (p - (unix_seconds % p)) as u32
}

/// Fraction of the current time-step already elapsed, in `[0, 1)`.
pub fn progress_at(unix_seconds: u64, period: u32) -> f64 {
    (unix_seconds % period as u64) as f64 / period as f64
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  Display helpers
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// The all-zero code shown while no secret is available.
pub fn placeholder_code(digits: u8) -> String {
    "0".repeat(digits as usize)
}

/// Split a code in half for display (e.g. "123 456").
pub fn display_grouped(code: &str) -> String {
    if code.len() <= 4 {
        return code.to_string();
    }
    let mid = code.len() / 2;
    format!("{} {}", &code[..mid], &code[mid..])
}
