//! Core types for the TOTP credential-display engine.

use serde::{Deserialize, Serialize};

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  OTP parameters
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Default time-step length in seconds.
pub const DEFAULT_PERIOD: u32 = 30;

/// Default number of code digits.
pub const DEFAULT_DIGITS: u8 = 6;

/// Parameters derived from a raw secret string or an `otpauth://` URI.
///
/// `secret` is `None` when the input was empty (or the URI carried no
/// `secret` parameter); otherwise it holds the decoded key bytes, which may
/// legally be empty. `period` is always positive and `digits` is 6 or 8.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OtpParameters {
    /// Decoded secret key bytes.
    pub secret: Option<Vec<u8>>,
    /// Time-step length in seconds.
    pub period: u32,
    /// Number of digits in the generated code (6 or 8).
    pub digits: u8,
}

impl Default for OtpParameters {
    fn default() -> Self {
        Self {
            secret: None,
            period: DEFAULT_PERIOD,
            digits: DEFAULT_DIGITS,
        }
    }
}

impl OtpParameters {
    /// Create parameters for a decoded secret with default period/digits.
    pub fn from_secret(secret: Vec<u8>) -> Self {
        Self {
            secret: Some(secret),
            ..Self::default()
        }
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  Published display state
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// The current OTP code plus timing info, published once per second.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TotpState {
    /// The code string, exactly `digits` characters, zero-padded. All zeros
    /// while no secret is available.
    pub code: String,
    /// Seconds until the code rolls over.
    pub remaining_seconds: u32,
    /// Fraction of the current period elapsed, in `[0, 1)`. Drives the
    /// countdown ring.
    pub progress: f64,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  Error type
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Crate-level error.
///
/// Malformed credential input is never an error anywhere in this crate; it
/// degrades to placeholder output instead. The only failure that surfaces is
/// an environment defect in the HMAC primitive itself.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum OtpError {
    /// The HMAC-SHA1 primitive is unavailable or rejected the key.
    #[error("HMAC-SHA1 primitive unavailable or rejected the key")]
    CryptoUnavailable,
}
