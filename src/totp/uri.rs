//! Credential-input parsing: raw base-32 secrets or `otpauth://` key URIs
//! (Google Authenticator key-URI format:
//! <https://github.com/google/google-authenticator/wiki/Key-Uri-Format>).
//!
//! The parser is total. Whatever the input looks like, it produces a usable
//! `OtpParameters` — downstream display code is written on the assumption
//! that no credential string can make this layer fail.

use crate::totp::base32;
use crate::totp::types::{OtpParameters, DEFAULT_DIGITS, DEFAULT_PERIOD};

const OTPAUTH_PREFIX: &str = "otpauth://";

/// Parse a credential string into `OtpParameters`.
///
/// - Empty (or whitespace-only) input → no secret, default period/digits.
/// - An `otpauth://` URI → `secret`, `period`, and `digits` query parameters
///   are consumed; the label, issuer, algorithm, and the `totp`/`hotp` path
///   segment are ignored. Both path forms are treated as time-based.
/// - Anything else, including an `otpauth://` string the URL parser rejects,
///   is treated as a raw base-32 secret with defaults.
pub fn parse_otp(input: &str) -> OtpParameters {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return OtpParameters::default();
    }

    if trimmed.starts_with(OTPAUTH_PREFIX) {
        match url::Url::parse(trimmed) {
            Ok(uri) => return from_otpauth(&uri),
            Err(err) => {
                // Fall back to raw-secret interpretation of the whole string.
                log::debug!("otpauth URI rejected ({err}), treating input as raw secret");
            }
        }
    }

    OtpParameters::from_secret(base32::decode_lenient(trimmed))
}

/// Extract parameters from a parsed `otpauth://` URI.
fn from_otpauth(uri: &url::Url) -> OtpParameters {
    let mut params = OtpParameters::default();

    for (key, value) in uri.query_pairs() {
        match key.as_ref() {
            "secret" => {
                let compact: String = value.chars().filter(|c| !c.is_whitespace()).collect();
                params.secret = Some(base32::decode_lenient(&compact));
            }
            "period" => {
                params.period = match value.parse::<u32>() {
                    Ok(p) if p > 0 => p,
                    _ => DEFAULT_PERIOD,
                };
            }
            "digits" => {
                params.digits = if value.as_ref() == "8" { 8 } else { DEFAULT_DIGITS };
            }
            _ => {} // label, issuer, algorithm, counter: ignored
        }
    }

    params
}
