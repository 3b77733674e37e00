//! # totp-watch – TOTP credential-display core
//!
//! Time-based one-time password engine for a credential panel:
//!
//! - **RFC 4226 / 6238** – HOTP & TOTP generation with HMAC-SHA1
//! - **Lenient base-32** – Case-insensitive secret decoding that skips
//!   padding, whitespace, and stray characters instead of failing
//! - **otpauth:// URIs** – Total (never-failing) parsing of key URIs or raw
//!   secrets into usable parameters
//! - **Refresh subscription** – A once-per-second timer task publishing the
//!   current code, seconds remaining, and a countdown progress fraction

pub mod totp;
