//! RFC 6238 time-based one-time codes (HMAC-SHA1, 6 digits, 30 second step).

use data_encoding::{BASE32, BASE32_NOPAD};
use hmac::{Hmac, Mac};
use sha1::Sha1;

type HmacSha1 = Hmac<Sha1>;

const DIGITS: u32 = 6;
const PERIOD: i64 = 30;
/// Steps either side of "now" that still verify, to absorb clock drift.
const DRIFT_STEPS: i64 = 1;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum TotpError {
    #[error("TOTP secret is not valid base32")]
    InvalidSecret,
}

fn decode_secret(secret_base32: &str) -> Result<Vec<u8>, TotpError> {
    let normalized: String = secret_base32
        .chars()
        .filter(|c| !c.is_whitespace() && *c != '-')
        .map(|c| c.to_ascii_uppercase())
        .collect();

    if normalized.is_empty() {
        return Err(TotpError::InvalidSecret);
    }

    let unpadded = normalized.trim_end_matches('=');
    BASE32_NOPAD
        .decode(unpadded.as_bytes())
        .or_else(|_| BASE32.decode(normalized.as_bytes()))
        .map_err(|_| TotpError::InvalidSecret)
}

fn code_at(secret: &[u8], counter: u64) -> Result<String, TotpError> {
    let mut mac = HmacSha1::new_from_slice(secret).map_err(|_| TotpError::InvalidSecret)?;
    mac.update(&counter.to_be_bytes());
    let digest = mac.finalize().into_bytes();

    let offset = (digest[digest.len() - 1] & 0x0f) as usize;
    let binary = ((digest[offset] as u32 & 0x7f) << 24)
        | ((digest[offset + 1] as u32) << 16)
        | ((digest[offset + 2] as u32) << 8)
        | (digest[offset + 3] as u32);

    let code = binary % 10u32.pow(DIGITS);
    Ok(format!("{:0width$}", code, width = DIGITS as usize))
}

/// The code for `timestamp` (Unix seconds).
pub fn generate(secret_base32: &str, timestamp: i64) -> Result<String, TotpError> {
    let secret = decode_secret(secret_base32)?;
    code_at(&secret, (timestamp.max(0) / PERIOD) as u64)
}

/// Check `code` against the steps around `timestamp`.
pub fn verify(secret_base32: &str, code: &str, timestamp: i64) -> Result<bool, TotpError> {
    let code = code.trim();
    if code.len() != DIGITS as usize || !code.chars().all(|c| c.is_ascii_digit()) {
        return Ok(false);
    }

    let secret = decode_secret(secret_base32)?;
    let current = timestamp.max(0) / PERIOD;

    for step in (current - DRIFT_STEPS)..=(current + DRIFT_STEPS) {
        if step < 0 {
            continue;
        }
        if code_at(&secret, step as u64)? == code {
            return Ok(true);
        }
    }

    Ok(false)
}
