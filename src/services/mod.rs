pub mod bearer;
pub mod cipher_string;
pub mod hashing;
pub mod metrics;
pub mod params;
pub mod security;
pub mod tokens;
pub mod totp;
