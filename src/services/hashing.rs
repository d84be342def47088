//! Server-side verifier for the master password hash clients send.
//!
//! Clients never send the master password itself, only a hash of it. That
//! hash is a password-equivalent, so it is stretched again before storage.

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Algorithm, Argon2, Params, Version,
};

// m=8MB, t=2 iterations, p=1 parallelism
fn argon2() -> Result<Argon2<'static>, argon2::password_hash::Error> {
    let params = Params::new(8192, 2, 1, None)?;
    Ok(Argon2::new(Algorithm::Argon2id, Version::V0x13, params))
}

pub fn hash_master_password(client_hash: &str) -> Result<String, argon2::password_hash::Error> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = argon2()?.hash_password(client_hash.as_bytes(), &salt)?;
    Ok(hash.to_string())
}

pub fn verify_master_password(
    client_hash: &str,
    verifier: &str,
) -> Result<bool, argon2::password_hash::Error> {
    let parsed = PasswordHash::new(verifier)?;
    Ok(argon2()?
        .verify_password(client_hash.as_bytes(), &parsed)
        .is_ok())
}
