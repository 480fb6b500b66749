//! Salted PBKDF2-HMAC-SHA256 password hashes.
//!
//! Encoded as `pbkdf2-sha256$<iterations>$<salt>$<hash>` with unpadded
//! standard base64, so the cost travels with each stored secret.

use base64::Engine;
use base64::engine::general_purpose::STANDARD_NO_PAD;
use pbkdf2::pbkdf2_hmac;
use rand::RngCore;
use sha2::Sha256;
use subtle::ConstantTimeEq;

const SCHEME: &str = "pbkdf2-sha256";
const SALT_LEN: usize = 16;
const HASH_LEN: usize = 32;

/// Hash `password` with a fresh random salt.
pub fn hash_password(password: &str, iterations: u32) -> Vec<u8> {
    let mut salt = [0u8; SALT_LEN];
    rand::thread_rng().fill_bytes(&mut salt);
    let hash = derive(password.as_bytes(), &salt, iterations);
    format!(
        "{SCHEME}${iterations}${}${}",
        STANDARD_NO_PAD.encode(salt),
        STANDARD_NO_PAD.encode(hash)
    )
    .into_bytes()
}

/// Check `password` against an encoded secret in constant time.
/// A secret that fails to decode never matches.
pub fn verify_password(password: &str, secret: &[u8]) -> bool {
    let Some((iterations, salt, expected)) = decode(secret) else {
        return false;
    };
    let actual = derive(password.as_bytes(), &salt, iterations);
    bool::from(actual.as_slice().ct_eq(expected.as_slice()))
}

fn derive(password: &[u8], salt: &[u8], iterations: u32) -> [u8; HASH_LEN] {
    let mut out = [0u8; HASH_LEN];
    pbkdf2_hmac::<Sha256>(password, salt, iterations, &mut out);
    out
}

fn decode(secret: &[u8]) -> Option<(u32, Vec<u8>, Vec<u8>)> {
    let encoded = std::str::from_utf8(secret).ok()?;
    let mut parts = encoded.split('$');
    if parts.next()? != SCHEME {
        return None;
    }
    let iterations: u32 = parts.next()?.parse().ok().filter(|n| *n > 0)?;
    let salt = STANDARD_NO_PAD.decode(parts.next()?).ok()?;
    let hash = STANDARD_NO_PAD.decode(parts.next()?).ok()?;
    if parts.next().is_some() || hash.len() != HASH_LEN {
        return None;
    }
    Some((iterations, salt, hash))
}
