//! Random names and content backed by the operating system's entropy source.
//!
//! File contents are drawn from [`OsRng`] rather than a seeded PRNG so that storage backends with
//! compression or deduplication see realistic, incompressible data.

use rand::TryRngCore;
use rand::rngs::OsRng;

use crate::error::Result;

/// Length of the identifiers used for generated file and directory names.
pub const IDENTIFIER_LEN: usize = 10;

/// The 52 symbols identifiers are drawn from.
pub const ALPHABET: &[u8; 52] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz";

/// Random bytes at or above this value are discarded to keep the symbol choice uniform.
const ACCEPT_BELOW: u8 = (256 / ALPHABET.len() * ALPHABET.len()) as u8;

/// Returns a string of exactly `length` characters, each drawn uniformly from [`ALPHABET`].
pub fn generate_identifier(length: usize) -> Result<String> {
    let mut identifier = String::with_capacity(length);
    let mut bytes = [0u8; 32];

    while identifier.len() < length {
        fill_random(&mut bytes)?;

        let symbols = bytes
            .iter()
            .filter(|&&byte| byte < ACCEPT_BELOW)
            .map(|&byte| char::from(ALPHABET[usize::from(byte) % ALPHABET.len()]))
            .take(length - identifier.len());
        identifier.extend(symbols);
    }

    Ok(identifier)
}

/// Fills `buf` with cryptographically secure random bytes.
pub fn fill_random(buf: &mut [u8]) -> Result<()> {
    OsRng.try_fill_bytes(buf)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    #[test]
    fn identifiers_have_requested_length() {
        for length in 0..=100 {
            let identifier = generate_identifier(length).unwrap();
            assert_eq!(identifier.len(), length);
            assert!(identifier.bytes().all(|byte| ALPHABET.contains(&byte)));
        }
    }

    #[test]
    fn identifiers_are_alphabetic() {
        let identifier = generate_identifier(IDENTIFIER_LEN).unwrap();
        assert!(identifier.chars().all(|c| c.is_ascii_alphabetic()));
    }

    #[test]
    fn identifiers_do_not_repeat() {
        let identifiers: HashSet<_> = (0..1000)
            .map(|_| generate_identifier(IDENTIFIER_LEN).unwrap())
            .collect();
        assert_eq!(identifiers.len(), 1000);
    }

    #[test]
    fn identifiers_cover_both_cases() {
        let joined = generate_identifier(10_000).unwrap();
        assert!(joined.chars().any(|c| c.is_ascii_uppercase()));
        assert!(joined.chars().any(|c| c.is_ascii_lowercase()));
    }

    #[test]
    fn fills_whole_buffer() {
        let mut buf = [0u8; 4096];
        fill_random(&mut buf).unwrap();
        // 4096 zero bytes from a working entropy source is not a realistic outcome.
        assert!(buf.iter().any(|&byte| byte != 0));

        fill_random(&mut []).unwrap();
    }
}
