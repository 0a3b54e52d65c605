//! Random alphanumeric identifiers for storage keys and download filenames.

use rand::Rng;

const ALPHABET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789";

/// Default token length for storage keys.
pub const KEY_LEN: usize = 21;

/// Default token length for generated download filenames.
pub const DOWNLOAD_NAME_LEN: usize = 8;

/// Generates a random token of `len` characters drawn uniformly from the
/// 62-symbol alphanumeric alphabet.
///
/// The draw is uniform per character but not cryptographic; collision
/// probability at the default key length is accepted as negligible.
pub fn generate(len: usize) -> String {
    let mut rng = rand::rng();
    (0..len)
        .map(|_| ALPHABET[rng.random_range(0..ALPHABET.len())] as char)
        .collect()
}
