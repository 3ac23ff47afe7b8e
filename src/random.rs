//! Random identifier generation.

use rand::Rng;

/// Characters used for random identifiers.
const RANDOM_STRING_SOURCE: &[u8] =
    b"abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

/// Generate a random string of exactly `length` alphanumeric characters.
///
/// Every position is drawn independently from the 62-character alphabet using
/// the thread-local, OS-seeded generator.
pub fn random_string(length: usize) -> String {
    let mut rng = rand::rng();
    (0..length)
        .map(|_| {
            let idx = rng.random_range(0..RANDOM_STRING_SOURCE.len());
            RANDOM_STRING_SOURCE[idx] as char
        })
        .collect()
}
