//! Invoice number generation.
//!
//! Numbers look like `INV-20260412-7KQ2XM`: prefix, issue date, random suffix.
//! Uniqueness is enforced by the store; callers retry on collision.

use chrono::NaiveDate;
use rand::Rng;

/// Suffix alphabet without look-alike characters (0/O, 1/I).
pub const SUFFIX_ALPHABET: &[u8] = b"ABCDEFGHJKLMNPQRSTUVWXYZ23456789";

/// Source of candidate invoice numbers.
pub trait InvoiceNumberGenerator: Send + Sync {
    /// Produces a candidate number.
    fn generate(&self, prefix: &str, date: NaiveDate, suffix_length: usize) -> String;
}

/// Draws suffixes from the thread-local RNG.
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomNumberGenerator;

impl InvoiceNumberGenerator for RandomNumberGenerator {
    fn generate(&self, prefix: &str, date: NaiveDate, suffix_length: usize) -> String {
        generate_with(prefix, date, suffix_length, &mut rand::rng())
    }
}

/// Builds a number from an explicit RNG.
pub fn generate_with<R: Rng + ?Sized>(
    prefix: &str,
    date: NaiveDate,
    suffix_length: usize,
    rng: &mut R,
) -> String {
    let suffix: String = (0..suffix_length)
        .map(|_| char::from(SUFFIX_ALPHABET[rng.random_range(0..SUFFIX_ALPHABET.len())]))
        .collect();
    format!("{prefix}-{}-{suffix}", date.format("%Y%m%d"))
}
