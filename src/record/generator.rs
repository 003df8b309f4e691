//! Record generation.

use rand::Rng;
use rand::seq::SliceRandom;

use super::names::{FIRST_NAMES, LAST_NAMES};
use super::{
    ACCOUNT_DIGITS, IFSC_PREFIX, IFSC_SUFFIX_LEN, MOBILE_MAX, MOBILE_MIN, PASSWORD_LEN,
    PASSWORD_SYMBOLS, Record,
};

const DIGITS: &[u8] = b"0123456789";
const UPPER_ALPHANUMERIC: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";
const LETTERS_AND_DIGITS: &[u8] =
    b"abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

impl Record {
    /// Generates a record from the thread-local random source.
    #[must_use]
    pub fn generate() -> Self {
        Self::generate_with(&mut rand::thread_rng())
    }

    /// Generates a record from the given random source.
    ///
    /// Every field is drawn independently; two records may collide.
    pub fn generate_with<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self {
            mobile: rng.gen_range(MOBILE_MIN..=MOBILE_MAX).to_string(),
            full_name: full_name(rng),
            account_number: random_string(rng, DIGITS, ACCOUNT_DIGITS),
            ifsc: format!(
                "{IFSC_PREFIX}{}",
                random_string(rng, UPPER_ALPHANUMERIC, IFSC_SUFFIX_LEN)
            ),
            password: password(rng),
        }
    }
}

fn full_name<R: Rng + ?Sized>(rng: &mut R) -> String {
    let first = FIRST_NAMES.choose(rng).copied().unwrap_or("Alex");
    let last = LAST_NAMES.choose(rng).copied().unwrap_or("Morgan");
    format!("{first} {last}")
}

fn password<R: Rng + ?Sized>(rng: &mut R) -> String {
    let charset: Vec<u8> = LETTERS_AND_DIGITS
        .iter()
        .chain(PASSWORD_SYMBOLS.as_bytes())
        .copied()
        .collect();
    random_string(rng, &charset, PASSWORD_LEN)
}

/// Draws `len` characters uniformly from an ASCII `charset`.
fn random_string<R: Rng + ?Sized>(rng: &mut R, charset: &[u8], len: usize) -> String {
    (0..len)
        .map(|_| char::from(charset[rng.gen_range(0..charset.len())]))
        .collect()
}
