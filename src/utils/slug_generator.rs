//! Random slug generation.
//!
//! Slugs are drawn from a fixed 62-symbol alphabet using the operating
//! system's CSPRNG. Generation never fails: if the random source errors for
//! a position, that position degrades to the first alphabet symbol. The
//! number of degraded positions is reported on [`GeneratedSlug`].
//!
//! A generated slug is **not** guaranteed to be unique; uniqueness is checked
//! against the store by [`crate::application::services::LinkService`].

use std::fmt::Display;

use tracing::warn;

/// Slug alphabet: lowercase letters, uppercase letters, digits.
pub const SLUG_ALPHABET: &[u8; 62] =
    b"abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

/// Default slug length, giving 62^6 (about 5.6e10) possible values.
pub const DEFAULT_SLUG_LENGTH: usize = 6;

/// Result of a single generation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedSlug {
    pub slug: String,
    /// Number of positions that fell back to the first alphabet symbol
    /// because the random source failed.
    pub fallback_symbols: usize,
}

impl GeneratedSlug {
    /// Returns true if any position was produced by the fallback path.
    pub fn is_degraded(&self) -> bool {
        self.fallback_symbols > 0
    }
}

/// Generates slugs of a fixed length.
#[derive(Debug, Clone, Copy)]
pub struct SlugGenerator {
    length: usize,
}

impl SlugGenerator {
    /// Creates a generator; a length of `0` selects [`DEFAULT_SLUG_LENGTH`].
    pub fn new(length: usize) -> Self {
        let length = if length == 0 {
            DEFAULT_SLUG_LENGTH
        } else {
            length
        };
        Self { length }
    }

    pub fn length(&self) -> usize {
        self.length
    }

    /// Generates a slug from the OS random source.
    pub fn generate(&self) -> GeneratedSlug {
        generate_with(self.length, os_random_u64)
    }
}

impl Default for SlugGenerator {
    fn default() -> Self {
        Self::new(DEFAULT_SLUG_LENGTH)
    }
}

/// Generates a slug of `length` symbols (default 6 when `None`).
///
/// # Examples
///
/// ```ignore
/// let slug = generate_slug(None);
/// assert_eq!(slug.len(), 6);
/// assert!(slug.bytes().all(|b| SLUG_ALPHABET.contains(&b)));
/// ```
pub fn generate_slug(length: Option<usize>) -> String {
    SlugGenerator::new(length.unwrap_or(DEFAULT_SLUG_LENGTH))
        .generate()
        .slug
}

fn os_random_u64() -> Result<u64, getrandom::Error> {
    let mut buf = [0u8; 8];
    getrandom::fill(&mut buf)?;
    Ok(u64::from_le_bytes(buf))
}

/// Maps a uniform 64-bit draw onto the alphabet.
///
/// The high 64 bits of `draw * 62` fall in `0..62`; skew is below 62 / 2^64.
fn symbol_index(draw: u64) -> usize {
    ((u128::from(draw) * SLUG_ALPHABET.len() as u128) >> 64) as usize
}

pub(crate) fn generate_with<F, E>(length: usize, mut draw: F) -> GeneratedSlug
where
    F: FnMut() -> Result<u64, E>,
    E: Display,
{
    let mut slug = String::with_capacity(length);
    let mut fallback_symbols = 0;

    for position in 0..length {
        match draw() {
            Ok(value) => slug.push(SLUG_ALPHABET[symbol_index(value)] as char),
            Err(e) => {
                warn!(error = %e, position, "Random source failed, using fallback symbol");
                metrics::counter!("slug_random_fallback_total").increment(1);
                fallback_symbols += 1;
                slug.push(SLUG_ALPHABET[0] as char);
            }
        }
    }

    GeneratedSlug {
        slug,
        fallback_symbols,
    }
}
