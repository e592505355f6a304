//! One-time code generation.

use rand::RngExt;

/// Generate a 6-digit numeric one-time code.
///
/// Codes are zero-padded, so "042137" is a valid code.
pub fn generate_code() -> String {
    let n: u32 = rand::rng().random_range(0..1_000_000);
    format!("{n:06}")
}
