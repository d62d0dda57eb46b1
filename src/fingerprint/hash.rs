//! Fingerprint hashing.

/// 32-bit rolling hash (`h = h * 31 + unit`) over UTF-16 code units, wrapping
/// like a JavaScript `|0` accumulator, rendered as the lower-case hex of its
/// absolute value.
///
/// Matches the value browser-side collectors compute for the same input, so
/// identifiers produced here and in a page script are comparable.
pub fn rolling_hash(input: &str) -> String {
    let hash = input.encode_utf16().fold(0i32, |hash, unit| {
        hash.wrapping_shl(5)
            .wrapping_sub(hash)
            .wrapping_add(i32::from(unit))
    });
    // i64 so that i32::MIN has an absolute value
    format!("{:x}", i64::from(hash).abs())
}
