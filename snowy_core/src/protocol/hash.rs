/**
 * Deduplication hash for error reports.
 *
 * The collector folds recurring occurrences of "the same" error into one
 * issue by comparing this fingerprint. The default fingerprint is the
 * SHA-1 of `application name + file path + line number`, concatenated as
 * plain strings with no separator, hex-encoded — so two errors group
 * together exactly when they come from the same application, file, and
 * line.
 *
 * Callers may substitute their own grouping key (any string); the
 * collector bounds it to [`HASH_MAX_LEN`] characters, enforced here by
 * clamping.
 */
use sha1::{Digest, Sha1};

use crate::protocol::constants::HASH_MAX_LEN;

/**
 * Computes the default deduplication hash for a report.
 *
 * Absent `file`/`line` contribute empty strings, matching the collector's
 * grouping semantics for triggers without a source location. The line
 * number is rendered in decimal.
 */
pub fn default_hash(application_name: &str, file: Option<&str>, line: Option<u32>) -> String {
    let mut hasher = Sha1::new();
    hasher.update(application_name.as_bytes());
    if let Some(file) = file {
        hasher.update(file.as_bytes());
    }
    if let Some(line) = line {
        hasher.update(line.to_string().as_bytes());
    }

    /*
     * Hex-encode the 20-byte digest. `{:02x}` per byte matches the
     * collector's expected lowercase hex form.
     */
    use std::fmt::Write as _;
    let digest = hasher.finalize();
    let mut out = String::with_capacity(digest.len() * 2);
    for byte in digest {
        let _ = write!(out, "{byte:02x}");
    }
    out
}

/**
 * Clamps a caller-supplied hash to the collector's length bound.
 *
 * Truncation is character-wise so a multi-byte UTF-8 hash is never cut
 * mid-codepoint. Hashes within the bound are returned unchanged.
 */
pub fn clamp(hash: &str) -> String {
    if hash.chars().count() <= HASH_MAX_LEN {
        hash.to_string()
    } else {
        hash.chars().take(HASH_MAX_LEN).collect()
    }
}
