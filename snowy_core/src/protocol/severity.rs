/**
 * Severity catalog — maps numeric trigger codes to category labels.
 *
 * The catalog is the fixed table the collector groups issues by. Codes
 * follow the classic error-level bitmask scheme: each level is a power of
 * two so hosts that combine levels into masks can still report a single
 * level per trigger.
 *
 * Codes outside the table resolve to [`UNKNOWN_LABEL`] instead of failing —
 * a host runtime may legitimately grow new levels, and an unrecognized code
 * must never take the error handler down with it.
 */

// ---------------------------------------------------------------------------
// Well-known codes
// ---------------------------------------------------------------------------

/// Fatal runtime error. Panics are reported under this code.
pub const ERROR: u32 = 1;

/// Non-fatal runtime warning.
pub const WARNING: u32 = 2;

/// Application-raised error (the host called the trigger itself).
pub const USER_ERROR: u32 = 256;

/// Application-raised warning.
pub const USER_WARNING: u32 = 512;

/// Application-raised notice.
pub const USER_NOTICE: u32 = 1024;

/// Label reported for codes the catalog does not know.
pub const UNKNOWN_LABEL: &str = "Unknown";

// ---------------------------------------------------------------------------
// Lookup
// ---------------------------------------------------------------------------

/**
 * Returns the category label for a severity code.
 *
 * Total over all inputs: codes missing from the catalog yield
 * [`UNKNOWN_LABEL`]. The 2048 and 4096 levels are reserved in the upstream
 * scheme and map to the same label.
 */
pub fn label(code: u32) -> &'static str {
    match code {
        1 => "Error",
        2 => "Warning",
        4 => "Parse Error",
        8 => "Notice",
        16 => "Core Error",
        32 => "Core Warning",
        64 => "Compile Error",
        128 => "Compile Warning",
        256 => "User Error",
        512 => "User Warning",
        1024 => "User Notice",
        2048 | 4096 => UNKNOWN_LABEL,
        8192 => "Deprecated",
        _ => UNKNOWN_LABEL,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /**
     * Verifies the catalog entries the SDK itself raises with.
     */
    #[test]
    fn test_known_codes() {
        assert_eq!(label(ERROR), "Error");
        assert_eq!(label(WARNING), "Warning");
        assert_eq!(label(USER_ERROR), "User Error");
        assert_eq!(label(USER_WARNING), "User Warning");
        assert_eq!(label(USER_NOTICE), "User Notice");
        assert_eq!(label(8192), "Deprecated");
    }

    /**
     * Codes absent from the catalog must resolve to the fallback label,
     * never panic.
     */
    #[test]
    fn test_unknown_codes_fall_back() {
        assert_eq!(label(3), UNKNOWN_LABEL);
        assert_eq!(label(999), UNKNOWN_LABEL);
        assert_eq!(label(u32::MAX), UNKNOWN_LABEL);
    }

    /**
     * The reserved 2048/4096 levels report as "Unknown" like any
     * uncataloged code.
     */
    #[test]
    fn test_reserved_codes() {
        assert_eq!(label(2048), UNKNOWN_LABEL);
        assert_eq!(label(4096), UNKNOWN_LABEL);
    }
}
