/*!
 * Protocol layer — data structures, constants, severity catalog, and the
 * deduplication hash.
 *
 * Everything related to *what* we send to the Snowy Evening collector:
 * - `types` — ErrorTrigger input, ErrorReport payload and its blocks
 * - `constants` — endpoint, sentinels, formats, bounds
 * - `severity` — numeric code → category label catalog
 * - `hash` — default SHA-1 deduplication fingerprint
 */

pub mod constants;
pub mod hash;
pub mod severity;
pub mod types;
