//! Transaction-isolation level names and parsing
//!
//! Levels use the classic driver-level numeric encoding so raw integers in
//! property sets pass through unchanged.

pub const TRANSACTION_NONE: i32 = 0;
pub const TRANSACTION_READ_UNCOMMITTED: i32 = 1;
pub const TRANSACTION_READ_COMMITTED: i32 = 2;
pub const TRANSACTION_REPEATABLE_READ: i32 = 4;
pub const TRANSACTION_SERIALIZABLE: i32 = 8;

/// Sentinel meaning "not configured, leave the driver default alone"
pub const ISOLATION_UNKNOWN: i32 = -1;

/// Parses an isolation level from property text.
///
/// The value is first matched case-insensitively against the symbolic level
/// names, then as a raw integer. Anything else falls back to
/// [`ISOLATION_UNKNOWN`] with a warning; this never fails, so a typo here
/// cannot abort an otherwise valid binding.
pub fn parse_isolation_level(value: &str) -> i32 {
    match value.to_uppercase().as_str() {
        "NONE" => TRANSACTION_NONE,
        "READ_UNCOMMITTED" => TRANSACTION_READ_UNCOMMITTED,
        "READ_COMMITTED" => TRANSACTION_READ_COMMITTED,
        "REPEATABLE_READ" => TRANSACTION_REPEATABLE_READ,
        "SERIALIZABLE" => TRANSACTION_SERIALIZABLE,
        other => other.parse::<i32>().unwrap_or_else(|_| {
            tracing::warn!(
                value = %value,
                "could not parse defaultTransactionIsolation, using the database driver default"
            );
            ISOLATION_UNKNOWN
        }),
    }
}
