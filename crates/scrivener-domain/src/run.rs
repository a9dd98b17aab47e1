//! Run identity

use std::fmt;

/// Unique identifier for a single pipeline run, based on UUIDv7
///
/// UUIDv7 provides:
/// - Chronological sortability, so event streams and stop flags for
///   concurrent runs order naturally
/// - 128-bit uniqueness with no coordination between processes
/// - RFC 9562-standard format with broad ecosystem support
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RunId(u128);

impl RunId {
    /// Generate a new UUIDv7-based RunId
    ///
    /// # Examples
    ///
    /// ```
    /// use scrivener_domain::RunId;
    ///
    /// let id = RunId::new();
    /// assert!(id.value() > 0);
    /// ```
    pub fn new() -> Self {
        Self(uuid::Uuid::now_v7().as_u128())
    }

    /// Create a RunId from a raw u128 value
    ///
    /// Primarily for tests and deserialization.
    pub fn from_value(value: u128) -> Self {
        Self(value)
    }

    /// Parse a RunId from its UUID string form
    ///
    /// # Examples
    ///
    /// ```
    /// use scrivener_domain::RunId;
    ///
    /// let id = RunId::new();
    /// let parsed = RunId::from_string(&id.to_string()).unwrap();
    /// assert_eq!(id, parsed);
    /// ```
    pub fn from_string(s: &str) -> Result<Self, String> {
        uuid::Uuid::parse_str(s)
            .map(|u| Self(u.as_u128()))
            .map_err(|e| format!("Invalid run id: {}", e))
    }

    /// Get the raw u128 value
    pub fn value(&self) -> u128 {
        self.0
    }

    /// Milliseconds since the Unix epoch at which this id was generated
    pub fn timestamp(&self) -> u64 {
        // UUIDv7: top 48 bits are the Unix millisecond timestamp
        (self.0 >> 80) as u64
    }
}

impl Default for RunId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for RunId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", uuid::Uuid::from_u128(self.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_run_id_ordering() {
        let id1 = RunId::from_value(1000);
        let id2 = RunId::from_value(2000);

        assert!(id1 < id2);
        assert!(id2 > id1);
    }

    #[test]
    fn test_run_id_chronological() {
        let id1 = RunId::new();
        std::thread::sleep(std::time::Duration::from_millis(2));
        let id2 = RunId::new();

        assert!(id1 < id2, "Earlier UUIDv7 should be less than later UUIDv7");
        assert!(id1.timestamp() <= id2.timestamp());
    }

    #[test]
    fn test_run_id_display_and_parse() {
        let id = RunId::new();
        let id_str = id.to_string();

        // UUID strings are 36 characters (8-4-4-4-12 with hyphens)
        assert_eq!(id_str.len(), 36);

        let parsed = RunId::from_string(&id_str).unwrap();
        assert_eq!(id, parsed);
    }

    #[test]
    fn test_run_id_invalid_string() {
        assert!(RunId::from_string("not-a-valid-uuid").is_err());
        assert!(RunId::from_string("").is_err());
    }
}
