//! Handler helper functions

use std::time::{SystemTime, UNIX_EPOCH};

/// Get current time in milliseconds
pub fn now_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_now_ms_is_after_2024() {
        // 2024-01-01T00:00:00Z
        assert!(now_ms() > 1_704_067_200_000);
    }
}
