//! Wall clock access.

/// Current time as a Unix timestamp in seconds.
#[cfg(not(target_arch = "wasm32"))]
pub fn unix_now() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

/// Current time as a Unix timestamp in seconds.
#[cfg(target_arch = "wasm32")]
pub fn unix_now() -> u64 {
    (js_sys::Date::now() / crate::config::MS_PER_SECOND) as u64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unix_now_is_after_2020() {
        // 2020-01-01 00:00:00 UTC
        assert!(unix_now() > 1_577_836_800);
    }
}
