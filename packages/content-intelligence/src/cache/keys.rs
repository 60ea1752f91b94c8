use chrono::{DateTime, Utc};

/// Ranked lists are cached per user and per requested length.
pub fn recommendations_key(user_id: &str, limit: usize) -> String {
    format!("recommendations:{}:{}", user_id, limit)
}

pub fn daily_pack_key(day: &str) -> String {
    format!("daily_pack:{}", day)
}

/// UTC calendar day (`YYYY-MM-DD`) for an epoch-millisecond instant.
pub fn day_string(now_ms: i64) -> String {
    DateTime::<Utc>::from_timestamp_millis(now_ms)
        .map(|dt| dt.format("%Y-%m-%d").to_string())
        .unwrap_or_else(|| "1970-01-01".to_string())
}
