use crate::intelligence::types::ActivityLogEntry;

pub const DAY_MS: i64 = 24 * 60 * 60 * 1000;
pub const HOUR_MS: i64 = 60 * 60 * 1000;

/// Share of correct entries, `None` for an empty set.
pub fn accuracy<'a, I>(logs: I) -> Option<f64>
where
    I: IntoIterator<Item = &'a ActivityLogEntry>,
{
    let (correct, total) = logs
        .into_iter()
        .fold((0usize, 0usize), |(c, t), log| (c + log.correct as usize, t + 1));
    if total == 0 {
        None
    } else {
        Some(correct as f64 / total as f64)
    }
}

pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

/// Population variance, 0 for an empty slice.
pub fn variance(values: &[f64]) -> f64 {
    let Some(mean) = mean(values) else {
        return 0.0;
    };
    values.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / values.len() as f64
}

/// Variance of the pass/fail series, with correct = 1 and incorrect = 0.
pub fn correctness_variance<'a, I>(logs: I) -> f64
where
    I: IntoIterator<Item = &'a ActivityLogEntry>,
{
    let series: Vec<f64> = logs
        .into_iter()
        .map(|log| if log.correct { 1.0 } else { 0.0 })
        .collect();
    variance(&series)
}

pub fn sorted_oldest_first(logs: &[ActivityLogEntry]) -> Vec<&ActivityLogEntry> {
    let mut sorted: Vec<&ActivityLogEntry> = logs.iter().collect();
    sorted.sort_by_key(|log| log.timestamp);
    sorted
}

pub fn sorted_newest_first(logs: &[ActivityLogEntry]) -> Vec<&ActivityLogEntry> {
    let mut sorted: Vec<&ActivityLogEntry> = logs.iter().collect();
    sorted.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
    sorted
}

pub fn within_days(logs: &[ActivityLogEntry], now: i64, days: i64) -> Vec<ActivityLogEntry> {
    logs.iter()
        .filter(|log| now - log.timestamp < days * DAY_MS)
        .cloned()
        .collect()
}
