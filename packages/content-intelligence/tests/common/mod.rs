#![allow(dead_code)]

use std::sync::Arc;

use studyplan_content_intelligence::intelligence::{
    ActivityLogEntry, ContentIntelligenceEngine, ContentPerformance, ContentType, EngineConfig,
    InMemoryDataSource, ManualClock, SkillCategory, UserActivity, UserProgress,
};

/// 2023-11-14T22:13:20Z
pub const NOW: i64 = 1_700_000_000_000;
pub const MINUTE_MS: i64 = 60_000;
pub const DAY_MS: i64 = 24 * 60 * MINUTE_MS;

pub fn log(timestamp: i64, category: &str, correct: bool, minutes: u32) -> ActivityLogEntry {
    ActivityLogEntry {
        timestamp,
        category: category.to_string(),
        correct,
        minutes_spent: minutes,
        points_earned: if correct { 10 } else { 0 },
    }
}

/// One log per minute starting at `start`, ten minutes each.
pub fn series(start: i64, category: &str, outcomes: &[bool]) -> Vec<ActivityLogEntry> {
    outcomes
        .iter()
        .enumerate()
        .map(|(i, correct)| log(start + i as i64 * MINUTE_MS, category, *correct, 10))
        .collect()
}

/// `n` outcomes of which the first `correct` are successes.
pub fn outcomes(n: usize, correct: usize) -> Vec<bool> {
    (0..n).map(|i| i < correct).collect()
}

pub fn observation(content_id: &str, accuracy: f64) -> ContentPerformance {
    ContentPerformance {
        content_id: content_id.to_string(),
        content_type: ContentType::Questions,
        accuracy,
        time_spent: 45_000,
        completion_rate: 1.0,
        user_engagement: 0.8,
        difficulty: 3.0,
        skill: Some(SkillCategory::Grammar),
        timestamp: NOW,
    }
}

pub struct TestEngine {
    pub engine: ContentIntelligenceEngine<InMemoryDataSource>,
    pub source: Arc<InMemoryDataSource>,
    pub clock: Arc<ManualClock>,
}

pub fn engine_for(user_id: &str, logs: Vec<ActivityLogEntry>) -> TestEngine {
    engine_with_progress(user_id, logs, UserProgress::default())
}

pub fn engine_with_progress(
    user_id: &str,
    logs: Vec<ActivityLogEntry>,
    progress: UserProgress,
) -> TestEngine {
    let source = Arc::new(InMemoryDataSource::new());
    source.insert_user(user_id, UserActivity { logs, progress });
    let clock = Arc::new(ManualClock::new(NOW));
    let engine =
        ContentIntelligenceEngine::with_clock(source.clone(), EngineConfig::default(), clock.clone());
    TestEngine {
        engine,
        source,
        clock,
    }
}
