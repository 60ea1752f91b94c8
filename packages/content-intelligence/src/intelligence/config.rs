use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::intelligence::modeling::running_stat::AveragingStrategy;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreParams {
    pub history_capacity: usize,
    pub averaging: AveragingStrategy,
}

impl Default for StoreParams {
    fn default() -> Self {
        Self {
            history_capacity: 1000,
            averaging: AveragingStrategy::CumulativeMean,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProfileParams {
    pub default_learning_speed: f64,
    pub retention_min_samples: usize,
    pub default_retention: f64,
    pub curve_min_logs: usize,
    pub accelerated_threshold: f64,
    pub gradual_threshold: f64,
    pub plateau_threshold: f64,
    pub short_session_minutes: u32,
    pub short_session_margin: f64,
    pub min_session_minutes: u32,
    pub max_session_minutes: u32,
    pub peak_slot_count: usize,
    pub peak_slot_hours: u32,
    pub slot_optimal_length: u32,
    pub weakness_min_logs: usize,
    pub weakness_recent_window: usize,
    pub weakness_threshold: f64,
    pub time_pressure_gap: f64,
    pub consistent_low_severity: f64,
    pub cognitive_window: usize,
    pub default_cognitive_capacity: f64,
    pub min_cognitive_capacity: f64,
    pub streak_target_days: f64,
    pub weekly_activity_target: f64,
    pub min_motivation: f64,
    pub interest_count: usize,
}

impl Default for ProfileParams {
    fn default() -> Self {
        Self {
            default_learning_speed: 0.5,
            retention_min_samples: 6,
            default_retention: 0.7,
            curve_min_logs: 10,
            accelerated_threshold: 0.2,
            gradual_threshold: 0.1,
            plateau_threshold: -0.1,
            short_session_minutes: 15,
            short_session_margin: 0.05,
            min_session_minutes: 10,
            max_session_minutes: 25,
            peak_slot_count: 3,
            peak_slot_hours: 2,
            slot_optimal_length: 15,
            weakness_min_logs: 5,
            weakness_recent_window: 10,
            weakness_threshold: 0.7,
            time_pressure_gap: 0.1,
            consistent_low_severity: 0.4,
            cognitive_window: 20,
            default_cognitive_capacity: 0.8,
            min_cognitive_capacity: 0.3,
            streak_target_days: 30.0,
            weekly_activity_target: 20.0,
            min_motivation: 0.2,
            interest_count: 3,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PredictionParams {
    pub recent_window_days: i64,
    pub min_consistency_samples: usize,
    pub fatigue_window: usize,
    pub max_fatigue: f64,
    pub min_accuracy: f64,
    pub max_accuracy: f64,
    pub min_confidence: f64,
    pub max_confidence: f64,
    pub confidence_sample_target: f64,
    pub max_time_reduction: f64,
    pub difficulty_mismatch: f64,
    pub low_history_accuracy: f64,
    pub low_cognitive_capacity: f64,
    pub reduce_difficulty_below: f64,
    pub increase_difficulty_above: f64,
    pub split_session_minutes: i64,
}

impl Default for PredictionParams {
    fn default() -> Self {
        Self {
            recent_window_days: 7,
            min_consistency_samples: 5,
            fatigue_window: 10,
            max_fatigue: 0.8,
            min_accuracy: 0.1,
            max_accuracy: 0.95,
            min_confidence: 0.1,
            max_confidence: 0.95,
            confidence_sample_target: 10.0,
            max_time_reduction: 0.3,
            difficulty_mismatch: 2.0,
            low_history_accuracy: 0.6,
            low_cognitive_capacity: 0.7,
            reduce_difficulty_below: 0.6,
            increase_difficulty_above: 0.9,
            split_session_minutes: 20,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlateauParams {
    pub min_logs: usize,
    pub analysis_window: usize,
    pub comparison_window: usize,
    pub min_improvement: f64,
    pub mastery_ceiling: f64,
    pub duration_window: usize,
    pub duration_tolerance: f64,
    pub long_session_minutes: u32,
}

impl Default for PlateauParams {
    fn default() -> Self {
        Self {
            min_logs: 10,
            analysis_window: 20,
            comparison_window: 10,
            min_improvement: 0.05,
            mastery_ceiling: 0.8,
            duration_window: 5,
            duration_tolerance: 0.05,
            long_session_minutes: 20,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdjustmentParams {
    pub low_level_threshold: f64,
    pub long_plateau_sessions: u32,
    pub skill_gap_threshold: f64,
    pub long_session_minutes: u32,
}

impl Default for AdjustmentParams {
    fn default() -> Self {
        Self {
            low_level_threshold: 0.6,
            long_plateau_sessions: 10,
            skill_gap_threshold: 0.3,
            long_session_minutes: 30,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheParams {
    pub recommendation_ttl_minutes: u64,
    pub daily_pack_ttl_minutes: u64,
}

impl Default for CacheParams {
    fn default() -> Self {
        Self {
            recommendation_ttl_minutes: 30,
            daily_pack_ttl_minutes: 120,
        }
    }
}

impl CacheParams {
    pub fn recommendation_ttl(&self) -> Duration {
        Duration::from_secs(self.recommendation_ttl_minutes.saturating_mul(60))
    }

    pub fn daily_pack_ttl(&self) -> Duration {
        Duration::from_secs(self.daily_pack_ttl_minutes.saturating_mul(60))
    }
}

/// One year; longer TTLs are rejected from the environment.
pub const MAX_TTL_MINUTES: u64 = 365 * 24 * 60;

fn parse_ttl_minutes(raw: &str) -> Option<u64> {
    raw.trim()
        .parse::<u64>()
        .ok()
        .filter(|minutes| *minutes <= MAX_TTL_MINUTES)
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EngineConfig {
    pub store: StoreParams,
    pub profile: ProfileParams,
    pub prediction: PredictionParams,
    pub plateau: PlateauParams,
    pub adjustment: AdjustmentParams,
    pub cache: CacheParams,
}

impl EngineConfig {
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(val) = std::env::var("INTEL_HISTORY_CAPACITY") {
            match val.parse::<usize>() {
                Ok(capacity) if capacity > 0 => config.store.history_capacity = capacity,
                _ => tracing::warn!(value = %val, "ignoring invalid INTEL_HISTORY_CAPACITY"),
            }
        }
        if let Ok(val) = std::env::var("INTEL_RECOMMENDATION_TTL_MINUTES") {
            match parse_ttl_minutes(&val) {
                Some(minutes) => config.cache.recommendation_ttl_minutes = minutes,
                None => tracing::warn!(
                    value = %val,
                    "ignoring invalid INTEL_RECOMMENDATION_TTL_MINUTES"
                ),
            }
        }
        if let Ok(val) = std::env::var("INTEL_DAILY_PACK_TTL_MINUTES") {
            match parse_ttl_minutes(&val) {
                Some(minutes) => config.cache.daily_pack_ttl_minutes = minutes,
                None => tracing::warn!(value = %val, "ignoring invalid INTEL_DAILY_PACK_TTL_MINUTES"),
            }
        }
        if let Ok(val) = std::env::var("INTEL_AVERAGING") {
            match AveragingStrategy::parse(&val) {
                Some(strategy) => config.store.averaging = strategy,
                None => tracing::warn!(value = %val, "ignoring invalid INTEL_AVERAGING"),
            }
        }

        config
    }
}
