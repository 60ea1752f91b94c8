use std::collections::{HashMap, VecDeque};
use std::sync::Arc;

use parking_lot::RwLock;

use crate::intelligence::clock::Clock;
use crate::intelligence::config::StoreParams;
use crate::intelligence::error::IntelligenceError;
use crate::intelligence::modeling::{AveragingStrategy, RunningStat};
use crate::intelligence::types::{ContentEffectivenessScore, ContentPerformance};

const TARGET_ACCURACY: f64 = 0.7;
const SKILLLESS_IMPACT_FACTOR: f64 = 0.8;

pub trait FeedbackStore: Send + Sync {
    fn record(&self, observation: ContentPerformance) -> Result<(), IntelligenceError>;
    fn history_for(&self, content_id: &str) -> Vec<ContentPerformance>;
}

/// Rejects observations whose ratios fall outside [0, 1] or are not finite.
pub fn validate_observation(observation: &ContentPerformance) -> Result<(), IntelligenceError> {
    let fields = [
        ("accuracy", observation.accuracy),
        ("completionRate", observation.completion_rate),
        ("userEngagement", observation.user_engagement),
    ];
    for (name, value) in fields {
        if !value.is_finite() || !(0.0..=1.0).contains(&value) {
            return Err(IntelligenceError::InvalidObservation(format!(
                "{name} = {value} for content {}",
                observation.content_id
            )));
        }
    }
    Ok(())
}

/// Bounded FIFO of content observations.
pub struct PerformanceStore {
    history: RwLock<VecDeque<ContentPerformance>>,
    capacity: usize,
}

impl PerformanceStore {
    pub fn new(params: &StoreParams) -> Self {
        let capacity = params.history_capacity.max(1);
        Self {
            history: RwLock::new(VecDeque::with_capacity(capacity.min(1024))),
            capacity,
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.history.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.history.read().is_empty()
    }

    /// The `n` newest observations, oldest first.
    pub fn recent(&self, n: usize) -> Vec<ContentPerformance> {
        let history = self.history.read();
        let skip = history.len().saturating_sub(n);
        history.iter().skip(skip).cloned().collect()
    }

    pub fn all(&self) -> Vec<ContentPerformance> {
        self.history.read().iter().cloned().collect()
    }
}

impl Default for PerformanceStore {
    fn default() -> Self {
        Self::new(&StoreParams::default())
    }
}

impl FeedbackStore for PerformanceStore {
    fn record(&self, observation: ContentPerformance) -> Result<(), IntelligenceError> {
        validate_observation(&observation)?;
        let mut history = self.history.write();
        history.push_back(observation);
        while history.len() > self.capacity {
            history.pop_front();
        }
        Ok(())
    }

    fn history_for(&self, content_id: &str) -> Vec<ContentPerformance> {
        self.history
            .read()
            .iter()
            .filter(|p| p.content_id == content_id)
            .cloned()
            .collect()
    }
}

#[derive(Debug, Clone)]
struct EffectivenessAccumulator {
    overall: RunningStat,
    learning_impact: RunningStat,
    engagement: RunningStat,
    retention: RunningStat,
    difficulty_fit: RunningStat,
    last_evaluated: i64,
}

impl EffectivenessAccumulator {
    fn new(strategy: AveragingStrategy) -> Self {
        Self {
            overall: RunningStat::new(strategy),
            learning_impact: RunningStat::new(strategy),
            engagement: RunningStat::new(strategy),
            retention: RunningStat::new(strategy),
            difficulty_fit: RunningStat::new(strategy),
            last_evaluated: 0,
        }
    }

    fn absorb(&mut self, observation: &ContentPerformance, now: i64) {
        let accuracy = observation.accuracy;
        let impact_factor = if observation.skill.is_some() {
            1.0
        } else {
            SKILLLESS_IMPACT_FACTOR
        };

        self.overall.update(accuracy);
        self.learning_impact.update(accuracy * impact_factor);
        self.engagement.update(observation.user_engagement);
        self.retention.update(accuracy * observation.completion_rate);
        self.difficulty_fit
            .update((1.0 - (accuracy - TARGET_ACCURACY).abs()).clamp(0.0, 1.0));
        self.last_evaluated = now;
    }

    fn snapshot(&self, content_id: &str) -> ContentEffectivenessScore {
        ContentEffectivenessScore {
            content_id: content_id.to_string(),
            overall_score: self.overall.value(),
            learning_impact: self.learning_impact.value(),
            user_engagement: self.engagement.value(),
            retention_rate: self.retention.value(),
            difficulty_appropriateness: self.difficulty_fit.value(),
            evaluation_count: self.overall.count(),
            last_evaluated: self.last_evaluated,
        }
    }
}

/// Per-content running effectiveness scores.
pub struct EffectivenessTracker {
    scores: RwLock<HashMap<String, EffectivenessAccumulator>>,
    strategy: AveragingStrategy,
    clock: Arc<dyn Clock>,
}

impl EffectivenessTracker {
    pub fn new(strategy: AveragingStrategy, clock: Arc<dyn Clock>) -> Self {
        Self {
            scores: RwLock::new(HashMap::new()),
            strategy,
            clock,
        }
    }

    pub fn update(
        &self,
        content_id: &str,
        observation: &ContentPerformance,
    ) -> Result<ContentEffectivenessScore, IntelligenceError> {
        validate_observation(observation)?;
        let now = self.clock.now_ms();

        let mut scores = self.scores.write();
        let accumulator = scores
            .entry(content_id.to_string())
            .or_insert_with(|| EffectivenessAccumulator::new(self.strategy));
        accumulator.absorb(observation, now);
        Ok(accumulator.snapshot(content_id))
    }

    pub fn score(&self, content_id: &str) -> Option<ContentEffectivenessScore> {
        self.scores
            .read()
            .get(content_id)
            .map(|acc| acc.snapshot(content_id))
    }

    pub fn scores(&self) -> Vec<ContentEffectivenessScore> {
        let mut all: Vec<_> = self
            .scores
            .read()
            .iter()
            .map(|(id, acc)| acc.snapshot(id))
            .collect();
        all.sort_by(|a, b| a.content_id.cmp(&b.content_id));
        all
    }

    /// Highest overall score first; ties by content id.
    pub fn top_content(&self, limit: usize) -> Vec<ContentEffectivenessScore> {
        let mut all = self.scores();
        all.sort_by(|a, b| {
            b.overall_score
                .partial_cmp(&a.overall_score)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| a.content_id.cmp(&b.content_id))
        });
        all.truncate(limit);
        all
    }

    pub fn len(&self) -> usize {
        self.scores.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.scores.read().is_empty()
    }
}
