use std::sync::Arc;

use crate::intelligence::clock::{Clock, SystemClock};
use crate::intelligence::config::EngineConfig;
use crate::intelligence::content::{ContentItem, HasDifficulty, HasIdentity, LearningContent};
use crate::intelligence::error::IntelligenceError;
use crate::intelligence::feedback::{EffectivenessTracker, FeedbackStore, PerformanceStore};
use crate::intelligence::modeling::stats::within_days;
use crate::intelligence::modeling::{
    AdjustmentRecommender, ContentMixOptimizer, PlateauDetector, PredictionContext,
    PredictionEngine, ProfileBuilder, ProfileSnapshot,
};
use crate::intelligence::source::LearningDataSource;
use crate::intelligence::types::{
    ActivityLogEntry, ContentEffectivenessScore, ContentPerformance, ContentRecommendation,
    LearningGoal, LearningPrediction, OptimalContentMix, PathAdjustment, PlateauArea,
    UserLearningProfile,
};

/// Accuracy a well-pitched item should land on.
const TARGET_ACCURACY: f64 = 0.7;
const MINUTE_MS: i64 = 60_000;

pub struct ContentIntelligenceEngine<S: LearningDataSource> {
    source: Arc<S>,
    store: Arc<PerformanceStore>,
    tracker: Arc<EffectivenessTracker>,
    clock: Arc<dyn Clock>,
    config: EngineConfig,
    profiles: ProfileBuilder,
    predictor: PredictionEngine,
    optimizer: ContentMixOptimizer,
    plateaus: PlateauDetector,
    adjustments: AdjustmentRecommender,
}

impl<S: LearningDataSource> ContentIntelligenceEngine<S> {
    pub fn new(source: Arc<S>, config: EngineConfig) -> Self {
        Self::with_clock(source, config, Arc::new(SystemClock))
    }

    pub fn with_clock(source: Arc<S>, config: EngineConfig, clock: Arc<dyn Clock>) -> Self {
        let store = Arc::new(PerformanceStore::new(&config.store));
        let tracker = Arc::new(EffectivenessTracker::new(
            config.store.averaging,
            clock.clone(),
        ));
        Self {
            source,
            store,
            tracker,
            profiles: ProfileBuilder::new(config.profile.clone()),
            predictor: PredictionEngine::new(config.prediction.clone()),
            optimizer: ContentMixOptimizer::new(),
            plateaus: PlateauDetector::new(config.plateau.clone()),
            adjustments: AdjustmentRecommender::new(config.adjustment.clone()),
            clock,
            config,
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn store(&self) -> &Arc<PerformanceStore> {
        &self.store
    }

    pub fn tracker(&self) -> &Arc<EffectivenessTracker> {
        &self.tracker
    }

    pub fn clock(&self) -> &Arc<dyn Clock> {
        &self.clock
    }

    async fn load(
        &self,
        user_id: &str,
    ) -> Result<(Vec<ActivityLogEntry>, UserLearningProfile), IntelligenceError> {
        let logs = self.source.task_logs(user_id).await?;
        let progress = self.source.user_progress(user_id).await?;
        let snapshot = ProfileSnapshot {
            logs: &logs,
            progress: &progress,
            now: self.clock.now_ms(),
        };
        let profile = self.profiles.build(user_id, snapshot);
        Ok((logs, profile))
    }

    pub async fn build_user_learning_profile(
        &self,
        user_id: &str,
    ) -> Result<UserLearningProfile, IntelligenceError> {
        let (logs, profile) = self.load(user_id).await?;
        tracing::debug!(
            user_id,
            logs = logs.len(),
            weaknesses = profile.weakness_patterns.len(),
            session_minutes = profile.optimal_session_length,
            "built learning profile"
        );
        Ok(profile)
    }

    pub async fn predict_learning_outcomes<C>(
        &self,
        content: &C,
        profile: &UserLearningProfile,
    ) -> Result<LearningPrediction, IntelligenceError>
    where
        C: LearningContent + Sync + ?Sized,
    {
        let logs = self.source.task_logs(&profile.user_id).await?;
        let recent = within_days(
            &logs,
            self.clock.now_ms(),
            self.config.prediction.recent_window_days,
        );
        let history = self.store.history_for(&content.content_id());

        let prediction = self.predictor.predict(
            content,
            PredictionContext {
                profile,
                history: &history,
                recent_logs: &recent,
            },
        );
        tracing::debug!(
            user_id = %profile.user_id,
            content_id = %prediction.content_id,
            accuracy = prediction.predicted_accuracy,
            confidence = prediction.confidence_level,
            risks = prediction.risk_factors.len(),
            "predicted learning outcome"
        );
        Ok(prediction)
    }

    pub async fn optimize_content_mix(
        &self,
        user_id: &str,
        available_time: i32,
        goals: &[LearningGoal],
    ) -> Result<OptimalContentMix, IntelligenceError> {
        if available_time < 0 {
            return Err(IntelligenceError::InvalidTimeBudget(available_time));
        }
        let (_, profile) = self.load(user_id).await?;
        let mix = self.optimizer.optimize(available_time, goals, &profile)?;
        tracing::debug!(
            user_id,
            available_time,
            goals = goals.len(),
            vocabulary = mix.vocabulary_ratio,
            questions = mix.questions_ratio,
            reading = mix.reading_ratio,
            "optimized content mix"
        );
        Ok(mix)
    }

    pub async fn identify_learning_plateaus(
        &self,
        user_id: &str,
    ) -> Result<Vec<PlateauArea>, IntelligenceError> {
        let (logs, profile) = self.load(user_id).await?;
        let plateaus = self.plateaus.detect_all(&logs, &profile);
        tracing::debug!(user_id, plateaus = plateaus.len(), "identified plateaus");
        Ok(plateaus)
    }

    pub async fn suggest_learning_path_adjustments(
        &self,
        user_id: &str,
    ) -> Result<Vec<PathAdjustment>, IntelligenceError> {
        let (logs, profile) = self.load(user_id).await?;
        let plateaus = self.plateaus.detect_all(&logs, &profile);
        let adjustments = self.adjustments.recommend(&plateaus, &profile);
        tracing::debug!(
            user_id,
            plateaus = plateaus.len(),
            adjustments = adjustments.len(),
            "suggested path adjustments"
        );
        Ok(adjustments)
    }

    /// Ranks candidates by how close their predicted accuracy sits to the
    /// target accuracy. Best first, at most `limit`.
    pub async fn rank_content(
        &self,
        user_id: &str,
        candidates: &[ContentItem],
        limit: usize,
    ) -> Result<Vec<ContentRecommendation>, IntelligenceError> {
        let (logs, profile) = self.load(user_id).await?;
        let recent = within_days(
            &logs,
            self.clock.now_ms(),
            self.config.prediction.recent_window_days,
        );

        let mut ranked: Vec<ContentRecommendation> = candidates
            .iter()
            .map(|item| {
                let history = self.store.history_for(&item.content_id());
                let prediction = self.predictor.predict(
                    item,
                    PredictionContext {
                        profile: &profile,
                        history: &history,
                        recent_logs: &recent,
                    },
                );
                recommendation(item, &prediction, &profile)
            })
            .collect();
        ranked.sort_by(|a, b| {
            b.relevance_score
                .partial_cmp(&a.relevance_score)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        ranked.truncate(limit);

        tracing::debug!(
            user_id,
            candidates = candidates.len(),
            returned = ranked.len(),
            "ranked content"
        );
        Ok(ranked)
    }

    pub async fn update_performance_data(
        &self,
        observation: ContentPerformance,
    ) -> Result<(), IntelligenceError> {
        let content_id = observation.content_id.clone();
        self.store.record(observation)?;
        tracing::debug!(content_id = %content_id, stored = self.store.len(), "recorded performance");
        Ok(())
    }

    pub async fn update_content_effectiveness(
        &self,
        content_id: &str,
        observation: &ContentPerformance,
    ) -> Result<ContentEffectivenessScore, IntelligenceError> {
        let score = self.tracker.update(content_id, observation)?;
        tracing::debug!(
            content_id,
            overall = score.overall_score,
            evaluations = score.evaluation_count,
            "updated content effectiveness"
        );
        Ok(score)
    }

    /// Feeds one completed item into both the store and the tracker.
    pub async fn record_completion(
        &self,
        observation: ContentPerformance,
    ) -> Result<ContentEffectivenessScore, IntelligenceError> {
        let content_id = observation.content_id.clone();
        let score = self
            .update_content_effectiveness(&content_id, &observation)
            .await?;
        self.update_performance_data(observation).await?;
        Ok(score)
    }
}

fn recommendation(
    item: &ContentItem,
    prediction: &LearningPrediction,
    profile: &UserLearningProfile,
) -> ContentRecommendation {
    let fit = (1.0 - (prediction.predicted_accuracy - TARGET_ACCURACY).abs()).clamp(0.0, 1.0);
    let relevance_score = (fit * prediction.confidence_level.max(0.5)).clamp(0.0, 1.0);
    let skill_focus = item.skill().into_iter().collect::<Vec<_>>();

    let reason = if skill_focus
        .iter()
        .any(|skill| profile.weakness_patterns.iter().any(|w| w.skill == *skill))
    {
        "Targets a current weakness".to_string()
    } else if prediction.risk_factors.is_empty() {
        "Matches your current level".to_string()
    } else {
        prediction.risk_factors[0].clone()
    };

    let minutes = (prediction.predicted_time as f64 / MINUTE_MS as f64).round().max(1.0);

    ContentRecommendation {
        content_id: prediction.content_id.clone(),
        content_type: item.content_type(),
        title: item.title(),
        description: format!(
            "Predicted accuracy {:.0}%",
            prediction.predicted_accuracy * 100.0
        ),
        estimated_time: minutes as u32,
        difficulty: item.difficulty(),
        relevance_score,
        reason,
        skill_focus,
    }
}
