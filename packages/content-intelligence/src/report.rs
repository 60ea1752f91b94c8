//! Batch insight reports over a JSON snapshot of learner activity.

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::cache::keys::recommendations_key;
use crate::cache::RecommendationCache;
use crate::intelligence::{
    ContentIntelligenceEngine, ContentItem, ContentPerformance, EngineConfig, InMemoryDataSource,
    IntelligenceError, LearningGoal, OptimalContentMix, PathAdjustment, PlateauArea,
    UserActivity, UserLearningProfile,
};
use crate::intelligence::types::ContentRecommendation;

const DEFAULT_AVAILABLE_MINUTES: i32 = 30;
const DEFAULT_RECOMMENDATION_LIMIT: usize = 5;

#[derive(Debug, thiserror::Error)]
pub enum ReportError {
    #[error("failed to read input {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed input: {0}")]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Intelligence(#[from] IntelligenceError),
}

fn default_available_time() -> i32 {
    DEFAULT_AVAILABLE_MINUTES
}

fn default_limit() -> usize {
    DEFAULT_RECOMMENDATION_LIMIT
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InsightInput {
    #[serde(default)]
    pub users: HashMap<String, UserActivity>,
    #[serde(default)]
    pub goals: Vec<LearningGoal>,
    #[serde(default = "default_available_time")]
    pub available_time: i32,
    #[serde(default)]
    pub candidates: Vec<ContentItem>,
    #[serde(default = "default_limit")]
    pub recommendation_limit: usize,
    /// Completed items replayed into the feedback stores before reporting.
    #[serde(default)]
    pub completions: Vec<ContentPerformance>,
}

impl InsightInput {
    pub async fn load(path: &Path) -> Result<Self, ReportError> {
        let raw = tokio::fs::read_to_string(path)
            .await
            .map_err(|source| ReportError::Io {
                path: path.display().to_string(),
                source,
            })?;
        Ok(serde_json::from_str(&raw)?)
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserInsights {
    pub user_id: String,
    pub profile: UserLearningProfile,
    pub content_mix: OptimalContentMix,
    pub plateaus: Vec<PlateauArea>,
    pub adjustments: Vec<PathAdjustment>,
    pub recommendations: Vec<ContentRecommendation>,
}

pub struct InsightRunner {
    engine: ContentIntelligenceEngine<InMemoryDataSource>,
    cache: RecommendationCache,
}

impl InsightRunner {
    pub fn new(input_users: HashMap<String, UserActivity>, config: EngineConfig) -> Self {
        let source = Arc::new(InMemoryDataSource::from_users(input_users));
        let cache_params = config.cache.clone();
        let engine = ContentIntelligenceEngine::new(source, config);
        let cache = RecommendationCache::new(cache_params, engine.clock().clone());
        Self { engine, cache }
    }

    pub fn engine(&self) -> &ContentIntelligenceEngine<InMemoryDataSource> {
        &self.engine
    }

    pub fn cache(&self) -> &RecommendationCache {
        &self.cache
    }

    /// Builds one report per user, ordered by user id. Invalid completions are
    /// skipped with a warning; any other failure aborts the run.
    pub async fn run(&self, input: &InsightInput) -> Result<Vec<UserInsights>, ReportError> {
        for completion in &input.completions {
            if let Err(err) = self.engine.record_completion(completion.clone()).await {
                tracing::warn!(
                    content_id = %completion.content_id,
                    error = %err,
                    "skipping completion"
                );
            }
        }

        let mut user_ids: Vec<&String> = input.users.keys().collect();
        user_ids.sort();

        let mut reports = Vec::with_capacity(user_ids.len());
        for user_id in user_ids {
            reports.push(self.user_insights(user_id, input).await?);
        }
        tracing::info!(users = reports.len(), "insight reports built");
        Ok(reports)
    }

    async fn user_insights(
        &self,
        user_id: &str,
        input: &InsightInput,
    ) -> Result<UserInsights, ReportError> {
        let profile = self.engine.build_user_learning_profile(user_id).await?;
        let content_mix = self
            .engine
            .optimize_content_mix(user_id, input.available_time, &input.goals)
            .await?;
        let plateaus = self.engine.identify_learning_plateaus(user_id).await?;
        let adjustments = self
            .engine
            .suggest_learning_path_adjustments(user_id)
            .await?;
        let recommendations = self
            .recommendations(user_id, &input.candidates, input.recommendation_limit)
            .await?;

        Ok(UserInsights {
            user_id: user_id.to_string(),
            profile,
            content_mix,
            plateaus,
            adjustments,
            recommendations,
        })
    }

    /// Ranked candidates for `user_id`, cached per user and limit. The candidate
    /// pool is assumed fixed for the lifetime of a cache entry; call
    /// `cache().invalidate` after swapping it.
    pub async fn recommendations(
        &self,
        user_id: &str,
        candidates: &[ContentItem],
        limit: usize,
    ) -> Result<Vec<ContentRecommendation>, ReportError> {
        let key = recommendations_key(user_id, limit);
        if let Some(cached) = self.cache.get_recommendations(&key) {
            return Ok(cached);
        }
        let ranked = self.engine.rank_content(user_id, candidates, limit).await?;
        self.cache.put_recommendations(&key, ranked.clone(), None);
        Ok(ranked)
    }
}
