use crate::intelligence::config::PredictionParams;
use crate::intelligence::content::LearningContent;
use crate::intelligence::modeling::stats::{accuracy, correctness_variance, mean, sorted_newest_first};
use crate::intelligence::types::{
    ActivityLogEntry, ContentPerformance, LearningPrediction, UserLearningProfile,
};

const MINUTE_MS: i64 = 60_000;

/// Inputs a prediction is made against, beyond the content itself.
#[derive(Debug, Clone, Copy)]
pub struct PredictionContext<'a> {
    pub profile: &'a UserLearningProfile,
    /// Recorded observations for this content id.
    pub history: &'a [ContentPerformance],
    /// Activity inside the recent window (last 7 days by default).
    pub recent_logs: &'a [ActivityLogEntry],
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UserFactors {
    pub skill_level: f64,
    pub consistency: f64,
    pub fatigue_level: f64,
    pub motivation_level: f64,
}

pub struct PredictionEngine {
    params: PredictionParams,
}

impl PredictionEngine {
    pub fn new(params: PredictionParams) -> Self {
        Self { params }
    }

    pub fn params(&self) -> &PredictionParams {
        &self.params
    }

    pub fn predict<C>(&self, content: &C, ctx: PredictionContext<'_>) -> LearningPrediction
    where
        C: LearningContent + ?Sized,
    {
        let factors = self.user_factors(ctx.profile, ctx.recent_logs);
        let historical = mean(&ctx.history.iter().map(|p| p.accuracy).collect::<Vec<_>>());

        let predicted_accuracy = self.predicted_accuracy(historical, &factors);
        let predicted_time = self.predicted_time(content, ctx.profile);
        let confidence_level = self.confidence_level(ctx.history.len(), factors.consistency);
        let risk_factors = self.risk_factors(content, ctx.profile, historical, predicted_time);
        let recommended_adjustments = self.adjustments(predicted_accuracy, predicted_time);

        LearningPrediction {
            content_id: content.content_id(),
            predicted_accuracy,
            predicted_time,
            confidence_level,
            risk_factors,
            recommended_adjustments,
        }
    }

    pub fn user_factors(
        &self,
        profile: &UserLearningProfile,
        recent_logs: &[ActivityLogEntry],
    ) -> UserFactors {
        UserFactors {
            skill_level: profile.mean_learning_speed(),
            consistency: self.consistency(recent_logs),
            fatigue_level: self.fatigue(recent_logs),
            motivation_level: profile.motivation_level,
        }
    }

    pub fn consistency(&self, logs: &[ActivityLogEntry]) -> f64 {
        if logs.len() < self.params.min_consistency_samples {
            return 0.5;
        }
        (1.0 - correctness_variance(logs)).clamp(0.1, 0.9)
    }

    /// Drop in accuracy between the older and newer half of the latest attempts.
    pub fn fatigue(&self, logs: &[ActivityLogEntry]) -> f64 {
        let newest = sorted_newest_first(logs);
        let window = &newest[..newest.len().min(self.params.fatigue_window)];
        let half = self.params.fatigue_window / 2;
        if window.len() < half {
            return 0.0;
        }

        let recent = accuracy(window[..half].iter().copied()).unwrap_or(0.0);
        let earlier = accuracy(window[window.len() - half..].iter().copied()).unwrap_or(0.0);
        (earlier - recent).clamp(0.0, self.params.max_fatigue)
    }

    pub fn predicted_accuracy(&self, historical: Option<f64>, factors: &UserFactors) -> f64 {
        let raw = match historical {
            None => {
                factors.skill_level * (1.0 - factors.fatigue_level * 0.3) * factors.motivation_level
            }
            Some(average) => {
                let adjustment = (factors.skill_level - 0.5) * 0.2
                    + (factors.consistency - 0.5) * 0.1
                    - factors.fatigue_level * 0.15
                    + (factors.motivation_level - 0.5) * 0.1;
                average + adjustment
            }
        };
        raw.clamp(self.params.min_accuracy, self.params.max_accuracy)
    }

    /// Faster learners get up to 30% off the content's base duration.
    pub fn predicted_time<C>(&self, content: &C, profile: &UserLearningProfile) -> i64
    where
        C: LearningContent + ?Sized,
    {
        let speed = profile.mean_learning_speed().clamp(0.0, 1.0);
        let factor = 1.0 - speed * self.params.max_time_reduction;
        (content.base_duration_ms() as f64 * factor).round() as i64
    }

    pub fn confidence_level(&self, sample_size: usize, consistency: f64) -> f64 {
        let size_factor = (sample_size as f64 / self.params.confidence_sample_target).min(1.0);
        (size_factor * 0.7 + consistency * 0.3)
            .clamp(self.params.min_confidence, self.params.max_confidence)
    }

    fn risk_factors<C>(
        &self,
        content: &C,
        profile: &UserLearningProfile,
        historical: Option<f64>,
        predicted_time: i64,
    ) -> Vec<String>
    where
        C: LearningContent + ?Sized,
    {
        let mut risks = Vec::new();

        let difficulty = content.difficulty();
        let skill_on_scale = profile.mean_learning_speed() * 5.0;
        if (difficulty - skill_on_scale).abs() > self.params.difficulty_mismatch {
            let direction = if difficulty > skill_on_scale {
                "too high"
            } else {
                "too low"
            };
            risks.push(format!("Difficulty level may be {direction}"));
        }

        if let Some(average) = historical {
            if average < self.params.low_history_accuracy {
                risks.push(
                    "Historical performance suggests difficulty with similar content".to_string(),
                );
            }
        }

        if profile.cognitive_capacity < self.params.low_cognitive_capacity {
            risks.push("User may be experiencing cognitive fatigue".to_string());
        }

        if predicted_time > profile.optimal_session_length as i64 * MINUTE_MS {
            risks.push("Content may exceed optimal session length".to_string());
        }

        risks
    }

    fn adjustments(&self, predicted_accuracy: f64, predicted_time: i64) -> Vec<String> {
        let mut adjustments = Vec::new();

        if predicted_accuracy < self.params.reduce_difficulty_below {
            adjustments
                .push("Consider reducing difficulty or breaking into smaller segments".to_string());
        }
        if predicted_accuracy > self.params.increase_difficulty_above {
            adjustments.push("Consider increasing difficulty for better challenge".to_string());
        }
        if predicted_time > self.params.split_session_minutes * MINUTE_MS {
            adjustments.push("Consider splitting into multiple sessions".to_string());
        }

        adjustments
    }
}

impl Default for PredictionEngine {
    fn default() -> Self {
        Self::new(PredictionParams::default())
    }
}
